// [libs/domain/models/src/anomaly.rs]
/*!
 * =================================================================
 * APARATO: FRAME ANOMALY MODEL (V3.1 - AUDIT-READY)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DE DIVERGENCIA TIPIFICADA
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Taxonomía de divergencias detectables entre golden y sospechoso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnomalyType {
    /// Trama presente en el sospechoso, ausente del golden.
    FrameAdded,
    /// Trama presente en el golden, ausente del sospechoso.
    FrameRemoved,
    /// Contenido de trama divergente sin clase de recurso dominante.
    FrameModified,
    /// Modificación mayoritariamente en región no utilizada.
    UnusedRegionMod,
    /// Trama de ruteo modificada.
    RoutingChange,
    /// Trama de lógica modificada.
    LogicChange,
    /// Trama de reloj modificada.
    ClockChange,
    /// Trama de entrada/salida modificada.
    IoChange,
}

impl AnomalyType {
    /// Etiqueta estable para reportes y conteos por tipo.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FrameAdded => "frame_added",
            Self::FrameRemoved => "frame_removed",
            Self::FrameModified => "frame_modified",
            Self::UnusedRegionMod => "unused_region_mod",
            Self::RoutingChange => "routing_change",
            Self::LogicChange => "logic_change",
            Self::ClockChange => "clock_change",
            Self::IoChange => "io_change",
        }
    }
}

/// Niveles de severidad de una anomalía.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Etiqueta en mayúsculas tal como aparece en el veredicto.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }
}

/// Tope de offsets de bit muestreados que viajan con cada anomalía.
pub const CHANGED_BIT_SAMPLE_LIMIT: usize = 100;

/// Una divergencia concreta entre el golden y el sospechoso.
///
/// Estructura central de resultados del detector. La identidad de
/// trama, la partición espacial usada/no-usada y el resumen de bits
/// alimentan la tabla de severidad por precedencia.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnomaly {
    pub anomaly_id: String,
    pub anomaly_type: AnomalyType,
    pub severity: Severity,

    // Identidad de la trama afectada.
    pub far_value: u32,
    pub far_hex: String,
    pub block_type_code: u8,
    pub block_type_name: String,
    pub column: u8,
    pub minor: u32,
    pub top_bottom: u8,

    // Localización espacial.
    pub tiles_affected: Vec<String>,
    pub tiles_used: Vec<String>,
    pub tiles_unused: Vec<String>,

    // Resumen de bits divergentes.
    pub bits_changed: u32,
    pub changed_bit_positions: Vec<u32>,

    // Clasificación de la trama.
    pub is_routing_frame: bool,
    pub is_logic_frame: bool,
    pub is_clock_frame: bool,
    pub is_io_frame: bool,

    // Referencias a los payloads comparados.
    pub golden_payload: Option<Vec<u8>>,
    pub suspect_payload: Option<Vec<u8>>,

    // Análisis.
    pub description: String,
    pub suspicion_reason: String,
    pub attack_vectors: Vec<String>,
    pub confidence_score: f64,
    /// La divergencia vive solo en la historia de escrituras: el valor
    /// final coincide pero una escritura intermedia difiere.
    pub transient: bool,
}

impl FrameAnomaly {
    /// La anomalía cae mayoritariamente en región no utilizada.
    #[must_use]
    pub fn is_in_unused_region(&self) -> bool {
        self.tiles_unused.len() > self.tiles_used.len()
    }

    /// Resumen de una línea para bitácoras y consolas.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} @ FAR {} ({}) - {} bits changed",
            self.severity.as_str(),
            self.anomaly_type.as_str(),
            self.far_hex,
            self.block_type_name,
            self.bits_changed
        )
    }

    /// Agrega un vector de ataque evitando duplicados.
    pub fn push_attack_vector(&mut self, vector: &str) {
        if !self.attack_vectors.iter().any(|known| known == vector) {
            self.attack_vectors.push(vector.to_string());
        }
    }

    /// Proyección serializable para el documento de reporte (§ alambre).
    /// Los payloads completos no viajan en el registro.
    #[must_use]
    pub fn to_record(&self) -> AnomalyRecord {
        AnomalyRecord {
            anomaly_id: self.anomaly_id.clone(),
            anomaly_type: self.anomaly_type.as_str().to_string(),
            severity: self.severity.as_str().to_string(),
            far: self.far_hex.clone(),
            block_type: self.block_type_name.clone(),
            location: format!("X{}Y{}", self.column, self.minor),
            tiles_affected: self.tiles_affected.clone(),
            tiles_unused: self.tiles_unused.clone(),
            bits_changed: self.bits_changed,
            changed_bit_positions: self.changed_bit_positions.clone(),
            is_routing: self.is_routing_frame,
            is_unused_region: self.is_in_unused_region(),
            description: self.description.clone(),
            suspicion_reason: self.suspicion_reason.clone(),
            confidence: self.confidence_score,
            attack_vectors: self.attack_vectors.clone(),
            transient: self.transient,
        }
    }
}

/// Registro de anomalía en su forma de alambre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub anomaly_id: String,
    #[serde(rename = "type")]
    pub anomaly_type: String,
    pub severity: String,
    pub far: String,
    pub block_type: String,
    pub location: String,
    pub tiles_affected: Vec<String>,
    pub tiles_unused: Vec<String>,
    pub bits_changed: u32,
    pub changed_bit_positions: Vec<u32>,
    pub is_routing: bool,
    pub is_unused_region: bool,
    pub description: String,
    pub suspicion_reason: String,
    pub confidence: f64,
    pub attack_vectors: Vec<String>,
    pub transient: bool,
}
