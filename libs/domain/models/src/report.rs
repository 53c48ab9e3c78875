// [libs/domain/models/src/report.rs]
/*!
 * =================================================================
 * APARATO: ANOMALY REPORT AGGREGATE (V3.1 - AUDIT-READY)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: AGREGACIÓN, VEREDICTO Y FORMA DE ALAMBRE
 *
 * El reporte crece durante la detección y se congela en finalize().
 * Los contadores por severidad y por tipo son agregados conmutativos;
 * la lista de anomalías mantiene un orden estable y reproducible para
 * que dos corridas sobre los mismos bytes sean bit-idénticas.
 * =================================================================
 */

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyRecord, AnomalyType, FrameAnomaly, Severity};
use crate::cluster::{cluster_anomalies, AnomalyCluster};

/// Reporte completo de una corrida de detección.
#[derive(Debug, Clone)]
pub struct AnomalyReport {
    pub golden_id: String,
    pub suspect_id: String,
    pub detection_timestamp: String,

    pub anomalies: Vec<FrameAnomaly>,
    /// Pistas de agrupación espacial, pobladas al congelar.
    pub clusters: Vec<AnomalyCluster>,

    // Estadísticas agregadas.
    pub total_frames_compared: usize,
    pub frames_with_differences: usize,
    pub total_bits_changed: u64,

    // Desglose por severidad.
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub info_count: usize,

    // Desglose por tipo.
    pub type_counts: BTreeMap<String, usize>,

    // Veredicto (poblado por finalize).
    pub trojan_detected: bool,
    pub confidence: f64,
    pub summary: String,
}

impl AnomalyReport {
    /// Crea un reporte vacío al arrancar la detección.
    #[must_use]
    pub fn new(golden_id: &str, suspect_id: &str) -> Self {
        Self {
            golden_id: golden_id.to_string(),
            suspect_id: suspect_id.to_string(),
            detection_timestamp: Utc::now().to_rfc3339(),
            anomalies: Vec::new(),
            clusters: Vec::new(),
            total_frames_compared: 0,
            frames_with_differences: 0,
            total_bits_changed: 0,
            critical_count: 0,
            high_count: 0,
            medium_count: 0,
            low_count: 0,
            info_count: 0,
            type_counts: BTreeMap::new(),
            trojan_detected: false,
            confidence: 0.0,
            summary: String::new(),
        }
    }

    /// Incorpora una anomalía y actualiza los agregados conmutativos.
    pub fn add_anomaly(&mut self, anomaly: FrameAnomaly) {
        match anomaly.severity {
            Severity::Critical => self.critical_count += 1,
            Severity::High => self.high_count += 1,
            Severity::Medium => self.medium_count += 1,
            Severity::Low => self.low_count += 1,
            Severity::Info => self.info_count += 1,
        }

        *self
            .type_counts
            .entry(anomaly.anomaly_type.as_str().to_string())
            .or_insert(0) += 1;

        self.total_bits_changed += u64::from(anomaly.bits_changed);
        if anomaly.bits_changed > 0 {
            self.frames_with_differences += 1;
        }

        self.anomalies.push(anomaly);
    }

    /**
     * Recalcula los contadores desde cero.
     *
     * Necesario cuando una fase posterior reescribe la severidad o el
     * tipo de anomalías ya incorporadas (clasificación y tabla de
     * severidad corren después del alta).
     */
    pub fn rebuild_counters(&mut self) {
        self.critical_count = 0;
        self.high_count = 0;
        self.medium_count = 0;
        self.low_count = 0;
        self.info_count = 0;
        self.type_counts.clear();
        self.total_bits_changed = 0;
        self.frames_with_differences = 0;

        let drained: Vec<FrameAnomaly> = std::mem::take(&mut self.anomalies);
        for anomaly in drained {
            self.add_anomaly(anomaly);
        }
    }

    /**
     * Congela el veredicto. Llamar tras incorporar la última anomalía.
     *
     * Troyano declarado con cualquier CRITICAL o con tres o más HIGH.
     * La confianza global es la media de las confianzas individuales.
     */
    pub fn finalize(&mut self) {
        self.trojan_detected = self.critical_count > 0 || self.high_count >= 3;
        self.clusters = cluster_anomalies(&self.anomalies);

        self.confidence = if self.anomalies.is_empty() {
            0.0
        } else {
            let accumulated: f64 = self.anomalies.iter().map(|a| a.confidence_score).sum();
            accumulated / self.anomalies.len() as f64
        };

        self.summary = self.render_summary();
    }

    fn verdict_tag(&self) -> &'static str {
        if self.trojan_detected {
            "TROJAN DETECTED"
        } else if self.high_count > 0 || self.medium_count > 0 {
            "SUSPICIOUS MODIFICATIONS FOUND"
        } else if !self.anomalies.is_empty() || self.total_bits_changed > 0 {
            "MODIFICATIONS DETECTED"
        } else {
            "NO SIGNIFICANT ANOMALIES"
        }
    }

    fn render_summary(&self) -> String {
        let transient_evidence = self.anomalies.iter().filter(|a| a.transient).count();
        let mut lines = vec![
            format!("Detection Report: {}", self.verdict_tag()),
            String::new(),
            format!("Compared: {} vs {}", self.golden_id, self.suspect_id),
            format!("Total Frames Compared: {}", self.total_frames_compared),
            format!("Frames with Differences: {}", self.frames_with_differences),
            format!("Total Bits Changed: {}", self.total_bits_changed),
            String::new(),
            "Anomaly Breakdown:".to_string(),
            format!("  CRITICAL: {}", self.critical_count),
            format!("  HIGH:     {}", self.high_count),
            format!("  MEDIUM:   {}", self.medium_count),
            format!("  LOW:      {}", self.low_count),
        ];
        if transient_evidence > 0 {
            lines.push(String::new());
            lines.push(format!(
                "Transient write evidence: {} anomaly(ies) hidden in the configuration sequence",
                transient_evidence
            ));
        }
        lines.push(String::new());
        lines.push(format!("Overall Confidence: {:.2}%", self.confidence * 100.0));
        lines.join("\n")
    }

    // ----------------------------------------------------------------
    // Vistas de filtrado
    // ----------------------------------------------------------------

    /// Anomalías de severidad CRITICAL.
    #[must_use]
    pub fn critical_anomalies(&self) -> Vec<&FrameAnomaly> {
        self.anomalies.iter().filter(|a| a.severity == Severity::Critical).collect()
    }

    /// Anomalías de severidad HIGH.
    #[must_use]
    pub fn high_severity_anomalies(&self) -> Vec<&FrameAnomaly> {
        self.anomalies.iter().filter(|a| a.severity == Severity::High).collect()
    }

    /// Anomalías mayoritariamente en región no utilizada.
    #[must_use]
    pub fn unused_region_anomalies(&self) -> Vec<&FrameAnomaly> {
        self.anomalies.iter().filter(|a| a.is_in_unused_region()).collect()
    }

    /// Anomalías sobre tramas de ruteo.
    #[must_use]
    pub fn routing_anomalies(&self) -> Vec<&FrameAnomaly> {
        self.anomalies.iter().filter(|a| a.is_routing_frame).collect()
    }

    /// Anomalías de un tipo concreto.
    #[must_use]
    pub fn anomalies_by_type(&self, anomaly_type: AnomalyType) -> Vec<&FrameAnomaly> {
        self.anomalies.iter().filter(|a| a.anomaly_type == anomaly_type).collect()
    }

    /// Cantidad total de anomalías.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    /// El reporte no registró divergencias.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Estadísticas en su forma de alambre.
    #[must_use]
    pub fn statistics(&self) -> ReportStatistics {
        ReportStatistics {
            total_anomalies: self.anomalies.len(),
            critical: self.critical_count,
            high: self.high_count,
            medium: self.medium_count,
            low: self.low_count,
            info: self.info_count,
            frames_compared: self.total_frames_compared,
            frames_different: self.frames_with_differences,
            bits_changed: self.total_bits_changed,
            type_breakdown: self.type_counts.clone(),
        }
    }

    /// Documento serializable completo (metadata + estadísticas +
    /// resumen + registros de anomalía).
    #[must_use]
    pub fn to_document(&self) -> ReportDocument {
        ReportDocument {
            metadata: ReportMetadata {
                golden_id: self.golden_id.clone(),
                suspect_id: self.suspect_id.clone(),
                timestamp: self.detection_timestamp.clone(),
                trojan_detected: self.trojan_detected,
                confidence: self.confidence,
            },
            statistics: self.statistics(),
            summary: self.summary.clone(),
            anomalies: self.anomalies.iter().map(FrameAnomaly::to_record).collect(),
        }
    }
}

/// Metadatos del documento de reporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub golden_id: String,
    pub suspect_id: String,
    pub timestamp: String,
    pub trojan_detected: bool,
    pub confidence: f64,
}

/// Estadísticas agregadas del documento de reporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_anomalies: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    pub frames_compared: usize,
    pub frames_different: usize,
    pub bits_changed: u64,
    pub type_breakdown: BTreeMap<String, usize>,
}

/// Forma de alambre completa del reporte (§ interfaz de salida).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub statistics: ReportStatistics,
    pub summary: String,
    pub anomalies: Vec<AnomalyRecord>,
}
