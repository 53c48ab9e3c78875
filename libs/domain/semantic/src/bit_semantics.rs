// [libs/domain/semantic/src/bit_semantics.rs]
/*!
 * =================================================================
 * APARATO: BIT SEMANTICS DATABASE (V3.2 - ROSETTA STONE)
 * CLASIFICACIÓN: DOMAIN SEMANTIC (ESTRATO L2)
 * RESPONSABILIDAD: OFFSET DE BIT -> SIGNIFICADO DE CONFIGURACIÓN
 *
 * La piedra Rosetta del sistema: para cada tipo de bloque, una tabla
 * cerrada de 1312 descriptores que traduce posiciones de bit a lo que
 * controlan (PIP, init de LUT, control de FF, estándar de IO, ...).
 * Precomputada en la construcción; sin aprendizaje en runtime.
 * =================================================================
 */

use centinela_core_fabric::{decode_far, extract_u64, BlockType, FabricError, FRAME_BIT_COUNT};
use serde::{Deserialize, Serialize};

/// Qué controla un bit de configuración.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitFunction {
    Pip,
    LutInit,
    FfInit,
    FfCtrl,
    MuxSel,
    Carry,
    ClockMux,
    IoStandard,
    DriveStrength,
    SlewRate,
    Pull,
    BramInit,
    BramMode,
    Reserved,
    Unknown,
}

impl BitFunction {
    /// Etiqueta estable para reportes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pip => "pip",
            Self::LutInit => "lut_init",
            Self::FfInit => "ff_init",
            Self::FfCtrl => "ff_ctrl",
            Self::MuxSel => "mux_select",
            Self::Carry => "carry_chain",
            Self::ClockMux => "clock_mux",
            Self::IoStandard => "io_standard",
            Self::DriveStrength => "drive_strength",
            Self::SlewRate => "slew_rate",
            Self::Pull => "pull_resistor",
            Self::BramInit => "bram_init",
            Self::BramMode => "bram_mode",
            Self::Reserved => "reserved",
            Self::Unknown => "unknown",
        }
    }
}

/// Descripción completa de un bit de configuración.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitDescriptor {
    pub bit_offset: u32,
    pub function: BitFunction,
    pub resource_name: String,
    pub subfield: Option<String>,
    /// El bit afecta el ruteo de señal.
    pub is_routing_critical: bool,
    /// Voltear este bit habilita clases de ataque conocidas.
    pub is_security_sensitive: bool,
}

/// Severidad semántica de un cambio de bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SemanticSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SemanticSeverity {
    /// Etiqueta en minúsculas para descripciones.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Base de datos de semántica de bits por tipo de bloque.
#[derive(Debug)]
pub struct BitLayoutDatabase {
    clb_layout: Vec<BitDescriptor>,
    iob_layout: Vec<BitDescriptor>,
    bram_layout: Vec<BitDescriptor>,
    clk_layout: Vec<BitDescriptor>,
}

impl Default for BitLayoutDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl BitLayoutDatabase {
    /// Precomputa las cuatro tablas de 1312 descriptores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clb_layout: build_clb_layout(),
            iob_layout: build_iob_layout(),
            bram_layout: build_bram_layout(),
            clk_layout: build_clk_layout(),
        }
    }

    /// Descriptor del bit `bit_offset` en la trama direccionada por `far_value`.
    #[must_use]
    pub fn descriptor(&self, far_value: u32, bit_offset: u32) -> Option<&BitDescriptor> {
        if bit_offset as usize >= FRAME_BIT_COUNT {
            return None;
        }
        let layout = self.layout_for(far_value)?;
        layout.get(bit_offset as usize)
    }

    /// Todos los bits críticos de ruteo de la trama.
    #[must_use]
    pub fn routing_bits(&self, far_value: u32) -> Vec<&BitDescriptor> {
        self.layout_for(far_value)
            .map(|layout| layout.iter().filter(|d| d.is_routing_critical).collect())
            .unwrap_or_default()
    }

    /// Todos los bits sensibles a seguridad de la trama.
    #[must_use]
    pub fn security_sensitive_bits(&self, far_value: u32) -> Vec<&BitDescriptor> {
        self.layout_for(far_value)
            .map(|layout| layout.iter().filter(|d| d.is_security_sensitive).collect())
            .unwrap_or_default()
    }

    fn layout_for(&self, far_value: u32) -> Option<&Vec<BitDescriptor>> {
        match decode_far(far_value).block_type()? {
            BlockType::Clb => Some(&self.clb_layout),
            BlockType::Iob => Some(&self.iob_layout),
            BlockType::BramContent => Some(&self.bram_layout),
            BlockType::Clk => Some(&self.clk_layout),
            _ => None,
        }
    }

    /**
     * Análisis semántico de la diferencia entre dos payloads de una
     * misma trama: cuántos bits de ruteo, de lógica y sensibles a
     * seguridad cambiaron, y la severidad máxima observada.
     */
    pub fn analyze_frame_diff(
        &self,
        far_value: u32,
        golden_payload: &[u8],
        suspect_payload: &[u8],
    ) -> Result<SemanticFrameDiff, FabricError> {
        let changed_offsets =
            centinela_core_fabric::frame_bits::diff_bit_offsets(golden_payload, suspect_payload)?;

        let mut diff = SemanticFrameDiff {
            has_changes: !changed_offsets.is_empty(),
            total_bits_changed: changed_offsets.len(),
            routing_bits_changed: 0,
            logic_bits_changed: 0,
            security_bits_changed: 0,
            max_severity: SemanticSeverity::Low,
        };

        for offset in changed_offsets {
            let Some(descriptor) = self.descriptor(far_value, offset) else {
                continue;
            };
            if descriptor.is_routing_critical {
                diff.routing_bits_changed += 1;
            }
            if descriptor.function == BitFunction::LutInit {
                diff.logic_bits_changed += 1;
            }
            if descriptor.is_security_sensitive {
                diff.security_bits_changed += 1;
            }
            diff.max_severity = diff.max_severity.max(bit_change_severity(descriptor));
        }
        Ok(diff)
    }
}

/// Severidad del cambio de un bit individual según su función.
fn bit_change_severity(descriptor: &BitDescriptor) -> SemanticSeverity {
    match descriptor.function {
        BitFunction::Pip => {
            if descriptor.is_security_sensitive {
                SemanticSeverity::Critical
            } else {
                SemanticSeverity::High
            }
        }
        BitFunction::LutInit => SemanticSeverity::High,
        BitFunction::ClockMux => SemanticSeverity::Critical,
        _ => SemanticSeverity::Medium,
    }
}

/// Resultado del análisis semántico de una diferencia de trama.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticFrameDiff {
    pub has_changes: bool,
    pub total_bits_changed: usize,
    pub routing_bits_changed: usize,
    pub logic_bits_changed: usize,
    pub security_bits_changed: usize,
    pub max_severity: SemanticSeverity,
}

impl SemanticFrameDiff {
    /// Resumen de una línea para descripciones de anomalía.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.routing_bits_changed > 0 {
            parts.push(format!("Routing: {} bits", self.routing_bits_changed));
        }
        if self.logic_bits_changed > 0 {
            parts.push(format!("Logic: {} bits", self.logic_bits_changed));
        }
        if self.security_bits_changed > 0 {
            parts.push(format!("Security-sensitive: {} bits", self.security_bits_changed));
        }
        if parts.is_empty() {
            format!("{} bits changed", self.total_bits_changed)
        } else {
            parts.join(" | ")
        }
    }
}

/// Offset base de las tablas de verdad LUT en una trama de lógica CLB.
pub const LUT_INIT_BASE_OFFSET: usize = 832;
/// Offset base del grupo de control FF en una trama de lógica CLB.
pub const FF_CTRL_BASE_OFFSET: usize = 1088;

/// Extrae la tabla de verdad de 64 bits de la LUT 'A'..'D'.
pub fn extract_lut_truth_table(payload: &[u8], lut_name: char) -> Result<u64, FabricError> {
    let lut_index = match lut_name {
        'A' => 0usize,
        'B' => 1,
        'C' => 2,
        'D' => 3,
        other => return Err(FabricError::UnknownLutName(other)),
    };
    extract_u64(payload, LUT_INIT_BASE_OFFSET + lut_index * 64)
}

// --------------------------------------------------------------------
// Construcción de tablas
// --------------------------------------------------------------------

fn descriptor(
    bit_offset: u32,
    function: BitFunction,
    resource_name: String,
    subfield: Option<String>,
    is_routing_critical: bool,
    is_security_sensitive: bool,
) -> BitDescriptor {
    BitDescriptor {
        bit_offset,
        function,
        resource_name,
        subfield,
        is_routing_critical,
        is_security_sensitive,
    }
}

/// Trama CLB: interconexión, ruteo local, LUTs, FFs, muxes, acarreo,
/// control.
fn build_clb_layout() -> Vec<BitDescriptor> {
    let mut layout = Vec::with_capacity(FRAME_BIT_COUNT);
    for bit in 0u32..704 {
        layout.push(descriptor(
            bit,
            BitFunction::Pip,
            format!("INT_PIP_{}", bit / 4),
            None,
            true,
            true,
        ));
    }
    for bit in 704u32..832 {
        layout.push(descriptor(
            bit,
            BitFunction::Pip,
            format!("CLB_PIP_{}", (bit - 704) / 2),
            None,
            true,
            false,
        ));
    }
    for lut_index in 0u32..4 {
        let lut_name = ['A', 'B', 'C', 'D'][lut_index as usize];
        for bit_in_lut in 0u32..64 {
            let bit = 832 + lut_index * 64 + bit_in_lut;
            layout.push(descriptor(
                bit,
                BitFunction::LutInit,
                format!("LUT_{lut_name}"),
                Some(format!("INIT[{bit_in_lut}]")),
                false,
                true,
            ));
        }
    }
    for ff_index in 0u32..4 {
        let base = 1088 + ff_index * 8;
        layout.push(descriptor(
            base,
            BitFunction::FfInit,
            format!("FF_{ff_index}"),
            Some("INIT".to_string()),
            false,
            false,
        ));
        layout.push(descriptor(
            base + 1,
            BitFunction::FfCtrl,
            format!("FF_{ff_index}"),
            Some("CLOCK_ENABLE".to_string()),
            false,
            false,
        ));
        layout.push(descriptor(
            base + 2,
            BitFunction::FfCtrl,
            format!("FF_{ff_index}"),
            Some("SET_RESET".to_string()),
            false,
            false,
        ));
        for reserved in 3u32..8 {
            layout.push(descriptor(
                base + reserved,
                BitFunction::Reserved,
                format!("FF_{ff_index}"),
                Some(format!("RESERVED[{reserved}]")),
                false,
                false,
            ));
        }
    }
    for bit in 1120u32..1200 {
        layout.push(descriptor(
            bit,
            BitFunction::MuxSel,
            format!("MUX_{}", (bit - 1120) / 4),
            None,
            false,
            false,
        ));
    }
    for bit in 1200u32..1250 {
        layout.push(descriptor(
            bit,
            BitFunction::Carry,
            format!("CARRY_BIT_{}", bit - 1200),
            None,
            false,
            false,
        ));
    }
    for bit in 1250u32..1312 {
        layout.push(descriptor(
            bit,
            BitFunction::FfCtrl,
            format!("CTRL_{}", bit - 1250),
            None,
            false,
            false,
        ));
    }
    layout
}

/// Trama IOB: ruteo de IO, estándar/drive/slew, registros, pull.
fn build_iob_layout() -> Vec<BitDescriptor> {
    let mut layout = Vec::with_capacity(FRAME_BIT_COUNT);
    for bit in 0u32..800 {
        layout.push(descriptor(
            bit,
            BitFunction::Pip,
            format!("IOB_ROUTE_{bit}"),
            None,
            true,
            true,
        ));
    }
    for bit in 800u32..850 {
        layout.push(descriptor(
            bit,
            BitFunction::IoStandard,
            format!("IOSTANDARD_BIT_{}", bit - 800),
            None,
            false,
            false,
        ));
    }
    for bit in 850u32..900 {
        layout.push(descriptor(
            bit,
            BitFunction::DriveStrength,
            format!("DRIVE_{}", bit - 850),
            None,
            false,
            false,
        ));
    }
    for bit in 900u32..950 {
        layout.push(descriptor(
            bit,
            BitFunction::SlewRate,
            format!("SLEW_{}", bit - 900),
            None,
            false,
            false,
        ));
    }
    for bit in 950u32..1100 {
        layout.push(descriptor(
            bit,
            BitFunction::Reserved,
            format!("IOCONF_{}", bit - 950),
            None,
            false,
            false,
        ));
    }
    for bit in 1100u32..1200 {
        layout.push(descriptor(
            bit,
            BitFunction::FfCtrl,
            format!("IOB_REG_{}", bit - 1100),
            None,
            false,
            false,
        ));
    }
    for bit in 1200u32..1312 {
        layout.push(descriptor(
            bit,
            BitFunction::Pull,
            format!("PULL_{}", bit - 1200),
            None,
            false,
            false,
        ));
    }
    layout
}

/// Trama de contenido BRAM: todo es memoria inicializable.
fn build_bram_layout() -> Vec<BitDescriptor> {
    (0u32..FRAME_BIT_COUNT as u32)
        .map(|bit| {
            descriptor(
                bit,
                BitFunction::BramInit,
                format!("BRAM_WORD_{}", bit / 32),
                Some(format!("BIT[{}]", bit % 32)),
                false,
                true,
            )
        })
        .collect()
}

/// Trama de reloj: todo es ruteo del espinazo de reloj.
fn build_clk_layout() -> Vec<BitDescriptor> {
    (0u32..FRAME_BIT_COUNT as u32)
        .map(|bit| {
            descriptor(bit, BitFunction::ClockMux, format!("CLK_ROUTE_{bit}"), None, true, true)
        })
        .collect()
}
