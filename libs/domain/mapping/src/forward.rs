// [libs/domain/mapping/src/forward.rs]
/*!
 * =================================================================
 * APARATO: FORWARD FRAME MAPPER (V3.2 - RISK GRADED)
 * CLASIFICACIÓN: DOMAIN MAPPING (ESTRATO L2)
 * RESPONSABILIDAD: FAR -> TILES, CATEGORÍAS, REGIONES Y RIESGO
 *
 * La cobertura de un FAR describe qué configura la trama: tiles
 * alcanzados, categorías de recurso, regiones de bits de ruteo y de
 * lógica, y el nivel de riesgo de troyano asignado por una lista de
 * reglas ordenada por precedencia (la primera que aplica gana).
 *
 * Un FAR que no valida produce un registro de cobertura inválido con
 * la advertencia textual; el detector lo escala, nunca se descarta.
 * =================================================================
 */

use std::sync::Mutex;

use centinela_core_fabric::{
    decode_far, is_routing_minor, validate_far, BlockType, ColumnType, FarFields,
    column_descriptor, HALF_SPLIT_ROW, ROWS_PER_FRAME, TILE_ROW_COUNT,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::memo::BoundedMemo;
use crate::tile_name::compose_tile_name;

/// Capacidad del memo de coberturas por instancia de mapper.
const COVERAGE_MEMO_CAPACITY: usize = 4096;

/// Categorías de recurso que una trama puede configurar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceCategory {
    Routing,
    Logic,
    Memory,
    Clock,
    Io,
    Control,
    Unknown,
}

impl ResourceCategory {
    /// Etiqueta estable para reportes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routing => "routing",
            Self::Logic => "logic",
            Self::Memory => "memory",
            Self::Clock => "clock",
            Self::Io => "io",
            Self::Control => "control",
            Self::Unknown => "unknown",
        }
    }
}

/// Nivel de riesgo de troyano asignado a la trama.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrojanRiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl TrojanRiskLevel {
    /// Etiqueta en mayúsculas para reportes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// Región semiabierta de bits [start, end) dentro de la trama.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitRange {
    pub start: u32,
    pub end: u32,
}

impl BitRange {
    /// Cantidad de bits de la región.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// El offset cae dentro de la región.
    #[must_use]
    pub fn contains(&self, bit_offset: u32) -> bool {
        bit_offset >= self.start && bit_offset < self.end
    }
}

/// Cobertura física completa de un FAR. Inmutable tras el cálculo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCoverage {
    pub far_value: u32,
    pub is_valid: bool,
    pub validation_warning: Option<String>,

    pub block_type: Option<BlockType>,
    pub block_type_name: String,
    pub column_type: Option<ColumnType>,
    pub column: u8,
    pub minor: u32,
    pub top_bottom: u8,

    pub tiles_affected: Vec<String>,
    /// Filas de tiles cubiertas, semiabierto [start, end).
    pub y_range: (u32, u32),
    pub resource_categories: Vec<ResourceCategory>,
    pub routing_bit_ranges: Vec<BitRange>,
    pub logic_bit_ranges: Vec<BitRange>,

    pub trojan_risk_level: TrojanRiskLevel,
    pub attack_vectors: Vec<String>,
}

impl FrameCoverage {
    /// La trama configura ruteo.
    #[must_use]
    pub fn is_routing_frame(&self) -> bool {
        self.resource_categories.contains(&ResourceCategory::Routing)
    }

    /// La trama configura lógica.
    #[must_use]
    pub fn is_logic_frame(&self) -> bool {
        self.resource_categories.contains(&ResourceCategory::Logic)
    }

    /// La trama toca la red de reloj.
    #[must_use]
    pub fn is_clock_frame(&self) -> bool {
        self.resource_categories.contains(&ResourceCategory::Clock)
    }

    /// La trama configura entrada/salida.
    #[must_use]
    pub fn is_io_frame(&self) -> bool {
        self.resource_categories.contains(&ResourceCategory::Io)
    }

    /// La trama almacena contenido de memoria.
    #[must_use]
    pub fn is_memory_frame(&self) -> bool {
        self.resource_categories.contains(&ResourceCategory::Memory)
    }

    /// Bits totales de las regiones de ruteo.
    #[must_use]
    pub fn routing_bit_count(&self) -> u32 {
        self.routing_bit_ranges.iter().map(BitRange::width).sum()
    }

    /// Bits totales de las regiones de lógica.
    #[must_use]
    pub fn logic_bit_count(&self) -> u32 {
        self.logic_bit_ranges.iter().map(BitRange::width).sum()
    }
}

/// Mapper directo FAR -> cobertura, con memo acotado por instancia.
#[derive(Debug)]
pub struct FrameMapper {
    coverage_memo: Mutex<BoundedMemo<u32, FrameCoverage>>,
}

impl Default for FrameMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMapper {
    /// Mapper con memo de capacidad estándar.
    #[must_use]
    pub fn new() -> Self {
        Self { coverage_memo: Mutex::new(BoundedMemo::new(COVERAGE_MEMO_CAPACITY)) }
    }

    /// Cobertura de un FAR, memoizada.
    #[must_use]
    pub fn coverage(&self, far_value: u32) -> FrameCoverage {
        if let Ok(memo) = self.coverage_memo.lock() {
            if let Some(resident) = memo.get(&far_value) {
                return resident;
            }
        }
        let computed = compute_coverage(far_value);
        if let Ok(mut memo) = self.coverage_memo.lock() {
            memo.insert(far_value, computed.clone());
        }
        computed
    }
}

/// Cálculo puro de la cobertura de un FAR.
#[must_use]
pub fn compute_coverage(far_value: u32) -> FrameCoverage {
    let fields = decode_far(far_value);

    if let Err(fault) = validate_far(&fields) {
        trace!("🚧 [COVERAGE_INVALID]: 0x{:08X} -> {}", far_value, fault);
        return invalid_coverage(far_value, &fields, fault.to_string());
    }

    let descriptor = match column_descriptor(fields.major) {
        Some(descriptor) => descriptor,
        None => {
            return invalid_coverage(
                far_value,
                &fields,
                format!("column {} is outside this device", fields.major),
            )
        }
    };
    let block_type = fields.block_type();

    let y_range = coverage_y_range(&fields);
    let tiles_affected = coverage_tiles(descriptor.tile_type_names, fields.major, y_range);
    let resource_categories = classify_categories(block_type, fields.major, fields.minor);
    let (routing_bit_ranges, logic_bit_ranges) = bit_regions(block_type);
    let (trojan_risk_level, attack_vectors) =
        assess_trojan_risk(&resource_categories, descriptor.column_type, block_type);

    FrameCoverage {
        far_value,
        is_valid: true,
        validation_warning: None,
        block_type,
        block_type_name: block_type.map(BlockType::name).unwrap_or("UNKNOWN").to_string(),
        column_type: Some(descriptor.column_type),
        column: fields.major,
        minor: fields.minor,
        top_bottom: fields.top_bottom,
        tiles_affected,
        y_range,
        resource_categories,
        routing_bit_ranges,
        logic_bit_ranges,
        trojan_risk_level,
        attack_vectors,
    }
}

fn invalid_coverage(far_value: u32, fields: &FarFields, warning: String) -> FrameCoverage {
    FrameCoverage {
        far_value,
        is_valid: false,
        validation_warning: Some(warning),
        block_type: fields.block_type(),
        block_type_name: fields.block_type().map(BlockType::name).unwrap_or("UNKNOWN").to_string(),
        column_type: column_descriptor(fields.major).map(|descriptor| descriptor.column_type),
        column: fields.major,
        minor: fields.minor,
        top_bottom: fields.top_bottom,
        tiles_affected: Vec::new(),
        y_range: (0, 0),
        resource_categories: vec![ResourceCategory::Unknown],
        routing_bit_ranges: Vec::new(),
        logic_bit_ranges: Vec::new(),
        trojan_risk_level: TrojanRiskLevel::Low,
        attack_vectors: Vec::new(),
    }
}

/// Franja vertical [start, end) cubierta por la trama, recortada al grid.
///
/// La posición vertical se deriva del minor local a su plano: los
/// minors de lógica CLB y de contenido BRAM reinician la cuenta tras
/// su franja de ruteo, de modo que el plano de lógica de una columna
/// cubre las mismas filas que su plano de ruteo.
fn coverage_y_range(fields: &FarFields) -> (u32, u32) {
    let y_base = if fields.top_bottom == 1 { HALF_SPLIT_ROW } else { 0 };
    let local_minor = plane_local_minor(fields);
    let start = y_base + local_minor * ROWS_PER_FRAME;
    let end = y_base + (local_minor + 1) * ROWS_PER_FRAME;
    (start.min(TILE_ROW_COUNT), end.min(TILE_ROW_COUNT))
}

/// Minor relativo al plano (ruteo / lógica / contenido) que lo contiene.
fn plane_local_minor(fields: &FarFields) -> u32 {
    match (fields.block_type(), column_descriptor(fields.major)) {
        (Some(BlockType::BramContent), _) => {
            fields.minor.saturating_sub(centinela_core_fabric::BRAM_CONTENT_FIRST_MINOR)
        }
        (Some(BlockType::Clb), Some(descriptor))
            if fields.minor >= descriptor.routing_frame_count =>
        {
            fields.minor - descriptor.routing_frame_count
        }
        _ => fields.minor,
    }
}

/// Nombres de tile en el orden declarado: por tipo, luego por fila.
fn coverage_tiles(tile_type_names: &[&str], column: u8, y_range: (u32, u32)) -> Vec<String> {
    let mut tiles = Vec::new();
    for tile_type in tile_type_names {
        for row in y_range.0..y_range.1 {
            tiles.push(compose_tile_name(tile_type, column, row));
        }
    }
    tiles
}

/// Matriz de categorías por tipo de bloque y franja de minor.
fn classify_categories(
    block_type: Option<BlockType>,
    major: u8,
    minor: u32,
) -> Vec<ResourceCategory> {
    match block_type {
        Some(BlockType::Clb) => {
            if is_routing_minor(major, minor) {
                vec![ResourceCategory::Routing, ResourceCategory::Control]
            } else {
                vec![ResourceCategory::Logic, ResourceCategory::Control]
            }
        }
        Some(BlockType::Iob) => vec![
            ResourceCategory::Io,
            ResourceCategory::Routing,
            ResourceCategory::Control,
        ],
        Some(BlockType::BramContent) => vec![ResourceCategory::Memory],
        Some(BlockType::BramInt) => vec![ResourceCategory::Routing],
        Some(BlockType::Clk) => vec![
            ResourceCategory::Clock,
            ResourceCategory::Routing,
            ResourceCategory::Control,
        ],
        _ => vec![ResourceCategory::Unknown],
    }
}

/// Regiones de bits (ruteo, lógica) por bloque, de la tabla por trama.
fn bit_regions(block_type: Option<BlockType>) -> (Vec<BitRange>, Vec<BitRange>) {
    match block_type {
        Some(BlockType::Clb) => (
            vec![BitRange { start: 0, end: 704 }, BitRange { start: 704, end: 832 }],
            vec![BitRange { start: 832, end: 1088 }, BitRange { start: 1088, end: 1120 }],
        ),
        Some(BlockType::Iob) => (vec![BitRange { start: 0, end: 800 }], Vec::new()),
        Some(BlockType::BramInt) | Some(BlockType::Clk) => {
            (vec![BitRange { start: 0, end: 1312 }], Vec::new())
        }
        _ => (Vec::new(), Vec::new()),
    }
}

/**
 * Reglas de riesgo ordenadas por precedencia; la primera que aplica
 * asigna nivel y vectores de ataque.
 */
fn assess_trojan_risk(
    categories: &[ResourceCategory],
    column_type: ColumnType,
    block_type: Option<BlockType>,
) -> (TrojanRiskLevel, Vec<String>) {
    let has = |category: ResourceCategory| categories.contains(&category);
    let vectors = |names: &[&str]| names.iter().map(|name| (*name).to_string()).collect();

    if has(ResourceCategory::Clock) {
        return (
            TrojanRiskLevel::Critical,
            vectors(&["clock_network_tampering", "timing_manipulation"]),
        );
    }
    if column_type == ColumnType::Iob {
        return (
            TrojanRiskLevel::Critical,
            vectors(&["data_exfiltration", "covert_channel_creation"]),
        );
    }
    if has(ResourceCategory::Routing) && block_type == Some(BlockType::Clb) {
        return (
            TrojanRiskLevel::High,
            vectors(&["routing_detour", "minimal_modification_trojan", "unused_region_routing"]),
        );
    }
    if block_type == Some(BlockType::BramInt) {
        return (
            TrojanRiskLevel::High,
            vectors(&["memory_access_interception", "data_flow_manipulation"]),
        );
    }
    if has(ResourceCategory::Logic) {
        return (
            TrojanRiskLevel::Medium,
            vectors(&["hidden_logic_insertion", "lut_truth_table_modification"]),
        );
    }
    if has(ResourceCategory::Memory) {
        return (TrojanRiskLevel::Medium, vectors(&["malicious_payload_storage"]));
    }
    (TrojanRiskLevel::Low, Vec::new())
}
