// [libs/domain/semantic/src/logic.rs]
/*!
 * =================================================================
 * APARATO: LOGIC STATE RECONSTRUCTOR (V3.2)
 * CLASIFICACIÓN: DOMAIN SEMANTIC (ESTRATO L2)
 * RESPONSABILIDAD: TRAMA DE LÓGICA -> LUTs, FFs Y SU SEMÁNTICA
 *
 * Por cada trama de lógica CLB se exponen 2 slices x 4 LUTs con la
 * slice plegada en la identidad de la LUT, más el triplete de control
 * de cada FF. El clasificador semántico gradúa una modificación de
 * tabla de verdad: el cambio mínimo dirigido (1-4 bits) es la firma
 * de troyano por excelencia.
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet};

use centinela_core_fabric::{extract_bit, BlockType};
use centinela_domain_mapping::FrameMapper;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::bit_semantics::{extract_lut_truth_table, SemanticSeverity, FF_CTRL_BASE_OFFSET};

/// Slices modeladas por trama de lógica.
const SLICES_PER_TILE: u32 = 2;
/// Nombres de LUT dentro de una slice.
const LUT_NAMES: [char; 4] = ['A', 'B', 'C', 'D'];
/// FFs modelados por slice.
const FFS_PER_SLICE: u32 = 4;

/// Configuración de una LUT individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutConfig {
    pub tile_name: String,
    pub slice_name: String,
    pub lut_name: char,
    pub truth_table: u64,
    pub far_value: u32,
}

impl LutConfig {
    /// La LUT porta configuración no nula.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.truth_table != 0
    }

    /// La LUT produce una constante (todo ceros o todo unos).
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.truth_table == 0 || self.truth_table == u64::MAX
    }
}

/// Configuración de un flip-flop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FfConfig {
    pub tile_name: String,
    pub slice_name: String,
    pub ff_name: String,
    pub init_value: bool,
    pub clock_enable: bool,
    pub set_reset: bool,
    pub far_value: u32,
}

/// Identidad de una LUT dentro de la configuración: (tile, id de LUT
/// con la slice plegada, p. ej. "SLICE_0_A").
pub type LutKey = (String, String);

/// Estado de lógica completo reconstruido de un bitstream.
#[derive(Debug, Clone, Default)]
pub struct LogicConfiguration {
    pub bitstream_id: String,
    luts: BTreeMap<LutKey, LutConfig>,
    ffs: BTreeMap<LutKey, FfConfig>,
}

impl LogicConfiguration {
    /// Configuración vacía para un bitstream identificado.
    #[must_use]
    pub fn new(bitstream_id: &str) -> Self {
        Self { bitstream_id: bitstream_id.to_string(), ..Self::default() }
    }

    /// Registra una LUT.
    pub fn add_lut(&mut self, lut_id: String, lut: LutConfig) {
        self.luts.insert((lut.tile_name.clone(), lut_id), lut);
    }

    /// Registra un FF.
    pub fn add_ff(&mut self, ff_id: String, ff: FfConfig) {
        self.ffs.insert((ff.tile_name.clone(), ff_id), ff);
    }

    /// LUT por (tile, id).
    #[must_use]
    pub fn lut(&self, tile_name: &str, lut_id: &str) -> Option<&LutConfig> {
        self.luts.get(&(tile_name.to_string(), lut_id.to_string()))
    }

    /// Mapa completo de LUTs.
    #[must_use]
    pub fn luts(&self) -> &BTreeMap<LutKey, LutConfig> {
        &self.luts
    }

    /// Mapa completo de FFs.
    #[must_use]
    pub fn ffs(&self) -> &BTreeMap<LutKey, FfConfig> {
        &self.ffs
    }

    /// Tiles con alguna LUT inicializada.
    #[must_use]
    pub fn used_tiles(&self) -> BTreeSet<String> {
        self.luts
            .values()
            .filter(|lut| lut.is_initialized())
            .map(|lut| lut.tile_name.clone())
            .collect()
    }

    /// LUTs con configuración no nula.
    #[must_use]
    pub fn initialized_lut_count(&self) -> usize {
        self.luts.values().filter(|lut| lut.is_initialized()).count()
    }
}

/// Granularidad de un cambio de tabla de verdad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LutChangeClass {
    NoChange,
    /// 1-4 bits: firma de troyano.
    MinimalTargeted,
    /// 5-16 bits.
    Moderate,
    /// 17-32 bits.
    Substantial,
    /// 33-64 bits.
    CompleteRewrite,
}

impl LutChangeClass {
    /// Clase según la población del XOR de tablas.
    #[must_use]
    pub fn from_bits_changed(bits_changed: u32) -> Self {
        match bits_changed {
            0 => Self::NoChange,
            1..=4 => Self::MinimalTargeted,
            5..=16 => Self::Moderate,
            17..=32 => Self::Substantial,
            _ => Self::CompleteRewrite,
        }
    }

    /// Etiqueta estable para reportes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoChange => "no_change",
            Self::MinimalTargeted => "minimal_targeted",
            Self::Moderate => "moderate",
            Self::Substantial => "substantial",
            Self::CompleteRewrite => "complete_rewrite",
        }
    }
}

/// Lectura funcional de un cambio de tabla de verdad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LutChangeSemantic {
    NoChange,
    /// Función viva pasó a constante.
    FunctionDisabled,
    /// Constante pasó a función viva: lógica nueva.
    FunctionEnabled,
    /// Cambio mínimo dirigido sobre función viva.
    TargetedModification,
    FunctionChanged,
}

impl LutChangeSemantic {
    /// Etiqueta estable para reportes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoChange => "no_change",
            Self::FunctionDisabled => "function_disabled",
            Self::FunctionEnabled => "function_enabled",
            Self::TargetedModification => "targeted_modification",
            Self::FunctionChanged => "function_changed",
        }
    }
}

/// Análisis completo de una modificación de LUT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutModificationAnalysis {
    pub bits_changed: u32,
    pub change_class: LutChangeClass,
    pub semantic: LutChangeSemantic,
    pub severity: SemanticSeverity,
    pub golden_constant: bool,
    pub suspect_constant: bool,
}

/**
 * Clasifica semánticamente un cambio de tabla de verdad.
 *
 * Precedencia: función deshabilitada (viva -> constante, MEDIUM),
 * función habilitada (constante -> viva, HIGH), cambio mínimo
 * dirigido (CRITICAL), cambio de función genérico (MEDIUM).
 */
#[must_use]
pub fn analyze_lut_modification(golden_tt: u64, suspect_tt: u64) -> LutModificationAnalysis {
    let bits_changed = (golden_tt ^ suspect_tt).count_ones();
    let change_class = LutChangeClass::from_bits_changed(bits_changed);
    let golden_constant = golden_tt == 0 || golden_tt == u64::MAX;
    let suspect_constant = suspect_tt == 0 || suspect_tt == u64::MAX;

    let (semantic, severity) = if bits_changed == 0 {
        (LutChangeSemantic::NoChange, SemanticSeverity::Low)
    } else if !golden_constant && suspect_constant {
        (LutChangeSemantic::FunctionDisabled, SemanticSeverity::Medium)
    } else if golden_constant && !suspect_constant {
        (LutChangeSemantic::FunctionEnabled, SemanticSeverity::High)
    } else if change_class == LutChangeClass::MinimalTargeted {
        (LutChangeSemantic::TargetedModification, SemanticSeverity::Critical)
    } else {
        (LutChangeSemantic::FunctionChanged, SemanticSeverity::Medium)
    };

    LutModificationAnalysis {
        bits_changed,
        change_class,
        semantic,
        severity,
        golden_constant,
        suspect_constant,
    }
}

/// Una LUT cuyo contenido difiere entre golden y sospechoso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LutModification {
    pub tile_name: String,
    pub lut_id: String,
    pub golden_truth_table: u64,
    pub suspect_truth_table: u64,
    pub bits_changed: u32,
    pub far_value: u32,
}

/// Resultado de comparar dos configuraciones de lógica.
#[derive(Debug, Clone, Default)]
pub struct LogicComparison {
    pub golden_lut_count: usize,
    pub suspect_lut_count: usize,
    pub common_count: usize,
    pub added: Vec<LutKey>,
    pub removed: Vec<LutKey>,
    pub modified: Vec<LutModification>,
}

/// Motor de reconstrucción de estado de lógica.
#[derive(Debug, Default)]
pub struct LogicReconstructor {
    frame_mapper: FrameMapper,
}

impl LogicReconstructor {
    /// Motor con mapper propio.
    #[must_use]
    pub fn new() -> Self {
        Self { frame_mapper: FrameMapper::new() }
    }

    /**
     * Reconstruye LUTs y FFs desde los payloads efectivos (pares
     * FAR -> bytes) de un bitstream. Solo tramas de lógica CLB.
     */
    #[instrument(skip(self, effective_frames))]
    pub fn reconstruct<'a>(
        &self,
        bitstream_id: &str,
        effective_frames: impl Iterator<Item = (u32, &'a [u8])>,
    ) -> LogicConfiguration {
        let mut configuration = LogicConfiguration::new(bitstream_id);
        let mut logic_frames = 0usize;

        for (far_value, payload) in effective_frames {
            let coverage = self.frame_mapper.coverage(far_value);
            if !coverage.is_valid
                || !coverage.is_logic_frame()
                || coverage.block_type != Some(BlockType::Clb)
            {
                continue;
            }
            logic_frames += 1;

            for tile_name in &coverage.tiles_affected {
                if !tile_name.starts_with("CLB") {
                    continue;
                }
                self.extract_tile_logic(tile_name, far_value, payload, &mut configuration);
            }
        }

        info!(
            "🧠 [LOGIC_RECON]: {} -> {} LUTs ({} initialized) over {} logic frames",
            bitstream_id,
            configuration.luts().len(),
            configuration.initialized_lut_count(),
            logic_frames
        );
        configuration
    }

    fn extract_tile_logic(
        &self,
        tile_name: &str,
        far_value: u32,
        payload: &[u8],
        configuration: &mut LogicConfiguration,
    ) {
        for slice_index in 0..SLICES_PER_TILE {
            let slice_name = format!("SLICE_{slice_index}");

            for lut_name in LUT_NAMES {
                let Ok(truth_table) = extract_lut_truth_table(payload, lut_name) else {
                    continue;
                };
                let lut_id = format!("{slice_name}_{lut_name}");
                configuration.add_lut(
                    lut_id,
                    LutConfig {
                        tile_name: tile_name.to_string(),
                        slice_name: slice_name.clone(),
                        lut_name,
                        truth_table,
                        far_value,
                    },
                );
            }

            for ff_index in 0..FFS_PER_SLICE {
                let base_offset = FF_CTRL_BASE_OFFSET + (ff_index as usize) * 8;
                let init_value = extract_bit(payload, base_offset).unwrap_or(false);
                let clock_enable = extract_bit(payload, base_offset + 1).unwrap_or(false);
                let set_reset = extract_bit(payload, base_offset + 2).unwrap_or(false);
                let ff_id = format!("{slice_name}_FF_{ff_index}");
                configuration.add_ff(
                    ff_id.clone(),
                    FfConfig {
                        tile_name: tile_name.to_string(),
                        slice_name: slice_name.clone(),
                        ff_name: ff_id,
                        init_value,
                        clock_enable,
                        set_reset,
                        far_value,
                    },
                );
            }
        }
    }

    /// Diferencia dos configuraciones de lógica: LUTs agregadas,
    /// removidas y modificadas (con el XOR de tablas).
    #[must_use]
    pub fn compare(
        &self,
        golden: &LogicConfiguration,
        suspect: &LogicConfiguration,
    ) -> LogicComparison {
        let golden_keys: BTreeSet<&LutKey> = golden.luts().keys().collect();
        let suspect_keys: BTreeSet<&LutKey> = suspect.luts().keys().collect();

        let added = suspect_keys.difference(&golden_keys).map(|key| (*key).clone()).collect();
        let removed = golden_keys.difference(&suspect_keys).map(|key| (*key).clone()).collect();

        let mut modified = Vec::new();
        for key in golden_keys.intersection(&suspect_keys) {
            let golden_lut = &golden.luts()[*key];
            let suspect_lut = &suspect.luts()[*key];
            if golden_lut.truth_table != suspect_lut.truth_table {
                modified.push(LutModification {
                    tile_name: key.0.clone(),
                    lut_id: key.1.clone(),
                    golden_truth_table: golden_lut.truth_table,
                    suspect_truth_table: suspect_lut.truth_table,
                    bits_changed: (golden_lut.truth_table ^ suspect_lut.truth_table).count_ones(),
                    far_value: suspect_lut.far_value,
                });
            }
        }

        LogicComparison {
            golden_lut_count: golden.luts().len(),
            suspect_lut_count: suspect.luts().len(),
            common_count: golden_keys.intersection(&suspect_keys).count(),
            added,
            removed,
            modified,
        }
    }
}
