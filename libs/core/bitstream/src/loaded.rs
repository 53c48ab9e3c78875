// [libs/core/bitstream/src/loaded.rs]
/*!
 * =================================================================
 * APARATO: LOADED BITSTREAM INDEX (V3.1 - AUDIT-READY)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: ÍNDICES POR FAR, COLUMNA Y BLOQUE + CENSO
 *
 * Lógicamente inmutable tras el ensamblado. La escritura efectiva por
 * FAR es la última del flujo; la historia completa queda indexada
 * porque el detector audita también las escrituras intermedias.
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet};

use centinela_core_fabric::BlockType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::BitstreamError;
use crate::frame_write::FrameWrite;
use crate::header::BitstreamHeader;

/// Metadatos y censo de un bitstream cargado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitstreamInfo {
    pub filename: String,
    pub design_name: String,
    pub device_name: String,
    pub build_date: String,
    pub build_time: String,
    pub metadata: Option<String>,
    pub file_size: u64,
    pub sha256: Option<String>,

    // Censo poblado por el ensamblado.
    pub frame_write_count: usize,
    pub unique_far_count: usize,
    /// FARs con más de una escritura: la materia prima transitoria.
    pub multi_write_far_count: usize,
    pub block_type_distribution: BTreeMap<String, usize>,
    pub column_coverage: BTreeSet<u8>,
}

impl BitstreamInfo {
    /// Construye los metadatos desde la cabecera decodificada.
    #[must_use]
    pub fn from_header(
        filename: &str,
        header: &BitstreamHeader,
        file_size: u64,
        sha256: Option<String>,
    ) -> Self {
        let field = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| "Unknown".to_string())
        };
        Self {
            filename: filename.to_string(),
            design_name: field(&header.design_name),
            device_name: field(&header.device_name),
            build_date: field(&header.build_date),
            build_time: field(&header.build_time),
            metadata: header.metadata.clone(),
            file_size,
            sha256,
            frame_write_count: 0,
            unique_far_count: 0,
            multi_write_far_count: 0,
            block_type_distribution: BTreeMap::new(),
            column_coverage: BTreeSet::new(),
        }
    }

    /// Proporción de FARs con escrituras múltiples sobre el total.
    #[must_use]
    pub fn transient_ratio(&self) -> f64 {
        if self.unique_far_count == 0 {
            0.0
        } else {
            self.multi_write_far_count as f64 / self.unique_far_count as f64
        }
    }
}

/// Representación completa de un bitstream cargado, lista para análisis.
#[derive(Debug, Clone)]
pub struct LoadedBitstream {
    pub info: BitstreamInfo,
    writes: Vec<FrameWrite>,
    effective_by_far: BTreeMap<u32, usize>,
    history_by_far: BTreeMap<u32, Vec<usize>>,
    writes_by_column: BTreeMap<u8, Vec<usize>>,
    writes_by_block: BTreeMap<u8, Vec<usize>>,
}

impl LoadedBitstream {
    /**
     * Ensambla los índices desde la bitácora ordenada del léxico.
     *
     * # Errors:
     * `PayloadLengthViolation` si alguna trama no mide 164 bytes;
     * solo un defecto del léxico puede producirla y es fatal.
     */
    pub fn assemble(
        mut info: BitstreamInfo,
        writes: Vec<FrameWrite>,
    ) -> Result<Self, BitstreamError> {
        let mut effective_by_far = BTreeMap::new();
        let mut history_by_far: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        let mut writes_by_column: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
        let mut writes_by_block: BTreeMap<u8, Vec<usize>> = BTreeMap::new();

        for (position, write) in writes.iter().enumerate() {
            if !write.has_canonical_length() {
                return Err(BitstreamError::PayloadLengthViolation {
                    far: write.far_value,
                    actual: write.payload.len(),
                });
            }
            effective_by_far.insert(write.far_value, position);
            history_by_far.entry(write.far_value).or_default().push(position);
            writes_by_column.entry(write.fields.major).or_default().push(position);
            writes_by_block.entry(write.fields.block_code).or_default().push(position);
        }

        info.frame_write_count = writes.len();
        info.unique_far_count = history_by_far.len();
        info.multi_write_far_count =
            history_by_far.values().filter(|history| history.len() > 1).count();
        info.column_coverage = writes_by_column.keys().copied().collect();
        info.block_type_distribution = writes_by_block
            .iter()
            .map(|(code, positions)| {
                let name = BlockType::from_code(*code)
                    .map(BlockType::name)
                    .unwrap_or("UNKNOWN")
                    .to_string();
                (name, positions.len())
            })
            .collect();

        debug!(
            "🧾 [BITSTREAM_CENSUS]: {} writes over {} unique FARs ({} multi-write)",
            info.frame_write_count, info.unique_far_count, info.multi_write_far_count
        );

        Ok(Self {
            info,
            writes,
            effective_by_far,
            history_by_far,
            writes_by_column,
            writes_by_block,
        })
    }

    /// Escritura efectiva (última) para un FAR.
    #[must_use]
    pub fn frame(&self, far_value: u32) -> Option<&FrameWrite> {
        self.effective_by_far.get(&far_value).map(|&position| &self.writes[position])
    }

    /// Payload efectivo para un FAR.
    #[must_use]
    pub fn payload(&self, far_value: u32) -> Option<&[u8]> {
        self.frame(far_value).map(|write| write.payload.as_slice())
    }

    /// Historia cronológica completa de escrituras a un FAR.
    #[must_use]
    pub fn write_history(&self, far_value: u32) -> Vec<&FrameWrite> {
        self.history_by_far
            .get(&far_value)
            .map(|positions| positions.iter().map(|&p| &self.writes[p]).collect())
            .unwrap_or_default()
    }

    /// Historia de un FAR reducida a payloads.
    #[must_use]
    pub fn write_history_payloads(&self, far_value: u32) -> Vec<&[u8]> {
        self.write_history(far_value)
            .into_iter()
            .map(|write| write.payload.as_slice())
            .collect()
    }

    /// Primera escritura cuya carga difiere de la referencia.
    #[must_use]
    pub fn first_nonmatching_write(&self, far_value: u32, reference: &[u8]) -> Option<&FrameWrite> {
        self.write_history(far_value)
            .into_iter()
            .find(|write| write.payload != reference)
    }

    /// Todos los FARs efectivos, en orden ascendente.
    #[must_use]
    pub fn all_fars(&self) -> Vec<u32> {
        self.effective_by_far.keys().copied().collect()
    }

    /// Escrituras efectivas como pares (FAR, payload), en orden de FAR.
    pub fn effective_payloads(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.effective_by_far
            .iter()
            .map(|(&far, &position)| (far, self.writes[position].payload.as_slice()))
    }

    /// Escrituras de una columna mayor, en orden de programa.
    #[must_use]
    pub fn frames_in_column(&self, major: u8) -> Vec<&FrameWrite> {
        self.writes_by_column
            .get(&major)
            .map(|positions| positions.iter().map(|&p| &self.writes[p]).collect())
            .unwrap_or_default()
    }

    /// Escrituras de un tipo de bloque, en orden de programa.
    #[must_use]
    pub fn frames_of_block(&self, block: BlockType) -> Vec<&FrameWrite> {
        self.writes_by_block
            .get(&block.code())
            .map(|positions| positions.iter().map(|&p| &self.writes[p]).collect())
            .unwrap_or_default()
    }

    /// Bitácora completa en orden de programa.
    #[must_use]
    pub fn writes(&self) -> &[FrameWrite] {
        &self.writes
    }

    /// Cantidad de escrituras de la bitácora.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// La bitácora está vacía.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}
