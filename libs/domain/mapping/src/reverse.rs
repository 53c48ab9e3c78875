// [libs/domain/mapping/src/reverse.rs]
/*!
 * =================================================================
 * APARATO: REVERSE FRAME MAPPER (V3.2 - TRIPLE STRATEGY)
 * CLASIFICACIÓN: DOMAIN MAPPING (ESTRATO L2)
 * RESPONSABILIDAD: TILE / COORDENADA / SITIO / REGIÓN -> FARs
 *
 * Tres estrategias de índice seleccionables en construcción:
 *  - Full:   pre-construye índice de tiles y de columnas (memoria
 *            alta, consultas O(1)).
 *  - Lazy:   sin pre-trabajo; cada consulta corre el cálculo inverso
 *            y memoiza.
 *  - Hybrid: pre-construye solo el índice de columnas (pequeño) y
 *            memoiza tiles al primer uso. Estrategia recomendada.
 *
 * El cálculo inverso emite, además del par (mitad, minor) local a la
 * mitad del dado, el alias de mitad inferior cuando la fila admite
 * ambas lecturas; esto sostiene la propiedad de consistencia
 * bidireccional frente al recorte del mapper directo.
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use centinela_core_fabric::{
    block_type_for, column_descriptor, encode_far, BlockType, ColumnType,
    BRAM_CONTENT_FIRST_MINOR, HALF_SPLIT_ROW, MAJOR_COLUMN_COUNT, ROWS_PER_FRAME, TILE_ROW_COUNT,
};
use centinela_domain_device::DeviceModel;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::memo::BoundedMemo;
use crate::tile_name::{compose_tile_name, parse_tile_name};

/// Capacidad del memo de tiles para las estrategias diferidas.
const TILE_MEMO_CAPACITY: usize = 8192;

/// Estrategia de indexado del mapper inverso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexStrategy {
    Full,
    Lazy,
    Hybrid,
}

impl Default for IndexStrategy {
    fn default() -> Self {
        Self::Hybrid
    }
}

/// Mitad de la configuración a la que apunta una referencia de trama.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrameClass {
    /// Plano de ruteo de la columna.
    Routing,
    /// Plano de lógica (solo columnas CLB).
    Logic,
    /// Plano de contenido BRAM.
    Content,
    /// Columnas de plano único (IOB, CLK).
    Unified,
}

/// Referencia a una trama que co-configura un recurso físico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameReference {
    pub far_value: u32,
    pub frame_class: FrameClass,
}

/// Mapper inverso recurso físico -> conjunto de FARs.
#[derive(Debug)]
pub struct ReverseMapper {
    strategy: IndexStrategy,
    column_index: Option<BTreeMap<u8, Vec<u32>>>,
    tile_index: Option<BTreeMap<String, Vec<FrameReference>>>,
    tile_memo: Mutex<BoundedMemo<String, Vec<FrameReference>>>,
}

impl Default for ReverseMapper {
    fn default() -> Self {
        Self::new(IndexStrategy::Hybrid)
    }
}

impl ReverseMapper {
    /// Construye el mapper con la estrategia indicada.
    #[instrument]
    #[must_use]
    pub fn new(strategy: IndexStrategy) -> Self {
        let column_index = match strategy {
            IndexStrategy::Full | IndexStrategy::Hybrid => Some(build_column_index()),
            IndexStrategy::Lazy => None,
        };
        let tile_index = match strategy {
            IndexStrategy::Full => Some(build_full_tile_index()),
            _ => None,
        };
        if let Some(index) = &tile_index {
            debug!("🧭 [REVERSE_INDEX]: full strategy resident with {} tiles", index.len());
        }
        Self {
            strategy,
            column_index,
            tile_index,
            tile_memo: Mutex::new(BoundedMemo::new(TILE_MEMO_CAPACITY)),
        }
    }

    /// Estrategia activa.
    #[must_use]
    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    /// FARs que configuran el tile nombrado.
    #[must_use]
    pub fn frames_for_tile(&self, tile_name: &str) -> Vec<FrameReference> {
        if let Some(index) = &self.tile_index {
            return index.get(tile_name).cloned().unwrap_or_default();
        }
        if let Ok(memo) = self.tile_memo.lock() {
            if let Some(resident) = memo.get(&tile_name.to_string()) {
                return resident;
            }
        }
        let references = parse_tile_name(tile_name)
            .map(|(_, column, row)| frames_for_coordinate(column, row))
            .unwrap_or_default();
        if let Ok(mut memo) = self.tile_memo.lock() {
            memo.insert(tile_name.to_string(), references.clone());
        }
        references
    }

    /// Solo las tramas de ruteo que configuran el tile.
    #[must_use]
    pub fn routing_frames_for_tile(&self, tile_name: &str) -> Vec<FrameReference> {
        self.frames_for_tile(tile_name)
            .into_iter()
            .filter(|reference| {
                matches!(reference.frame_class, FrameClass::Routing | FrameClass::Unified)
            })
            .collect()
    }

    /// Solo las tramas de lógica que configuran el tile.
    #[must_use]
    pub fn logic_frames_for_tile(&self, tile_name: &str) -> Vec<FrameReference> {
        self.frames_for_tile(tile_name)
            .into_iter()
            .filter(|reference| reference.frame_class == FrameClass::Logic)
            .collect()
    }

    /// FARs que configuran la coordenada (columna, fila).
    #[must_use]
    pub fn frames_for_coordinate(&self, column: u8, row: u32) -> Vec<FrameReference> {
        frames_for_coordinate(column, row)
    }

    /// Todos los FARs válidos de una columna mayor, ascendentes.
    #[must_use]
    pub fn frames_for_column(&self, column: u8) -> Vec<u32> {
        if let Some(index) = &self.column_index {
            return index.get(&column).cloned().unwrap_or_default();
        }
        enumerate_column_fars(column)
    }

    /// FARs de un sitio de hardware, resuelto a su tile por el modelo.
    #[must_use]
    pub fn frames_for_site(&self, model: &DeviceModel, site_name: &str) -> Vec<FrameReference> {
        model
            .site_by_name(site_name)
            .map(|site| self.frames_for_tile(&site.tile))
            .unwrap_or_default()
    }

    /**
     * Unión de FARs sobre una región rectangular (bordes inclusivos).
     * Idempotente e independiente del orden de recorrido.
     */
    #[must_use]
    pub fn frames_for_region(
        &self,
        column_range: (u8, u8),
        row_range: (u32, u32),
    ) -> BTreeSet<u32> {
        let mut union = BTreeSet::new();
        for column in column_range.0..=column_range.1 {
            for row in row_range.0..=row_range.1 {
                for reference in frames_for_coordinate(column, row) {
                    union.insert(reference.far_value);
                }
            }
        }
        union
    }

    /// Huella de configuración esperada de un conjunto de tiles usados.
    #[must_use]
    pub fn frames_for_used_tiles(&self, used_tiles: &BTreeSet<String>) -> BTreeSet<u32> {
        let mut footprint = BTreeSet::new();
        for tile_name in used_tiles {
            for reference in self.frames_for_tile(tile_name) {
                footprint.insert(reference.far_value);
            }
        }
        footprint
    }
}

/**
 * Cálculo inverso puro para una coordenada.
 *
 * Variantes de (mitad, minor): la lectura local a la mitad y, para
 * filas de la mitad superior, el alias de mitad inferior cuya franja
 * [minor*20, minor*20+20) también contiene la fila. Un minor fuera de
 * la capacidad de la columna se rechaza.
 */
#[must_use]
pub fn frames_for_coordinate(column: u8, row: u32) -> Vec<FrameReference> {
    let Some(descriptor) = column_descriptor(column) else {
        return Vec::new();
    };
    if row >= TILE_ROW_COUNT {
        return Vec::new();
    }

    let mut variants: Vec<(u8, u32)> = Vec::new();
    if row >= HALF_SPLIT_ROW {
        variants.push((1, (row - HALF_SPLIT_ROW) / ROWS_PER_FRAME));
        variants.push((0, row / ROWS_PER_FRAME));
    } else {
        variants.push((0, row / ROWS_PER_FRAME));
    }

    let mut references = Vec::new();
    for (top_bottom, minor) in variants {
        if minor >= descriptor.frames_per_column {
            continue;
        }
        match descriptor.column_type {
            ColumnType::Clb => {
                references.push(FrameReference {
                    far_value: encode_far(BlockType::Clb.code(), top_bottom, column, minor),
                    frame_class: FrameClass::Routing,
                });
                // El tile queda co-configurado por el plano de lógica
                // de su columna, desplazado tras la franja de ruteo.
                let logic_minor = descriptor.routing_frame_count + minor;
                if logic_minor < descriptor.frames_per_column {
                    references.push(FrameReference {
                        far_value: encode_far(BlockType::Clb.code(), top_bottom, column, logic_minor),
                        frame_class: FrameClass::Logic,
                    });
                }
            }
            ColumnType::Bram => {
                if minor < BRAM_CONTENT_FIRST_MINOR {
                    references.push(FrameReference {
                        far_value: encode_far(BlockType::BramInt.code(), top_bottom, column, minor),
                        frame_class: FrameClass::Routing,
                    });
                }
                let content_minor = minor + BRAM_CONTENT_FIRST_MINOR;
                if content_minor < descriptor.frames_per_column {
                    references.push(FrameReference {
                        far_value: encode_far(
                            BlockType::BramContent.code(),
                            top_bottom,
                            column,
                            content_minor,
                        ),
                        frame_class: FrameClass::Content,
                    });
                }
            }
            ColumnType::Iob => references.push(FrameReference {
                far_value: encode_far(BlockType::Iob.code(), top_bottom, column, minor),
                frame_class: FrameClass::Unified,
            }),
            ColumnType::Clk => references.push(FrameReference {
                far_value: encode_far(BlockType::Clk.code(), top_bottom, column, minor),
                frame_class: FrameClass::Unified,
            }),
        }
    }
    references
}

/// Todos los FARs válidos de una columna, bloque-calificados.
fn enumerate_column_fars(column: u8) -> Vec<u32> {
    let Some(descriptor) = column_descriptor(column) else {
        return Vec::new();
    };
    let mut fars = Vec::new();
    for top_bottom in 0..=1u8 {
        for minor in 0..descriptor.frames_per_column {
            if let Some(block) = block_type_for(column, minor) {
                fars.push(encode_far(block.code(), top_bottom, column, minor));
            }
        }
    }
    fars.sort_unstable();
    fars
}

/// Índice columna -> FARs válidos (pequeño; se paga siempre en Full
/// e Hybrid).
fn build_column_index() -> BTreeMap<u8, Vec<u32>> {
    (0..MAJOR_COLUMN_COUNT)
        .map(|column| (column, enumerate_column_fars(column)))
        .collect()
}

/// Índice completo tile -> referencias, construido en abanico por
/// columna y fusionado en orden determinista.
fn build_full_tile_index() -> BTreeMap<String, Vec<FrameReference>> {
    let per_column: Vec<BTreeMap<String, Vec<FrameReference>>> = (0u32..u32::from(MAJOR_COLUMN_COUNT))
        .into_par_iter()
        .map(|column| {
            let column = column as u8;
            let mut local: BTreeMap<String, Vec<FrameReference>> = BTreeMap::new();
            let Some(descriptor) = column_descriptor(column) else {
                return local;
            };
            for row in 0..TILE_ROW_COUNT {
                let references = frames_for_coordinate(column, row);
                if references.is_empty() {
                    continue;
                }
                for tile_type in descriptor.tile_type_names {
                    local.insert(compose_tile_name(tile_type, column, row), references.clone());
                }
            }
            local
        })
        .collect();

    let mut merged = BTreeMap::new();
    for local in per_column {
        merged.extend(local);
    }
    merged
}
