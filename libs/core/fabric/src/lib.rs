// [libs/core/fabric/src/lib.rs]
/*!
 * =================================================================
 * APARATO: FABRIC GEOMETRY MASTER HUB (V3.0 - SILICON ALIGNED)
 * CLASIFICACIÓN: CORE FABRIC (ESTRATO L1)
 * RESPONSABILIDAD: VERDAD GEOMÉTRICA DEL VLX50T Y CÓDEC FAR
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE SOURCE OF TRUTH: La tabla de 48 columnas y los rangos de
 *    bits por bloque viven aquí y solo aquí; los estratos superiores
 *    (Mapping, Semantic, Detector) consultan sin duplicar constantes.
 * 2. NOMINAL PURITY: Erradicación total de abreviaciones en la API
 *    pública (far -> frame_address, tb -> top_bottom).
 * 3. DETERMINISMO: Todas las operaciones son puras; no existe estado
 *    global mutable en este estrato.
 * =================================================================
 */

/// Catálogo de fallos geométricos y de acceso a bits del tejido.
pub mod errors;
/// Códec del Frame Address Register (FAR) de 32 bits.
pub mod far;
/// Primitivas de acceso a bits MSB-first sobre tramas de 164 bytes.
pub mod frame_bits;
/// Tabla de columnas, tipos de bloque y orden de marcha del walker.
pub mod geometry;

pub use errors::FabricError;
pub use far::{decode_far, encode_far, validate_far, FarFields, FarFault};
pub use frame_bits::{
    count_set_bits, diff_bit_offsets, ensure_frame_length, extract_bit, extract_bits, extract_u64,
    extract_word, is_default_frame, write_bit,
};
pub use geometry::{
    block_type_for, column_descriptor, columns_for_block, frames_per_column, is_routing_minor,
    next_populated_block, walker_minor_range, BlockType, ColumnDescriptor, ColumnType,
    BRAM_CONTENT_FIRST_MINOR, FRAME_BIT_COUNT, FRAME_BYTE_COUNT, FRAME_WORD_COUNT,
    HALF_SPLIT_ROW, MAJOR_COLUMN_COUNT, ROWS_PER_FRAME, TILE_ROW_COUNT,
};
