// [libs/core/fabric/src/errors.rs]
/*!
 * =================================================================
 * APARATO: FABRIC ERROR CATALOG (V3.0 - SOBERANO)
 * CLASIFICACIÓN: CORE FABRIC (ESTRATO L1)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS GEOMÉTRICOS
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FabricError {
    /// Acceso a un bit fuera del espacio de la trama (0..1312).
    #[error("[L1_FABRIC_FAULT]: BIT_OFFSET_OUT_OF_RANGE -> offset {offset} exceeds {limit} bits")]
    BitOffsetOutOfRange { offset: usize, limit: usize },

    /// Rango de bits degenerado o que desborda 64 bits de ancho.
    #[error("[L1_FABRIC_FAULT]: BIT_RANGE_VIOLATION -> [{start}, {end}) is not a legal extraction window")]
    BitRangeViolation { start: usize, end: usize },

    /// Índice de palabra fuera de la trama de 41 palabras.
    #[error("[L1_FABRIC_FAULT]: WORD_INDEX_OUT_OF_RANGE -> word {word_index} exceeds {limit} words")]
    WordIndexOutOfRange { word_index: usize, limit: usize },

    /// El payload no mide los 164 bytes canónicos de una trama Virtex-5.
    #[error("[L1_FABRIC_FAULT]: PAYLOAD_LENGTH_VIOLATION -> expected {expected} bytes, observed {actual}")]
    PayloadLengthViolation { expected: usize, actual: usize },

    /// Nombre de LUT fuera del alfabeto A..D.
    #[error("[L1_FABRIC_FAULT]: UNKNOWN_LUT_NAME -> '{0}' is not one of A, B, C, D")]
    UnknownLutName(char),
}
