// [libs/core/fabric/src/far.rs]
/*!
 * =================================================================
 * APARATO: FRAME ADDRESS REGISTER CODEC (V3.0 - SOBERANO)
 * CLASIFICACIÓN: CORE FABRIC (ESTRATO L1)
 * RESPONSABILIDAD: EMPAQUE, DECODIFICACIÓN Y VALIDACIÓN DEL FAR
 *
 * Disposición de campos sobre los 32 bits del registro:
 *
 *   block[31:29] | major[28:23] | top_bottom[22] | minor[16:0]
 *
 * El minor ocupa la variante ancha de 17 bits: las columnas BRAM del
 * VLX50T alcanzan el minor 91 y un campo de 5 bits no puede
 * representarlo. Los bits [21:17] quedan reservados en cero.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{
    block_type_for, frames_per_column, BlockType, MAJOR_COLUMN_COUNT,
};

const BLOCK_SHIFT: u32 = 29;
const MAJOR_SHIFT: u32 = 23;
const TOP_BOTTOM_SHIFT: u32 = 22;
const BLOCK_MASK: u32 = 0b111;
const MAJOR_MASK: u32 = 0b11_1111;
const MINOR_MASK: u32 = 0x0001_FFFF;

/// Campos decodificados de un Frame Address Register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarFields {
    /// Código de bloque de 3 bits (CLB, IOB, BRAM_*, CLK, ...).
    pub block_code: u8,
    /// Columna mayor (0..47 en este dispositivo).
    pub major: u8,
    /// Mitad del dado: 0 inferior, 1 superior.
    pub top_bottom: u8,
    /// Índice de trama dentro de la columna.
    pub minor: u32,
}

impl FarFields {
    /// Tipo de bloque declarado, si el código es legal.
    #[must_use]
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::from_code(self.block_code)
    }
}

/// Catálogo de violaciones de validación de un FAR.
///
/// Ninguna de estas es fatal para el léxico: la trama se emite con la
/// advertencia y el detector la escala a anomalía estructural.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FarFault {
    #[error("[L1_FAR_FAULT]: MAJOR_OUT_OF_RANGE -> column {major} exceeds device limit {limit}")]
    MajorOutOfRange { major: u8, limit: u8 },

    #[error("[L1_FAR_FAULT]: MINOR_OUT_OF_RANGE -> minor {minor} exceeds column {major} capacity {limit}")]
    MinorOutOfRange { major: u8, minor: u32, limit: u32 },

    #[error("[L1_FAR_FAULT]: BLOCK_TYPE_MISMATCH -> declared {declared} but column {major} minor {minor} expects {expected}")]
    BlockTypeMismatch {
        major: u8,
        minor: u32,
        declared: &'static str,
        expected: &'static str,
    },
}

/// Empaqueta los campos en el registro de 32 bits.
#[must_use]
pub fn encode_far(block_code: u8, top_bottom: u8, major: u8, minor: u32) -> u32 {
    (u32::from(block_code) & BLOCK_MASK) << BLOCK_SHIFT
        | (u32::from(major) & MAJOR_MASK) << MAJOR_SHIFT
        | (u32::from(top_bottom) & 0b1) << TOP_BOTTOM_SHIFT
        | (minor & MINOR_MASK)
}

/// Decodifica el registro en sus campos constituyentes.
#[must_use]
pub fn decode_far(raw: u32) -> FarFields {
    FarFields {
        block_code: ((raw >> BLOCK_SHIFT) & BLOCK_MASK) as u8,
        major: ((raw >> MAJOR_SHIFT) & MAJOR_MASK) as u8,
        top_bottom: ((raw >> TOP_BOTTOM_SHIFT) & 0b1) as u8,
        minor: raw & MINOR_MASK,
    }
}

/**
 * Valida los campos contra la tabla de columnas del dispositivo.
 *
 * Reporta la primera violación encontrada, en orden: columna fuera de
 * rango, minor fuera de capacidad, tipo de bloque en desacuerdo con la
 * partición de la columna.
 */
pub fn validate_far(fields: &FarFields) -> Result<(), FarFault> {
    if fields.major >= MAJOR_COLUMN_COUNT {
        return Err(FarFault::MajorOutOfRange {
            major: fields.major,
            limit: MAJOR_COLUMN_COUNT - 1,
        });
    }

    let limit = frames_per_column(fields.major).unwrap_or(0);
    if fields.minor >= limit {
        return Err(FarFault::MinorOutOfRange {
            major: fields.major,
            minor: fields.minor,
            limit,
        });
    }

    let expected = block_type_for(fields.major, fields.minor);
    let declared = fields.block_type();
    if expected != declared {
        return Err(FarFault::BlockTypeMismatch {
            major: fields.major,
            minor: fields.minor,
            declared: declared.map(BlockType::name).unwrap_or("UNKNOWN"),
            expected: expected.map(BlockType::name).unwrap_or("UNKNOWN"),
        });
    }

    Ok(())
}
