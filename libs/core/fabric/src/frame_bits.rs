// [libs/core/fabric/src/frame_bits.rs]
/*!
 * =================================================================
 * APARATO: FRAME BIT PRIMITIVES (V3.0 - BIT-PERFECT)
 * CLASIFICACIÓN: CORE FABRIC (ESTRATO L1)
 * RESPONSABILIDAD: ACCESO MSB-FIRST A TRAMAS DE 164 BYTES
 *
 * Numeración de bits soberana: el offset 0 es el bit más significativo
 * del byte 0; el offset 7 es el menos significativo del byte 0; el
 * offset 8 es el más significativo del byte 1. Toda la semántica de
 * bits del sistema (PIPs, LUTs, FFs) se expresa en este orden.
 * =================================================================
 */

use byteorder::{BigEndian, ByteOrder};

use crate::errors::FabricError;
use crate::geometry::{FRAME_BYTE_COUNT, FRAME_WORD_COUNT};

/// Verifica que el payload mida los 164 bytes canónicos.
pub fn ensure_frame_length(payload: &[u8]) -> Result<(), FabricError> {
    if payload.len() != FRAME_BYTE_COUNT {
        return Err(FabricError::PayloadLengthViolation {
            expected: FRAME_BYTE_COUNT,
            actual: payload.len(),
        });
    }
    Ok(())
}

/// Extrae un bit individual (MSB-first dentro de cada byte).
pub fn extract_bit(payload: &[u8], bit_offset: usize) -> Result<bool, FabricError> {
    let limit = payload.len() * 8;
    if bit_offset >= limit {
        return Err(FabricError::BitOffsetOutOfRange { offset: bit_offset, limit });
    }
    let byte_index = bit_offset / 8;
    let bit_in_byte = 7 - (bit_offset % 8);
    Ok((payload[byte_index] >> bit_in_byte) & 1 == 1)
}

/// Escribe un bit individual, preservando el resto del payload.
pub fn write_bit(payload: &mut [u8], bit_offset: usize, value: bool) -> Result<(), FabricError> {
    let limit = payload.len() * 8;
    if bit_offset >= limit {
        return Err(FabricError::BitOffsetOutOfRange { offset: bit_offset, limit });
    }
    let byte_index = bit_offset / 8;
    let bit_in_byte = 7 - (bit_offset % 8);
    if value {
        payload[byte_index] |= 1 << bit_in_byte;
    } else {
        payload[byte_index] &= !(1 << bit_in_byte);
    }
    Ok(())
}

/**
 * Extrae el rango [start, end) como entero, primer bit en la posición
 * más significativa del resultado. El ancho máximo es 64 bits.
 */
pub fn extract_bits(payload: &[u8], start: usize, end: usize) -> Result<u64, FabricError> {
    if start >= end || end - start > 64 {
        return Err(FabricError::BitRangeViolation { start, end });
    }
    let mut value: u64 = 0;
    for bit_offset in start..end {
        value <<= 1;
        if extract_bit(payload, bit_offset)? {
            value |= 1;
        }
    }
    Ok(value)
}

/// Extrae 64 bits contiguos a partir de `start` (tablas de verdad LUT).
pub fn extract_u64(payload: &[u8], start: usize) -> Result<u64, FabricError> {
    extract_bits(payload, start, start + 64)
}

/// Lee la palabra de configuración `word_index` (big-endian).
pub fn extract_word(payload: &[u8], word_index: usize) -> Result<u32, FabricError> {
    if word_index >= FRAME_WORD_COUNT {
        return Err(FabricError::WordIndexOutOfRange {
            word_index,
            limit: FRAME_WORD_COUNT,
        });
    }
    let byte_offset = word_index * 4;
    if byte_offset + 4 > payload.len() {
        return Err(FabricError::PayloadLengthViolation {
            expected: FRAME_BYTE_COUNT,
            actual: payload.len(),
        });
    }
    Ok(BigEndian::read_u32(&payload[byte_offset..byte_offset + 4]))
}

/// Población de bits encendidos del payload completo.
#[must_use]
pub fn count_set_bits(payload: &[u8]) -> u32 {
    payload.iter().map(|byte| byte.count_ones()).sum()
}

/// El payload está en estado de reset (todo ceros).
#[must_use]
pub fn is_default_frame(payload: &[u8]) -> bool {
    payload.iter().all(|byte| *byte == 0)
}

/**
 * Offsets de bit en los que dos payloads difieren, en orden ascendente.
 *
 * Camino caliente del detector: el XOR por byte descarta de un golpe
 * los bytes idénticos antes de desplegar bits individuales.
 */
pub fn diff_bit_offsets(golden: &[u8], suspect: &[u8]) -> Result<Vec<u32>, FabricError> {
    if golden.len() != suspect.len() {
        return Err(FabricError::PayloadLengthViolation {
            expected: golden.len(),
            actual: suspect.len(),
        });
    }
    let mut offsets = Vec::new();
    for (byte_index, (golden_byte, suspect_byte)) in golden.iter().zip(suspect.iter()).enumerate() {
        let delta = golden_byte ^ suspect_byte;
        if delta == 0 {
            continue;
        }
        for bit_in_byte in 0..8u32 {
            if (delta >> (7 - bit_in_byte)) & 1 == 1 {
                offsets.push(byte_index as u32 * 8 + bit_in_byte);
            }
        }
    }
    Ok(offsets)
}
