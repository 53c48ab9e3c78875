// [libs/core/bitstream/src/frame_write.rs]
/*!
 * =================================================================
 * APARATO: FRAME WRITE MODEL (V3.1)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: REPRESENTACIÓN DE UNA ESCRITURA DE TRAMA
 *
 * El tipo nace aquí, junto al léxico que lo produce; los estratos de
 * dominio lo consumen desde este núcleo, nunca al revés.
 * =================================================================
 */

use centinela_core_fabric::{decode_far, FarFields, FRAME_BYTE_COUNT};
use serde::{Deserialize, Serialize};

/// Una escritura de trama materializada desde el flujo de configuración.
///
/// El léxico produce la *secuencia completa* de escrituras en orden de
/// programa. Dos escrituras pueden compartir FAR: la efectiva es la
/// última, pero la historia entera se preserva porque una escritura
/// transitoria es en sí misma un vector de troyano.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameWrite {
    /// FAR crudo de 32 bits tal como quedó establecido para esta trama.
    pub far_value: u32,
    /// Campos decodificados del FAR.
    pub fields: FarFields,
    /// Contenido de la trama: exactamente 164 bytes.
    pub payload: Vec<u8>,
    /// Posición de esta escritura dentro del flujo (monótona creciente).
    pub index: usize,
    /// Advertencia de validación del FAR, si los campos no cuadran con
    /// la tabla de columnas. No fatal: el detector la escala.
    pub validation_warning: Option<String>,
}

impl FrameWrite {
    /// Construye una escritura decodificando el FAR crudo.
    #[must_use]
    pub fn new(far_value: u32, payload: Vec<u8>, index: usize) -> Self {
        Self {
            far_value,
            fields: decode_far(far_value),
            payload,
            index,
            validation_warning: None,
        }
    }

    /// FAR en notación hexadecimal canónica para reportes.
    #[must_use]
    pub fn far_hex(&self) -> String {
        format!("0x{:08X}", self.far_value)
    }

    /// El payload respeta el contrato de longitud de trama.
    #[must_use]
    pub fn has_canonical_length(&self) -> bool {
        self.payload.len() == FRAME_BYTE_COUNT
    }
}
