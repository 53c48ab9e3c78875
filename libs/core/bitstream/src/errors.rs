// [libs/core/bitstream/src/errors.rs]
/*!
 * =================================================================
 * APARATO: BITSTREAM ERROR CATALOG (V3.0 - SOBERANO)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE FORMATO
 *
 * Todos los fallos de este catálogo son fatales en la frontera del
 * léxico: una trama truncada o un walker desbordado invalidan la
 * evidencia completa. Los fallos de validación de FAR NO viven aquí;
 * viajan como advertencias sobre la escritura emitida.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BitstreamError {
    /// Fallo físico de lectura del contenedor.
    #[error("[L1_BITSTREAM_FAULT]: CONTAINER_IO_SEVERED -> {0}")]
    Io(#[from] std::io::Error),

    /// Registro TLV de cabecera truncado o inconsistente.
    #[error("[L1_BITSTREAM_FAULT]: MALFORMED_HEADER -> TLV record truncated at byte offset {offset}")]
    MalformedHeader { offset: usize },

    /// El contenedor no contiene el marcador AA 99 55 66.
    #[error("[L1_BITSTREAM_FAULT]: MISSING_SYNC -> sync marker AA995566 absent from container")]
    MissingSync,

    /// Un paquete declara más palabras de las que quedan en el flujo.
    #[error("[L1_BITSTREAM_FAULT]: TRUNCATED_PACKET -> packet body exceeds stream at byte offset {offset}")]
    TruncatedPacket { offset: usize },

    /// Cuerpo FDRI que no es múltiplo de 41 palabras.
    #[error("[L1_BITSTREAM_FAULT]: UNALIGNED_FRAME -> FDRI body of {word_count} words is not a multiple of 41")]
    UnalignedFrame { word_count: usize },

    /// Ráfaga FDRI sin escritura previa al registro FAR.
    #[error("[L1_BITSTREAM_FAULT]: FDRI_BEFORE_FAR -> frame data at byte offset {offset} with no established frame address")]
    FdriBeforeFar { offset: usize },

    /// El bloque inicial del walker no posee columnas en este dispositivo.
    #[error("[L1_BITSTREAM_FAULT]: WALKER_START_VOID -> block code {block_code} owns no columns on this device")]
    WalkerStart { block_code: u8 },

    /// El fusible de iteraciones del walker se agotó (4N + 1000).
    #[error("[L1_BITSTREAM_FAULT]: WALKER_OVERFLOW -> generated {created} of {expected} frames before the safety fuse blew")]
    WalkerOverflow { created: usize, expected: usize },

    /// Una trama materializada no mide 164 bytes. Solo puede surgir de
    /// un defecto del propio léxico; se trata como fatal.
    #[error("[L1_BITSTREAM_FAULT]: PAYLOAD_LENGTH_VIOLATION -> frame 0x{far:08X} carries {actual} bytes instead of 164")]
    PayloadLengthViolation { far: u32, actual: usize },
}
