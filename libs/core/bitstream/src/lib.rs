// [libs/core/bitstream/src/lib.rs]
/*!
 * =================================================================
 * APARATO: BITSTREAM LEXER MASTER HUB (V3.0 - SILICON ALIGNED)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: CONTENEDOR .BIT -> BITÁCORA ORDENADA DE ESCRITURAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EVIDENCE PRESERVATION: Cada escritura de trama se conserva en
 *    orden de programa, incluidas las intermedias a un mismo FAR; una
 *    escritura transitoria es evidencia de troyano, no ruido.
 * 2. FAIL-CLOSED: Los errores de formato son tipificados y fatales;
 *    jamás se devuelve un bitstream parcial.
 * 3. DETERMINISMO: La misma entrada de bytes produce la misma
 *    bitácora, byte a byte, en toda corrida.
 * =================================================================
 */

/// Catálogo de fallos de formato del contenedor.
pub mod errors;
/// Forja determinista de bitstreams sintéticos para el Proving Grounds.
pub mod forge;
/// Modelo de una escritura de trama, producido por el léxico.
pub mod frame_write;
/// Léxico de la cabecera TLV previa al marcador de sincronía.
pub mod header;
/// Léxico del flujo de paquetes de configuración post-sync.
pub mod lexer;
/// Bitstream cargado con índices por FAR, columna y bloque.
pub mod loaded;
/// Cargador de archivos con procedencia SHA-256 y comparación rápida.
pub mod loader;
/// Gramática de paquetes Tipo-1 / Tipo-2.
pub mod packets;
/// Walker de avance de FAR durante ráfagas FDRI.
pub mod walker;

pub use errors::BitstreamError;
pub use forge::BitstreamForge;
pub use frame_write::FrameWrite;
pub use header::BitstreamHeader;
pub use lexer::BitstreamLexer;
pub use loaded::{BitstreamInfo, LoadedBitstream};
pub use loader::{BitstreamLoader, QuickComparison};

/// Marcador de sincronía que separa cabecera y flujo de configuración.
pub const SYNC_MARKER: [u8; 4] = [0xAA, 0x99, 0x55, 0x66];
