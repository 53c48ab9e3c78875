// [libs/domain/detector/src/errors.rs]
/*!
 * =================================================================
 * APARATO: DETECTOR ERROR CATALOG (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE LÍNEA BASE Y DETECCIÓN
 * =================================================================
 */

use centinela_core_bitstream::BitstreamError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    /// Fallo físico de lectura/escritura de un snapshot de línea base.
    #[error("[L3_DETECTOR_FAULT]: BASELINE_IO_SEVERED -> {path}: {source}")]
    BaselineIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// La codificación binaria del snapshot colapsó.
    #[error("[L3_DETECTOR_FAULT]: BASELINE_ENCODING_COLLAPSE -> {0}")]
    BaselineEncoding(#[from] bincode::Error),

    /// El archivo no porta la marca de contenedor de línea base.
    #[error("[L3_DETECTOR_FAULT]: BASELINE_MAGIC_MISMATCH -> not a sealed baseline container")]
    BaselineMagicMismatch,

    /// Versión de formato no soportada por este binario.
    #[error("[L3_DETECTOR_FAULT]: BASELINE_VERSION_MISMATCH -> found {found}, this build understands {expected}")]
    BaselineVersionMismatch { found: u32, expected: u32 },

    /// El sello SHA-256 del cuerpo no coincide: snapshot adulterado o
    /// corrupto. Jamás se entrega una línea base sin sello íntegro.
    #[error("[L3_DETECTOR_FAULT]: BASELINE_SEAL_BROKEN -> body digest does not match the recorded seal")]
    BaselineSealBroken,

    /// Una línea base sin tramas no puede sostener detecciones.
    #[error("[L3_DETECTOR_FAULT]: EMPTY_BASELINE -> no frames captured from the golden source")]
    EmptyBaseline,

    /// Violaciones internas del snapshot (longitudes, FARs inválidos).
    #[error("[L3_DETECTOR_FAULT]: BASELINE_INTEGRITY_VIOLATION -> {} issue(s); first: {}", violations.len(), violations.first().map(String::as_str).unwrap_or("none"))]
    BaselineIntegrity { violations: Vec<String> },

    /// Fallo fatal del léxico durante la construcción de la línea base.
    #[error(transparent)]
    Bitstream(#[from] BitstreamError),
}
