// [libs/domain/device/src/errors.rs]
/*!
 * =================================================================
 * APARATO: DEVICE ERROR CATALOG (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN DEVICE (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DEL MODELO ESTÁTICO
 *
 * Un modelo de dispositivo inconsistente es fatal: datos estáticos
 * corruptos no pueden sostener detecciones confiables.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    /// Fallo físico de lectura de un archivo del bundle.
    #[error("[L2_DEVICE_FAULT]: BUNDLE_IO_SEVERED -> {path}: {source}")]
    BundleIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON malformado o con esquema divergente.
    #[error("[L2_DEVICE_FAULT]: BUNDLE_SCHEMA_DRIFT -> {path}: {source}")]
    BundleSchema {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Referencias colgantes o tipos no registrados en el bundle.
    /// Porta la lista completa de violaciones para el triaje.
    #[error("[L2_DEVICE_FAULT]: CONSISTENCY_VIOLATION -> {} dangling reference(s); first: {}", violations.len(), violations.first().map(String::as_str).unwrap_or("none"))]
    ConsistencyViolation { violations: Vec<String> },
}
