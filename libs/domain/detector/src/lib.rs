// [libs/domain/detector/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DIFFERENTIAL DETECTOR BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN DETECTOR (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN DE LÍNEA BASE Y MOTORES DE DETECCIÓN
 * =================================================================
 */

pub mod baseline;
pub mod builder;
pub mod differential;
pub mod enhanced;
pub mod errors;
pub mod severity;

pub use baseline::{BaselineMetadata, GoldenBaseline};
pub use builder::{BaselineComparison, GoldenBaselineBuilder};
pub use differential::{FrameDifferentialDetector, SIGNIFICANCE_NOISE_FLOOR};
pub use enhanced::EnhancedDifferentialDetector;
pub use errors::DetectorError;
pub use severity::{assess_severity, severity_rules, SeverityRule};
