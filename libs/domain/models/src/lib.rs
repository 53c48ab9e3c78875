// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DETECTOR DOMAIN MODELS BARREL (V3.1 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DE TIPOS DE ANOMALÍA Y REPORTE
 * =================================================================
 */

pub mod anomaly;
pub mod cluster;
pub mod report;

pub use anomaly::{AnomalyRecord, AnomalyType, FrameAnomaly, Severity};
pub use cluster::{cluster_anomalies, AnomalyCluster};
pub use report::{AnomalyReport, ReportDocument, ReportMetadata, ReportStatistics};
