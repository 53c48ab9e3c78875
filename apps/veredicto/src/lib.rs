// [apps/veredicto/src/lib.rs]
/*!
 * =================================================================
 * APARATO: VEREDICTO WORKFLOW LIBRARY (V3.0)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L5)
 * RESPONSABILIDAD: ORQUESTACIÓN DE FLUJOS Y RENDERIZADO DE REPORTES
 *
 * El binario es un orquestador puro y ligero; la lógica de flujo vive
 * en esta librería para permitir su auditoría en el Proving Grounds.
 * =================================================================
 */

pub mod render;
pub mod workflows;

pub use render::{create_unique_output_directory, render_text_report, save_report_formats};
pub use workflows::{
    create_baseline, inspect_bitstream, quick_compare, run_detection, BaselineOutcome,
    DetectionOutcome,
};
