// [apps/veredicto/src/render.rs]
/*!
 * =================================================================
 * APARATO: REPORT RENDERER (V3.0)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L5)
 * RESPONSABILIDAD: REPORTE ESTRUCTURADO -> TEXTO Y JSON EN DISCO
 *
 * El núcleo emite un valor estructurado; aquí se vuelve artefacto de
 * operador: resumen de texto plano y documento JSON embellecido en un
 * directorio de salida único con marca temporal.
 * =================================================================
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use centinela_domain_models::AnomalyReport;
use chrono::Utc;

/// Crea un subdirectorio único `{prefix}_{timestamp}[_{nn}]`.
pub fn create_unique_output_directory(parent: &Path, prefix: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(parent)
        .with_context(|| format!("cannot prepare output root {}", parent.display()))?;

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let safe_prefix = prefix.replace(['/', '\\', ' '], "_");
    let mut candidate = parent.join(format!("{safe_prefix}_{timestamp}"));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = parent.join(format!("{safe_prefix}_{timestamp}_{counter:02}"));
        counter += 1;
    }
    std::fs::create_dir_all(&candidate)
        .with_context(|| format!("cannot create output directory {}", candidate.display()))?;
    Ok(candidate)
}

/// Renderiza el reporte como texto plano de operador.
#[must_use]
pub fn render_text_report(report: &AnomalyReport) -> String {
    let mut lines = Vec::new();
    lines.push("=".repeat(70));
    lines.push("CENTINELA - FPGA Hardware Trojan Detection Report".to_string());
    lines.push("=".repeat(70));
    lines.push(report.summary.clone());
    lines.push(String::new());

    if !report.anomalies.is_empty() {
        lines.push("Anomalies (most severe first):".to_string());
        let mut ordered: Vec<_> = report.anomalies.iter().collect();
        ordered.sort_by_key(|anomaly| (anomaly.severity, anomaly.far_value));
        for anomaly in ordered {
            lines.push(format!("  {}", anomaly.summary_line()));
            if !anomaly.suspicion_reason.is_empty() {
                lines.push(format!("      reason: {}", anomaly.suspicion_reason));
            }
            if !anomaly.attack_vectors.is_empty() {
                lines.push(format!("      vectors: {}", anomaly.attack_vectors.join(", ")));
            }
        }
        lines.push(String::new());
    }

    lines.push("=".repeat(70));
    lines.join("\n")
}

/**
 * Escribe el reporte en texto y JSON. Retorna formato -> ruta.
 */
pub fn save_report_formats(
    report: &AnomalyReport,
    output_directory: &Path,
    base_name: &str,
) -> anyhow::Result<BTreeMap<String, PathBuf>> {
    let mut saved_files = BTreeMap::new();

    let text_path = output_directory.join(format!("{base_name}.txt"));
    std::fs::write(&text_path, render_text_report(report))
        .with_context(|| format!("cannot write {}", text_path.display()))?;
    saved_files.insert("text".to_string(), text_path);

    let json_path = output_directory.join(format!("{base_name}.json"));
    let document = serde_json::to_string_pretty(&report.to_document())
        .context("report document serialization collapsed")?;
    std::fs::write(&json_path, document)
        .with_context(|| format!("cannot write {}", json_path.display()))?;
    saved_files.insert("json".to_string(), json_path);

    Ok(saved_files)
}
