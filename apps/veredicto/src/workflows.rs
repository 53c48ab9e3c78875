// [apps/veredicto/src/workflows.rs]
/*!
 * =================================================================
 * APARATO: DETECTION WORKFLOWS (V3.1)
 * CLASIFICACIÓN: APPLICATION LAYER (ESTRATO L5)
 * RESPONSABILIDAD: FLUJOS DE LÍNEA BASE, DETECCIÓN E INSPECCIÓN
 * =================================================================
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use centinela_core_bitstream::{BitstreamInfo, BitstreamLoader, QuickComparison};
use centinela_domain_detector::{
    EnhancedDifferentialDetector, FrameDifferentialDetector, GoldenBaseline,
    GoldenBaselineBuilder,
};
use centinela_domain_device::{DeviceDataPaths, DeviceModel};
use centinela_domain_models::AnomalyReport;
use tracing::{info, warn};

use crate::render::{create_unique_output_directory, save_report_formats};

/// Extensión de los snapshots sellados de línea base.
const BASELINE_EXTENSION: &str = "baseline";

/// Resultado detallado de una corrida de detección.
pub struct DetectionOutcome {
    pub report: AnomalyReport,
    pub output_directory: PathBuf,
    pub saved_files: BTreeMap<String, PathBuf>,
}

/// Resultado de la creación de una línea base.
pub struct BaselineOutcome {
    pub baseline: GoldenBaseline,
    pub output_directory: PathBuf,
    pub snapshot_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// El dorado puede llegar como `.bit` o como snapshot `.baseline`.
fn load_golden(golden_path: &Path) -> anyhow::Result<GoldenBaseline> {
    let is_snapshot = golden_path
        .extension()
        .map(|extension| extension.eq_ignore_ascii_case(BASELINE_EXTENSION))
        .unwrap_or(false);

    if is_snapshot {
        GoldenBaseline::load(golden_path)
            .with_context(|| format!("cannot hydrate baseline {}", golden_path.display()))
    } else {
        GoldenBaselineBuilder::new()
            .build_from_path(golden_path, None, true)
            .with_context(|| format!("cannot build baseline from {}", golden_path.display()))
    }
}

/**
 * Flujo completo de detección: carga, compara, renderiza y archiva.
 * Con `--enhanced` y un bundle de dispositivo, corre además las
 * pasadas semánticas de ruteo y lógica.
 */
pub fn run_detection(
    golden_path: &Path,
    suspect_path: &Path,
    device_data_directory: Option<&Path>,
    enhanced: bool,
    output_root: &Path,
) -> anyhow::Result<DetectionOutcome> {
    let golden = load_golden(golden_path)?;
    let suspect = BitstreamLoader::default()
        .load(suspect_path)
        .with_context(|| format!("cannot load suspect {}", suspect_path.display()))?;

    let report = if enhanced {
        let Some(device_directory) = device_data_directory else {
            bail!("enhanced detection requires --device-data with the six-file JSON bundle");
        };
        let model = DeviceModel::from_bundle(&DeviceDataPaths::from_directory(device_directory))
            .context("device model rejected; cannot run semantic passes on untrusted data")?;
        EnhancedDifferentialDetector::new(&model).detect_enhanced(&golden, &suspect)
    } else {
        if device_data_directory.is_some() {
            warn!("ℹ️ [WORKFLOW]: device bundle provided but --enhanced not set; running base detection");
        }
        FrameDifferentialDetector::new().detect(&golden, &suspect)
    };

    let suspect_stem = suspect_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "suspect".to_string());
    let output_directory =
        create_unique_output_directory(output_root, &format!("report_{suspect_stem}"))?;
    let saved_files = save_report_formats(&report, &output_directory, "trojan_detection_report")?;

    info!(
        "📑 [WORKFLOW]: detection archived under {} ({} anomalies)",
        output_directory.display(),
        report.len()
    );
    Ok(DetectionOutcome { report, output_directory, saved_files })
}

/**
 * Construye una línea base dorada y la cristaliza: snapshot sellado
 * más sidecar JSON de metadatos para inspección del operador.
 */
pub fn create_baseline(golden_path: &Path, output_root: &Path) -> anyhow::Result<BaselineOutcome> {
    let baseline = GoldenBaselineBuilder::new()
        .build_from_path(golden_path, None, true)
        .with_context(|| format!("cannot build baseline from {}", golden_path.display()))?;

    let output_directory =
        create_unique_output_directory(output_root, &format!("baseline_{}", baseline.baseline_id))?;

    let snapshot_path = output_directory.join("golden.baseline");
    baseline.save(&snapshot_path).context("baseline snapshot crystallization failed")?;

    let metadata_path = output_directory.join("golden_baseline_info.json");
    let metadata = serde_json::to_string_pretty(&baseline.metadata_document())
        .context("baseline metadata serialization collapsed")?;
    std::fs::write(&metadata_path, metadata)
        .with_context(|| format!("cannot write {}", metadata_path.display()))?;

    Ok(BaselineOutcome { baseline, output_directory, snapshot_path, metadata_path })
}

/// Comparación estructural rápida sin detector.
pub fn quick_compare(golden_path: &Path, suspect_path: &Path) -> anyhow::Result<QuickComparison> {
    BitstreamLoader::default()
        .compare_quick(golden_path, suspect_path)
        .context("quick comparison failed")
}

/// Inspección de metadatos y censo de un contenedor.
pub fn inspect_bitstream(bitstream_path: &Path) -> anyhow::Result<BitstreamInfo> {
    let loaded = BitstreamLoader::default()
        .load(bitstream_path)
        .with_context(|| format!("cannot load {}", bitstream_path.display()))?;
    Ok(loaded.info)
}
