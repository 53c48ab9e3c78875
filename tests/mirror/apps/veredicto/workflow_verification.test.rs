// [tests/mirror/apps/veredicto/workflow_verification.test.rs]
/**
 * =================================================================
 * APARATO: WORKFLOW VERIFICATION TEST (V3.0 - END TO END)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L5-SHELL)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL FLUJO FORJA -> VEREDICTO
 * =================================================================
 */

use std::path::PathBuf;

use centinela_core_bitstream::BitstreamForge;
use centinela_core_fabric::{encode_far, write_bit, FRAME_BYTE_COUNT};
use centinela_veredicto_lib::{
    create_baseline, inspect_bitstream, quick_compare, render_text_report, run_detection,
};

const DEVICE_NAME: &str = "xc5vlx50tff1136-2";

fn frame_with_bits(offsets: &[usize]) -> Vec<u8> {
    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    for &offset in offsets {
        write_bit(&mut payload, offset, true).unwrap();
    }
    payload
}

fn write_container(directory: &std::path::Path, name: &str, container: &[u8]) -> PathBuf {
    let path = directory.join(name);
    std::fs::write(&path, container).unwrap();
    path
}

fn forge_pair(directory: &std::path::Path) -> (PathBuf, PathBuf) {
    let far_value = encode_far(0, 0, 1, 5);

    let mut golden_forge = BitstreamForge::new("legit_design", DEVICE_NAME);
    golden_forge.far_write(far_value);
    golden_forge.queue_frame(&frame_with_bits(&[]));

    let mut suspect_forge = BitstreamForge::new("legit_design", DEVICE_NAME);
    suspect_forge.far_write(far_value);
    suspect_forge.queue_frame(&frame_with_bits(&[10, 120, 300, 450, 600]));

    (
        write_container(directory, "golden.bit", &golden_forge.build()),
        write_container(directory, "suspect.bit", &suspect_forge.build()),
    )
}

#[test]
fn certify_end_to_end_detection_workflow() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating forge -> verdict pipeline...");

    let workspace = tempfile::tempdir().unwrap();
    let (golden_path, suspect_path) = forge_pair(workspace.path());
    let output_root = workspace.path().join("reports");

    let outcome = run_detection(&golden_path, &suspect_path, None, false, &output_root).unwrap();

    assert!(outcome.report.trojan_detected);
    assert_eq!(outcome.report.len(), 1);
    assert!(outcome.output_directory.starts_with(&output_root));
    for path in outcome.saved_files.values() {
        assert!(path.exists(), "missing artifact {}", path.display());
    }

    let rendered = render_text_report(&outcome.report);
    assert!(rendered.contains("TROJAN DETECTED"));
    assert!(rendered.contains("minimal_footprint_trojan"));

    let json_raw = std::fs::read_to_string(&outcome.saved_files["json"]).unwrap();
    let document: serde_json::Value = serde_json::from_str(&json_raw).unwrap();
    assert_eq!(document["metadata"]["trojan_detected"], serde_json::Value::Bool(true));
}

#[test]
fn certify_baseline_workflow_and_snapshot_reuse() {
    let workspace = tempfile::tempdir().unwrap();
    let (golden_path, suspect_path) = forge_pair(workspace.path());
    let baseline_root = workspace.path().join("baselines");

    let baseline_outcome = create_baseline(&golden_path, &baseline_root).unwrap();
    assert!(baseline_outcome.snapshot_path.exists());
    assert!(baseline_outcome.metadata_path.exists());
    assert_eq!(baseline_outcome.baseline.len(), 1);

    // El snapshot sellado sirve de dorado para una detección posterior.
    let report_root = workspace.path().join("reports");
    let outcome = run_detection(
        &baseline_outcome.snapshot_path,
        &suspect_path,
        None,
        false,
        &report_root,
    )
    .unwrap();
    assert!(outcome.report.trojan_detected);
}

#[test]
fn certify_quick_and_inspect_workflows() {
    let workspace = tempfile::tempdir().unwrap();
    let (golden_path, suspect_path) = forge_pair(workspace.path());

    let comparison = quick_compare(&golden_path, &suspect_path).unwrap();
    assert_eq!(comparison.common_frames, 1);
    assert_eq!(comparison.data_differences, 1);

    let info = inspect_bitstream(&golden_path).unwrap();
    assert_eq!(info.design_name, "legit_design");
    assert_eq!(info.device_name, DEVICE_NAME);
    assert_eq!(info.unique_far_count, 1);
    assert!(info.sha256.is_some());
}
