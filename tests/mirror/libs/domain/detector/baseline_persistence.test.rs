// [tests/mirror/libs/domain/detector/baseline_persistence.test.rs]
/**
 * =================================================================
 * APARATO: BASELINE PERSISTENCE TEST (V3.1 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L3-DETECTOR)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL CONTENEDOR SELLADO (LEY R3)
 *
 * Valida la cadena completa: construir -> cristalizar -> rehidratar
 * -> paridad estructural, más el rechazo de contenedores adulterados
 * (marca, versión, sello SHA-256).
 * =================================================================
 */

use centinela_core_bitstream::{BitstreamForge, BitstreamLoader};
use centinela_core_fabric::{encode_far, write_bit, FRAME_BYTE_COUNT};
use centinela_domain_detector::{DetectorError, GoldenBaseline, GoldenBaselineBuilder};

const DEVICE_NAME: &str = "xc5vlx50tff1136-2";

fn dense_frame() -> Vec<u8> {
    // Más del 1% de los 1312 bits encendidos: trama "ocupada".
    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    for offset in (0..100).map(|index| index * 13) {
        write_bit(&mut payload, offset, true).unwrap();
    }
    payload
}

fn forge_golden() -> Vec<u8> {
    let mut forge = BitstreamForge::new("golden_design", DEVICE_NAME)
        .with_build_stamp("2026/02/11", "09:15:00");
    forge.far_write(encode_far(0, 0, 1, 0));
    forge.queue_frame(&dense_frame());
    // Escritura transitoria al mismo FAR.
    forge.far_write(encode_far(0, 0, 1, 0));
    forge.queue_frame(&dense_frame());
    forge.far_write(encode_far(5, 0, 23, 1));
    forge.queue_frame(&dense_frame());
    forge.build()
}

fn build_baseline() -> GoldenBaseline {
    let loaded = BitstreamLoader::default()
        .load_bytes("golden.bit", &forge_golden(), Some("ab".repeat(32)))
        .unwrap();
    GoldenBaselineBuilder::new().build_from_loaded(&loaded, Some("golden_r3"), true).unwrap()
}

#[test]
fn certify_save_load_structural_parity() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating sealed save/load roundtrip (R3)...");

    let baseline = build_baseline();
    let workspace = tempfile::tempdir().unwrap();
    let snapshot_path = workspace.path().join("golden.baseline");

    baseline.save(&snapshot_path).unwrap();
    let rehydrated = GoldenBaseline::load(&snapshot_path).unwrap();

    // Paridad en todos los campos que consume el detector.
    assert_eq!(rehydrated.baseline_id, baseline.baseline_id);
    assert_eq!(rehydrated.expected_fars(), baseline.expected_fars());
    for far_value in baseline.expected_fars() {
        assert_eq!(rehydrated.payload(far_value), baseline.payload(far_value));
        assert_eq!(rehydrated.history(far_value), baseline.history(far_value));
    }
    assert_eq!(rehydrated.used_tiles(), baseline.used_tiles());
    assert_eq!(rehydrated.design_name, baseline.design_name);
    assert_eq!(rehydrated.source_sha256, baseline.source_sha256);
    assert_eq!(rehydrated.multi_write_far_count(), 1);
    assert!(rehydrated.validate().is_ok());
}

#[test]
fn certify_deterministic_build_property() {
    // Dos construcciones desde los mismos bytes: estructuralmente
    // iguales módulo marca temporal.
    let first = build_baseline();
    let second = build_baseline();
    assert_eq!(first.expected_fars(), second.expected_fars());
    assert_eq!(first.used_tiles(), second.used_tiles());
    for far_value in first.expected_fars() {
        assert_eq!(first.payload(far_value), second.payload(far_value));
        assert_eq!(first.history(far_value), second.history(far_value));
    }
}

#[test]
fn certify_tampered_body_breaks_the_seal() {
    let baseline = build_baseline();
    let workspace = tempfile::tempdir().unwrap();
    let snapshot_path = workspace.path().join("tampered.baseline");
    baseline.save(&snapshot_path).unwrap();

    // Voltea un byte del cuerpo, pasada la cabecera de 44 bytes.
    let mut container = std::fs::read(&snapshot_path).unwrap();
    let target = 44 + (container.len() - 44) / 2;
    container[target] ^= 0xFF;
    std::fs::write(&snapshot_path, &container).unwrap();

    assert!(matches!(
        GoldenBaseline::load(&snapshot_path),
        Err(DetectorError::BaselineSealBroken)
    ));
}

#[test]
fn certify_foreign_magic_and_version_are_rejected() {
    let baseline = build_baseline();
    let workspace = tempfile::tempdir().unwrap();

    let magic_path = workspace.path().join("foreign.baseline");
    baseline.save(&magic_path).unwrap();
    let mut container = std::fs::read(&magic_path).unwrap();
    container[0] = b'X';
    std::fs::write(&magic_path, &container).unwrap();
    assert!(matches!(
        GoldenBaseline::load(&magic_path),
        Err(DetectorError::BaselineMagicMismatch)
    ));

    let version_path = workspace.path().join("future.baseline");
    baseline.save(&version_path).unwrap();
    let mut container = std::fs::read(&version_path).unwrap();
    container[8] = 99;
    std::fs::write(&version_path, &container).unwrap();
    assert!(matches!(
        GoldenBaseline::load(&version_path),
        Err(DetectorError::BaselineVersionMismatch { found: 99, .. })
    ));
}

#[test]
fn certify_validation_rejects_corrupt_snapshots() {
    // Vacía: inaceptable.
    let empty = GoldenBaseline::new("empty");
    assert!(matches!(empty.validate(), Err(DetectorError::EmptyBaseline)));

    // Payload corto: violación de integridad.
    let mut short_frames = GoldenBaseline::new("short");
    short_frames.add_frame(encode_far(0, 0, 1, 0), vec![0u8; 100]);
    assert!(matches!(
        short_frames.validate(),
        Err(DetectorError::BaselineIntegrity { .. })
    ));
}

#[test]
fn certify_metadata_document_and_stripped_view() {
    let baseline = build_baseline();

    let metadata = baseline.metadata_document();
    assert_eq!(metadata.baseline_id, "golden_r3");
    assert_eq!(metadata.frame_count, 2);
    assert_eq!(metadata.multi_write_far_count, 1);
    assert!(metadata.used_tile_count > 0);

    // La vista sin payloads degrada frame_view (pasadas semánticas).
    let stripped = baseline.without_frame_data();
    assert!(stripped.frame_view().is_none());
    assert!(baseline.frame_view().is_some());
}
