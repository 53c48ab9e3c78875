// [tests/mirror/libs/domain/detector/differential_scenarios.test.rs]
/**
 * =================================================================
 * APARATO: DIFFERENTIAL DETECTION SCENARIOS (V3.2 - END TO END)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L3-DETECTOR)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LOS ESCENARIOS CANÓNICOS
 *
 * Cada escenario forja contenedores completos, los pasa por el léxico
 * real y certifica el veredicto: identidad, piso de ruido, firma de
 * troyano de ruteo, reloj crítico, troyano transitorio, trama
 * removida, simetría estructural y determinismo.
 * =================================================================
 */

use centinela_core_bitstream::{BitstreamForge, BitstreamLoader, LoadedBitstream};
use centinela_core_fabric::{encode_far, write_bit, FRAME_BYTE_COUNT};
use centinela_domain_detector::{FrameDifferentialDetector, GoldenBaseline, GoldenBaselineBuilder};
use centinela_domain_models::{AnomalyType, Severity};

const DEVICE_NAME: &str = "xc5vlx50tff1136-2";

fn frame_with_bits(offsets: &[usize]) -> Vec<u8> {
    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    for &offset in offsets {
        write_bit(&mut payload, offset, true).unwrap();
    }
    payload
}

fn load(identifier: &str, container: &[u8]) -> LoadedBitstream {
    BitstreamLoader::default()
        .load_bytes(identifier, container, None)
        .expect("forged container must lex")
}

fn baseline_of(loaded: &LoadedBitstream) -> GoldenBaseline {
    GoldenBaselineBuilder::new()
        .build_from_loaded(loaded, None, false)
        .expect("baseline must build")
}

#[test]
fn scenario_identity_yields_clean_verdict() {
    println!("\n🧪 [PROVING_GROUNDS]: Scenario 1 - identity...");

    let mut forge = BitstreamForge::new("identity", DEVICE_NAME);
    forge.far_write(encode_far(0, 0, 1, 0));
    forge.queue_frame(&frame_with_bits(&[5]));
    forge.far_write(0x02A0_0000);
    forge.queue_frame(&frame_with_bits(&[10]));
    let container = forge.build();

    let golden = baseline_of(&load("golden.bit", &container));
    let suspect = load("suspect.bit", &container);

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    assert_eq!(report.len(), 0);
    assert_eq!(report.total_bits_changed, 0);
    assert_eq!(report.confidence, 0.0);
    assert!(!report.trojan_detected);
    assert!(report.summary.starts_with("Detection Report: NO SIGNIFICANT ANOMALIES"));
    assert_eq!(report.total_frames_compared, 4);
}

#[test]
fn scenario_single_bit_sits_below_noise_floor() {
    println!("\n🧪 [PROVING_GROUNDS]: Scenario 2 - noise floor boundary...");

    let far_value = encode_far(0, 0, 1, 5);
    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(far_value);
    golden_forge.queue_frame(&frame_with_bits(&[]));
    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(far_value);
    suspect_forge.queue_frame(&frame_with_bits(&[12]));

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    // 1 bit < piso de 5: ninguna anomalía.
    assert_eq!(report.len(), 0);
    assert!(!report.trojan_detected);

    // Cuatro bits siguen por debajo; cinco cruzan el piso.
    let mut four_forge = BitstreamForge::new("four", DEVICE_NAME);
    four_forge.far_write(far_value);
    four_forge.queue_frame(&frame_with_bits(&[10, 20, 30, 40]));
    let four = load("four.bit", &four_forge.build());
    assert_eq!(FrameDifferentialDetector::new().detect(&golden, &four).len(), 0);

    let mut five_forge = BitstreamForge::new("five", DEVICE_NAME);
    five_forge.far_write(far_value);
    five_forge.queue_frame(&frame_with_bits(&[10, 20, 30, 40, 50]));
    let five = load("five.bit", &five_forge.build());
    assert_eq!(FrameDifferentialDetector::new().detect(&golden, &five).len(), 1);
}

#[test]
fn scenario_five_bit_routing_change_is_trojan_signature() {
    println!("\n🧪 [PROVING_GROUNDS]: Scenario 3 - minimal footprint trojan...");

    let far_value = encode_far(0, 0, 1, 5);
    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(far_value);
    golden_forge.queue_frame(&frame_with_bits(&[]));
    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(far_value);
    suspect_forge.queue_frame(&frame_with_bits(&[10, 120, 300, 450, 600]));

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    assert_eq!(report.len(), 1);
    assert_eq!(report.total_bits_changed, 5);
    assert!(report.trojan_detected);

    let anomaly = &report.anomalies[0];
    assert_eq!(anomaly.anomaly_type, AnomalyType::RoutingChange);
    assert_eq!(anomaly.severity, Severity::Critical);
    assert!((anomaly.confidence_score - 0.90).abs() < 1e-9);
    assert!(anomaly.attack_vectors.iter().any(|v| v == "minimal_footprint_trojan"));
    assert!(anomaly.is_in_unused_region());
    assert!(report.summary.starts_with("Detection Report: TROJAN DETECTED"));
}

#[test]
fn scenario_clock_frame_modification_is_critical() {
    println!("\n🧪 [PROVING_GROUNDS]: Scenario 4 - clock tampering...");

    let clock_far = encode_far(5, 0, 23, 2);
    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(clock_far);
    golden_forge.queue_frame(&frame_with_bits(&[]));

    let twenty_bits: Vec<usize> = (0..20).map(|index| index * 7).collect();
    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(clock_far);
    suspect_forge.queue_frame(&frame_with_bits(&twenty_bits));

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    assert_eq!(report.len(), 1);

    let anomaly = &report.anomalies[0];
    assert_eq!(anomaly.anomaly_type, AnomalyType::ClockChange);
    assert_eq!(anomaly.severity, Severity::Critical);
    assert!((anomaly.confidence_score - 0.95).abs() < 1e-9);
    assert!(anomaly.attack_vectors.iter().any(|v| v == "clock_manipulation"));
    assert!(report.trojan_detected);
    assert!(report.summary.starts_with("Detection Report: TROJAN DETECTED"));
}

#[test]
fn scenario_transient_only_trojan_is_escalated() {
    println!("\n🧪 [PROVING_GROUNDS]: Scenario 5 - transient payload...");

    let far_value = encode_far(0, 0, 1, 0);
    let effective = frame_with_bits(&[3]);
    let hidden: Vec<usize> = (0..10).map(|index| 50 + index * 3).collect();
    let hidden_payload = frame_with_bits(&hidden);

    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(far_value);
    golden_forge.queue_frame(&effective);

    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(far_value);
    suspect_forge.queue_frame(&hidden_payload);
    suspect_forge.far_write(far_value);
    suspect_forge.queue_frame(&effective);

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());
    assert_eq!(suspect.payload(far_value).unwrap(), golden.payload(far_value).unwrap());

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    assert_eq!(report.len(), 1);

    let anomaly = &report.anomalies[0];
    assert!(anomaly.transient);
    assert!(anomaly.severity <= Severity::High, "transient must be at least HIGH");
    assert!(anomaly.confidence_score >= 0.80);
    assert!(anomaly.attack_vectors.iter().any(|v| v == "transient_payload"));
    assert!(anomaly.description.contains("transient write"));
    assert!(report.summary.contains("Transient write evidence"));
}

#[test]
fn scenario_removed_frame_is_low_severity() {
    println!("\n🧪 [PROVING_GROUNDS]: Scenario 6 - removed frame...");

    let shared_far = encode_far(0, 0, 1, 0);
    // Minor 9: franja vertical más allá del grid, sin tiles cubiertos;
    // la anomalía cae en la regla de trama removida, no en las de ruteo.
    let removed_far = encode_far(0, 0, 2, 9);

    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(shared_far);
    golden_forge.queue_frame(&frame_with_bits(&[7]));
    golden_forge.far_write(removed_far);
    golden_forge.queue_frame(&frame_with_bits(&[9, 11]));

    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(shared_far);
    suspect_forge.queue_frame(&frame_with_bits(&[7]));

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    assert_eq!(report.len(), 1);

    let anomaly = &report.anomalies[0];
    assert_eq!(anomaly.anomaly_type, AnomalyType::FrameRemoved);
    assert_eq!(anomaly.severity, Severity::Low);
    assert!((anomaly.confidence_score - 0.40).abs() < 1e-9);
    assert!(!report.trojan_detected);
    assert!(report.summary.starts_with("Detection Report: MODIFICATIONS DETECTED"));
}

#[test]
fn certify_structural_diff_symmetry() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating added/removed symmetry (P7)...");

    let shared = encode_far(0, 0, 1, 0);
    let only_in_a = encode_far(0, 0, 2, 0);
    let only_in_b = encode_far(0, 0, 3, 0);

    let mut forge_a = BitstreamForge::new("a", DEVICE_NAME);
    forge_a.far_write(shared);
    forge_a.queue_frame(&frame_with_bits(&[7]));
    forge_a.far_write(only_in_a);
    forge_a.queue_frame(&frame_with_bits(&[8]));

    let mut forge_b = BitstreamForge::new("b", DEVICE_NAME);
    forge_b.far_write(shared);
    forge_b.queue_frame(&frame_with_bits(&[7]));
    forge_b.far_write(only_in_b);
    forge_b.queue_frame(&frame_with_bits(&[9]));

    let loaded_a = load("a.bit", &forge_a.build());
    let loaded_b = load("b.bit", &forge_b.build());
    let baseline_a = baseline_of(&loaded_a);
    let baseline_b = baseline_of(&loaded_b);

    let detector = FrameDifferentialDetector::new();
    let forward = detector.detect(&baseline_a, &loaded_b);
    let backward = detector.detect(&baseline_b, &loaded_a);

    let added_forward: Vec<u32> = forward
        .anomalies_by_type(AnomalyType::FrameAdded)
        .iter()
        .map(|anomaly| anomaly.far_value)
        .collect();
    let removed_backward: Vec<u32> = backward
        .anomalies_by_type(AnomalyType::FrameRemoved)
        .iter()
        .map(|anomaly| anomaly.far_value)
        .collect();
    assert_eq!(added_forward, removed_backward);
    assert_eq!(added_forward, vec![only_in_b]);
}

#[test]
fn certify_detection_is_deterministic() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating run-to-run determinism (P10)...");

    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    for column in [1u8, 2, 3, 5] {
        let far_value = encode_far(0, 0, column, 1);
        golden_forge.far_write(far_value);
        golden_forge.queue_frame(&frame_with_bits(&[usize::from(column)]));
        suspect_forge.far_write(far_value);
        suspect_forge.queue_frame(&frame_with_bits(&[
            usize::from(column),
            100,
            200,
            300,
            400,
            500,
        ]));
    }

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());

    let detector = FrameDifferentialDetector::new();
    let first = detector.detect(&golden, &suspect);
    let second = detector.detect(&golden, &suspect);

    assert_eq!(first.anomalies, second.anomalies);
    assert_eq!(first.summary, second.summary);
    let ids: Vec<&str> = first.anomalies.iter().map(|a| a.anomaly_id.as_str()).collect();
    let mut sorted_ids = ids.clone();
    sorted_ids.sort_unstable();
    assert_eq!(ids, sorted_ids, "anomalies must arrive in stable FAR order");
}

#[test]
fn certify_added_frame_with_block_mismatch_carries_warning() {
    // Una trama con bloque en desacuerdo con su columna llega como
    // FRAME_ADDED portando la advertencia de validación.
    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(encode_far(0, 0, 1, 0));
    golden_forge.queue_frame(&frame_with_bits(&[7]));

    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(encode_far(0, 0, 1, 0));
    suspect_forge.queue_frame(&frame_with_bits(&[7]));
    suspect_forge.far_write(encode_far(3, 0, 4, 30));
    suspect_forge.queue_frame(&frame_with_bits(&[1, 2, 3]));

    let golden = baseline_of(&load("golden.bit", &golden_forge.build()));
    let suspect = load("suspect.bit", &suspect_forge.build());

    let report = FrameDifferentialDetector::new().detect(&golden, &suspect);
    let added = report.anomalies_by_type(AnomalyType::FrameAdded);
    assert_eq!(added.len(), 1);
    assert!(added[0].suspicion_reason.contains("BLOCK_TYPE_MISMATCH"));
    assert_eq!(added[0].bits_changed, 3);
}
