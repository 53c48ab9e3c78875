// [tests/mirror/libs/domain/mapping/forward_coverage_integrity.test.rs]
/**
 * =================================================================
 * APARATO: FORWARD COVERAGE INTEGRITY TEST (V3.1 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MAPPING)
 * RESPONSABILIDAD: CERTIFICACIÓN DE CATEGORÍAS, RIESGO Y REGIONES
 * =================================================================
 */

use centinela_core_fabric::encode_far;
use centinela_domain_mapping::{FrameMapper, ResourceCategory, TrojanRiskLevel};

#[test]
fn certify_clb_routing_frame_coverage() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating CLB routing coverage...");

    let mapper = FrameMapper::new();
    let coverage = mapper.coverage(encode_far(0, 0, 1, 5));

    assert!(coverage.is_valid);
    assert!(coverage.is_routing_frame());
    assert!(!coverage.is_logic_frame());
    assert_eq!(
        coverage.resource_categories,
        vec![ResourceCategory::Routing, ResourceCategory::Control]
    );
    assert_eq!(coverage.y_range, (100, 120));
    // CLBLL + INT por 20 filas cada uno.
    assert_eq!(coverage.tiles_affected.len(), 40);
    assert!(coverage.tiles_affected.contains(&"CLBLL_X1Y100".to_string()));
    assert!(coverage.tiles_affected.contains(&"INT_X1Y119".to_string()));
    assert_eq!(coverage.trojan_risk_level, TrojanRiskLevel::High);
    assert!(coverage.attack_vectors.iter().any(|v| v == "minimal_modification_trojan"));
}

#[test]
fn certify_routing_logic_minor_boundary() {
    let mapper = FrameMapper::new();
    // Minor 21 es la última trama de ruteo; 22 es la primera de lógica.
    let last_routing = mapper.coverage(encode_far(0, 0, 1, 21));
    assert!(last_routing.is_routing_frame());
    assert!(!last_routing.is_logic_frame());

    let first_logic = mapper.coverage(encode_far(0, 0, 1, 22));
    assert!(first_logic.is_logic_frame());
    assert!(!first_logic.is_routing_frame());
    assert_eq!(first_logic.trojan_risk_level, TrojanRiskLevel::Medium);
    // El plano de lógica cubre las mismas filas que su plano de ruteo.
    assert_eq!(first_logic.y_range, (0, 20));
}

#[test]
fn certify_top_half_starts_at_row_80() {
    let mapper = FrameMapper::new();
    let coverage = mapper.coverage(encode_far(0, 1, 1, 0));
    assert_eq!(coverage.y_range, (80, 100));
    assert!(coverage.tiles_affected.contains(&"CLBLL_X1Y80".to_string()));
}

#[test]
fn certify_clock_and_iob_risk_precedence() {
    let mapper = FrameMapper::new();

    let clock = mapper.coverage(encode_far(5, 0, 23, 2));
    assert!(clock.is_clock_frame());
    assert!(clock.is_routing_frame());
    assert_eq!(clock.trojan_risk_level, TrojanRiskLevel::Critical);
    assert!(clock.attack_vectors.iter().any(|v| v == "clock_network_tampering"));

    let iob = mapper.coverage(encode_far(1, 0, 0, 10));
    assert!(iob.is_io_frame());
    assert!(iob.is_routing_frame());
    assert_eq!(iob.trojan_risk_level, TrojanRiskLevel::Critical);
    assert!(iob.attack_vectors.iter().any(|v| v == "data_exfiltration"));
}

#[test]
fn certify_bram_planes() {
    let mapper = FrameMapper::new();

    let interconnect = mapper.coverage(encode_far(3, 0, 4, 3));
    assert_eq!(interconnect.resource_categories, vec![ResourceCategory::Routing]);
    assert_eq!(interconnect.trojan_risk_level, TrojanRiskLevel::High);
    assert!(interconnect.attack_vectors.iter().any(|v| v == "memory_access_interception"));

    let content = mapper.coverage(encode_far(2, 0, 4, 30));
    assert_eq!(content.resource_categories, vec![ResourceCategory::Memory]);
    assert_eq!(content.trojan_risk_level, TrojanRiskLevel::Medium);
    // Minor 30 de contenido reinicia tras la franja de interconexión.
    assert_eq!(content.y_range, (40, 60));
}

#[test]
fn certify_bit_region_partition_disjoint() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating bit-region partition (P5)...");

    let mapper = FrameMapper::new();
    let representative_fars = [
        encode_far(0, 0, 1, 5),   // CLB ruteo
        encode_far(0, 0, 1, 25),  // CLB lógica
        encode_far(1, 0, 0, 10),  // IOB
        encode_far(3, 0, 4, 3),   // BRAM interconexión
        encode_far(2, 0, 4, 40),  // BRAM contenido
        encode_far(5, 0, 23, 1),  // CLK
    ];

    for far_value in representative_fars {
        let coverage = mapper.coverage(far_value);
        let total = coverage.routing_bit_count() + coverage.logic_bit_count();
        assert!(total <= 1312, "far 0x{far_value:08X} exceeds frame budget");

        for routing_range in &coverage.routing_bit_ranges {
            for logic_range in &coverage.logic_bit_ranges {
                let overlap =
                    routing_range.start < logic_range.end && logic_range.start < routing_range.end;
                assert!(!overlap, "far 0x{far_value:08X} has overlapping regions");
            }
        }
    }

    // Presupuesto CLB documentado: 832 de ruteo + 288 de lógica.
    let clb = mapper.coverage(encode_far(0, 0, 1, 5));
    assert_eq!(clb.routing_bit_count(), 832);
    assert_eq!(clb.logic_bit_count(), 288);
}

#[test]
fn certify_invalid_far_yields_marked_coverage() {
    let mapper = FrameMapper::new();

    // Bloque CLB declarado sobre una columna BRAM.
    let mismatched = mapper.coverage(encode_far(0, 0, 4, 3));
    assert!(!mismatched.is_valid);
    assert!(mismatched.validation_warning.as_deref().unwrap().contains("BLOCK_TYPE_MISMATCH"));
    assert!(mismatched.tiles_affected.is_empty());
    assert_eq!(mismatched.resource_categories, vec![ResourceCategory::Unknown]);

    // Minor fuera de la capacidad de la columna.
    let overflow = mapper.coverage(encode_far(5, 0, 23, 9));
    assert!(!overflow.is_valid);
}

#[test]
fn certify_memoization_is_transparent() {
    let mapper = FrameMapper::new();
    let far_value = encode_far(0, 0, 7, 12);
    let first = mapper.coverage(far_value);
    let second = mapper.coverage(far_value);
    assert_eq!(first, second);
}
