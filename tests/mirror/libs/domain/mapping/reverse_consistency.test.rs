// [tests/mirror/libs/domain/mapping/reverse_consistency.test.rs]
/**
 * =================================================================
 * APARATO: REVERSE CONSISTENCY TEST (V3.1 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MAPPING)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA PROPIEDAD BIDIRECCIONAL
 *
 * Para una muestra uniforme de FARs válidos: todo tile cubierto por
 * la trama resuelve de regreso a ese FAR bajo el mapeo inverso, con
 * las tres estrategias de índice produciendo resultados idénticos.
 * =================================================================
 */

use std::collections::BTreeSet;

use centinela_core_fabric::{block_type_for, encode_far, frames_per_column};
use centinela_domain_mapping::{
    FrameMapper, IndexStrategy, ReverseMapper,
};
use proptest::prelude::*;

fn table_qualified_far(major: u8, top_bottom: u8, minor_seed: u32) -> u32 {
    let limit = frames_per_column(major).expect("major within device");
    let minor = minor_seed % limit;
    let block = block_type_for(major, minor).expect("block for qualified minor");
    encode_far(block.code(), top_bottom, major, minor)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// CERTIFICACIÓN P4: tile ∈ coverage(far) => far ∈ reverse(tile).
    #[test]
    fn certify_forward_reverse_membership(
        major in 0u8..48,
        top_bottom in 0u8..2,
        minor_seed in 0u32..92,
    ) {
        let far_value = table_qualified_far(major, top_bottom, minor_seed);
        let mapper = FrameMapper::new();
        let reverse = ReverseMapper::new(IndexStrategy::Lazy);

        let coverage = mapper.coverage(far_value);
        for tile_name in &coverage.tiles_affected {
            let resolved: BTreeSet<u32> = reverse
                .frames_for_tile(tile_name)
                .into_iter()
                .map(|reference| reference.far_value)
                .collect();
            prop_assert!(
                resolved.contains(&far_value),
                "tile {} does not resolve back to 0x{:08X}",
                tile_name,
                far_value
            );
        }
    }
}

#[test]
fn certify_index_strategies_are_equivalent() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating Full/Lazy/Hybrid parity...");

    let full = ReverseMapper::new(IndexStrategy::Full);
    let lazy = ReverseMapper::new(IndexStrategy::Lazy);
    let hybrid = ReverseMapper::new(IndexStrategy::Hybrid);

    let sample_tiles = [
        "CLBLL_X1Y0",
        "INT_X1Y45",
        "CLBLM_X2Y100",
        "BRAM_X4Y60",
        "INT_X4Y85",
        "IOB_X0Y10",
        "CLK_X23Y40",
        "CLK_X23Y95",
    ];
    for tile_name in sample_tiles {
        let from_full = full.frames_for_tile(tile_name);
        let from_lazy = lazy.frames_for_tile(tile_name);
        let from_hybrid = hybrid.frames_for_tile(tile_name);
        assert_eq!(from_full, from_lazy, "full vs lazy diverge on {tile_name}");
        assert_eq!(from_lazy, from_hybrid, "lazy vs hybrid diverge on {tile_name}");
        // La memoización no altera el resultado.
        assert_eq!(from_hybrid, hybrid.frames_for_tile(tile_name));
    }
}

#[test]
fn certify_clb_tile_resolves_both_planes() {
    let reverse = ReverseMapper::default();
    let references = reverse.frames_for_tile("CLBLL_X1Y45");

    // Fila 45: minor 2 de ruteo y minor 24 (22 + 2) de lógica.
    let fars: BTreeSet<u32> =
        references.iter().map(|reference| reference.far_value).collect();
    assert!(fars.contains(&encode_far(0, 0, 1, 2)));
    assert!(fars.contains(&encode_far(0, 0, 1, 24)));

    assert_eq!(reverse.routing_frames_for_tile("CLBLL_X1Y45").len(), 1);
    assert_eq!(reverse.logic_frames_for_tile("CLBLL_X1Y45").len(), 1);
}

#[test]
fn certify_bram_tile_resolves_interconnect_and_content() {
    let reverse = ReverseMapper::default();
    let fars: BTreeSet<u32> = reverse
        .frames_for_tile("BRAM_X4Y10")
        .into_iter()
        .map(|reference| reference.far_value)
        .collect();

    // Fila 10 -> minor 0: interconexión en 0, contenido en 28.
    assert!(fars.contains(&encode_far(3, 0, 4, 0)));
    assert!(fars.contains(&encode_far(2, 0, 4, 28)));
}

#[test]
fn certify_row_80_boundary_emits_both_half_readings() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating y=80 half boundary...");

    let reverse = ReverseMapper::default();
    let fars: BTreeSet<u32> = reverse
        .frames_for_coordinate(1, 80)
        .into_iter()
        .map(|reference| reference.far_value)
        .collect();

    // Primera fila de la mitad superior y alias de mitad inferior.
    assert!(fars.contains(&encode_far(0, 1, 1, 0)));
    assert!(fars.contains(&encode_far(0, 0, 1, 4)));

    // La fila 79 solo admite la lectura de mitad inferior.
    let lower: BTreeSet<u32> = reverse
        .frames_for_coordinate(1, 79)
        .into_iter()
        .map(|reference| reference.far_value)
        .collect();
    assert!(lower.contains(&encode_far(0, 0, 1, 3)));
    assert!(!lower.contains(&encode_far(0, 1, 1, 0)));
}

#[test]
fn certify_clock_column_rejects_alias_minor_overflow() {
    let reverse = ReverseMapper::default();
    // Fila 95: el alias de mitad inferior exigiría minor 4, fuera de
    // la capacidad (4 tramas) de la columna de reloj.
    let references = reverse.frames_for_coordinate(23, 95);
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].far_value, encode_far(5, 1, 23, 0));
}

#[test]
fn certify_region_union_is_idempotent_and_order_free() {
    let reverse = ReverseMapper::default();

    let region = reverse.frames_for_region((1, 2), (0, 39));
    let repeated = reverse.frames_for_region((1, 2), (0, 39));
    assert_eq!(region, repeated);

    let mut manual_union = BTreeSet::new();
    for column in [2u8, 1] {
        for row in (0u32..=39).rev() {
            for reference in reverse.frames_for_coordinate(column, row) {
                manual_union.insert(reference.far_value);
            }
        }
    }
    assert_eq!(region, manual_union);
}

#[test]
fn certify_used_tile_footprint() {
    let reverse = ReverseMapper::default();
    let mut used_tiles = BTreeSet::new();
    used_tiles.insert("CLBLL_X1Y0".to_string());
    used_tiles.insert("BRAM_X4Y0".to_string());

    let footprint = reverse.frames_for_used_tiles(&used_tiles);
    assert!(footprint.contains(&encode_far(0, 0, 1, 0)));
    assert!(footprint.contains(&encode_far(0, 0, 1, 22)));
    assert!(footprint.contains(&encode_far(3, 0, 4, 0)));
    assert!(footprint.contains(&encode_far(2, 0, 4, 28)));
}

#[test]
fn certify_column_enumeration_counts() {
    let reverse = ReverseMapper::new(IndexStrategy::Hybrid);
    // CLB: 36 minors x 2 mitades; BRAM: 92 x 2; CLK: 4 x 2.
    assert_eq!(reverse.frames_for_column(1).len(), 72);
    assert_eq!(reverse.frames_for_column(4).len(), 184);
    assert_eq!(reverse.frames_for_column(23).len(), 8);
    assert!(reverse.frames_for_column(48).is_empty());
}

#[test]
fn certify_degenerate_inputs_resolve_empty() {
    let reverse = ReverseMapper::default();
    assert!(reverse.frames_for_tile("NOT_A_TILE").is_empty());
    assert!(reverse.frames_for_coordinate(48, 0).is_empty());
    assert!(reverse.frames_for_coordinate(1, 160).is_empty());
}
