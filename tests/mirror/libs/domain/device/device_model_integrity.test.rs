// [tests/mirror/libs/domain/device/device_model_integrity.test.rs]
/**
 * =================================================================
 * APARATO: DEVICE MODEL INTEGRITY TEST (V3.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-DEVICE)
 * RESPONSABILIDAD: CERTIFICACIÓN DE CONSULTAS Y CONSISTENCIA FATAL
 * =================================================================
 */

use centinela_domain_device::{
    DeviceError, DeviceGraph, DeviceInfo, DeviceModel, PipRecord, SiteRecord, TileRecord,
    TileTypeRecord, WireRecord,
};

fn device_info() -> DeviceInfo {
    DeviceInfo {
        part: "xc5vlx50t".to_string(),
        part_name: "xc5vlx50tff1136-2".to_string(),
        family_type: "virtex5".to_string(),
        rows: 160,
        cols: 48,
    }
}

fn tile(name: &str, col: u32, row: u32, tile_type: &str) -> TileRecord {
    TileRecord { name: name.to_string(), row, col, tile_type: tile_type.to_string() }
}

fn consistent_model() -> DeviceModel {
    DeviceModel::from_records(
        device_info(),
        vec![
            TileTypeRecord { name: "INT".to_string() },
            TileTypeRecord { name: "CLBLL".to_string() },
            TileTypeRecord { name: "CLK_HROW".to_string() },
        ],
        vec![
            tile("INT_X1Y0", 1, 0, "INT"),
            tile("INT_X1Y1", 1, 1, "INT"),
            tile("CLBLL_X1Y0", 1, 0, "CLBLL"),
            tile("CLK_HROW_X23Y40", 23, 40, "CLK_HROW"),
        ],
        vec![
            WireRecord { tile: "INT_X1Y0".to_string(), wire_id: 0 },
            WireRecord { tile: "INT_X1Y0".to_string(), wire_id: 1 },
            WireRecord { tile: "INT_X1Y0".to_string(), wire_id: 2 },
            WireRecord { tile: "INT_X1Y1".to_string(), wire_id: 7 },
        ],
        vec![SiteRecord {
            name: "SLICE_X0Y0".to_string(),
            site_type: "SLICEL".to_string(),
            tile: "CLBLL_X1Y0".to_string(),
        }],
        vec![
            PipRecord { tile: "INT_X1Y0".to_string(), start_wire_id: 0, end_wire_id: 1 },
            PipRecord { tile: "INT_X1Y0".to_string(), start_wire_id: 1, end_wire_id: 2 },
        ],
    )
    .expect("consistent bundle must produce a model")
}

#[test]
fn certify_query_surface() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating device query surface...");

    let model = consistent_model();
    assert_eq!(model.part_name(), "xc5vlx50t");
    assert_eq!(model.dimensions(), (48, 160));

    assert!(model.tile_by_name("INT_X1Y0").is_some());
    assert!(model.tile_by_name("GHOST").is_none());
    assert_eq!(model.tile_at(1, 1).unwrap().name, "INT_X1Y1");
    assert_eq!(model.tiles_by_type("INT").len(), 2);
    assert_eq!(model.tiles_in_row(0).len(), 2);
    assert_eq!(model.tiles_in_column(1).len(), 3);

    assert_eq!(model.wires_of_tile("INT_X1Y0").len(), 3);
    assert_eq!(model.pips_of_tile("INT_X1Y0").len(), 2);
    assert_eq!(model.sites_of_tile("CLBLL_X1Y0").len(), 1);
    assert_eq!(model.site_by_name("SLICE_X0Y0").unwrap().tile, "CLBLL_X1Y0");
}

#[test]
fn certify_routing_graph_edges() {
    let model = consistent_model();

    let edges = model.pips_from("INT_X1Y0", 0);
    assert_eq!(edges, vec![("INT_X1Y0", 1)]);
    assert!(model.pips_from("INT_X1Y0", 2).is_empty());

    let graph = DeviceGraph::build(&model);
    let path = graph.routing_path("INT_X1Y0", 0, 2).unwrap();
    assert_eq!(path, vec![0, 1, 2]);
    assert!(graph.routing_path("INT_X1Y0", 2, 0).is_none());

    let statistics = graph.statistics();
    assert_eq!(statistics.tiles, 4);
    assert_eq!(statistics.total_routing_edges, 2);
}

#[test]
fn certify_tile_classification_predicates() {
    let model = consistent_model();
    let interconnect = model.tile_by_name("INT_X1Y0").unwrap();
    let logic = model.tile_by_name("CLBLL_X1Y0").unwrap();
    let clock = model.tile_by_name("CLK_HROW_X23Y40").unwrap();

    assert!(model.is_routing_tile(interconnect));
    assert!(!model.is_logic_tile(interconnect));
    assert!(model.is_logic_tile(logic));
    assert!(model.is_clock_tile(clock));
    assert!(!model.is_clock_tile(logic));
}

#[test]
fn certify_dangling_references_are_fatal() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating fail-closed consistency...");

    let fault = DeviceModel::from_records(
        device_info(),
        vec![TileTypeRecord { name: "INT".to_string() }],
        vec![tile("INT_X1Y0", 1, 0, "INT")],
        vec![WireRecord { tile: "GHOST_TILE".to_string(), wire_id: 0 }],
        Vec::new(),
        vec![PipRecord { tile: "ANOTHER_GHOST".to_string(), start_wire_id: 0, end_wire_id: 1 }],
    )
    .unwrap_err();

    match fault {
        DeviceError::ConsistencyViolation { violations } => {
            assert_eq!(violations.len(), 2);
            assert!(violations[0].contains("GHOST_TILE"));
        }
        other => panic!("expected consistency violation, got {other}"),
    }
}

#[test]
fn certify_unregistered_tile_type_is_fatal() {
    let fault = DeviceModel::from_records(
        device_info(),
        vec![TileTypeRecord { name: "INT".to_string() }],
        vec![tile("BRAM_X4Y0", 4, 0, "BRAM")],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    )
    .unwrap_err();
    assert!(matches!(fault, DeviceError::ConsistencyViolation { .. }));
}
