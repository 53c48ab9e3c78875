// [tests/mirror/libs/core/fabric/far_codec_integrity.test.rs]
/**
 * =================================================================
 * APARATO: FAR CODEC INTEGRITY TEST (V3.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-FABRIC)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA LEY DE IDA Y VUELTA DEL FAR
 *
 * Valida que el empaque de 32 bits preserve cada campo legal
 * (block[31:29] | major[28:23] | top_bottom[22] | minor[16:0]) y que
 * la validación contra la tabla de columnas reporte, nunca trague,
 * las violaciones.
 * =================================================================
 */

use centinela_core_fabric::{
    block_type_for, decode_far, encode_far, frames_per_column, validate_far, BlockType, FarFault,
    FarFields,
};
use proptest::prelude::*;

proptest! {
    /// CERTIFICACIÓN: decode(encode(...)) es la identidad en todo el
    /// dominio legal de campos.
    #[test]
    fn certify_far_roundtrip_law(
        block_code in 0u8..8,
        top_bottom in 0u8..2,
        major in 0u8..48,
        minor in 0u32..(1u32 << 17),
    ) {
        let raw = encode_far(block_code, top_bottom, major, minor);
        let fields = decode_far(raw);
        prop_assert_eq!(fields.block_code, block_code);
        prop_assert_eq!(fields.top_bottom, top_bottom);
        prop_assert_eq!(fields.major, major);
        prop_assert_eq!(fields.minor, minor);
    }

    /// CERTIFICACIÓN: todo FAR bien formado contra la tabla de
    /// columnas pasa la validación.
    #[test]
    fn certify_table_qualified_fars_validate(
        top_bottom in 0u8..2,
        major in 0u8..48,
        minor_seed in 0u32..92,
    ) {
        let limit = frames_per_column(major).unwrap();
        let minor = minor_seed % limit;
        let block = block_type_for(major, minor).unwrap();
        let fields = decode_far(encode_far(block.code(), top_bottom, major, minor));
        prop_assert!(validate_far(&fields).is_ok());
    }
}

#[test]
fn certify_documented_far_examples() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating documented FAR encodings...");

    // Columna CLB 5, minor 0, mitad inferior.
    assert_eq!(encode_far(0, 0, 5, 0), 0x0280_0000);
    // Columna CLB 1, minor 5.
    assert_eq!(encode_far(0, 0, 1, 5), 0x0080_0005);
    // Los bits [21:17] quedan reservados en cero en la variante ancha.
    assert_eq!(encode_far(0, 0, 5, 0) & 0x003E_0000, 0);

    let clock_far = decode_far(encode_far(BlockType::Clk.code(), 0, 23, 2));
    assert_eq!((clock_far.major, clock_far.minor), (23, 2));
    assert!(validate_far(&clock_far).is_ok());
}

#[test]
fn certify_minor_capacity_boundary() {
    // Minor 35 es la última trama CLB; 36 desborda la columna.
    let last = FarFields { block_code: 0, top_bottom: 0, major: 1, minor: 35 };
    assert!(validate_far(&last).is_ok());

    let overflow = FarFields { block_code: 0, top_bottom: 0, major: 1, minor: 36 };
    assert!(matches!(
        validate_far(&overflow),
        Err(FarFault::MinorOutOfRange { major: 1, minor: 36, limit: 36 })
    ));
}

#[test]
fn certify_major_out_of_range_is_reported() {
    let ghost_column = FarFields { block_code: 0, top_bottom: 0, major: 48, minor: 0 };
    assert!(matches!(
        validate_far(&ghost_column),
        Err(FarFault::MajorOutOfRange { major: 48, .. })
    ));
}

#[test]
fn certify_bram_split_block_mismatch_is_reported() {
    // BRAM_INT declarado sobre un minor de contenido (>= 28).
    let mismatched = FarFields { block_code: 3, top_bottom: 0, major: 8, minor: 40 };
    let fault = validate_far(&mismatched).unwrap_err();
    assert!(matches!(fault, FarFault::BlockTypeMismatch { .. }));
    assert!(fault.to_string().contains("BLOCK_TYPE_MISMATCH"));

    // La contraparte correcta valida.
    let content = FarFields { block_code: 2, top_bottom: 0, major: 8, minor: 40 };
    assert!(validate_far(&content).is_ok());
}
