// [tests/mirror/libs/core/fabric/frame_bits_integrity.test.rs]
/**
 * =================================================================
 * APARATO: FRAME BIT PRIMITIVES TEST (V3.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-FABRIC)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA LEY EXTRACT/WRITE MSB-FIRST
 * =================================================================
 */

use centinela_core_fabric::{
    count_set_bits, diff_bit_offsets, extract_bit, extract_bits, extract_u64, extract_word,
    is_default_frame, write_bit, FabricError, FRAME_BIT_COUNT, FRAME_BYTE_COUNT,
};
use proptest::prelude::*;

proptest! {
    /// CERTIFICACIÓN: extract_bit(write_bit(payload, o, v), o) == v
    /// para todo offset legal y ambos valores.
    #[test]
    fn certify_bit_write_extract_law(
        bit_offset in 0usize..FRAME_BIT_COUNT,
        value in proptest::bool::ANY,
        fill in proptest::num::u8::ANY,
    ) {
        let mut payload = vec![fill; FRAME_BYTE_COUNT];
        write_bit(&mut payload, bit_offset, value).unwrap();
        prop_assert_eq!(extract_bit(&payload, bit_offset).unwrap(), value);
    }

    /// CERTIFICACIÓN: escribir un bit no perturba a sus vecinos.
    #[test]
    fn certify_bit_write_is_surgical(
        bit_offset in 0usize..FRAME_BIT_COUNT,
        fill in proptest::num::u8::ANY,
    ) {
        let reference = vec![fill; FRAME_BYTE_COUNT];
        let mut payload = reference.clone();
        let original = extract_bit(&payload, bit_offset).unwrap();
        write_bit(&mut payload, bit_offset, !original).unwrap();
        let changed = diff_bit_offsets(&reference, &payload).unwrap();
        prop_assert_eq!(changed, vec![bit_offset as u32]);
    }
}

#[test]
fn certify_msb_first_numbering() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating MSB-first bit numbering...");

    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    write_bit(&mut payload, 0, true).unwrap();
    write_bit(&mut payload, 7, true).unwrap();
    write_bit(&mut payload, 8, true).unwrap();

    assert_eq!(payload[0], 0b1000_0001);
    assert_eq!(payload[1], 0b1000_0000);
    assert_eq!(count_set_bits(&payload), 3);
}

#[test]
fn certify_range_extraction_orders_bits_msb_first() {
    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    // Patrón 1011 a partir del offset 4.
    write_bit(&mut payload, 4, true).unwrap();
    write_bit(&mut payload, 6, true).unwrap();
    write_bit(&mut payload, 7, true).unwrap();
    assert_eq!(extract_bits(&payload, 4, 8).unwrap(), 0b1011);
}

#[test]
fn certify_u64_extraction_roundtrip() {
    let truth_table: u64 = 0x0123_4567_89AB_CDEF;
    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    for bit_index in 0..64usize {
        let value = (truth_table >> (63 - bit_index)) & 1 == 1;
        write_bit(&mut payload, 832 + bit_index, value).unwrap();
    }
    assert_eq!(extract_u64(&payload, 832).unwrap(), truth_table);
}

#[test]
fn certify_word_reads_are_big_endian() {
    let mut payload = vec![0u8; FRAME_BYTE_COUNT];
    payload[0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(extract_word(&payload, 0).unwrap(), 0xDEAD_BEEF);
    assert!(matches!(
        extract_word(&payload, 41),
        Err(FabricError::WordIndexOutOfRange { word_index: 41, .. })
    ));
}

#[test]
fn certify_out_of_range_access_is_rejected() {
    let payload = vec![0u8; FRAME_BYTE_COUNT];
    assert!(matches!(
        extract_bit(&payload, FRAME_BIT_COUNT),
        Err(FabricError::BitOffsetOutOfRange { .. })
    ));
    assert!(matches!(
        extract_bits(&payload, 100, 100),
        Err(FabricError::BitRangeViolation { .. })
    ));
    assert!(matches!(
        extract_bits(&payload, 0, 65),
        Err(FabricError::BitRangeViolation { .. })
    ));
}

#[test]
fn certify_default_frame_detection() {
    let payload = vec![0u8; FRAME_BYTE_COUNT];
    assert!(is_default_frame(&payload));
    let mut touched = payload;
    write_bit(&mut touched, 1000, true).unwrap();
    assert!(!is_default_frame(&touched));
}
