// [tests/mirror/libs/core/bitstream/lexer_integrity.test.rs]
/**
 * =================================================================
 * APARATO: BITSTREAM LEXER INTEGRITY TEST (V3.1 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L1-BITSTREAM)
 * RESPONSABILIDAD: CERTIFICACIÓN DE GRAMÁTICA, WALKER Y TAXONOMÍA
 *
 * Forja contenedores sintácticamente válidos y certifica: cabecera
 * TLV, orden de escrituras, avance del walker entre columnas y
 * bloques, preservación de historia transitoria y la taxonomía de
 * fallos fatales.
 * =================================================================
 */

use centinela_core_bitstream::{
    BitstreamError, BitstreamForge, BitstreamLexer, BitstreamLoader,
};
use centinela_core_fabric::{decode_far, encode_far, FRAME_BYTE_COUNT};

const DEVICE_NAME: &str = "xc5vlx50tff1136-2";

fn zero_frame() -> Vec<u8> {
    vec![0u8; FRAME_BYTE_COUNT]
}

fn frame_with_bits(offsets: &[usize]) -> Vec<u8> {
    let mut payload = zero_frame();
    for &offset in offsets {
        centinela_core_fabric::write_bit(&mut payload, offset, true).unwrap();
    }
    payload
}

#[test]
fn certify_header_tlv_harvest() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating TLV header harvest...");

    let container = BitstreamForge::new("xor3_secure", DEVICE_NAME)
        .with_build_stamp("2026/02/11", "15:30:00")
        .with_metadata("UserID=0xDEADC0DE")
        .build();

    let (header, writes) = BitstreamLexer::lex(&container).unwrap();
    assert_eq!(header.design_name.as_deref(), Some("xor3_secure"));
    assert_eq!(header.device_name.as_deref(), Some(DEVICE_NAME));
    assert_eq!(header.build_date.as_deref(), Some("2026/02/11"));
    assert_eq!(header.build_time.as_deref(), Some("15:30:00"));
    assert_eq!(header.metadata.as_deref(), Some("UserID=0xDEADC0DE"));
    assert!(writes.is_empty());
}

#[test]
fn certify_single_frame_materialization() {
    let far_value = encode_far(0, 0, 1, 5);
    let mut forge = BitstreamForge::new("single", DEVICE_NAME);
    forge.far_write(far_value);
    forge.queue_frame(&frame_with_bits(&[12]));
    let (_, writes) = BitstreamLexer::lex(&forge.build()).unwrap();

    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].far_value, far_value);
    assert_eq!(writes[0].index, 0);
    assert!(writes[0].validation_warning.is_none());
    assert_eq!(writes[0].payload.len(), FRAME_BYTE_COUNT);
}

#[test]
fn certify_walker_advances_across_columns_and_blocks() {
    // Arranque en la última trama de la columna CLB 46: la marcha debe
    // cruzar al bloque IOB (columna 0) tras agotar la columna.
    let mut forge = BitstreamForge::new("walker", DEVICE_NAME);
    forge.far_write(encode_far(0, 0, 46, 35));
    forge.queue_frame(&zero_frame());
    forge.queue_frame(&zero_frame());
    forge.queue_frame(&zero_frame());
    let (_, writes) = BitstreamLexer::lex(&forge.build()).unwrap();

    assert_eq!(writes.len(), 3);
    let first = decode_far(writes[0].far_value);
    let second = decode_far(writes[1].far_value);
    let third = decode_far(writes[2].far_value);
    assert_eq!((first.block_code, first.major, first.minor), (0, 46, 35));
    assert_eq!((second.block_code, second.major, second.minor), (1, 0, 0));
    assert_eq!((third.block_code, third.major, third.minor), (1, 0, 1));

    // P1/P2: longitudes canónicas, índices monótonos.
    for (expected_index, write) in writes.iter().enumerate() {
        assert_eq!(write.index, expected_index);
        assert!(write.has_canonical_length());
    }
}

#[test]
fn certify_clb_column_rollover() {
    let mut forge = BitstreamForge::new("rollover", DEVICE_NAME);
    forge.far_write(encode_far(0, 0, 1, 34));
    for _ in 0..3 {
        forge.queue_frame(&zero_frame());
    }
    let (_, writes) = BitstreamLexer::lex(&forge.build()).unwrap();

    let fars: Vec<(u8, u32)> = writes
        .iter()
        .map(|write| (decode_far(write.far_value).major, decode_far(write.far_value).minor))
        .collect();
    assert_eq!(fars, vec![(1, 34), (1, 35), (2, 0)]);
}

#[test]
fn certify_transient_history_preservation() {
    let far_value = encode_far(0, 0, 1, 0);
    let hidden = frame_with_bits(&[3, 9, 27]);
    let effective = frame_with_bits(&[3]);

    let mut forge = BitstreamForge::new("transient", DEVICE_NAME);
    forge.far_write(far_value);
    forge.queue_frame(&hidden);
    forge.far_write(far_value);
    forge.queue_frame(&effective);

    let loaded = BitstreamLoader::default()
        .load_bytes("transient.bit", &forge.build(), None)
        .unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.info.unique_far_count, 1);
    assert_eq!(loaded.info.multi_write_far_count, 1);
    assert_eq!(loaded.payload(far_value).unwrap(), effective.as_slice());

    let history = loaded.write_history_payloads(far_value);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], hidden.as_slice());
    assert_eq!(history[1], effective.as_slice());

    let first_divergent = loaded.first_nonmatching_write(far_value, &effective).unwrap();
    assert_eq!(first_divergent.payload, hidden);
}

#[test]
fn certify_invalid_far_emits_marked_write_not_failure() {
    // BRAM_INT declarado sobre un minor de contenido: la escritura se
    // emite marcada, jamás se descarta en silencio.
    let mut forge = BitstreamForge::new("marked", DEVICE_NAME);
    forge.far_write(encode_far(3, 0, 4, 30));
    forge.queue_frame(&zero_frame());
    let (_, writes) = BitstreamLexer::lex(&forge.build()).unwrap();

    assert_eq!(writes.len(), 1);
    let warning = writes[0].validation_warning.as_deref().unwrap();
    assert!(warning.contains("BLOCK_TYPE_MISMATCH"));
}

#[test]
fn certify_missing_sync_is_fatal() {
    let container = b"this container never syncs".to_vec();
    assert!(matches!(
        BitstreamLexer::lex(&container),
        Err(BitstreamError::MissingSync)
    ));
}

#[test]
fn certify_fdri_before_far_is_fatal() {
    let mut forge = BitstreamForge::new("orphan-fdri", DEVICE_NAME);
    forge.queue_frame(&zero_frame());
    assert!(matches!(
        BitstreamLexer::lex(&forge.build()),
        Err(BitstreamError::FdriBeforeFar { .. })
    ));
}

#[test]
fn certify_truncated_fdri_body_is_fatal() {
    use centinela_core_bitstream::packets::encode_type2_write;

    let mut forge = BitstreamForge::new("truncated", DEVICE_NAME);
    forge.far_write(encode_far(0, 0, 1, 0));
    // Cuerpo declarado de 41 palabras sin bytes que lo respalden.
    forge.raw_word(encode_type2_write(41));
    assert!(matches!(
        BitstreamLexer::lex(&forge.build()),
        Err(BitstreamError::TruncatedPacket { .. })
    ));
}

#[test]
fn certify_unaligned_fdri_body_is_fatal() {
    use centinela_core_bitstream::packets::encode_type2_write;

    let mut forge = BitstreamForge::new("unaligned", DEVICE_NAME);
    forge.far_write(encode_far(0, 0, 1, 0));
    forge.raw_word(encode_type2_write(40));
    for _ in 0..40 {
        forge.raw_word(0);
    }
    // Las 40 palabras caben en el flujo pero no son múltiplo de 41.
    assert!(matches!(
        BitstreamLexer::lex(&forge.build()),
        Err(BitstreamError::UnalignedFrame { word_count: 40 })
    ));
}

#[test]
fn certify_foreign_packets_are_skipped_by_declared_length() {
    // Una escritura de comando entre el FAR y el FDRI no debe
    // perturbar la materialización.
    let far_value = encode_far(0, 0, 1, 7);
    let mut forge = BitstreamForge::new("noise", DEVICE_NAME);
    forge.far_write(far_value);
    forge.command_write(0x0000_0007);
    forge.queue_frame(&frame_with_bits(&[100]));
    let (_, writes) = BitstreamLexer::lex(&forge.build()).unwrap();

    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].far_value, far_value);
}

#[test]
fn certify_quick_compare_counts() {
    let shared = encode_far(0, 0, 1, 0);
    let only_golden = encode_far(0, 0, 2, 0);

    let mut golden_forge = BitstreamForge::new("golden", DEVICE_NAME);
    golden_forge.far_write(shared);
    golden_forge.queue_frame(&frame_with_bits(&[5]));
    golden_forge.far_write(only_golden);
    golden_forge.queue_frame(&frame_with_bits(&[6]));

    let mut suspect_forge = BitstreamForge::new("suspect", DEVICE_NAME);
    suspect_forge.far_write(shared);
    suspect_forge.queue_frame(&frame_with_bits(&[5, 700]));

    let loader = BitstreamLoader::default();
    let golden = loader.load_bytes("golden.bit", &golden_forge.build(), None).unwrap();
    let suspect = loader.load_bytes("suspect.bit", &suspect_forge.build(), None).unwrap();

    let comparison =
        centinela_core_bitstream::QuickComparison::between(&golden, &suspect);
    assert_eq!(comparison.frames_in_golden, 2);
    assert_eq!(comparison.frames_in_suspect, 1);
    assert_eq!(comparison.common_frames, 1);
    assert_eq!(comparison.only_in_golden, 1);
    assert_eq!(comparison.data_differences, 1);
    assert_eq!(comparison.changed_fars, vec![format!("0x{shared:08X}")]);
}
