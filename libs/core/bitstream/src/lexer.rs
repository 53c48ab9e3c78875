// [libs/core/bitstream/src/lexer.rs]
/*!
 * =================================================================
 * APARATO: CONFIGURATION STREAM LEXER (V3.1 - EVIDENCE GRADE)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: FLUJO DE PAQUETES -> BITÁCORA DE ESCRITURAS
 *
 * El léxico reconoce lo mínimo exigible del protocolo: escrituras
 * Tipo-1 al registro FAR (word_count 1) y cuerpos Tipo-2 como ráfagas
 * FDRI. Todo lo demás se salta respetando su word_count declarado.
 * Cada trama emitida conserva su posición de programa; nada se
 * deduplica en esta frontera.
 * =================================================================
 */

use byteorder::{BigEndian, ByteOrder};
use centinela_core_fabric::{decode_far, validate_far, FarFields, FRAME_BYTE_COUNT, FRAME_WORD_COUNT};
use tracing::{debug, instrument};

use crate::errors::BitstreamError;
use crate::frame_write::FrameWrite;
use crate::header::BitstreamHeader;
use crate::packets::{decode_packet_word, Opcode, PacketWord, REG_FAR};
use crate::walker::FarWalker;
use crate::SYNC_MARKER;

/// Léxico completo de un contenedor `.bit`.
pub struct BitstreamLexer;

impl BitstreamLexer {
    /**
     * Separa cabecera y flujo en el primer marcador de sincronía y
     * materializa la bitácora ordenada de escrituras de trama.
     *
     * # Errors:
     * Cualquier fallo del catálogo de formato es fatal; no se
     * devuelven resultados parciales.
     */
    #[instrument(skip(container), fields(container_bytes = container.len()))]
    pub fn lex(container: &[u8]) -> Result<(BitstreamHeader, Vec<FrameWrite>), BitstreamError> {
        let sync_offset = find_sync_marker(container).ok_or(BitstreamError::MissingSync)?;
        let header = BitstreamHeader::parse(&container[..sync_offset])?;
        let stream_base = sync_offset + SYNC_MARKER.len();
        let writes = Self::lex_configuration_stream(&container[stream_base..], stream_base)?;
        debug!(
            "🔬 [LEXER_COMPLETE]: {} frame writes materialized after sync at byte {}",
            writes.len(),
            sync_offset
        );
        Ok((header, writes))
    }

    fn lex_configuration_stream(
        stream: &[u8],
        stream_base: usize,
    ) -> Result<Vec<FrameWrite>, BitstreamError> {
        let mut writes: Vec<FrameWrite> = Vec::new();
        let mut established_far: Option<FarFields> = None;
        let mut position = 0usize;

        while position + 4 <= stream.len() {
            let word_offset = stream_base + position;
            let word = BigEndian::read_u32(&stream[position..position + 4]);
            position += 4;

            match decode_packet_word(word) {
                PacketWord::Type1 {
                    opcode: Opcode::Write,
                    register_address: REG_FAR,
                    word_count: 1,
                } => {
                    if position + 4 > stream.len() {
                        return Err(BitstreamError::TruncatedPacket { offset: word_offset });
                    }
                    let far_raw = BigEndian::read_u32(&stream[position..position + 4]);
                    position += 4;
                    established_far = Some(decode_far(far_raw));
                    debug!("📍 [FAR_WRITE]: register set to 0x{:08X}", far_raw);
                }

                PacketWord::Type1 { word_count, .. } => {
                    // Paquete ajeno al núcleo: respeta su cuerpo declarado.
                    let body_bytes = word_count * 4;
                    if position + body_bytes > stream.len() {
                        return Err(BitstreamError::TruncatedPacket { offset: word_offset });
                    }
                    position += body_bytes;
                }

                PacketWord::Type2 { opcode, word_count } => {
                    let body_bytes = word_count * 4;
                    if position + body_bytes > stream.len() {
                        return Err(BitstreamError::TruncatedPacket { offset: word_offset });
                    }
                    let body = &stream[position..position + body_bytes];
                    position += body_bytes;

                    if opcode != Opcode::Write || word_count == 0 {
                        continue;
                    }
                    if word_count % FRAME_WORD_COUNT != 0 {
                        return Err(BitstreamError::UnalignedFrame { word_count });
                    }
                    let fields = established_far
                        .ok_or(BitstreamError::FdriBeforeFar { offset: word_offset })?;
                    Self::materialize_frames(&fields, body, &mut writes)?;
                }

                PacketWord::Opaque => {}
            }
        }

        Ok(writes)
    }

    /// Trocea una ráfaga FDRI en tramas de 41 palabras y hace avanzar
    /// el walker entre trama y trama.
    fn materialize_frames(
        start_fields: &FarFields,
        body: &[u8],
        writes: &mut Vec<FrameWrite>,
    ) -> Result<(), BitstreamError> {
        let frame_count = body.len() / FRAME_BYTE_COUNT;
        let mut walker = FarWalker::start(start_fields, frame_count)?;

        for chunk_index in 0..frame_count {
            let payload_start = chunk_index * FRAME_BYTE_COUNT;
            let payload = body[payload_start..payload_start + FRAME_BYTE_COUNT].to_vec();

            let mut write = FrameWrite::new(walker.current_far(), payload, writes.len());
            if let Err(fault) = validate_far(&write.fields) {
                // No fatal: la escritura viaja marcada y el detector
                // la escala a anomalía estructural.
                write.validation_warning = Some(fault.to_string());
            }
            writes.push(write);

            if chunk_index + 1 < frame_count {
                walker.advance(chunk_index + 1, frame_count)?;
            }
        }

        Ok(())
    }
}

/// Posición del primer marcador AA 99 55 66 dentro del contenedor.
#[must_use]
pub fn find_sync_marker(container: &[u8]) -> Option<usize> {
    container
        .windows(SYNC_MARKER.len())
        .position(|window| window == SYNC_MARKER)
}
