// [libs/core/bitstream/src/forge.rs]
/*!
 * =================================================================
 * APARATO: SYNTHETIC BITSTREAM FORGE (V3.0 - PROVING GROUNDS)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: COMPOSICIÓN DETERMINISTA DE CONTENEDORES .BIT
 *
 * Forja de imágenes sintácticamente válidas para los escenarios de
 * certificación: cabecera TLV, marcador de sincronía, escrituras FAR
 * Tipo-1 y ráfagas FDRI Tipo-2. La salida es una función pura de la
 * secuencia de directivas.
 * =================================================================
 */

use byteorder::{BigEndian, ByteOrder};
use centinela_core_fabric::FRAME_BYTE_COUNT;

use crate::header::{
    BitstreamHeader, TAG_BUILD_DATE, TAG_BUILD_TIME, TAG_DESIGN_NAME, TAG_DEVICE_NAME,
    TAG_METADATA,
};
use crate::packets::{encode_type1_write, encode_type2_write, REG_CMD, REG_FAR};
use crate::SYNC_MARKER;

/// Constructor fluido de contenedores sintéticos.
#[derive(Debug, Clone)]
pub struct BitstreamForge {
    design_name: String,
    device_name: String,
    build_date: String,
    build_time: String,
    metadata: Option<String>,
    configuration_words: Vec<u32>,
    pending_frame_bytes: Vec<u8>,
}

impl BitstreamForge {
    /// Arranca una forja con los metadatos mínimos de cabecera.
    #[must_use]
    pub fn new(design_name: &str, device_name: &str) -> Self {
        Self {
            design_name: design_name.to_string(),
            device_name: device_name.to_string(),
            build_date: "2026/02/11".to_string(),
            build_time: "12:00:00".to_string(),
            metadata: None,
            configuration_words: Vec::new(),
            pending_frame_bytes: Vec::new(),
        }
    }

    /// Fija fecha y hora de construcción declaradas.
    #[must_use]
    pub fn with_build_stamp(mut self, date: &str, time: &str) -> Self {
        self.build_date = date.to_string();
        self.build_time = time.to_string();
        self
    }

    /// Adjunta el registro de metadatos opcional ('e').
    #[must_use]
    pub fn with_metadata(mut self, metadata: &str) -> Self {
        self.metadata = Some(metadata.to_string());
        self
    }

    /// Emite una escritura Tipo-1 al registro FAR.
    pub fn far_write(&mut self, far_value: u32) -> &mut Self {
        self.flush_pending_frames();
        self.configuration_words.push(encode_type1_write(REG_FAR, 1));
        self.configuration_words.push(far_value);
        self
    }

    /**
     * Encola una trama de 164 bytes para la próxima ráfaga FDRI.
     * Las tramas encoladas consecutivamente se emiten como un único
     * cuerpo Tipo-2, ejercitando el walker de columnas.
     *
     * # Panics:
     * En el Proving Grounds, si la trama no mide 164 bytes.
     */
    pub fn queue_frame(&mut self, payload: &[u8]) -> &mut Self {
        assert_eq!(
            payload.len(),
            FRAME_BYTE_COUNT,
            "forged frames must be exactly {FRAME_BYTE_COUNT} bytes"
        );
        self.pending_frame_bytes.extend_from_slice(payload);
        self
    }

    /// Emite una escritura de comando ajena al núcleo (ruido benigno).
    pub fn command_write(&mut self, command: u32) -> &mut Self {
        self.flush_pending_frames();
        self.configuration_words.push(encode_type1_write(REG_CMD, 1));
        self.configuration_words.push(command);
        self
    }

    /// Emite una palabra cruda en el flujo (corrupción dirigida).
    pub fn raw_word(&mut self, word: u32) -> &mut Self {
        self.flush_pending_frames();
        self.configuration_words.push(word);
        self
    }

    fn flush_pending_frames(&mut self) {
        if self.pending_frame_bytes.is_empty() {
            return;
        }
        let word_count = self.pending_frame_bytes.len() / 4;
        self.configuration_words.push(encode_type2_write(word_count));
        for chunk in self.pending_frame_bytes.chunks_exact(4) {
            self.configuration_words.push(BigEndian::read_u32(chunk));
        }
        self.pending_frame_bytes.clear();
    }

    /// Cristaliza el contenedor completo.
    #[must_use]
    pub fn build(mut self) -> Vec<u8> {
        self.flush_pending_frames();

        let mut container = Vec::new();
        container.extend(BitstreamHeader::encode_record(TAG_DESIGN_NAME, &self.design_name));
        container.extend(BitstreamHeader::encode_record(TAG_DEVICE_NAME, &self.device_name));
        container.extend(BitstreamHeader::encode_record(TAG_BUILD_DATE, &self.build_date));
        container.extend(BitstreamHeader::encode_record(TAG_BUILD_TIME, &self.build_time));
        if let Some(metadata) = &self.metadata {
            container.extend(BitstreamHeader::encode_record(TAG_METADATA, metadata));
        }

        container.extend_from_slice(&SYNC_MARKER);
        for word in &self.configuration_words {
            let mut encoded = [0u8; 4];
            BigEndian::write_u32(&mut encoded, *word);
            container.extend_from_slice(&encoded);
        }
        container
    }
}
