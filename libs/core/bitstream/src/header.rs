// [libs/core/bitstream/src/header.rs]
/*!
 * =================================================================
 * APARATO: HEADER TLV LEXER (V3.0)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: EXTRACCIÓN DE METADATOS DE LA CABECERA .BIT
 *
 * Patrón de registro: (0x00 | 0x01) TAG 0x00 LEN, con LEN-1 bytes de
 * valor ASCII. Etiquetas reconocidas: 'a' nombre de diseño, 'b'
 * dispositivo, 'c' fecha, 'd' hora, 'e' metadatos. Las etiquetas
 * desconocidas se saltan sin protesta.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::BitstreamError;

pub(crate) const TAG_DESIGN_NAME: u8 = b'a';
pub(crate) const TAG_DEVICE_NAME: u8 = b'b';
pub(crate) const TAG_BUILD_DATE: u8 = b'c';
pub(crate) const TAG_BUILD_TIME: u8 = b'd';
pub(crate) const TAG_METADATA: u8 = b'e';

/// Metadatos declarados por la cabecera del contenedor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitstreamHeader {
    pub design_name: Option<String>,
    pub device_name: Option<String>,
    pub build_date: Option<String>,
    pub build_time: Option<String>,
    pub metadata: Option<String>,
}

impl BitstreamHeader {
    /**
     * Recorre la región previa al sync y cosecha los registros TLV.
     *
     * # Errors:
     * `MalformedHeader` si un registro reconocido declara un valor que
     * desborda la región de cabecera.
     */
    pub fn parse(header_bytes: &[u8]) -> Result<Self, BitstreamError> {
        let mut header = Self::default();
        let mut position = 0usize;

        while position < header_bytes.len() {
            let prefix = header_bytes[position];
            position += 1;
            if prefix != 0x00 && prefix != 0x01 {
                continue;
            }

            let Some(&tag) = header_bytes.get(position) else {
                break;
            };
            if !matches!(
                tag,
                TAG_DESIGN_NAME | TAG_DEVICE_NAME | TAG_BUILD_DATE | TAG_BUILD_TIME | TAG_METADATA
            ) {
                continue;
            }
            if header_bytes.get(position + 1) != Some(&0x00) {
                continue;
            }

            let Some(&length) = header_bytes.get(position + 2) else {
                return Err(BitstreamError::MalformedHeader { offset: position });
            };
            let value_start = position + 3;
            let value_length = usize::from(length).saturating_sub(1);
            let value_end = value_start + value_length;
            if value_end > header_bytes.len() {
                return Err(BitstreamError::MalformedHeader { offset: position });
            }

            let value = String::from_utf8_lossy(&header_bytes[value_start..value_end])
                .trim_end_matches('\0')
                .to_string();
            debug!("📜 [HEADER_TLV]: tag '{}' -> \"{}\"", tag as char, value);

            match tag {
                TAG_DESIGN_NAME => header.design_name = Some(value),
                TAG_DEVICE_NAME => header.device_name = Some(value),
                TAG_BUILD_DATE => header.build_date = Some(value),
                TAG_BUILD_TIME => header.build_time = Some(value),
                TAG_METADATA => header.metadata = Some(value),
                _ => {}
            }

            position = value_end;
        }

        Ok(header)
    }

    /// Serializa un registro TLV en la forma que `parse` reconoce.
    /// Usado por la forja sintética del Proving Grounds.
    #[must_use]
    pub(crate) fn encode_record(tag: u8, value: &str) -> Vec<u8> {
        let mut record = vec![0x00, tag, 0x00];
        record.push((value.len() + 1) as u8);
        record.extend_from_slice(value.as_bytes());
        record
    }
}
