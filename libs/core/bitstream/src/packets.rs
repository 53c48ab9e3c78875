// [libs/core/bitstream/src/packets.rs]
/*!
 * =================================================================
 * APARATO: CONFIGURATION PACKET GRAMMAR (V3.0)
 * CLASIFICACIÓN: CORE BITSTREAM (ESTRATO L1)
 * RESPONSABILIDAD: DECODIFICACIÓN DE PALABRAS TIPO-1 / TIPO-2
 *
 * Palabras big-endian de 32 bits tras el marcador de sincronía:
 *
 *   Tipo-1: 001 | op[28:27] | ... reg[28:13]&0xFFFF | wc[12:0]
 *   Tipo-2: 010 | op[28:27] | wc[24:0]
 * =================================================================
 */

/// Dirección del Frame Address Register.
pub const REG_FAR: u16 = 0x0001;
/// Dirección del Frame Data Register Input.
pub const REG_FDRI: u16 = 0x0002;
/// Dirección del registro de comandos.
pub const REG_CMD: u16 = 0x0004;

/// Operación declarada por un paquete de configuración.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Nop,
    Read,
    Write,
    Sync,
}

impl Opcode {
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => Self::Nop,
            0b01 => Self::Read,
            0b10 => Self::Write,
            _ => Self::Sync,
        }
    }
}

/// Palabra de cabecera de paquete ya decodificada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketWord {
    /// Paquete Tipo-1: operación sobre un registro direccionado.
    Type1 {
        opcode: Opcode,
        register_address: u16,
        word_count: usize,
    },
    /// Paquete Tipo-2: cuerpo masivo para el registro previamente
    /// direccionado (FDRI en la práctica).
    Type2 { opcode: Opcode, word_count: usize },
    /// Palabra que no encabeza paquete reconocible (relleno, NOP crudo).
    Opaque,
}

/// Decodifica una palabra de cabecera de paquete.
#[must_use]
pub fn decode_packet_word(word: u32) -> PacketWord {
    let packet_type = (word >> 29) & 0b111;
    let opcode = Opcode::from_bits((word >> 27) & 0b11);
    match packet_type {
        0b001 => PacketWord::Type1 {
            opcode,
            register_address: ((word >> 13) & 0xFFFF) as u16,
            word_count: (word & 0x1FFF) as usize,
        },
        0b010 => PacketWord::Type2 {
            opcode,
            word_count: (word & 0x01FF_FFFF) as usize,
        },
        _ => PacketWord::Opaque,
    }
}

/// Empaqueta una cabecera Tipo-1 (escritura) hacia un registro.
#[must_use]
pub fn encode_type1_write(register_address: u16, word_count: usize) -> u32 {
    (0b001 << 29)
        | (0b10 << 27)
        | (u32::from(register_address) << 13)
        | (word_count as u32 & 0x1FFF)
}

/// Empaqueta una cabecera Tipo-2 (escritura masiva).
#[must_use]
pub fn encode_type2_write(word_count: usize) -> u32 {
    (0b010 << 29) | (0b10 << 27) | (word_count as u32 & 0x01FF_FFFF)
}
