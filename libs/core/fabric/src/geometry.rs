// [libs/core/fabric/src/geometry.rs]
/*!
 * =================================================================
 * APARATO: VLX50T COLUMN GEOMETRY TABLE (V3.0 - GOLD MASTER)
 * CLASIFICACIÓN: CORE FABRIC (ESTRATO L1)
 * RESPONSABILIDAD: TABLA DE COLUMNAS, BLOQUES Y ORDEN DE MARCHA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SILICON FIDELITY: 48 columnas mayores x 160 filas de tiles del
 *    xc5vlx50tff1136-2, con la partición BRAM interconexión/contenido
 *    sellada en el minor 28.
 * 2. WALKER GOVERNANCE: El orden de columnas por bloque que gobierna
 *    el avance del FAR durante ráfagas FDRI es parte de esta tabla.
 * 3. ZERO STATE: Superficie puramente constante; consultas O(1).
 * =================================================================
 */

/// Columnas mayores del dispositivo.
pub const MAJOR_COLUMN_COUNT: u8 = 48;
/// Filas de tiles del dispositivo (mitades de 80 y 80).
pub const TILE_ROW_COUNT: u32 = 160;
/// Primera fila de la mitad superior (top_bottom = 1).
pub const HALF_SPLIT_ROW: u32 = 80;
/// Filas de tiles cubiertas verticalmente por cada trama.
pub const ROWS_PER_FRAME: u32 = 20;
/// Palabras de 32 bits por trama de configuración.
pub const FRAME_WORD_COUNT: usize = 41;
/// Bytes por trama (41 x 4).
pub const FRAME_BYTE_COUNT: usize = 164;
/// Bits por trama (164 x 8).
pub const FRAME_BIT_COUNT: usize = 1312;
/// Primer minor de contenido en columnas BRAM; por debajo es interconexión.
pub const BRAM_CONTENT_FIRST_MINOR: u32 = 28;

use serde::{Deserialize, Serialize};

/// Espacio de nombres de configuración que califica un FAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    Clb = 0,
    Iob = 1,
    BramContent = 2,
    BramInt = 3,
    Dsp = 4,
    Clk = 5,
    Cfg = 6,
    Reserved = 7,
}

impl BlockType {
    /// Decodifica el campo de 3 bits del FAR.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Clb),
            1 => Some(Self::Iob),
            2 => Some(Self::BramContent),
            3 => Some(Self::BramInt),
            4 => Some(Self::Dsp),
            5 => Some(Self::Clk),
            6 => Some(Self::Cfg),
            7 => Some(Self::Reserved),
            _ => None,
        }
    }

    /// Código de 3 bits tal como viaja en el FAR.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Nombre canónico para reportes.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Clb => "CLB",
            Self::Iob => "IOB",
            Self::BramContent => "BRAM_CONTENT",
            Self::BramInt => "BRAM_INT",
            Self::Dsp => "DSP",
            Self::Clk => "CLK",
            Self::Cfg => "CFG",
            Self::Reserved => "RESERVED",
        }
    }
}

/// Clase arquitectónica de una columna mayor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Clb,
    Iob,
    Bram,
    Clk,
}

impl ColumnType {
    /// Nombre canónico para reportes.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Clb => "CLB",
            Self::Iob => "IOB",
            Self::Bram => "BRAM",
            Self::Clk => "CLK",
        }
    }
}

/// Descriptor inmutable de una columna mayor del dispositivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub column_type: ColumnType,
    /// Prefijos de tipo de tile que esta columna instancia verticalmente.
    pub tile_type_names: &'static [&'static str],
    /// Minors totales (tramas por columna).
    pub frames_per_column: u32,
    /// Minors iniciales dedicados a ruteo.
    pub routing_frame_count: u32,
    /// Minors de lógica tras la franja de ruteo (solo CLB).
    pub logic_frame_count: u32,
}

const CLB_LL: ColumnDescriptor = ColumnDescriptor {
    column_type: ColumnType::Clb,
    tile_type_names: &["CLBLL", "INT"],
    frames_per_column: 36,
    routing_frame_count: 22,
    logic_frame_count: 14,
};

const CLB_LM: ColumnDescriptor = ColumnDescriptor {
    column_type: ColumnType::Clb,
    tile_type_names: &["CLBLM", "INT"],
    frames_per_column: 36,
    routing_frame_count: 22,
    logic_frame_count: 14,
};

const IOB: ColumnDescriptor = ColumnDescriptor {
    column_type: ColumnType::Iob,
    tile_type_names: &["IOB", "INT"],
    frames_per_column: 54,
    routing_frame_count: 54,
    logic_frame_count: 0,
};

const BRAM: ColumnDescriptor = ColumnDescriptor {
    column_type: ColumnType::Bram,
    tile_type_names: &["BRAM", "INT"],
    frames_per_column: 92,
    routing_frame_count: 28,
    logic_frame_count: 0,
};

const CLK: ColumnDescriptor = ColumnDescriptor {
    column_type: ColumnType::Clk,
    tile_type_names: &["CLK", "INT"],
    frames_per_column: 4,
    routing_frame_count: 4,
    logic_frame_count: 0,
};

/// Tabla autoritativa de las 48 columnas mayores del VLX50T.
///
/// Columnas 0 y 47 son IOB; 23 y 24 son el espinazo de reloj; las diez
/// columnas {4, 8, 12, 16, 20, 28, 32, 36, 40, 44} son BRAM; el resto son
/// CLB con tipos CLBLL/CLBLM alternados.
pub const COLUMN_TABLE: [ColumnDescriptor; 48] = [
    IOB,    // 0
    CLB_LL, // 1
    CLB_LM, // 2
    CLB_LL, // 3
    BRAM,   // 4
    CLB_LM, // 5
    CLB_LL, // 6
    CLB_LM, // 7
    BRAM,   // 8
    CLB_LL, // 9
    CLB_LM, // 10
    CLB_LL, // 11
    BRAM,   // 12
    CLB_LM, // 13
    CLB_LL, // 14
    CLB_LM, // 15
    BRAM,   // 16
    CLB_LL, // 17
    CLB_LM, // 18
    CLB_LL, // 19
    BRAM,   // 20
    CLB_LM, // 21
    CLB_LL, // 22
    CLK,    // 23
    CLK,    // 24
    CLB_LM, // 25
    CLB_LL, // 26
    CLB_LM, // 27
    BRAM,   // 28
    CLB_LL, // 29
    CLB_LM, // 30
    CLB_LL, // 31
    BRAM,   // 32
    CLB_LM, // 33
    CLB_LL, // 34
    CLB_LM, // 35
    BRAM,   // 36
    CLB_LL, // 37
    CLB_LM, // 38
    CLB_LL, // 39
    BRAM,   // 40
    CLB_LM, // 41
    CLB_LL, // 42
    CLB_LM, // 43
    BRAM,   // 44
    CLB_LL, // 45
    CLB_LM, // 46
    IOB,    // 47
];

/// Orden de marcha del walker para columnas CLB.
const CLB_WALK_ORDER: [u8; 34] = [
    1, 2, 3, 5, 6, 7, 9, 10, 11, 13, 14, 15, 17, 18, 19, 21, 22, 25, 26, 27, 29, 30, 31, 33, 34,
    35, 37, 38, 39, 41, 42, 43, 45, 46,
];

/// Orden de marcha para columnas IOB.
const IOB_WALK_ORDER: [u8; 2] = [0, 47];

/// Orden de marcha para columnas BRAM (interconexión y contenido).
const BRAM_WALK_ORDER: [u8; 10] = [4, 8, 12, 16, 20, 28, 32, 36, 40, 44];

/// Orden de marcha para el espinazo de reloj.
const CLK_WALK_ORDER: [u8; 2] = [23, 24];

/**
 * Retorna el descriptor de la columna mayor, o None fuera de rango.
 *
 * Una columna desconocida no es un pánico: el estrato de mapeo la
 * reporta como cobertura inválida y el detector la convierte en anomalía.
 */
#[must_use]
pub fn column_descriptor(major: u8) -> Option<&'static ColumnDescriptor> {
    COLUMN_TABLE.get(major as usize)
}

/// Minors totales de la columna, o None fuera de rango.
#[must_use]
pub fn frames_per_column(major: u8) -> Option<u32> {
    column_descriptor(major).map(|descriptor| descriptor.frames_per_column)
}

/**
 * Tipo de bloque esperado para un (major, minor) concreto.
 *
 * Implementa la partición BRAM: minors [0, 28) configuran interconexión
 * (BRAM_INT); minors [28, 92) configuran contenido (BRAM_CONTENT).
 */
#[must_use]
pub fn block_type_for(major: u8, minor: u32) -> Option<BlockType> {
    let descriptor = column_descriptor(major)?;
    let block = match descriptor.column_type {
        ColumnType::Clb => BlockType::Clb,
        ColumnType::Iob => BlockType::Iob,
        ColumnType::Clk => BlockType::Clk,
        ColumnType::Bram => {
            if minor < BRAM_CONTENT_FIRST_MINOR {
                BlockType::BramInt
            } else {
                BlockType::BramContent
            }
        }
    };
    Some(block)
}

/// Un minor pertenece a la franja de ruteo de su columna.
#[must_use]
pub fn is_routing_minor(major: u8, minor: u32) -> bool {
    column_descriptor(major)
        .map(|descriptor| minor < descriptor.routing_frame_count)
        .unwrap_or(false)
}

/// Columnas que un bloque visita, en el orden fijo del walker.
#[must_use]
pub fn columns_for_block(block: BlockType) -> &'static [u8] {
    match block {
        BlockType::Clb => &CLB_WALK_ORDER,
        BlockType::Iob => &IOB_WALK_ORDER,
        BlockType::BramContent | BlockType::BramInt => &BRAM_WALK_ORDER,
        BlockType::Clk => &CLK_WALK_ORDER,
        BlockType::Dsp | BlockType::Cfg | BlockType::Reserved => &[],
    }
}

/// Siguiente código de bloque poblado tras `block`, si existe.
#[must_use]
pub fn next_populated_block(block: BlockType) -> Option<BlockType> {
    let mut candidate = block.code() + 1;
    while candidate <= BlockType::Reserved.code() {
        if let Some(next) = BlockType::from_code(candidate) {
            if !columns_for_block(next).is_empty() {
                return Some(next);
            }
        }
        candidate += 1;
    }
    None
}

/**
 * Rango de minors que el walker recorre para un bloque en una columna.
 *
 * El rango es calificado por bloque: BRAM_CONTENT arranca en el minor 28
 * y BRAM_INT termina ahí; cualquier otro bloque recorre la columna entera.
 * Esta es la única lectura bajo la cual cada trama emitida satisface
 * block == block_type_for(major, minor).
 */
#[must_use]
pub fn walker_minor_range(block: BlockType, major: u8) -> Option<std::ops::Range<u32>> {
    let descriptor = column_descriptor(major)?;
    let range = match block {
        BlockType::BramInt => 0..BRAM_CONTENT_FIRST_MINOR,
        BlockType::BramContent => BRAM_CONTENT_FIRST_MINOR..descriptor.frames_per_column,
        _ => 0..descriptor.frames_per_column,
    };
    Some(range)
}
