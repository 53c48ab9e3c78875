// [libs/domain/mapping/src/tile_name.rs]
/*!
 * =================================================================
 * APARATO: TILE NAME CODEC (V3.0)
 * CLASIFICACIÓN: DOMAIN MAPPING (ESTRATO L2)
 * RESPONSABILIDAD: NOMBRES CANÓNICOS "{TIPO}_X{col}Y{fila}"
 * =================================================================
 */

/// Compone el nombre canónico de un tile.
#[must_use]
pub fn compose_tile_name(tile_type: &str, column: u8, row: u32) -> String {
    format!("{tile_type}_X{column}Y{row}")
}

/**
 * Descompone un nombre canónico en (tipo, columna, fila).
 * Retorna None ante cualquier desviación del patrón.
 */
#[must_use]
pub fn parse_tile_name(name: &str) -> Option<(&str, u8, u32)> {
    let x_position = name.rfind("_X")?;
    let y_position = name.rfind('Y')?;
    if y_position <= x_position + 2 {
        return None;
    }
    let tile_type = &name[..x_position];
    let column: u8 = name[x_position + 2..y_position].parse().ok()?;
    let row: u32 = name[y_position + 1..].parse().ok()?;
    if tile_type.is_empty() {
        return None;
    }
    Some((tile_type, column, row))
}
