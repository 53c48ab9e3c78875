// [libs/domain/device/src/records.rs]
/*!
 * =================================================================
 * APARATO: DEVICE BUNDLE RECORDS (V3.0)
 * CLASIFICACIÓN: DOMAIN DEVICE (ESTRATO L2)
 * RESPONSABILIDAD: ESQUEMA SERDE DE LAS SEIS COLECCIONES JSON
 * =================================================================
 */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identidad y dimensiones del dispositivo (`deviceInfo.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub part: String,
    #[serde(rename = "partName")]
    pub part_name: String,
    #[serde(rename = "familyType")]
    pub family_type: String,
    pub rows: u32,
    pub cols: u32,
}

impl DeviceInfo {
    /// Dimensiones como (columnas, filas).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }
}

/// Tipo de tile registrado (`tileTypes.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTypeRecord {
    pub name: String,
}

/// Tile del grid del dispositivo (`tiles.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub name: String,
    pub row: u32,
    pub col: u32,
    #[serde(rename = "type")]
    pub tile_type: String,
}

impl TileRecord {
    /// Coordenadas como (columna, fila).
    #[must_use]
    pub fn coordinates(&self) -> (u32, u32) {
        (self.col, self.row)
    }
}

/// Cable físico anclado a un tile (`wires.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    pub tile: String,
    #[serde(rename = "wireId")]
    pub wire_id: u32,
}

/// Sitio de hardware dentro de un tile (`sites.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub site_type: String,
    pub tile: String,
}

/// Punto de interconexión programable (`pips.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipRecord {
    pub tile: String,
    #[serde(rename = "startWireId")]
    pub start_wire_id: u32,
    #[serde(rename = "endWireId")]
    pub end_wire_id: u32,
}

/// Rutas físicas de las seis colecciones del bundle.
#[derive(Debug, Clone)]
pub struct DeviceDataPaths {
    pub device_info: PathBuf,
    pub tile_types: PathBuf,
    pub tiles: PathBuf,
    pub wires: PathBuf,
    pub sites: PathBuf,
    pub pips: PathBuf,
}

impl DeviceDataPaths {
    /// Resuelve los nombres canónicos dentro de un directorio.
    #[must_use]
    pub fn from_directory<P: AsRef<Path>>(directory: P) -> Self {
        let base = directory.as_ref();
        Self {
            device_info: base.join("deviceInfo.json"),
            tile_types: base.join("tileTypes.json"),
            tiles: base.join("tiles.json"),
            wires: base.join("wires.json"),
            sites: base.join("sites.json"),
            pips: base.join("pips.json"),
        }
    }
}
