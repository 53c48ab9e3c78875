// [libs/domain/device/src/model.rs]
/*!
 * =================================================================
 * APARATO: DEVICE MODEL QUERY SURFACE (V3.1 - READ-ONLY)
 * CLASIFICACIÓN: DOMAIN DEVICE (ESTRATO L2)
 * RESPONSABILIDAD: VISTA INDEXADA SOBRE EL BUNDLE DEL DISPOSITIVO
 *
 * Seis colecciones paralelas, indexadas una vez en la construcción y
 * compartibles entre cualquier número de lectores. La validación de
 * consistencia corre antes de entregar el modelo: toda referencia de
 * cable, sitio o PIP debe resolver a un tile real.
 * =================================================================
 */

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, instrument};

use crate::errors::DeviceError;
use crate::records::{
    DeviceDataPaths, DeviceInfo, PipRecord, SiteRecord, TileRecord, TileTypeRecord, WireRecord,
};

/// Subcadenas que delatan un tile de ruteo.
const ROUTING_TILE_MARKERS: [&str; 2] = ["INT", "INTERCONNECT"];
/// Subcadenas que delatan un tile con recursos de lógica.
const LOGIC_TILE_MARKERS: [&str; 3] = ["CLB", "SLICE", "LOGIC"];
/// Subcadenas que delatan pertenencia a la red de reloj.
const CLOCK_TILE_MARKERS: [&str; 4] = ["HCLK", "CLK", "BUFG", "CMT"];

/// Vista de solo lectura sobre los datos estáticos del dispositivo.
#[derive(Debug, Clone)]
pub struct DeviceModel {
    info: DeviceInfo,
    tile_types: Vec<TileTypeRecord>,
    tiles: Vec<TileRecord>,
    wires: Vec<WireRecord>,
    sites: Vec<SiteRecord>,
    pips: Vec<PipRecord>,

    tiles_by_name: BTreeMap<String, usize>,
    tiles_by_coordinate: BTreeMap<(u32, u32), usize>,
    tiles_by_type: BTreeMap<String, Vec<usize>>,
    wires_by_tile: BTreeMap<String, Vec<usize>>,
    sites_by_tile: BTreeMap<String, Vec<usize>>,
    sites_by_name: BTreeMap<String, usize>,
    pips_by_tile: BTreeMap<String, Vec<usize>>,
}

impl DeviceModel {
    /**
     * Carga las seis colecciones del bundle y construye los índices.
     *
     * # Errors:
     * I/O o esquema divergente en cualquier archivo; violaciones de
     * consistencia entre colecciones (fatales).
     */
    #[instrument(skip(paths))]
    pub fn from_bundle(paths: &DeviceDataPaths) -> Result<Self, DeviceError> {
        let info: DeviceInfo = load_collection(&paths.device_info)?;
        let tile_types: Vec<TileTypeRecord> = load_collection(&paths.tile_types)?;
        let tiles: Vec<TileRecord> = load_collection(&paths.tiles)?;
        let wires: Vec<WireRecord> = load_collection(&paths.wires)?;
        let sites: Vec<SiteRecord> = load_collection(&paths.sites)?;
        let pips: Vec<PipRecord> = load_collection(&paths.pips)?;
        Self::from_records(info, tile_types, tiles, wires, sites, pips)
    }

    /// Construye el modelo desde colecciones ya residentes.
    pub fn from_records(
        info: DeviceInfo,
        tile_types: Vec<TileTypeRecord>,
        tiles: Vec<TileRecord>,
        wires: Vec<WireRecord>,
        sites: Vec<SiteRecord>,
        pips: Vec<PipRecord>,
    ) -> Result<Self, DeviceError> {
        let mut model = Self {
            info,
            tile_types,
            tiles,
            wires,
            sites,
            pips,
            tiles_by_name: BTreeMap::new(),
            tiles_by_coordinate: BTreeMap::new(),
            tiles_by_type: BTreeMap::new(),
            wires_by_tile: BTreeMap::new(),
            sites_by_tile: BTreeMap::new(),
            sites_by_name: BTreeMap::new(),
            pips_by_tile: BTreeMap::new(),
        };
        model.build_indices();
        model.validate()?;
        info!(
            "🗺️ [DEVICE_MODEL]: {} tiles, {} wires, {} pips, {} sites indexed for {}",
            model.tiles.len(),
            model.wires.len(),
            model.pips.len(),
            model.sites.len(),
            model.info.part
        );
        Ok(model)
    }

    fn build_indices(&mut self) {
        for (index, tile) in self.tiles.iter().enumerate() {
            self.tiles_by_name.insert(tile.name.clone(), index);
            self.tiles_by_coordinate.insert((tile.col, tile.row), index);
            self.tiles_by_type.entry(tile.tile_type.clone()).or_default().push(index);
        }
        for (index, wire) in self.wires.iter().enumerate() {
            self.wires_by_tile.entry(wire.tile.clone()).or_default().push(index);
        }
        for (index, site) in self.sites.iter().enumerate() {
            self.sites_by_tile.entry(site.tile.clone()).or_default().push(index);
            self.sites_by_name.insert(site.name.clone(), index);
        }
        for (index, pip) in self.pips.iter().enumerate() {
            self.pips_by_tile.entry(pip.tile.clone()).or_default().push(index);
        }
    }

    /**
     * Verifica la consistencia entre colecciones.
     *
     * # Errors:
     * `ConsistencyViolation` con la lista completa de referencias
     * colgantes. Un modelo que no valida no debe usarse.
     */
    pub fn validate(&self) -> Result<(), DeviceError> {
        let mut violations = Vec::new();

        for wire in &self.wires {
            if !self.tiles_by_name.contains_key(&wire.tile) {
                violations.push(format!("wire {} references unknown tile {}", wire.wire_id, wire.tile));
            }
        }
        for site in &self.sites {
            if !self.tiles_by_name.contains_key(&site.tile) {
                violations.push(format!("site {} references unknown tile {}", site.name, site.tile));
            }
        }
        for pip in &self.pips {
            if !self.tiles_by_name.contains_key(&pip.tile) {
                violations.push(format!(
                    "pip {}->{} references unknown tile {}",
                    pip.start_wire_id, pip.end_wire_id, pip.tile
                ));
            }
        }
        for tile in &self.tiles {
            if !self.tile_types.iter().any(|tile_type| tile_type.name == tile.tile_type) {
                violations.push(format!("tile {} declares unregistered type {}", tile.name, tile.tile_type));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DeviceError::ConsistencyViolation { violations })
        }
    }

    // ----------------------------------------------------------------
    // Identidad y dimensiones
    // ----------------------------------------------------------------

    /// Nombre de parte del dispositivo.
    #[must_use]
    pub fn part_name(&self) -> &str {
        &self.info.part
    }

    /// Familia del dispositivo.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.info.family_type
    }

    /// Dimensiones del grid como (columnas, filas).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.info.dimensions()
    }

    /// La coordenada cae dentro del grid declarado.
    #[must_use]
    pub fn is_valid_coordinate(&self, col: u32, row: u32) -> bool {
        col <= self.info.cols && row <= self.info.rows
    }

    // ----------------------------------------------------------------
    // Consultas de tiles
    // ----------------------------------------------------------------

    /// Tile por nombre.
    #[must_use]
    pub fn tile_by_name(&self, name: &str) -> Option<&TileRecord> {
        self.tiles_by_name.get(name).map(|&index| &self.tiles[index])
    }

    /// Tile por coordenada (columna, fila).
    #[must_use]
    pub fn tile_at(&self, col: u32, row: u32) -> Option<&TileRecord> {
        self.tiles_by_coordinate.get(&(col, row)).map(|&index| &self.tiles[index])
    }

    /// Tiles de un tipo concreto, en orden de carga.
    #[must_use]
    pub fn tiles_by_type(&self, type_name: &str) -> Vec<&TileRecord> {
        self.tiles_by_type
            .get(type_name)
            .map(|indices| indices.iter().map(|&index| &self.tiles[index]).collect())
            .unwrap_or_default()
    }

    /// Tiles de una fila.
    #[must_use]
    pub fn tiles_in_row(&self, row: u32) -> Vec<&TileRecord> {
        self.tiles.iter().filter(|tile| tile.row == row).collect()
    }

    /// Tiles de una columna.
    #[must_use]
    pub fn tiles_in_column(&self, col: u32) -> Vec<&TileRecord> {
        self.tiles.iter().filter(|tile| tile.col == col).collect()
    }

    /// Colección completa de tiles.
    #[must_use]
    pub fn all_tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    // ----------------------------------------------------------------
    // Recursos por tile
    // ----------------------------------------------------------------

    /// Cables anclados físicamente al tile.
    #[must_use]
    pub fn wires_of_tile(&self, tile_name: &str) -> Vec<&WireRecord> {
        self.wires_by_tile
            .get(tile_name)
            .map(|indices| indices.iter().map(|&index| &self.wires[index]).collect())
            .unwrap_or_default()
    }

    /// Conexiones programables del tile.
    #[must_use]
    pub fn pips_of_tile(&self, tile_name: &str) -> Vec<&PipRecord> {
        self.pips_by_tile
            .get(tile_name)
            .map(|indices| indices.iter().map(|&index| &self.pips[index]).collect())
            .unwrap_or_default()
    }

    /// Sitio de hardware por nombre.
    #[must_use]
    pub fn site_by_name(&self, site_name: &str) -> Option<&SiteRecord> {
        self.sites_by_name.get(site_name).map(|&index| &self.sites[index])
    }

    /// Sitios de hardware del tile.
    #[must_use]
    pub fn sites_of_tile(&self, tile_name: &str) -> Vec<&SiteRecord> {
        self.sites_by_tile
            .get(tile_name)
            .map(|indices| indices.iter().map(|&index| &self.sites[index]).collect())
            .unwrap_or_default()
    }

    /// Aristas del grafo de ruteo que parten de (tile, wire_id):
    /// nodos alcanzables vía PIPs como (tile_destino, wire_destino).
    #[must_use]
    pub fn pips_from(&self, tile_name: &str, wire_id: u32) -> Vec<(&str, u32)> {
        self.pips_of_tile(tile_name)
            .into_iter()
            .filter(|pip| pip.start_wire_id == wire_id)
            .map(|pip| (pip.tile.as_str(), pip.end_wire_id))
            .collect()
    }

    // ----------------------------------------------------------------
    // Predicados de clasificación
    // ----------------------------------------------------------------

    /// El tile existe principalmente para rutear señal.
    #[must_use]
    pub fn is_routing_tile(&self, tile: &TileRecord) -> bool {
        ROUTING_TILE_MARKERS.iter().any(|marker| tile.tile_type.contains(marker))
    }

    /// El tile contiene recursos de lógica.
    #[must_use]
    pub fn is_logic_tile(&self, tile: &TileRecord) -> bool {
        LOGIC_TILE_MARKERS.iter().any(|marker| tile.tile_type.contains(marker))
    }

    /// El tile forma parte de la red de reloj.
    #[must_use]
    pub fn is_clock_tile(&self, tile: &TileRecord) -> bool {
        CLOCK_TILE_MARKERS.iter().any(|marker| tile.tile_type.contains(marker))
    }
}

fn load_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DeviceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DeviceError::BundleIo {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DeviceError::BundleSchema {
        path: path.display().to_string(),
        source,
    })
}
