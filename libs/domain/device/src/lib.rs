// [libs/domain/device/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DEVICE MODEL BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN DEVICE (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DEL MODELO ESTÁTICO DEL DISPOSITIVO
 * =================================================================
 */

pub mod errors;
pub mod graph;
pub mod model;
pub mod records;

pub use errors::DeviceError;
pub use graph::{DeviceGraph, TileRoutingGraph};
pub use model::DeviceModel;
pub use records::{
    DeviceDataPaths, DeviceInfo, PipRecord, SiteRecord, TileRecord, TileTypeRecord, WireRecord,
};
