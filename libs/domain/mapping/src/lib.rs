// [libs/domain/mapping/src/lib.rs]
/*!
 * =================================================================
 * APARATO: MAPPING DOMAIN BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN MAPPING (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DE MAPEO DIRECTO E INVERSO
 * =================================================================
 */

pub mod forward;
pub mod memo;
pub mod reverse;
pub mod tile_name;

pub use forward::{BitRange, FrameCoverage, FrameMapper, ResourceCategory, TrojanRiskLevel};
pub use reverse::{FrameClass, FrameReference, IndexStrategy, ReverseMapper};
pub use tile_name::parse_tile_name;
