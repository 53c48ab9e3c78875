// [libs/domain/semantic/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SEMANTIC DOMAIN BARREL (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN SEMANTIC (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN DE SEMÁNTICA DE BITS Y RECONSTRUCCIÓN
 * =================================================================
 */

pub mod bit_semantics;
pub mod logic;
pub mod routing;

pub use bit_semantics::{
    BitDescriptor, BitFunction, BitLayoutDatabase, SemanticFrameDiff, SemanticSeverity,
};
pub use logic::{
    analyze_lut_modification, FfConfig, LogicComparison, LogicConfiguration, LogicReconstructor,
    LutChangeClass, LutChangeSemantic, LutConfig, LutModification, LutModificationAnalysis,
};
pub use routing::{
    ActivePip, PipBitResolver, RoutingComparison, RoutingConfiguration, RoutingReconstructor,
};
