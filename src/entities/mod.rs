//! Record types produced by the parser
//!
//! - [`ProductVariant`] - one colour code with its operation steps
//! - [`OperationData`] - one operation step (`stt`) with configurations and materials
//! - [`OperationConfig`] - machine/technical setup for one sub-variant
//! - [`MaterialInfo`] - a material consumed at an operation
//! - [`TechSpecs`] - the exported `Technical Specs` column

pub mod operation;
pub mod tech_specs;
pub mod variant;

pub use operation::{MaterialInfo, OperationConfig, OperationData};
pub use tech_specs::TechSpecs;
pub use variant::ProductVariant;
