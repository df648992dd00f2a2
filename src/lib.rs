//! opmatrix: garment operation matrix toolkit
//!
//! Reads production-sheet CSV files in two layouts (the flat summary this
//! toolkit exports, and the nested raw sheet from the upstream system),
//! merges them into one collection keyed by colour code, and renders or
//! re-exports the operation matrix.

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
pub mod parser;
