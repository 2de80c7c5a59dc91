//! # Mimizuku CLI Library
//!
//! Command-line access to EL concept learning: learn concepts for
//! learning problems, inspect refinements and ontology statistics

pub mod commands;

pub use commands::*;
