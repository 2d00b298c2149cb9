//! # earthvol-cli
//!
//! Command-line surface for the survey pipeline: argument definitions and
//! the named-algorithm registry. The `earthvol` binary in this crate wires
//! these to the qgis_process engine.

mod cli;
pub mod registry;

pub use cli::{Cli, Command, SurveyArgs};
