//! # earthvol-qgis
//!
//! [`GeoProcessing`](earthvol_engine::GeoProcessing) implementation that
//! drives the `qgis_process` command-line tool as a subprocess.
//!
//! Each engine operation maps to one QGIS processing algorithm:
//!
//! - clip → `gdal:cliprasterbymasklayer`
//! - band statistics → `native:rasterlayerstatistics`
//! - volume at level → `native:rastersurfacevolume`
//!
//! Invocations use `qgis_process run <algorithm> --json -- NAME=value ...`
//! and parse the JSON result envelope. A binary that cannot be spawned or
//! fails its version probe is reported as
//! [`EngineError::Unavailable`](earthvol_engine::EngineError::Unavailable)
//! (systemic); an algorithm run that fails is reported as the matching
//! per-operation error, so a single bad level query never looks like a
//! missing engine.
//!
//! # Example
//!
//! ```no_run
//! use earthvol_qgis::QgisProcessEngine;
//!
//! // Uses QGIS_PROCESS_PATH or the PATH lookup of `qgis_process`.
//! let engine = QgisProcessEngine::discover(None)?;
//! println!("using {}", engine.binary().display());
//! # Ok::<(), earthvol_engine::EngineError>(())
//! ```

mod output;
mod process;

pub use process::{QgisProcessEngine, QGIS_PROCESS_ENV};
