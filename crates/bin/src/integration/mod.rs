//! Integration layer between the CLI and the connectedness engine.
//!
//! This module handles everything the engine treats as external: reading
//! return panels from disk and resolving run configuration.

pub(crate) mod panel_loader;
pub(crate) mod settings;
