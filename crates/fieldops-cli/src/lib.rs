//! Field-ops CLI library.
//!
//! This crate provides the `fieldops` command-line interface over the
//! tracker service and the file-backed work item store.

pub mod cli;
pub mod commands;
