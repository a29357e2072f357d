//! postgen is a post-generation hook for project templates.
//! It prunes placeholder paths, removes files that leaked out of collapsed
//! conditional directories, regenerates flag-dependent files and marks
//! launcher scripts executable, so the generated tree matches the chosen
//! feature flags.

/// Post-run scan for leftover placeholder paths
pub mod audit;

/// Command-line interface module for the postgen binary
pub mod cli;

/// Context and manifest loading
/// Supports JSON and YAML, plus the hook payload scaffolding tools send on stdin
pub mod config;

pub mod constants;

/// Error types and handling for postgen
pub mod error;

pub mod filesystem;

/// Declarative tables of sentinels, leaks, artifacts and scripts
pub mod manifest;

/// Feature flag resolution
pub mod options;

/// Executable bits for launcher scripts
pub mod permissions;

/// Pipeline orchestration
/// Resolve -> prune -> reconcile -> regenerate -> set executable bits
pub mod pipeline;

/// Path dispositions derived from the manifest
pub mod plan;

pub mod prune;

pub mod reconcile;

pub mod regenerate;

/// MiniJinja rendering of path templates and artifact fragments
pub mod renderer;
