//! cairn - workspace companion and upgrade manager for the Trek agent CLI.
//!
//! cairn keeps an agent-assisted workspace healthy: it maintains shared
//! workspace templates and settings, and it keeps both itself and the wrapped
//! `trek` CLI up to date. The heart of the crate is the self-update engine in
//! [`upgrade`], which discovers releases, verifies downloads, and atomically
//! replaces the running executable.
//!
//! # Modules
//!
//! - [`assets`] - embedded workspace templates and their materialization
//! - [`cli`] - command-line interface and argument parsing
//! - [`env`] - per-run environment (paths, endpoints, overrides)
//! - [`error`] - error types and result aliases
//! - [`settings`] - persisted settings and the post-upgrade default-merge
//! - [`trek`] - install-method detection and upgrade of the wrapped CLI
//! - [`ui`] - terminal output, prompts, and progress
//! - [`upgrade`] - the self-update engine

pub mod assets;
pub mod cli;
pub mod env;
pub mod error;
pub mod settings;
pub mod trek;
pub mod ui;
pub mod upgrade;

pub use error::{CairnError, Result};
