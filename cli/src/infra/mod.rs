//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! control-plane CLI adapter, config and record files, and operator prompts.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod agent_runtime;
pub mod aws_cli;
pub mod command_runner;
pub mod config;
pub mod prompt;
pub mod record_store;
