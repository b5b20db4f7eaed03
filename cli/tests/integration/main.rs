//! Integration tests for agentctl CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach the control plane: every command exercised here stops
//! before its first remote call.
