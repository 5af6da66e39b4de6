//! Unit tests for lambdaphp CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod architecture;
mod aws_invoker;
mod config_service;
