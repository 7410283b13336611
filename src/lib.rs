//! Library crate for nuru-clock, exposing modules for the binary and integration tests.

pub mod config;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;
