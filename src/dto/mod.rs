//! Wire types and payload validation for the game API protocol.

pub mod actions;
pub mod neuro;
pub mod validation;
