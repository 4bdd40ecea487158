//! Reference learning engine for the bandit wrapper.
//!
//! [`AdfEngine`] speaks the same line-oriented example protocol and option
//! strings as an external ADF contextual-bandit learner, entirely in-process.
//! It is what the binary wires by default and what behavioural tests run
//! against.

pub mod adf;
pub mod example;
pub mod model;
pub mod options;

pub use adf::AdfEngine;
pub use example::{AdfExample, CbLabel};
pub use options::EngineOptions;
