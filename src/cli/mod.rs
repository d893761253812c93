//! Support code for the `interpose` binary.

pub mod catalog;
pub mod script;
pub mod settings;
