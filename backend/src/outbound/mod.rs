//! Driven adapters implementing the domain ports.

pub mod events;
pub mod persistence;
