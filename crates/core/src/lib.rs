//! Domain logic for the profile describer.
//!
//! Pure types and functions only: no database, storage, or HTTP code lives
//! here, so everything in this crate is unit-testable in isolation.

pub mod answer;
pub mod attribute;
pub mod collection;
pub mod error;
pub mod expander;
pub mod profile;
pub mod session;
pub mod types;
