pub mod questions;
pub mod sessions;
