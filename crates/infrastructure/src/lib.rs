//! Ferrous Filters Infrastructure Layer
pub mod engine;
pub mod filters;
