//! Integration test crate for cutlist.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every library crate to verify they work together.

#[cfg(test)]
mod interchange;

#[cfg(test)]
mod editing;
