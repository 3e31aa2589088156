//! Integration test crate for FrameScrub.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every library crate to verify they work together.

#[cfg(test)]
mod search;

#[cfg(test)]
mod session;
