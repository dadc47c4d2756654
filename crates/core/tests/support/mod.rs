//! Shared test helpers for `docpulse-core` integration tests.
//!
//! In-memory implementations of every core port plus a few file and event
//! fixtures, so the pipeline tests can focus on behaviour.

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;
