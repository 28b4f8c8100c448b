//! Shared test support.

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

pub mod mocks;
