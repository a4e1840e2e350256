//! Acceptance tests for aether-fuzz.
//!
//! These tests drive whole campaigns against scripted fake compilers:
//! - Exit-code policy for crashes, timeouts, and clean runs
//! - Fast failure when the target is missing
//! - Reproducibility under a fixed seed
//! - Early stop at iteration boundaries
//!
//! Fake targets are `/bin/sh` scripts, so the suite is Unix-only.

#![cfg(unix)]

mod acceptance;
