// SPDX-License-Identifier: MIT
//
// Jitterpool: Blocking Entropy Pool Fed by Network Round-Trip Jitter
//
// https://github.com/yourusername/jitterpool

//! Jitterpool Core Library
//!
//! This crate implements a software entropy accumulator. Round-trip timings of
//! an external network probe are treated as a weakly random noise process,
//! mixed into a bounded-size entropy pool, and drawn back out as fixed-size
//! bitstrings, optionally whitened through a cryptographic hash.
//!
//! # Architecture
//!
//! The library is organized into modules representing core concerns:
//! - `source`: Jitter source contract and the ping probe adapter
//! - `pool`: Entropy pool with accumulation, blocking extraction, and whitened output
//! - `whiten`: Hash whitening primitives (SHA-1 / SHA-256)
//! - `config`: Configuration management with validation
//! - `metrics`: Process-lifetime counters and probe latency percentiles
//! - `error`: Unified error types
//!
//! # Design Principles
//!
//! 1. **Faithful semantics**: The accumulation and extraction algorithms, with
//!    their blocking behavior, are the contract; statistical quality is not
//! 2. **Explicit state**: The pool is an owned, lock-guarded handle, never a
//!    hidden process-wide global
//! 3. **Testability**: The jitter source is a trait, so every pool behavior is
//!    testable with deterministic scripted sources
//! 4. **Degrade, don't abort**: Probe failures shrink a round's contribution,
//!    possibly to nothing; they never surface to callers

pub mod config;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod source;
pub mod whiten;

pub use error::{Error, Result};
pub use pool::EntropyPool;
pub use source::{JitterSource, PingProbe, ProbeConfig};
pub use whiten::{Whitener, WhitenerKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard ceiling on pool content; accumulation refuses to run at or above this
/// bit length
pub const POOL_CAPACITY_BITS: u64 = 4096;

/// Accumulation keeps looping until the pool holds at least this many bits
pub const POOL_LOW_WATERMARK_BITS: u64 = 512;

/// Probe attempts per accumulation round
pub const SAMPLES_PER_ROUND: usize = 5;

/// Fixed displacement applied to old pool content when mixing in a round
pub const MIX_SHIFT_BITS: u64 = 32;

/// Probe latency in milliseconds is scaled by this factor and truncated to an
/// integer, preserving one decimal digit of the measurement
pub const LATENCY_SCALE: f64 = 10.0;
