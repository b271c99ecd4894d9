// agriquota-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts towards the backend that owns quota counters.
pub mod ports;

// 2. Domain (business core)
// Variables, criteria, quotas and the evaluator.
// Depends on nothing else (no infra, no app).
pub mod domain;

// 3. Infrastructure (Adapters)
// YAML/JSON loaders, project config, atomic file output.
pub mod infrastructure;

// 4. Application (Use Cases)
// Allocation, monitoring, definition validation.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::AgriquotaError;
