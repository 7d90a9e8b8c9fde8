//! Purpose: Library crate behind the `diffuse-normalize` CLI and HTTP front end.
//! Exports: `api` (stable surface), `core` (pipeline stages), `notice` (non-fatal diagnostics).
//! Role: Turns unpredictable generative-pipeline responses into container and content records.
//! Invariants: The pipeline is pure and synchronous; no I/O happens below `api`.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
mod json;
pub mod notice;
