//! Purpose: Internal JSON parsing boundary shared by the decode tiers.
//! Exports: `parse` module with the strict decode helper and failure categories.
//! Role: Single seam for parser implementation so tiers avoid ad hoc decode logic.
//! Invariants: Every tier parses through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
