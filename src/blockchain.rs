// Thin re-export module: implementation is in `blockchain/core.rs` to allow
// progressive decomposition of ledger responsibilities (chain management,
// balance state, validation).

pub mod core;
pub use core::*;
