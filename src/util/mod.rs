//! Utility modules: cancellation helpers.

pub mod cancel;
