// Firebreak: client wrapper for an external AI content-moderation filter.
//
// This is the library root. The `screen` module is the core — invocation
// building, process execution, and verdict normalization. `output` is
// terminal presentation only.

pub mod config;
pub mod output;
pub mod screen;
