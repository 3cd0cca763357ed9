// Terminal presentation for check results. The main.rs display logic
// delegates here.

mod terminal;

pub use terminal::{display_batch, display_result, truncate_chars};
