// Content screening — the subprocess client and its supporting pieces.
//
// The ContentScreen trait defines the interface. FilterClient implements it
// by shelling out to an external filter executable. If screening ever moves
// to an HTTP moderation API or an in-process model, that becomes another
// implementation without touching the rest of the pipeline.

pub mod client;
pub mod engine;
pub mod invocation;
pub mod traits;
pub mod verdict;

pub use client::FilterClient;
pub use invocation::{FilterMode, Invocation, InvocationDefaults};
pub use traits::ContentScreen;
pub use verdict::{FilterResult, Verdict};
