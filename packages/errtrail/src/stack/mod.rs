//! Stack capture, resolution and per-link chain normalization
//!
//! - [`Stack`] records raw addresses when an error is built
//! - [`Frame`] is one resolved call site
//! - [`stack_chain`] walks a causal chain into [`ChainRecord`]s
//! - [`StackAdapter`] lets foreign error types contribute their own frames

pub mod capture;
pub mod chain;
pub mod foreign;
pub mod frame;

pub use capture::{Stack, MAX_STACK_DEPTH};
pub use chain::{stack_chain, stack_chain_opt, ChainRecord, RecordSnapshot};
pub use foreign::{register_adapter, register_tracer, StackAdapter, StackTracer, TracerAdapter};
pub use frame::Frame;
