//! A bounded, editable prompt/response conversation buffer.
//!
//! [`buffer`] holds the core state machine and its containers; [`cli`] is the
//! interactive driver built on top of it.

pub mod buffer;
pub mod cli;
