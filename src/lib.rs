#![doc = include_str!("../README.md")]
// If this was in Cargo.toml, it would cover tests as well
#![warn(
    missing_docs,
    clippy::panic_in_result_fn,
    clippy::missing_assert_message,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

#[cfg(not(unix))]
compile_error!("fdchan relies on Unix-domain socket pairs and only builds on Unix-like systems");

#[macro_use]
mod macros;

pub mod channel;
pub mod error;
pub mod pipe;
pub mod sys;

pub use {
    channel::{ChannelCore, Direction, PipeId},
    error::{Error, Result},
    pipe::{pipe, pipe_with, PipeSink, PipeSource},
};
