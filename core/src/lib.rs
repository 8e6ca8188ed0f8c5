//! Round engine and level ladder for the Mirage memory game.
//!
//! The player watches a few cells light up on a grid, then has to pick the
//! cells that continue the sequence before the countdown runs out. This crate
//! holds the rules only; rendering, real timers and storage belong to the
//! host, which talks to the engine through [`TimerCommand`]s and a
//! [`ProgressStore`].

#![no_std]

extern crate alloc;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use ladder::*;
pub use level::*;
pub use timer::*;
pub use types::*;

mod config;
mod engine;
mod error;
mod ladder;
mod level;
mod timer;
mod types;
