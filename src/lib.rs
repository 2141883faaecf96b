//! Rigid-body molecular dynamics core of the Particular puzzle game.
//!
//! A [`simulation::Core`] owns molecules made of atoms, the active pairwise
//! [`atomic_force::AtomicForce`], and the level's field elements (barriers,
//! portals, brownian elements, releasers). Each fixed tick computes every
//! molecule's force and torque from the start-of-tick state, then integrates.

pub mod atomic_force;
pub mod body;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod field;
pub mod io;
pub mod level;
pub mod parameter;
pub mod profiler;
pub mod simulation;
pub mod units;

pub use error::{Error, Result};
pub use simulation::{Core, StepReport};

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
