// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

mod capture;
pub mod external;
pub mod forces;
pub mod indicators;
pub mod integrate;
pub mod simulation;

pub use external::*;
pub use forces::{Fluctuation, Load};
pub use indicators::ForceIndicator;
pub use simulation::*;

#[cfg(test)]
mod tests;
