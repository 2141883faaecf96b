// body/mod.rs
// Re-exports for the body module

mod atom;
mod factory;
mod molecule;

pub use atom::*;
pub use factory::*;
pub use molecule::*;

#[cfg(test)]
#[path = "tests/mass_center.rs"]
mod mass_center;

#[cfg(test)]
#[path = "tests/rigid_state.rs"]
mod rigid_state;
