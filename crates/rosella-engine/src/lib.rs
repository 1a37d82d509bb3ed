//! Rosella engine crate.
//!
//! Brings up the graphics API context, owns the display surface and its frame
//! loop, and provides small math helpers used by frame logic.

pub mod curve;
pub mod graphics;
pub mod logging;
pub mod window;

#[cfg(test)]
mod testing;
