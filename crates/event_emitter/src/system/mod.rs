/// Emitter - broken down into registry core, registration, removal and emission
mod core;
mod emitters;
mod handlers;
mod management;
mod stats;

pub use core::Emitter;
pub use stats::EmitterStats;
