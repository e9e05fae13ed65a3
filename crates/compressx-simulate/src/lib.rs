//! Simulated compression: a fabricated output size produced asynchronously.
//!
//! Nothing here compresses data. Documents get a random size ratio after a
//! fixed delay; images are handed to an external re-encoder.

mod error;
mod reencode;
mod simulator;
mod upload;

pub use error::SimulateError;
pub use reencode::{ExternalReencoder, ImageReencoder};
pub use simulator::{PendingCompression, SimulationSettings, Simulator};
pub use upload::{SimulatedOutput, Upload};
