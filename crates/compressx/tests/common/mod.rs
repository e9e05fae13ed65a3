use compressx_core::MediaKind;
use compressx_simulate::{ImageReencoder, SimulateError, SimulatedOutput, SimulationSettings, Upload};
use std::path::PathBuf;
use std::time::Duration;

/// Re-encoder that shrinks images to a fixed fraction without touching disk
pub struct FractionReencoder(pub f64);

impl ImageReencoder for FractionReencoder {
    async fn reencode(&self, upload: &Upload) -> Result<SimulatedOutput, SimulateError> {
        Ok(SimulatedOutput {
            output_size: (upload.size as f64 * self.0) as u64,
            output_path: None,
        })
    }
}

pub fn sample_settings() -> SimulationSettings {
    SimulationSettings::new(
        Duration::from_millis(1500),
        0.4..0.7,
        Duration::from_millis(150),
    )
    .unwrap()
}

pub fn upload(name: &str, size: u64) -> Upload {
    Upload {
        name: name.to_string(),
        path: PathBuf::from(name),
        size,
        kind: MediaKind::from_path(std::path::Path::new(name)),
    }
}
