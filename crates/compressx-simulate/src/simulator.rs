use compressx_core::{Config, MediaKind};
use rand::Rng;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};

use crate::{ImageReencoder, SimulateError, SimulatedOutput, Upload};

/// Largest random progress increment per tick, in percent
const MAX_PROGRESS_STEP: f64 = 15.0;

/// Timing and size parameters, checked on construction
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    document_delay: Duration,
    document_ratio: Range<f64>,
    progress_interval: Duration,
}

impl SimulationSettings {
    /// `document_ratio` is the half-open output/input size ratio for documents
    pub fn new(
        document_delay: Duration,
        document_ratio: Range<f64>,
        progress_interval: Duration,
    ) -> Result<Self, SimulateError> {
        let Range { start, end } = document_ratio;
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) || start >= end {
            return Err(SimulateError::InvalidSettings(format!(
                "document ratio range [{start}, {end}) must be non-empty and within [0, 1]"
            )));
        }
        if progress_interval.is_zero() {
            return Err(SimulateError::InvalidSettings(
                "progress interval must be positive".to_string(),
            ));
        }
        Ok(Self {
            document_delay,
            document_ratio,
            progress_interval,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SimulateError> {
        Self::new(
            Duration::from_millis(config.document_delay_ms),
            config.document_ratio_min..config.document_ratio_max,
            Duration::from_millis(config.progress_interval_ms),
        )
    }

    /// Delay before a document result is produced
    pub fn document_delay(&self) -> Duration {
        self.document_delay
    }

    pub fn document_ratio(&self) -> Range<f64> {
        self.document_ratio.clone()
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            document_delay: Duration::from_millis(1500),
            document_ratio: 0.4..0.7,
            progress_interval: Duration::from_millis(150),
        }
    }
}

/// Produces simulated compression results
pub struct Simulator<R> {
    settings: SimulationSettings,
    reencoder: Arc<R>,
}

impl<R: ImageReencoder> Simulator<R> {
    pub fn new(settings: SimulationSettings, reencoder: R) -> Self {
        Self {
            settings,
            reencoder: Arc::new(reencoder),
        }
    }

    /// Run one simulated compression to completion
    pub async fn simulate(&self, upload: &Upload) -> Result<SimulatedOutput, SimulateError> {
        run(&self.settings, self.reencoder.as_ref(), upload).await
    }

    /// Start a simulated compression on the current tokio runtime.
    ///
    /// Progress is published while it runs; the result is delivered once
    /// through the returned handle. There is no cancellation: dropping the
    /// handle only discards the result.
    pub fn spawn(&self, upload: Upload) -> PendingCompression {
        let (progress_tx, progress_rx) = watch::channel(0u8);
        let (done_tx, done_rx) = oneshot::channel();
        let settings = self.settings.clone();
        let reencoder = Arc::clone(&self.reencoder);

        tokio::spawn(async move {
            let work = run(&settings, reencoder.as_ref(), &upload);
            tokio::pin!(work);

            let mut ticker = tokio::time::interval(settings.progress_interval);
            ticker.tick().await;
            let mut progress = 0.0f64;

            let result = loop {
                tokio::select! {
                    result = &mut work => break result,
                    _ = ticker.tick() => {
                        let step = rand::thread_rng().gen_range(0.0..MAX_PROGRESS_STEP);
                        progress = (progress + step).min(100.0);
                        progress_tx.send_replace(progress as u8);
                    }
                }
            };

            progress_tx.send_replace(100);
            if done_tx.send(result).is_err() {
                tracing::debug!(name = %upload.name, "compression result discarded");
            }
        });

        PendingCompression {
            progress: progress_rx,
            done: done_rx,
        }
    }
}

async fn run<R: ImageReencoder>(
    settings: &SimulationSettings,
    reencoder: &R,
    upload: &Upload,
) -> Result<SimulatedOutput, SimulateError> {
    let output = match upload.kind {
        MediaKind::Image => reencoder.reencode(upload).await?,
        MediaKind::Document => {
            tokio::time::sleep(settings.document_delay).await;
            let ratio = rand::thread_rng().gen_range(settings.document_ratio.clone());
            SimulatedOutput {
                output_size: (upload.size as f64 * ratio).floor() as u64,
                output_path: None,
            }
        }
    };

    tracing::info!(
        name = %upload.name,
        kind = %upload.kind,
        input_size = upload.size,
        output_size = output.output_size,
        "simulated compression finished"
    );
    Ok(output)
}

/// Handle to a running simulated compression
#[derive(Debug)]
pub struct PendingCompression {
    progress: watch::Receiver<u8>,
    done: oneshot::Receiver<Result<SimulatedOutput, SimulateError>>,
}

impl PendingCompression {
    /// Progress in percent, 0..=100; reaches 100 when the result is ready
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.clone()
    }

    pub async fn wait(self) -> Result<SimulatedOutput, SimulateError> {
        self.done.await.map_err(|_| SimulateError::Abandoned)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio::time::Instant;

    /// Re-encoder that halves the input immediately
    struct HalfSize;

    impl ImageReencoder for HalfSize {
        async fn reencode(&self, upload: &Upload) -> Result<SimulatedOutput, SimulateError> {
            Ok(SimulatedOutput {
                output_size: upload.size / 2,
                output_path: None,
            })
        }
    }

    struct Broken;

    impl ImageReencoder for Broken {
        async fn reencode(&self, upload: &Upload) -> Result<SimulatedOutput, SimulateError> {
            Err(SimulateError::Reencode {
                name: upload.name.clone(),
                status: "exit status: 1".to_string(),
                stderr: "bad image".to_string(),
            })
        }
    }

    fn upload(name: &str, size: u64, kind: MediaKind) -> Upload {
        Upload {
            name: name.to_string(),
            path: PathBuf::from(name),
            size,
            kind,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_document_completes_after_delay() {
        let simulator = Simulator::new(SimulationSettings::default(), HalfSize);
        let start = Instant::now();

        let output = simulator
            .simulate(&upload("doc.pdf", 1_000_000, MediaKind::Document))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(output.output_size >= 400_000, "{}", output.output_size);
        assert!(output.output_size < 700_000, "{}", output.output_size);
        assert!(output.output_path.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_document_ratio_stays_in_range() {
        let simulator = Simulator::new(SimulationSettings::default(), HalfSize);
        for _ in 0..50 {
            let output = simulator
                .simulate(&upload("doc.pdf", 10_000, MediaKind::Document))
                .await
                .unwrap();
            assert!((4_000..7_000).contains(&output.output_size));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_has_no_artificial_delay() {
        let simulator = Simulator::new(SimulationSettings::default(), HalfSize);
        let start = Instant::now();

        let output = simulator
            .simulate(&upload("a.png", 1000, MediaKind::Image))
            .await
            .unwrap();

        assert_eq!(output.output_size, 500);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_failure_propagates() {
        let simulator = Simulator::new(SimulationSettings::default(), Broken);
        let err = simulator
            .simulate(&upload("a.png", 1000, MediaKind::Image))
            .await
            .unwrap_err();
        assert!(matches!(err, SimulateError::Reencode { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_reports_progress_then_result() {
        let simulator = Simulator::new(SimulationSettings::default(), HalfSize);
        let pending = simulator.spawn(upload("doc.pdf", 2_000, MediaKind::Document));

        let mut progress = pending.progress();
        let watcher = tokio::spawn(async move {
            let mut seen = vec![*progress.borrow_and_update()];
            while progress.changed().await.is_ok() {
                let value = *progress.borrow_and_update();
                seen.push(value);
                if value == 100 {
                    break;
                }
            }
            seen
        });

        let output = pending.wait().await.unwrap();
        assert!((800..1_400).contains(&output.output_size));

        let seen = watcher.await.unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_runs_complete_independently() {
        let simulator = Simulator::new(SimulationSettings::default(), HalfSize);
        let first = simulator.spawn(upload("a.pdf", 1_000, MediaKind::Document));
        let second = simulator.spawn(upload("b.png", 1_000, MediaKind::Image));

        assert_eq!(second.wait().await.unwrap().output_size, 500);
        assert!(first.wait().await.unwrap().output_size < 700);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::new();
        config.document_delay_ms = 10;
        config.document_ratio_min = 0.1;
        config.document_ratio_max = 0.2;

        let settings = SimulationSettings::from_config(&config).unwrap();
        assert_eq!(settings.document_delay(), Duration::from_millis(10));
        assert_eq!(settings.document_ratio(), 0.1..0.2);
        assert_eq!(settings.progress_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_default_settings_match_default_config() {
        let from_config = SimulationSettings::from_config(&Config::default()).unwrap();
        let default = SimulationSettings::default();
        assert_eq!(default.document_delay(), from_config.document_delay());
        assert_eq!(default.document_ratio(), from_config.document_ratio());
        assert_eq!(default.progress_interval(), from_config.progress_interval());
    }

    #[test]
    fn test_settings_reject_values_that_would_panic() {
        let delay = Duration::from_millis(10);
        let tick = Duration::from_millis(1);
        let bad_ratios = [0.5..0.5, 0.7..0.4, -0.1..0.5, 0.2..1.5, f64::NAN..0.5];
        for ratio in bad_ratios {
            assert!(
                matches!(
                    SimulationSettings::new(delay, ratio.clone(), tick),
                    Err(SimulateError::InvalidSettings(_))
                ),
                "{ratio:?}"
            );
        }
        assert!(matches!(
            SimulationSettings::new(delay, 0.4..0.7, Duration::ZERO),
            Err(SimulateError::InvalidSettings(_))
        ));
        assert!(SimulationSettings::new(delay, 0.0..1.0, tick).is_ok());
    }
}
