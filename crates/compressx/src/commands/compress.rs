use chrono::Utc;
use compressx_core::{bytes_to_mb, CompressionRecord, Config, Session};
use compressx_simulate::{
    ExternalReencoder, ImageReencoder, PendingCompression, SimulateError, SimulatedOutput,
    SimulationSettings, Simulator, Upload,
};
use std::path::PathBuf;

use super::{open_session, Context};

pub fn run(ctx: &Context, files: &[PathBuf]) -> anyhow::Result<()> {
    let simulator = Simulator::new(
        SimulationSettings::from_config(&ctx.config)?,
        ExternalReencoder::new(ctx.config.image_command.as_str(), ctx.paths.output_dir()),
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcomes = runtime.block_on(compress_all(&ctx.config, &simulator, files));

    let mut store = ctx.open_store()?;
    let mut session = open_session(ctx, store.as_mut())?;
    let failed = record_all(&mut session, outcomes);

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}

type Outcome = anyhow::Result<(Upload, SimulatedOutput)>;

/// Record every successful outcome, reporting each failure; returns the failure count
fn record_all(session: &mut Session<'_>, outcomes: Vec<Outcome>) -> usize {
    let mut failed = 0usize;
    for outcome in outcomes {
        let recorded = outcome.and_then(|(upload, output)| {
            let record = session.record(
                bytes_to_mb(upload.size),
                bytes_to_mb(output.output_size),
                &upload.name,
                Utc::now(),
            )?;
            Ok(format_result(&record, output.output_path.as_deref()))
        });
        match recorded {
            Ok(line) => println!("{line}"),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {e:#}");
            }
        }
    }
    failed
}

/// Validate and start every upload at once, then collect results in input order
async fn compress_all<R: ImageReencoder>(
    config: &Config,
    simulator: &Simulator<R>,
    files: &[PathBuf],
) -> Vec<Outcome> {
    let mut started = Vec::with_capacity(files.len());
    for path in files {
        let upload = Upload::from_path(path)
            .map_err(anyhow::Error::from)
            .and_then(|upload| {
                config.check_upload(&upload.name, upload.size)?;
                Ok(upload)
            });
        started.push(upload.map(|upload| {
            let pending = simulator.spawn(upload.clone());
            (upload, pending)
        }));
    }

    let mut outcomes = Vec::with_capacity(started.len());
    for entry in started {
        outcomes.push(match entry {
            Ok((upload, pending)) => match finish(&upload.name, pending).await {
                Ok(output) => Ok((upload, output)),
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e),
        });
    }
    outcomes
}

async fn finish(
    name: &str,
    pending: PendingCompression,
) -> Result<SimulatedOutput, SimulateError> {
    let mut progress = pending.progress();
    let wait = pending.wait();
    tokio::pin!(wait);

    loop {
        tokio::select! {
            result = &mut wait => {
                eprintln!("\r{name}: 100%");
                return result;
            }
            changed = progress.changed() => {
                if changed.is_err() {
                    return (&mut wait).await;
                }
                eprint!("\r{name}: {}%", *progress.borrow_and_update());
            }
        }
    }
}

fn format_result(record: &CompressionRecord, output: Option<&std::path::Path>) -> String {
    let mut line = format!(
        "✓ {} | original: {:.2} MB | compressed: {:.2} MB | saved: {:.1}%",
        record.name, record.original_size, record.compressed_size, record.saved_percent
    );
    if let Some(path) = output {
        line.push_str(&format!(" | written to {}", path.display()));
    }
    line
}
