//! Image re-encoding delegated to an external capability

use compressx_core::{output_file_name, MediaKind};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{SimulateError, SimulatedOutput, Upload};

/// Something that re-encodes an image and reports the resulting size.
///
/// Completes once per call; the result depends on the image data.
pub trait ImageReencoder: Send + Sync + 'static {
    fn reencode(
        &self,
        upload: &Upload,
    ) -> impl Future<Output = Result<SimulatedOutput, SimulateError>> + Send;
}

/// Runs a configured command such as `convert {input} -quality 70 {output}`
#[derive(Debug, Clone)]
pub struct ExternalReencoder {
    template: String,
    output_dir: PathBuf,
}

impl ExternalReencoder {
    pub fn new(template: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            output_dir: output_dir.into(),
        }
    }

    fn command_line(&self, input: &str, output: &str) -> Result<Vec<String>, SimulateError> {
        let args: Vec<String> = self
            .template
            .split_whitespace()
            .map(|arg| arg.replace("{input}", input).replace("{output}", output))
            .collect();
        if args.is_empty() {
            return Err(SimulateError::EmptyCommand);
        }
        Ok(args)
    }

    /// Create an empty output file no other re-encode has claimed.
    ///
    /// Uploads from different directories, or `a.png` next to `a.gif`, map to
    /// the same output name; later claims get a `_1`, `_2`, ... suffix.
    async fn claim_output(&self, name: &str) -> Result<PathBuf, SimulateError> {
        let base = Path::new(name);
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = base.extension().map(|e| e.to_string_lossy().into_owned());

        let mut n = 0usize;
        loop {
            let file_name = match (n, &ext) {
                (0, _) => name.to_string(),
                (_, Some(ext)) => format!("{stem}_{n}.{ext}"),
                (_, None) => format!("{stem}_{n}"),
            };
            let path = self.output_dir.join(file_name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn run_command(&self, upload: &Upload, output_path: &Path) -> Result<u64, SimulateError> {
        let args = self.command_line(
            &upload.path.to_string_lossy(),
            &output_path.to_string_lossy(),
        )?;
        let (program, rest) = args.split_first().ok_or(SimulateError::EmptyCommand)?;

        tracing::debug!(program = %program, input = %upload.path.display(), "re-encoding image");
        let output = tokio::process::Command::new(program)
            .args(rest)
            .output()
            .await
            .map_err(|source| SimulateError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SimulateError::Reencode {
                name: upload.name.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(tokio::fs::metadata(output_path).await?.len())
    }
}

impl ImageReencoder for ExternalReencoder {
    async fn reencode(&self, upload: &Upload) -> Result<SimulatedOutput, SimulateError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output_path = self
            .claim_output(&output_file_name(&upload.name, MediaKind::Image))
            .await?;

        match self.run_command(upload, &output_path).await {
            Ok(output_size) => Ok(SimulatedOutput {
                output_size,
                output_path: Some(output_path),
            }),
            Err(err) => {
                if let Err(e) = tokio::fs::remove_file(&output_path).await {
                    tracing::debug!(path = %output_path.display(), error = %e, "could not remove claimed output");
                }
                Err(err)
            }
        }
    }
}
