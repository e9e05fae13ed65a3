use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulateError {
    #[error("invalid simulation settings: {0}")]
    InvalidSettings(String),

    #[error("image re-encode command is empty")]
    EmptyCommand,

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("re-encode of {name} failed ({status}): {stderr}")]
    Reencode {
        name: String,
        status: String,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("compression task ended without a result")]
    Abandoned,
}
