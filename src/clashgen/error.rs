use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that abort a run before (or instead of) generation.
///
/// Per-user render and write failures are deliberately not represented here:
/// the pipeline catches those at the point of occurrence, logs them, and keeps
/// iterating. Everything in this enum short-circuits the whole batch.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("users file not found at {0}")]
    UsersNotFound(PathBuf),

    #[error("invalid JSON in users file: {0}")]
    UsersParse(#[source] serde_json::Error),

    #[error("users file must contain an object mapping names to users")]
    UsersSchema,

    #[error("no usable user records in {0}")]
    EmptyUserStore(PathBuf),

    #[error("template {0} not found")]
    TemplateNotFound(String),

    #[error("template syntax error in {path}: {source}")]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
