use std::path::PathBuf;
use thiserror::Error;

/// 启动前的配置错误，出现时不会执行任何 I/O
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Path doesn't exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid {name} url \"{url}\": {reason}")]
    InvalidUrl {
        name: &'static str,
        url: String,
        reason: String,
    },

    #[error("Token url or access key must be provided.")]
    MissingAuth,

    #[error("Environment must be provided when using an access key.")]
    MissingEnvironment,
}

/// 获取 token 失败，整个批次中止
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint rejected request: {message}")]
    Rejected { status: u16, message: String },

    #[error("token endpoint unavailable (status {status})")]
    Unavailable { status: u16 },

    #[error("token endpoint unreachable: {0}")]
    Unreachable(#[source] TransportError),

    #[error("token endpoint returned an empty token")]
    EmptyToken,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `execute` 的致命错误
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("cannot write result to {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
