use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use writer_core::{PipelineStage, StageTransitionError};

/// Remote call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TokenExchange,
    CoverUpload,
    ContentImageUpload,
    DraftCreation,
    Publish,
    StatusQuery,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::TokenExchange => write!(f, "token exchange"),
            Operation::CoverUpload => write!(f, "cover upload"),
            Operation::ContentImageUpload => write!(f, "content image upload"),
            Operation::DraftCreation => write!(f, "draft creation"),
            Operation::Publish => write!(f, "publish"),
            Operation::StatusQuery => write!(f, "publish status query"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(
        "WeChat credentials not provided; set WECHAT_APP_ID and WECHAT_APP_SECRET, \
         or use --app-id and --app-secret"
    )]
    MissingCredentials,
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to get access token: {response}")]
    Authentication { response: Value },
    #[error("{operation} failed: {response}")]
    Remote { operation: Operation, response: Value },
    #[error("{operation} rejected with errcode {errcode}: {errmsg}")]
    Api {
        operation: Operation,
        errcode: i64,
        errmsg: String,
    },
    #[error("{operation}: network error: {message}")]
    Network { operation: Operation, message: String },
    #[error("{operation}: request timed out")]
    Timeout { operation: Operation },
    #[error("{operation}: response is not valid JSON: {message}")]
    Decode { operation: Operation, message: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Stage(#[from] StageTransitionError),
    #[error("halted at stage '{stage}': {source}")]
    Halted {
        stage: PipelineStage,
        #[source]
        source: Box<PublishError>,
    },
}

impl PublishError {
    pub(crate) fn transport(operation: Operation, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return PublishError::Timeout { operation };
        }
        PublishError::Network {
            operation,
            message: err.to_string(),
        }
    }

    /// The underlying failure, looking through a pipeline halt.
    pub fn root(&self) -> &PublishError {
        match self {
            PublishError::Halted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage at which a pipeline stopped, if this error came from one.
    pub fn halted_at(&self) -> Option<PipelineStage> {
        match self {
            PublishError::Halted { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
