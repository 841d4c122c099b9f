use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("inventory file {} not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("inventory file {} is empty or corrupt: {reason}", .path.display())]
    EmptyOrCorrupt { path: PathBuf, reason: String },

    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("failed to encode inventory: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
