use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone)]
pub struct TokioFs;

impl TokioFs {
    pub fn new() -> Self {
        Self
    }
}

// Dependency to read key files
#[async_trait]
pub trait FileReader {
    /// Read a whole file. [`STDIN_PATH`] reads standard input until EOF.
    async fn read_to_string(&self, path: &Path) -> Result<String>;
}

#[async_trait]
impl FileReader for TokioFs {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        if path == Path::new(STDIN_PATH) {
            return read_until_eof(tokio::io::stdin())
                .await
                .context("failed to read standard input");
        }

        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read file: {}", path.display()))
    }
}

async fn read_until_eof(mut reader: impl AsyncRead + Unpin) -> std::io::Result<String> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents).await?;
    Ok(contents)
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use mockall::mock;

    mock! {
        pub TokioFs {}

        #[async_trait]
        impl FileReader for TokioFs {
            async fn read_to_string(&self, path: &Path) -> Result<String>;
        }
    }
}
