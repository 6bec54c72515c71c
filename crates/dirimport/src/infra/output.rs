//! Writing captured request documents for the host importer.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::model::DirectoryRequest;

/// Where a request document goes once the form has been submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if path.as_os_str() != "-" => OutputTarget::File(path),
            _ => OutputTarget::Stdout,
        }
    }
}

/// Serialize the request in the host document shape, newline terminated.
pub fn render_document(request: &DirectoryRequest, compact: bool) -> Result<String> {
    let mut rendered = if compact {
        serde_json::to_string(request)
    } else {
        serde_json::to_string_pretty(request)
    }
    .context("failed to serialize directory request")?;
    rendered.push('\n');
    Ok(rendered)
}

pub fn write_document(
    request: &DirectoryRequest,
    target: &OutputTarget,
    compact: bool,
) -> Result<()> {
    let rendered = render_document(request, compact)?;
    match target {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write request document to stdout")?;
        }
        OutputTarget::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, &rendered).with_context(|| {
                format!("failed to write request document to {}", path.display())
            })?;
            info!(path = %path.display(), "wrote directory import request");
        }
    }
    Ok(())
}
