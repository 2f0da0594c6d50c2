//! Sharing a prescription, with a clipboard fallback.
//!
//! If the host has a native share surface, the record is offered to it as a short title and
//! text. Otherwise the plain-text summary is copied to a clipboard. A failed share is reported to
//! the caller and is not retried through the clipboard.

use crate::record::ClinicalRecord;
use crate::renderer::summarize;
use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Payload handed to a native share surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
}

impl ShareRequest {
    pub fn for_record(record: &ClinicalRecord) -> Self {
        Self {
            title: format!("Prescription for {}", record.patient.name),
            text: format!("Medical prescription generated on {}", record.issued_date),
        }
    }
}

/// A platform share sheet or equivalent.
pub trait ShareSurface {
    fn share(&self, request: &ShareRequest) -> CoreResult<()>;
}

/// Somewhere plain text can be copied to.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> CoreResult<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share surface accepted the request.
    Shared,
    /// No share surface was available; the summary went to the clipboard.
    Copied,
    /// The share surface reported an error.
    Failed(String),
}

/// Share `record` through `surface`, or copy its summary to `clipboard` if there is no surface.
///
/// # Errors
///
/// Only clipboard failures are returned as errors. Share surface failures are logged and
/// reported as [`ShareOutcome::Failed`].
pub fn share_record(
    record: &ClinicalRecord,
    surface: Option<&dyn ShareSurface>,
    clipboard: &dyn Clipboard,
) -> CoreResult<ShareOutcome> {
    match surface {
        Some(surface) => {
            let request = ShareRequest::for_record(record);
            match surface.share(&request) {
                Ok(()) => Ok(ShareOutcome::Shared),
                Err(e) => {
                    tracing::warn!(record_id = %record.record_id, "error sharing prescription: {}", e);
                    Ok(ShareOutcome::Failed(e.to_string()))
                }
            }
        }
        None => {
            tracing::info!(
                record_id = %record.record_id,
                "no share surface available, copying summary to clipboard"
            );
            clipboard.write_text(&summarize(record))?;
            Ok(ShareOutcome::Copied)
        }
    }
}

/// Clipboard backed by a file on disk, for hosts without a system clipboard.
#[derive(Clone, Debug)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&self, text: &str) -> CoreResult<()> {
        std::fs::write(&self.path, text).map_err(|source| CoreError::FileWrite {
            path: self.path.clone(),
            source,
        })
    }
}
