//! Scratch file for photo uploads
//!
//! The downloaded image is written to an exclusively owned temp file right
//! before the upload. The file is removed by `release`, or on drop if the
//! upload path exits early.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::ports::PhotoUpload;

const FALLBACK_MIME: &str = "application/octet-stream";

pub struct ScratchImage {
    file: NamedTempFile,
    file_name: String,
    mime_type: &'static str,
}

impl ScratchImage {
    /// Write `bytes` to a fresh temp file
    pub fn stage(bytes: &[u8]) -> std::io::Result<Self> {
        let kind = infer::get(bytes);
        let suffix = kind
            .map(|k| format!(".{}", k.extension()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("fb-oneclick-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        let file_name = file
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("image{}", suffix));

        Ok(Self {
            file,
            file_name,
            mime_type: kind.map(|k| k.mime_type()).unwrap_or(FALLBACK_MIME),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
    }

    pub fn as_upload(&self) -> PhotoUpload<'_> {
        PhotoUpload {
            path: self.file.path(),
            file_name: &self.file_name,
            mime_type: self.mime_type,
        }
    }

    /// Delete the file now, logging instead of failing
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove scratch image");
        }
    }
}
