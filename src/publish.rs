use std::path::Path;

use docx_rs::{Docx, Paragraph, Run};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::PublishError;

pub trait Publisher {
    fn publish(&self, path: &Path, text: &str) -> Result<(), PublishError>;
}

/// Writes the summary as a one-paragraph Word document.
pub struct DocxPublisher;

impl Publisher for DocxPublisher {
    fn publish(&self, path: &Path, text: &str) -> Result<(), PublishError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Stage beside the target so the final rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(dir)?;
        build_document(text)
            .build()
            .pack(staged.as_file_mut())
            .map_err(|e| PublishError::Encode(e.to_string()))?;
        staged.persist(path).map_err(|e| PublishError::Io(e.error))?;

        info!(path = %path.display(), chars = text.len(), "Wrote summary document");
        Ok(())
    }
}

/// One paragraph, one run, no styling.
pub fn build_document(text: &str) -> Docx {
    Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}
