use actix_multipart::form::tempfile::TempFile;

use crate::errors::{AppError, FieldError};

pub const MAX_IMAGE_KIB: usize = 2048;
pub const MAX_IMAGE_BYTES: usize = MAX_IMAGE_KIB * 1024;

/// An uploaded file read into memory, not yet checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, file_name: Option<String>) -> Self {
        ImageUpload { bytes, file_name }
    }

    /// Reads a multipart temp file. An empty part without a file name is what
    /// browsers send for an untouched file input and counts as no upload.
    pub async fn from_temp_file(file: Option<TempFile>) -> Result<Option<Self>, AppError> {
        let Some(file) = file else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(file.file.path())
            .await
            .map_err(|e| AppError::InvalidInput(format!("Unreadable upload: {}", e)))?;

        let unnamed = file.file_name.as_deref().is_none_or(|name| name.trim().is_empty());
        if bytes.is_empty() && unnamed {
            return Ok(None);
        }

        Ok(Some(ImageUpload::new(bytes, file.file_name)))
    }

    /// Sniffs the content and enforces the size limit, returning the file
    /// extension to store under. `label` is the human name of the field.
    pub fn check(&self, field: &str, label: &str) -> Result<&'static str, FieldError> {
        let kind = infer::get(&self.bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image);

        let Some(kind) = kind else {
            return Err(FieldError {
                field: field.to_string(),
                message: format!("The {} must be a valid image file.", label),
            });
        };

        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(FieldError {
                field: field.to_string(),
                message: format!("The {} may not be greater than 2MB.", label),
            });
        }

        Ok(kind.extension())
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}
