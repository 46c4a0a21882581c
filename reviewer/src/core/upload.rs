//! Upload staging: the file and supplier name waiting to be submitted

use crate::error::ValidationError;
use crate::types::{PriceListFile, PriceListUpload};

/// Price list formats the matching service can parse
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "xls", "xml"];

/// Reject files whose extension is not in [`ACCEPTED_EXTENSIONS`]
pub fn check_file(file: &PriceListFile) -> Result<(), ValidationError> {
    match file.extension() {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::UnsupportedExtension {
            file_name: file.file_name.clone(),
        }),
    }
}

/// Staging area kept until a submission succeeds
#[derive(Debug, Default)]
pub struct UploadStaging {
    file: Option<PriceListFile>,
    supplier_name: String,
    submitting: bool,
}

impl UploadStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&PriceListFile> {
        self.file.as_ref()
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Stage a file; an unsupported file leaves the previous one in place
    pub fn stage_file(&mut self, file: PriceListFile) -> Result<(), ValidationError> {
        check_file(&file)?;
        self.file = Some(file);
        Ok(())
    }

    pub fn set_supplier_name(&mut self, name: impl Into<String>) {
        self.supplier_name = name.into();
    }

    /// Validate the staged input and mark a submission in flight
    pub fn begin_submit(&mut self) -> Result<PriceListUpload, ValidationError> {
        if self.submitting {
            return Err(ValidationError::SubmitInFlight);
        }
        if self.supplier_name.trim().is_empty() {
            return Err(ValidationError::MissingSupplierName);
        }
        let file = self.file.as_ref().ok_or(ValidationError::MissingFile)?;
        check_file(file)?;

        self.submitting = true;
        Ok(PriceListUpload {
            supplier_name: self.supplier_name.clone(),
            file: file.clone(),
        })
    }

    /// Record the outcome; only success clears the staged input
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.submitting = false;
        if succeeded {
            self.file = None;
            self.supplier_name.clear();
        }
    }
}
