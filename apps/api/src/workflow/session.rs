//! Workflow state for one interactive session.
//!
//! The four states are explicit and each carries exactly the data that exists at that
//! point, so downstream data cannot outlive the upstream data it was built from:
//! a new upload drops the record and the letter, a new extraction drops the letter.

use thiserror::Error;
use uuid::Uuid;

use crate::extraction::upload::UploadedImage;
use crate::letters::institutions::INSTITUTIONS;
use crate::models::certificate::{CertificateFields, ExtractedRecord};
use crate::models::letter::GeneratedLetter;

/// Extraction output plus the user's working copy of the fields.
///
/// Edits never touch `record`; confidence scores stay tied to the original read.
#[derive(Debug, Clone)]
pub struct Review {
    pub record: ExtractedRecord,
    pub edited: CertificateFields,
}

#[derive(Debug, Clone, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Uploaded {
        image: UploadedImage,
    },
    Extracted {
        image: UploadedImage,
        review: Review,
    },
    LetterGenerated {
        image: UploadedImage,
        review: Review,
        letter: GeneratedLetter,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploaded,
    Extracted,
    LetterGenerated,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Upload a death certificate image first")]
    NoImage,

    #[error("Extract the certificate data first")]
    NotExtracted,
}

impl WorkflowState {
    pub fn phase(&self) -> Phase {
        match self {
            WorkflowState::Idle => Phase::Idle,
            WorkflowState::Uploaded { .. } => Phase::Uploaded,
            WorkflowState::Extracted { .. } => Phase::Extracted,
            WorkflowState::LetterGenerated { .. } => Phase::LetterGenerated,
        }
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        match self {
            WorkflowState::Idle => None,
            WorkflowState::Uploaded { image }
            | WorkflowState::Extracted { image, .. }
            | WorkflowState::LetterGenerated { image, .. } => Some(image),
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            WorkflowState::Extracted { review, .. }
            | WorkflowState::LetterGenerated { review, .. } => Some(review),
            _ => None,
        }
    }

    pub fn letter(&self) -> Option<&GeneratedLetter> {
        match self {
            WorkflowState::LetterGenerated { letter, .. } => Some(letter),
            _ => None,
        }
    }

    /// Any state -> `Uploaded`. Discards any record and letter.
    pub fn upload(&mut self, image: UploadedImage) {
        *self = WorkflowState::Uploaded { image };
    }

    /// `Uploaded | Extracted | LetterGenerated` -> `Extracted`. Discards any letter and
    /// resets the edited fields to the new record's values.
    pub fn record_extraction(&mut self, record: ExtractedRecord) -> Result<(), WorkflowError> {
        let image = self.image().cloned().ok_or(WorkflowError::NoImage)?;
        let edited = record.fields.clone();
        *self = WorkflowState::Extracted {
            image,
            review: Review { record, edited },
        };
        Ok(())
    }

    /// Replaces the working copy of the fields.
    ///
    /// Returns `true` when the edit invalidated a generated letter
    /// (`LetterGenerated` -> `Extracted`). Unchanged fields keep the letter.
    pub fn edit_fields(&mut self, edited: CertificateFields) -> Result<bool, WorkflowError> {
        match std::mem::take(self) {
            WorkflowState::Extracted { image, mut review } => {
                review.edited = edited;
                *self = WorkflowState::Extracted { image, review };
                Ok(false)
            }
            WorkflowState::LetterGenerated {
                image,
                mut review,
                letter,
            } => {
                if review.edited == edited {
                    *self = WorkflowState::LetterGenerated {
                        image,
                        review,
                        letter,
                    };
                    Ok(false)
                } else {
                    review.edited = edited;
                    *self = WorkflowState::Extracted { image, review };
                    Ok(true)
                }
            }
            other => {
                *self = other;
                Err(WorkflowError::NotExtracted)
            }
        }
    }

    /// `Extracted | LetterGenerated` -> `LetterGenerated`, replacing any earlier letter.
    pub fn record_letter(&mut self, letter: GeneratedLetter) -> Result<(), WorkflowError> {
        match std::mem::take(self) {
            WorkflowState::Extracted { image, review }
            | WorkflowState::LetterGenerated { image, review, .. } => {
                *self = WorkflowState::LetterGenerated {
                    image,
                    review,
                    letter,
                };
                Ok(())
            }
            other => {
                *self = other;
                Err(WorkflowError::NotExtracted)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = WorkflowState::Idle;
    }
}

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// Everything one browser session holds. Lost when the process exits.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub state: WorkflowState,
    /// Institution chosen in the selector; independent of the workflow phase.
    pub institution: String,
    flash: Option<Flash>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: WorkflowState::Idle,
            institution: INSTITUTIONS[0].name.to_string(),
            flash: None,
        }
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash::Success(message.into()));
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash::Error(message.into()));
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}
