use serde::{Deserialize, Serialize};

use crate::{
    messages::FIX_ERRORS,
    schema::{FieldErrors, RsvpRecord},
};

/// Outcome of one handler invocation, consumed once by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub field_errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_error: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RsvpRecord>,
}

impl SubmissionResult {
    pub fn invalid(field_errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: FIX_ERRORS.to_string(),
            field_errors,
            form_error: None,
            record: None,
        }
    }

    pub fn accepted(message: String, record: RsvpRecord) -> Self {
        Self {
            success: true,
            message,
            field_errors: FieldErrors::new(),
            form_error: None,
            record: Some(record),
        }
    }

    /// Failure not tied to any one field.
    pub fn failed(message: String, notice: String) -> Self {
        Self {
            success: false,
            message,
            field_errors: FieldErrors::new(),
            form_error: Some(vec![notice]),
            record: None,
        }
    }

    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }
}
