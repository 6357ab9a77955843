//! # Form Controller
//!
//! Headless state for one rendered RSVP form. Whatever draws the form reads
//! from here and forwards user events back in.
//!
//! ## Feedback
//!
//! - Text fields are checked lazily, on [`FormController::blur`] or on submit
//! - Attendance is checked the moment it changes
//! - Messages come from [`crate::schema`], the same rules the server runs
//!
//! ## Companions
//!
//! Each companion slot carries a [`SlotId`] handed out by a counter that never
//! goes backwards. Removing slot `i` leaves every other slot's id, value and
//! errors untouched. Choosing "no" empties the list.
//!
//! ## Submitting
//!
//! One submission at a time. While `submitting` is set the submit control is
//! disabled and [`FormController::begin_submit`] refuses. There is no
//! cancellation, the controller waits for the result.
use std::{collections::BTreeMap, future::Future};

use tracing::{debug, warn};

use crate::{
    messages::{FAILURE_FALLBACK, FAILURE_TITLE, SUCCESS_TITLE},
    result::SubmissionResult,
    schema::{
        Attendance, Field, FieldErrors, RsvpDraft, validate, validate_companion_name,
        validate_field,
    },
};

/// Whatever accepts a draft and answers with a [`SubmissionResult`]. The
/// server's handler in-process, or an HTTP client talking to it.
pub trait Submitter {
    fn submit(&self, draft: RsvpDraft) -> impl Future<Output = SubmissionResult> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionSlot {
    pub id: SlotId,
    pub value: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Dismissible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRefusal {
    InFlight,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Refused(SubmitRefusal),
    Accepted,
    Rejected,
}

#[derive(Debug, Default)]
pub struct FormController {
    full_name: String,
    whatsapp: String,
    attending: Option<Attendance>,
    companions: Vec<CompanionSlot>,
    next_slot: u64,
    errors: BTreeMap<Field, Vec<String>>,
    submitting: bool,
    notification: Option<Notification>,
    form_notice: Option<Vec<String>>,
    companion_warning: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn whatsapp(&self) -> &str {
        &self.whatsapp
    }

    pub fn attending(&self) -> Option<Attendance> {
        self.attending
    }

    pub fn companions(&self) -> &[CompanionSlot] {
        &self.companions
    }

    pub fn errors(&self, field: Field) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.companions.iter().any(|slot| !slot.errors.is_empty())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// General notice shown under the submit control.
    pub fn form_notice(&self) -> Option<&[String]> {
        self.form_notice.as_deref()
    }

    pub fn companion_warning(&self) -> bool {
        self.companion_warning
    }

    pub fn acknowledge_companion_warning(&mut self) {
        self.companion_warning = false;
    }

    /// Sets a text answer. `Attending` goes through [`Self::set_attendance`].
    /// `GuestNames` is a no-op here, companions are edited only through
    /// [`Self::update_companion`] so each slot keeps its identity.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();

        match field {
            Field::FullName => self.full_name = value,
            Field::Whatsapp => self.whatsapp = value,
            Field::Attending => self.set_attendance(Attendance::parse(&value)),
            Field::GuestNames => debug!("Companions are edited per slot, ignoring {value:?}"),
        }
    }

    pub fn set_attendance(&mut self, attending: Option<Attendance>) {
        self.attending = attending;

        if attending == Some(Attendance::No) {
            self.companions.clear();
            self.errors.remove(&Field::GuestNames);
        }

        self.blur(Field::Attending);
    }

    /// Re-checks one field and replaces its messages.
    pub fn blur(&mut self, field: Field) {
        let messages = validate_field(&self.draft(), field);

        if field == Field::GuestNames {
            for slot in &mut self.companions {
                slot.errors = validate_companion_name(&slot.value).into_iter().collect();
            }
        }

        self.set_errors(field, messages);
    }

    pub fn add_companion(&mut self) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;

        self.companions.push(CompanionSlot {
            id,
            value: String::new(),
            errors: Vec::new(),
        });
        self.companion_warning = true;

        id
    }

    pub fn update_companion(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.companions.get_mut(index) {
            Some(slot) => {
                slot.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_companion(&mut self, index: usize) -> bool {
        if index >= self.companions.len() {
            return false;
        }

        self.companions.remove(index);
        true
    }

    /// Current answers in the shape the schema checks.
    pub fn draft(&self) -> RsvpDraft {
        RsvpDraft {
            full_name: self.full_name.clone(),
            whatsapp: Some(self.whatsapp.clone()),
            attending: self.attending.map(|a| a.as_str().to_string()),
            guest_names: self
                .companions
                .iter()
                .map(|slot| slot.value.clone())
                .collect(),
        }
    }

    /// Runs full local validation and, on a pass, marks the form as in flight.
    /// Nothing should reach the server when this refuses.
    pub fn begin_submit(&mut self) -> Result<RsvpDraft, SubmitRefusal> {
        if self.submitting {
            return Err(SubmitRefusal::InFlight);
        }

        if self.attending == Some(Attendance::No) {
            self.companions.clear();
        }

        let draft = self.draft();
        if let Err(errors) = validate(&draft) {
            debug!("Local validation failed: {errors:?}");
            self.apply_field_errors(errors);
            return Err(SubmitRefusal::Invalid);
        }

        self.clear_errors();
        self.form_notice = None;
        self.submitting = true;

        Ok(draft)
    }

    pub fn on_result(&mut self, result: SubmissionResult) {
        self.submitting = false;

        if result.success {
            self.notification = Some(Notification {
                kind: NoticeKind::Success,
                title: SUCCESS_TITLE,
                message: result.message,
            });
            self.reset();
            return;
        }

        let message = if result.message.is_empty() {
            FAILURE_FALLBACK.to_string()
        } else {
            result.message
        };
        self.notification = Some(Notification {
            kind: NoticeKind::Failure,
            title: FAILURE_TITLE,
            message,
        });

        self.apply_field_errors(result.field_errors);
        self.form_notice = result.form_error;
    }

    pub async fn submit<S: Submitter>(&mut self, submitter: &S) -> SubmitOutcome {
        let draft = match self.begin_submit() {
            Ok(draft) => draft,
            Err(refusal) => return SubmitOutcome::Refused(refusal),
        };

        let result = submitter.submit(draft).await;
        let accepted = result.success;
        self.on_result(result);

        if accepted {
            SubmitOutcome::Accepted
        } else {
            SubmitOutcome::Rejected
        }
    }

    /// Back to a blank form. The notification survives so it can be shown.
    pub fn reset(&mut self) {
        self.full_name.clear();
        self.whatsapp.clear();
        self.attending = None;
        self.companions.clear();
        self.clear_errors();
        self.form_notice = None;
        self.companion_warning = false;
    }

    fn clear_errors(&mut self) {
        self.errors.clear();
        for slot in &mut self.companions {
            slot.errors.clear();
        }
    }

    fn set_errors(&mut self, field: Field, messages: Vec<String>) {
        if messages.is_empty() {
            self.errors.remove(&field);
        } else {
            self.errors.insert(field, messages);
        }
    }

    fn apply_field_errors(&mut self, errors: FieldErrors) {
        for (key, messages) in errors {
            match Field::from_key(&key) {
                Some(Field::GuestNames) => {
                    for slot in &mut self.companions {
                        slot.errors = validate_companion_name(&slot.value).into_iter().collect();
                    }
                    self.set_errors(Field::GuestNames, messages);
                }
                Some(field) => self.set_errors(field, messages),
                None => warn!("Dropping errors for unknown field {key}: {messages:?}"),
            }
        }
    }
}
