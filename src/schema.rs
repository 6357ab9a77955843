//! # Schema
//!
//! The one constraint set for an RSVP. The form controller runs it for
//! immediate feedback and the submission handler runs it again as the only
//! source of truth.
//!
//! | Field        | Rule                                                   |
//! |--------------|--------------------------------------------------------|
//! | `fullName`   | non-empty                                              |
//! | `whatsapp`   | empty, or digits, `+`, `-`, whitespace, parentheses    |
//! | `attending`  | `"yes"` or `"no"`, required                            |
//! | `guestNames` | every entry non-empty, list may be empty               |
//!
//! Declining with companions listed is NOT rejected here. Clearing the list
//! on a "no" is the controller's job.
use std::{collections::BTreeMap, fmt};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages::{
    ATTENDING_INVALID, ATTENDING_REQUIRED, COMPANION_EMPTY, FULL_NAME_REQUIRED,
    GUEST_NAMES_INVALID, WHATSAPP_INVALID,
};

static WHATSAPP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-\s()]*$").expect("whatsapp pattern compiles"));

/// Field name to the messages it failed with.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Yes,
    No,
}

impl Attendance {
    pub fn as_str(self) -> &'static str {
        match self {
            Attendance::Yes => "yes",
            Attendance::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Attendance::Yes),
            "no" => Some(Attendance::No),
            _ => None,
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Whatsapp,
    Attending,
    GuestNames,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::FullName,
        Field::Whatsapp,
        Field::Attending,
        Field::GuestNames,
    ];

    /// Wire name, also the key used in [`FieldErrors`].
    pub fn key(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Whatsapp => "whatsapp",
            Field::Attending => "attending",
            Field::GuestNames => "guestNames",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Answers as typed, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RsvpDraft {
    pub full_name: String,
    pub whatsapp: Option<String>,
    pub attending: Option<String>,
    pub guest_names: Vec<String>,
}

/// A submission that passed [`validate`]. This is also the body posted to
/// the spreadsheet endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub full_name: String,
    pub whatsapp: String,
    pub attending: Attendance,
    pub guest_names: Vec<String>,
}

impl RsvpRecord {
    /// Drops companion names that are only whitespace.
    pub fn normalized(mut self) -> Self {
        self.guest_names.retain(|name| !name.trim().is_empty());
        self
    }
}

impl From<RsvpRecord> for RsvpDraft {
    fn from(record: RsvpRecord) -> Self {
        Self {
            full_name: record.full_name,
            whatsapp: Some(record.whatsapp),
            attending: Some(record.attending.as_str().to_string()),
            guest_names: record.guest_names,
        }
    }
}

pub fn is_valid_whatsapp(value: &str) -> bool {
    value.is_empty() || WHATSAPP_PATTERN.is_match(value)
}

/// Rule for a single companion entry.
pub fn validate_companion_name(name: &str) -> Option<String> {
    name.is_empty().then(|| COMPANION_EMPTY.to_string())
}

/// Messages for one field. An empty vec means the field passes.
pub fn validate_field(draft: &RsvpDraft, field: Field) -> Vec<String> {
    match field {
        Field::FullName => {
            if draft.full_name.is_empty() {
                vec![FULL_NAME_REQUIRED.to_string()]
            } else {
                Vec::new()
            }
        }
        Field::Whatsapp => match draft.whatsapp.as_deref() {
            Some(number) if !is_valid_whatsapp(number) => vec![WHATSAPP_INVALID.to_string()],
            _ => Vec::new(),
        },
        Field::Attending => match draft.attending.as_deref() {
            None | Some("") => vec![ATTENDING_REQUIRED.to_string()],
            Some(value) if Attendance::parse(value).is_none() => {
                vec![ATTENDING_INVALID.to_string()]
            }
            Some(_) => Vec::new(),
        },
        Field::GuestNames => {
            let mut messages: Vec<String> = draft
                .guest_names
                .iter()
                .filter_map(|name| validate_companion_name(name))
                .collect();
            messages.dedup();
            messages
        }
    }
}

/// Reads a draft out of an arbitrary JSON body. A field of the wrong type
/// (including `null`) is a field error, not a parse failure. When any field
/// is mistyped the rest of the body is still validated so every failure is
/// reported together. A body that is not an object has no fields at all.
pub fn decode_draft(body: &Value) -> Result<RsvpDraft, FieldErrors> {
    let mut draft = RsvpDraft::default();
    let mut errors = FieldErrors::new();
    let mut mistyped = |field: Field, message: &str| {
        errors.insert(field.key().to_string(), vec![message.to_string()]);
    };

    let get = |field: Field| body.get(field.key());

    match get(Field::FullName) {
        None => {}
        Some(Value::String(name)) => draft.full_name = name.clone(),
        Some(_) => mistyped(Field::FullName, FULL_NAME_REQUIRED),
    }

    match get(Field::Whatsapp) {
        None => {}
        Some(Value::String(number)) => draft.whatsapp = Some(number.clone()),
        Some(_) => mistyped(Field::Whatsapp, WHATSAPP_INVALID),
    }

    match get(Field::Attending) {
        None => {}
        Some(Value::String(value)) => draft.attending = Some(value.clone()),
        Some(Value::Null) => mistyped(Field::Attending, ATTENDING_REQUIRED),
        Some(_) => mistyped(Field::Attending, ATTENDING_INVALID),
    }

    match get(Field::GuestNames) {
        None => {}
        Some(Value::Array(names)) => {
            let strings: Option<Vec<String>> = names
                .iter()
                .map(|name| name.as_str().map(str::to_string))
                .collect();
            match strings {
                Some(names) => draft.guest_names = names,
                None => mistyped(Field::GuestNames, GUEST_NAMES_INVALID),
            }
        }
        Some(_) => mistyped(Field::GuestNames, GUEST_NAMES_INVALID),
    }

    if errors.is_empty() {
        return Ok(draft);
    }

    if let Err(rest) = validate(&draft) {
        for (key, messages) in rest {
            errors.entry(key).or_insert(messages);
        }
    }

    Err(errors)
}

/// Checks every field and reports all failures at once.
pub fn validate(draft: &RsvpDraft) -> Result<RsvpRecord, FieldErrors> {
    let errors: FieldErrors = Field::ALL
        .into_iter()
        .filter_map(|field| {
            let messages = validate_field(draft, field);
            (!messages.is_empty()).then(|| (field.key().to_string(), messages))
        })
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    let attending = draft
        .attending
        .as_deref()
        .and_then(Attendance::parse)
        .ok_or_else(|| {
            FieldErrors::from([(
                Field::Attending.key().to_string(),
                vec![ATTENDING_REQUIRED.to_string()],
            )])
        })?;

    Ok(RsvpRecord {
        full_name: draft.full_name.clone(),
        whatsapp: draft.whatsapp.clone().unwrap_or_default(),
        attending,
        guest_names: draft.guest_names.clone(),
    })
}
