//! # RSVP
//!
//! Attendance confirmation for a single event invitation.
//!
//! A guest fills one form, the form is checked on the spot, then checked
//! again on the server and forwarded as JSON to a Google Apps Script web app
//! that appends the row to a spreadsheet. The spreadsheet is the system of
//! record, nothing is stored here.
//!
//!
//!
//! # Layout
//!
//! - [`schema`]: the one rule set, shared by both sides
//! - [`controller`]: client form state, companions, submit lifecycle
//! - [`result`]: what the server answers with
//! - [`messages`]: every user-facing string, Spanish only
//! - `backend/server`: submission handler, forwarding, HTTP routes
//! - `tester`: drives a form against a running server
//!
//!
//!
//! # Flow
//!
//! 1. Guest types, fields are checked on blur, attendance right away
//! 2. Submit runs [`schema::validate`], failures stay local
//! 3. Server runs [`schema::validate`] again, never trusting the client
//! 4. Blank companion names are dropped
//! 5. No webhook configured: pretend success, say so in the message
//! 6. Otherwise one POST, the outcome becomes a [`result::SubmissionResult`]
//! 7. Form shows a toast, attaches field errors, or resets on success
//!
//!
//!
//! # Setup
//!
//! Run the server.
//! ```sh
//! SHEET_WEBHOOK_URL=https://script.google.com/macros/s/.../exec cargo run -p rsvp-backend
//! ```
//!
//! Without `SHEET_WEBHOOK_URL` the server runs in demo mode.
//!
//! Send a confirmation.
//! ```sh
//! cargo run -p tester -- --name "Ana Ruiz" --attending yes --companion "Luis Ruiz"
//! ```
//!
//! View docs.
//! ```sh
//! cargo doc --open
//! ```

pub mod controller;
pub mod messages;
pub mod result;
pub mod schema;

pub use controller::{FormController, Submitter};
pub use result::SubmissionResult;
pub use schema::{Attendance, Field, FieldErrors, RsvpDraft, RsvpRecord, decode_draft, validate};
