//! # Submission Handler
//!
//! Authoritative validation and forwarding. Whatever the client checked is
//! ignored, every draft goes through [`rsvp::validate`] again.
//!
//! ```text
//! Received -> Validating -> ValidationFailed
//!                        -> Validated -> DemoMode
//!                                     -> Forwarding -> ForwardFailed
//!                                                   -> ForwardRejected
//!                                                   -> ForwardSucceeded
//! ```
//!
//! Every terminal state becomes a [`SubmissionResult`]. Nothing escapes as an
//! error and nothing is kept between calls. At most one outbound request per
//! call, none in demo mode.
use reqwest::Client;
use rsvp::{RsvpDraft, SubmissionResult, Submitter, decode_draft, messages, validate};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    forward::{Destination, ForwardError, build_client, forward, transport_detail},
};

#[derive(Debug, Clone)]
pub struct SubmissionHandler {
    destination: Destination,
    client: Client,
}

impl SubmissionHandler {
    pub fn new(destination: Destination, client: Client) -> Self {
        Self {
            destination,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_client(config.sheet_timeout)?;

        Ok(Self::new(config.destination.clone(), client))
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Entry point for raw JSON bodies. Mistyped fields end as
    /// ValidationFailed like any other field error.
    pub async fn handle_json(&self, body: Value) -> SubmissionResult {
        match decode_draft(&body) {
            Ok(draft) => self.handle(draft).await,
            Err(errors) => {
                warn!("Mistyped RSVP fields: {errors:?}");
                SubmissionResult::invalid(errors)
            }
        }
    }

    pub async fn handle(&self, draft: RsvpDraft) -> SubmissionResult {
        info!("Received RSVP from {:?}", draft.full_name);

        let record = match validate(&draft) {
            Ok(record) => record.normalized(),
            Err(errors) => {
                warn!("Validation failed: {errors:?}");
                return SubmissionResult::invalid(errors);
            }
        };
        info!("Validation successful: {record:?}");

        let url = match &self.destination {
            Destination::Endpoint(url) => url,
            Destination::Unconfigured => {
                warn!("RSVP not sent, spreadsheet not configured: {record:?}");
                return SubmissionResult::accepted(messages::demo_mode(record.attending), record);
            }
        };

        match forward(&self.client, url, &record).await {
            Ok(()) => {
                info!("RSVP recorded for {:?}", record.full_name);
                SubmissionResult::accepted(messages::recorded(record.attending), record)
            }
            Err(ForwardError::Rejected { status, detail }) => {
                error!("Sheet rejected RSVP with {status}: {detail}");
                SubmissionResult::failed(
                    messages::remote_rejected(&detail),
                    messages::remote_rejected_notice(&detail),
                )
            }
            Err(ForwardError::Transport(e)) => {
                let detail = transport_detail(&e);
                error!("Network error submitting RSVP: {detail}");
                SubmissionResult::failed(messages::transport_failed(&detail), detail)
            }
        }
    }
}

impl Submitter for SubmissionHandler {
    async fn submit(&self, draft: RsvpDraft) -> SubmissionResult {
        self.handle(draft).await
    }
}
