//! # Google Sheets
//!
//! The spreadsheet is fed by a Google Apps Script web app. Each RSVP is one
//! POST with the validated record as a JSON body, the script appends a row.
//!
//!
//!
//! ## Contract
//! - Request: `Content-Type: application/json`, body is an [`RsvpRecord`]
//! - Success: any 2xx, the body is an optional acknowledgement, only logged
//! - Failure: non-2xx, the body may carry `{message}` or `{error}`
//! - Apps Script answers with a redirect, reqwest follows it
//!
//!
//!
//! ## Failure detail
//!
//! Rejections are explained with the first of:
//! 1. `message` or `error` from a JSON body
//! 2. the raw body, when it is not JSON
//! 3. the status reason phrase
//! 4. a fixed fallback
//!
//! No retries. A timeout is a transport failure like any other.
use std::{error::Error as _, time::Duration};

use reqwest::{Client, StatusCode, Url};
use rsvp::{RsvpRecord, messages::UNKNOWN_SERVER_ERROR};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// No spreadsheet configured. Submissions are accepted but not sent.
    Unconfigured,
    Endpoint(Url),
}

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {detail}")]
    Rejected { status: StatusCode, detail: String },
}

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

pub async fn forward(client: &Client, url: &Url, record: &RsvpRecord) -> Result<(), ForwardError> {
    info!("Submitting RSVP to {url}");
    let response = client.post(url.clone()).json(record).send().await?;

    let status = response.status();
    info!("Sheet responded with status {status}");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| {
            warn!("Failed to read rejection body: {e}");
            String::new()
        });
        warn!("Sheet rejected RSVP. Status: {status}, body: {body}");

        return Err(ForwardError::Rejected {
            status,
            detail: rejection_detail(status, &body),
        });
    }

    match response.json::<Value>().await {
        Ok(ack) => debug!("Sheet acknowledgement: {ack}"),
        Err(e) => warn!("Sheet acknowledgement was not JSON: {e}"),
    }

    Ok(())
}

pub fn rejection_detail(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();

    parsed
        .as_ref()
        .and_then(structured_message)
        .or_else(|| parsed.is_none().then(|| raw_text(body)).flatten())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string())
}

/// What a transport failure looks like to the guest.
pub fn transport_detail(error: &reqwest::Error) -> String {
    let mut detail = error.to_string();

    let mut source = error.source();
    while let Some(cause) = source {
        detail = format!("{detail}: {cause}");
        source = cause.source();
    }

    detail
}

fn structured_message(value: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn raw_text(body: &str) -> Option<String> {
    let text = body.trim();
    (!text.is_empty()).then(|| text.to_string())
}
