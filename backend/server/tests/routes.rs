mod support;

use std::time::Duration;

use axum::http::StatusCode;
use rsvp::{
    SubmissionResult,
    messages::{
        ATTENDING_INVALID, FIX_ERRORS, FULL_NAME_REQUIRED, GUEST_NAMES_INVALID, THANKS_DECLINED,
    },
};
use serde_json::{Value, json};
use server::{
    app,
    config::Config,
    forward::Destination,
    state::AppState,
};
use support::{closed_url, handler_for, serve};

async fn spawn_app(destination: Destination) -> String {
    let config = Config {
        port: 0,
        destination: destination.clone(),
        sheet_timeout: Duration::from_secs(2),
    };
    let handler = handler_for(destination, config.sheet_timeout);
    let address = serve(app(AppState::from_parts(config, handler))).await;

    format!("http://{address}")
}

#[tokio::test]
async fn health() {
    let base = spawn_app(Destination::Unconfigured).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn json_submission_in_demo_mode() {
    let base = spawn_app(Destination::Unconfigured).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/rsvp"))
        .json(&json!({
            "fullName": "Ana Ruiz",
            "whatsapp": "",
            "attending": "no",
            "guestNames": [],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: SubmissionResult = response.json().await.unwrap();
    assert!(result.success);
    assert!(result.message.starts_with(THANKS_DECLINED));
}

#[tokio::test]
async fn invalid_submission_is_unprocessable() {
    let base = spawn_app(Destination::Unconfigured).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/rsvp"))
        .json(&json!({ "fullName": "", "whatsapp": "abc" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], FIX_ERRORS);
    for key in ["fullName", "whatsapp", "attending"] {
        assert!(body["fieldErrors"][key].is_array(), "missing {key}");
    }
    assert!(body.get("formError").is_none());
}

#[tokio::test]
async fn null_name_is_a_field_error() {
    let base = spawn_app(Destination::Unconfigured).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/rsvp"))
        .json(&json!({ "fullName": null, "attending": "yes" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let result: SubmissionResult = response.json().await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, FIX_ERRORS);
    assert_eq!(result.field_errors["fullName"], vec![FULL_NAME_REQUIRED]);
    assert_eq!(result.form_error, None);
}

#[tokio::test]
async fn mistyped_fields_are_field_errors() {
    let base = spawn_app(Destination::Unconfigured).await;
    let client = reqwest::Client::new();

    let cases = [
        (json!({ "fullName": "Ana", "attending": 1 }), "attending", ATTENDING_INVALID),
        (
            json!({ "fullName": "Ana", "attending": "yes", "guestNames": null }),
            "guestNames",
            GUEST_NAMES_INVALID,
        ),
    ];

    for (body, key, message) in cases {
        let response = client
            .post(format!("{base}/rsvp"))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        let result: SubmissionResult = response.json().await.unwrap();
        assert_eq!(result.field_errors[key], vec![message], "{body}");
    }
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let base = spawn_app(Destination::Unconfigured).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/rsvp"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn form_submission_orders_companions() {
    let base = spawn_app(Destination::Unconfigured).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/rsvp/form"))
        .form(&[
            ("fullName", "Ana Ruiz"),
            ("whatsapp", "+57 300 123 4567"),
            ("attending", "yes"),
            ("guestNames.1", "Eva Ruiz"),
            ("guestNames.2", ""),
            ("guestNames.0", "Luis Ruiz"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["record"]["guestNames"], json!(["Luis Ruiz", "Eva Ruiz"]));
    assert_eq!(body["record"]["whatsapp"], "+57 300 123 4567");
}

#[tokio::test]
async fn unreachable_sheet_is_bad_gateway() {
    let base = spawn_app(Destination::Endpoint(closed_url())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/rsvp"))
        .json(&json!({ "fullName": "Ana Ruiz", "attending": "yes" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let result: SubmissionResult = response.json().await.unwrap();
    assert!(!result.success);
    assert_eq!(result.form_error.map(|e| e.len()), Some(1));
}
