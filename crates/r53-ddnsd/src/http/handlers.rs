//! Route handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use r53_ddns_core::validate;
use serde_json::json;
use std::borrow::Cow;
use tracing::{error, info};
use url::form_urlencoded;

use super::AppState;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Raw update parameters as sent by the router
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateForm {
    pub hostname: Option<String>,
    pub ip: Option<String>,
    pub commit: Option<String>,
}

impl UpdateForm {
    /// Merge query-string and form-body parameters
    ///
    /// Body values take precedence over query values. For repeated keys the
    /// first value wins.
    pub fn parse(query: Option<&str>, body: Option<&[u8]>) -> Self {
        let mut form = Self::default();
        if let Some(body) = body {
            form.fill(form_urlencoded::parse(body));
        }
        if let Some(query) = query {
            form.fill(form_urlencoded::parse(query.as_bytes()));
        }
        form
    }

    fn fill<'a>(&mut self, pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) {
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "hostname" => &mut self.hostname,
                "ip" => &mut self.ip,
                "commit" => &mut self.commit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
    }
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// `/nic/update`
///
/// The caller always gets an empty 200; outcomes go to logs and
/// notifications.
pub async fn nic_update(
    State(orchestrator): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let body = is_form_encoded(&headers).then_some(body.as_ref());
    let form = UpdateForm::parse(query.as_deref(), body);

    let request = match validate(
        form.hostname.as_deref().unwrap_or_default(),
        form.ip.as_deref().unwrap_or_default(),
        form.commit.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => {
            error!(form = ?form, error = %e, "Invalid update request, ignoring");
            return StatusCode::OK;
        }
    };

    info!(request = ?request, "Received Update Request");

    orchestrator.process(&request).await;
    StatusCode::OK
}

/// `/health-check`
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
