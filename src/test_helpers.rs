//! Shared fixtures for unit tests
//!
//! `ScriptedClient` replays a fixed sequence of responses and records every
//! request it receives.

use crate::error::{Error, Result};
use crate::http::{ApiClient, ApiResponse};
use crate::types::QueryParams;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted reaction of the fake API
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return this response
    Respond(ApiResponse),
    /// Fail the request as if the connection dropped
    ConnectionError,
}

/// A request seen by the fake API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub params: QueryParams,
}

/// Fake API client replaying scripted responses in order
#[derive(Debug, Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedClient {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl ApiClient for ScriptedClient {
    async fn request(&self, endpoint: &str, params: &QueryParams) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            endpoint: endpoint.to_string(),
            params: params.clone(),
        });

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::ConnectionError) => Err(Error::transient("connection reset by peer")),
            None => Err(Error::Other(format!("unscripted request to {endpoint}"))),
        }
    }
}

/// A successful page response
pub fn page(newest_id: &str, oldest_id: &str, next_token: Option<&str>) -> Scripted {
    let mut meta = json!({
        "result_count": 2,
        "newest_id": newest_id,
        "oldest_id": oldest_id,
    });
    if let Some(token) = next_token {
        meta["next_token"] = json!(token);
    }
    let body = json!({
        "data": [
            {"id": newest_id, "text": "newest"},
            {"id": oldest_id, "text": "oldest"}
        ],
        "meta": meta,
    });
    Scripted::Respond(ApiResponse::new(200, body.to_string()))
}

/// A successful response with zero results
pub fn empty() -> Scripted {
    Scripted::Respond(ApiResponse::new(200, r#"{"meta":{"result_count":0}}"#))
}

/// A response reporting the subject as not found
pub fn not_found(subject: &str) -> Scripted {
    let body = json!({
        "errors": [{
            "value": subject,
            "detail": format!("Could not find user with id: [{subject}]."),
            "title": "Not Found Error",
            "resource_type": "user",
            "parameter": "id",
            "resource_id": subject,
            "type": "https://api.twitter.com/2/problems/resource-not-found"
        }]
    });
    Scripted::Respond(ApiResponse::new(200, body.to_string()))
}

/// A response reporting the subject as protected
pub fn protected(subject: &str) -> Scripted {
    let body = json!({
        "errors": [{
            "detail": format!("Sorry, you are not authorized to see the user with id: [{subject}]."),
            "title": "Authorization Error",
            "resource_id": subject,
            "type": "https://api.twitter.com/2/problems/not-authorized-for-resource"
        }]
    });
    Scripted::Respond(ApiResponse::new(200, body.to_string()))
}

/// A response with a non-success status
pub fn failure() -> Scripted {
    Scripted::Respond(ApiResponse::new(
        42,
        "The answer to life the universe & everything.",
    ))
}
