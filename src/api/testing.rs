//
//  crm-client
//  api/testing.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! In-memory transport used by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::common::{ApiError, ApiResult, RawResponse};
use crate::api::request::RequestDescriptor;
use crate::api::transport::Transport;

/// Replays canned responses (or failures) in order and records every
/// request it receives.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<ApiResult<RawResponse>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a response with a JSON body.
    pub fn respond(self: &Arc<Self>, status: u16, body: Value) -> Arc<Self> {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.respond_text(status, &body)
    }

    pub fn respond_text(self: &Arc<Self>, status: u16, body: &str) -> Arc<Self> {
        self.responses.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
        Arc::clone(self)
    }

    /// Queues a failure returned from `execute` in place of a response.
    pub fn fail(self: &Arc<Self>, error: ApiError) -> Arc<Self> {
        self.responses.lock().unwrap().push_back(Err(error));
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    /// The body of the last request, parsed as JSON.
    pub fn last_body(&self) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|r| r.body().map(|b| serde_json::from_str(b).unwrap()))
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: &RequestDescriptor) -> ApiResult<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left")
    }
}

/// A genuine `reqwest` error, produced without touching the network.
pub fn network_error() -> ApiError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("an unparsable URL fails to build");
    ApiError::Transport(err)
}
