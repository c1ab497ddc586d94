//! In-memory transport for unit tests: replays scripted responses in order
//! and records every request it was asked to execute.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::{AmoError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<HttpResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests.lock().last().cloned().expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AmoError::transport("no scripted response left")))
    }
}

pub(crate) fn reply(status: u16, body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    })
}
