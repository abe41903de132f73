//! Directions provider that replays canned responses
//!
//! Used for offline runs and tests. Responses are returned in order; once the
//! queue is down to its last entry that entry is repeated.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DirectionsProvider, DirectionsRequest, DirectionsResponse};
use crate::{FareError, Result};

pub struct FixedDirectionsProvider {
    responses: Mutex<VecDeque<DirectionsResponse>>,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl FixedDirectionsProvider {
    /// Always answer with `response`
    #[must_use]
    pub fn new(response: DirectionsResponse) -> Self {
        Self::sequence(vec![response])
    }

    /// Answer with each response in turn, repeating the last one
    #[must_use]
    pub fn sequence(responses: Vec<DirectionsResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far
    #[must_use]
    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DirectionsProvider for FixedDirectionsProvider {
    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        self.requests
            .lock()
            .map_err(|_| FareError::api("directions request log poisoned"))?
            .push(*request);

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| FareError::api("directions response queue poisoned"))?;
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.ok_or_else(|| FareError::api("no canned directions response"))
    }
}
