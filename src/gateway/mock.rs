//! Mock gateway for testing
//!
//! Serves canned JSON per operation, can be told to fail, and records every
//! request so tests can assert how often the network was hit.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{Gateway, GatewayRequest};
use crate::dispatch::Operation;
use crate::error::GatewayError;

/// Mock gateway.
///
/// # Example
/// ```ignore
/// let gateway = MockGateway::new()
///     .with_response(Operation::Verse, json!({"chapter": 2, "verse": 47, ...}));
/// ```
pub struct MockGateway {
    responses: Mutex<HashMap<Operation, serde_json::Value>>,
    /// Remaining forced failures per operation, consumed one per call
    failures: Mutex<HashMap<Operation, usize>>,
    always_fail: AtomicBool,
    configured: AtomicBool,
    delay: Option<Duration>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            always_fail: AtomicBool::new(false),
            configured: AtomicBool::new(true),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned payload for an operation
    pub fn with_response(self, operation: Operation, value: serde_json::Value) -> Self {
        self.responses.lock().unwrap().insert(operation, value);
        self
    }

    /// Fail every call with a server error
    pub fn failing(self) -> Self {
        self.always_fail.store(true, Ordering::SeqCst);
        self
    }

    /// Fail the next `times` calls for an operation, then serve normally
    pub fn fail_times(self, operation: Operation, times: usize) -> Self {
        self.failures.lock().unwrap().insert(operation, times);
        self
    }

    /// Report as unconfigured (no URL / key)
    pub fn unconfigured(self) -> Self {
        self.configured.store(false, Ordering::SeqCst);
        self
    }

    /// Sleep before answering, to keep calls in flight
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made for an operation
    pub fn call_count(&self, operation: Operation) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    /// Number of calls made for any operation
    pub fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests received, in order
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn take_failure(&self, operation: Operation) -> bool {
        if self.always_fail.load(Ordering::SeqCst) {
            return true;
        }
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&operation) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn generate(&self, request: &GatewayRequest) -> Result<serde_json::Value, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.take_failure(request.operation) {
            return Err(GatewayError::ServerError("simulated failure".to_string()));
        }

        self.responses
            .lock()
            .unwrap()
            .get(&request.operation)
            .cloned()
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!(
                    "no canned response for {}",
                    request.operation.name()
                ))
            })
    }
}
