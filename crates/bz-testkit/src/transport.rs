//! Scripted HTTP transport

use async_trait::async_trait;
use bz_core::effects::{
    HttpResponse, ProgressEvent, ProgressHooks, RequestDescriptor, TransportEffects,
    TransportError,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// What the mock transport does with the next request.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Emit the progress events, then answer with `status` and `body`
    Respond {
        /// HTTP status
        status: u16,
        /// Response body
        body: String,
        /// Progress events emitted before answering
        progress: Vec<ProgressEvent>,
    },
    /// Fail at the transport level
    Fail(TransportError),
    /// Never complete
    Hang,
}

#[derive(Debug, Default)]
struct TransportState {
    script: VecDeque<MockOutcome>,
    requests: Vec<RequestDescriptor>,
    completed: usize,
    cancelled: usize,
}

/// Transport that answers from a script and records what it was sent.
///
/// Requests dropped before completing (timeouts, aborts) are counted as
/// cancelled. An exhausted script fails with a network error.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<TransportState>>,
}

impl MockTransport {
    /// Transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome.
    pub fn push(&self, outcome: MockOutcome) {
        self.state.borrow_mut().script.push_back(outcome);
    }

    /// Queue a response.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.respond_with_progress(status, body, Vec::new())
    }

    /// Queue a JSON response.
    pub fn respond_json(self, status: u16, body: &serde_json::Value) -> Self {
        self.respond(status, body.to_string())
    }

    /// Queue a response preceded by progress events.
    pub fn respond_with_progress(
        self,
        status: u16,
        body: impl Into<String>,
        progress: Vec<ProgressEvent>,
    ) -> Self {
        self.push(MockOutcome::Respond {
            status,
            body: body.into(),
            progress,
        });
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.push(MockOutcome::Fail(error));
        self
    }

    /// Queue a request that never completes.
    pub fn hang(self) -> Self {
        self.push(MockOutcome::Hang);
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.state.borrow().requests.clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<RequestDescriptor> {
        self.state.borrow().requests.last().cloned()
    }

    /// Number of requests sent.
    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    /// Requests that ran to completion.
    pub fn completed_count(&self) -> usize {
        self.state.borrow().completed
    }

    /// Requests dropped while in flight.
    pub fn cancelled_count(&self) -> usize {
        self.state.borrow().cancelled
    }
}

/// Counts the request as cancelled unless disarmed before drop.
struct InFlight {
    state: Rc<RefCell<TransportState>>,
    finished: bool,
}

impl InFlight {
    fn finish(mut self) {
        self.finished = true;
        self.state.borrow_mut().completed += 1;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("mock transport request cancelled");
            self.state.borrow_mut().cancelled += 1;
        }
    }
}

#[async_trait(?Send)]
impl TransportEffects for MockTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        progress: &ProgressHooks,
    ) -> Result<HttpResponse, TransportError> {
        let outcome = {
            let mut state = self.state.borrow_mut();
            state.requests.push(request.clone());
            state.script.pop_front()
        };
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            outcome = ?outcome,
            "mock transport received request"
        );
        let in_flight = InFlight {
            state: self.state.clone(),
            finished: false,
        };

        let result = match outcome {
            Some(MockOutcome::Respond {
                status,
                body,
                progress: events,
            }) => {
                for event in events {
                    progress.emit(event);
                }
                Ok(HttpResponse::new(status, body))
            }
            Some(MockOutcome::Fail(error)) => Err(error),
            Some(MockOutcome::Hang) => {
                futures::future::pending::<Result<HttpResponse, TransportError>>().await
            }
            None => Err(TransportError::Network(
                "mock transport has no scripted response".into(),
            )),
        };

        in_flight.finish();
        result
    }
}
