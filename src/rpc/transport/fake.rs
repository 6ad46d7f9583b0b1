//! In-process fake transport for unit tests
//!
//! [`FakeTransport`] records every request it is handed and answers from a
//! queue of scripted replies. An empty queue, or a scripted `None`, behaves
//! like a network failure.
//!
//! A reply can be held back with [`FakeTransport::push_delayed`] so tests can
//! observe a call while it is still in flight.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ProbModelSeedError, Result};
use crate::rpc::transport::{HttpReply, OutboundRequest, Transport};

#[derive(Debug)]
struct Scripted {
    reply: Option<HttpReply>,
    delay: Option<Duration>,
}

/// Scriptable transport for tests.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl FakeTransport {
    /// Create a fake with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn push_reply(&self, status: u16, body: impl Into<String>) {
        self.push(Some(HttpReply::new(status, body)), None);
    }

    /// Queue a network failure (no reply at all).
    pub fn push_network_failure(&self) {
        self.push(None, None);
    }

    /// Queue a reply that is only delivered after `delay`.
    pub fn push_delayed(&self, status: u16, body: impl Into<String>, delay: Duration) {
        self.push(Some(HttpReply::new(status, body)), Some(delay));
    }

    fn push(&self, reply: Option<HttpReply>, delay: Option<Duration>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted { reply, delay });
    }

    /// Every request posted so far, in order.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn post(&self, request: OutboundRequest) -> Result<HttpReply> {
        self.requests.lock().unwrap().push(request);
        let scripted = self.replies.lock().unwrap().pop_front();

        match scripted {
            Some(Scripted { reply, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                reply.ok_or_else(|| {
                    ProbModelSeedError::Io(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "scripted network failure",
                    ))
                    .into()
                })
            }
            None => Err(ProbModelSeedError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "no scripted reply",
            ))
            .into()),
        }
    }
}
