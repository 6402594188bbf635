//! Shared test support
//!
//! - `RecordingTransport`: in-process transport that records every message,
//!   answers from a fixed reply and honors the attached signal
//! - helpers for building adapters over it

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use fetch_adapter::prelude::*;
use reqwest::header::HeaderMap;

pub const ABORTED: &str = "The operation was aborted";

#[derive(Clone)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<OutboundMessage>>>,
    cancelled: Arc<AtomicUsize>,
    reply: Arc<Mutex<Response>>,
    delay: Option<Duration>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::replying(Response::json_body(200, &serde_json::json!({"ok": true})))
    }
}

impl RecordingTransport {
    pub fn replying(reply: Response) -> Self {
        Self {
            calls: Arc::default(),
            cancelled: Arc::default(),
            reply: Arc::new(Mutex::new(reply)),
            delay: None,
        }
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::replying(Response::json_body(status, &body))
    }

    pub fn empty(status: u16) -> Self {
        Self::replying(Response::new(status, HeaderMap::new(), Vec::new()))
    }

    /// Wait `delay` before answering; the signal can cut the wait short.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_reply(&self, reply: Response) {
        *self.reply.lock().expect("lock") = reply;
    }

    pub fn calls(&self) -> Vec<OutboundMessage> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }

    /// Sends that ended because the signal fired.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Response, AdapterError> {
        self.calls.lock().expect("lock").push(message.clone());

        if message.is_cancelled() {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
            return Err(AdapterError::cancelled(ABORTED));
        }

        if let Some(delay) = self.delay {
            let cancelled = async {
                match &message.signal {
                    Some(signal) => signal.cancelled().await,
                    None => std::future::pending().await,
                }
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancelled => {
                    self.cancelled.fetch_add(1, Ordering::SeqCst);
                    return Err(AdapterError::cancelled(ABORTED));
                }
            }
        }

        Ok(self.reply.lock().expect("lock").clone())
    }
}

pub fn adapter(config: AdapterConfig, transport: &RecordingTransport) -> Arc<FetchAdapter> {
    FetchAdapter::new(config, transport.clone()).into_shared()
}

pub fn host_config() -> AdapterConfig {
    AdapterConfig::builder().host("https://example.com").build()
}
