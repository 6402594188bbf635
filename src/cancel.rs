//! Cancellation coordination
//!
//! Reconciles a caller-supplied cancellation token with a timeout into the
//! single effective signal attached to an outbound message.
//!
//! | external          | timeout | outcome                                        |
//! |-------------------|---------|------------------------------------------------|
//! | already cancelled | any     | [`Reconciled::Cancelled`], no timer            |
//! | any               | none    | external passed through, nothing to clean up   |
//! | none              | some    | fresh token cancelled by a timer               |
//! | live              | some    | fresh token cancelled by timer or by external  |
//!
//! The timer and the external listener live in one watcher task owned by a
//! [`CancelScope`]. Releasing the scope (explicitly or on drop) aborts that
//! task, so nothing outlives the dispatch.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Which source fired the derived signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelTrigger {
    Timeout,
    External,
}

/// Outcome of [`reconcile`].
#[derive(Debug)]
pub enum Reconciled {
    /// The external signal was already cancelled; dispatch must not proceed.
    Cancelled,
    /// Proceed with the scope's effective signal.
    Proceed(CancelScope),
}

/// Effective signal for one dispatch plus the resources backing it.
#[derive(Debug)]
pub struct CancelScope {
    signal: Option<CancellationToken>,
    watcher: Option<JoinHandle<()>>,
    trigger: Arc<OnceLock<CancelTrigger>>,
}

impl CancelScope {
    fn passthrough(signal: Option<CancellationToken>) -> Self {
        Self {
            signal,
            watcher: None,
            trigger: Arc::new(OnceLock::new()),
        }
    }

    /// The signal to attach to the outbound message.
    pub fn signal(&self) -> Option<&CancellationToken> {
        self.signal.as_ref()
    }

    /// Whether a timer/listener is still armed.
    pub fn is_armed(&self) -> bool {
        self.watcher.is_some()
    }

    /// The source that fired the derived signal, if any did.
    pub fn trigger(&self) -> Option<CancelTrigger> {
        self.trigger.get().copied()
    }

    /// Stop the timer and the external listener. Idempotent.
    pub fn release(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
            tracing::trace!(target: "fetch_adapter::cancel", trigger=?self.trigger(), "cancel scope released");
        }
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.release();
    }
}

/// Reduce an external signal and a timeout to one effective signal.
///
/// A zero timeout means no timeout. Must be called from within a Tokio
/// runtime when a non-zero `timeout` is set.
pub fn reconcile(external: Option<CancellationToken>, timeout: Option<Duration>) -> Reconciled {
    if external.as_ref().is_some_and(CancellationToken::is_cancelled) {
        return Reconciled::Cancelled;
    }

    let Some(timeout) = timeout.filter(|timeout| !timeout.is_zero()) else {
        return Reconciled::Proceed(CancelScope::passthrough(external));
    };

    let derived = CancellationToken::new();
    let trigger = Arc::new(OnceLock::new());
    let watcher = tokio::spawn(watch(derived.clone(), external, timeout, trigger.clone()));

    Reconciled::Proceed(CancelScope {
        signal: Some(derived),
        watcher: Some(watcher),
        trigger,
    })
}

async fn watch(
    derived: CancellationToken,
    external: Option<CancellationToken>,
    timeout: Duration,
    trigger: Arc<OnceLock<CancelTrigger>>,
) {
    let external_cancelled = async {
        match &external {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };

    let fired = tokio::select! {
        _ = tokio::time::sleep(timeout) => CancelTrigger::Timeout,
        _ = external_cancelled => CancelTrigger::External,
    };
    let _ = trigger.set(fired);
    derived.cancel();
}
