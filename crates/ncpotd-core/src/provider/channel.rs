//! Single-use result channel: the terminal signal of one activation.

use crate::error::ProviderError;
use crate::provider::PotdImage;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

pub type Outcome = Result<PotdImage, ProviderError>;

/// Sending half. Only the first [`ResultChannel::emit`] is delivered; later
/// calls (late completions) are no-ops.
#[derive(Debug)]
pub struct ResultChannel {
    tx: Mutex<Option<oneshot::Sender<Outcome>>>,
}

/// Receiving half, held by the host. Resolves to the activation's outcome,
/// or to `Cancelled` if the activation was abandoned without one.
#[derive(Debug)]
pub struct Activation {
    rx: oneshot::Receiver<Outcome>,
}

pub fn channel() -> (ResultChannel, Activation) {
    let (tx, rx) = oneshot::channel();
    (
        ResultChannel {
            tx: Mutex::new(Some(tx)),
        },
        Activation { rx },
    )
}

impl ResultChannel {
    /// Delivers `outcome` if nothing was delivered yet.
    /// Returns false if the signal was already emitted or the host stopped listening.
    pub fn emit(&self, outcome: Outcome) -> bool {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match tx {
            Some(tx) => tx.send(outcome).is_ok(),
            None => {
                tracing::debug!("ignoring late result after terminal signal");
                false
            }
        }
    }

    pub fn is_spent(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Activation {
    /// Waits for the terminal signal.
    pub async fn wait(self) -> Outcome {
        self.await
    }
}

impl Future for Activation {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(Err(ProviderError::Cancelled)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_emit_wins() {
        let (tx, activation) = channel();
        assert!(tx.emit(Err(ProviderError::EmptyResult)));
        assert!(tx.is_spent());
        assert!(!tx.emit(Err(ProviderError::Cancelled)));
        assert!(matches!(activation.await, Err(ProviderError::EmptyResult)));
    }

    #[tokio::test]
    async fn dropped_sender_is_cancelled() {
        let (tx, activation) = channel();
        drop(tx);
        assert!(matches!(activation.wait().await, Err(ProviderError::Cancelled)));
    }

    #[test]
    fn emit_after_receiver_dropped_is_harmless() {
        let (tx, activation) = channel();
        drop(activation);
        assert!(!tx.emit(Err(ProviderError::EmptyResult)));
        assert!(!tx.emit(Err(ProviderError::EmptyResult)));
    }
}
