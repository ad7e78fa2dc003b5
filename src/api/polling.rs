//! Background polling for live screens
//!
//! Periodically refreshes the kitchen board or the system health snapshot
//! and forwards results to the UI over a channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::api::client::ApiTransport;
use crate::api::kitchen::{KitchenBoard, KitchenHandler};
use crate::api::system::{SystemHandler, SystemHealth};
use crate::error::RestoError;

/// What a poller refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    Kitchen,
    SystemHealth,
}

/// Events from a running poller
#[derive(Debug, Clone)]
pub enum PollEvent {
    Kitchen(KitchenBoard),
    Health(SystemHealth),
    /// Polling error occurred; the poller keeps running
    Error(String),
    /// The token was rejected; the poller stops
    Unauthorized,
}

/// Periodic refresher for one target
pub struct Poller {
    poll_interval: Duration,
    target: PollTarget,
    tx: mpsc::Sender<PollEvent>,
}

impl Poller {
    /// Create a new poller
    pub fn new(poll_interval: Duration, target: PollTarget, tx: mpsc::Sender<PollEvent>) -> Self {
        Self {
            poll_interval,
            target,
            tx,
        }
    }

    /// Run until the receiver is dropped
    pub async fn start(&self, client: Arc<dyn ApiTransport>) {
        let mut tick = interval(self.poll_interval);

        loop {
            tick.tick().await;

            let event = self.poll_once(client.as_ref()).await;
            let unauthorized = matches!(event, PollEvent::Unauthorized);
            if self.tx.send(event).await.is_err() {
                tracing::debug!(poll = ?self.target, "poll receiver dropped, stopping");
                break;
            }
            if unauthorized {
                break;
            }
        }
    }

    /// Fetch the target once
    pub async fn poll_once(&self, client: &dyn ApiTransport) -> PollEvent {
        let result = match self.target {
            PollTarget::Kitchen => KitchenHandler::new(client).board().await.map(PollEvent::Kitchen),
            PollTarget::SystemHealth => SystemHandler::new(client)
                .health()
                .await
                .map(PollEvent::Health),
        };

        result.unwrap_or_else(|e| match e {
            RestoError::NotAuthenticated => {
                tracing::info!(poll = ?self.target, "session rejected while polling");
                PollEvent::Unauthorized
            }
            e => {
                tracing::warn!(poll = ?self.target, error = %e, "poll failed");
                PollEvent::Error(e.to_string())
            }
        })
    }
}

/// Running poller task; aborted when dropped
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Create a poller and return the event receiver
pub fn create_poller(
    poll_interval: Duration,
    target: PollTarget,
) -> (Poller, mpsc::Receiver<PollEvent>) {
    let (tx, rx) = mpsc::channel(100);
    (Poller::new(poll_interval, target, tx), rx)
}

/// Spawn a poller on the runtime
pub fn spawn_poller(
    client: Arc<dyn ApiTransport>,
    target: PollTarget,
    poll_interval: Duration,
) -> (PollHandle, mpsc::Receiver<PollEvent>) {
    let (poller, rx) = create_poller(poll_interval, target);
    let task = tokio::spawn(async move { poller.start(client).await });
    (PollHandle { task }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{Method, MockApiTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_kitchen_poll_sends_board() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| {
                *method == Method::GET && path == "/api/kitchen/all/kitchen/orders"
            })
            .returning(|_, _, _| {
                Ok(json!({"orders": [], "kots": [{"_id": "k1", "kotNumber": 7, "status": "PENDING"}]}))
            });

        let (handle, mut rx) =
            spawn_poller(Arc::new(mock), PollTarget::Kitchen, Duration::from_millis(10));

        match rx.recv().await {
            Some(PollEvent::Kitchen(board)) => assert_eq!(board.kots[0].kot_number, "7"),
            other => panic!("unexpected event: {:?}", other),
        }

        drop(rx);
        // the loop exits once its next send fails
        tokio::time::timeout(Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_errors_are_forwarded() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .returning(|_, _, _| Err(RestoError::RateLimited));

        let (poller, _rx) = create_poller(Duration::from_secs(60), PollTarget::SystemHealth);
        match poller.poll_once(&mock).await {
            PollEvent::Error(message) => assert!(!message.is_empty()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_token_stops_poller() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .times(1)
            .returning(|_, _, _| Err(RestoError::NotAuthenticated));

        let (handle, mut rx) =
            spawn_poller(Arc::new(mock), PollTarget::Kitchen, Duration::from_millis(10));

        assert!(matches!(rx.recv().await, Some(PollEvent::Unauthorized)));
        // the sender goes away with the finished task
        assert!(rx.recv().await.is_none());
        tokio::time::timeout(Duration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }
}
