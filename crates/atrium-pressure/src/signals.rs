//! Subscription channel for host pressure signals.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use atrium_core::errors::{AtriumError, AtriumResult};
use atrium_core::models::PressureLevel;

use crate::controller::PressureController;

/// Host-side handle for delivering pressure signals. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PressureSignalSender {
    tx: mpsc::UnboundedSender<PressureLevel>,
}

impl PressureSignalSender {
    /// Deliver a signal. Fails only once the listener has shut down.
    pub fn send(&self, level: PressureLevel) -> AtriumResult<()> {
        self.tx.send(level).map_err(|_| AtriumError::SchedulerError {
            reason: "pressure listener stopped".to_string(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, consumed by [`PressureSignalReceiver::listen`].
#[derive(Debug)]
pub struct PressureSignalReceiver {
    rx: mpsc::UnboundedReceiver<PressureLevel>,
}

pub fn pressure_channel() -> (PressureSignalSender, PressureSignalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PressureSignalSender { tx }, PressureSignalReceiver { rx })
}

impl PressureSignalReceiver {
    /// Forward signals to `controller` until every sender is dropped or
    /// `shutdown` flips to true.
    pub async fn listen(
        mut self,
        controller: Arc<PressureController>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                signal = self.rx.recv() => match signal {
                    Some(level) => {
                        controller.handle(level);
                    }
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("pressure listener stopped");
    }
}
