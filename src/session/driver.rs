use std::time::Duration;

use tokio::{sync::mpsc::Receiver, time::Instant};

use super::{Debouncer, Presenter, Refresh, Session, Signal};
use crate::core::store::KeyValueStore;

/// Feeds presentation signals into a [`Session`], redrawing once per burst
/// of debounced changes.
pub struct SessionDriver<S, P> {
    session: Session<S, P>,
    signals: Receiver<Signal>,
    debouncer: Debouncer,
}

impl<S: KeyValueStore, P: Presenter> SessionDriver<S, P> {
    pub fn new(session: Session<S, P>, signals: Receiver<Signal>, window: Duration) -> Self {
        Self {
            session,
            signals,
            debouncer: Debouncer::new(window),
        }
    }

    /// Run until every sender is dropped, then flush any pending redraw and
    /// hand the session back.
    pub async fn run(mut self) -> Session<S, P> {
        loop {
            let next = match self.debouncer.deadline() {
                Some(deadline) => tokio::select! {
                    signal = self.signals.recv() => Some(signal),
                    _ = tokio::time::sleep_until(deadline) => None,
                },
                None => Some(self.signals.recv().await),
            };

            match next {
                Some(Some(signal)) => match self.session.handle(signal).await {
                    Refresh::Now => {
                        self.debouncer.cancel();
                        self.session.refresh().await;
                    }
                    Refresh::Debounced => self.debouncer.push(Instant::now()),
                    Refresh::Skip => {}
                },
                Some(None) => {
                    if self.debouncer.cancel() {
                        self.session.refresh().await;
                    }
                    break;
                }
                None => {
                    if self.debouncer.poll(Instant::now()) {
                        tracing::debug!("debounce window elapsed");
                        self.session.refresh().await;
                    }
                }
            }
        }
        self.session
    }
}
