use std::{thread, time::Duration};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::input::source::{InputError, RawSnapshot, SourceInputDevice};

/// Suppresses snapshots that are identical to the last one forwarded. The
/// first snapshot is always forwarded.
#[derive(Debug, Default)]
pub struct ChangeFilter {
    last: Option<RawSnapshot>,
}

impl ChangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot if it differs from the last forwarded snapshot
    pub fn filter(&mut self, snapshot: RawSnapshot) -> Option<RawSnapshot> {
        if self.last.as_ref() == Some(&snapshot) {
            return None;
        }
        self.last = Some(snapshot.clone());
        Some(snapshot)
    }
}

/// Reason the poller loop stopped
#[derive(Debug)]
pub enum PollerExit {
    /// Shutdown was requested
    Cancelled,
    /// The source device could not be read and was released
    ReadFailed(InputError),
    /// Nothing is consuming snapshots anymore
    ReceiverClosed,
}

/// Samples a [SourceInputDevice] at a fixed interval and forwards every
/// changed snapshot to the mapper.
#[derive(Debug)]
pub struct Poller<S: SourceInputDevice> {
    source: S,
    interval: Duration,
    filter: ChangeFilter,
}

impl<S: SourceInputDevice> Poller<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            source,
            interval,
            filter: ChangeFilter::new(),
        }
    }

    /// Run the poll loop until cancelled or the device can no longer be
    /// read. This blocks the current thread, so it should be run with
    /// [tokio::task::spawn_blocking]. The source device is dropped when this
    /// returns.
    pub fn run(mut self, tx: mpsc::Sender<RawSnapshot>, token: CancellationToken) -> PollerExit {
        log::debug!("Started polling source device every {:?}", self.interval);
        loop {
            if token.is_cancelled() {
                log::debug!("Poller cancelled");
                return PollerExit::Cancelled;
            }

            thread::sleep(self.interval);

            let snapshot = match self.source.read() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::error!("Failed to read source device: {e}");
                    return PollerExit::ReadFailed(e);
                }
            };
            let Some(snapshot) = self.filter.filter(snapshot) else {
                continue;
            };

            log::trace!("Forwarding changed snapshot: {:?}", snapshot);
            if let Err(e) = tx.blocking_send(snapshot) {
                log::debug!("Snapshot receiver closed: {e}");
                return PollerExit::ReceiverClosed;
            }
        }
    }
}
