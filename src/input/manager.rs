use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::config::{InputProfile, ProfileError};
use crate::input::mapper::ControlMapper;
use crate::input::poller::{Poller, PollerExit};
use crate::input::source::{RawSnapshot, SourceInputDevice, SourceOutputDevice};
use crate::input::state::{self, StatePublisher};
use crate::input::synthesizer::Synthesizer;
use crate::input::target::{KeyTarget, PointerTarget};

/// Only the newest unconsumed snapshot matters to the mapper
const BUFFER_SIZE: usize = 1;

/// Possible errors while running the input pipeline
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("invalid input profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("pipeline task failed: {0}")]
    Task(#[from] JoinError),
}

/// Wires a source device, the mapper and the output synthesizer together
/// and runs them until shutdown or until the source device fails.
#[derive(Debug)]
pub struct Manager {
    profile: InputProfile,
}

impl Manager {
    pub fn new(profile: InputProfile) -> Self {
        Self { profile }
    }

    /// Run the input pipeline. Returns why the poller stopped once every
    /// task has finished and every held output has been released.
    pub async fn run<S, P, K, H>(
        &self,
        source: S,
        haptics: Option<H>,
        pointer: P,
        keyboard: K,
        token: CancellationToken,
    ) -> Result<PollerExit, ManagerError>
    where
        S: SourceInputDevice + Send + 'static,
        P: PointerTarget,
        K: KeyTarget,
        H: SourceOutputDevice,
    {
        // Reject a bad profile before any loop starts
        let mapper = ControlMapper::new(self.profile.clone(), source.axis_count())?;
        log::info!("Using input profile: {}", mapper.profile().name);

        let (publisher, reader) = state::channel(mapper.idle());
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        let token = token.child_token();

        // Start the poller on its own thread since reads block
        let poller = Poller::new(source, mapper.profile().timing.poll_interval());
        let poller_token = token.clone();
        let poller_task = tokio::task::spawn_blocking(move || {
            log::debug!("Started poller thread");
            poller.run(tx, poller_token)
        });

        let mapper_task = tokio::spawn(map_snapshots(mapper, rx, publisher, token.clone()));

        let synthesizer = Synthesizer::new(pointer, keyboard, haptics, &self.profile);
        synthesizer.run(reader, token.clone()).await;

        // The synthesizer only stops on shutdown or when the pipeline died,
        // so stop whatever is still running.
        token.cancel();
        mapper_task.await?;
        let exit = poller_task.await?;
        log::info!("Input pipeline stopped: {:?}", exit);

        Ok(exit)
    }
}

/// Map every snapshot from the poller and publish the result as the new
/// shared control state. Dropping the publisher on return tells the
/// synthesizer that no more updates will arrive.
async fn map_snapshots(
    mapper: ControlMapper,
    mut rx: mpsc::Receiver<RawSnapshot>,
    publisher: StatePublisher,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                log::debug!("Mapper cancelled");
                break;
            }
            snapshot = rx.recv() => {
                let Some(snapshot) = snapshot else {
                    log::debug!("Poller closed the snapshot channel");
                    break;
                };
                let state = mapper.map(&snapshot);
                log::debug!("Control state: {:?}", state);
                publisher.publish(state);
            }
        }
    }
}
