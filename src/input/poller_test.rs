use std::error::Error;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::input::poller::{ChangeFilter, Poller, PollerExit};
use crate::input::source::InputError;
use crate::input::testing::{buttons, ScriptedSource};

const INTERVAL: Duration = Duration::from_millis(1);

#[test]
fn test_filter_forwards_first_snapshot() {
    let mut filter = ChangeFilter::new();
    assert_eq!(filter.filter(buttons(0)), Some(buttons(0)));
}

#[test]
fn test_filter_suppresses_duplicates() {
    let mut filter = ChangeFilter::new();
    assert!(filter.filter(buttons(1)).is_some());
    assert!(filter.filter(buttons(1)).is_none());
    assert!(filter.filter(buttons(1)).is_none());
    assert_eq!(filter.filter(buttons(2)), Some(buttons(2)));
    assert_eq!(filter.filter(buttons(1)), Some(buttons(1)));
}

#[tokio::test]
async fn test_poller_forwards_only_changes() -> Result<(), Box<dyn Error>> {
    let source = ScriptedSource::new(
        8,
        vec![buttons(0), buttons(0), buttons(1), buttons(1), buttons(0)],
    )
    .unplug_after_script();
    let (tx, mut rx) = mpsc::channel(16);
    let token = CancellationToken::new();

    let poller = Poller::new(source, INTERVAL);
    let exit = tokio::task::spawn_blocking(move || poller.run(tx, token)).await?;
    assert!(matches!(
        exit,
        PollerExit::ReadFailed(InputError::DeviceError(_))
    ));

    let mut forwarded = vec![];
    while let Some(snapshot) = rx.recv().await {
        forwarded.push(snapshot);
    }
    assert_eq!(forwarded, vec![buttons(0), buttons(1), buttons(0)]);

    Ok(())
}

#[tokio::test]
async fn test_poller_stops_when_cancelled() -> Result<(), Box<dyn Error>> {
    let source = ScriptedSource::new(8, vec![buttons(4)]);
    let reads = source.read_count();
    let (tx, mut rx) = mpsc::channel(16);
    let token = CancellationToken::new();

    let poller = Poller::new(source, INTERVAL);
    let poller_token = token.clone();
    let task = tokio::task::spawn_blocking(move || poller.run(tx, poller_token));

    assert_eq!(rx.recv().await, Some(buttons(4)));
    token.cancel();
    let exit = task.await?;
    assert!(matches!(exit, PollerExit::Cancelled));
    assert!(*reads.lock().unwrap() >= 1);

    // The source repeats the same state, so nothing else was forwarded
    assert_eq!(rx.recv().await, None);

    Ok(())
}

#[tokio::test]
async fn test_poller_stops_when_receiver_dropped() -> Result<(), Box<dyn Error>> {
    let source = ScriptedSource::new(8, vec![buttons(1), buttons(2)]);
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let poller = Poller::new(source, INTERVAL);
    let exit = tokio::task::spawn_blocking(move || poller.run(tx, CancellationToken::new())).await?;
    assert!(matches!(exit, PollerExit::ReceiverClosed));

    Ok(())
}
