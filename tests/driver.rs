//! Async driver tests on a paused tokio clock.

use tokio::sync::mpsc;

use transition_router::navigation::MemoryHistory;
use transition_router::runtime::TreeDriver;
use transition_router::{Phase, Shutdown};

mod common;
use common::{ms, phases};

#[tokio::test(start_paused = true)]
async fn test_driver_fires_timers_on_its_own() {
    let (driver, snapshots) = TreeDriver::new(common::tree(100, false));
    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(driver.run(rx, shutdown.subscribe()));

    let mut history = MemoryHistory::new("/", "/");
    tx.send(history.set_location("/a")).unwrap();
    tx.send(history.set_location("/b")).unwrap();

    tokio::time::sleep(ms(50)).await;
    {
        let snapshot = snapshots.borrow();
        assert_eq!(snapshot.location.as_deref(), Some("/b"));
        assert_eq!(
            phases(&snapshot.views),
            vec![("a", Phase::Exiting), ("b", Phase::Entering)]
        );
    }

    tokio::time::sleep(ms(60)).await;
    assert_eq!(phases(&snapshots.borrow().views), vec![("b", Phase::Entered)]);

    drop(tx);
    let totals = handle.await.unwrap();
    assert_eq!(totals.fired, 1);
    assert_eq!(totals.removed, 1);
    assert!(snapshots.borrow().views.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_closed_source_waits_for_pending_timers() {
    let (driver, snapshots) = TreeDriver::new(common::tree(100, false));
    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();

    let mut history = MemoryHistory::new("/", "/a");
    tx.send(history.set_location("/b")).unwrap();
    tx.send(history.set_location("/c")).unwrap();
    drop(tx);

    let start = tokio::time::Instant::now();
    let totals = driver.run(rx, shutdown.subscribe()).await;
    assert!(start.elapsed() >= ms(100));
    assert_eq!(totals.removed, 1);
    assert_eq!(totals.advanced, 2);
    assert!(snapshots.borrow().views.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_driver_with_pending_timers() {
    let (driver, mut snapshots) = TreeDriver::new(common::tree(1000, true));
    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(driver.run(rx, shutdown.subscribe()));

    let mut history = MemoryHistory::new("/", "/");
    tx.send(history.set_location("/nested/route-one")).unwrap();
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow_and_update().views.len(), 1);

    tokio::time::sleep(ms(10)).await;
    shutdown.trigger();

    let totals = handle.await.unwrap();
    assert_eq!(totals.fired, 0);
    let last = snapshots.borrow();
    assert!(last.views.is_empty());
    assert!(last.revision >= 2);
}
