use crate::{
    ControllerOptions, PollingCadence, RecorderReading, RecordingController, RecordingState,
    tests::doubles::{RecordingStore, ScriptedRecorder},
};

use std::{sync::Arc, time::Duration};

const IDLE_MS: u64 = 2000;
const ACTIVE_MS: u64 = 500;

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn spawn_controller(recorder: &Arc<ScriptedRecorder>) -> RecordingController {
    RecordingController::new(
        recorder.clone(),
        Arc::new(RecordingStore::new()),
        ControllerOptions::default(),
    )
}

/// WHAT: Default cadence is 500ms active and 2000ms idle
/// WHY: Balances responsiveness during a run against idle battery cost
#[test]
fn given_default_cadence_when_asking_interval_then_short_only_for_open_sessions() {
    // Given: The default cadence
    let cadence = PollingCadence::default();

    // When/Then: Open sessions poll fast, everything else slow
    assert_eq!(cadence.interval_for(RecordingState::Recording), millis(ACTIVE_MS));
    assert_eq!(cadence.interval_for(RecordingState::Paused), millis(ACTIVE_MS));
    assert_eq!(cadence.interval_for(RecordingState::Idle), millis(IDLE_MS));
    assert_eq!(cadence.interval_for(RecordingState::Stopped), millis(IDLE_MS));
}

/// WHAT: An idle controller polls every 2000ms
/// WHY: Idle polling must stay on the long cadence
#[tokio::test(start_paused = true)]
async fn given_idle_controller_when_time_passes_then_polls_on_long_cadence() {
    // Given: A freshly spawned controller that synchronized once
    let recorder = Arc::new(ScriptedRecorder::new());
    let _controller = spawn_controller(&recorder);
    tokio::time::sleep(millis(1)).await;
    assert_eq!(recorder.reads(), 1);

    // When: Waiting just under one idle interval
    tokio::time::sleep(millis(IDLE_MS - 2)).await;

    // Then: No further poll yet
    assert_eq!(recorder.reads(), 1);

    // When: Crossing the interval boundary
    tokio::time::sleep(millis(2)).await;

    // Then: Exactly one more poll
    assert_eq!(recorder.reads(), 2);
}

/// WHAT: Recording and paused sessions poll every 500ms
/// WHY: Live metrics must stay fresh during a run
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_open_session_when_time_passes_then_polls_on_short_cadence() {
    // Given: A started session (initial sync + start sync)
    let recorder = Arc::new(ScriptedRecorder::new());
    let controller = spawn_controller(&recorder);
    controller.start(None).await.unwrap();
    let after_start = recorder.reads();

    // When/Then: Nothing before the short interval, one poll after it
    tokio::time::sleep(millis(ACTIVE_MS - 1)).await;
    assert_eq!(recorder.reads(), after_start);
    tokio::time::sleep(millis(2)).await;
    assert_eq!(recorder.reads(), after_start + 1);

    // Given: The session is paused
    controller.pause().await.unwrap();
    let after_pause = recorder.reads();

    // When/Then: Paused sessions keep the short cadence
    tokio::time::sleep(millis(ACTIVE_MS - 1)).await;
    assert_eq!(recorder.reads(), after_pause);
    tokio::time::sleep(millis(2)).await;
    assert_eq!(recorder.reads(), after_pause + 1);
}

/// WHAT: Lifecycle calls synchronize immediately regardless of timer phase
/// WHY: Observers must never wait a full interval after a user action
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_mid_interval_when_lifecycle_call_made_then_extra_sync_without_time_passing() {
    // Given: An idle controller halfway through its idle interval
    let recorder = Arc::new(ScriptedRecorder::new());
    let controller = spawn_controller(&recorder);
    tokio::time::sleep(millis(IDLE_MS / 2)).await;
    let before = recorder.reads();
    let now = tokio::time::Instant::now();

    // When: Starting a session and signalling foreground
    controller.start(None).await.unwrap();
    controller.notify_foreground().await.unwrap();

    // Then: Two synchronizations happened with no time elapsed
    assert_eq!(recorder.reads(), before + 2);
    assert_eq!(tokio::time::Instant::now(), now);
}

/// WHAT: Stopping returns the controller to the long cadence
/// WHY: An idle app should not keep polling fast after a run
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_stopped_session_when_time_passes_then_back_to_long_cadence() {
    // Given: A session that has just been stopped
    let recorder = Arc::new(ScriptedRecorder::new());
    let controller = spawn_controller(&recorder);
    controller.start(None).await.unwrap();
    controller.stop_and_summarize().await.unwrap();
    let after_stop = recorder.reads();

    // When: Waiting longer than the short interval but under the long one
    tokio::time::sleep(millis(IDLE_MS - 1)).await;

    // Then: No poll happened
    assert_eq!(recorder.reads(), after_stop);

    // When: Crossing the long interval
    tokio::time::sleep(millis(2)).await;

    // Then: One poll
    assert_eq!(recorder.reads(), after_stop + 1);
}

/// WHAT: Snapshots never mix fields from different ticks
/// WHY: Speed, distance and position must describe the same instant
#[tokio::test(start_paused = true)]
async fn given_recorder_changing_every_tick_when_observing_then_snapshots_are_consistent() {
    // Given: A controller and an observer
    let recorder = Arc::new(ScriptedRecorder::new());
    let controller = spawn_controller(&recorder);
    let mut observer = controller.subscribe();

    for tick in 1..=5u64 {
        // When: The recorder changes every field between ticks
        recorder.set_reading(RecorderReading {
            speed_kmh: tick as f64 * 10.0,
            distance_km: tick as f64,
            duration_sec: tick * 60,
            state: RecordingState::Idle,
            coordinate: Some(crate::Coordinate::new(46.0 + tick as f64, 7.0)),
        });
        tokio::time::sleep(millis(IDLE_MS + 1)).await;

        // Then: The observed snapshot comes from a single tick
        let snapshot = *observer.borrow_and_update();
        let seen = snapshot.duration_sec / 60;
        assert_eq!(seen, tick);
        assert_eq!(snapshot.speed_kmh, seen as f64 * 10.0);
        assert_eq!(snapshot.distance_km, seen as f64);
        assert_eq!(
            snapshot.current_coordinate,
            Some(crate::Coordinate::new(46.0 + seen as f64, 7.0))
        );
    }
}
