use crate::{Coordinate, LiveMetrics, RecorderReading, RecordingState};

/// WHAT: A stopped reading is observed as idle
/// WHY: Stopped is transient and never shown to observers
#[test]
fn given_stopped_reading_when_converting_then_state_idle() {
    // Given: A reading from a recorder that just stopped
    let reading = RecorderReading {
        speed_kmh: 0.0,
        distance_km: 4.2,
        duration_sec: 1200,
        state: RecordingState::Stopped,
        coordinate: Some(Coordinate::new(46.5, 7.9)),
    };

    // When: Converting to a snapshot
    let metrics = LiveMetrics::from(reading);

    // Then: Everything is copied and the state settles
    assert_eq!(metrics.state, RecordingState::Idle);
    assert_eq!(metrics.distance_km, 4.2);
    assert_eq!(metrics.duration_sec, 1200);
    assert_eq!(metrics.current_coordinate, Some(Coordinate::new(46.5, 7.9)));
}

/// WHAT: Negative and non-finite values are clamped to zero
/// WHY: Speed and distance are never negative in a snapshot
#[test]
fn given_bad_values_when_converting_then_clamped() {
    // Given: A reading with nonsense numbers
    let reading = RecorderReading {
        speed_kmh: -3.0,
        distance_km: f64::NAN,
        ..RecorderReading::default()
    };

    // When: Converting
    let metrics = LiveMetrics::from(reading);

    // Then: Both are zero
    assert_eq!(metrics.speed_kmh, 0.0);
    assert_eq!(metrics.distance_km, 0.0);
}

/// WHAT: Haversine distance over 0.01 degrees of latitude
/// WHY: Distance accumulation depends on it
#[test]
fn given_two_points_when_measuring_then_haversine_distance() {
    let a = Coordinate::new(46.0, 7.0);
    let b = Coordinate::new(46.01, 7.0);

    let d = a.distance_km(&b);

    assert!((d - 1.112).abs() < 0.001, "got {d}");
    assert_eq!(a.distance_km(&a), 0.0);
}
