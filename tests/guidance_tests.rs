use azimuth_guide::mock::{MockPermissionApi, MockSensor, RecordingHaptics};
use azimuth_guide::{
    AlignmentClassifier, AlignmentState, AndroidPermissions, GuidanceController, GuidanceSettings,
    GuidanceStatus, HeadingEstimator, HeadingSample, PermissionProvider, PermissionResponse,
    PermissionState, Platform, SensorEvent, TargetAzimuth, UnsupportedSensor, circular_distance,
    provider_for,
};

fn sample_at(degrees: f64, timestamp_ms: u64) -> HeadingSample {
    let rad = degrees.to_radians();
    HeadingSample::new(rad.sin() * 42.0, rad.cos() * 42.0, -25.0, timestamp_ms)
}

fn android_controller(
    target: f64,
    api: MockPermissionApi,
    sensor: &MockSensor,
) -> GuidanceController<MockSensor, Box<dyn PermissionProvider>, RecordingHaptics> {
    GuidanceController::new(
        GuidanceSettings::default(),
        TargetAzimuth::new(target),
        sensor.clone(),
        provider_for(Platform::Android, api),
        RecordingHaptics::new(),
    )
    .unwrap()
}

/// Target 180°, stable heading 170° sits exactly on the aligned cut
#[test]
fn test_scenario_a_boundary_is_near() {
    let mut estimator = HeadingEstimator::new();
    let mut classifier = AlignmentClassifier::new();

    let heading = estimator.ingest(&sample_at(170.0, 0)).unwrap();
    assert!((heading - 170.0).abs() < 1e-9);

    let reading = classifier.classify(170.0, TargetAzimuth::new(180.0));
    assert_eq!(reading.distance, 10.0);
    assert_eq!(reading.state, AlignmentState::Near);
    assert!(!reading.just_entered);
}

/// Target 10°, heading 200°: raw difference 190° folds to 170°
#[test]
fn test_scenario_b_fold() {
    let mut classifier = AlignmentClassifier::new();
    let reading = classifier.classify(200.0, TargetAzimuth::new(10.0));
    assert_eq!(reading.distance, 170.0);
    assert_eq!(reading.state, AlignmentState::Misaligned);
}

/// Denied permission never touches the sensor
#[test]
fn test_scenario_c_permission_denied() {
    let sensor = MockSensor::new();
    let mut controller = android_controller(180.0, MockPermissionApi::denying(), &sensor);

    assert_eq!(controller.start(), GuidanceStatus::PermissionDenied);
    assert_eq!(controller.permission_state(), PermissionState::Denied);
    assert_eq!(sensor.subscribe_count(), 0);
    assert_eq!(sensor.update_interval(), None);
    assert!(!sensor.emit_heading(180.0, 0));
    assert!(controller.process_pending().is_empty());
}

/// Stopping mid-flight invalidates the subscription
#[test]
fn test_scenario_d_stop_mid_flight() {
    let sensor = MockSensor::new();
    let mut controller = android_controller(180.0, MockPermissionApi::granting(), &sensor);
    assert_eq!(controller.start(), GuidanceStatus::Active);

    assert!(sensor.emit_heading(90.0, 0));
    assert_eq!(controller.process_pending().len(), 1);
    let before = controller.latest();

    controller.stop();
    assert_eq!(controller.status(), GuidanceStatus::Stopped);
    assert_eq!(sensor.active_subscriptions(), 0);

    assert!(!sensor.emit_heading(270.0, 100));
    assert!(controller.process_pending().is_empty());
    assert!(controller.handle_event(SensorEvent::Reading(sample_at(270.0, 200))).is_none());
    assert_eq!(controller.latest(), before);
}

/// Events queued before stop are discarded with the queue
#[test]
fn test_stop_discards_queued_events() {
    let sensor = MockSensor::new();
    let mut controller = android_controller(180.0, MockPermissionApi::granting(), &sensor);
    controller.start();

    sensor.emit_heading(10.0, 0);
    sensor.emit_heading(20.0, 100);
    controller.stop();

    assert!(controller.process_pending().is_empty());
    assert_eq!(controller.stable_heading(), None);
}

/// A prompt still open at stop must not subscribe when it resolves
#[test]
fn test_stop_while_permission_in_flight() {
    let api = MockPermissionApi::granting();
    api.set_response(PermissionResponse::Prompting);
    let sensor = MockSensor::new();
    let mut controller = android_controller(180.0, api, &sensor);

    assert_eq!(controller.start(), GuidanceStatus::Loading);
    controller.stop();

    assert_eq!(controller.on_permission_result(true), GuidanceStatus::Stopped);
    assert_eq!(sensor.subscribe_count(), 0);
}

#[test]
fn test_async_permission_grant_subscribes() {
    let api = MockPermissionApi::granting();
    api.set_response(PermissionResponse::Prompting);
    let sensor = MockSensor::new();
    let mut controller = android_controller(180.0, api, &sensor);

    assert_eq!(controller.start(), GuidanceStatus::Loading);
    assert_eq!(controller.on_permission_result(true), GuidanceStatus::Active);
    assert_eq!(sensor.subscribe_count(), 1);
}

#[test]
fn test_web_session_reports_unavailable() {
    let mut controller = GuidanceController::new(
        GuidanceSettings::default(),
        TargetAzimuth::parse(None),
        UnsupportedSensor,
        provider_for(Platform::Web, MockPermissionApi::denying()),
        RecordingHaptics::new(),
    )
    .unwrap();

    assert_eq!(controller.start(), GuidanceStatus::SensorUnavailable);
    assert_eq!(controller.platform(), Platform::Web);
    assert_eq!(controller.target().degrees(), 180.0);
    assert!(controller.open_settings().is_err());
}

#[test]
fn test_malformed_samples_do_not_disturb_session() {
    let sensor = MockSensor::new();
    let mut controller = android_controller(0.0, MockPermissionApi::granting(), &sensor);
    controller.start();

    sensor.emit_heading(5.0, 0);
    sensor.emit(SensorEvent::Reading(HeadingSample::from_axes(None, Some(1.0), Some(0.0), 100)));
    sensor.emit_reading(f64::NAN, f64::NAN, f64::NAN, 200);

    let frames = controller.process_pending();
    assert_eq!(frames.len(), 1);
    assert_eq!(controller.status(), GuidanceStatus::Active);
    assert!((controller.stable_heading().unwrap() - 5.0).abs() < 1e-9);
}

#[test]
fn test_rotation_follows_stable_heading_only() {
    let sensor = MockSensor::new();
    let mut controller = android_controller(180.0, MockPermissionApi::granting(), &sensor);
    controller.start();

    sensor.emit_heading(100.0, 0);
    controller.process_pending();
    let settled = controller.rotation_at(1_000);
    assert!((settled + 100.0).abs() < 1e-9);

    // Sub-deadband noise leaves the rose where it is
    sensor.emit_heading(101.0, 1_000);
    sensor.emit_heading(99.5, 1_100);
    assert!(controller.process_pending().is_empty());
    assert_eq!(controller.rotation_at(2_000), settled);
}

#[test]
fn test_turning_through_north_keeps_heading_near_seam() {
    let sensor = MockSensor::new();
    let mut controller = android_controller(0.0, MockPermissionApi::granting(), &sensor);
    controller.start();

    for (i, degrees) in [350.0, 354.0, 358.0, 2.0, 6.0, 10.0].into_iter().enumerate() {
        sensor.emit_heading(degrees, i as u64 * 100);
    }
    let frames = controller.process_pending();
    assert!(!frames.is_empty());
    for frame in &frames {
        assert!(
            circular_distance(frame.heading, 0.0) <= 10.5,
            "Heading {} drifted away from north while crossing it",
            frame.heading
        );
        assert!(frame.heading_degrees < 360);
    }
    // Rose rotation stays unwrapped near zero instead of spinning a full turn
    assert!(frames.last().unwrap().rotation_angle.abs() < 20.0);
}

#[test]
fn test_ios_retry_through_settings() {
    let api = MockPermissionApi::denying();
    let sensor = MockSensor::new();
    let mut controller = GuidanceController::new(
        GuidanceSettings::default(),
        TargetAzimuth::new(200.0),
        sensor.clone(),
        provider_for(Platform::Ios, api.clone()),
        RecordingHaptics::new(),
    )
    .unwrap();

    assert_eq!(controller.start(), GuidanceStatus::PermissionDenied);
    // Retry without changing anything stays denied
    assert_eq!(controller.retry_permission(), GuidanceStatus::PermissionDenied);

    controller.open_settings().unwrap();
    api.set_response(PermissionResponse::Granted);
    assert_eq!(controller.retry_permission(), GuidanceStatus::Active);
    assert_eq!(api.settings_opened(), 1);
    assert_eq!(sensor.subscribe_count(), 1);
}

#[test]
fn test_concrete_provider_type() {
    let sensor = MockSensor::new();
    let mut controller = GuidanceController::new(
        GuidanceSettings {
            sample_interval_ms: 200,
            ..Default::default()
        },
        TargetAzimuth::new(45.0),
        sensor.clone(),
        AndroidPermissions::new(MockPermissionApi::granting()),
        RecordingHaptics::new(),
    )
    .unwrap();

    controller.start();
    assert_eq!(sensor.update_interval(), Some(200));
}
