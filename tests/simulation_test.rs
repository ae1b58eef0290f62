//! End-to-end facade tests: declarative sync in, transformations out.

use std::time::Duration;

use glam::Vec2;
use physics_layout::{
    BodyConfig, BorderSpec, DragConfig, LayoutItem, PhysicsLayoutError, Shape, Simulation,
    SimulationConfig, TouchEvent,
};

// Comfortably above the 1/90 s substep so every call integrates at least once.
const STEP: Duration = Duration::from_millis(12);

/// Hooks test output up to `RUST_LOG`; safe to call from every test.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn rect_border(width: f32, height: f32) -> BorderSpec {
    BorderSpec {
        width,
        height,
        shape: Some(Shape::Rectangle { width, height }),
    }
}

/// A 64x64 ball positioned by its top-left corner inside the container.
fn ball(id: &str, x: f32, y: f32) -> LayoutItem {
    LayoutItem {
        id: id.to_owned(),
        width: 64.0,
        height: 64.0,
        shape: Shape::Circle { radius: 32.0 },
        is_static: false,
        initial_translation: Vec2::new(x, y),
        initial_impulse: None,
        body: BodyConfig::default(),
    }
}

fn advance(simulation: &Simulation, steps: usize) {
    for _ in 0..steps {
        simulation.step(STEP);
    }
}

#[tokio::test]
async fn ball_falls_and_comes_to_rest_on_the_border() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();
    // Horizontally centered, near the top.
    simulation.sync_bodies(&[ball("ball", 288.0, 0.0)]).unwrap();

    // Free fall is monotonic downward in the y-down coordinate system.
    let mut previous_y = f32::NEG_INFINITY;
    for _ in 0..30 {
        simulation.step(STEP);
        let y = simulation.transformation("ball").unwrap().translation_y;
        assert!(y >= previous_y - 1e-3, "ball moved up during free fall");
        previous_y = y;
    }

    // Give the bounces ten simulated seconds to decay.
    advance(&simulation, 900);
    let settled = simulation.transformation("ball").unwrap();

    // Resting on the floor: ball center one radius above the bottom edge,
    // still horizontally centered.
    assert!(
        settled.translation_y > 150.0 && settled.translation_y < 240.0,
        "ball settled at y = {}",
        settled.translation_y
    );
    assert!(settled.translation_x.abs() < 20.0);

    // And actually at rest.
    advance(&simulation, 90);
    let later = simulation.transformation("ball").unwrap();
    assert!((later.translation_y - settled.translation_y).abs() < 1.0);
}

#[tokio::test]
async fn border_survives_a_rejected_resync() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();

    // Rounded borders are unsupported; the rejection must leave the rectangle
    // border in place.
    let rounded = BorderSpec {
        width: 640.0,
        height: 480.0,
        shape: Some(Shape::RoundedRect {
            width: 640.0,
            height: 480.0,
            corner_radius: 32.0,
        }),
    };
    assert!(simulation.sync_border(rounded).is_err());
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();

    // A dropped ball still lands on the floor instead of falling through.
    simulation.sync_bodies(&[ball("ball", 288.0, 0.0)]).unwrap();
    advance(&simulation, 900);
    let settled = simulation.transformation("ball").unwrap();
    assert!(
        settled.translation_y > 150.0 && settled.translation_y < 240.0,
        "ball fell through the border to y = {}",
        settled.translation_y
    );
}

#[tokio::test]
async fn syncing_bodies_before_the_border_fails() {
    init_tracing();
    let simulation = Simulation::default();
    let result = simulation.sync_bodies(&[ball("ball", 0.0, 0.0)]);
    assert!(matches!(
        result,
        Err(PhysicsLayoutError::ContainerNotSynced)
    ));
}

#[tokio::test]
async fn removed_bodies_disappear_from_the_snapshot() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();
    simulation
        .sync_bodies(&[ball("a", 100.0, 0.0), ball("b", 400.0, 0.0)])
        .unwrap();
    advance(&simulation, 10);
    assert_eq!(simulation.transformations().len(), 2);

    let summary = simulation.sync_bodies(&[ball("b", 400.0, 0.0)]).unwrap();
    assert_eq!(summary.removed, 1);
    assert!(simulation.transformation("a").is_none());

    advance(&simulation, 10);
    let snapshot = simulation.transformations();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains_key("b"));
}

#[tokio::test]
async fn single_body_sync_adds_and_removes() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();

    let item = ball("solo", 288.0, 100.0);
    simulation.sync_body("solo", Some(&item)).unwrap();
    advance(&simulation, 5);
    assert!(simulation.transformation("solo").is_some());

    simulation.sync_body("solo", None).unwrap();
    assert!(simulation.transformation("solo").is_none());
}

#[tokio::test]
async fn drag_pulls_the_body_toward_the_pointer() {
    init_tracing();
    let config = SimulationConfig {
        gravity: Vec2::ZERO,
        ..SimulationConfig::default()
    };
    let simulation = Simulation::new(config);
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();
    // Dead center of the container.
    simulation
        .sync_bodies(&[ball("ball", 288.0, 208.0)])
        .unwrap();
    simulation.step(STEP);
    let start = simulation.transformation("ball").unwrap();
    assert!(start.translation_x.abs() < 1.0);

    let drag_config = DragConfig::default();
    simulation.drag("ball", TouchEvent::down(1, Vec2::ZERO), &drag_config);
    // The pointer slides 100 layout units to the right of the grab point.
    simulation.drag(
        "ball",
        TouchEvent::moved(1, Vec2::new(100.0, 0.0)),
        &drag_config,
    );

    advance(&simulation, 90);
    let dragged = simulation.transformation("ball").unwrap();
    assert!(
        dragged.translation_x > 10.0,
        "drag moved the ball to x = {}",
        dragged.translation_x
    );
}

#[tokio::test]
async fn drag_events_for_unknown_bodies_are_ignored() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();

    // Never synced; must not fault.
    simulation.drag(
        "ghost",
        TouchEvent::down(1, Vec2::ZERO),
        &DragConfig::default(),
    );
    simulation.step(STEP);
}

#[tokio::test]
async fn gravity_can_be_steered_at_runtime() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();
    simulation
        .sync_bodies(&[ball("ball", 288.0, 208.0)])
        .unwrap();

    // Point gravity to the right instead of down.
    simulation.set_gravity(Vec2::new(9.81, 0.0));
    advance(&simulation, 45);

    let t = simulation.transformation("ball").unwrap();
    assert!(t.translation_x > 1.0, "x = {}", t.translation_x);
    assert!(t.translation_y.abs() < t.translation_x);
}

#[tokio::test]
async fn pausing_freezes_the_stepping_loop() {
    init_tracing();
    let simulation = Simulation::default();
    simulation.sync_border(rect_border(640.0, 480.0)).unwrap();
    simulation.sync_bodies(&[ball("ball", 288.0, 0.0)]).unwrap();

    let runner = simulation.clone();
    let task = tokio::spawn(async move { runner.run().await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    let falling = simulation.transformation("ball").unwrap();
    // Starts at y = -208; 300 ms of gravity moves it visibly down.
    assert!(falling.translation_y > -200.0, "ball did not start falling");

    simulation.pause();
    // Let any in-flight step drain before sampling.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let frozen = simulation.transformation("ball").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(simulation.transformation("ball").unwrap(), frozen);

    // Resuming must not replay the paused interval as one giant step.
    simulation.resume();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let resumed = simulation.transformation("ball").unwrap();
    assert!(
        resumed.translation_y - frozen.translation_y < 60.0,
        "resume jumped from {} to {}",
        frozen.translation_y,
        resumed.translation_y
    );

    task.abort();
}
