//! Physics-driven layout synchronization.
//!
//! Hosts declare UI elements (id, size, shape, material) and a container
//! border; this crate keeps a 2D rigid-body world in sync with those
//! declarations and publishes per-element transformations (translation and
//! rotation) for the host to apply as graphics transforms. Pointer gestures
//! become spring-driven drag constraints, and gravity can be steered at
//! runtime from sensor input.
//!
//! Typical wiring:
//!
//! ```no_run
//! use glam::Vec2;
//! use physics_layout::{BorderSpec, Shape, Simulation};
//!
//! # async fn host_loop(items: Vec<physics_layout::LayoutItem>) {
//! let simulation = Simulation::default();
//! let runner = simulation.clone();
//! tokio::spawn(async move { runner.run().await });
//!
//! // On every layout pass:
//! simulation
//!     .sync_border(BorderSpec {
//!         width: 640.0,
//!         height: 480.0,
//!         shape: Some(Shape::Rectangle { width: 640.0, height: 480.0 }),
//!     })
//!     .unwrap();
//! simulation.sync_bodies(&items).unwrap();
//!
//! // On every frame:
//! for (id, transformation) in simulation.transformations() {
//!     // apply translation/rotation to the element with this id
//! }
//! # }
//! ```

pub mod config;
pub mod conversion;
pub mod drag;
pub mod error;
pub mod shapes;
pub mod simulation;

pub use config::{BodyConfig, SimulationConfig, EARTH_GRAVITY};
pub use drag::{DragConfig, TouchEvent, TouchKind};
pub use error::{PhysicsLayoutError, SyncResult};
pub use shapes::Shape;
pub use simulation::{BorderSpec, LayoutItem, Simulation, SyncSummary, Transformation};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
