//! The asynchronous stepping loop.

use std::time::{Duration, Instant};

use super::Simulation;

impl Simulation {
    /// Drives the simulation from wall-clock time until the owning task is
    /// cancelled. Spawn this on the host runtime:
    ///
    /// ```no_run
    /// # use physics_layout::simulation::Simulation;
    /// let simulation = Simulation::default();
    /// let runner = simulation.clone();
    /// tokio::spawn(async move { runner.run().await });
    /// ```
    ///
    /// Each iteration measures the time since the previous one, advances the
    /// world by it, then yields briefly so the loop never starves the
    /// runtime. While paused, elapsed time is still consumed (and discarded)
    /// so resuming does not replay the pause as one giant step.
    pub async fn run(&self) {
        let mut last = Instant::now();
        loop {
            let now = Instant::now();
            let elapsed = now - last;
            last = now;

            if !self.is_paused() {
                self.step(elapsed);
            }

            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}
