use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use parking_lot::Mutex;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::display::{VitalsDisplay, VitalsFrame};
use crate::vitals::{Reading, SimulationState};


pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);


/// Periodic generator of synthetic vitals.
///
/// Nothing happens until [`SimulationLoop::start`], which consumes the loop so
/// a session can only ever be scheduled once.
pub struct SimulationLoop<R, D> {
    period: Duration,
    state: Arc<Mutex<SimulationState>>,
    rng: R,
    display: D,
}

impl<R, D> SimulationLoop<R, D>
where
    R: Rng + Send + 'static,
    D: VitalsDisplay,
{
    pub fn new(period: Duration, max_samples: usize, rng: R, display: D) -> Self {
        SimulationLoop {
            period,
            state: Arc::new(Mutex::new(SimulationState::new(max_samples))),
            rng,
            display,
        }
    }

    /// Spawns the loop on the current tokio runtime.
    /// The first tick fires one full period after this call.
    pub fn start(self) -> SimulationHandle {
        let token = CancellationToken::new();
        let state = Arc::clone(&self.state);

        info!("starting simulation, period {:?}", self.period);
        let task = tokio::spawn(self.run(token.clone()));

        SimulationHandle {
            token,
            state,
            task: Some(task),
        }
    }

    async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.period) => {}
            }

            // stop() takes this lock after cancelling, so checking here keeps
            // a tick from landing after stop() has returned
            let mut state = self.state.lock();
            if token.is_cancelled() {
                break;
            }
            let frame = Self::tick(&mut state, &mut self.rng);
            self.display.render(frame);
        }
        debug!("simulation task exited");
    }

    fn tick(state: &mut SimulationState, rng: &mut R) -> VitalsFrame {
        let reading = Reading::generate(rng);
        let tick = state.record(reading);
        debug!(
            "tick {tick}: {} {} bpm, {} {:.2} °C, {} retained",
            state.heart_rate().name(),
            reading.heart_rate,
            state.body_temp().name(),
            reading.body_temp,
            state.heart_rate().len(),
        );

        VitalsFrame::capture(state, reading)
    }
}


/// Handle to a running [`SimulationLoop`]. Dropping it stops the loop.
pub struct SimulationHandle {
    token: CancellationToken,
    state: Arc<Mutex<SimulationState>>,
    task: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    /// Cancels the loop. Once this returns no further tick will run.
    /// Safe to call again, from any thread, or after the loop is gone.
    pub fn stop(&self) {
        let first = !self.token.is_cancelled();
        self.token.cancel();
        // a tick may still hold the lock, even when another caller cancelled first
        drop(self.state.lock());
        if first {
            info!("simulation stopped");
        }
    }

    /// Stops the loop and waits for its task to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(err) = task.await {
            debug!("simulation task ended abnormally: {err}");
        }
    }

    pub fn snapshot(&self) -> SimulationState {
        self.state.lock().clone()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
