use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use buddhabrust_core::{Complex, ExportSize, FractalKind, IterParams, ScreenSize, ViewWindow};

use crate::histogram::Histogram;
use crate::plot;

/// Everything one sampling session shares with the workers.
///
/// Published as a fresh `Arc` on every engine start. Workers clone the
/// pointer once per trajectory, so the window, export grid, variant and
/// histogram a trajectory uses are always consistent with each other — even
/// while the controller is already preparing the next session.
pub(crate) struct Session {
    pub window: ViewWindow,
    pub export: ExportSize,
    pub kind: FractalKind,
    pub iter: IterParams,
    /// Phase fed to the time-varying variants; fixed for the session.
    pub time: f64,
    pub screen: ScreenSize,
    pub histogram: Histogram,
}

/// Control state shared between the controller and the worker pool.
///
/// The two flags are plain polled atomics — no wait/notify. Workers burn a
/// yield loop while idle; upgrading to a condvar park is possible without
/// changing anything observable, since the flags are only read between
/// trajectories.
pub(crate) struct SharedState {
    pub sampling: AtomicBool,
    pub kill: AtomicBool,
    pub session: Mutex<Option<Arc<Session>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            sampling: AtomicBool::new(false),
            kill: AtomicBool::new(false),
            session: Mutex::new(None),
        }
    }

    pub(crate) fn current_session(&self) -> Option<Arc<Session>> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn publish_session(&self, session: Option<Arc<Session>>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }
}

/// A fixed pool of sampler threads, spawned once and joined only at
/// teardown. Workers idle between sessions instead of being respawned.
pub(crate) struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn(count: usize, shared: &Arc<SharedState>) -> crate::Result<Self> {
        let mut handles = Vec::with_capacity(count);
        for id in 0..count {
            let shared = Arc::clone(shared);
            let handle = thread::Builder::new()
                .name(format!("sampler-{id}"))
                .spawn(move || worker_loop(id, &shared))?;
            handles.push(handle);
        }
        Ok(Self { handles })
    }

    /// Block until every worker has exited. Callers must raise the kill flag
    /// first; buffers shared with workers stay alive until this returns.
    pub fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

fn worker_loop(id: usize, shared: &SharedState) {
    debug!(worker = id, "sampler worker started");
    let mut rng = SmallRng::from_entropy();
    while !shared.kill.load(Ordering::SeqCst) {
        if !shared.sampling.load(Ordering::SeqCst) {
            thread::yield_now();
            continue;
        }
        match shared.current_session() {
            Some(session) => sample_one(&mut rng, &session),
            None => thread::yield_now(),
        }
    }
    debug!(worker = id, "sampler worker exiting");
}

/// Draw one starting point, iterate it to escape or the cap, and plot the
/// trajectory — but only when the orbit actually escaped. Orbits that reach
/// the cap are presumed bounded and contribute nothing.
fn sample_one(rng: &mut SmallRng, session: &Session) {
    // Uniform over the window, quantized to quarter pixels of the *display*
    // grid — the same granularity the live view renders at.
    let px = rng.gen_range(0..session.screen.width * 4) as f64 / 4.0;
    let py = rng.gen_range(0..session.screen.height * 4) as f64 / 4.0;
    let c = session.window.to_complex(px, py, session.screen);

    let escape_radius_sq = session.iter.escape_radius_sq();
    let max_iterations = session.iter.max_iterations;

    let mut z = Complex::ZERO;
    let mut z_sq = Complex::ZERO;
    let mut trajectory = Vec::with_capacity(max_iterations as usize);
    let mut escaped = false;

    for i in 0..max_iterations {
        if !session
            .kind
            .step(i, &mut z, &mut z_sq, c, escape_radius_sq, session.time)
        {
            escaped = true;
            break;
        }
        trajectory.push(z);
    }

    if !escaped {
        return;
    }
    for &point in &trajectory {
        plot::plot(
            &session.histogram,
            point,
            &session.window,
            session.export,
            session.kind,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddhabrust_core::ViewParams;

    fn test_session(kind: FractalKind) -> Session {
        let screen = ScreenSize::new(192, 108).unwrap();
        let view = ViewParams::new(Complex::ZERO, 0.0, 0.5).unwrap();
        let window = ViewWindow::from_view(&view, screen);
        let export = view.export_size();
        Session {
            window,
            export,
            kind,
            iter: IterParams::default(),
            time: 0.0,
            screen,
            histogram: Histogram::new(export).unwrap(),
        }
    }

    #[test]
    fn sampling_accumulates_escaping_orbits() {
        let session = test_session(FractalKind::Mandelbrot);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2_000 {
            sample_one(&mut rng, &session);
        }
        // At the default view most of the window escapes; the histogram
        // cannot still be empty.
        assert!(session.histogram.max_count() > 0);
    }

    #[test]
    fn max_count_invariant_holds_after_sampling() {
        let session = test_session(FractalKind::BurningShip);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1_000 {
            sample_one(&mut rng, &session);
        }
        session.histogram.read(|counts, max| {
            let largest = counts.iter().copied().max().unwrap();
            assert!(max >= largest);
        });
    }

    #[test]
    fn workers_idle_until_sampling_flag() {
        let shared = Arc::new(SharedState::new());
        let mut pool = WorkerPool::spawn(2, &shared).unwrap();
        assert_eq!(pool.len(), 2);

        // No session, no sampling: the workers must just spin idle.
        std::thread::sleep(std::time::Duration::from_millis(20));

        shared.kill.store(true, Ordering::SeqCst);
        pool.join();
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn workers_plot_into_published_session() {
        let shared = Arc::new(SharedState::new());
        let mut pool = WorkerPool::spawn(4, &shared).unwrap();

        let session = Arc::new(test_session(FractalKind::Mandelbrot));
        shared.publish_session(Some(Arc::clone(&session)));
        shared.sampling.store(true, Ordering::SeqCst);

        // Wait for real hits rather than a fixed sleep.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while session.histogram.max_count() == 0 {
            assert!(
                std::time::Instant::now() < deadline,
                "workers produced no hits in 10s"
            );
            std::thread::yield_now();
        }

        shared.sampling.store(false, Ordering::SeqCst);
        shared.kill.store(true, Ordering::SeqCst);
        pool.join();

        session.histogram.read(|counts, max| {
            let largest = counts.iter().copied().max().unwrap();
            assert!(max >= largest, "running max must dominate every cell");
        });
    }
}
