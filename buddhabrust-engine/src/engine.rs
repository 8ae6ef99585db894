use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use buddhabrust_core::{FractalKind, IterParams, ScreenSize, ViewParams, ViewWindow};

use crate::error::EngineError;
use crate::frame::{ColorWeights, RenderFrame};
use crate::histogram::Histogram;
use crate::sampler::{Session, SharedState, WorkerPool};

/// Construction-time configuration of the sampling engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Display resolution; fixes the window aspect ratio and the sampling
    /// jitter granularity. Not the export resolution.
    pub screen: ScreenSize,

    /// Number of persistent sampler threads.
    pub workers: usize,

    /// Escape-time iteration parameters shared by every session.
    pub iter: IterParams,

    /// Minimum interval between two full rebuilds of the output image.
    pub cooldown: Duration,

    /// Phase fed to the time-varying variants, captured per session.
    pub time: f64,
}

impl EngineConfig {
    pub const DEFAULT_WORKERS: usize = 10;
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);
}

impl Default for EngineConfig {
    /// The configuration the application runs with: the 1728×972 live view,
    /// ten workers, a two-second image cooldown.
    fn default() -> Self {
        Self {
            screen: ScreenSize {
                width: 1728,
                height: 972,
            },
            workers: Self::DEFAULT_WORKERS,
            iter: IterParams::default(),
            cooldown: Self::DEFAULT_COOLDOWN,
            time: 0.0,
        }
    }
}

/// The sampling engine: owns the histogram lifecycle, the worker pool, and
/// the throttled materialization of the output image.
///
/// State machine: `Idle` (view parameters may change, buffers may be
/// resized) ⇄ `Sampling` (everything frozen, workers accumulate). Dropping
/// the engine drains the workers permanently — buffers are released only
/// after every worker has been joined.
pub struct Engine {
    config: EngineConfig,
    view: ViewParams,
    kind: FractalKind,
    color: ColorWeights,
    shared: Arc<SharedState>,
    workers: WorkerPool,
    frame: RenderFrame,
    last_materialized: Option<Instant>,
}

impl Engine {
    /// Spawn the worker pool and allocate an initial (black) frame for the
    /// default view. The workers idle until [`start`](Self::start).
    pub fn new(config: EngineConfig) -> crate::Result<Self> {
        if config.workers == 0 {
            return Err(EngineError::InvalidConfig {
                reason: "worker count must be >= 1".into(),
            });
        }
        if !config.time.is_finite() {
            return Err(EngineError::InvalidConfig {
                reason: format!("time must be finite, got {}", config.time),
            });
        }
        // Re-validate the screen: the config exposes plain fields, and the
        // samplers divide by the screen dimensions.
        ScreenSize::new(config.screen.width, config.screen.height)?;

        let view = ViewParams::default();
        let frame = RenderFrame::new(view.export_size())?;
        let shared = Arc::new(SharedState::new());
        let workers = WorkerPool::spawn(config.workers, &shared)?;
        info!(workers = workers.len(), "sampling engine ready");

        Ok(Self {
            config,
            view,
            kind: FractalKind::Mandelbrot,
            color: ColorWeights::default(),
            shared,
            workers,
            frame,
            last_materialized: None,
        })
    }

    /// Begin a sampling session.
    ///
    /// A no-op while already sampling: the in-progress histogram is never
    /// reset by a repeated start. Otherwise the window and export grid are
    /// recomputed from the current view parameters, fresh zeroed buffers are
    /// allocated (releasing the previous session's), and the workers are
    /// unleashed. Allocation failure leaves the engine idle and is
    /// recoverable.
    pub fn start(&mut self) -> crate::Result<()> {
        if self.is_sampling() {
            return Ok(());
        }

        let window = ViewWindow::from_view(&self.view, self.config.screen);
        let export = self.view.export_size();
        let histogram = Histogram::new(export)?;
        self.frame = RenderFrame::new(export)?;
        self.last_materialized = None;

        self.shared.publish_session(Some(Arc::new(Session {
            window,
            export,
            kind: self.kind,
            iter: self.config.iter,
            time: self.config.time,
            screen: self.config.screen,
            histogram,
        })));
        self.shared.sampling.store(true, Ordering::SeqCst);

        info!(
            width = export.width,
            height = export.height,
            fractal = %self.kind,
            "sampling started"
        );
        Ok(())
    }

    /// Stop sampling. Best-effort and asynchronous: each worker finishes the
    /// trajectory it is plotting before idling, which is safe because every
    /// plot is one atomic deposit.
    pub fn stop(&mut self) {
        if self.shared.sampling.swap(false, Ordering::SeqCst) {
            info!("sampling stopped");
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.shared.sampling.load(Ordering::SeqCst)
    }

    /// Replace the pan/zoom/export parameters. Rejected while sampling —
    /// workers read the view window without a lock, so it may only change
    /// while they are parked. The window takes effect at the next `start`;
    /// a changed export resolution reallocates the frame immediately so the
    /// presentation layer never sees stale dimensions.
    pub fn set_view_params(&mut self, view: ViewParams) -> crate::Result<()> {
        self.ensure_idle()?;
        let export_changed = view.export_size() != self.view.export_size();
        self.view = view;
        if export_changed {
            self.shared.publish_session(None);
            self.frame = RenderFrame::new(self.view.export_size())?;
            self.last_materialized = None;
            debug!(
                width = self.frame.width,
                height = self.frame.height,
                "export resolution changed"
            );
        }
        Ok(())
    }

    pub fn view_params(&self) -> ViewParams {
        self.view
    }

    /// Select the fractal variant for the next session. Rejected while
    /// sampling, like the view parameters.
    pub fn set_fractal(&mut self, kind: FractalKind) -> crate::Result<()> {
        self.ensure_idle()?;
        self.kind = kind;
        Ok(())
    }

    pub fn fractal(&self) -> FractalKind {
        self.kind
    }

    /// Change the export resolution. Rejected while sampling. While idle the
    /// previous session's buffers are released and a frame at the new
    /// resolution is allocated immediately.
    pub fn resize(&mut self, export_scale: f64) -> crate::Result<()> {
        self.ensure_idle()?;
        let view = ViewParams::new(self.view.offset, self.view.scale, export_scale)?;
        self.set_view_params(view)
    }

    /// Set the tint applied at the next materialization. Allowed any time;
    /// workers never read it.
    pub fn set_color_weights(&mut self, color: ColorWeights) {
        self.color = color;
    }

    pub fn color_weights(&self) -> ColorWeights {
        self.color
    }

    /// The current output image.
    ///
    /// Rebuilding a multi-megapixel buffer every display frame would dwarf
    /// the sampling work, so within the cooldown this returns the previous
    /// frame byte-identically. Outside it, the whole frame is rebuilt from
    /// the histogram under the deposit lock and the clock is restamped.
    pub fn image(&mut self) -> &RenderFrame {
        let due = match self.last_materialized {
            Some(at) => at.elapsed() >= self.config.cooldown,
            None => true,
        };
        if due {
            if let Some(session) = self.shared.current_session() {
                let color = self.color;
                let frame = &mut self.frame;
                session
                    .histogram
                    .read(|counts, max| frame.materialize(counts, max, color));
                self.last_materialized = Some(Instant::now());
                debug!(max_count = session.histogram.max_count(), "frame materialized");
            }
        }
        &self.frame
    }

    /// The largest histogram cell value so far — a cheap progress signal for
    /// the UI. Zero while nothing has escaped (or before any session).
    pub fn max_hit_count(&self) -> u32 {
        self.shared
            .current_session()
            .map(|s| s.histogram.max_count())
            .unwrap_or(0)
    }

    fn ensure_idle(&self) -> crate::Result<()> {
        if self.is_sampling() {
            return Err(EngineError::Sampling);
        }
        Ok(())
    }
}

impl Drop for Engine {
    /// Drain the pool permanently: raise the kill flag, join every worker,
    /// and only then let the session buffers drop.
    fn drop(&mut self) {
        self.shared.sampling.store(false, Ordering::SeqCst);
        self.shared.kill.store(true, Ordering::SeqCst);
        self.workers.join();
        self.shared.publish_session(None);
        debug!("sampling engine torn down");
    }
}
