use crate::controllers::render_session::errors::RenderError;
use crate::controllers::render_session::events::{FrameData, PartialFrame, RenderEvent};
use crate::controllers::render_session::ports::presenter::RenderPresenterPort;
use crate::core::actions::cancellation::{CancelToken, CancellationFlag};
use crate::core::actions::progressive_scan::ports::colour_map::ColourMap;
use crate::core::actions::progressive_scan::progressive_scan::ProgressiveScanner;
use crate::core::data::pixel_buffer::{PixelBuffer, SharedPixelBuffer};
use crate::core::data::viewport::Viewport;
use crate::core::fractals::mandelbrot::algorithm::MandelbrotEvaluator;
use crate::core::fractals::mandelbrot::colour_maps::hue_cycle::HueCycleColourMap;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use crate::core::util::pixel_to_complex_coords::PixelMapping;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
    Cancelled,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Pause before the first block is painted. Cancelling during the pause
    /// ends the session without painting.
    pub start_delay: Duration,
}

impl SessionOptions {
    #[must_use]
    pub fn with_start_delay(mut self, start_delay: Duration) -> Self {
        self.start_delay = start_delay;
        self
    }
}

#[derive(Debug)]
struct SessionShared {
    generation: u64,
    viewport: Viewport,
    state: Mutex<SessionState>,
    state_changed: Condvar,
    cancel: CancellationFlag,
    buffer: SharedPixelBuffer,
}

impl SessionShared {
    fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        self.state_changed.notify_all();
    }
}

/// Cheap, cloneable view of one session.
///
/// Handles outlive the session and keep its buffer alive.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    shared: Arc<SessionShared>,
}

impl SessionHandle {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.shared.generation
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    #[must_use]
    pub fn buffer(&self) -> &SharedPixelBuffer {
        &self.shared.buffer
    }

    /// Asks the worker to stop. Returns immediately; safe to repeat.
    pub fn request_cancel(&self) {
        self.shared.cancel.cancel();
    }

    /// Blocks until the session is finished or cancelled.
    ///
    /// By then the terminal event has already been presented.
    pub fn wait(&self) -> SessionState {
        let guard = self.shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        let guard = self
            .shared
            .state_changed
            .wait_while(guard, |state| !state.is_terminal())
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    /// Like [`SessionHandle::wait`] but gives up after `timeout`, returning
    /// whatever state the session is in.
    pub fn wait_timeout(&self, timeout: Duration) -> SessionState {
        let guard = self.shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .shared
            .state_changed
            .wait_timeout_while(guard, timeout, |state| !state.is_terminal())
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

/// One progressive render running on its own worker thread.
///
/// Never reused: once finished or cancelled a new session must be started.
/// Dropping a session cancels it and waits for the worker to exit.
pub struct RenderSession {
    handle: SessionHandle,
    worker: Option<JoinHandle<()>>,
}

impl RenderSession {
    /// Validates the request, allocates the output buffer and spawns the
    /// worker. Nothing is spawned if any step fails.
    pub fn start(
        generation: u64,
        viewport: &Viewport,
        config: &MandelbrotConfig,
        options: SessionOptions,
        presenter: Arc<dyn RenderPresenterPort>,
    ) -> Result<Self, RenderError> {
        config.validate()?;

        let evaluator = MandelbrotEvaluator::from_config(config)?;
        let colour_map = HueCycleColourMap::from_config(config);
        let mapping = PixelMapping::new(viewport, &config.reference_window)?;
        let buffer = PixelBuffer::new(viewport.image_width(), viewport.image_height())?;

        let shared = Arc::new(SessionShared {
            generation,
            viewport: *viewport,
            state: Mutex::new(SessionState::Running),
            state_changed: Condvar::new(),
            cancel: CancellationFlag::new(),
            buffer: SharedPixelBuffer::new(buffer),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(format!("render-session-{generation}"))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    Self::worker(&worker_shared, mapping, evaluator, colour_map, options, &*presenter);
                }));

                if outcome.is_err() {
                    Self::abandon(&worker_shared, &*presenter);
                }
            })?;

        info!(
            generation,
            width = viewport.image_width(),
            height = viewport.image_height(),
            zoom = viewport.zoom(),
            max_iterations = evaluator.max_iterations(),
            escape_radius_sq = evaluator.escape_radius_sq(),
            colour_map = colour_map.display_name(),
            "render session started"
        );

        Ok(Self {
            handle: SessionHandle { shared },
            worker: Some(worker),
        })
    }

    #[must_use]
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    /// Requests cancellation and waits for the worker to observe it.
    ///
    /// A session that already finished stays finished.
    pub fn cancel(&mut self) -> SessionState {
        self.handle.request_cancel();
        self.join()
    }

    /// Waits for the worker to exit without cancelling it.
    pub fn join(&mut self) -> SessionState {
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
            && !self.handle.state().is_terminal()
        {
            self.handle.shared.set_state(SessionState::Cancelled);
        }

        self.handle.state()
    }

    fn worker(
        shared: &SessionShared,
        mapping: PixelMapping,
        evaluator: MandelbrotEvaluator,
        colour_map: HueCycleColourMap,
        options: SessionOptions,
        presenter: &dyn RenderPresenterPort,
    ) {
        let generation = shared.generation;

        presenter.present(RenderEvent::Started {
            generation,
            width: mapping.image_width(),
            height: mapping.image_height(),
        });

        let cancelled_early = if options.start_delay.is_zero() {
            shared.cancel.is_cancelled()
        } else {
            shared.cancel.sleep(options.start_delay)
        };

        if cancelled_early {
            Self::finish_cancelled(shared, presenter);
            return;
        }

        let started = Instant::now();
        let scanner = ProgressiveScanner::new(mapping, &evaluator, &colour_map);
        let mut painter = shared.buffer.clone();

        let outcome = scanner.run(&mut painter, &shared.cancel, |progress| {
            presenter.present(RenderEvent::PartialFrame(PartialFrame {
                generation,
                progress,
                buffer: shared.buffer.clone(),
            }));
        });

        match outcome {
            Ok(summary) => {
                let render_duration = started.elapsed();
                info!(
                    generation,
                    blocks = summary.blocks_painted,
                    levels = summary.block_sizes.len(),
                    "rendered in {} ms",
                    render_duration.as_millis()
                );

                presenter.present(RenderEvent::Finished(FrameData {
                    generation,
                    pixel_buffer: shared.buffer.snapshot(),
                    render_duration,
                }));
                shared.set_state(SessionState::Finished);
            }
            Err(_) => Self::finish_cancelled(shared, presenter),
        }
    }

    /// Ends a session whose worker panicked, so waiters and the owning target
    /// never see it stuck in `Running`.
    fn abandon(shared: &SessionShared, presenter: &dyn RenderPresenterPort) {
        warn!(generation = shared.generation, "render worker panicked");

        if shared.state().is_terminal() {
            return;
        }

        let presented = panic::catch_unwind(AssertUnwindSafe(|| {
            presenter.present(RenderEvent::Cancelled {
                generation: shared.generation,
            });
        }));
        if presented.is_err() {
            warn!(generation = shared.generation, "presenter panicked on cancellation");
        }

        shared.set_state(SessionState::Cancelled);
    }

    fn finish_cancelled(shared: &SessionShared, presenter: &dyn RenderPresenterPort) {
        debug!(generation = shared.generation, "render session cancelled");
        presenter.present(RenderEvent::Cancelled {
            generation: shared.generation,
        });
        shared.set_state(SessionState::Cancelled);
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::colour::Colour;
    use crate::core::fractals::mandelbrot::errors::ConfigError;

    #[derive(Default)]
    struct MockPresenterPort {
        events: Mutex<Vec<RenderEvent>>,
    }

    impl MockPresenterPort {
        fn take_events(&self) -> Vec<RenderEvent> {
            let mut guard = self.events.lock().unwrap();
            std::mem::take(&mut *guard)
        }
    }

    impl RenderPresenterPort for MockPresenterPort {
        fn present(&self, event: RenderEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn start_session(
        viewport: &Viewport,
        options: SessionOptions,
    ) -> (RenderSession, Arc<MockPresenterPort>) {
        let presenter = Arc::new(MockPresenterPort::default());
        let session = RenderSession::start(
            7,
            viewport,
            &MandelbrotConfig::default(),
            options,
            Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>,
        )
        .unwrap();

        (session, presenter)
    }

    #[test]
    fn test_session_runs_to_finished() {
        let viewport = Viewport::identity(64, 64).unwrap();
        let (session, presenter) = start_session(&viewport, SessionOptions::default());

        assert_eq!(session.handle().wait(), SessionState::Finished);

        let events = presenter.take_events();
        assert!(matches!(
            events.first(),
            Some(RenderEvent::Started {
                generation: 7,
                width: 64,
                height: 64
            })
        ));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RenderEvent::PartialFrame(_)))
        );
        assert!(events.iter().all(|e| e.generation() == 7));

        match events.last() {
            Some(RenderEvent::Finished(frame)) => {
                assert_eq!(frame.pixel_buffer.width(), 64);
                assert_eq!(frame.pixel_buffer.pixel(32, 32), Some(Colour::BLACK));
                assert_eq!(&frame.pixel_buffer, &*session.handle().buffer().read());
            }
            other => panic!("expected a finished event, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_frames_share_session_buffer() {
        let viewport = Viewport::identity(16, 16).unwrap();
        let (session, presenter) = start_session(&viewport, SessionOptions::default());
        session.handle().wait();

        for event in presenter.take_events() {
            if let RenderEvent::PartialFrame(frame) = event {
                assert!(frame.buffer.ptr_eq(session.handle().buffer()));
            }
        }
    }

    #[test]
    fn test_cancel_during_start_delay_paints_nothing() {
        let viewport = Viewport::identity(32, 32).unwrap();
        let options = SessionOptions::default().with_start_delay(Duration::from_secs(60));
        let (mut session, presenter) = start_session(&viewport, options);
        let started = Instant::now();

        assert_eq!(session.cancel(), SessionState::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(30));

        let events = presenter.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RenderEvent::Started { .. }));
        assert!(matches!(events[1], RenderEvent::Cancelled { generation: 7 }));
        assert!(session.handle().buffer().read().buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let viewport = Viewport::identity(32, 32).unwrap();
        let options = SessionOptions::default().with_start_delay(Duration::from_secs(60));
        let (mut session, presenter) = start_session(&viewport, options);

        session.handle().request_cancel();
        session.handle().request_cancel();
        assert_eq!(session.cancel(), SessionState::Cancelled);
        assert_eq!(session.cancel(), SessionState::Cancelled);

        let cancelled = presenter
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, RenderEvent::Cancelled { .. }))
            .count();
        assert_eq!(cancelled, 1);
    }

    #[test]
    fn test_cancel_after_finish_keeps_finished() {
        let viewport = Viewport::identity(8, 8).unwrap();
        let (mut session, _presenter) = start_session(&viewport, SessionOptions::default());

        assert_eq!(session.handle().wait(), SessionState::Finished);
        assert_eq!(session.cancel(), SessionState::Finished);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_spawn() {
        let presenter = Arc::new(MockPresenterPort::default());
        let viewport = Viewport::identity(8, 8).unwrap();
        let config = MandelbrotConfig::default().with_max_iterations(0);

        let result = RenderSession::start(
            1,
            &viewport,
            &config,
            SessionOptions::default(),
            Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>,
        );

        assert!(matches!(
            result,
            Err(RenderError::Config(ConfigError::ZeroMaxIterations))
        ));
        assert!(presenter.take_events().is_empty());
    }

    #[test]
    fn test_drop_cancels_running_session() {
        let viewport = Viewport::identity(32, 32).unwrap();
        let options = SessionOptions::default().with_start_delay(Duration::from_secs(60));
        let (session, presenter) = start_session(&viewport, options);
        let handle = session.handle().clone();
        let started = Instant::now();

        drop(session);

        assert!(started.elapsed() < Duration::from_secs(30));
        assert_eq!(handle.state(), SessionState::Cancelled);
        assert!(
            presenter
                .take_events()
                .last()
                .is_some_and(RenderEvent::is_terminal)
        );
    }

    #[test]
    fn test_wait_timeout_returns_running_while_delayed() {
        let viewport = Viewport::identity(8, 8).unwrap();
        let options = SessionOptions::default().with_start_delay(Duration::from_secs(60));
        let (mut session, _presenter) = start_session(&viewport, options);

        assert_eq!(
            session.handle().wait_timeout(Duration::from_millis(20)),
            SessionState::Running
        );
        assert_eq!(session.cancel(), SessionState::Cancelled);
    }

    #[derive(Default)]
    struct PanicOnPartialFrame {
        events: Mutex<Vec<RenderEvent>>,
    }

    impl RenderPresenterPort for PanicOnPartialFrame {
        fn present(&self, event: RenderEvent) {
            if let RenderEvent::PartialFrame(_) = event {
                panic!("presenter failed on partial frame");
            }
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_worker_panic_ends_session_as_cancelled() {
        let presenter = Arc::new(PanicOnPartialFrame::default());
        let viewport = Viewport::identity(16, 16).unwrap();
        let mut session = RenderSession::start(
            3,
            &viewport,
            &MandelbrotConfig::default(),
            SessionOptions::default(),
            Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>,
        )
        .unwrap();

        assert_eq!(
            session.handle().wait_timeout(Duration::from_secs(10)),
            SessionState::Cancelled
        );

        {
            let events = presenter.events.lock().unwrap();
            assert!(matches!(events.first(), Some(RenderEvent::Started { .. })));
            assert!(matches!(
                events.last(),
                Some(RenderEvent::Cancelled { generation: 3 })
            ));
        }

        assert_eq!(session.cancel(), SessionState::Cancelled);
    }

    /// Cancels its session from inside the first partial-frame callback.
    #[derive(Default)]
    struct CancelOnFirstPartialFrame {
        handle: Mutex<Option<SessionHandle>>,
        handle_ready: Condvar,
        events: Mutex<Vec<RenderEvent>>,
    }

    impl CancelOnFirstPartialFrame {
        fn attach(&self, handle: SessionHandle) {
            *self.handle.lock().unwrap() = Some(handle);
            self.handle_ready.notify_all();
        }
    }

    impl RenderPresenterPort for CancelOnFirstPartialFrame {
        fn present(&self, event: RenderEvent) {
            if let RenderEvent::PartialFrame(_) = event {
                let guard = self
                    .handle_ready
                    .wait_while(self.handle.lock().unwrap(), |handle| handle.is_none())
                    .unwrap();
                if let Some(handle) = guard.as_ref() {
                    handle.request_cancel();
                }
            }
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_cancel_mid_scan_stops_after_partial_frames() {
        let presenter = Arc::new(CancelOnFirstPartialFrame::default());
        let viewport = Viewport::identity(64, 64).unwrap();
        let mut session = RenderSession::start(
            5,
            &viewport,
            &MandelbrotConfig::default(),
            SessionOptions::default(),
            Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>,
        )
        .unwrap();
        presenter.attach(session.handle().clone());

        assert_eq!(session.handle().wait(), SessionState::Cancelled);

        let events = std::mem::take(&mut *presenter.events.lock().unwrap());
        let partial_frames = events
            .iter()
            .filter(|e| matches!(e, RenderEvent::PartialFrame(_)))
            .count();
        assert!(partial_frames >= 1);
        assert!(!events.iter().any(|e| matches!(e, RenderEvent::Finished(_))));
        assert!(matches!(
            events.last(),
            Some(RenderEvent::Cancelled { generation: 5 })
        ));

        // The coarse block was committed before the cancel.
        assert!(session.handle().buffer().read().buffer().iter().any(|&b| b != 0));
        assert_eq!(session.cancel(), SessionState::Cancelled);
    }
}
