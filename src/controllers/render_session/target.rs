use crate::controllers::render_session::errors::RenderError;
use crate::controllers::render_session::ports::presenter::RenderPresenterPort;
use crate::controllers::render_session::session::{
    RenderSession, SessionHandle, SessionOptions, SessionState,
};
use crate::core::data::viewport::Viewport;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use std::sync::Arc;
use tracing::debug;

/// One display surface (a view, a wallpaper) and the session drawing it.
///
/// At most one session runs per target. Generations increase with every
/// session started so presenters can drop events from superseded renders.
pub struct RenderTarget {
    name: String,
    presenter: Arc<dyn RenderPresenterPort>,
    options: SessionOptions,
    last_generation: u64,
    session: Option<RenderSession>,
}

impl RenderTarget {
    pub fn new(name: impl Into<String>, presenter: Arc<dyn RenderPresenterPort>) -> Self {
        Self {
            name: name.into(),
            presenter,
            options: SessionOptions::default(),
            last_generation: 0,
            session: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// `Idle` until the first session is started.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, RenderSession::state)
    }

    #[must_use]
    pub fn current(&self) -> Option<&SessionHandle> {
        self.session.as_ref().map(RenderSession::handle)
    }

    #[must_use]
    pub fn last_generation(&self) -> u64 {
        self.last_generation
    }

    /// Starts rendering `viewport`.
    ///
    /// While a session is still running this returns its handle unchanged;
    /// use [`RenderTarget::restart`] to apply a new viewport or config.
    pub fn start(
        &mut self,
        viewport: &Viewport,
        config: &MandelbrotConfig,
    ) -> Result<SessionHandle, RenderError> {
        if let Some(session) = &self.session
            && session.state() == SessionState::Running
        {
            debug!(
                target_name = %self.name,
                generation = session.handle().generation(),
                "start ignored, session already running"
            );
            return Ok(session.handle().clone());
        }

        if let Some(mut previous) = self.session.take() {
            previous.join();
        }

        let generation = self.last_generation + 1;
        let session = RenderSession::start(
            generation,
            viewport,
            config,
            self.options,
            Arc::clone(&self.presenter),
        )?;
        self.last_generation = generation;

        let handle = session.handle().clone();
        self.session = Some(session);
        Ok(handle)
    }

    /// Cancels `handle`'s session, waiting for it if it is this target's
    /// current one. Handles from superseded sessions are already terminal.
    pub fn cancel(&mut self, handle: &SessionHandle) -> SessionState {
        match &mut self.session {
            Some(session) if session.handle().same_session(handle) => session.cancel(),
            _ => {
                handle.request_cancel();
                handle.state()
            }
        }
    }

    /// Cancels whatever is running. A no-op on an idle target.
    pub fn cancel_current(&mut self) -> SessionState {
        match &mut self.session {
            Some(session) => session.cancel(),
            None => SessionState::Idle,
        }
    }

    /// Cancels the current session and starts a fresh one. The old session
    /// has stopped painting before the new one is spawned.
    pub fn restart(
        &mut self,
        viewport: &Viewport,
        config: &MandelbrotConfig,
    ) -> Result<SessionHandle, RenderError> {
        self.cancel_current();
        self.start(viewport, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::render_session::events::RenderEvent;
    use std::sync::Mutex;
    use std::time::Duration;

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

    fn delayed_target() -> (RenderTarget, Arc<MockPresenterPort>) {
        let presenter = Arc::new(MockPresenterPort::default());
        let target = RenderTarget::new(
            "view",
            Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>,
        )
        .with_options(SessionOptions::default().with_start_delay(Duration::from_secs(60)));

        (target, presenter)
    }

    #[test]
    fn test_new_target_is_idle() {
        let (mut target, _presenter) = delayed_target();

        assert_eq!(target.state(), SessionState::Idle);
        assert_eq!(target.last_generation(), 0);
        assert!(target.current().is_none());
        assert_eq!(target.cancel_current(), SessionState::Idle);
    }

    #[test]
    fn test_start_while_running_returns_same_session() {
        let (mut target, _presenter) = delayed_target();
        let viewport = Viewport::identity(16, 16).unwrap();
        let config = MandelbrotConfig::default();

        let first = target.start(&viewport, &config).unwrap();
        let second = target.start(&viewport.zoom_by(2.0).unwrap(), &config).unwrap();

        assert!(first.same_session(&second));
        assert_eq!(second.viewport(), viewport);
        assert_eq!(target.last_generation(), 1);
        assert_eq!(target.cancel_current(), SessionState::Cancelled);
    }

    #[test]
    fn test_restart_cancels_before_starting() {
        let (mut target, presenter) = delayed_target();
        let viewport = Viewport::identity(16, 16).unwrap();
        let config = MandelbrotConfig::default();

        let first = target.start(&viewport, &config).unwrap();
        let zoomed = viewport.zoom_by(2.0).unwrap();
        let second = target.restart(&zoomed, &config).unwrap();

        assert_eq!(first.state(), SessionState::Cancelled);
        assert_eq!(second.state(), SessionState::Running);
        assert_eq!(second.generation(), first.generation() + 1);
        assert_eq!(second.viewport(), zoomed);
        assert!(!first.buffer().ptr_eq(second.buffer()));

        assert_eq!(target.cancel_current(), SessionState::Cancelled);

        // Every event of the first session precedes the second's start.
        let generations: Vec<u64> = presenter
            .take_events()
            .iter()
            .map(RenderEvent::generation)
            .collect();
        let first_of_second = generations.iter().position(|&g| g == 2).unwrap();
        assert!(generations[first_of_second..].iter().all(|&g| g == 2));
    }

    #[test]
    fn test_cancel_by_handle() {
        let (mut target, _presenter) = delayed_target();
        let viewport = Viewport::identity(16, 16).unwrap();
        let config = MandelbrotConfig::default();

        let first = target.start(&viewport, &config).unwrap();
        assert_eq!(target.cancel(&first), SessionState::Cancelled);
        assert_eq!(target.cancel(&first), SessionState::Cancelled);

        let second = target.start(&viewport, &config).unwrap();
        assert_eq!(target.cancel(&first), SessionState::Cancelled);
        assert_eq!(second.state(), SessionState::Running);
        assert_eq!(target.cancel(&second), SessionState::Cancelled);
    }

    #[test]
    fn test_start_after_finish_begins_new_generation() {
        let presenter = Arc::new(MockPresenterPort::default());
        let mut target =
            RenderTarget::new("wallpaper", Arc::clone(&presenter) as Arc<dyn RenderPresenterPort>);
        let viewport = Viewport::identity(8, 8).unwrap();
        let config = MandelbrotConfig::wallpaper();

        let first = target.start(&viewport, &config).unwrap();
        assert_eq!(first.wait(), SessionState::Finished);
        assert_eq!(target.state(), SessionState::Finished);

        let second = target.start(&viewport, &config).unwrap();
        assert_eq!(second.generation(), 2);
        assert_eq!(second.wait(), SessionState::Finished);

        let finished = presenter
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, RenderEvent::Finished(_)))
            .count();
        assert_eq!(finished, 2);
    }

    #[test]
    fn test_failed_start_keeps_generation() {
        let (mut target, _presenter) = delayed_target();
        let viewport = Viewport::identity(8, 8).unwrap();
        let config = MandelbrotConfig::default().with_saturation(2.0);

        assert!(matches!(
            target.start(&viewport, &config),
            Err(RenderError::Config(_))
        ));
        assert_eq!(target.last_generation(), 0);
        assert_eq!(target.state(), SessionState::Idle);
    }

    struct PanicOnPartialFrame;

    impl RenderPresenterPort for PanicOnPartialFrame {
        fn present(&self, event: RenderEvent) {
            if let RenderEvent::PartialFrame(_) = event {
                panic!("presenter failed on partial frame");
            }
        }
    }

    #[test]
    fn test_start_after_worker_panic_replaces_dead_session() {
        let mut target = RenderTarget::new("view", Arc::new(PanicOnPartialFrame));
        let viewport = Viewport::identity(16, 16).unwrap();
        let config = MandelbrotConfig::default();

        let first = target.start(&viewport, &config).unwrap();
        assert_eq!(
            first.wait_timeout(Duration::from_secs(10)),
            SessionState::Cancelled
        );
        assert_eq!(target.state(), SessionState::Cancelled);

        let zoomed = viewport.zoom_by(2.0).unwrap();
        let second = target.start(&zoomed, &config).unwrap();

        assert!(!second.same_session(&first));
        assert_eq!(second.generation(), 2);
        assert_eq!(second.viewport(), zoomed);
        assert_eq!(
            second.wait_timeout(Duration::from_secs(10)),
            SessionState::Cancelled
        );
    }
}
