use crate::controllers::render_session::events::RenderEvent;

/// Receives session notifications on the worker thread.
///
/// Implementations should return quickly; the scan waits for every call.
pub trait RenderPresenterPort: Send + Sync {
    fn present(&self, event: RenderEvent);
}
