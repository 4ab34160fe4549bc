//! Background render sessions and their lifecycle.
//!
//! A [`RenderTarget`] owns at most one running [`RenderSession`]. Each
//! session runs one progressive scan on a dedicated worker thread and reports
//! through a [`RenderPresenterPort`]. Sessions are never mutated in flight; a
//! changed viewport goes through [`RenderTarget::restart`].

pub mod errors;
pub mod events;
pub mod ports;
pub mod session;
pub mod target;

pub use errors::RenderError;
pub use events::{FrameData, PartialFrame, RenderEvent};
pub use ports::presenter::RenderPresenterPort;
pub use session::{RenderSession, SessionHandle, SessionOptions, SessionState};
pub use target::RenderTarget;
