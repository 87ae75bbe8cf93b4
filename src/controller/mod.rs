//! Controller subsystem for the HAT buttons
//!
//! 1. [`pins`] - Pin assignment and pull-up GPIO input
//! 2. [`edge`] - Press/release tracking for the click keys
//! 3. [`poller`] - Typestate polling loop turning button levels into pointer commands
//! 4. [`poller_handle`] - Hardware wiring and lifecycle
//!
//! ```text
//! GPIO ──► PinSnapshot ──► Poller ──► PointerControl
//!          (every 20ms)    (edges, moves)
//! ```

pub mod edge;
pub mod pins;
pub mod poller;
pub mod poller_handle;

pub use poller::{PollReport, Poller, PollerError, PollerSettings};
pub use poller_handle::{PollerHandle, PollerHandleError};
