//! Poller Handle - wires the HAT buttons to the host pointer
//!
//! Opens the GPIO pins and the pointer backend, builds the [`Poller`] state
//! machine and drives it until cancelled. Construction failures and runtime
//! failures are reported through [`PollerHandleError`]; nothing is retried.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::pins::{GpioPins, InputError, PinAssignment};
use super::poller::{Idle, Poller, PollerError, PollerSettings};
use crate::pointer::{EnigoPointer, PointerError};

/// Errors that can occur while bringing up or running the poller
#[derive(Debug, thiserror::Error)]
pub enum PollerHandleError {
    /// GPIO could not be opened or a pin could not be configured
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// No pointer backend available (e.g. no desktop session)
    #[error("Pointer error: {0}")]
    Pointer(#[from] PointerError),

    /// The poll loop stopped on a failed read or pointer command
    #[error("Poller error: {0}")]
    Poller(#[from] PollerError),
}

/// Entry point for running the button-to-pointer poller on real hardware
pub struct PollerHandle {}

impl PollerHandle {
    /// Runs the poller on the HAT pins until `cancel` fires
    ///
    /// # Errors
    ///
    /// * [`PollerHandleError::Input`] - GPIO peripheral unavailable
    /// * [`PollerHandleError::Pointer`] - pointer backend unavailable
    /// * [`PollerHandleError::Poller`] - a poll failed; the loop is not resumed
    pub async fn run(
        settings: Option<PollerSettings>,
        cancel: CancellationToken,
    ) -> Result<(), PollerHandleError> {
        info!("Initializing poller with settings: {:?}", settings);
        let assignment = PinAssignment::HAT;

        let pins = GpioPins::open(&assignment)?;
        let pointer = EnigoPointer::connect()?;
        debug!("Hardware ready, creating poller");

        let mut poller =
            Poller::<Idle>::create(assignment, settings, Box::new(pins), Box::new(pointer))?.start();
        poller.run(cancel).await?;

        info!("Poller stopped");
        Ok(())
    }
}
