use chrono::Local;
use serde::{Deserialize, Serialize};
use statum::{machine, state};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::controller::edge::EdgeTracker;
use crate::controller::pins::{InputError, PinAssignment, PinReader, PinSnapshot, Role};
use crate::pointer::{PointerButton, PointerControl, PointerError};

/// Directional buttons in the order their moves are issued
const DIRECTIONS: [Role; 4] = [Role::Up, Role::Down, Role::Left, Role::Right];

// Poller settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Sleep between two polls; bounds CPU usage
    pub poll_interval_ms: u64,
    /// Pointer offset applied per poll while a direction is held
    pub step: i32,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 20,
            step: 5,
        }
    }
}

impl PollerSettings {
    /// Largest pointer offset accepted per poll
    pub const MAX_STEP: i32 = 1000;

    pub fn validate(&self) -> Result<(), PollerError> {
        if self.poll_interval_ms == 0 {
            return Err(PollerError::Settings(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.step <= 0 || self.step > Self::MAX_STEP {
            return Err(PollerError::Settings(format!(
                "step must be between 1 and {}, got {}",
                Self::MAX_STEP,
                self.step
            )));
        }
        Ok(())
    }
}

// Poller errors
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("Failed to read buttons: {0}")]
    Input(#[from] InputError),

    #[error("Pointer command failed: {0}")]
    Pointer(#[from] PointerError),

    #[error("Invalid poller settings: {0}")]
    Settings(String),
}

/// Commands issued by a single poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    pub position: (i32, i32),
    pub clicks: Vec<PointerButton>,
    pub moves: Vec<(i32, i32)>,
}

impl PollReport {
    pub fn is_idle(&self) -> bool {
        self.clicks.is_empty() && self.moves.is_empty()
    }
}

/// Move target for a held direction, relative to the sampled position.
///
/// Up/down shift the horizontal axis and left/right the vertical one.
fn direction_target(role: Role, (x, y): (i32, i32), step: i32) -> Option<(i32, i32)> {
    match role {
        Role::Up => Some((x.saturating_sub(step), y)),
        Role::Down => Some((x.saturating_add(step), y)),
        Role::Left => Some((x, y.saturating_add(step))),
        Role::Right => Some((x, y.saturating_sub(step))),
        Role::Key1 | Role::Key2 => None,
    }
}

// Throughput counters, logged periodically
#[derive(Debug, Clone)]
struct PollStats {
    polls: u64,
    clicks: u64,
    moves: u64,
    last_log_time: chrono::DateTime<Local>,
}

impl PollStats {
    fn new() -> Self {
        Self {
            polls: 0,
            clicks: 0,
            moves: 0,
            last_log_time: Local::now(),
        }
    }

    fn record(&mut self, report: &PollReport) {
        self.polls += 1;
        self.clicks += report.clicks.len() as u64;
        self.moves += report.moves.len() as u64;
    }

    fn log_if_due(&mut self) {
        let log_interval = chrono::Duration::seconds(10);
        let now = Local::now();
        if now - self.last_log_time > log_interval {
            info!(
                "Poller stats: {} polls, {} clicks, {} moves in last {} seconds",
                self.polls,
                self.clicks,
                self.moves,
                log_interval.num_seconds()
            );
            self.polls = 0;
            self.clicks = 0;
            self.moves = 0;
            self.last_log_time = now;
        }
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum PollState {
    Idle,
    Polling,
}

#[machine]
pub struct Poller<S: PollState> {
    // Pin → role mapping, fixed for the process lifetime
    assignment: PinAssignment,

    settings: PollerSettings,

    pins: Box<dyn PinReader>,

    pointer: Box<dyn PointerControl>,

    // Click keys are edge-triggered
    key1: EdgeTracker,
    key2: EdgeTracker,

    stats: PollStats,
}

impl Poller<Idle> {
    pub fn create(
        assignment: PinAssignment,
        settings: Option<PollerSettings>,
        pins: Box<dyn PinReader>,
        pointer: Box<dyn PointerControl>,
    ) -> Result<Self, PollerError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating Poller with settings: {:?}", settings);

        if let Err(e) = settings.validate() {
            error!("Rejecting poller settings: {}", e);
            return Err(e);
        }

        Ok(Self::new(
            assignment,
            settings,
            pins,
            pointer,
            EdgeTracker::new(),
            EdgeTracker::new(),
            PollStats::new(),
        ))
    }

    pub fn start(self) -> Poller<Polling> {
        info!(
            "Poller ready: polling every {} ms, step {}",
            self.settings.poll_interval_ms, self.settings.step
        );
        self.transition()
    }
}

impl Poller<Polling> {
    /// Runs a single iteration: sample position and pins, then click and move
    pub fn poll_once(&mut self) -> Result<PollReport, PollerError> {
        let position = self.pointer.position()?;
        let snapshot = self.pins.snapshot(&self.assignment)?;
        let (x, y) = position;

        let mut report = PollReport {
            position,
            ..Default::default()
        };

        if !snapshot.any_asserted() && !self.key1.is_pressed() && !self.key2.is_pressed() {
            self.stats.record(&report);
            return Ok(report);
        }

        for (role, button) in [
            (Role::Key1, PointerButton::Primary),
            (Role::Key2, PointerButton::Secondary),
        ] {
            if self.click_edge(role, &snapshot) {
                info!("{} pressed, clicking {} at ({}, {})", role, button, x, y);
                self.pointer.click(x, y, button)?;
                report.clicks.push(button);
            }
        }

        for role in DIRECTIONS {
            if !snapshot.is_asserted(role) {
                continue;
            }
            if let Some((tx, ty)) = direction_target(role, position, self.settings.step) {
                debug!("{} held, moving pointer to ({}, {})", role, tx, ty);
                self.pointer.move_to(tx, ty)?;
                report.moves.push((tx, ty));
            }
        }

        self.stats.record(&report);
        Ok(report)
    }

    fn click_edge(&mut self, role: Role, snapshot: &PinSnapshot) -> bool {
        let asserted = snapshot.is_asserted(role);
        let edge = match role {
            Role::Key1 => &mut self.key1,
            Role::Key2 => &mut self.key2,
            _ => return false,
        };
        let was_pressed = edge.is_pressed();
        let fired = edge.update(asserted);
        if was_pressed && !asserted {
            debug!("{} released", role);
        }
        fired
    }

    /// Polls until `cancel` fires; any pin or pointer failure ends the loop
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), PollerError> {
        info!("Starting poll loop");
        let interval = Duration::from_millis(self.settings.poll_interval_ms);

        loop {
            if cancel.is_cancelled() {
                info!("Poll loop cancelled");
                return Ok(());
            }

            if let Err(e) = self.poll_once() {
                error!("Poll failed: {}", e);
                return Err(e);
            }
            self.stats.log_if_due();

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Poll loop cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
