//! Transient "zoom limit reached" feedback.

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use crate::viewport::{ZoomBounds, ZoomLimit};

/// How long a notice stays visible unless something overwrites it.
pub const DEFAULT_NOTICE_DELAY: Duration = Duration::from_millis(1000);

/// Handle for one raised notice.
///
/// Hosts that clear notices from a timer keep the ticket and hand it back to
/// [`NoticeState::expire`]; a ticket from an older notice never clears a
/// newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeTicket(u64);

impl NoticeTicket {
    /// Generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveNotice {
    limit: ZoomLimit,
    generation: u64,
}

/// Current limit notice plus the generation counter guarding its expiry.
#[derive(Debug, Clone)]
pub struct NoticeState {
    active: Option<ActiveNotice>,
    generation: u64,
    delay: Duration,
}

impl Default for NoticeState {
    fn default() -> Self {
        Self::with_delay(DEFAULT_NOTICE_DELAY)
    }
}

impl NoticeState {
    /// Create an empty notice state with the default delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty notice state with a custom delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            active: None,
            generation: 0,
            delay,
        }
    }

    /// Delay after which a notice clears itself.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Raise a notice, replacing whatever was shown before.
    pub fn raise(&mut self, limit: ZoomLimit) -> NoticeTicket {
        self.generation += 1;
        self.active = Some(ActiveNotice {
            limit,
            generation: self.generation,
        });
        NoticeTicket(self.generation)
    }

    /// Clear the notice unconditionally.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Clear the notice only if it is still the one `ticket` was issued for.
    ///
    /// Returns true when something was cleared.
    pub fn expire(&mut self, ticket: NoticeTicket) -> bool {
        match self.active {
            Some(active) if active.generation == ticket.0 => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Currently shown limit, if any.
    pub fn current(&self) -> Option<ZoomLimit> {
        self.active.map(|active| active.limit)
    }

    /// User-facing text for the current notice.
    pub fn message(&self, bounds: &ZoomBounds) -> Option<String> {
        self.current().map(|limit| notice_message(limit, bounds))
    }
}

/// Pending expiry timers, one per raised notice.
///
/// Frame-driven hosts arm a timer with each ticket and hand whatever is due
/// back to [`NoticeState::expire`]. Timers of overwritten notices still fire
/// but clear nothing.
#[derive(Debug, Clone, Default)]
pub struct NoticeTimers {
    pending: Vec<(NoticeTicket, Instant)>,
}

impl NoticeTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `ticket` to expire at `deadline`.
    pub fn arm(&mut self, ticket: NoticeTicket, deadline: Instant) {
        self.pending.push((ticket, deadline));
    }

    /// Remove and return every ticket whose deadline has passed by `now`,
    /// oldest first.
    pub fn due(&mut self, now: Instant) -> Vec<NoticeTicket> {
        let mut fired = Vec::new();
        self.pending.retain(|&(ticket, deadline)| {
            if deadline <= now {
                fired.push(ticket);
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Text shown for a limit notice, e.g. "Maximum zoom (300%)".
pub fn notice_message(limit: ZoomLimit, bounds: &ZoomBounds) -> String {
    match limit {
        ZoomLimit::Min => format!("Minimum zoom ({}%)", bounds.percent(limit)),
        ZoomLimit::Max => format!("Maximum zoom ({}%)", bounds.percent(limit)),
    }
}
