//! Per-minute call tracking
//!
//! The provider grants a fixed number of calls per minute. `RateTracker`
//! learns that quota once, counts calls against the current wall-clock minute,
//! and sleeps until the minute changes when the quota runs out.
//!
//! Windows are aligned to wall-clock minute boundaries, not to a rolling
//! 60-second window, so a wait may last anywhere up to just under a minute.

use crate::error::{Error, Result};
use crate::metabase::RateLimit;
use crate::pagination::PageSource;
use chrono::Timelike;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Unit of the rate limit entry that drives the tracker
pub const MINUTE_UNIT: &str = "MINUTE";

/// Default interval between minute checks while waiting for a new window
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Clocks
// ============================================================================

/// Source of the current minute-of-hour (0-59)
pub trait Clock: Send + Sync {
    /// Current minute of the hour
    fn current_minute(&self) -> u32;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_minute(&self) -> u32 {
        chrono::Local::now().minute()
    }
}

/// Settable clock; clones share the same minute
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    minute: Arc<AtomicU32>,
}

impl ManualClock {
    /// Create a clock stopped at `minute`
    pub fn new(minute: u32) -> Self {
        Self {
            minute: Arc::new(AtomicU32::new(minute % 60)),
        }
    }

    /// Set the current minute
    pub fn set_minute(&self, minute: u32) {
        self.minute.store(minute % 60, Ordering::SeqCst);
    }

    /// Move to the next minute, wrapping at the hour
    pub fn advance(&self) {
        let next = (self.minute.load(Ordering::SeqCst) + 1) % 60;
        self.minute.store(next, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn current_minute(&self) -> u32 {
        self.minute.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Rate Tracker
// ============================================================================

/// Minute-window call counter
#[derive(Debug)]
pub struct RateTracker<C: Clock = SystemClock> {
    clock: C,
    /// Calls allowed per minute
    quota: u32,
    /// Calls left in the current window
    calls_remaining: u32,
    /// Minute the current window started in
    window_start: u32,
    poll_interval: Duration,
}

impl<C: Clock> RateTracker<C> {
    /// Create a tracker with a known quota. The window starts now, full.
    pub fn new(quota: u32, clock: C) -> Result<Self> {
        if quota == 0 {
            return Err(Error::rate_lookup("per-minute limit is zero"));
        }
        let window_start = clock.current_minute();
        Ok(Self {
            clock,
            quota,
            calls_remaining: quota,
            window_start,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Create a tracker from the provider's rate limit entries
    ///
    /// Uses the entry whose unit is `MINUTE`; if several match, the last wins.
    pub fn from_rate_limits(limits: &[RateLimit], clock: C) -> Result<Self> {
        let limit = limits
            .iter()
            .rev()
            .find(|rate| rate.unit.eq_ignore_ascii_case(MINUTE_UNIT))
            .ok_or_else(|| Error::rate_lookup("no per-minute rate limit returned"))?;

        let quota = u32::try_from(limit.limit).map_err(|_| {
            Error::rate_lookup(format!("unusable per-minute limit: {}", limit.limit))
        })?;
        Self::new(quota, clock)
    }

    /// Ask the provider for its rate limits once and build a tracker
    #[instrument(level = "debug", skip_all, err)]
    pub async fn initialize<S>(source: &S, api_key: &str, clock: C) -> Result<Self>
    where
        S: PageSource + ?Sized,
    {
        let limits = source.rate_limits(api_key).await.map_err(|e| match e {
            Error::RateLookup { .. } => e,
            other => Error::rate_lookup(other.to_string()),
        })?;
        let tracker = Self::from_rate_limits(&limits, clock)?;
        debug!(quota = tracker.quota, "Rate tracker initialized");
        Ok(tracker)
    }

    /// Set how often the minute is re-checked while waiting
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Account for one call, waiting for a new window first if the quota is spent
    ///
    /// Returns the calls left in the (possibly new) window.
    pub async fn consume_slot(&mut self) -> u32 {
        let current_minute = self.clock.current_minute();
        if current_minute == self.window_start {
            self.calls_remaining = self.calls_remaining.saturating_sub(1);
        } else {
            self.calls_remaining = self.quota - 1;
            self.window_start = current_minute;
        }

        if self.calls_remaining < 1 {
            self.wait_for_new_window().await;
        }
        self.calls_remaining
    }

    /// Sleep until the minute differs from the window start, then open a new window
    pub async fn wait_for_new_window(&mut self) {
        let mut current_minute = self.clock.current_minute();
        info!(
            current_minute,
            quota = self.quota,
            "Per-minute quota spent, waiting for a new minute"
        );
        while current_minute == self.window_start {
            tokio::time::sleep(self.poll_interval).await;
            current_minute = self.clock.current_minute();
        }
        self.window_start = current_minute;
        self.calls_remaining = self.quota - 1;
        debug!(window_start = current_minute, "New rate window opened");
    }

    /// Calls allowed per minute
    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Calls left in the current window
    pub fn calls_remaining(&self) -> u32 {
        self.calls_remaining
    }

    /// Minute the current window started in
    pub fn window_start(&self) -> u32 {
        self.window_start
    }
}
