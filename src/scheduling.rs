//! Rate-limited redraw scheduling for drag operations.
//!
//! Dragging a block produces a mousemove flood; recomputing every connection
//! path on each event wastes layout reads. `RedrawThrottle` bounds that work
//! to roughly one redraw per interval with last-call-wins semantics: a burst
//! inside the window schedules exactly one trailing redraw, and `flush`
//! (drag end) always produces an immediate redraw with the final positions.
//!
//! The struct is pure - callers feed in timestamps and perform the actual
//! redraw/timer side effects - so the policy is testable without a browser.

/// What the caller should do after asking for a redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleAction {
    /// Redraw immediately.
    FireNow,
    /// Start a one-shot timer for `delay_ms`, tagged with `epoch`; when it
    /// fires, call `timer_fired` with that epoch.
    Schedule { delay_ms: u64, epoch: u32 },
    /// A trailing redraw is already pending; nothing to do.
    AlreadyScheduled,
}

#[derive(Debug)]
pub struct RedrawThrottle {
    interval_ms: u64,
    last_fire_ms: Option<u64>,
    scheduled: bool,
    /// Bumped by `flush` so a timer that was logically cancelled can detect
    /// it went stale (browser timers cannot be revoked from here).
    epoch: u32,
}

impl RedrawThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
            scheduled: false,
            epoch: 0,
        }
    }

    pub fn request(&mut self, now_ms: u64) -> ThrottleAction {
        if self.scheduled {
            return ThrottleAction::AlreadyScheduled;
        }
        match self.last_fire_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.scheduled = true;
                ThrottleAction::Schedule {
                    delay_ms: self.interval_ms - now_ms.saturating_sub(last),
                    epoch: self.epoch,
                }
            }
            _ => {
                self.last_fire_ms = Some(now_ms);
                ThrottleAction::FireNow
            }
        }
    }

    /// Returns true when the timer is still current and the caller should
    /// redraw now.
    pub fn timer_fired(&mut self, now_ms: u64, epoch: u32) -> bool {
        if epoch != self.epoch || !self.scheduled {
            return false;
        }
        self.scheduled = false;
        self.last_fire_ms = Some(now_ms);
        true
    }

    /// Cancel any pending trailing redraw and tell the caller to redraw
    /// immediately. Used on drag end so the final position always lands.
    pub fn flush(&mut self, now_ms: u64) {
        self.scheduled = false;
        self.epoch = self.epoch.wrapping_add(1);
        self.last_fire_ms = Some(now_ms);
    }
}
