use chrono::{DateTime, Utc};
use yew::Callback;

use crate::funnel::subscribers::{SubscriptionId, Subscribers};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_MINUTE: i64 = 60;

/// Time left until the countdown target. All fields are zero once expired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub expired: bool,
}

impl RemainingDuration {
    pub fn expired() -> Self {
        Self {
            expired: true,
            ..Self::default()
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days as i64 * SECONDS_PER_DAY
            + self.hours as i64 * SECONDS_PER_HOUR
            + self.minutes as i64 * SECONDS_PER_MINUTE
            + self.seconds as i64
    }
}

/// Splits `target - now` into whole days, hours, minutes and seconds.
pub fn remaining_until(target: DateTime<Utc>, now: DateTime<Utc>) -> RemainingDuration {
    let delta_ms = (target - now).num_milliseconds();
    if delta_ms <= 0 {
        return RemainingDuration::expired();
    }

    let total = delta_ms / 1000;
    RemainingDuration {
        days: (total / SECONDS_PER_DAY) as u64,
        hours: ((total % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u32,
        minutes: ((total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u32,
        seconds: (total % SECONDS_PER_MINUTE) as u32,
        expired: false,
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CountdownEvent {
    Tick(DateTime<Utc>),
}

/// Ticking countdown towards a fixed instant.
///
/// Each `Tick` recomputes the remaining time until the target has passed,
/// after which the state is frozen and further ticks do no work. The
/// `on_expired` callback is emitted once, on the tick that first observes
/// expiry (which can be the very first one).
pub struct Countdown {
    target: DateTime<Utc>,
    state: RemainingDuration,
    on_expired: Option<Callback<()>>,
    subscribers: Subscribers<RemainingDuration>,
}

impl Countdown {
    pub fn start(target: DateTime<Utc>, now: DateTime<Utc>, on_expired: Option<Callback<()>>) -> Self {
        let state = remaining_until(target, now);
        if state.expired {
            if let Some(on_expired) = &on_expired {
                on_expired.emit(());
            }
        }
        Self {
            target,
            state,
            on_expired,
            subscribers: Subscribers::new(),
        }
    }

    pub fn current_state(&self) -> RemainingDuration {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state.expired
    }

    pub fn subscribe(&mut self, listener: Callback<RemainingDuration>) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    pub fn dispatch(&mut self, event: CountdownEvent) -> RemainingDuration {
        if self.state.expired {
            return self.state;
        }

        let CountdownEvent::Tick(now) = event;
        let next = remaining_until(self.target, now);
        if next == self.state {
            return next;
        }

        self.state = next;
        self.subscribers.notify(&next);
        if next.expired {
            if let Some(on_expired) = &self.on_expired {
                on_expired.emit(());
            }
        }
        next
    }
}
