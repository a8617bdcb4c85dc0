use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::funnel::countdown::{remaining_until, Countdown, CountdownEvent, RemainingDuration};
use crate::funnel::pricing::{EARLY_BIRD_PRICE, EARLY_BIRD_SAVINGS, STANDARD_PRICE};

/// Remaining time to `target`, refreshed every second while mounted.
/// `on_expired` fires once when the target passes (or straight away if it
/// already has).
#[hook]
pub fn use_countdown(target: DateTime<Utc>, on_expired: Option<Callback<()>>) -> RemainingDuration {
    let remaining = use_state(|| remaining_until(target, Utc::now()));

    {
        let remaining = remaining.clone();
        use_effect_with_deps(
            move |target| {
                let countdown = Rc::new(RefCell::new(Countdown::start(*target, Utc::now(), on_expired)));
                let interval_handle: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
                remaining.set(countdown.borrow().current_state());

                if !countdown.borrow().is_expired() {
                    countdown
                        .borrow_mut()
                        .subscribe(Callback::from(move |left| remaining.set(left)));

                    let handle = interval_handle.clone();
                    let interval = Interval::new(1_000, move || {
                        let left = countdown.borrow_mut().dispatch(CountdownEvent::Tick(Utc::now()));
                        if left.expired {
                            // An interval can't be dropped from inside its own tick.
                            if let Some(interval) = handle.borrow_mut().take() {
                                spawn_local(async move { drop(interval) });
                            }
                        }
                    });
                    *interval_handle.borrow_mut() = Some(interval);
                }

                move || {
                    if let Some(interval) = interval_handle.borrow_mut().take() {
                        drop(interval);
                    }
                }
            },
            target,
        );
    }

    *remaining
}

#[derive(Properties, PartialEq)]
pub struct CountdownTimerProps {
    pub remaining: RemainingDuration,
}

#[function_component]
pub fn CountdownTimer(props: &CountdownTimerProps) -> Html {
    let left = props.remaining;

    let unit = |value: String, label: &'static str| {
        html! {
            <div class="countdown-unit">
                <div class="countdown-value">{value}</div>
                <div class="countdown-label">{label}</div>
            </div>
        }
    };

    html! {
        <div class="countdown-timer">
            <h3>{"⚡ Price Increases Soon!"}</h3>
            <p>{format!("Save ${} - Early bird pricing ends in:", EARLY_BIRD_SAVINGS)}</p>
            if !left.expired {
                <div class="countdown-units">
                    { unit(left.days.to_string(), "Days") }
                    <span class="countdown-separator">{":"}</span>
                    { unit(left.hours.to_string(), "Hours") }
                    <span class="countdown-separator">{":"}</span>
                    { unit(left.minutes.to_string(), "Min") }
                    <span class="countdown-separator">{":"}</span>
                    { unit(left.seconds.to_string(), "Sec") }
                </div>
            } else {
                <div class="countdown-expired">
                    <div class="countdown-expired-title">{"Price Increased!"}</div>
                    <div>{format!("Now ${} (was ${})", STANDARD_PRICE, EARLY_BIRD_PRICE)}</div>
                </div>
            }
            <p class="countdown-footnote">
                {
                    if left.expired {
                        "Regular pricing now in effect".to_string()
                    } else {
                        format!("${} → ${} when timer reaches zero", EARLY_BIRD_PRICE, STANDARD_PRICE)
                    }
                }
            </p>
        </div>
    }
}
