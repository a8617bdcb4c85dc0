use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::js_sys::Reflect;
use web_sys::{window, DomException, ShareData};
use yew::prelude::*;
use yew_hooks::prelude::*;
use yew_router::prelude::*;

use crate::funnel::calendar::{download_ics, CalendarEvent, ICS_FILENAME};
use crate::Route;

/// Short order reference shown to the buyer: the tail of the checkout session id.
pub fn order_reference(session_id: &str) -> String {
    let chars: Vec<char> = session_id.chars().collect();
    chars[chars.len().saturating_sub(8)..].iter().collect()
}

fn open_in_new_tab(url: &str) {
    if let Some(window) = window() {
        if let Err(e) = window.open_with_url_and_target(url, "_blank") {
            gloo_console::error!("Could not open calendar link", e);
        }
    }
}

const SHARE_TITLE: &str = "N8N Automations Masterclass";
const SHARE_TEXT: &str = "I just registered for an amazing N8N Automations Masterclass! Join me on July 24th.";

/// Whether a failed share should fall back to copying the link. A share the
/// user dismissed (`AbortError`) is left alone.
pub fn copy_after_share_error(error_name: Option<&str>) -> bool {
    error_name != Some("AbortError")
}

async fn copy_link(window: &web_sys::Window, link: &str) {
    match JsFuture::from(window.navigator().clipboard().write_text(link)).await {
        Ok(_) => {
            let _ = window.alert_with_message("Link copied to clipboard!");
        }
        Err(e) => gloo_console::error!("Could not copy link", e),
    }
}

/// Shares the course link through the browser share sheet, or copies it to
/// the clipboard where sharing is unavailable or fails.
async fn share_course() {
    let Some(window) = window() else {
        return;
    };
    let link = window.location().origin().unwrap_or_default();
    let navigator = window.navigator();

    let can_share = Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false);
    if can_share {
        let data = ShareData::new();
        data.set_title(SHARE_TITLE);
        data.set_text(SHARE_TEXT);
        data.set_url(&link);
        match JsFuture::from(navigator.share_with_data(&data)).await {
            Ok(_) => return,
            Err(e) => {
                let name = e.dyn_ref::<DomException>().map(DomException::name);
                log::info!("Error sharing: {:?}", name);
                if !copy_after_share_error(name.as_deref()) {
                    return;
                }
            }
        }
    }
    copy_link(&window, &link).await;
}

const INCLUDED: [&str; 6] = [
    "3-hour intensive live training",
    "Complete course materials & templates",
    "Full session recording (lifetime access)",
    "Live Q&A with expert instructor",
    "Hands-on exercises & real examples",
    "Private community access",
];

#[function_component]
pub fn Success() -> Html {
    let session_id = use_search_param("session_id".to_string());
    let event = use_memo(|_| CalendarEvent::masterclass(), ());

    let on_google = {
        let event = event.clone();
        Callback::from(move |_: MouseEvent| open_in_new_tab(&event.google_calendar_link()))
    };
    let on_outlook = {
        let event = event.clone();
        Callback::from(move |_: MouseEvent| open_in_new_tab(&event.outlook_calendar_link()))
    };
    let on_download = {
        let event = event.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(e) = download_ics(&event, ICS_FILENAME) {
                gloo_console::error!("Calendar download failed", e);
            }
        })
    };

    let on_share = Callback::from(|_: MouseEvent| spawn_local(share_course()));

    html! {
        <div class="success-page">
            <header class="success-header">
                <span class="brand">{"N8N Masterclass"}</span>
                <Link<Route> to={Route::Dashboard} classes="outline-button">
                    {"Go to Dashboard →"}
                </Link<Route>>
            </header>

            <main class="success-content">
                <div class="celebration">
                    <div class="success-check">{"✓"}</div>
                    <h1>{"🎉 Payment Successful!"}</h1>
                    <p class="lead">{"Welcome to the N8N Automations Masterclass"}</p>
                    <p>{"You're all set for "}<strong>{event.eastern_label()}</strong></p>
                    if let Some(id) = session_id.as_ref().filter(|id| !id.is_empty()) {
                        <p class="muted">{format!("Order ID: {}", order_reference(id))}</p>
                    }
                </div>

                <section class="card">
                    <h2>{"Event Details"}</h2>
                    <div class="detail-grid">
                        <div>
                            <p class="detail-title">{"Date & Time"}</p>
                            <p class="muted">{event.eastern_label()}</p>
                        </div>
                        <div>
                            <p class="detail-title">{"Format"}</p>
                            <p class="muted">{"Live Online Workshop via Zoom"}</p>
                        </div>
                        <div>
                            <p class="detail-title">{"What's Next"}</p>
                            <p class="muted">{"Zoom link sent 24 hours before event"}</p>
                        </div>
                        <div>
                            <p class="detail-title">{"Materials"}</p>
                            <p class="muted">{"Course materials & recording included"}</p>
                        </div>
                    </div>

                    <div class="calendar-actions">
                        <h3>{"Add to Your Calendar"}</h3>
                        <button class="outline-button" onclick={on_google}>{"Google Calendar"}</button>
                        <button class="outline-button" onclick={on_outlook}>{"Outlook"}</button>
                        <button class="outline-button" onclick={on_download}>{"Download .ics"}</button>
                    </div>
                </section>

                <section class="card share-card">
                    <button class="outline-button" onclick={on_share}>{"Share This Course"}</button>
                    <p class="muted">{"Help a colleague level up their automation skills"}</p>
                </section>

                <section class="card">
                    <h2>{"What You'll Get"}</h2>
                    <ul class="included-list">
                        { for INCLUDED.iter().map(|item| html! { <li>{format!("✓ {}", item)}</li> }) }
                    </ul>
                </section>
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_reference_is_the_last_eight_characters() {
        assert_eq!(order_reference("cs_test_a1b2c3d4e5f6g7h8"), "e5f6g7h8");
        assert_eq!(order_reference("short"), "short");
        assert_eq!(order_reference(""), "");
    }

    #[test]
    fn dismissed_share_does_not_copy_the_link() {
        assert!(!copy_after_share_error(Some("AbortError")));
        assert!(copy_after_share_error(Some("NotAllowedError")));
        assert!(copy_after_share_error(None));
    }
}
