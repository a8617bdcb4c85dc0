use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::countdown_timer::{use_countdown, CountdownTimer};
use crate::components::registration_form::RegistrationForm;
use crate::components::session::{use_collaborators, use_session};
use crate::config;
use crate::funnel::checkout::{register_and_checkout, CheckoutOutcome, RedirectUrls};
use crate::funnel::pricing::{self, Product};
use crate::funnel::wizard::FormData;
use crate::Route;

pub(crate) fn origin() -> String {
    window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

pub(crate) fn redirect_to(url: &str) {
    if let Some(window) = window() {
        if window.location().set_href(url).is_err() {
            log::error!("Could not navigate to {}", url);
        }
    }
}

#[function_component]
pub fn Registration() -> Html {
    let collaborators = use_collaborators();
    let session = use_session();
    let navigator = use_navigator().unwrap();
    let remaining = use_countdown(config::countdown_target(), None);
    let tier = pricing::tier(remaining.expired);
    let processing = use_state(|| false);
    let error = use_state(|| None::<String>);

    let on_submit = {
        let collaborators = collaborators.clone();
        let session = session.session().cloned();
        let processing = processing.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |form: FormData| {
            let collaborators = collaborators.clone();
            let session = session.clone();
            let processing = processing.clone();
            let error = error.clone();
            let navigator = navigator.clone();
            let product = Product::for_tier(tier);

            processing.set(true);
            error.set(None);
            spawn_local(async move {
                let urls = RedirectUrls::for_origin(&origin(), "/register");
                let outcome = register_and_checkout(
                    &collaborators.checkout,
                    collaborators.data.as_ref(),
                    session.as_ref(),
                    &form,
                    product.price_id,
                    &urls,
                )
                .await;

                match outcome {
                    // The earlier submit still owns the button state.
                    CheckoutOutcome::AlreadyInFlight => {}
                    CheckoutOutcome::Redirect(url) => {
                        processing.set(false);
                        redirect_to(&url);
                    }
                    CheckoutOutcome::SignInRequired => {
                        processing.set(false);
                        navigator.push(&Route::Login);
                    }
                    CheckoutOutcome::Failed(message) => {
                        processing.set(false);
                        error.set(Some(message));
                    }
                }
            });
        })
    };

    html! {
        <div class="register-page">
            <div class="register-header">
                <h1>{"Reserve Your Seat"}</h1>
                <p>{"N8N Automations Masterclass • Live online"}</p>
            </div>
            if !remaining.expired {
                <div class="countdown-wrapper">
                    <CountdownTimer remaining={remaining} />
                </div>
            }
            if let Some(message) = (*error).as_ref() {
                <div class="message error-message">{message.clone()}</div>
            }
            <RegistrationForm {on_submit} {tier} is_loading={*processing} />
        </div>
    }
}
