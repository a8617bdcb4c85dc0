use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Local checks run before the sign-up form talks to the identity provider.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("Passwords do not match")]
    ConfirmationMismatch,
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },
}

pub fn check_passwords(password: &str, confirmation: &str) -> Result<(), SignupError> {
    if password != confirmation {
        return Err(SignupError::ConfirmationMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SignupError::TooShort {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

const AUTH_STYLE: &str = r#".auth-container {
    background: rgba(30, 30, 30, 0.7);
    border: 1px solid rgba(30, 144, 255, 0.1);
    border-radius: 16px;
    padding: 3rem;
    width: 100%;
    max-width: 480px;
    box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
}
.auth-container h1 {
    font-size: 2rem;
    margin-bottom: 1.5rem;
    text-align: center;
}
.auth-container form {
    display: flex;
    flex-direction: column;
    gap: 1rem;
}
.auth-container input {
    padding: 0.8rem;
    border-radius: 8px;
    border: 1px solid rgba(255, 255, 255, 0.2);
    background: rgba(0, 0, 0, 0.3);
    color: #fff;
}
.auth-container .auth-footer {
    text-align: center;
    font-size: 0.9rem;
    margin-top: 1.5rem;
}
.loading-spinner {
    display: inline-block;
    width: 20px;
    height: 20px;
    border: 3px solid rgba(255,255,255,.3);
    border-radius: 50%;
    border-top-color: #fff;
    animation: spin 1s ease-in-out infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
@media (max-width: 768px) {
    .auth-container {
        padding: 2rem;
        margin: 1rem;
    }
}"#;

pub mod register {
    use gloo_timers::callback::Timeout;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::HtmlInputElement;
    use yew::prelude::*;
    use yew_router::prelude::*;

    use super::{check_passwords, AUTH_STYLE, UNEXPECTED_ERROR};
    use crate::components::session::use_collaborators;
    use crate::Route;

    #[function_component]
    pub fn SignUp() -> Html {
        let collaborators = use_collaborators();
        let navigator = use_navigator().unwrap();
        let email = use_state(String::new);
        let password = use_state(String::new);
        let confirm_password = use_state(String::new);
        let error = use_state(|| None::<String>);
        let created = use_state(|| false);
        let is_loading = use_state(|| false);

        let bind = |state: &UseStateHandle<String>| {
            let state = state.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                state.set(input.value());
            })
        };

        let onsubmit = {
            let email = email.clone();
            let password = password.clone();
            let confirm_password = confirm_password.clone();
            let error = error.clone();
            let created = created.clone();
            let is_loading = is_loading.clone();
            Callback::from(move |e: SubmitEvent| {
                e.prevent_default();
                error.set(None);

                if let Err(e) = check_passwords(&password, &confirm_password) {
                    error.set(Some(e.to_string()));
                    return;
                }

                let collaborators = collaborators.clone();
                let navigator = navigator.clone();
                let email = (*email).clone();
                let password = (*password).clone();
                let error = error.clone();
                let created = created.clone();
                let is_loading = is_loading.clone();
                is_loading.set(true);

                spawn_local(async move {
                    match collaborators.identity.sign_up(email.trim(), &password).await {
                        Ok(session) => {
                            log::info!("Account created, signed in: {}", session.is_some());
                            created.set(true);
                            Timeout::new(2_000, move || navigator.push(&Route::Dashboard)).forget();
                        }
                        Err(e) => {
                            log::error!("Sign up failed: {}", e);
                            error.set(Some(e.user_message(UNEXPECTED_ERROR)));
                        }
                    }
                    is_loading.set(false);
                });
            })
        };

        html! {
            <div class="auth-page">
                <style>{AUTH_STYLE}</style>
                <div class="auth-container">
                    if *created {
                        <h1>{"Account Created!"}</h1>
                        <p class="message success-message">
                            {"Your account is ready. Taking you to your dashboard..."}
                        </p>
                    } else {
                        <h1>{"Create Your Account"}</h1>
                        if let Some(message) = (*error).as_ref() {
                            <div class="message error-message">{message.clone()}</div>
                        }
                        <form {onsubmit}>
                            <input type="email" placeholder="Email"
                                value={(*email).clone()} oninput={bind(&email)} required=true />
                            <input type="password" placeholder="Password"
                                value={(*password).clone()} oninput={bind(&password)} required=true />
                            <input type="password" placeholder="Confirm password"
                                value={(*confirm_password).clone()} oninput={bind(&confirm_password)} required=true />
                            <button type="submit" class="primary-button" disabled={*is_loading}>
                                if *is_loading {
                                    <span class="loading-spinner"></span>
                                } else {
                                    {"Create Account"}
                                }
                            </button>
                        </form>
                        <p class="auth-footer">
                            {"Already have an account? "}
                            <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>>
                        </p>
                    }
                </div>
            </div>
        }
    }
}

pub mod login {
    use wasm_bindgen_futures::spawn_local;
    use web_sys::HtmlInputElement;
    use yew::prelude::*;
    use yew_router::prelude::*;

    use super::{AUTH_STYLE, UNEXPECTED_ERROR};
    use crate::components::session::use_collaborators;
    use crate::Route;

    #[function_component]
    pub fn Login() -> Html {
        let collaborators = use_collaborators();
        let navigator = use_navigator().unwrap();
        let email = use_state(String::new);
        let password = use_state(String::new);
        let error = use_state(|| None::<String>);
        let is_loading = use_state(|| false);

        let bind = |state: &UseStateHandle<String>| {
            let state = state.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                state.set(input.value());
            })
        };

        let onsubmit = {
            let email = email.clone();
            let password = password.clone();
            let error = error.clone();
            let is_loading = is_loading.clone();
            Callback::from(move |e: SubmitEvent| {
                e.prevent_default();
                let collaborators = collaborators.clone();
                let navigator = navigator.clone();
                let email = (*email).clone();
                let password = (*password).clone();
                let error = error.clone();
                let is_loading = is_loading.clone();
                error.set(None);
                is_loading.set(true);

                spawn_local(async move {
                    match collaborators
                        .identity
                        .sign_in_with_password(email.trim(), &password)
                        .await
                    {
                        Ok(session) => {
                            log::info!("Signed in as {}", session.user.email);
                            is_loading.set(false);
                            navigator.push(&Route::Dashboard);
                        }
                        Err(e) => {
                            log::error!("Sign in failed: {}", e);
                            error.set(Some(e.user_message(UNEXPECTED_ERROR)));
                            is_loading.set(false);
                        }
                    }
                });
            })
        };

        html! {
            <div class="auth-page">
                <style>{AUTH_STYLE}</style>
                <div class="auth-container">
                    <h1>{"Sign In"}</h1>
                    if let Some(message) = (*error).as_ref() {
                        <div class="message error-message">{message.clone()}</div>
                    }
                    <form {onsubmit}>
                        <input type="email" placeholder="Email"
                            value={(*email).clone()} oninput={bind(&email)} required=true />
                        <input type="password" placeholder="Password"
                            value={(*password).clone()} oninput={bind(&password)} required=true />
                        <button type="submit" class="primary-button" disabled={*is_loading}>
                            if *is_loading {
                                <span class="loading-spinner"></span>
                            } else {
                                {"Sign In"}
                            }
                        </button>
                    </form>
                    <p class="auth-footer">
                        {"New here? "}
                        <Link<Route> to={Route::Signup}>{"Create an account"}</Link<Route>>
                    </p>
                </div>
            </div>
        }
    }
}
