use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

mod config;
mod api;
mod funnel {
    pub mod calendar;
    pub mod checkout;
    pub mod countdown;
    pub mod identity;
    pub mod pricing;
    pub mod request;
    pub mod subscribers;
    pub mod wizard;
}
mod components {
    pub mod countdown_timer;
    pub mod registration_form;
    pub mod session;
}
mod pages {
    pub mod dashboard;
    pub mod landing;
    pub mod register;
    pub mod success;
}
mod auth {
    pub mod signup;
}

use api::Collaborators;
use auth::signup::{login::Login, register::SignUp};
use components::session::{use_collaborators, use_session_with};
use funnel::identity::SessionState;
use pages::{
    dashboard::Dashboard,
    landing::Landing,
    register::Registration,
    success::Success,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/register")]
    Register,
    #[at("/auth/signup")]
    Signup,
    #[at("/auth/login")]
    Login,
    #[at("/dashboard")]
    Dashboard,
    #[at("/success")]
    Success,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Landing /> }
        },
        Route::Register => {
            info!("Rendering Register page");
            html! { <Registration /> }
        },
        Route::Signup => {
            info!("Rendering Signup page");
            html! { <SignUp /> }
        },
        Route::Login => {
            info!("Rendering Login page");
            html! { <Login /> }
        },
        Route::Dashboard => {
            info!("Rendering Dashboard page");
            html! { <Dashboard /> }
        },
        Route::Success => {
            info!("Rendering Success page");
            html! { <Success /> }
        },
        Route::NotFound => {
            info!("Unknown route, showing Home page");
            html! { <Landing /> }
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub logged_in: bool,
    pub on_logout: Callback<()>,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let NavProps { logged_in, on_logout } = props;
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();
            let scroll_callback = {
                let window = window.clone();
                Closure::wrap(Box::new(move || {
                    let scroll_y = window.as_ref().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0);
                    is_scrolled.set(scroll_y > 80.0);
                }) as Box<dyn FnMut()>)
            };

            if let Some(window) = &window {
                let _ = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
            }

            move || {
                if let Some(window) = &window {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
        })
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"⚡ N8N Masterclass"}
                </Link<Route>>

                <button class="burger-menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    <div onclick={close_menu.clone()}>
                        <Link<Route> to={Route::Register} classes="nav-link">
                            {"Register"}
                        </Link<Route>>
                    </div>
                    {
                        if *logged_in {
                            html! {
                                <>
                                    <div onclick={close_menu.clone()}>
                                        <Link<Route> to={Route::Dashboard} classes="nav-link">
                                            {"Dashboard"}
                                        </Link<Route>>
                                    </div>
                                    <button onclick={
                                        let close = close_menu.clone();
                                        let logout = on_logout.clone();
                                        Callback::from(move |e: MouseEvent| {
                                            close.emit(e);
                                            logout.emit(());
                                        })
                                    } class="nav-logout-button">
                                        {"Sign Out"}
                                    </button>
                                </>
                            }
                        } else {
                            html! {
                                <>
                                    <div onclick={close_menu.clone()}>
                                        <Link<Route> to={Route::Login} classes="nav-link">
                                            {"Sign In"}
                                        </Link<Route>>
                                    </div>
                                    <div onclick={close_menu.clone()}>
                                        <Link<Route> to={Route::Signup} classes="nav-login-button">
                                            {"Sign Up"}
                                        </Link<Route>>
                                    </div>
                                </>
                            }
                        }
                    }
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn Shell() -> Html {
    let collaborators = use_collaborators();
    // Resolve again on navigation so the nav follows sign-in and sign-out.
    let route = use_route::<Route>();
    let session = use_session_with(route);
    let logged_in = matches!(session, SessionState::Authenticated(_));

    let handle_logout = {
        let collaborators = collaborators.clone();
        let session = session.session().cloned();
        Callback::from(move |_| {
            let collaborators = collaborators.clone();
            let session = session.clone();
            spawn_local(async move {
                if let Some(session) = session {
                    if let Err(e) = collaborators.identity.sign_out(&session).await {
                        log::warn!("Sign out request failed: {}", e);
                    }
                }
                // Reload to drop any per-page user state
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/");
                }
            });
        })
    };

    html! {
        <>
            <Nav {logged_in} on_logout={handle_logout} />
            <Switch<Route> render={switch} />
        </>
    }
}

#[function_component]
fn App() -> Html {
    let collaborators = use_memo(|_| Collaborators::from_config(), ());

    html! {
        <ContextProvider<Collaborators> context={(*collaborators).clone()}>
            <BrowserRouter>
                <Shell />
            </BrowserRouter>
        </ContextProvider<Collaborators>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
