use futures::future;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::models::OrderView;
use crate::components::session::use_collaborators;
use crate::funnel::checkout::{CheckoutOutcome, RedirectUrls};
use crate::funnel::identity::{load_dashboard, DashboardData, DashboardLoad};
use crate::funnel::pricing::Product;
use crate::pages::register::{origin, redirect_to};
use crate::Route;

const RECENT_ORDERS: usize = 5;

fn order_row(order: &OrderView) -> Html {
    let marker = if order.is_paid() { "✓" } else { "…" };
    html! {
        <div class="order-row" key={order.order_id.to_string()}>
            <div>
                <p class="order-amount">{order.formatted_amount()}</p>
                <p class="order-date">{order.formatted_date()}</p>
            </div>
            <div class={classes!("order-status", order.is_paid().then(|| "paid"))}>
                <span>{marker}</span>
                <span class="capitalize">{order.order_status.clone()}</span>
            </div>
        </div>
    }
}

#[function_component]
pub fn Dashboard() -> Html {
    let collaborators = use_collaborators();
    let navigator = use_navigator().unwrap();
    let dashboard = use_state(|| None::<DashboardData>);
    let error = use_state(|| None::<String>);
    let force_update = use_force_update();

    {
        let collaborators = collaborators.clone();
        let dashboard = dashboard.clone();
        let navigator = navigator.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match load_dashboard(collaborators.identity.as_ref(), collaborators.data.as_ref()).await {
                        DashboardLoad::RedirectToSignIn => navigator.push(&Route::Login),
                        DashboardLoad::Ready(data) => dashboard.set(Some(data)),
                    }
                });
                || ()
            },
            (),
        );
    }

    let Some(data) = (*dashboard).clone() else {
        return html! {
            <div class="dashboard-loading">
                <div class="loading-spinner"></div>
                <p>{"Loading dashboard..."}</p>
            </div>
        };
    };

    let on_sign_out = {
        let collaborators = collaborators.clone();
        let navigator = navigator.clone();
        let session = data.session.clone();
        Callback::from(move |_: MouseEvent| {
            let collaborators = collaborators.clone();
            let navigator = navigator.clone();
            let session = session.clone();
            spawn_local(async move {
                if let Err(e) = collaborators.identity.sign_out(&session).await {
                    log::warn!("Sign out request failed: {}", e);
                }
                navigator.push(&Route::Home);
            });
        })
    };

    let purchase = |product: &Product| {
        let collaborators = collaborators.clone();
        let session = data.session.clone();
        let force_update = force_update.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        let price_id = product.price_id;
        Callback::from(move |_: MouseEvent| {
            error.set(None);

            let collaborators = collaborators.clone();
            let session = session.clone();
            let force_update = force_update.clone();
            let error = error.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                let urls = RedirectUrls::for_origin(&origin(), "/dashboard");
                let claimed = force_update.clone();
                let outcome = collaborators
                    .checkout
                    .start_after(Some(&session), price_id, &urls, move |_| {
                        claimed.force_update();
                        future::ready(())
                    })
                    .await;
                force_update.force_update();

                match outcome {
                    CheckoutOutcome::Redirect(url) => redirect_to(&url),
                    CheckoutOutcome::SignInRequired => navigator.push(&Route::Login),
                    CheckoutOutcome::AlreadyInFlight => {}
                    CheckoutOutcome::Failed(message) => error.set(Some(message)),
                }
            });
        })
    };

    let subscription_badge = match &data.subscription {
        Some(subscription) => html! {
            <span class={classes!("status-badge", subscription.status_class())}>
                {subscription.status_label()}
            </span>
        },
        None => html! { <span class="muted">{"No active subscription"}</span> },
    };

    let older_orders = data.orders.len().saturating_sub(RECENT_ORDERS);

    html! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <span class="brand">{"N8N Masterclass"}</span>
                <button class="ghost-button" onclick={on_sign_out}>{"Sign Out"}</button>
            </header>

            <main class="dashboard-content">
                <h1>{"Welcome back!"}</h1>
                <p class="muted">{"Manage your courses and subscription from your dashboard."}</p>

                if let Some(message) = (*error).as_ref() {
                    <div class="message error-message">{message.clone()}</div>
                }

                <div class="dashboard-grid">
                    <div class="dashboard-main">
                        <section class="card">
                            <h2>{"Account Information"}</h2>
                            <p><strong>{"Email: "}</strong>{data.user().email.clone()}</p>
                            <div class="subscription-line">
                                <strong>{"Subscription Status: "}</strong>
                                { subscription_badge }
                            </div>
                        </section>

                        <section class="card">
                            <h2>{"Available Courses"}</h2>
                            <p class="muted">{"Purchase courses to expand your automation skills"}</p>
                            { for Product::catalogue().iter().map(|product| {
                                let busy = collaborators.checkout.in_flight(product.price_id);
                                html! {
                                    <div class="product-card" key={product.id}>
                                        <h3>{product.name}</h3>
                                        <p class="muted">{product.description}</p>
                                        <p class="product-price">{product.display_price()}</p>
                                        <button class="primary-button" disabled={busy} onclick={purchase(product)}>
                                            if busy {
                                                {"Processing..."}
                                            } else {
                                                {"Purchase Course"}
                                            }
                                        </button>
                                    </div>
                                }
                            }) }
                        </section>
                    </div>

                    <aside class="card order-history">
                        <h2>{"Order History"}</h2>
                        if data.orders.is_empty() {
                            <p class="muted">{"No orders yet"}</p>
                        } else {
                            { for data.orders.iter().take(RECENT_ORDERS).map(order_row) }
                            if older_orders > 0 {
                                <p class="muted more-orders">{format!("And {} more orders...", older_orders)}</p>
                            }
                        }
                    </aside>
                </div>
            </main>
        </div>
    }
}
