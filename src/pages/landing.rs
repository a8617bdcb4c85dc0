use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::countdown_timer::{use_countdown, CountdownTimer};
use crate::components::session::use_session;
use crate::config;
use crate::funnel::calendar::CalendarEvent;
use crate::funnel::identity::{gate, GateMode, GateOutcome};
use crate::funnel::pricing::{self, EARLY_BIRD_SAVINGS, STANDARD_PRICE};
use crate::Route;

const MODULES: &[(&str, &str, &str, [&str; 4])] = &[
    (
        "Module 1",
        "Foundation",
        "N8N Fundamentals & Setup",
        [
            "N8N installation and configuration",
            "Understanding nodes and connections",
            "Building your first automation",
            "Best practices and debugging",
        ],
    ),
    (
        "Module 2",
        "Advanced",
        "Advanced Workflows & Integrations",
        [
            "Complex workflow design patterns",
            "API integrations and webhooks",
            "Data transformation and manipulation",
            "Error handling and monitoring",
        ],
    ),
    (
        "Module 3",
        "AI Agents",
        "AI Agent Creation & Deployment",
        [
            "Building intelligent automation agents",
            "LLM integration and prompt engineering",
            "Decision trees and conditional logic",
            "Production deployment strategies",
        ],
    ),
];

#[function_component]
pub fn Landing() -> Html {
    let session = use_session();
    let on_expired = use_callback(|_: (), _: &()| log::info!("Early-bird pricing has ended"), ());
    let remaining = use_countdown(config::countdown_target(), Some(on_expired));
    let price = pricing::price(remaining.expired);
    let event = CalendarEvent::masterclass();

    let call_to_action = match gate(GateMode::Soft, &session) {
        GateOutcome::Waiting => html! {
            <div class="cta-placeholder"></div>
        },
        GateOutcome::SignedIn(user) => html! {
            <>
                <p class="welcome-back">{format!("Welcome back, {}", user.email)}</p>
                <Link<Route> to={Route::Register} classes="cta-button">
                    {format!("Register Now - ${}", price)}
                </Link<Route>>
                <Link<Route> to={Route::Dashboard} classes="cta-secondary">
                    {"Go to Dashboard →"}
                </Link<Route>>
            </>
        },
        GateOutcome::Guest | GateOutcome::RedirectToSignIn => html! {
            <>
                <Link<Route> to={Route::Signup} classes="cta-button">
                    {format!("Get Started - ${} →", price)}
                </Link<Route>>
                <Link<Route> to={Route::Login} classes="cta-secondary">
                    {"Already have an account? Sign In"}
                </Link<Route>>
            </>
        },
    };

    html! {
        <div class="landing-page">
            <section class="hero">
                <span class="event-badge">{format!("📅 {}", event.eastern_label())}</span>
                <h1>
                    {"Master N8N Automations in "}
                    <span class="highlight">{"One Intensive Session"}</span>
                </h1>
                <p class="hero-subtitle">
                    {"From Beginner to Advanced + AI Agent Creation. Join automation professionals \
                      who've transformed their workflows with N8N."}
                </p>

                <div class="countdown-wrapper">
                    <CountdownTimer remaining={remaining} />
                </div>

                <div class="cta-group">
                    { call_to_action }
                </div>
                <div class="cta-notes">
                    if !remaining.expired {
                        <p class="savings">{format!("💰 Save ${} with Early Bird Pricing", EARLY_BIRD_SAVINGS)}</p>
                    }
                    <p>{"Limited to 50 participants • Secure payment via Stripe"}</p>
                </div>
            </section>

            <section class="curriculum">
                <h2>{"What You'll Master in 3 Hours"}</h2>
                <p>{"A comprehensive curriculum designed to take you from N8N beginner to advanced practitioner"}</p>
                <div class="module-grid">
                    { for MODULES.iter().map(|(number, level, title, topics)| html! {
                        <div class="module-card">
                            <h3>{*number}</h3>
                            <p class="module-level">{*level}</p>
                            <h4>{*title}</h4>
                            <ul>
                                { for topics.iter().map(|topic| html! { <li>{format!("✓ {}", topic)}</li> }) }
                            </ul>
                        </div>
                    }) }
                </div>
            </section>

            <section class="final-cta">
                <h2>{"Don't Miss This Opportunity"}</h2>
                <p>
                    {"Join the most comprehensive N8N training available. Limited to 50 participants \
                      for personalized feedback and Q&A."}
                </p>
                <div class="price-card">
                    <span class="price-now">{format!("${}", price)}</span>
                    if !remaining.expired {
                        <span class="price-was">{format!("${}", STANDARD_PRICE)}</span>
                    }
                    <p>{pricing::tier(remaining.expired).label()}</p>
                </div>
            </section>
        </div>
    }
}
