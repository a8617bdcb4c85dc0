//! Clients for the managed services the funnel talks to.
//!
//! Identity, data and payment each sit behind a trait so pages only ever see
//! a `Collaborators` handle, built once in `main` and shared through a Yew
//! context. The HTTP implementations speak to a Supabase project (GoTrue auth,
//! PostgREST tables and the `stripe-checkout` edge function).

pub mod data;
#[cfg(test)]
pub mod fakes;
pub mod identity;
pub mod models;
pub mod payment;

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use gloo_net::http::Response;
use serde::Deserialize;
use thiserror::Error;

use crate::config;
use crate::funnel::checkout::CheckoutInitiator;
use models::{
    AuthUser, CheckoutRequest, CheckoutSessionHandle, OrderView, RegistrationRecord, Session,
    SubscriptionView,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Not signed in")]
    MissingSession,
}

impl ApiError {
    /// Message to show inline. Provider-supplied messages win, anything else
    /// collapses into `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Pulls the human-readable message out of an error payload. The services
/// disagree on the field name, so every known one is tried.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_description.or(b.msg).or(b.message).or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub(crate) async fn status_error(response: Response, fallback: &str) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status {
        status,
        message: error_message(&body, fallback),
    }
}

/// Base URL and public key of the managed project.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub url: String,
    pub anon_key: String,
}

impl Project {
    pub fn from_config() -> Self {
        Self {
            url: config::supabase_url().trim_end_matches('/').to_string(),
            anon_key: config::supabase_anon_key().to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

pub trait IdentityProvider {
    /// Session persisted in this browser, if any. Does not hit the network.
    fn stored_session(&self) -> Option<Session>;

    fn current_user<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<AuthUser, ApiError>>;

    /// Creates the account. Returns the new session when the provider signs
    /// the user in straight away, `None` when it waits for email confirmation.
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> LocalBoxFuture<'a, Result<Option<Session>, ApiError>>;

    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> LocalBoxFuture<'a, Result<Session, ApiError>>;

    fn sign_out<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<(), ApiError>>;

    /// Trades the session's refresh token for a new session and stores it.
    fn refresh_session<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<Session, ApiError>>;

    /// Forgets the session persisted in this browser.
    fn clear_session(&self);
}

pub trait DataStore {
    fn subscription<'a>(
        &'a self,
        session: &'a Session,
    ) -> LocalBoxFuture<'a, Result<Option<SubscriptionView>, ApiError>>;

    /// Newest first.
    fn orders<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<Vec<OrderView>, ApiError>>;

    fn record_registration<'a>(
        &'a self,
        session: Option<&'a Session>,
        record: &'a RegistrationRecord,
    ) -> LocalBoxFuture<'a, Result<(), ApiError>>;
}

pub trait PaymentProvider {
    fn create_checkout_session<'a>(
        &'a self,
        session: &'a Session,
        request: &'a CheckoutRequest,
    ) -> LocalBoxFuture<'a, Result<CheckoutSessionHandle, ApiError>>;
}

/// Everything the pages need to reach the outside world.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Rc<dyn IdentityProvider>,
    pub data: Rc<dyn DataStore>,
    pub checkout: Rc<CheckoutInitiator>,
}

impl Collaborators {
    pub fn new(
        identity: Rc<dyn IdentityProvider>,
        data: Rc<dyn DataStore>,
        payment: Rc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            identity,
            data,
            checkout: Rc::new(CheckoutInitiator::new(payment)),
        }
    }

    pub fn from_config() -> Self {
        let project = Project::from_config();
        Self::new(
            Rc::new(identity::SupabaseAuth::new(project.clone())),
            Rc::new(data::SupabaseTables::new(project.clone())),
            Rc::new(payment::CheckoutFunction::new(project)),
        )
    }
}

impl PartialEq for Collaborators {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.identity, &other.identity)
            && Rc::ptr_eq(&self.data, &other.data)
            && Rc::ptr_eq(&self.checkout, &other.checkout)
    }
}
