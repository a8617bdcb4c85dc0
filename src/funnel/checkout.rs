use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future;

use crate::api::models::{
    CheckoutMode, CheckoutRequest, CheckoutSessionHandle, RegistrationRecord, Session,
};
use crate::api::payment::CHECKOUT_FAILED;
use crate::api::{DataStore, PaymentProvider};
use crate::funnel::request::{RequestPhase, RequestState, TrackedRequest};
use crate::funnel::wizard::FormData;

pub const CHECKOUT_START_FAILED: &str = "Failed to start checkout process";

#[derive(Clone, Debug, PartialEq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Success lands on `/success` with the provider filling in the session id.
    pub fn for_origin(origin: &str, cancel_path: &str) -> Self {
        Self {
            success_url: format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", origin),
            cancel_url: format!("{}{}", origin, cancel_path),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CheckoutOutcome {
    /// Send the browser to the hosted checkout page.
    Redirect(String),
    SignInRequired,
    AlreadyInFlight,
    Failed(String),
}

type Requests = RefCell<HashMap<String, TrackedRequest<String, String>>>;

/// Marks a price as in flight for as long as it lives.
struct InFlight<'a> {
    requests: &'a Requests,
    price_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(request) = self.requests.borrow_mut().get_mut(&self.price_id) {
            if request.is_pending() {
                request.reset();
            }
        }
    }
}

/// Starts hosted checkouts, at most one outstanding request per price.
pub struct CheckoutInitiator {
    payment: Rc<dyn PaymentProvider>,
    requests: Requests,
}

impl CheckoutInitiator {
    pub fn new(payment: Rc<dyn PaymentProvider>) -> Self {
        Self {
            payment,
            requests: RefCell::new(HashMap::new()),
        }
    }

    pub fn in_flight(&self, price_id: &str) -> bool {
        self.requests
            .borrow()
            .get(price_id)
            .map_or(false, |r| r.is_pending())
    }

    pub fn request_state(&self, price_id: &str) -> RequestState<String, String> {
        self.requests
            .borrow()
            .get(price_id)
            .map(|r| r.state())
            .unwrap_or_default()
    }

    pub fn history(&self, price_id: &str) -> Vec<RequestPhase> {
        self.requests
            .borrow()
            .get(price_id)
            .map(|r| r.history().to_vec())
            .unwrap_or_else(|| vec![RequestPhase::Idle])
    }

    fn acquire(&self, price_id: &str) -> Option<InFlight<'_>> {
        let mut requests = self.requests.borrow_mut();
        let request = requests.entry(price_id.to_string()).or_default();
        if request.is_pending() {
            return None;
        }
        request.begin();
        Some(InFlight {
            requests: &self.requests,
            price_id: price_id.to_string(),
        })
    }

    fn settle(&self, price_id: &str, result: Result<String, String>) -> CheckoutOutcome {
        let mut requests = self.requests.borrow_mut();
        let request = requests.entry(price_id.to_string()).or_default();
        match result {
            Ok(url) => {
                request.succeed(url.clone());
                CheckoutOutcome::Redirect(url)
            }
            Err(message) => {
                request.fail(message.clone());
                CheckoutOutcome::Failed(message)
            }
        }
    }

    /// Asks the payment provider for a checkout session for `price_id`.
    ///
    /// Without a session nothing is sent and the caller should route to
    /// sign-in. The in-flight mark is cleared on every exit, including when
    /// this future is dropped before the provider answers.
    pub async fn start(
        &self,
        session: Option<&Session>,
        price_id: &str,
        urls: &RedirectUrls,
    ) -> CheckoutOutcome {
        self.start_after(session, price_id, urls, |_| future::ready(())).await
    }

    /// Same as [`start`](Self::start), with `prepare` run once the price is
    /// claimed and before the provider is asked. Calls turned away as
    /// signed out or already in flight never run it.
    pub async fn start_after<'s, F, Fut>(
        &self,
        session: Option<&'s Session>,
        price_id: &str,
        urls: &RedirectUrls,
        prepare: F,
    ) -> CheckoutOutcome
    where
        F: FnOnce(&'s Session) -> Fut,
        Fut: Future<Output = ()>,
    {
        let Some(session) = session else {
            log::info!("Checkout for {} needs a signed-in user", price_id);
            return CheckoutOutcome::SignInRequired;
        };

        let Some(_in_flight) = self.acquire(price_id) else {
            log::debug!("Checkout for {} already in flight", price_id);
            return CheckoutOutcome::AlreadyInFlight;
        };

        prepare(session).await;

        let request = CheckoutRequest {
            price_id: price_id.to_string(),
            mode: CheckoutMode::Payment,
            success_url: urls.success_url.clone(),
            cancel_url: urls.cancel_url.clone(),
        };

        let result = match self.payment.create_checkout_session(session, &request).await {
            Ok(CheckoutSessionHandle { url: Some(url), .. }) => Ok(url),
            Ok(_) => {
                log::error!("Checkout session for {} came back without a URL", price_id);
                Err(CHECKOUT_FAILED.to_string())
            }
            Err(e) => {
                log::error!("Purchase error: {}", e);
                Err(e.user_message(CHECKOUT_START_FAILED))
            }
        };

        self.settle(price_id, result)
    }
}

/// Saves the submitted form as a pending registration, then starts checkout
/// for it. The row is written only for a signed-in visitor whose price is not
/// already in flight. A failed insert is logged and checkout still proceeds.
pub async fn register_and_checkout(
    checkout: &CheckoutInitiator,
    data: &dyn DataStore,
    session: Option<&Session>,
    form: &FormData,
    price_id: &str,
    urls: &RedirectUrls,
) -> CheckoutOutcome {
    let record = RegistrationRecord::pending(form);
    checkout
        .start_after(session, price_id, urls, |session| async move {
            if let Err(e) = data.record_registration(Some(session), &record).await {
                log::error!("Saving registration failed: {}", e);
            }
        })
        .await
}
