//! In-memory collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

use super::models::{
    AuthUser, CheckoutRequest, CheckoutSessionHandle, OrderView, RegistrationRecord, Session,
    SubscriptionView,
};
use super::{ApiError, DataStore, IdentityProvider, PaymentProvider};

pub type CallLog = Rc<RefCell<Vec<&'static str>>>;

pub fn user() -> AuthUser {
    AuthUser {
        id: "user-1".to_string(),
        email: "ada@example.com".to_string(),
    }
}

pub fn session() -> Session {
    Session {
        access_token: "jwt-token".to_string(),
        refresh_token: None,
        user: user(),
    }
}

pub struct FakeIdentity {
    pub session: Option<Session>,
    pub user: Result<AuthUser, ApiError>,
    pub sign_up: Result<Option<Session>, ApiError>,
    pub sign_in: Result<Session, ApiError>,
    pub refresh: Result<Session, ApiError>,
    pub log: CallLog,
}

impl FakeIdentity {
    pub fn signed_in(log: CallLog) -> Self {
        Self {
            session: Some(session()),
            user: Ok(user()),
            sign_up: Ok(Some(session())),
            sign_in: Ok(session()),
            refresh: Err(ApiError::MissingSession),
            log,
        }
    }

    pub fn anonymous(log: CallLog) -> Self {
        Self {
            session: None,
            user: Err(ApiError::MissingSession),
            ..Self::signed_in(log)
        }
    }
}

impl IdentityProvider for FakeIdentity {
    fn stored_session(&self) -> Option<Session> {
        self.log.borrow_mut().push("stored_session");
        self.session.clone()
    }

    fn current_user<'a>(&'a self, _session: &'a Session) -> LocalBoxFuture<'a, Result<AuthUser, ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("current_user");
            self.user.clone()
        })
    }

    fn sign_up<'a>(
        &'a self,
        _email: &'a str,
        _password: &'a str,
    ) -> LocalBoxFuture<'a, Result<Option<Session>, ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("sign_up");
            self.sign_up.clone()
        })
    }

    fn sign_in_with_password<'a>(
        &'a self,
        _email: &'a str,
        _password: &'a str,
    ) -> LocalBoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("sign_in");
            self.sign_in.clone()
        })
    }

    fn sign_out<'a>(&'a self, _session: &'a Session) -> LocalBoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("sign_out");
            Ok(())
        })
    }

    fn refresh_session<'a>(&'a self, _session: &'a Session) -> LocalBoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("refresh_session");
            self.refresh.clone()
        })
    }

    fn clear_session(&self) {
        self.log.borrow_mut().push("clear_session");
    }
}

pub struct FakeData {
    pub subscription: Result<Option<SubscriptionView>, ApiError>,
    pub orders: Result<Vec<OrderView>, ApiError>,
    pub insert: Result<(), ApiError>,
    pub recorded: RefCell<Vec<RegistrationRecord>>,
    pub log: CallLog,
}

impl FakeData {
    pub fn empty(log: CallLog) -> Self {
        Self {
            subscription: Ok(None),
            orders: Ok(Vec::new()),
            insert: Ok(()),
            recorded: RefCell::new(Vec::new()),
            log,
        }
    }
}

impl DataStore for FakeData {
    fn subscription<'a>(
        &'a self,
        _session: &'a Session,
    ) -> LocalBoxFuture<'a, Result<Option<SubscriptionView>, ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("subscription");
            self.subscription.clone()
        })
    }

    fn orders<'a>(&'a self, _session: &'a Session) -> LocalBoxFuture<'a, Result<Vec<OrderView>, ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("orders");
            self.orders.clone()
        })
    }

    fn record_registration<'a>(
        &'a self,
        _session: Option<&'a Session>,
        record: &'a RegistrationRecord,
    ) -> LocalBoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.log.borrow_mut().push("record_registration");
            self.recorded.borrow_mut().push(record.clone());
            self.insert.clone()
        })
    }
}

pub enum Reply {
    Now(Result<CheckoutSessionHandle, ApiError>),
    /// Answers once the paired sender fires.
    Gate(oneshot::Receiver<Result<CheckoutSessionHandle, ApiError>>),
}

pub struct FakePayment {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<CheckoutRequest>>,
    calls: Cell<usize>,
    log: Option<CallLog>,
}

impl FakePayment {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
            calls: Cell::new(0),
            log: None,
        }
    }

    /// Also appends "create_checkout_session" to a log shared with other fakes.
    pub fn logged(replies: Vec<Reply>, log: CallLog) -> Self {
        Self {
            log: Some(log),
            ..Self::new(replies)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.borrow().clone()
    }
}

impl PaymentProvider for FakePayment {
    fn create_checkout_session<'a>(
        &'a self,
        _session: &'a Session,
        request: &'a CheckoutRequest,
    ) -> LocalBoxFuture<'a, Result<CheckoutSessionHandle, ApiError>> {
        Box::pin(async move {
            self.calls.set(self.calls.get() + 1);
            if let Some(log) = &self.log {
                log.borrow_mut().push("create_checkout_session");
            }
            self.requests.borrow_mut().push(request.clone());
            let reply = self.replies.borrow_mut().pop_front();
            match reply {
                Some(Reply::Now(result)) => result,
                Some(Reply::Gate(gate)) => gate
                    .await
                    .unwrap_or_else(|_| Err(ApiError::Network("reply dropped".to_string()))),
                None => Err(ApiError::Network("no reply scripted".to_string())),
            }
        })
    }
}
