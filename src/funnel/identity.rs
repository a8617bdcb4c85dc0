use crate::api::models::{AuthUser, OrderView, Session, SubscriptionView};
use crate::api::{ApiError, DataStore, IdentityProvider};

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Resolution still running. Nothing user-specific may render yet.
    Pending,
    Authenticated(Session),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::Authenticated(session) => Some(&session.user),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// How a page treats a visitor without a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateMode {
    /// Show the guest variant.
    Soft,
    /// Send them to sign in.
    Hard,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GateOutcome {
    Waiting,
    Guest,
    SignedIn(AuthUser),
    RedirectToSignIn,
}

pub fn gate(mode: GateMode, state: &SessionState) -> GateOutcome {
    match (state, mode) {
        (SessionState::Pending, _) => GateOutcome::Waiting,
        (SessionState::Authenticated(session), _) => GateOutcome::SignedIn(session.user.clone()),
        (SessionState::Anonymous, GateMode::Soft) => GateOutcome::Guest,
        (SessionState::Anonymous, GateMode::Hard) => GateOutcome::RedirectToSignIn,
    }
}

/// Confirms the stored session with the identity provider. A session the
/// provider rejects is refreshed once; if that fails too it is cleared from
/// the browser. Other errors count as no session but leave storage alone.
pub async fn resolve(identity: &dyn IdentityProvider) -> SessionState {
    let Some(mut session) = identity.stored_session() else {
        return SessionState::Anonymous;
    };
    match identity.current_user(&session).await {
        Ok(user) => {
            session.user = user;
            SessionState::Authenticated(session)
        }
        Err(ApiError::Status { status: 401 | 403, message }) => {
            log::info!("Stored session rejected: {}", message);
            match identity.refresh_session(&session).await {
                Ok(refreshed) => SessionState::Authenticated(refreshed),
                Err(e) => {
                    log::info!("Could not refresh session: {}", e);
                    identity.clear_session();
                    SessionState::Anonymous
                }
            }
        }
        Err(e) => {
            log::error!("Error checking user: {}", e);
            SessionState::Anonymous
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardData {
    pub session: Session,
    pub subscription: Option<SubscriptionView>,
    pub orders: Vec<OrderView>,
}

impl DashboardData {
    pub fn user(&self) -> &AuthUser {
        &self.session.user
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DashboardLoad {
    RedirectToSignIn,
    Ready(DashboardData),
}

/// Resolves the session, then fetches the account views. The views are never
/// requested for an anonymous visitor, and a failing view degrades to empty.
pub async fn load_dashboard(identity: &dyn IdentityProvider, data: &dyn DataStore) -> DashboardLoad {
    let session = match resolve(identity).await {
        SessionState::Authenticated(session) => session,
        _ => return DashboardLoad::RedirectToSignIn,
    };

    let subscription = data.subscription(&session).await.unwrap_or_else(|e| {
        log::error!("Error fetching subscription: {}", e);
        None
    });
    let orders = data.orders(&session).await.unwrap_or_else(|e| {
        log::error!("Error fetching orders: {}", e);
        Vec::new()
    });

    DashboardLoad::Ready(DashboardData {
        session,
        subscription,
        orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fakes::{session, user, CallLog, FakeData, FakeIdentity};
    use futures::executor::block_on;

    fn log() -> CallLog {
        CallLog::default()
    }

    #[test]
    fn pending_never_looks_signed_in() {
        assert_eq!(gate(GateMode::Soft, &SessionState::Pending), GateOutcome::Waiting);
        assert_eq!(gate(GateMode::Hard, &SessionState::Pending), GateOutcome::Waiting);
        assert_eq!(SessionState::Pending.user(), None);
    }

    #[test]
    fn anonymous_is_guest_or_redirect_by_mode() {
        assert_eq!(gate(GateMode::Soft, &SessionState::Anonymous), GateOutcome::Guest);
        assert_eq!(gate(GateMode::Hard, &SessionState::Anonymous), GateOutcome::RedirectToSignIn);

        let signed_in = SessionState::Authenticated(session());
        assert_eq!(gate(GateMode::Hard, &signed_in), GateOutcome::SignedIn(user()));
    }

    #[test]
    fn resolve_confirms_stored_session() {
        let calls = log();
        let identity = FakeIdentity::signed_in(calls.clone());

        let state = block_on(resolve(&identity));

        assert_eq!(state.user(), Some(&user()));
        assert_eq!(*calls.borrow(), vec!["stored_session", "current_user"]);
    }

    #[test]
    fn resolve_without_stored_session_skips_the_network() {
        let calls = log();
        let identity = FakeIdentity::anonymous(calls.clone());

        assert_eq!(block_on(resolve(&identity)), SessionState::Anonymous);
        assert_eq!(*calls.borrow(), vec!["stored_session"]);
    }

    #[test]
    fn transient_error_counts_as_anonymous_and_keeps_the_session() {
        let calls = log();
        let identity = FakeIdentity {
            user: Err(ApiError::Network("Failed to fetch".to_string())),
            ..FakeIdentity::signed_in(calls.clone())
        };

        assert_eq!(block_on(resolve(&identity)), SessionState::Anonymous);
        assert_eq!(*calls.borrow(), vec!["stored_session", "current_user"]);
    }

    #[test]
    fn rejected_session_is_cleared_when_refresh_fails() {
        let calls = log();
        let identity = FakeIdentity {
            user: Err(ApiError::Status {
                status: 401,
                message: "JWT expired".to_string(),
            }),
            refresh: Err(ApiError::Status {
                status: 400,
                message: "Invalid Refresh Token".to_string(),
            }),
            ..FakeIdentity::signed_in(calls.clone())
        };

        assert_eq!(block_on(resolve(&identity)), SessionState::Anonymous);
        assert_eq!(
            *calls.borrow(),
            vec!["stored_session", "current_user", "refresh_session", "clear_session"]
        );
    }

    #[test]
    fn rejected_session_is_replaced_by_a_refreshed_one() {
        let calls = log();
        let refreshed = Session {
            access_token: "fresh-jwt".to_string(),
            ..session()
        };
        let identity = FakeIdentity {
            user: Err(ApiError::Status {
                status: 401,
                message: "JWT expired".to_string(),
            }),
            refresh: Ok(refreshed.clone()),
            ..FakeIdentity::signed_in(calls.clone())
        };

        assert_eq!(block_on(resolve(&identity)), SessionState::Authenticated(refreshed));
        assert!(!calls.borrow().contains(&"clear_session"));
    }

    #[test]
    fn dashboard_fetches_only_after_session_resolves() {
        let calls = log();
        let identity = FakeIdentity::signed_in(calls.clone());
        let data = FakeData::empty(calls.clone());

        let load = block_on(load_dashboard(&identity, &data));

        assert!(matches!(load, DashboardLoad::Ready(ref d) if d.user().email == "ada@example.com"));
        assert_eq!(
            *calls.borrow(),
            vec!["stored_session", "current_user", "subscription", "orders"]
        );
    }

    #[test]
    fn anonymous_dashboard_redirects_without_fetching() {
        let calls = log();
        let identity = FakeIdentity::anonymous(calls.clone());
        let data = FakeData::empty(calls.clone());

        assert_eq!(block_on(load_dashboard(&identity, &data)), DashboardLoad::RedirectToSignIn);
        assert!(!calls.borrow().contains(&"subscription"));
        assert!(!calls.borrow().contains(&"orders"));
    }

    #[test]
    fn failing_views_degrade_to_empty() {
        let calls = log();
        let identity = FakeIdentity::signed_in(calls.clone());
        let data = FakeData {
            subscription: Err(ApiError::Network("offline".to_string())),
            orders: Err(ApiError::Decode("bad json".to_string())),
            ..FakeData::empty(calls)
        };

        match block_on(load_dashboard(&identity, &data)) {
            DashboardLoad::Ready(d) => {
                assert_eq!(d.subscription, None);
                assert!(d.orders.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
