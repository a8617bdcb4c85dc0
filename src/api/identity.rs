use futures::future::LocalBoxFuture;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use web_sys::{window, Storage};

use super::models::{AuthUser, Session};
use super::{status_error, ApiError, IdentityProvider, Project};

const SESSION_KEY: &str = "session";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(AuthUser),
}

fn local_storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok()).flatten()
}

/// GoTrue auth endpoints of the project. The session lives in local storage.
pub struct SupabaseAuth {
    project: Project,
}

impl SupabaseAuth {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    fn store_session(&self, session: &Session) {
        let Some(storage) = local_storage() else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                if storage.set_item(SESSION_KEY, &raw).is_err() {
                    log::warn!("Could not persist session");
                }
            }
            Err(e) => log::warn!("Could not serialize session: {}", e),
        }
    }

    fn origin() -> String {
        window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
}

impl IdentityProvider for SupabaseAuth {
    fn stored_session(&self) -> Option<Session> {
        let raw = local_storage()?.get_item(SESSION_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Dropping unreadable stored session: {}", e);
                self.clear_session();
                None
            }
        }
    }

    fn current_user<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<AuthUser, ApiError>> {
        Box::pin(async move {
            let response = Request::get(&self.project.endpoint("/auth/v1/user"))
                .header("apikey", &self.project.anon_key)
                .header("Authorization", &format!("Bearer {}", session.access_token))
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Session expired").await);
            }
            response
                .json::<AuthUser>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
    }

    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> LocalBoxFuture<'a, Result<Option<Session>, ApiError>> {
        Box::pin(async move {
            let redirect_to = format!("{}/dashboard", Self::origin());
            let url = format!(
                "{}?redirect_to={}",
                self.project.endpoint("/auth/v1/signup"),
                urlencoding::encode(&redirect_to)
            );
            let response = Request::post(&url)
                .header("apikey", &self.project.anon_key)
                .json(&Credentials { email, password })?
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Sign up failed").await);
            }
            match response.json::<SignUpResponse>().await {
                Ok(SignUpResponse::Session(session)) => {
                    self.store_session(&session);
                    Ok(Some(session))
                }
                Ok(SignUpResponse::User(user)) => {
                    log::info!("Account {} created, awaiting confirmation", user.id);
                    Ok(None)
                }
                Err(e) => Err(ApiError::Decode(e.to_string())),
            }
        })
    }

    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> LocalBoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            let url = format!("{}?grant_type=password", self.project.endpoint("/auth/v1/token"));
            let response = Request::post(&url)
                .header("apikey", &self.project.anon_key)
                .json(&Credentials { email, password })?
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Invalid email or password").await);
            }
            let session = response
                .json::<Session>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            self.store_session(&session);
            Ok(session)
        })
    }

    fn sign_out<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            // The local session goes away even if the provider call fails.
            self.clear_session();
            let response = Request::post(&self.project.endpoint("/auth/v1/logout"))
                .header("apikey", &self.project.anon_key)
                .header("Authorization", &format!("Bearer {}", session.access_token))
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Sign out failed").await);
            }
            Ok(())
        })
    }

    fn refresh_session<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            let refresh_token = session.refresh_token.as_deref().ok_or(ApiError::MissingSession)?;
            let url = format!("{}?grant_type=refresh_token", self.project.endpoint("/auth/v1/token"));
            let response = Request::post(&url)
                .header("apikey", &self.project.anon_key)
                .json(&RefreshGrant { refresh_token })?
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Session expired").await);
            }
            let session = response
                .json::<Session>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            self.store_session(&session);
            Ok(session)
        })
    }

    fn clear_session(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_response_distinguishes_session_from_pending_user() {
        let with_session = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": {"id": "u1", "email": "a@b.co"}
        }"#;
        match serde_json::from_str::<SignUpResponse>(with_session).unwrap() {
            SignUpResponse::Session(session) => {
                assert_eq!(session.access_token, "jwt");
                assert_eq!(session.user.email, "a@b.co");
            }
            SignUpResponse::User(_) => panic!("expected a session"),
        }

        let pending = r#"{"id": "u2", "email": "c@d.co", "confirmation_sent_at": "2025-07-01T00:00:00Z"}"#;
        assert!(matches!(
            serde_json::from_str::<SignUpResponse>(pending).unwrap(),
            SignUpResponse::User(user) if user.id == "u2"
        ));
    }
}
