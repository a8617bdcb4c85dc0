use futures::future::LocalBoxFuture;
use gloo_net::http::Request;

use super::models::{OrderView, RegistrationRecord, Session, SubscriptionView};
use super::{status_error, ApiError, DataStore, Project};

const SUBSCRIPTION_PATH: &str =
    "/rest/v1/stripe_user_subscriptions?select=subscription_status,price_id&limit=1";
const ORDERS_PATH: &str = "/rest/v1/stripe_user_orders\
    ?select=order_id,amount_total,currency,payment_status,order_status,order_date\
    &order=order_date.desc";
const REGISTRATIONS_PATH: &str = "/rest/v1/registrations";

/// Read-only views and the registrations table, served over PostgREST.
/// Rows are scoped to the caller by the provider's row-level policies.
pub struct SupabaseTables {
    project: Project,
}

impl SupabaseTables {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    fn bearer(&self, session: Option<&Session>) -> String {
        let token = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.project.anon_key);
        format!("Bearer {}", token)
    }
}

impl DataStore for SupabaseTables {
    fn subscription<'a>(
        &'a self,
        session: &'a Session,
    ) -> LocalBoxFuture<'a, Result<Option<SubscriptionView>, ApiError>> {
        Box::pin(async move {
            let response = Request::get(&self.project.endpoint(SUBSCRIPTION_PATH))
                .header("apikey", &self.project.anon_key)
                .header("Authorization", &self.bearer(Some(session)))
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Failed to load subscription").await);
            }
            let rows = response
                .json::<Vec<SubscriptionView>>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(rows.into_iter().next())
        })
    }

    fn orders<'a>(&'a self, session: &'a Session) -> LocalBoxFuture<'a, Result<Vec<OrderView>, ApiError>> {
        Box::pin(async move {
            let response = Request::get(&self.project.endpoint(ORDERS_PATH))
                .header("apikey", &self.project.anon_key)
                .header("Authorization", &self.bearer(Some(session)))
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Failed to load orders").await);
            }
            response
                .json::<Vec<OrderView>>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
    }

    fn record_registration<'a>(
        &'a self,
        session: Option<&'a Session>,
        record: &'a RegistrationRecord,
    ) -> LocalBoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let response = Request::post(&self.project.endpoint(REGISTRATIONS_PATH))
                .header("apikey", &self.project.anon_key)
                .header("Authorization", &self.bearer(session))
                .header("Prefer", "return=minimal")
                .json(record)?
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, "Failed to save registration").await);
            }
            Ok(())
        })
    }
}
