use futures::future::LocalBoxFuture;
use gloo_net::http::Request;

use super::models::{CheckoutRequest, CheckoutSessionHandle, Session};
use super::{status_error, ApiError, PaymentProvider, Project};

pub const CHECKOUT_FAILED: &str = "Failed to create checkout session";

/// The `stripe-checkout` edge function. It owns the Stripe secret; we only
/// ever see the hosted checkout URL it hands back.
pub struct CheckoutFunction {
    project: Project,
}

impl CheckoutFunction {
    pub fn new(project: Project) -> Self {
        Self { project }
    }
}

impl PaymentProvider for CheckoutFunction {
    fn create_checkout_session<'a>(
        &'a self,
        session: &'a Session,
        request: &'a CheckoutRequest,
    ) -> LocalBoxFuture<'a, Result<CheckoutSessionHandle, ApiError>> {
        Box::pin(async move {
            log::info!("Creating checkout session for price {}", request.price_id);
            let response = Request::post(&self.project.endpoint("/functions/v1/stripe-checkout"))
                .header("Authorization", &format!("Bearer {}", session.access_token))
                .json(request)?
                .send()
                .await?;

            if !response.ok() {
                return Err(status_error(response, CHECKOUT_FAILED).await);
            }
            response
                .json::<CheckoutSessionHandle>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
    }
}
