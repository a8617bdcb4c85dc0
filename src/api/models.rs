use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::funnel::wizard::FormData;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Browser session as handed out by the identity provider.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SubscriptionView {
    pub subscription_status: String,
    pub price_id: Option<String>,
}

impl SubscriptionView {
    /// `past_due` -> `PAST DUE`
    pub fn status_label(&self) -> String {
        self.subscription_status.replacen('_', " ", 1).to_uppercase()
    }

    pub fn status_class(&self) -> &'static str {
        match self.subscription_status.as_str() {
            "active" => "status-active",
            "trialing" => "status-trialing",
            "past_due" => "status-past-due",
            "canceled" => "status-canceled",
            _ => "status-incomplete",
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct OrderView {
    pub order_id: i64,
    /// Smallest currency unit (cents).
    pub amount_total: i64,
    pub currency: String,
    pub payment_status: String,
    pub order_status: String,
    pub order_date: String,
}

impl OrderView {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    pub fn formatted_amount(&self) -> String {
        format_price(self.amount_total, &self.currency)
    }

    pub fn formatted_date(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.order_date) {
            Ok(date) => date.format("%b %-d, %Y").to_string(),
            Err(_) => self.order_date.clone(),
        }
    }
}

pub fn format_price(amount_cents: i64, currency: &str) -> String {
    let code = currency.to_uppercase();
    let sign = if amount_cents < 0 { "-" } else { "" };
    let cents = amount_cents.unsigned_abs();
    let whole = group_thousands(cents / 100);
    let amount = format!("{}.{:02}", whole, cents % 100);

    match code.as_str() {
        "USD" => format!("{}${}", sign, amount),
        "EUR" => format!("{}€{}", sign, amount),
        "GBP" => format!("{}£{}", sign, amount),
        _ => format!("{}{}\u{a0}{}", sign, code, amount),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
}

/// Row written to the `registrations` table before checkout starts.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RegistrationRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub automation_experience: String,
    pub course_goal: String,
    pub payment_status: PaymentStatus,
}

impl RegistrationRecord {
    pub fn pending(form: &FormData) -> Self {
        let company = form.company.trim();
        Self {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            company: (!company.is_empty()).then(|| company.to_string()),
            automation_experience: form.automation_experience.clone(),
            course_goal: form.course_goal.clone(),
            payment_status: PaymentStatus::Pending,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    Payment,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CheckoutSessionHandle {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
}
