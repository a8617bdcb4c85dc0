use chrono::{DateTime, Utc};

#[cfg(debug_assertions)]
pub fn supabase_url() -> &'static str {
    option_env!("SUPABASE_URL").unwrap_or("http://localhost:54321") // supabase start
}

#[cfg(not(debug_assertions))]
pub fn supabase_url() -> &'static str {
    option_env!("SUPABASE_URL").unwrap_or("")
}

#[cfg(debug_assertions)]
pub fn supabase_anon_key() -> &'static str {
    option_env!("SUPABASE_ANON_KEY").unwrap_or("local-anon-key")
}

#[cfg(not(debug_assertions))]
pub fn supabase_anon_key() -> &'static str {
    option_env!("SUPABASE_ANON_KEY").unwrap_or("")
}

pub fn early_bird_price_id() -> &'static str {
    option_env!("STRIPE_EARLY_BIRD_PRICE_ID").unwrap_or("price_early_bird_297")
}

pub fn standard_price_id() -> &'static str {
    option_env!("STRIPE_STANDARD_PRICE_ID").unwrap_or("price_standard_397")
}

/// Early-bird cutoff: 2025-07-20 23:59:59 US Eastern (EDT).
const COUNTDOWN_TARGET_UNIX: i64 = 1_753_070_399;
/// Live session: 2025-07-24 19:00 to 22:00 UTC (3 PM to 6 PM EDT).
const EVENT_START_UNIX: i64 = 1_753_383_600;
const EVENT_END_UNIX: i64 = 1_753_394_400;

pub const COURSE_TITLE: &str = "N8N Automations Masterclass";
pub const COURSE_DESCRIPTION: &str = "Join us for an intensive 3-hour session covering:
- N8N Fundamentals & Setup
- Advanced Workflows & Integrations
- AI Agent Creation & Deployment

Zoom link and materials will be sent 24 hours before the event.

Questions? Contact support@n8nmasterclass.com";
pub const EVENT_LOCATION: &str = "Online via Zoom";

pub fn countdown_target() -> DateTime<Utc> {
    DateTime::from_timestamp(COUNTDOWN_TARGET_UNIX, 0).unwrap_or_default()
}

pub fn event_start() -> DateTime<Utc> {
    DateTime::from_timestamp(EVENT_START_UNIX, 0).unwrap_or_default()
}

pub fn event_end() -> DateTime<Utc> {
    DateTime::from_timestamp(EVENT_END_UNIX, 0).unwrap_or_default()
}
