use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::America::New_York;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{window, Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::config;

pub const ICS_FILENAME: &str = "n8n-masterclass.ics";
const REMINDER: &str = "Reminder: N8N Masterclass starts in 1 hour";

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
}

fn compact(instant: &DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

fn iso_millis(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// application/x-www-form-urlencoded, spaces as `+`.
fn query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v).replace("%20", "+")))
        .collect::<Vec<_>>()
        .join("&")
}

impl CalendarEvent {
    pub fn masterclass() -> Self {
        Self {
            title: config::COURSE_TITLE.to_string(),
            description: config::COURSE_DESCRIPTION.to_string(),
            start: config::event_start(),
            end: config::event_end(),
            location: Some(config::EVENT_LOCATION.to_string()),
        }
    }

    /// Single-event iCalendar document with a one hour reminder.
    /// `uid_millis` only has to be unique per download.
    pub fn to_ics(&self, uid_millis: i64) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//N8N Masterclass//Event//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}@n8nmasterclass.com", uid_millis),
            format!("DTSTART:{}", compact(&self.start)),
            format!("DTEND:{}", compact(&self.end)),
            format!("SUMMARY:{}", self.title),
            format!("DESCRIPTION:{}", self.description.replace('\n', "\\n")),
        ];
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            lines.push(format!("LOCATION:{}", location));
        }
        lines.extend(
            [
                "STATUS:CONFIRMED",
                "BEGIN:VALARM",
                "TRIGGER:-PT1H",
                "ACTION:DISPLAY",
            ]
            .iter()
            .map(|l| l.to_string()),
        );
        lines.push(format!("DESCRIPTION:{}", REMINDER));
        lines.extend(["END:VALARM", "END:VEVENT", "END:VCALENDAR"].iter().map(|l| l.to_string()));
        lines.join("\r\n")
    }

    pub fn google_calendar_link(&self) -> String {
        let dates = format!("{}/{}", compact(&self.start), compact(&self.end));
        format!(
            "https://calendar.google.com/calendar/render?{}",
            query(&[
                ("action", "TEMPLATE"),
                ("text", &self.title),
                ("dates", &dates),
                ("details", &self.description),
                ("location", self.location.as_deref().unwrap_or("")),
            ])
        )
    }

    pub fn outlook_calendar_link(&self) -> String {
        format!(
            "https://outlook.live.com/calendar/0/deeplink/compose?{}",
            query(&[
                ("subject", &self.title),
                ("startdt", &iso_millis(&self.start)),
                ("enddt", &iso_millis(&self.end)),
                ("body", &self.description),
                ("location", self.location.as_deref().unwrap_or("")),
            ])
        )
    }

    /// "July 24, 2025 • 3:00 PM - 6:00 PM EDT"
    pub fn eastern_label(&self) -> String {
        let start = self.start.with_timezone(&New_York);
        let end = self.end.with_timezone(&New_York);
        format!(
            "{} • {} - {}",
            start.format("%B %-d, %Y"),
            start.format("%-I:%M %p"),
            end.format("%-I:%M %p %Z")
        )
    }
}

/// Hands the event to the browser as an `.ics` download.
pub fn download_ics(event: &CalendarEvent, filename: &str) -> Result<(), JsValue> {
    let ics = event.to_ics(Utc::now().timestamp_millis());
    let parts = Array::of1(&JsValue::from_str(&ics));
    let options = BlobPropertyBag::new();
    options.set_type("text/calendar;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let href = Url::create_object_url_with_blob(&blob)?;

    let document = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(&href);
    link.set_download(filename);
    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Url::revoke_object_url(&href)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(location: Option<&str>) -> CalendarEvent {
        CalendarEvent {
            title: "N8N Automations Masterclass".to_string(),
            description: "Line one\nLine two".to_string(),
            start: DateTime::from_timestamp(1_753_383_600, 0).unwrap(),
            end: DateTime::from_timestamp(1_753_394_400, 0).unwrap(),
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn ics_payload() {
        let ics = event(Some("Online via Zoom")).to_ics(1_700_000_000_000);
        let lines: Vec<&str> = ics.split("\r\n").collect();

        assert_eq!(lines[0], "BEGIN:VCALENDAR");
        assert!(lines.contains(&"UID:1700000000000@n8nmasterclass.com"));
        assert!(lines.contains(&"DTSTART:20250724T190000Z"));
        assert!(lines.contains(&"DTEND:20250724T220000Z"));
        assert!(lines.contains(&"DESCRIPTION:Line one\\nLine two"));
        assert!(lines.contains(&"LOCATION:Online via Zoom"));
        assert!(lines.contains(&"TRIGGER:-PT1H"));
        assert!(lines.contains(&"DESCRIPTION:Reminder: N8N Masterclass starts in 1 hour"));
        assert_eq!(lines.last(), Some(&"END:VCALENDAR"));
        assert!(!ics.contains("\n\n"));
    }

    #[test]
    fn ics_without_location_has_no_location_line() {
        let ics = event(None).to_ics(1);
        assert!(!ics.contains("LOCATION"));
        assert!(!ics.contains("\r\n\r\n"));
    }

    #[test]
    fn google_link() {
        assert_eq!(
            event(Some("Online via Zoom")).google_calendar_link(),
            "https://calendar.google.com/calendar/render?action=TEMPLATE\
             &text=N8N+Automations+Masterclass\
             &dates=20250724T190000Z%2F20250724T220000Z\
             &details=Line+one%0ALine+two\
             &location=Online+via+Zoom"
        );
    }

    #[test]
    fn outlook_link_uses_iso_instants() {
        let link = event(None).outlook_calendar_link();
        assert!(link.starts_with("https://outlook.live.com/calendar/0/deeplink/compose?subject="));
        assert!(link.contains("&startdt=2025-07-24T19%3A00%3A00.000Z"));
        assert!(link.contains("&enddt=2025-07-24T22%3A00%3A00.000Z"));
        assert!(link.ends_with("&location="));
    }

    #[test]
    fn eastern_label_shows_daylight_time() {
        assert_eq!(event(None).eastern_label(), "July 24, 2025 • 3:00 PM - 6:00 PM EDT");
    }
}
