use chrono::NaiveDateTime;
use serde::Deserialize;

pub fn format_event_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

/// One row of the events listing, formatted for display.
#[derive(Debug)]
pub struct EventRow {
    pub event_name: String,
    pub event_date: String,
    pub club_name: String,
    pub location: String,
    pub capacity: String,
    pub event_status: String,
}

/// Raw form submission. Everything arrives as text; `validate` turns it
/// into a typed insert or a user-facing rejection.
#[derive(Debug, Deserialize)]
pub struct CreateEventForm {
    #[serde(default)]
    pub club_id: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub event_type: String,
}

#[derive(Debug)]
pub struct NewEvent {
    pub club_id: i64,
    pub event_name: String,
    pub description: Option<String>,
    pub event_date: NaiveDateTime,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub event_type: Option<String>,
}

impl CreateEventForm {
    /// Checks required fields and field types before anything reaches the
    /// database; empty optional fields become NULL.
    pub fn validate(self) -> Result<NewEvent, String> {
        let club_id = self
            .club_id
            .trim()
            .parse::<i64>()
            .map_err(|_| "A club must be selected".to_string())?;

        let event_name = self.event_name.trim().to_string();
        if event_name.is_empty() {
            return Err("Event name is required".to_string());
        }

        let event_date = parse_event_date(self.event_date.trim())
            .ok_or_else(|| "Event date must be a valid date and time".to_string())?;

        let capacity = match self.capacity.trim() {
            "" => None,
            raw => Some(
                raw.parse::<i64>()
                    .map_err(|_| "Capacity must be a number".to_string())?,
            ),
        };

        Ok(NewEvent {
            club_id,
            event_name,
            description: optional(self.description),
            event_date,
            location: optional(self.location),
            capacity,
            event_type: optional(self.event_type),
        })
    }
}

fn optional(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts the browser's datetime-local format, with or without seconds.
fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
