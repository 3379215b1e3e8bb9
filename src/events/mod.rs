mod event;

pub use event::*;
use sqlx::Row;

use askama::Template;
use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use sqlx::SqlitePool;

use crate::clubs::ClubOption;
use crate::error::AppResult;
use crate::sessions::{MaybeUser, SessionUser};
use crate::AppState;

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub events: Vec<EventRow>,
    pub clubs: Vec<ClubOption>,
    pub message: Option<String>,
    pub user: Option<SessionUser>,
}

/// Every event regardless of date or status, earliest first.
async fn load_events(db: &SqlitePool) -> AppResult<Vec<EventRow>> {
    let events = sqlx::query(
        r#"
        SELECT e.event_name, e.event_date, c.club_name,
               e.location, e.capacity, e.event_status
        FROM event e
        JOIN club c ON e.club_id = c.club_id
        ORDER BY e.event_date
        "#,
    )
    .fetch_all(db)
    .await?
    .into_iter()
    .map(|row| EventRow {
        event_name: row.get("event_name"),
        event_date: format_event_date(row.get("event_date")),
        club_name: row.get("club_name"),
        location: row
            .get::<Option<String>, _>("location")
            .unwrap_or_else(|| "-".to_string()),
        capacity: row
            .get::<Option<i64>, _>("capacity")
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string()),
        event_status: row.get("event_status"),
    })
    .collect::<Vec<_>>();

    Ok(events)
}

async fn render_events_page(
    state: &AppState,
    message: Option<String>,
    user: Option<SessionUser>,
) -> AppResult<Html<String>> {
    let events = load_events(&state.db).await?;
    let clubs = ClubOption::all(&state.db).await?;

    let template = EventsTemplate {
        events,
        clubs,
        message,
        user,
    };
    Ok(Html(template.render()?))
}

#[debug_handler]
#[tracing::instrument(skip(state))]
pub async fn events_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Html<String>> {
    render_events_page(&state, None, user).await
}

#[debug_handler]
#[tracing::instrument(skip(state, form))]
pub async fn create_event(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<CreateEventForm>,
) -> AppResult<Response> {
    let event = match form.validate() {
        Ok(event) => event,
        Err(reason) => return Ok((StatusCode::BAD_REQUEST, reason).into_response()),
    };

    let id = sqlx::query!(
        r#"
        INSERT INTO event
            (club_id, event_name, description, event_date, location, capacity, event_type)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING event_id
        "#,
        event.club_id,
        event.event_name,
        event.description,
        event.event_date,
        event.location,
        event.capacity,
        event.event_type
    )
    .fetch_one(&state.db)
    .await?
    .event_id;
    tracing::info!(event_id = id, "event created");

    let page = render_events_page(&state, Some("Event created successfully!".to_string()), user)
        .await?;
    Ok(page.into_response())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{create_test_server, days_from_now, seed_club, seed_event};
    use sqlx::Row;

    fn form_fields(club_id: i64) -> Vec<(&'static str, String)> {
        vec![
            ("club_id", club_id.to_string()),
            ("event_name", "Robotics Showcase".to_string()),
            ("description", "".to_string()),
            ("event_date", "2026-10-02T18:30".to_string()),
            ("location", "".to_string()),
            ("capacity", "".to_string()),
            ("event_type", "".to_string()),
        ]
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn created_event_is_listed_once_with_nulls_for_omitted_fields() {
        let (server, state) = create_test_server().await;
        let club = seed_club(&state.db, "Robotics Club", "Active").await;

        let response = server.post("/events/create").form(&form_fields(club)).await;
        assert_eq!(response.status_code(), 200);
        let page = response.text();
        assert!(page.contains("Event created successfully!"));
        assert_eq!(page.matches("Robotics Showcase").count(), 1);

        let row = sqlx::query(
            r#"
            SELECT description, location, capacity, event_type, event_status
            FROM event
            WHERE event_name = 'Robotics Showcase'
            "#,
        )
        .fetch_one(&state.db)
        .await
        .unwrap();
        assert_eq!(row.get::<Option<String>, _>("description"), None);
        assert_eq!(row.get::<Option<String>, _>("location"), None);
        assert_eq!(row.get::<Option<i64>, _>("capacity"), None);
        assert_eq!(row.get::<Option<String>, _>("event_type"), None);
        assert_eq!(row.get::<String, _>("event_status"), "Scheduled");
    }

    #[tokio::test]
    async fn submitted_fields_are_persisted_verbatim() {
        let (server, state) = create_test_server().await;
        let club = seed_club(&state.db, "Robotics Club", "Active").await;

        let fields = vec![
            ("club_id", club.to_string()),
            ("event_name", "Autumn Build Night".to_string()),
            ("description", "Bring your own kit".to_string()),
            ("event_date", "2026-11-20T19:00".to_string()),
            ("location", "Makerspace B2".to_string()),
            ("capacity", "40".to_string()),
            ("event_type", "Workshop".to_string()),
        ];
        let response = server.post("/events/create").form(&fields).await;
        assert_eq!(response.status_code(), 200);

        let row = sqlx::query(
            r#"
            SELECT club_id, description, location, capacity, event_type
            FROM event
            WHERE event_name = 'Autumn Build Night'
            "#,
        )
        .fetch_one(&state.db)
        .await
        .unwrap();
        assert_eq!(row.get::<i64, _>("club_id"), club);
        assert_eq!(
            row.get::<Option<String>, _>("description"),
            Some("Bring your own kit".to_string())
        );
        assert_eq!(
            row.get::<Option<String>, _>("location"),
            Some("Makerspace B2".to_string())
        );
        assert_eq!(row.get::<Option<i64>, _>("capacity"), Some(40));
        assert_eq!(
            row.get::<Option<String>, _>("event_type"),
            Some("Workshop".to_string())
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn invalid_capacity_is_rejected_without_inserting() {
        let (server, state) = create_test_server().await;
        let club = seed_club(&state.db, "Robotics Club", "Active").await;

        let mut fields = form_fields(club);
        fields[5] = ("capacity", "lots".to_string());
        let response = server.post("/events/create").form(&fields).await;
        assert_eq!(response.status_code(), 400);

        let count = sqlx::query("SELECT COUNT(*) AS n FROM event")
            .fetch_one(&state.db)
            .await
            .unwrap()
            .get::<i64, _>("n");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn missing_event_name_is_rejected() {
        let (server, state) = create_test_server().await;
        let club = seed_club(&state.db, "Robotics Club", "Active").await;

        let mut fields = form_fields(club);
        fields[1] = ("event_name", "".to_string());
        let response = server.post("/events/create").form(&fields).await;
        assert_eq!(response.status_code(), 400);
    }

    #[tokio::test]
    async fn listing_shows_past_and_future_events_with_club_choices() {
        let (server, state) = create_test_server().await;
        let club = seed_club(&state.db, "Film Society", "Active").await;
        seed_event(&state.db, club, "Retro Screening", days_from_now(-10)).await;
        seed_event(&state.db, club, "Premiere Night", days_from_now(10)).await;

        let response = server.get("/events").await;
        assert_eq!(response.status_code(), 200);
        let page = response.text();
        assert!(page.contains("Retro Screening"));
        assert!(page.contains("Premiere Night"));
        // The create form offers every club as a choice.
        assert!(page.contains("<option value=\"1\">Film Society</option>"));
    }
}
