use askama::Template;
use axum::{debug_handler, extract::State, response::Html};
use chrono::{NaiveDateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::events::format_event_date;
use crate::sessions::{MaybeUser, SessionUser};
use crate::AppState;

/// A future event as shown on the landing page.
#[derive(Debug)]
pub struct UpcomingEvent {
    pub event_name: String,
    pub event_date: String,
    pub club_name: String,
    pub location: String,
    pub capacity: String,
}

#[derive(Debug)]
pub struct CampusStat {
    pub stat_name: String,
    pub stat_value: i64,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct DashboardTemplate {
    pub events: Vec<UpcomingEvent>,
    pub stats: Vec<CampusStat>,
    pub user: Option<SessionUser>,
}

/// The next ten events after `now`, earliest first.
pub async fn upcoming_events(db: &SqlitePool, now: NaiveDateTime) -> AppResult<Vec<UpcomingEvent>> {
    let events = sqlx::query(
        r#"
        SELECT e.event_name, e.event_date, c.club_name, e.location, e.capacity
        FROM event e
        JOIN club c ON e.club_id = c.club_id
        WHERE e.event_date > ?
        ORDER BY e.event_date
        LIMIT 10
        "#,
    )
    .bind(now)
    .fetch_all(db)
    .await?
    .into_iter()
    .map(|row| UpcomingEvent {
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
    })
    .collect::<Vec<_>>();

    Ok(events)
}

/// Reads the campus-stats view. Callers decide whether a failure here is
/// fatal; the dashboard treats it as a degraded page, not an error.
pub async fn campus_stats(db: &SqlitePool) -> anyhow::Result<Vec<CampusStat>> {
    let stats = sqlx::query("SELECT stat_name, stat_value FROM vw_campus_stats")
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|row| CampusStat {
            stat_name: row.get("stat_name"),
            stat_value: row.get("stat_value"),
        })
        .collect::<Vec<_>>();

    Ok(stats)
}

#[debug_handler]
#[tracing::instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Html<String>> {
    let now = Utc::now().naive_utc();
    let events = upcoming_events(&state.db, now).await?;

    let stats = match campus_stats(&state.db).await {
        Ok(stats) => stats,
        Err(err) => {
            tracing::warn!("campus stats unavailable: {:#}", err);
            Vec::new()
        }
    };

    let template = DashboardTemplate {
        events,
        stats,
        user,
    };
    Ok(Html(template.render()?))
}
