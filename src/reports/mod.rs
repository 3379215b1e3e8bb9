use askama::Template;
use axum::{debug_handler, extract::State, response::Html};
use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::events::format_event_date;
use crate::sessions::{MaybeUser, SessionUser};
use crate::AppState;

/// A confirmed RSVP for a past event with no attendance record.
#[derive(Debug)]
pub struct NoShowRow {
    pub event_name: String,
    pub event_date: String,
    pub club_name: String,
    pub member_name: String,
    pub email: String,
}

impl NoShowRow {
    pub async fn all(db: &SqlitePool) -> AppResult<Vec<Self>> {
        let rows = sqlx::query(
            r#"
            SELECT
                e.event_name,
                e.event_date,
                c.club_name,
                m.first_name || ' ' || m.last_name AS member_name,
                m.email
            FROM event e
            JOIN club c ON e.club_id = c.club_id
            JOIN rsvp r ON e.event_id = r.event_id
            JOIN member m ON r.member_id = m.member_id
            LEFT JOIN attendance a
                ON a.event_id = e.event_id
                AND a.member_id = m.member_id
            WHERE datetime(e.event_date) < datetime('now')
                AND r.rsvp_status = 'Confirmed'
                AND a.attendance_id IS NULL
            ORDER BY e.event_date, member_name
            "#,
        )
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|row| NoShowRow {
            event_name: row.get("event_name"),
            event_date: format_event_date(row.get("event_date")),
            club_name: row.get("club_name"),
            member_name: row.get("member_name"),
            email: row.get("email"),
        })
        .collect::<Vec<_>>();

        Ok(rows)
    }
}

#[derive(Template)]
#[template(path = "no_show.html")]
pub struct NoShowTemplate {
    pub results: Vec<NoShowRow>,
    pub user: Option<SessionUser>,
}

#[debug_handler]
#[tracing::instrument(skip(state))]
pub async fn no_show_report(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Html<String>> {
    let results = NoShowRow::all(&state.db).await?;

    let template = NoShowTemplate { results, user };
    Ok(Html(template.render()?))
}
