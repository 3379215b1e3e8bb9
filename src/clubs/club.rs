use sqlx::{Row, SqlitePool};

use crate::error::AppResult;

/// Minimal club row for selection controls.
#[derive(Debug)]
pub struct ClubOption {
    pub club_id: i64,
    pub club_name: String,
}

impl ClubOption {
    pub async fn all(db: &SqlitePool) -> AppResult<Vec<Self>> {
        let clubs = sqlx::query_as!(
            ClubOption,
            r#"
            SELECT club_id AS "club_id!", club_name
            FROM club
            ORDER BY club_name
            "#
        )
        .fetch_all(db)
        .await?;

        Ok(clubs)
    }
}

/// One row of the public clubs listing: an active club and how many
/// members it currently has.
#[derive(Debug)]
pub struct ClubSummary {
    pub club_name: String,
    pub category: String,
    pub meeting_schedule: String,
    pub active_members: i64,
}

impl ClubSummary {
    /// Active clubs with their active-membership counts, busiest club
    /// first, ties broken by name.
    pub async fn all(db: &SqlitePool) -> AppResult<Vec<Self>> {
        let clubs = sqlx::query(
            r#"
            SELECT
                c.club_name,
                c.category,
                c.meeting_schedule,
                COUNT(ms.member_id) AS active_members
            FROM club c
            LEFT JOIN membership ms
                ON c.club_id = ms.club_id
                AND ms.membership_status = 'Active'
            WHERE c.club_status = 'Active'
            GROUP BY c.club_id
            ORDER BY active_members DESC, c.club_name
            "#,
        )
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|row| ClubSummary {
            club_name: row.get("club_name"),
            category: row
                .get::<Option<String>, _>("category")
                .unwrap_or_else(|| "-".to_string()),
            meeting_schedule: row
                .get::<Option<String>, _>("meeting_schedule")
                .unwrap_or_else(|| "-".to_string()),
            active_members: row.get("active_members"),
        })
        .collect::<Vec<_>>();

        Ok(clubs)
    }
}
