use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::sessions::SessionUser;

/// A member row as the login lookup sees it, with the optional system
/// role attached.
#[derive(Debug)]
pub struct MemberRecord {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub system_role: Option<String>,
}

impl MemberRecord {
    pub async fn from_email(email: &str, db: &SqlitePool) -> AppResult<Option<Self>> {
        let row = sqlx::query(
            r#"
            SELECT m.member_id, m.first_name, m.last_name, m.email, ur.system_role
            FROM member m
            LEFT JOIN user_roles ur ON m.member_id = ur.member_id
            WHERE m.email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(row.map(|row| MemberRecord {
            member_id: row.get("member_id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            system_role: row.get("system_role"),
        }))
    }

    pub fn into_session_user(self) -> SessionUser {
        SessionUser {
            member_id: self.member_id,
            name: format!("{} {}", self.first_name, self.last_name),
            email: self.email,
            role: self.system_role.unwrap_or_else(|| "EndUser".to_string()),
        }
    }
}

/// Aggregate row from `vw_member_activity` for one member.
#[derive(Debug)]
pub struct MemberActivity {
    pub member_name: String,
    pub active_memberships: i64,
    pub confirmed_rsvps: i64,
    pub events_attended: i64,
}

impl MemberActivity {
    pub async fn for_member(member_id: i64, db: &SqlitePool) -> AppResult<Option<Self>> {
        let row = sqlx::query(
            r#"
            SELECT member_name, active_memberships, confirmed_rsvps, events_attended
            FROM vw_member_activity
            WHERE member_id = ?
            "#,
        )
        .bind(member_id)
        .fetch_optional(db)
        .await?;

        Ok(row.map(|row| MemberActivity {
            member_name: row.get("member_name"),
            active_memberships: row.get("active_memberships"),
            confirmed_rsvps: row.get("confirmed_rsvps"),
            events_attended: row.get("events_attended"),
        }))
    }
}
