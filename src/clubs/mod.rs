mod club;

pub use club::*;

use askama::Template;
use axum::{debug_handler, extract::State, response::Html};

use crate::error::AppResult;
use crate::sessions::{MaybeUser, SessionUser};
use crate::AppState;

#[derive(Template)]
#[template(path = "clubs.html")]
pub struct ClubsTemplate {
    pub clubs: Vec<ClubSummary>,
    pub user: Option<SessionUser>,
}

#[debug_handler]
#[tracing::instrument(skip(state))]
pub async fn clubs_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Html<String>> {
    let clubs = ClubSummary::all(&state.db).await?;

    let template = ClubsTemplate { clubs, user };
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{create_test_server, seed_club, seed_member, seed_membership};

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn counts_only_active_memberships() {
        let (_server, state) = create_test_server().await;
        let club = seed_club(&state.db, "Chess Club", "Active").await;
        let a = seed_member(&state.db, "Ana", "Lopez", "ana@campus.edu").await;
        let b = seed_member(&state.db, "Ben", "Okafor", "ben@campus.edu").await;
        let c = seed_member(&state.db, "Cleo", "Marsh", "cleo@campus.edu").await;
        seed_membership(&state.db, a, club, "Active").await;
        seed_membership(&state.db, b, club, "Active").await;
        seed_membership(&state.db, c, club, "Lapsed").await;

        let clubs = ClubSummary::all(&state.db).await.unwrap();
        assert_eq!(clubs.len(), 1);
        assert_eq!(clubs[0].club_name, "Chess Club");
        assert_eq!(clubs[0].active_members, 2);
    }

    #[tokio::test]
    async fn clubs_without_members_count_zero() {
        let (_server, state) = create_test_server().await;
        seed_club(&state.db, "Debate Society", "Active").await;

        let clubs = ClubSummary::all(&state.db).await.unwrap();
        assert_eq!(clubs.len(), 1);
        assert_eq!(clubs[0].active_members, 0);
    }

    #[tokio::test]
    async fn busiest_club_sorts_first_then_by_name() {
        let (_server, state) = create_test_server().await;
        let quiet = seed_club(&state.db, "Astronomy Club", "Active").await;
        let busy = seed_club(&state.db, "Robotics Club", "Active").await;
        seed_club(&state.db, "Archery Club", "Active").await;
        let a = seed_member(&state.db, "Ana", "Lopez", "ana@campus.edu").await;
        let b = seed_member(&state.db, "Ben", "Okafor", "ben@campus.edu").await;
        seed_membership(&state.db, a, busy, "Active").await;
        seed_membership(&state.db, b, busy, "Active").await;
        seed_membership(&state.db, a, quiet, "Active").await;

        let clubs = ClubSummary::all(&state.db).await.unwrap();
        let names: Vec<&str> = clubs.iter().map(|c| c.club_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Robotics Club", "Astronomy Club", "Archery Club"]
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn inactive_clubs_are_hidden_from_the_page() {
        let (server, state) = create_test_server().await;
        seed_club(&state.db, "Chess Club", "Active").await;
        seed_club(&state.db, "Dormant Club", "Inactive").await;

        let response = server.get("/clubs").await;
        assert_eq!(response.status_code(), 200);
        let page = response.text();
        assert!(page.contains("Chess Club"));
        assert!(!page.contains("Dormant Club"));
    }
}
