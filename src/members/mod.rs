mod member;

pub use member::*;

use askama::Template;
use axum::{
    debug_handler,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::sessions::{self, SessionUser};
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub user: Option<SessionUser>,
}

#[derive(Template)]
#[template(path = "member.html")]
pub struct MemberTemplate {
    pub name: String,
    pub email: String,
    pub role: String,
    pub stats: Option<MemberActivity>,
    pub user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
}

#[debug_handler]
pub async fn login_page() -> AppResult<Html<String>> {
    let template = LoginTemplate {
        error: None,
        user: None,
    };
    Ok(Html(template.render()?))
}

/// Identity lookup only: whoever submits a registered email is signed in
/// as that member. A failed lookup is a login-form message, not a 500.
#[debug_handler]
#[tracing::instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let member = match MemberRecord::from_email(&form.email, &state.db).await {
        Ok(member) => member,
        Err(err) => {
            tracing::error!("login lookup failed: {:?}", err);
            let template = LoginTemplate {
                error: Some("Server error during login.".to_string()),
                user: None,
            };
            return Ok(Html(template.render()?).into_response());
        }
    };

    let Some(member) = member else {
        let template = LoginTemplate {
            error: Some("No member found with that email.".to_string()),
            user: None,
        };
        return Ok(Html(template.render()?).into_response());
    };

    let user = member.into_session_user();
    tracing::info!(member_id = user.member_id, "member logged in");

    let key = state.sessions.create(user);
    let cookie = sessions::session_cookie(&key);

    let mut response = Redirect::to("/member").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookie.to_string().parse().unwrap());
    Ok(response)
}

#[debug_handler]
#[tracing::instrument(skip(state, user), fields(member_id = user.member_id))]
pub async fn member_activity(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> AppResult<Html<String>> {
    let stats = MemberActivity::for_member(user.member_id, &state.db).await?;

    let template = MemberTemplate {
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        stats,
        user: Some(user),
    };
    Ok(Html(template.render()?))
}
