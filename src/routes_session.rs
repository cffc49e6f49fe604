// Sign-in state handed over by the UI after the identity provider's
// redirect. Only the email and the bearer token are kept.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::session::{SessionHolder, UserSession};
use crate::state::AppState;

#[derive(Debug, Serialize, PartialEq)]
pub struct SessionStatus {
    pub signed_in: bool,
    pub email: Option<String>,
}

impl From<Option<UserSession>> for SessionStatus {
    fn from(session: Option<UserSession>) -> Self {
        Self {
            signed_in: session.is_some(),
            email: session.map(|s| s.email),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub access_token: String,
}

fn sign_in(holder: &SessionHolder, input: SignInInput) -> Result<SessionStatus> {
    let email = input.email.trim();
    let token = input.access_token.trim();
    if email.is_empty() || token.is_empty() {
        return Err(AppError::Validation("email and access_token required".to_string()));
    }
    Ok(Some(holder.sign_in(email, token)).into())
}

// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session.current().into())
}

// POST /api/session
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<SignInInput>,
) -> Result<Json<SessionStatus>> {
    let status = sign_in(&state.session, input)?;
    tracing::info!(email = ?status.email, "signed in");
    Ok(Json(status))
}

// DELETE /api/session
pub async fn delete_session(State(state): State<AppState>) -> Json<SessionStatus> {
    if let Some(session) = state.session.sign_out() {
        tracing::info!(email = %session.email, "signed out");
    }
    Json(SessionStatus::from(None::<UserSession>))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_requires_both_fields() {
        let holder = SessionHolder::new();
        let input = SignInInput {
            email: "ada@example.com".into(),
            access_token: "  ".into(),
        };
        assert!(matches!(sign_in(&holder, input), Err(AppError::Validation(_))));
        assert!(holder.current().is_none());
    }

    #[test]
    fn sign_in_reports_email() {
        let holder = SessionHolder::new();
        let input = SignInInput {
            email: " ada@example.com ".into(),
            access_token: "tok".into(),
        };
        let status = sign_in(&holder, input).unwrap();
        assert_eq!(
            status,
            SessionStatus {
                signed_in: true,
                email: Some("ada@example.com".into())
            }
        );
        assert_eq!(holder.access_token().as_deref(), Some("tok"));
    }
}
