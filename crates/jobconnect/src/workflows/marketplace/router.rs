use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Actor, InvitationId, InvitationReply, NotificationId, UserId, UserRole};
use super::invitations::{InvitationDraft, InvitationError, InvitationService};
use super::matching::{CandidateSearch, SearchCriteria, SearchError};
use super::notifications::{NotificationError, NotificationService};
use super::profiles::{JobSeekerSubmission, ProfileError, ProfileService, RecruiterSubmission};
use super::repository::RepositoryError;

/// Service bundle handed to the router as axum state.
#[derive(Clone)]
pub struct MarketplaceState {
    pub profiles: Arc<ProfileService>,
    pub search: Arc<CandidateSearch>,
    pub invitations: Arc<InvitationService>,
    pub notifications: Arc<NotificationService>,
}

/// Router builder exposing the marketplace workflow over HTTP.
pub fn marketplace_router(state: MarketplaceState) -> Router {
    Router::new()
        .route(
            "/api/v1/profiles/job-seeker",
            post(create_job_seeker_handler).put(update_job_seeker_handler),
        )
        .route(
            "/api/v1/profiles/recruiter",
            post(create_recruiter_handler).put(update_recruiter_handler),
        )
        .route("/api/v1/dashboard", get(dashboard_handler))
        .route("/api/v1/candidates/search", post(search_handler))
        .route(
            "/api/v1/invitations",
            post(create_invitation_handler).get(list_invitations_handler),
        )
        .route(
            "/api/v1/invitations/:invitation_id/respond",
            post(respond_invitation_handler),
        )
        .route("/api/v1/notifications", get(notifications_handler))
        .route(
            "/api/v1/notifications/read-all",
            post(mark_all_read_handler),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_read_handler),
        )
        .route(
            "/api/v1/notifications/:notification_id",
            delete(delete_notification_handler),
        )
        .with_state(state)
}

/// The acting identity, carried on `x-user-id` / `x-user-role` headers by
/// the authenticating front door. The workflow itself never reads ambient
/// session state.
#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| unauthorized("missing x-user-id header"))?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
            .and_then(UserRole::parse)
            .ok_or_else(|| unauthorized("missing or invalid x-user-role header"))?;

        Ok(Actor {
            user_id: UserId(user_id.to_string()),
            role,
        })
    }
}

fn unauthorized(detail: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": detail })),
    )
        .into_response()
}

pub(crate) async fn create_job_seeker_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Json(submission): Json<JobSeekerSubmission>,
) -> Response {
    match state.profiles.create_job_seeker(&actor, submission) {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(err) => profile_error_response(err),
    }
}

pub(crate) async fn update_job_seeker_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Json(submission): Json<JobSeekerSubmission>,
) -> Response {
    match state.profiles.update_job_seeker(&actor, submission) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => profile_error_response(err),
    }
}

pub(crate) async fn create_recruiter_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Json(submission): Json<RecruiterSubmission>,
) -> Response {
    match state.profiles.create_recruiter(&actor, submission) {
        Ok((profile, company)) => (
            StatusCode::CREATED,
            Json(json!({ "profile": profile, "company": company })),
        )
            .into_response(),
        Err(err) => profile_error_response(err),
    }
}

pub(crate) async fn update_recruiter_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Json(submission): Json<RecruiterSubmission>,
) -> Response {
    match state.profiles.update_recruiter(&actor, submission) {
        Ok((profile, company)) => (
            StatusCode::OK,
            Json(json!({ "profile": profile, "company": company })),
        )
            .into_response(),
        Err(err) => profile_error_response(err),
    }
}

/// A missing profile is a signal to route to profile creation, so the
/// dashboard answers 200 with a null profile rather than 404.
pub(crate) async fn dashboard_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
) -> Response {
    let profile = match state.profiles.profile_of(&actor) {
        Ok(profile) => profile,
        Err(err) => return profile_error_response(err),
    };

    let Some(profile) = profile else {
        return (
            StatusCode::OK,
            Json(json!({
                "role": actor.role.label(),
                "profile": serde_json::Value::Null,
            })),
        )
            .into_response();
    };

    match state.invitations.dashboard(&actor) {
        Ok(dashboard) => (
            StatusCode::OK,
            Json(json!({
                "role": actor.role.label(),
                "profile": profile,
                "stats": dashboard.stats,
                "invitations": dashboard.invitations,
            })),
        )
            .into_response(),
        Err(err) => invitation_error_response(err),
    }
}

pub(crate) async fn search_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Json(criteria): Json<SearchCriteria>,
) -> Response {
    if actor.role != UserRole::Recruiter {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "only recruiters can search candidates" })),
        )
            .into_response();
    }

    match state.search.search(&criteria) {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(SearchError::Criteria(err)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(SearchError::Repository(err)) => repository_error_response(err),
    }
}

pub(crate) async fn create_invitation_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Json(draft): Json<InvitationDraft>,
) -> Response {
    match state.invitations.create(&actor, draft) {
        Ok(invitation) => (StatusCode::CREATED, Json(invitation)).into_response(),
        Err(err) => invitation_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RespondRequest {
    reply: InvitationReply,
}

pub(crate) async fn respond_invitation_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Path(invitation_id): Path<String>,
    Json(request): Json<RespondRequest>,
) -> Response {
    let id = InvitationId(invitation_id);
    match state.invitations.respond(&actor, &id, request.reply) {
        Ok(invitation) => (StatusCode::OK, Json(invitation)).into_response(),
        Err(err) => invitation_error_response(err),
    }
}

pub(crate) async fn list_invitations_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
) -> Response {
    match state.invitations.dashboard(&actor) {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(err) => invitation_error_response(err),
    }
}

pub(crate) async fn notifications_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
) -> Response {
    match state.notifications.recent(&actor) {
        Ok(notifications) => (StatusCode::OK, Json(notifications)).into_response(),
        Err(err) => notification_error_response(err),
    }
}

pub(crate) async fn mark_read_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Path(notification_id): Path<String>,
) -> Response {
    let id = NotificationId(notification_id);
    match state.notifications.mark_read(&actor, &id) {
        Ok(notification) => (StatusCode::OK, Json(notification)).into_response(),
        Err(err) => notification_error_response(err),
    }
}

pub(crate) async fn mark_all_read_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
) -> Response {
    match state.notifications.mark_all_read(&actor) {
        Ok(updated) => (StatusCode::OK, Json(json!({ "updated": updated }))).into_response(),
        Err(err) => notification_error_response(err),
    }
}

pub(crate) async fn delete_notification_handler(
    State(state): State<MarketplaceState>,
    actor: Actor,
    Path(notification_id): Path<String>,
) -> Response {
    let id = NotificationId(notification_id);
    match state.notifications.delete(&actor, &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => notification_error_response(err),
    }
}

fn profile_error_response(err: ProfileError) -> Response {
    match err {
        ProfileError::RoleMismatch { .. } => {
            (StatusCode::FORBIDDEN, error_body(&err)).into_response()
        }
        ProfileError::Repository(err) => repository_error_response(err),
        ProfileError::Notify(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(&err)).into_response()
        }
    }
}

fn invitation_error_response(err: InvitationError) -> Response {
    match err {
        InvitationError::RoleMismatch { .. } | InvitationError::Forbidden => {
            (StatusCode::FORBIDDEN, error_body(&err)).into_response()
        }
        InvitationError::Stale(_) => (StatusCode::CONFLICT, error_body(&err)).into_response(),
        InvitationError::Repository(err) => repository_error_response(err),
        InvitationError::Notify(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_body(&err)).into_response()
        }
    }
}

fn notification_error_response(err: NotificationError) -> Response {
    match err {
        NotificationError::Forbidden => (StatusCode::FORBIDDEN, error_body(&err)).into_response(),
        NotificationError::Repository(err) => repository_error_response(err),
    }
}

fn repository_error_response(err: RepositoryError) -> Response {
    let status = match err {
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error_body(&err)).into_response()
}

fn error_body(err: &impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": err.to_string() }))
}
