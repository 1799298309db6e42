use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse, HttpResponseBuilder, ResponseError};
use scylla::client::caching_session::CachingSession;
use serde_json::json;

use crate::errors::PlanterraError;
use crate::models::customer::Customer;
use crate::models::public_link::PublicLink;
use crate::models::shortlist::submission::SubmissionPayload;
use crate::models::shortlist::Shortlist;
use crate::models::version::{customer_visible, Version};
use crate::models::version_item::VersionItem;
use crate::resources::resource_locker::ResourceLocker;
use crate::utils::logger::{log_error, log_fatal};

/// Wrapper for everything leaving the public link surface. Staff responses
/// carry ids and storage detail; these must not, so anything that is not a
/// safe client-facing condition collapses into a generic message.
#[derive(Debug)]
pub struct PublicError(PlanterraError);

pub type PublicResponse = Result<HttpResponse, PublicError>;

impl From<PlanterraError> for PublicError {
    fn from(error: PlanterraError) -> Self {
        PublicError(error)
    }
}

impl fmt::Display for PublicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for PublicError {
    fn error_response(&self) -> HttpResponse {
        match &self.0 {
            PlanterraError::NotFound(_) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": "Shortlist not found"
            })),
            PlanterraError::ValidationError((_, message)) => HttpResponse::BadRequest().json(json!({
                "status": 400,
                "message": message
            })),
            PlanterraError::InvalidState(message) => HttpResponse::PreconditionFailed().json(json!({
                "status": 412,
                "message": message
            })),
            PlanterraError::ResourceLocked(message) => HttpResponseBuilder::new(StatusCode::LOCKED).json(json!({
                "status": 423,
                "message": message
            })),
            PlanterraError::InconsistentState(message) => {
                log_fatal(format!("manual intervention required: {}", message));

                service_unavailable()
            }
            error => {
                log_error(format!("Public endpoint failure: {}", error));

                service_unavailable()
            }
        }
    }
}

fn service_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(json!({
        "status": 503,
        "message": "Service temporarily unavailable"
    }))
}

#[get("/{token}")]
pub async fn customer_view(db_session: web::Data<CachingSession>, token: web::Path<String>) -> PublicResponse {
    let shortlist_id = PublicLink::resolve(&db_session, &token).await?;
    let shortlist = Shortlist::find_or_404(&db_session, shortlist_id).await?;

    let versions = Version::list(&db_session, shortlist_id).await?;
    let visible = customer_visible(&versions)
        .ok_or_else(|| PlanterraError::NotFound("No viewable version".to_string()))?;

    let items = VersionItem::with_plants(&db_session, visible.id).await?;
    let customer = Customer::maybe_find_first_by_id(shortlist.customer_id)
        .execute(&db_session)
        .await
        .map_err(PlanterraError::from)?;

    Ok(HttpResponse::Ok().json(json!({
        "version": visible,
        "items": items,
        "customerName": customer.map(|customer| customer.name),
        "title": shortlist.title,
        "description": shortlist.description,
    })))
}

#[post("/{token}/submit")]
pub async fn customer_submit(
    db_session: web::Data<CachingSession>,
    locker: web::Data<ResourceLocker>,
    token: web::Path<String>,
    payload: web::Json<SubmissionPayload>,
) -> PublicResponse {
    let shortlist_id = PublicLink::resolve(&db_session, &token).await?;
    let mut shortlist = Shortlist::find_or_404(&db_session, shortlist_id).await?;

    locker.lock_resource(shortlist_id, ResourceLocker::TWO_SECONDS).await?;

    let res = shortlist.customer_submit(&db_session, payload.into_inner()).await;

    locker.unlock_resource(shortlist_id).await?;

    let outcome = res?;

    Ok(HttpResponse::Ok().json(json!({ "versionNumber": outcome.version_number })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detail_never_leaves_the_public_surface() {
        let error = PublicError(PlanterraError::NotFound(format!(
            "Shortlist not found: {}",
            charybdis::types::Uuid::new_v4()
        )));

        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_collapse_to_service_unavailable() {
        let error = PublicError(PlanterraError::InternalServerError(
            "connection to 10.0.0.3 refused".to_string(),
        ));

        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn conflicts_collapse_to_service_unavailable() {
        let error = PublicError(PlanterraError::Conflict("Version 2 already exists".to_string()));

        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
