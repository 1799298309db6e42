use crate::utils::logger::log_fatal;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError};
use charybdis::errors::CharybdisError;
use colored::Colorize;
use serde_json::json;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum RedisError {
    PoolError(deadpool_redis::PoolError),
    RedisError(deadpool_redis::redis::RedisError),
}

impl fmt::Display for RedisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedisError::PoolError(e) => write!(f, "Pool Error: {}", e),
            RedisError::RedisError(e) => write!(f, "Redis Error: {}", e),
        }
    }
}

impl Error for RedisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RedisError::PoolError(e) => Some(e),
            RedisError::RedisError(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub enum PlanterraError {
    // 400s
    Unauthorized(&'static str),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    ValidationError((String, String)),
    InvalidState(String),
    ResourceLocked(&'static str),
    // 400 | 500
    CharybdisError(CharybdisError),
    // 500
    ClientSessionError(String),
    SerdeError(serde_json::Error),
    RedisError(RedisError),
    LockerError(String),
    /// A rollback of a partially applied write failed, so stored data may
    /// disagree with itself until an operator intervenes.
    InconsistentState(String),
    InternalServerError(String),
}

impl fmt::Display for PlanterraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanterraError::Unauthorized(e) => write!(f, "Unauthorized: {}", e),
            PlanterraError::Forbidden(e) => write!(f, "Forbidden: {}", e),
            PlanterraError::NotFound(e) => write!(f, "Not Found: {}", e),
            PlanterraError::Conflict(e) => write!(f, "Conflict: {}", e),
            PlanterraError::ValidationError((field, message)) => {
                write!(f, "Validation Error: {}: {}", field, message)
            }
            PlanterraError::InvalidState(e) => write!(f, "Invalid State: {}", e),
            PlanterraError::ResourceLocked(e) => write!(f, "ResourceLocked Error: \n{}", e),
            PlanterraError::CharybdisError(e) => write!(f, "Charybdis Error: \n{}", e),
            PlanterraError::ClientSessionError(e) => write!(f, "Session Error: {}", e),
            PlanterraError::SerdeError(e) => write!(f, "Serde Error: \n{}", e),
            PlanterraError::RedisError(e) => write!(f, "Redis Pool Error: \n{}", e),
            PlanterraError::LockerError(e) => write!(f, "Locker Error: {}", e),
            PlanterraError::InconsistentState(e) => write!(f, "Inconsistent State: {}", e),
            PlanterraError::InternalServerError(e) => write!(f, "InternalServerError: \n{}", e),
        }
    }
}

impl Error for PlanterraError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PlanterraError::Unauthorized(_) => None,
            PlanterraError::Forbidden(_) => None,
            PlanterraError::NotFound(_) => None,
            PlanterraError::Conflict(_) => None,
            PlanterraError::ValidationError(_) => None,
            PlanterraError::InvalidState(_) => None,
            PlanterraError::ResourceLocked(_) => None,
            PlanterraError::CharybdisError(e) => Some(e),
            PlanterraError::ClientSessionError(_) => None,
            PlanterraError::SerdeError(e) => Some(e),
            PlanterraError::RedisError(e) => Some(e),
            PlanterraError::LockerError(_) => None,
            PlanterraError::InconsistentState(_) => None,
            PlanterraError::InternalServerError(_) => None,
        }
    }
}

impl ResponseError for PlanterraError {
    fn error_response(&self) -> HttpResponse {
        match self {
            PlanterraError::Unauthorized(_) => HttpResponse::Unauthorized().json({
                json!({
                    "status": 401,
                    "message": "Unauthorized"
                })
            }),
            PlanterraError::Forbidden(e) => HttpResponse::Forbidden().json(json!({
                "status": 403,
                "message": e
            })),
            PlanterraError::NotFound(e) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": e
            })),
            PlanterraError::Conflict(e) => HttpResponse::Conflict().json(json!({
                "status": 409,
                "message": e
            })),
            PlanterraError::ValidationError((field, message)) => HttpResponse::BadRequest().json(json!({
                "status": 400,
                "message": {field: message}
            })),
            PlanterraError::InvalidState(e) => HttpResponse::PreconditionFailed().json(json!({
                "status": 412,
                "message": e
            })),
            PlanterraError::ResourceLocked(e) => HttpResponseBuilder::new(StatusCode::LOCKED).json({
                json!({
                    "status": 423,
                    "message": e
                })
            }),
            PlanterraError::CharybdisError(e) => match e {
                CharybdisError::NotFoundError(e) => HttpResponse::NotFound().json(json!({
                    "status": 404,
                    "message": e.to_string()
                })),
                _ => {
                    PlanterraError::InternalServerError(format!("CharybdisError: {}", e)).error_response()
                }
            },
            PlanterraError::InconsistentState(e) => {
                log_fatal(format!("manual intervention required: {}", e));

                HttpResponse::InternalServerError().json(json!({
                    "status": 500,
                    "message": "Something went wrong"
                }))
            }
            _ => {
                println!("Internal Server Error: {}", self.to_string().red());

                HttpResponse::InternalServerError().json(json!({
                    "status": 500,
                    "message": self.to_string()
                }))
            }
        }
    }
}

impl From<CharybdisError> for PlanterraError {
    fn from(e: CharybdisError) -> Self {
        PlanterraError::CharybdisError(e)
    }
}

impl From<serde_json::Error> for PlanterraError {
    fn from(e: serde_json::Error) -> Self {
        PlanterraError::SerdeError(e)
    }
}

impl From<deadpool_redis::PoolError> for PlanterraError {
    fn from(e: deadpool_redis::PoolError) -> Self {
        PlanterraError::RedisError(RedisError::PoolError(e))
    }
}

impl From<deadpool_redis::redis::RedisError> for PlanterraError {
    fn from(e: deadpool_redis::redis::RedisError) -> Self {
        PlanterraError::RedisError(RedisError::RedisError(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rows_map_to_not_found_responses() {
        let error = PlanterraError::NotFound("Draft item not found: 7".to_string());

        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }
}
