use actix_web::HttpResponse;

use crate::errors::PlanterraError;

pub type Response = Result<HttpResponse, PlanterraError>;
