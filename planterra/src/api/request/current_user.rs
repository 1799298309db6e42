use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use log::error;

use crate::errors::PlanterraError;
use crate::models::user::CurrentUser;

impl FromRequest for CurrentUser {
    type Error = PlanterraError;
    type Future = Ready<Result<CurrentUser, PlanterraError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let client_session = req.get_session();

        match get_current_user(&client_session) {
            Some(user) => ready(Ok(user)),
            None => {
                let error_response = PlanterraError::Unauthorized("You must be logged in to perform this action!");

                ready(Err(error_response))
            }
        }
    }
}

/// Blocked accounts keep their cookie until it expires, so the block has to
/// be enforced on every read.
pub fn get_current_user(client_session: &Session) -> Option<CurrentUser> {
    let current_user = client_session
        .get::<CurrentUser>("current_user")
        .map_err(|e| error!("Could not get current user. {}", e));

    match current_user {
        Ok(Some(user)) => {
            if user.is_blocked {
                None
            } else {
                Some(user)
            }
        }
        _ => None,
    }
}
