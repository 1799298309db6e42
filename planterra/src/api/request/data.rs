use std::future::{ready, Ready};

use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use scylla::client::caching_session::CachingSession;

use crate::api::current_user::get_current_user;
use crate::app::App;
use crate::errors::PlanterraError;
use crate::models::user::CurrentUser;
use crate::resources::resource_locker::ResourceLocker;

/// Everything a staff endpoint needs: the app handle and the caller.
#[derive(Clone)]
pub struct RequestData {
    pub app: web::Data<App>,
    pub current_user: CurrentUser,
}

impl RequestData {
    pub fn db_session(&self) -> &CachingSession {
        &self.app.db_session
    }

    pub fn resource_locker(&self) -> &ResourceLocker {
        &self.app.resource_locker
    }
}

impl FromRequest for RequestData {
    type Error = PlanterraError;
    type Future = Ready<Result<RequestData, PlanterraError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let client_session = req.get_session();

        match get_current_user(&client_session) {
            Some(current_user) => {
                let app = req.app_data::<web::Data<App>>();

                match app {
                    Some(app) => {
                        let data = RequestData {
                            app: web::Data::clone(app),
                            current_user,
                        };

                        ready(Ok(data))
                    }
                    None => {
                        let err = PlanterraError::InternalServerError("Could not get app data".to_string());

                        ready(Err(err))
                    }
                }
            }
            None => {
                let error_response = PlanterraError::Unauthorized("You must be logged in to perform this action!");

                ready(Err(error_response))
            }
        }
    }
}
