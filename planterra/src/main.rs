mod api;
mod app;
mod constants;
mod errors;
mod models;
mod resources;
mod session_store;
mod utils;

use actix_web::middleware::Logger;
use actix_web::{web, HttpServer};

use crate::api::*;
use crate::app::App as PlanterraApp;
use crate::utils::logger::log_info;

#[tokio::main]
async fn main() {
    let planterra = PlanterraApp::new().await;

    planterra.init();

    let port = planterra.port();
    let app_data = web::Data::new(planterra.clone());
    let db_session = web::Data::from(planterra.db_session.clone());
    let resource_locker = web::Data::from(planterra.resource_locker.clone());

    log_info(format!("Listening on port {}", port));

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(Logger::default())
            .wrap(planterra.cors())
            .wrap(planterra.session_middleware())
            .app_data(app_data.clone())
            .app_data(db_session.clone())
            .app_data(resource_locker.clone())
            .service(
                web::scope("/shortlists")
                    .service(create_shortlist)
                    .service(customer_shortlists)
                    .service(update_shortlist_title)
                    .service(update_shortlist_description)
                    .service(get_shortlist)
                    .service(delete_shortlist)
                    .service(publish_shortlist)
                    .service(revise_shortlist)
                    .service(draft_from_submission)
                    .service(move_to_procurement)
                    .service(duplicate_shortlist)
                    .service(version_history)
                    .service(get_version)
                    .service(get_public_link)
                    .service(shortlist_audit_events),
            )
            .service(
                web::scope("/draft_items")
                    .service(create_draft_item)
                    .service(update_draft_item)
                    .service(delete_draft_item)
                    .service(shortlist_draft_items),
            )
            .service(
                web::scope("/plants")
                    .service(plants_by_ids)
                    .service(get_plant)
                    .service(create_plant)
                    .service(update_plant),
            )
            .service(
                web::scope("/customers")
                    .service(get_customer)
                    .service(create_customer)
                    .service(update_customer),
            )
            .service(web::scope("/s").service(customer_view).service(customer_submit))
    })
    .bind(("0.0.0.0", port))
    .unwrap_or_else(|e| panic!("Could not bind to port {}.\n{}", port, e))
    .run()
    .await
    .unwrap_or_else(|e| panic!("Could not run server on port {}.\n{}", port, e));
}
