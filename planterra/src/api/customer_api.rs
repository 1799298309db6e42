use actix_web::{get, post, put, web, HttpResponse};
use charybdis::operations::{InsertWithCallbacks, UpdateWithCallbacks};
use charybdis::types::Uuid;

use crate::api::data::RequestData;
use crate::api::types::Response;
use crate::errors::PlanterraError;
use crate::models::customer::{Customer, UpdateCustomer};

#[get("/{id}")]
pub async fn get_customer(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let customer = Customer::maybe_find_first_by_id(id)
        .execute(data.db_session())
        .await?
        .ok_or_else(|| PlanterraError::NotFound(format!("Customer not found: {}", id)))?;

    Ok(HttpResponse::Ok().json(customer))
}

#[post("")]
pub async fn create_customer(data: RequestData, customer: web::Json<Customer>) -> Response {
    let mut customer = customer.into_inner();

    customer.insert_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Created().json(customer))
}

#[put("")]
pub async fn update_customer(data: RequestData, customer: web::Json<UpdateCustomer>) -> Response {
    let mut customer = customer.into_inner();

    customer.update_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Ok().json(customer))
}
