use actix_web::{get, post, put, web, HttpResponse};
use charybdis::operations::{InsertWithCallbacks, UpdateWithCallbacks};
use charybdis::types::Uuid;
use serde::Deserialize;

use crate::api::data::RequestData;
use crate::api::types::Response;
use crate::errors::PlanterraError;
use crate::models::plant::{Plant, UpdatePlant};

#[get("/{id}")]
pub async fn get_plant(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let plant = Plant::maybe_find_first_by_id(id)
        .execute(data.db_session())
        .await?
        .ok_or_else(|| PlanterraError::NotFound(format!("Plant not found: {}", id)))?;

    Ok(HttpResponse::Ok().json(plant))
}

#[post("")]
pub async fn create_plant(data: RequestData, plant: web::Json<Plant>) -> Response {
    let mut plant = plant.into_inner();

    plant.insert_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Created().json(plant))
}

#[put("")]
pub async fn update_plant(data: RequestData, plant: web::Json<UpdatePlant>) -> Response {
    let mut plant = plant.into_inner();

    plant.update_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Ok().json(plant))
}

#[derive(Deserialize)]
pub struct PlantIdsPayload {
    pub ids: Vec<Uuid>,
}

#[post("/by_ids")]
pub async fn plants_by_ids(data: RequestData, payload: web::Json<PlantIdsPayload>) -> Response {
    let plants = Plant::find_by_ids(data.db_session(), &payload.ids).await?;

    Ok(HttpResponse::Ok().json(plants))
}
