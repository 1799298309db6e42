use actix_web::{delete, get, post, put, web, HttpResponse};
use charybdis::operations::{InsertWithCallbacks, UpdateWithCallbacks};
use charybdis::types::Uuid;
use serde_json::json;

use crate::api::data::RequestData;
use crate::api::types::Response;
use crate::models::draft_item::{DraftItem, UpdateDraftItem};
use crate::models::shortlist::Shortlist;

#[post("")]
pub async fn create_draft_item(data: RequestData, draft_item: web::Json<DraftItem>) -> Response {
    let mut draft_item = draft_item.into_inner();

    Shortlist::find_or_404(data.db_session(), draft_item.shortlist_id).await?;

    draft_item.insert_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Created().json(draft_item))
}

#[put("")]
pub async fn update_draft_item(data: RequestData, draft_item: web::Json<UpdateDraftItem>) -> Response {
    let mut draft_item = draft_item.into_inner();

    draft_item.update_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Ok().json(draft_item))
}

#[delete("/{shortlist_id}/{id}")]
pub async fn delete_draft_item(data: RequestData, path: web::Path<(Uuid, Uuid)>) -> Response {
    let (shortlist_id, id) = path.into_inner();

    DraftItem::delete_by_shortlist_id_and_id(shortlist_id, id)
        .execute(data.db_session())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}

#[get("/{shortlist_id}")]
pub async fn shortlist_draft_items(data: RequestData, shortlist_id: web::Path<Uuid>) -> Response {
    let items = DraftItem::with_plants(data.db_session(), shortlist_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(items))
}
