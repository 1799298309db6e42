use actix_web::{delete, get, post, put, web, HttpResponse};
use charybdis::operations::{InsertWithCallbacks, UpdateWithCallbacks};
use charybdis::types::{Int, Uuid};
use serde_json::json;

use crate::api::data::RequestData;
use crate::api::types::Response;
use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::draft_item::DraftItem;
use crate::models::materialized_views::ShortlistsByCustomer;
use crate::models::public_link::PublicLink;
use crate::models::shortlist::{Shortlist, UpdateDescriptionShortlist, UpdateTitleShortlist};
use crate::models::version::{Version, VersionSummary};
use crate::models::version_item::VersionItem;
use crate::resources::resource_locker::ResourceLocker;

#[post("")]
pub async fn create_shortlist(data: RequestData, shortlist: web::Json<Shortlist>) -> Response {
    let mut shortlist = shortlist.into_inner();

    shortlist.insert_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Ok().json(shortlist))
}

#[get("/{id}")]
pub async fn get_shortlist(data: RequestData, id: web::Path<Uuid>) -> Response {
    let shortlist = Shortlist::find_or_404(data.db_session(), id.into_inner()).await?;
    let effective_status = shortlist.effective_status(data.db_session()).await?;
    let items = DraftItem::with_plants(data.db_session(), shortlist.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "shortlist": shortlist,
        "effectiveStatus": effective_status.to_string(),
        "items": items,
    })))
}

#[get("/customer/{customer_id}")]
pub async fn customer_shortlists(data: RequestData, customer_id: web::Path<Uuid>) -> Response {
    let entries = ShortlistsByCustomer::with_effective_statuses(data.db_session(), customer_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(entries))
}

#[put("/title")]
pub async fn update_shortlist_title(data: RequestData, shortlist: web::Json<UpdateTitleShortlist>) -> Response {
    let mut shortlist = shortlist.into_inner();

    // scylla updates are upserts, so reject unknown ids before writing
    Shortlist::find_or_404(data.db_session(), shortlist.id).await?;

    shortlist.update_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Ok().json(shortlist))
}

#[put("/description")]
pub async fn update_shortlist_description(
    data: RequestData,
    shortlist: web::Json<UpdateDescriptionShortlist>,
) -> Response {
    let mut shortlist = shortlist.into_inner();

    Shortlist::find_or_404(data.db_session(), shortlist.id).await?;

    shortlist.update_cb(&None).execute(data.db_session()).await?;

    Ok(HttpResponse::Ok().json(shortlist))
}

/// Cascade delete is the one administrative escape hatch; everything else
/// leaves history behind.
#[delete("/{id}")]
pub async fn delete_shortlist(data: RequestData, id: web::Path<Uuid>) -> Response {
    if !data.current_user.is_admin() {
        return Err(PlanterraError::Forbidden(
            "Only admins can delete shortlists".to_string(),
        ));
    }

    let id = id.into_inner();
    let shortlist = Shortlist::find_or_404(data.db_session(), id).await?;

    data.resource_locker()
        .lock_resource(id, ResourceLocker::FIVE_MINUTES)
        .await?;

    let res = shortlist.delete_cascade(data.db_session()).await;

    data.resource_locker().unlock_resource(id).await?;

    res?;

    Ok(HttpResponse::Ok().finish())
}

#[post("/{id}/publish")]
pub async fn publish_shortlist(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let mut shortlist = Shortlist::find_or_404(data.db_session(), id).await?;

    data.resource_locker()
        .lock_resource(id, ResourceLocker::TWO_SECONDS)
        .await?;

    let res = shortlist.publish(&data).await;

    data.resource_locker().unlock_resource(id).await?;

    let outcome = res?;

    Ok(HttpResponse::Ok().json(json!({
        "versionNumber": outcome.version_number,
        "publicUrl": outcome.public_url,
    })))
}

#[post("/{id}/revise")]
pub async fn revise_shortlist(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let mut shortlist = Shortlist::find_or_404(data.db_session(), id).await?;

    data.resource_locker()
        .lock_resource(id, ResourceLocker::TWO_SECONDS)
        .await?;

    let res = shortlist.revise(&data).await;

    data.resource_locker().unlock_resource(id).await?;

    res?;

    Ok(HttpResponse::Ok().json(shortlist))
}

#[post("/{id}/draft_from_submission")]
pub async fn draft_from_submission(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let mut shortlist = Shortlist::find_or_404(data.db_session(), id).await?;

    data.resource_locker()
        .lock_resource(id, ResourceLocker::TWO_SECONDS)
        .await?;

    let res = shortlist.create_draft_from_submission(&data).await;

    data.resource_locker().unlock_resource(id).await?;

    let new_version_number = res?;

    Ok(HttpResponse::Ok().json(json!({
        "newVersionNumber": new_version_number,
        "shortlist": shortlist,
    })))
}

#[post("/{id}/move_to_procurement")]
pub async fn move_to_procurement(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let mut shortlist = Shortlist::find_or_404(data.db_session(), id).await?;

    data.resource_locker()
        .lock_resource(id, ResourceLocker::TWO_SECONDS)
        .await?;

    let res = shortlist.move_to_procurement(&data).await;

    data.resource_locker().unlock_resource(id).await?;

    res?;

    Ok(HttpResponse::Ok().json(json!({ "shortlist": shortlist })))
}

#[post("/{id}/duplicate")]
pub async fn duplicate_shortlist(data: RequestData, id: web::Path<Uuid>) -> Response {
    let id = id.into_inner();
    let shortlist = Shortlist::find_or_404(data.db_session(), id).await?;

    data.resource_locker()
        .lock_resource(id, ResourceLocker::TWO_SECONDS)
        .await?;

    let res = shortlist.duplicate(&data).await;

    data.resource_locker().unlock_resource(id).await?;

    let outcome = res?;

    Ok(HttpResponse::Ok().json(json!({
        "shortlist": outcome.shortlist,
        "itemsCopied": outcome.items_copied,
    })))
}

#[get("/{id}/versions")]
pub async fn version_history(data: RequestData, id: web::Path<Uuid>) -> Response {
    let shortlist = Shortlist::find_or_404(data.db_session(), id.into_inner()).await?;
    let versions = Version::list(data.db_session(), shortlist.id).await?;
    let link = PublicLink::find_active(data.db_session(), shortlist.id).await?;

    let summaries = VersionSummary::annotate(versions, shortlist.current_version_number, link.is_some());

    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/{id}/versions/{number}")]
pub async fn get_version(data: RequestData, path: web::Path<(Uuid, Int)>) -> Response {
    let (id, number) = path.into_inner();

    let version = Version::at_number(data.db_session(), id, number)
        .await?
        .ok_or_else(|| PlanterraError::NotFound(format!("Version {} not found for shortlist {}", number, id)))?;
    let items = VersionItem::with_plants(data.db_session(), version.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "version": version,
        "items": items,
    })))
}

#[get("/{id}/public_link")]
pub async fn get_public_link(data: RequestData, id: web::Path<Uuid>) -> Response {
    let shortlist = Shortlist::find_or_404(data.db_session(), id.into_inner()).await?;

    let public_url = PublicLink::get_or_create(
        data.db_session(),
        shortlist.id,
        &data.app.link_secret(),
        &data.app.public_base_url(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "publicUrl": public_url })))
}

#[get("/{id}/audit_events")]
pub async fn shortlist_audit_events(data: RequestData, id: web::Path<Uuid>) -> Response {
    let events = AuditEvent::list(data.db_session(), id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(events))
}
