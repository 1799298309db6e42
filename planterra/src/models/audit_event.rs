use charybdis::macros::charybdis_model;
use charybdis::operations::Insert;
use charybdis::types::{Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::api::types::ActionTypes;
use crate::errors::PlanterraError;
use crate::models::shortlist::ShortlistStatus;
use crate::utils::logger::log_error;

/// Append-only trail of lifecycle actions per shortlist. Events are
/// best-effort: a failed write is logged, it never fails the transition
/// that produced it.
#[charybdis_model(
    table_name = audit_events,
    partition_keys = [shortlist_id],
    clustering_keys = [created_at, id],
    table_options = r#"
        CLUSTERING ORDER BY (created_at DESC)
    "#,
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub shortlist_id: Uuid,
    pub created_at: Timestamp,
    pub id: Uuid,
    pub action: Text,
    pub actor_role: Text,
    pub actor_id: Option<Uuid>,
    pub prior_status: Option<Text>,
    pub new_status: Option<Text>,
    pub detail: Option<Text>,
}

impl AuditEvent {
    pub fn staff(shortlist_id: Uuid, action: ActionTypes, actor_role: &str, actor_id: Uuid) -> Self {
        Self {
            shortlist_id,
            created_at: chrono::Utc::now(),
            id: Uuid::new_v4(),
            action: action.to_string(),
            actor_role: actor_role.to_string(),
            actor_id: Some(actor_id),
            ..Default::default()
        }
    }

    pub fn customer(shortlist_id: Uuid, action: ActionTypes) -> Self {
        Self {
            shortlist_id,
            created_at: chrono::Utc::now(),
            id: Uuid::new_v4(),
            action: action.to_string(),
            actor_role: "Customer".to_string(),
            ..Default::default()
        }
    }

    pub fn with_statuses(mut self, prior: ShortlistStatus, new: ShortlistStatus) -> Self {
        self.prior_status = Some(prior.to_string());
        self.new_status = Some(new.to_string());
        self
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }

    pub async fn record(self, db_session: &CachingSession) {
        if let Err(e) = self.insert().execute(db_session).await {
            log_error(format!(
                "Failed to record audit event {} for shortlist {}: {}",
                self.action, self.shortlist_id, e
            ));
        }
    }

    pub async fn list(db_session: &CachingSession, shortlist_id: Uuid) -> Result<Vec<AuditEvent>, PlanterraError> {
        let events = AuditEvent::find_by_shortlist_id(shortlist_id)
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        Ok(events)
    }
}
