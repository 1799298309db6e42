use charybdis::macros::charybdis_view_model;
use charybdis::types::{Int, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::errors::PlanterraError;
use crate::models::shortlist::derived_status;

#[charybdis_view_model(
    table_name = shortlists_by_customer,
    base_table = shortlists,
    partition_keys = [customer_id],
    clustering_keys = [id]
)]
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistsByCustomer {
    pub customer_id: Uuid,
    pub id: Uuid,
    pub title: Text,
    pub status: Text,
    pub current_version_number: Int,
    pub updated_at: Timestamp,
}

/// List row plus the status viewers should trust, which can disagree with
/// the stored column (see `derived_status`).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerShortlistEntry {
    #[serde(flatten)]
    pub shortlist: ShortlistsByCustomer,
    pub effective_status: Text,
}

impl ShortlistsByCustomer {
    pub async fn for_customer(
        db_session: &CachingSession,
        customer_id: Uuid,
    ) -> Result<Vec<ShortlistsByCustomer>, PlanterraError> {
        let rows = ShortlistsByCustomer::find_by_customer_id(customer_id)
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        Ok(rows)
    }

    pub async fn with_effective_statuses(
        db_session: &CachingSession,
        customer_id: Uuid,
    ) -> Result<Vec<CustomerShortlistEntry>, PlanterraError> {
        let rows = Self::for_customer(db_session, customer_id).await?;
        let mut entries = Vec::with_capacity(rows.len());

        for row in rows {
            let effective = derived_status(db_session, row.id, &row.status).await?;

            entries.push(CustomerShortlistEntry {
                effective_status: effective.to_string(),
                shortlist: row,
            });
        }

        Ok(entries)
    }
}
