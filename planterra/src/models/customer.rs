use charybdis::macros::charybdis_model;
use charybdis::types::{Boolean, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::errors::PlanterraError;
use crate::models::utils::defaults::default_to_true;
use crate::models::utils::{impl_default_callbacks, impl_updated_at_cb};

#[charybdis_model(
    table_name = customers,
    partition_keys = [id],
    clustering_keys = [],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: Uuid,

    pub name: Text,
    pub email: Text,

    /// Deactivated customers keep their shortlists, but no new ones can be
    /// created for them.
    #[serde(default = "default_to_true")]
    pub active: Boolean,

    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Timestamp,
}

impl_default_callbacks!(Customer);

impl Customer {
    pub async fn find_active(db_session: &CachingSession, id: Uuid) -> Result<Customer, PlanterraError> {
        let customer = Customer::maybe_find_first_by_id(id)
            .execute(db_session)
            .await?
            .ok_or_else(|| PlanterraError::NotFound(format!("Customer not found: {}", id)))?;

        if !customer.active {
            return Err(PlanterraError::InvalidState(format!(
                "Customer {} is deactivated",
                id
            )));
        }

        Ok(customer)
    }
}

partial_customer!(UpdateCustomer, id, name, email, active, updated_at);

impl_updated_at_cb!(UpdateCustomer);
