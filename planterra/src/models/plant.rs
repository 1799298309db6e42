use std::collections::HashMap;

use charybdis::macros::charybdis_model;
use charybdis::types::{List, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::errors::PlanterraError;
use crate::models::utils::{impl_default_callbacks, impl_updated_at_cb};

/// Catalog entry maintained by the horticulturist team. Shortlist items
/// reference plants by id; display fields are joined in at read time.
#[charybdis_model(
    table_name = plants,
    partition_keys = [id],
    clustering_keys = [],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default)]
    pub id: Uuid,

    pub name: Text,
    pub latin_name: Option<Text>,
    pub price_band: Option<Text>,
    pub care_level: Option<Text>,
    pub image_urls: Option<List<Text>>,

    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Timestamp,
}

impl_default_callbacks!(Plant);

impl Plant {
    pub async fn find_by_ids(db_session: &CachingSession, ids: &[Uuid]) -> Result<Vec<Plant>, PlanterraError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let plants = find_plant!("id IN ?", (ids.to_vec(),))
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        Ok(plants)
    }

    /// Map keyed by plant id, for joining display fields onto item rows.
    pub async fn map_by_ids(
        db_session: &CachingSession,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Plant>, PlanterraError> {
        let plants = Self::find_by_ids(db_session, ids).await?;

        Ok(plants.into_iter().map(|plant| (plant.id, plant)).collect())
    }
}

partial_plant!(
    UpdatePlant,
    id,
    name,
    latin_name,
    price_band,
    care_level,
    image_urls,
    updated_at
);

impl_updated_at_cb!(UpdatePlant);
