use std::collections::HashSet;

use charybdis::macros::charybdis_model;
use charybdis::types::{Boolean, Double, Int, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::errors::PlanterraError;
use crate::models::draft_item::DraftItem;
use crate::models::plant::Plant;

/// Frozen copy of one shortlist line inside a version. Rows are written
/// once when the version is created and never updated.
#[charybdis_model(
    table_name = version_items,
    partition_keys = [version_id],
    clustering_keys = [id],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VersionItem {
    pub version_id: Uuid,
    pub id: Uuid,
    pub plant_id: Uuid,
    pub quantity: Option<Int>,
    pub note: Option<Text>,
    pub why_picked: Option<Text>,
    pub horticulturist_note: Option<Text>,

    /// Whether the customer kept this line. Staff-published versions start
    /// with every line approved.
    pub approved: Boolean,

    /// Price guidance at mid-range, absent until pricing has been done.
    pub midpoint_price: Option<Double>,

    pub created_at: Timestamp,
}

impl VersionItem {
    /// Snapshot a draft row into a version. Published lines start approved
    /// and unpriced.
    pub fn from_draft(version_id: Uuid, draft: &DraftItem) -> Self {
        Self {
            version_id,
            id: Uuid::new_v4(),
            plant_id: draft.plant_id,
            quantity: draft.quantity,
            note: draft.note.clone(),
            why_picked: draft.why_picked.clone(),
            horticulturist_note: None,
            approved: true,
            midpoint_price: None,
            created_at: chrono::Utc::now(),
        }
    }

    pub async fn for_version(
        db_session: &CachingSession,
        version_id: Uuid,
    ) -> Result<Vec<VersionItem>, PlanterraError> {
        let items = VersionItem::find_by_version_id(version_id)
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        Ok(items)
    }

    pub async fn with_plants(
        db_session: &CachingSession,
        version_id: Uuid,
    ) -> Result<Vec<VersionItemWithPlant>, PlanterraError> {
        let items = Self::for_version(db_session, version_id).await?;

        let plant_ids: Vec<Uuid> = items
            .iter()
            .map(|item| item.plant_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let plants = Plant::map_by_ids(db_session, &plant_ids).await?;

        Ok(items
            .into_iter()
            .map(|item| VersionItemWithPlant {
                plant: plants.get(&item.plant_id).cloned(),
                item,
            })
            .collect())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionItemWithPlant {
    #[serde(flatten)]
    pub item: VersionItem,
    pub plant: Option<Plant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_snapshot_starts_approved_and_unpriced() {
        let version_id = Uuid::new_v4();
        let draft = DraftItem {
            shortlist_id: Uuid::new_v4(),
            id: Uuid::new_v4(),
            plant_id: Uuid::new_v4(),
            quantity: Some(2),
            note: None,
            why_picked: Some("low maintenance".to_string()),
            ..Default::default()
        };

        let item = VersionItem::from_draft(version_id, &draft);

        assert_eq!(item.version_id, version_id);
        assert_ne!(item.id, draft.id);
        assert!(item.approved);
        assert_eq!(item.midpoint_price, None);
        assert_eq!(item.horticulturist_note, None);
        assert_eq!(item.why_picked.as_deref(), Some("low maintenance"));
    }
}
