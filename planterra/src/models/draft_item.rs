use std::collections::HashSet;

use charybdis::batch::ModelBatch;
use charybdis::callbacks::Callbacks;
use charybdis::macros::charybdis_model;
use charybdis::types::{Int, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::constants::BATCH_CHUNK_SIZE;
use crate::errors::PlanterraError;
use crate::models::plant::Plant;
use crate::models::version_item::VersionItem;

/// Working-copy rows the horticulturist edits between publishes. Publishing
/// snapshots them into version items; they stay mutable afterwards.
#[charybdis_model(
    table_name = draft_items,
    partition_keys = [shortlist_id],
    clustering_keys = [id],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem {
    #[serde(default)]
    pub shortlist_id: Uuid,

    #[serde(default)]
    pub id: Uuid,

    pub plant_id: Uuid,
    pub quantity: Option<Int>,
    pub note: Option<Text>,

    /// Horticulturist's pitch for this plant, shown to the customer.
    pub why_picked: Option<Text>,

    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Timestamp,
}

pub(crate) fn validate_quantity(quantity: Option<Int>) -> Result<(), PlanterraError> {
    if let Some(quantity) = quantity {
        if quantity < 1 {
            return Err(PlanterraError::ValidationError((
                "quantity".to_string(),
                "must be at least 1".to_string(),
            )));
        }
    }

    Ok(())
}

impl DraftItem {
    async fn validate_plant_exists(&self, db_session: &CachingSession) -> Result<(), PlanterraError> {
        let plant = Plant::maybe_find_first_by_id(self.plant_id).execute(db_session).await?;

        if plant.is_none() {
            return Err(PlanterraError::ValidationError((
                "plantId".to_string(),
                format!("unknown plant: {}", self.plant_id),
            )));
        }

        Ok(())
    }

    pub fn from_version_item(shortlist_id: Uuid, item: &VersionItem) -> Self {
        let now = chrono::Utc::now();

        Self {
            shortlist_id,
            id: Uuid::new_v4(),
            plant_id: item.plant_id,
            quantity: item.quantity,
            note: item.note.clone(),
            why_picked: item.why_picked.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Clone this row into another shortlist's workspace under a fresh id.
    pub fn copy_to(&self, shortlist_id: Uuid) -> Self {
        let now = chrono::Utc::now();

        Self {
            shortlist_id,
            id: Uuid::new_v4(),
            plant_id: self.plant_id,
            quantity: self.quantity,
            note: self.note.clone(),
            why_picked: self.why_picked.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn for_shortlist(
        db_session: &CachingSession,
        shortlist_id: Uuid,
    ) -> Result<Vec<DraftItem>, PlanterraError> {
        let items = DraftItem::find_by_shortlist_id(shortlist_id)
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        Ok(items)
    }

    /// Swap the whole workspace for a new set of rows. Used when a version is
    /// pulled back into draft.
    pub async fn replace_for_shortlist(
        db_session: &CachingSession,
        shortlist_id: Uuid,
        items: &[DraftItem],
    ) -> Result<(), PlanterraError> {
        DraftItem::delete_by_shortlist_id(shortlist_id)
            .execute(db_session)
            .await?;

        DraftItem::unlogged_batch()
            .chunked_insert(db_session, items, BATCH_CHUNK_SIZE)
            .await?;

        Ok(())
    }

    pub async fn with_plants(
        db_session: &CachingSession,
        shortlist_id: Uuid,
    ) -> Result<Vec<DraftItemWithPlant>, PlanterraError> {
        let items = Self::for_shortlist(db_session, shortlist_id).await?;

        let plant_ids: Vec<Uuid> = items
            .iter()
            .map(|item| item.plant_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let plants = Plant::map_by_ids(db_session, &plant_ids).await?;

        Ok(items
            .into_iter()
            .map(|item| DraftItemWithPlant {
                plant: plants.get(&item.plant_id).cloned(),
                item,
            })
            .collect())
    }
}

impl Callbacks for DraftItem {
    type Extension = Option<()>;
    type Error = PlanterraError;

    async fn before_insert(&mut self, db_session: &CachingSession, _ext: &Self::Extension) -> Result<(), PlanterraError> {
        let now = chrono::Utc::now();

        self.id = Uuid::new_v4();
        self.created_at = now;
        self.updated_at = now;

        validate_quantity(self.quantity)?;
        self.validate_plant_exists(db_session).await?;

        Ok(())
    }
}

/// Item row plus the catalog fields needed to render it. A plant deleted
/// from the catalog leaves `plant` empty instead of failing the read.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItemWithPlant {
    #[serde(flatten)]
    pub item: DraftItem,
    pub plant: Option<Plant>,
}

partial_draft_item!(
    UpdateDraftItem,
    shortlist_id,
    id,
    plant_id,
    quantity,
    note,
    why_picked,
    updated_at
);

impl Callbacks for UpdateDraftItem {
    type Extension = Option<()>;
    type Error = PlanterraError;

    async fn before_update(&mut self, db_session: &CachingSession, _ext: &Self::Extension) -> Result<(), PlanterraError> {
        // scylla updates are upserts, so reject unknown rows instead of
        // minting one for the next publish to snapshot
        let existing = DraftItem::maybe_find_first_by_shortlist_id_and_id(self.shortlist_id, self.id)
            .execute(db_session)
            .await?;

        if existing.is_none() {
            return Err(PlanterraError::NotFound(format!("Draft item not found: {}", self.id)));
        }

        self.updated_at = chrono::Utc::now();

        validate_quantity(self.quantity)?;

        let plant = Plant::maybe_find_first_by_id(self.plant_id).execute(db_session).await?;
        if plant.is_none() {
            return Err(PlanterraError::ValidationError((
                "plantId".to_string(),
                format!("unknown plant: {}", self.plant_id),
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_quantity() {
        assert!(validate_quantity(Some(0)).is_err());
        assert!(validate_quantity(Some(-3)).is_err());
    }

    #[test]
    fn allows_missing_and_positive_quantity() {
        assert!(validate_quantity(None).is_ok());
        assert!(validate_quantity(Some(1)).is_ok());
        assert!(validate_quantity(Some(40)).is_ok());
    }

    #[test]
    fn workspace_copy_gets_fresh_identity() {
        let source = DraftItem {
            shortlist_id: Uuid::new_v4(),
            id: Uuid::new_v4(),
            plant_id: Uuid::new_v4(),
            quantity: Some(2),
            note: Some("hanging pot".to_string()),
            ..Default::default()
        };

        let target_id = Uuid::new_v4();
        let copy = source.copy_to(target_id);

        assert_eq!(copy.shortlist_id, target_id);
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.plant_id, source.plant_id);
        assert_eq!(copy.note.as_deref(), Some("hanging pot"));
    }

    #[test]
    fn version_item_copy_gets_fresh_identity() {
        let shortlist_id = Uuid::new_v4();
        let source = VersionItem {
            version_id: Uuid::new_v4(),
            id: Uuid::new_v4(),
            plant_id: Uuid::new_v4(),
            quantity: Some(3),
            note: Some("shade corner".to_string()),
            why_picked: Some("thrives indoors".to_string()),
            ..Default::default()
        };

        let draft = DraftItem::from_version_item(shortlist_id, &source);

        assert_eq!(draft.shortlist_id, shortlist_id);
        assert_ne!(draft.id, source.id);
        assert_eq!(draft.plant_id, source.plant_id);
        assert_eq!(draft.quantity, Some(3));
        assert_eq!(draft.why_picked.as_deref(), Some("thrives indoors"));
    }
}
