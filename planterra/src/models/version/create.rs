use charybdis::batch::ModelBatch;
use charybdis::operations::{Delete, Insert};
use scylla::client::caching_session::CachingSession;

use crate::constants::BATCH_CHUNK_SIZE;
use crate::errors::PlanterraError;
use crate::models::version::Version;
use crate::models::version_item::VersionItem;
use crate::utils::logger::log_error;

impl Version {
    /// Writes the version row and its item snapshot as one logical append.
    /// There is no cross-table atomicity here, so a failed item write rolls
    /// the version row back to keep the history free of empty versions.
    pub async fn create_with_items(
        &self,
        db_session: &CachingSession,
        items: &Vec<VersionItem>,
    ) -> Result<(), PlanterraError> {
        if items.is_empty() {
            return Err(PlanterraError::ValidationError((
                "items".to_string(),
                "version must contain at least one item".to_string(),
            )));
        }

        let existing = Version::maybe_find_first_by_shortlist_id_and_number(self.shortlist_id, self.number)
            .execute(db_session)
            .await?;

        if existing.is_some() {
            return Err(PlanterraError::Conflict(format!(
                "Version {} already exists for shortlist {}",
                self.number, self.shortlist_id
            )));
        }

        self.insert().execute(db_session).await?;

        let inserted = VersionItem::unlogged_batch()
            .chunked_insert(db_session, items, BATCH_CHUNK_SIZE)
            .await;

        if let Err(error) = inserted {
            log_error(format!(
                "Failed to write items for version {} of shortlist {}: {}",
                self.number, self.shortlist_id, error
            ));

            self.rollback_version_row(db_session).await?;

            return Err(error.into());
        }

        Ok(())
    }

    async fn rollback_version_row(&self, db_session: &CachingSession) -> Result<(), PlanterraError> {
        let deleted = self.delete().execute(db_session).await;

        if let Err(error) = deleted {
            return Err(PlanterraError::InconsistentState(format!(
                "Version {} of shortlist {} has no items and could not be removed: {}",
                self.number, self.shortlist_id, error
            )));
        }

        Ok(())
    }

    /// Compensating delete for a version whose follow-up write failed after
    /// the items landed. If the discard itself fails, the history keeps a
    /// version nothing acknowledged and someone has to look at it.
    pub async fn discard_with_items(&self, db_session: &CachingSession) -> Result<(), PlanterraError> {
        let discarded = self.discard(db_session).await;

        if let Err(error) = discarded {
            return Err(PlanterraError::InconsistentState(format!(
                "Version {} of shortlist {} could not be rolled back: {}",
                self.number, self.shortlist_id, error
            )));
        }

        Ok(())
    }

    async fn discard(&self, db_session: &CachingSession) -> Result<(), PlanterraError> {
        VersionItem::delete_by_version_id(self.id).execute(db_session).await?;
        self.delete().execute(db_session).await?;

        Ok(())
    }
}
