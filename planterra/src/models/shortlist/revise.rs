use charybdis::types::Int;

use crate::api::data::RequestData;
use crate::api::types::ActionTypes;
use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::draft_item::DraftItem;
use crate::models::shortlist::{Shortlist, ShortlistStatus};
use crate::models::version::Version;
use crate::models::version_item::VersionItem;

impl Shortlist {
    /// Reopen the current version for editing. Seeds the draft workspace
    /// from its items and flags the shortlist as sent back; no new version
    /// exists until the next publish.
    pub async fn revise(&mut self, data: &RequestData) -> Result<Int, PlanterraError> {
        let db_session = data.db_session();

        if self.current_version_number < 1 {
            return Err(PlanterraError::InvalidState(format!(
                "Shortlist {} has no published version to revise",
                self.id
            )));
        }

        let version = Version::at_number(db_session, self.id, self.current_version_number)
            .await?
            .ok_or_else(|| {
                PlanterraError::NotFound(format!(
                    "Version {} not found for shortlist {}",
                    self.current_version_number, self.id
                ))
            })?;

        let items = VersionItem::for_version(db_session, version.id).await?;

        if items.is_empty() {
            return Err(PlanterraError::InvalidState(format!(
                "Version {} of shortlist {} has no items to revise",
                version.number, self.id
            )));
        }

        let drafts: Vec<DraftItem> = items
            .iter()
            .map(|item| DraftItem::from_version_item(self.id, item))
            .collect();

        DraftItem::replace_for_shortlist(db_session, self.id, &drafts).await?;

        let prior_status = self.parsed_status()?;

        self.apply_status(db_session, ShortlistStatus::SentBackToCustomer, version.number)
            .await?;

        AuditEvent::staff(self.id, ActionTypes::Revise, &data.current_user.role, data.current_user.id)
            .with_statuses(prior_status, ShortlistStatus::SentBackToCustomer)
            .with_detail(format!("Reopened version {}", version.number))
            .record(db_session)
            .await;

        Ok(version.number)
    }
}
