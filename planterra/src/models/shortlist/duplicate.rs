use charybdis::batch::ModelBatch;
use charybdis::operations::InsertWithCallbacks;
use charybdis::types::Uuid;
use scylla::client::caching_session::CachingSession;

use crate::api::data::RequestData;
use crate::api::types::ActionTypes;
use crate::constants::BATCH_CHUNK_SIZE;
use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::draft_item::DraftItem;
use crate::models::shortlist::{Shortlist, ShortlistStatus};
use crate::models::version::{Version, VersionStatus};
use crate::models::version_item::VersionItem;
use crate::utils::logger::log_warning;

pub fn duplicate_title(title: &str) -> String {
    format!("{} (copy)", title)
}

pub struct DuplicateOutcome {
    pub shortlist: Shortlist,
    /// False when the item copy failed after the new shortlist was created.
    /// The caller gets the shortlist either way and must surface the gap.
    pub items_copied: bool,
}

impl Shortlist {
    /// Start a fresh draft shortlist from this one. The copy always lands in
    /// Draft with no history; which items seed it depends on how far the
    /// source got with the customer.
    pub async fn duplicate(&self, data: &RequestData) -> Result<DuplicateOutcome, PlanterraError> {
        let db_session = data.db_session();

        let mut copy = Shortlist {
            customer_id: self.customer_id,
            title: duplicate_title(&self.title),
            description: self.description.clone(),
            ..Default::default()
        };

        copy.insert_cb(&None).execute(db_session).await?;

        let items_copied = match self.copy_items_into(db_session, copy.id).await {
            Ok(()) => true,
            Err(error) => {
                log_warning(format!(
                    "Items were not copied into duplicate {} of shortlist {}: {}",
                    copy.id, self.id, error
                ));

                false
            }
        };

        AuditEvent::staff(self.id, ActionTypes::Duplicate, &data.current_user.role, data.current_user.id)
            .with_detail(format!("Duplicated into {}", copy.id))
            .record(db_session)
            .await;

        Ok(DuplicateOutcome {
            shortlist: copy,
            items_copied,
        })
    }

    /// Once a proposal went out, the customer-facing snapshot is the truth
    /// worth copying; before that, the draft workspace is.
    async fn copy_items_into(&self, db_session: &CachingSession, target_id: Uuid) -> Result<(), PlanterraError> {
        let effective = self.effective_status(db_session).await?;

        let rows = match effective {
            ShortlistStatus::CustomerSubmitted | ShortlistStatus::SentToCustomer => {
                let version =
                    match Version::latest_of_status(db_session, self.id, VersionStatus::CustomerSubmitted).await? {
                        Some(version) => Some(version),
                        None => Version::latest_of_status(db_session, self.id, VersionStatus::SentToCustomer).await?,
                    };

                match version {
                    Some(version) => {
                        let items = VersionItem::for_version(db_session, version.id).await?;

                        items
                            .iter()
                            .map(|item| DraftItem::from_version_item(target_id, item))
                            .collect()
                    }
                    None => vec![],
                }
            }
            _ => {
                let drafts = DraftItem::for_shortlist(db_session, self.id).await?;

                drafts.iter().map(|draft| draft.copy_to(target_id)).collect()
            }
        };

        DraftItem::unlogged_batch()
            .chunked_insert(db_session, &rows, BATCH_CHUNK_SIZE)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_get_a_decorated_title() {
        assert_eq!(duplicate_title("Balcony refresh"), "Balcony refresh (copy)");
        assert_eq!(
            duplicate_title("Balcony refresh (copy)"),
            "Balcony refresh (copy) (copy)"
        );
    }
}
