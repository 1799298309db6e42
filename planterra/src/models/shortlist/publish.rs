use charybdis::types::Int;

use crate::api::data::RequestData;
use crate::api::types::ActionTypes;
use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::draft_item::DraftItem;
use crate::models::public_link::PublicLink;
use crate::models::shortlist::{Shortlist, ShortlistStatus};
use crate::models::version::{estimated_total, Version};
use crate::models::version_item::VersionItem;

pub struct PublishOutcome {
    pub version_number: Int,
    pub public_url: String,
}

impl Shortlist {
    /// Snapshot the draft workspace into a new sent version and hand the
    /// customer a link to it. Runs under the shortlist lock; the version
    /// number uniqueness check backstops anything that slips past it.
    pub async fn publish(&mut self, data: &RequestData) -> Result<PublishOutcome, PlanterraError> {
        let db_session = data.db_session();

        let drafts = DraftItem::for_shortlist(db_session, self.id).await?;

        if drafts.is_empty() {
            return Err(PlanterraError::InvalidState(format!(
                "Shortlist {} has no draft items to publish",
                self.id
            )));
        }

        let prior_status = self.parsed_status()?;
        let next_number = Version::next_number(db_session, self.id).await?;

        let mut version = Version::new_sent(self.id, next_number);
        let items: Vec<VersionItem> = drafts
            .iter()
            .map(|draft| VersionItem::from_draft(version.id, draft))
            .collect();
        version.estimated_total = estimated_total(&items);

        version.create_with_items(db_session, &items).await?;

        self.apply_status(db_session, ShortlistStatus::SentToCustomer, next_number)
            .await?;

        let public_url = PublicLink::get_or_create(
            db_session,
            self.id,
            &data.app.link_secret(),
            &data.app.public_base_url(),
        )
        .await?;

        AuditEvent::staff(self.id, ActionTypes::Publish, &data.current_user.role, data.current_user.id)
            .with_statuses(prior_status, ShortlistStatus::SentToCustomer)
            .with_detail(format!("Published version {}", next_number))
            .record(db_session)
            .await;

        Ok(PublishOutcome {
            version_number: next_number,
            public_url,
        })
    }
}
