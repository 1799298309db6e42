use charybdis::operations::Delete;
use scylla::client::caching_session::CachingSession;
use futures::StreamExt;

use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::draft_item::DraftItem;
use crate::models::public_link::PublicLink;
use crate::models::shortlist::Shortlist;
use crate::models::version::Version;
use crate::models::version_item::VersionItem;

impl Shortlist {
    /// Administrative removal of a shortlist and everything hanging off it.
    /// Item partitions are keyed by version id, so each version is walked
    /// before its row goes. The shortlist row is deleted last so a partial
    /// failure leaves it findable and the cascade can be retried.
    pub async fn delete_cascade(&self, db_session: &CachingSession) -> Result<(), PlanterraError> {
        let mut versions = Version::find_by_shortlist_id(self.id).execute(db_session).await?;

        while let Some(version) = versions.next().await {
            let version = version?;

            VersionItem::delete_by_version_id(version.id).execute(db_session).await?;
        }

        Version::delete_by_shortlist_id(self.id).execute(db_session).await?;
        DraftItem::delete_by_shortlist_id(self.id).execute(db_session).await?;
        AuditEvent::delete_by_shortlist_id(self.id).execute(db_session).await?;

        let links: Vec<PublicLink> = PublicLink::find_by_shortlist_id(self.id)
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        for link in links {
            link.delete().execute(db_session).await?;
        }

        self.delete().execute(db_session).await?;

        Ok(())
    }
}
