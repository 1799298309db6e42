use charybdis::macros::charybdis_model;
use charybdis::types::{Double, Int, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};
use futures::StreamExt;

use crate::errors::PlanterraError;
use crate::models::version_item::VersionItem;

pub mod create;

/// What a version captured at creation time. Versions are never edited,
/// so this also tells who the snapshot was for.
#[derive(Copy, Clone, PartialEq, Debug, strum_macros::Display, strum_macros::EnumString)]
pub enum VersionStatus {
    SentToCustomer,
    CustomerSubmitted,
}

#[derive(Copy, Clone, PartialEq, Debug, strum_macros::Display, strum_macros::EnumString)]
pub enum CreatorRole {
    Horticulturist,
    Customer,
}

/// Append-only history of a shortlist. `number` starts at 1 and is
/// contiguous per shortlist; rows are clustered newest first.
#[charybdis_model(
    table_name = versions,
    partition_keys = [shortlist_id],
    clustering_keys = [number],
    table_options = r#"
        CLUSTERING ORDER BY (number DESC)
    "#,
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub shortlist_id: Uuid,
    pub number: Int,

    /// Row id, also the partition the version's items live under.
    pub id: Uuid,

    pub status_at_time: Text,
    pub created_by_role: Text,
    pub estimated_total: Option<Double>,
    pub customer_notes: Option<Text>,
    pub created_at: Timestamp,
}

/// `max(existing) + 1`, starting from 1. Because versions are written under
/// a held shortlist lock, the latest row is the max.
pub fn next_number_after(latest: Option<Int>) -> Int {
    latest.unwrap_or(0) + 1
}

/// Which version the public page shows, given the history newest first.
/// A submission is preferred over any sent proposal so customers see their
/// own answer back instead of re-submitting against a stale one; a shortlist
/// with no sent or submitted version has nothing to show.
pub fn customer_visible(versions: &[Version]) -> Option<&Version> {
    versions
        .iter()
        .find(|version| version.has_status(VersionStatus::CustomerSubmitted))
        .or_else(|| {
            versions
                .iter()
                .find(|version| version.has_status(VersionStatus::SentToCustomer))
        })
}

/// Quantity-weighted sum of midpoint prices over approved lines. Absent
/// until at least one line has been priced.
pub fn estimated_total(items: &[VersionItem]) -> Option<Double> {
    let mut total = None;

    for item in items {
        if !item.approved {
            continue;
        }

        if let Some(price) = item.midpoint_price {
            let line = price * f64::from(item.quantity.unwrap_or(1));
            total = Some(total.unwrap_or(0.0) + line);
        }
    }

    total
}

impl Version {
    pub fn new_sent(shortlist_id: Uuid, number: Int) -> Self {
        Self {
            shortlist_id,
            number,
            id: Uuid::new_v4(),
            status_at_time: VersionStatus::SentToCustomer.to_string(),
            created_by_role: CreatorRole::Horticulturist.to_string(),
            estimated_total: None,
            customer_notes: None,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn new_submission(shortlist_id: Uuid, number: Int, customer_notes: Option<Text>) -> Self {
        Self {
            shortlist_id,
            number,
            id: Uuid::new_v4(),
            status_at_time: VersionStatus::CustomerSubmitted.to_string(),
            created_by_role: CreatorRole::Customer.to_string(),
            estimated_total: None,
            customer_notes,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn has_status(&self, status: VersionStatus) -> bool {
        self.status_at_time == status.to_string()
    }

    pub async fn list(db_session: &CachingSession, shortlist_id: Uuid) -> Result<Vec<Version>, PlanterraError> {
        let versions = Version::find_by_shortlist_id(shortlist_id)
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

        Ok(versions)
    }

    pub async fn latest(db_session: &CachingSession, shortlist_id: Uuid) -> Result<Option<Version>, PlanterraError> {
        let version = Version::maybe_find_first_by_shortlist_id(shortlist_id)
            .execute(db_session)
            .await?;

        Ok(version)
    }

    pub async fn latest_of_status(
        db_session: &CachingSession,
        shortlist_id: Uuid,
        status: VersionStatus,
    ) -> Result<Option<Version>, PlanterraError> {
        let mut versions = Version::find_by_shortlist_id(shortlist_id).execute(db_session).await?;

        while let Some(version) = versions.next().await {
            let version = version?;

            if version.has_status(status) {
                return Ok(Some(version));
            }
        }

        Ok(None)
    }

    pub async fn at_number(
        db_session: &CachingSession,
        shortlist_id: Uuid,
        number: Int,
    ) -> Result<Option<Version>, PlanterraError> {
        let version = Version::maybe_find_first_by_shortlist_id_and_number(shortlist_id, number)
            .execute(db_session)
            .await?;

        Ok(version)
    }

    pub async fn next_number(db_session: &CachingSession, shortlist_id: Uuid) -> Result<Int, PlanterraError> {
        let latest = Self::latest(db_session, shortlist_id).await?;

        Ok(next_number_after(latest.map(|version| version.number)))
    }
}

/// A version row annotated for the history view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    #[serde(flatten)]
    pub version: Version,
    pub is_current: bool,
    pub has_public_link: bool,
}

impl VersionSummary {
    /// `has_public_link` is only meaningful for versions the customer can
    /// actually open, which is the sent ones while the link is active.
    pub fn annotate(versions: Vec<Version>, current_number: Int, link_active: bool) -> Vec<VersionSummary> {
        versions
            .into_iter()
            .map(|version| {
                let is_current = version.number == current_number;
                let has_public_link = link_active && version.has_status(VersionStatus::SentToCustomer);

                VersionSummary {
                    version,
                    is_current,
                    has_public_link,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(number: Int, status: VersionStatus) -> Version {
        Version {
            shortlist_id: Uuid::new_v4(),
            number,
            id: Uuid::new_v4(),
            status_at_time: status.to_string(),
            ..Default::default()
        }
    }

    fn item(approved: bool, quantity: Option<Int>, midpoint_price: Option<Double>) -> VersionItem {
        VersionItem {
            approved,
            quantity,
            midpoint_price,
            ..Default::default()
        }
    }

    #[test]
    fn numbering_starts_at_one_and_is_contiguous() {
        assert_eq!(next_number_after(None), 1);
        assert_eq!(next_number_after(Some(1)), 2);
        assert_eq!(next_number_after(Some(7)), 8);
    }

    #[test]
    fn unpriced_items_produce_no_total() {
        let items = vec![item(true, Some(2), None), item(true, None, None)];

        assert_eq!(estimated_total(&items), None);
    }

    #[test]
    fn total_weighs_quantity_and_skips_unapproved() {
        let items = vec![
            item(true, Some(2), Some(10.0)),
            item(true, None, Some(5.5)),
            item(false, Some(4), Some(100.0)),
        ];

        assert_eq!(estimated_total(&items), Some(25.5));
    }

    #[test]
    fn summaries_flag_current_and_linkable_versions() {
        let versions = vec![
            version(3, VersionStatus::CustomerSubmitted),
            version(2, VersionStatus::SentToCustomer),
            version(1, VersionStatus::SentToCustomer),
        ];

        let summaries = VersionSummary::annotate(versions, 3, true);

        assert!(summaries[0].is_current);
        assert!(!summaries[0].has_public_link);
        assert!(!summaries[1].is_current);
        assert!(summaries[1].has_public_link);
        assert!(summaries[2].has_public_link);
    }

    #[test]
    fn no_link_annotation_without_active_link() {
        let versions = vec![version(1, VersionStatus::SentToCustomer)];

        let summaries = VersionSummary::annotate(versions, 1, false);

        assert!(!summaries[0].has_public_link);
    }

    #[test]
    fn customer_sees_their_submission_over_any_proposal() {
        let versions = vec![
            version(3, VersionStatus::SentToCustomer),
            version(2, VersionStatus::CustomerSubmitted),
            version(1, VersionStatus::SentToCustomer),
        ];

        let visible = customer_visible(&versions).unwrap();

        assert_eq!(visible.number, 2);
    }

    #[test]
    fn customer_sees_the_latest_proposal_before_submitting() {
        let versions = vec![
            version(2, VersionStatus::SentToCustomer),
            version(1, VersionStatus::SentToCustomer),
        ];

        let visible = customer_visible(&versions).unwrap();

        assert_eq!(visible.number, 2);
    }

    #[test]
    fn no_visible_version_without_history() {
        assert!(customer_visible(&[]).is_none());
    }
}
