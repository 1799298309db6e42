use std::str::FromStr;

use charybdis::callbacks::Callbacks;
use charybdis::macros::charybdis_model;
use charybdis::operations::Update;
use charybdis::types::{Int, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::errors::PlanterraError;
use crate::models::customer::Customer;
use crate::models::utils::impl_updated_at_cb;
use crate::models::version::{Version, VersionStatus};

pub mod delete;
pub mod duplicate;
pub mod procurement;
pub mod publish;
pub mod revise;
pub mod submission;

/// Lifecycle of a proposal. `SentBackToCustomer` is a distinct label that
/// shares the draft editing mechanics: `revise` lands on it and `publish`
/// picks it up like any other draft.
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum_macros::Display, strum_macros::EnumString)]
pub enum ShortlistStatus {
    Draft,
    SentToCustomer,
    CustomerSubmitted,
    ToBeProcured,
    SentBackToCustomer,
}

impl ShortlistStatus {
    pub fn default() -> Text {
        ShortlistStatus::Draft.to_string()
    }
}

pub fn parse_status(status: &str) -> Result<ShortlistStatus, PlanterraError> {
    ShortlistStatus::from_str(status)
        .map_err(|_| PlanterraError::InternalServerError(format!("Unknown shortlist status: {}", status)))
}

/// Status as viewers should see it. A stored column can lag behind the
/// version history (rows written before the column was kept in sync), so a
/// latest version that records a customer submission wins over whatever the
/// column says.
pub fn effective_status(stored: ShortlistStatus, latest_version: Option<VersionStatus>) -> ShortlistStatus {
    match latest_version {
        Some(VersionStatus::CustomerSubmitted) => ShortlistStatus::CustomerSubmitted,
        _ => stored,
    }
}

pub async fn derived_status(
    db_session: &CachingSession,
    shortlist_id: Uuid,
    stored: &str,
) -> Result<ShortlistStatus, PlanterraError> {
    let latest = Version::latest(db_session, shortlist_id).await?;
    let latest_status = latest.and_then(|version| VersionStatus::from_str(&version.status_at_time).ok());

    Ok(effective_status(parse_status(stored)?, latest_status))
}

/// A proposal of candidate plants for one customer. `current_version_number`
/// tracks the highest published version, except right after a submission is
/// pulled back into draft, when it holds the number reserved for the next
/// publish.
#[charybdis_model(
    table_name = shortlists,
    partition_keys = [id],
    clustering_keys = [],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Shortlist {
    #[serde(default)]
    pub id: Uuid,

    pub customer_id: Uuid,
    pub title: Text,
    pub description: Option<Text>,

    #[serde(default = "ShortlistStatus::default")]
    pub status: Text,

    #[serde(default)]
    pub current_version_number: Int,

    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Timestamp,
}

impl Shortlist {
    pub async fn find_or_404(db_session: &CachingSession, id: Uuid) -> Result<Shortlist, PlanterraError> {
        Shortlist::maybe_find_first_by_id(id)
            .execute(db_session)
            .await?
            .ok_or_else(|| PlanterraError::NotFound(format!("Shortlist not found: {}", id)))
    }

    pub fn parsed_status(&self) -> Result<ShortlistStatus, PlanterraError> {
        parse_status(&self.status)
    }

    pub async fn effective_status(&self, db_session: &CachingSession) -> Result<ShortlistStatus, PlanterraError> {
        derived_status(db_session, self.id, &self.status).await
    }

    /// Persist a transition outcome and keep the in-memory row in step with
    /// it.
    pub(crate) async fn apply_status(
        &mut self,
        db_session: &CachingSession,
        status: ShortlistStatus,
        current_version_number: Int,
    ) -> Result<(), PlanterraError> {
        let update = UpdateStatusShortlist {
            id: self.id,
            status: status.to_string(),
            current_version_number,
            updated_at: chrono::Utc::now(),
        };

        update.update().execute(db_session).await?;

        self.status = update.status;
        self.current_version_number = current_version_number;
        self.updated_at = update.updated_at;

        Ok(())
    }
}

impl Callbacks for Shortlist {
    type Extension = Option<()>;
    type Error = PlanterraError;

    /// New shortlists always start an empty draft cycle, whatever the
    /// payload claims, and only active customers can get one.
    async fn before_insert(
        &mut self,
        db_session: &CachingSession,
        _ext: &Self::Extension,
    ) -> Result<(), PlanterraError> {
        Customer::find_active(db_session, self.customer_id).await?;

        let now = chrono::Utc::now();

        self.id = Uuid::new_v4();
        self.status = ShortlistStatus::Draft.to_string();
        self.current_version_number = 0;
        self.created_at = now;
        self.updated_at = now;

        Ok(())
    }
}

partial_shortlist!(UpdateTitleShortlist, id, title, updated_at);

impl_updated_at_cb!(UpdateTitleShortlist);

partial_shortlist!(UpdateDescriptionShortlist, id, description, updated_at);

impl_updated_at_cb!(UpdateDescriptionShortlist);

partial_shortlist!(UpdateStatusShortlist, id, status, current_version_number, updated_at);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ShortlistStatus::Draft,
            ShortlistStatus::SentToCustomer,
            ShortlistStatus::CustomerSubmitted,
            ShortlistStatus::ToBeProcured,
            ShortlistStatus::SentBackToCustomer,
        ] {
            assert_eq!(parse_status(&status.to_string()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_stored_status_is_rejected() {
        assert!(parse_status("Archived").is_err());
    }

    #[test]
    fn stored_status_wins_without_a_submission() {
        assert_eq!(effective_status(ShortlistStatus::Draft, None), ShortlistStatus::Draft);
        assert_eq!(
            effective_status(ShortlistStatus::SentToCustomer, Some(VersionStatus::SentToCustomer)),
            ShortlistStatus::SentToCustomer
        );
    }

    #[test]
    fn latest_submission_overrides_stored_status() {
        assert_eq!(
            effective_status(ShortlistStatus::SentToCustomer, Some(VersionStatus::CustomerSubmitted)),
            ShortlistStatus::CustomerSubmitted
        );

        // the override is unconditional, so even post-submission statuses
        // report as submitted while the submission stays the latest version
        assert_eq!(
            effective_status(ShortlistStatus::ToBeProcured, Some(VersionStatus::CustomerSubmitted)),
            ShortlistStatus::CustomerSubmitted
        );
    }
}
