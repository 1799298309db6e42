use charybdis::types::{Int, Text, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::Deserialize;

use crate::api::data::RequestData;
use crate::api::types::ActionTypes;
use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::draft_item::{validate_quantity, DraftItem};
use crate::models::shortlist::{Shortlist, ShortlistStatus};
use crate::models::version::{Version, VersionStatus};
use crate::models::version_item::VersionItem;

/// One line of a customer's response, sent through the public link.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedItem {
    pub plant_id: Option<Uuid>,
    pub quantity: Option<Int>,
    pub note: Option<Text>,
    pub why_picked: Option<Text>,
}

impl SubmittedItem {
    fn into_version_item(self, version_id: Uuid) -> Result<VersionItem, PlanterraError> {
        let plant_id = self.plant_id.ok_or_else(|| {
            PlanterraError::ValidationError(("plantId".to_string(), "every item needs a plant".to_string()))
        })?;

        validate_quantity(self.quantity)?;

        Ok(VersionItem {
            version_id,
            id: Uuid::new_v4(),
            plant_id,
            quantity: self.quantity,
            note: self.note,
            why_picked: self.why_picked,
            horticulturist_note: None,
            approved: true,
            midpoint_price: None,
            created_at: chrono::Utc::now(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub items: Vec<SubmittedItem>,
    pub customer_notes: Option<Text>,
}

impl SubmissionPayload {
    fn into_version_items(self, version_id: Uuid) -> Result<Vec<VersionItem>, PlanterraError> {
        if self.items.is_empty() {
            return Err(PlanterraError::ValidationError((
                "items".to_string(),
                "submission must contain at least one item".to_string(),
            )));
        }

        self.items
            .into_iter()
            .map(|item| item.into_version_item(version_id))
            .collect()
    }
}

pub struct SubmitOutcome {
    pub version_number: Int,
}

impl Shortlist {
    /// Record the customer's picks as a new version. Comes in through the
    /// public link, so there is no staff actor and validation errors must
    /// stay free of internal detail.
    pub async fn customer_submit(
        &mut self,
        db_session: &CachingSession,
        payload: SubmissionPayload,
    ) -> Result<SubmitOutcome, PlanterraError> {
        let base = Version::latest_of_status(db_session, self.id, VersionStatus::SentToCustomer).await?;

        if base.is_none() {
            return Err(PlanterraError::InvalidState(
                "No proposal is awaiting a response".to_string(),
            ));
        }

        let prior_status = self.parsed_status()?;
        let next_number = Version::next_number(db_session, self.id).await?;

        let customer_notes = payload.customer_notes.clone();
        let version = Version::new_submission(self.id, next_number, customer_notes);
        let items = payload.into_version_items(version.id)?;

        version.create_with_items(db_session, &items).await?;

        // The status update is the last write. If it fails the version must
        // go too, otherwise the history would show a submission the
        // shortlist never acknowledged.
        if let Err(error) = self
            .apply_status(db_session, ShortlistStatus::CustomerSubmitted, next_number)
            .await
        {
            version.discard_with_items(db_session).await?;

            return Err(error);
        }

        AuditEvent::customer(self.id, ActionTypes::CustomerSubmit)
            .with_statuses(prior_status, ShortlistStatus::CustomerSubmitted)
            .with_detail(format!("Submitted version {}", next_number))
            .record(db_session)
            .await;

        Ok(SubmitOutcome {
            version_number: next_number,
        })
    }

    /// Pull the customer's latest submission back into the draft workspace
    /// so the horticulturist can rework it. Reserves the next version number
    /// without writing a version; the following publish consumes it. Repeat
    /// calls before that publish land on the same reservation.
    pub async fn create_draft_from_submission(&mut self, data: &RequestData) -> Result<Int, PlanterraError> {
        let db_session = data.db_session();

        let submission = Version::latest_of_status(db_session, self.id, VersionStatus::CustomerSubmitted)
            .await?
            .ok_or_else(|| {
                PlanterraError::InvalidState(format!("Shortlist {} has no customer submission to review", self.id))
            })?;

        let items = VersionItem::for_version(db_session, submission.id).await?;
        let drafts: Vec<DraftItem> = items
            .iter()
            .map(|item| DraftItem::from_version_item(self.id, item))
            .collect();

        DraftItem::replace_for_shortlist(db_session, self.id, &drafts).await?;

        let prior_status = self.parsed_status()?;

        // The reservation comes from the version history, not the stored
        // counter. The counter may already hold a reservation from an
        // earlier call, and it must never point at a number no publish
        // will materialize.
        let reserved_number = Version::next_number(db_session, self.id).await?;

        self.apply_status(db_session, ShortlistStatus::Draft, reserved_number)
            .await?;

        AuditEvent::staff(
            self.id,
            ActionTypes::DraftFromSubmission,
            &data.current_user.role,
            data.current_user.id,
        )
        .with_statuses(prior_status, ShortlistStatus::Draft)
        .with_detail(format!("Seeded draft from version {}", submission.number))
        .record(db_session)
        .await;

        Ok(reserved_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::version::next_number_after;

    fn submitted(plant_id: Option<Uuid>, quantity: Option<Int>) -> SubmittedItem {
        SubmittedItem {
            plant_id,
            quantity,
            note: Some("by the window".to_string()),
            why_picked: Some("low light tolerant".to_string()),
        }
    }

    #[test]
    fn item_without_plant_is_rejected() {
        let result = submitted(None, Some(1)).into_version_item(Uuid::new_v4());

        assert!(matches!(result, Err(PlanterraError::ValidationError(_))));
    }

    #[test]
    fn item_with_zero_quantity_is_rejected() {
        let result = submitted(Some(Uuid::new_v4()), Some(0)).into_version_item(Uuid::new_v4());

        assert!(matches!(result, Err(PlanterraError::ValidationError(_))));
    }

    #[test]
    fn submitted_fields_map_onto_the_version_item() {
        let plant_id = Uuid::new_v4();
        let version_id = Uuid::new_v4();

        let item = submitted(Some(plant_id), Some(4))
            .into_version_item(version_id)
            .unwrap();

        assert_eq!(item.version_id, version_id);
        assert_eq!(item.plant_id, plant_id);
        assert_eq!(item.quantity, Some(4));
        assert_eq!(item.note.as_deref(), Some("by the window"));
        assert_eq!(item.why_picked.as_deref(), Some("low light tolerant"));
        assert!(item.approved);
        assert_eq!(item.midpoint_price, None);
    }

    #[test]
    fn empty_submission_is_rejected() {
        let payload = SubmissionPayload {
            items: vec![],
            customer_notes: None,
        };

        let result = payload.into_version_items(Uuid::new_v4());

        assert!(matches!(result, Err(PlanterraError::ValidationError(_))));
    }

    #[test]
    fn draft_seeding_reserves_the_number_after_the_latest_version() {
        // The reservation follows the history, so seeding a draft twice
        // from the same submission lands on the same number and the
        // counter never runs ahead of a version that will exist.
        let latest = Some(2);

        let reserved = next_number_after(latest);

        assert_eq!(reserved, 3);
        assert_eq!(next_number_after(latest), reserved);
    }
}
