use crate::api::data::RequestData;
use crate::api::types::ActionTypes;
use crate::errors::PlanterraError;
use crate::models::audit_event::AuditEvent;
use crate::models::shortlist::{Shortlist, ShortlistStatus};

impl Shortlist {
    /// Hand the shortlist off to purchasing. Gated on the effective status
    /// so a submission recorded only in the version history still counts.
    pub async fn move_to_procurement(&mut self, data: &RequestData) -> Result<(), PlanterraError> {
        let db_session = data.db_session();

        let effective = self.effective_status(db_session).await?;

        if effective != ShortlistStatus::CustomerSubmitted {
            return Err(PlanterraError::InvalidState(format!(
                "Current status is {}, only {} can move to procurement",
                effective,
                ShortlistStatus::CustomerSubmitted
            )));
        }

        self.apply_status(db_session, ShortlistStatus::ToBeProcured, self.current_version_number)
            .await?;

        AuditEvent::staff(
            self.id,
            ActionTypes::MoveToProcurement,
            &data.current_user.role,
            data.current_user.id,
        )
        .with_statuses(effective, ShortlistStatus::ToBeProcured)
        .record(db_session)
        .await;

        Ok(())
    }
}
