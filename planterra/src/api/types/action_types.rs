use serde::Deserialize;

/// Shortlist lifecycle actions, as recorded in the audit trail.
#[derive(Deserialize, strum_macros::Display, Clone, Copy)]
pub enum ActionTypes {
    Publish,
    CustomerSubmit,
    DraftFromSubmission,
    Revise,
    MoveToProcurement,
    Duplicate,
}
