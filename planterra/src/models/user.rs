use charybdis::macros::charybdis_model;
use charybdis::types::{Boolean, Text, Timestamp, Uuid};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::PlanterraError;
use crate::models::utils::{impl_default_callbacks, impl_updated_at_cb};

/// Staff accounts. Sessions are established by the auth gateway in front of
/// this service, so there is no login route here; the session cookie is the
/// only way a `CurrentUser` enters the system.
#[derive(Copy, Clone, PartialEq, strum_macros::Display, strum_macros::EnumString)]
pub enum StaffRole {
    Horticulturist,
    Admin,
}

impl StaffRole {
    pub fn default() -> Text {
        StaffRole::Horticulturist.to_string()
    }
}

#[charybdis_model(
    table_name = users,
    partition_keys = [id],
    clustering_keys = [],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Uuid,

    pub first_name: Text,
    pub last_name: Text,
    pub email: Text,

    #[serde(default = "StaffRole::default")]
    pub role: Text,

    #[serde(default)]
    pub is_blocked: Boolean,

    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,

    #[serde(default = "chrono::Utc::now")]
    pub updated_at: Timestamp,
}

impl_default_callbacks!(User);

partial_user!(CurrentUser, id, first_name, last_name, email, role, is_blocked);

impl CurrentUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        StaffRole::from_str(&self.role).is_ok_and(|role| role == StaffRole::Admin)
    }
}

partial_user!(UpdateUser, id, first_name, last_name, email, role, is_blocked, updated_at);

impl_updated_at_cb!(UpdateUser);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_role_round_trips_through_text() {
        for role in [StaffRole::Horticulturist, StaffRole::Admin] {
            let parsed = StaffRole::from_str(&role.to_string()).unwrap();
            assert!(parsed == role);
        }
    }

    #[test]
    fn unknown_role_is_not_admin() {
        let user = CurrentUser {
            role: "Gardener".to_string(),
            ..Default::default()
        };

        assert!(!user.is_admin());
    }
}
