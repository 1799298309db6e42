macro_rules! impl_default_callbacks {
    ($struct_name:ident) => {
        impl charybdis::callbacks::Callbacks for $struct_name {
            type Error = PlanterraError;
            type Extension = Option<()>;

            crate::models::utils::created_at_cb_fn!();

            crate::models::utils::updated_at_cb_fn!();
        }
    };
}

pub(crate) use impl_default_callbacks;

macro_rules! created_at_cb_fn {
    () => {
        async fn before_insert(
            &mut self,
            _session: &scylla::client::caching_session::CachingSession,
            _ext: &Self::Extension,
        ) -> Result<(), PlanterraError> {
            let now = chrono::Utc::now();

            self.id = charybdis::types::Uuid::new_v4();
            self.created_at = now;
            self.updated_at = now;

            Ok(())
        }
    };
}
pub(crate) use created_at_cb_fn;

macro_rules! impl_updated_at_cb {
    ($struct_name:ident) => {
        impl charybdis::callbacks::Callbacks for $struct_name {
            type Error = PlanterraError;
            type Extension = Option<()>;

            crate::models::utils::updated_at_cb_fn!();
        }
    };
}
pub(crate) use impl_updated_at_cb;

macro_rules! updated_at_cb_fn {
    () => {
        async fn before_update(
            &mut self,
            _session: &scylla::client::caching_session::CachingSession,
            _ext: &Self::Extension,
        ) -> Result<(), PlanterraError> {
            self.updated_at = chrono::Utc::now();

            Ok(())
        }
    };
}
pub(crate) use updated_at_cb_fn;
