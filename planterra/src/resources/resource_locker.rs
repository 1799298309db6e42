use charybdis::types::Uuid;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{redis, Pool};

use crate::errors::PlanterraError;

const LOCK_NAMESPACE: &str = "LOCK";

/// Resource Locker uses redis to lock resources.
/// Shortlist status transitions hold the shortlist lock for the whole
/// read-increment-write sequence, so two concurrent transitions on the
/// same shortlist cannot interleave.
#[derive(Clone)]
pub struct ResourceLocker {
    pool: Pool,
}

impl ResourceLocker {
    pub const TWO_SECONDS: usize = 2000;
    pub const FIVE_MINUTES: usize = 1000 * 60 * 5;

    const RETRY_LOCK_TIMEOUT: u64 = 500;
    const RESOURCE_LOCK_ERROR: PlanterraError =
        PlanterraError::ResourceLocked("Shortlist is being updated by another request. Try again shortly.");

    pub fn new(pool: &Pool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn lock_resource(&self, id: Uuid, ttl: usize) -> Result<(), PlanterraError> {
        let mut connection = self.pool.get().await?;

        self.validate_resource_unlocked(id, true).await?;

        redis::cmd("SET")
            .arg(self.key(id))
            .arg("1")
            .arg("NX")
            .arg("PX")
            .arg(ttl)
            .query_async::<()>(&mut *connection)
            .await
            .map_err(|e| PlanterraError::LockerError(format!("Failed to lock resource: {}! Error: {:?}", id, e)))?;

        Ok(())
    }

    pub async fn unlock_resource(&self, id: Uuid) -> Result<bool, PlanterraError> {
        let mut connection = self.pool.get().await?;

        let res = connection
            .del(self.key(id))
            .await
            .map_err(|e| PlanterraError::LockerError(format!("Failed to unlock resource: {}! Error: {:?}", id, e)))?;

        Ok(res)
    }

    pub async fn validate_resource_unlocked(&self, id: Uuid, retry: bool) -> Result<(), PlanterraError> {
        if self.is_resource_locked(id).await? {
            if retry {
                tokio::time::sleep(tokio::time::Duration::from_millis(Self::RETRY_LOCK_TIMEOUT)).await;

                if self.is_resource_locked(id).await? {
                    return Err(Self::RESOURCE_LOCK_ERROR);
                }
            } else {
                return Err(Self::RESOURCE_LOCK_ERROR);
            }
        }

        Ok(())
    }

    async fn is_resource_locked(&self, id: Uuid) -> Result<bool, PlanterraError> {
        let mut connection = self.pool.get().await?;

        let res = connection.exists(self.key(id)).await.map_err(|e| {
            PlanterraError::LockerError(format!("Failed to check if resource: {} is locked! Error: {:?}", id, e))
        })?;

        Ok(res)
    }

    fn key(&self, id: Uuid) -> String {
        format!("{}:{}", LOCK_NAMESPACE, id)
    }
}
