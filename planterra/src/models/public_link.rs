use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use charybdis::macros::charybdis_model;
use charybdis::operations::Insert;
use charybdis::types::{Boolean, Text, Timestamp, Uuid};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use futures::StreamExt;

use crate::constants::PUBLIC_TOKEN_LENGTH;
use crate::errors::PlanterraError;

/// Customer access grant for a shortlist. Only the hash of the bearer token
/// is stored; the token itself is recomputed from the shortlist id and the
/// server secret whenever a link is handed out.
#[charybdis_model(
    table_name = public_links,
    partition_keys = [token_hash],
    clustering_keys = [],
    global_secondary_indexes = [shortlist_id]
)]
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicLink {
    pub token_hash: Text,
    pub shortlist_id: Uuid,
    pub active: Boolean,
    pub created_at: Timestamp,
}

/// Deterministic bearer token: same shortlist and secret, same token. Lets
/// `get_or_create` stay idempotent without ever persisting the plaintext.
pub fn derive_token(shortlist_id: Uuid, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(shortlist_id.as_bytes());
    hasher.update(secret.as_bytes());

    let mut token = URL_SAFE_NO_PAD.encode(hasher.finalize());
    token.truncate(PUBLIC_TOKEN_LENGTH);

    token
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Share links must point at the customer site even when the request came
/// in through the staff console host or path.
pub fn customer_base_url(canonical: &str) -> String {
    let mut base = canonical.trim_end_matches('/').to_string();

    if let Some(stripped) = base.strip_suffix("/admin") {
        base = stripped.to_string();
    }

    base.replacen("://admin.", "://", 1)
}

pub fn public_url(canonical_base: &str, token: &str) -> String {
    format!("{}/s/{}", customer_base_url(canonical_base), token)
}

impl PublicLink {
    pub async fn find_active(
        db_session: &CachingSession,
        shortlist_id: Uuid,
    ) -> Result<Option<PublicLink>, PlanterraError> {
        let mut links = PublicLink::find_by_shortlist_id(shortlist_id).execute(db_session).await?;

        while let Some(link) = links.next().await {
            let link = link?;

            if link.active {
                return Ok(Some(link));
            }
        }

        Ok(None)
    }

    /// Returns the shareable URL, creating the link row on first request.
    /// Calling this twice always yields the same URL.
    pub async fn get_or_create(
        db_session: &CachingSession,
        shortlist_id: Uuid,
        secret: &str,
        canonical_base: &str,
    ) -> Result<String, PlanterraError> {
        let token = derive_token(shortlist_id, secret);

        if Self::find_active(db_session, shortlist_id).await?.is_none() {
            let link = PublicLink {
                token_hash: hash_token(&token),
                shortlist_id,
                active: true,
                created_at: chrono::Utc::now(),
            };

            link.insert().execute(db_session).await?;
        }

        Ok(public_url(canonical_base, &token))
    }

    /// A bad token and a deactivated link answer identically, so callers
    /// cannot probe which tokens ever existed.
    pub async fn resolve(db_session: &CachingSession, token: &str) -> Result<Uuid, PlanterraError> {
        let link = PublicLink::maybe_find_first_by_token_hash(hash_token(token))
            .execute(db_session)
            .await?;

        match link {
            Some(link) if link.active => Ok(link.shortlist_id),
            _ => Err(PlanterraError::NotFound("Shortlist not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_deterministic_per_shortlist_and_secret() {
        let id = Uuid::new_v4();

        assert_eq!(derive_token(id, "secret"), derive_token(id, "secret"));
        assert_ne!(derive_token(id, "secret"), derive_token(id, "other-secret"));
        assert_ne!(derive_token(id, "secret"), derive_token(Uuid::new_v4(), "secret"));
    }

    #[test]
    fn tokens_are_short_and_url_safe() {
        let token = derive_token(Uuid::new_v4(), "secret");

        assert_eq!(token.len(), PUBLIC_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn stored_hash_is_not_the_token() {
        let token = derive_token(Uuid::new_v4(), "secret");
        let hash = hash_token(&token);

        assert_ne!(hash, token);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn staff_hosts_are_stripped_from_share_urls() {
        assert_eq!(
            customer_base_url("https://admin.planterra.garden"),
            "https://planterra.garden"
        );
        assert_eq!(
            customer_base_url("https://planterra.garden/admin/"),
            "https://planterra.garden"
        );
        assert_eq!(customer_base_url("https://planterra.garden"), "https://planterra.garden");
    }

    #[test]
    fn share_urls_keep_the_token_path_shape() {
        let url = public_url("https://admin.planterra.garden", "abc123");

        assert_eq!(url, "https://planterra.garden/s/abc123");
    }
}
