use crate::resources::resource::Resource;
use crate::resources::resource_locker::ResourceLocker;
use crate::session_store::RedisSessionStore;
use actix_cors::Cors;
use actix_session::config::PersistentSession;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{cookie, http};
use deadpool_redis::Pool;
use scylla::client::caching_session::CachingSession;
use std::sync::Arc;
use std::{env, fs};
use toml::Value;

#[derive(Clone)]
pub struct App {
    pub config: Value,
    pub db_session: Arc<CachingSession>,
    pub redis_pool: Arc<Pool>,
    pub resource_locker: Arc<ResourceLocker>,
}

impl App {
    pub async fn new() -> Self {
        dotenv::dotenv().ok();

        let env = env::var("ENV").expect("ENV must be set");
        let config_file = format!("config.{}.toml", env);
        let contents = fs::read_to_string(config_file).expect("Unable to read file");
        let config = contents.parse::<Value>().expect("Unable to parse TOML");

        let db_session = CachingSession::init_resource(&config).await;
        let redis_pool = Pool::init_resource(&config).await;
        let resource_locker = ResourceLocker::init_resource(&redis_pool).await;

        Self {
            config,
            db_session: Arc::new(db_session),
            redis_pool: Arc::new(redis_pool),
            resource_locker: Arc::new(resource_locker),
        }
    }

    /// Init processes that need to be run on startup
    pub fn init(&self) {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    pub fn cors(&self) -> Cors {
        let allowed_origin = self.config["allowed_origin"]
            .as_str()
            .expect("Missing allowed_origin")
            .to_string();

        Cors::default()
            .allowed_origin(allowed_origin.as_str())
            .supports_credentials()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::ORIGIN,
                http::header::USER_AGENT,
                http::header::DNT,
                http::header::CONTENT_TYPE,
                http::header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            ])
            .expose_headers(vec![http::header::LOCATION, http::header::ACCESS_CONTROL_ALLOW_ORIGIN])
            .max_age(86400)
    }

    pub fn port(&self) -> u16 {
        self.config["port"].as_integer().expect("Missing port") as u16
    }

    /// Site url customers see in share links, e.g. `https://planterra.garden`.
    pub fn public_base_url(&self) -> String {
        self.config["public_url"]
            .as_str()
            .expect("Missing public_url")
            .trim_end_matches('/')
            .to_string()
    }

    /// Server-side secret mixed into deterministic share link tokens.
    pub fn link_secret(&self) -> String {
        self.config["link_secret"]
            .as_str()
            .expect("Missing link_secret")
            .to_string()
    }

    pub fn session_middleware(&self) -> SessionMiddleware<RedisSessionStore> {
        let secret_key = self.secret_key();
        let session_store = RedisSessionStore::new(self.redis_pool.as_ref().clone());
        let expiration = self.config["session_expiration_in_days"]
            .as_integer()
            .expect("Missing session_expiration");
        let ttl = PersistentSession::default().session_ttl(cookie::time::Duration::days(expiration));

        SessionMiddleware::builder(session_store, secret_key)
            .session_lifecycle(ttl)
            .cookie_secure(false)
            .build()
    }

    fn secret_key(&self) -> Key {
        let secret_key = self.config["secret_key"]
            .as_str()
            .expect("Missing secret_key")
            .to_string();

        Key::from(secret_key.as_ref())
    }
}
