use std::time::Duration;

use deadpool_redis::Pool;
use scylla::client::caching_session::CachingSession;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use toml::Value;

use crate::resources::resource_locker::ResourceLocker;

/// Resources should be alive during application runtime.
/// It's usually related to external services like db clients,
/// redis, etc.
pub trait Resource<'a> {
    type Cfg;

    #[allow(opaque_hidden_inferred_bound)]
    async fn init_resource(config: Self::Cfg) -> Self;
}

impl<'a> Resource<'a> for CachingSession {
    type Cfg = &'a Value;

    async fn init_resource(config: Self::Cfg) -> Self {
        let hosts = config["scylla"]["hosts"].as_array().expect("Missing hosts");

        let keyspace = config["scylla"]["keyspace"].as_str().expect("Missing keyspace");

        let known_nodes: Vec<&str> = hosts.iter().map(|x| x.as_str().unwrap()).collect();

        let db_session: Session = SessionBuilder::new()
            .known_nodes(&known_nodes)
            .connection_timeout(Duration::from_secs(3))
            .use_keyspace(keyspace, false)
            .build()
            .await
            .unwrap_or_else(|e| panic!("Unable to connect to scylla hosts: {:?}. \nError: {}", known_nodes, e));

        CachingSession::from(db_session, 1000)
    }
}

impl<'a> Resource<'a> for Pool {
    type Cfg = &'a Value;

    async fn init_resource(config: Self::Cfg) -> Self {
        let redis_url = config["redis"]["url"].as_str().expect("Missing redis url");

        let cfg = deadpool_redis::Config::from_url(redis_url);

        cfg.create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .expect("Failed to create pool.")
    }
}

impl<'a> Resource<'a> for ResourceLocker {
    type Cfg = &'a Pool;

    async fn init_resource(pool: &'a Pool) -> Self {
        ResourceLocker::new(pool)
    }
}
