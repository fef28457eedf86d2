use anyhow::{Context, Result};
use mock_api::{install_todo_routes, Interceptor, MockServer, SeedProvider, Upstream};
use mocks::{seed_task, seed_task_for_user, InMemoryTaskStore};
use std::sync::Arc;
use std::time::Duration;
use todo_core::ResourceStore;
use tracing::{error, info};

use crate::config::Config;

/// Seed provider, restricted to the configured user if there is one
pub fn create_seed_provider(config: &Config) -> SeedProvider {
    match config.seed.user_id.clone() {
        Some(user_id) => Arc::new(move || vec![seed_task_for_user(&user_id)]),
        None => Arc::new(|| vec![seed_task()]),
    }
}

/// Create the in-memory store primed with the seed
///
/// A seed that collides with itself aborts startup.
pub fn create_store(config: &Config, seed: &SeedProvider) -> Result<InMemoryTaskStore> {
    info!(id_strategy = %config.seed.id_strategy, "Creating in-memory store");

    let mut store = InMemoryTaskStore::with_id_generator(config.seed.id_strategy.generator());
    if let Err(e) = store.reset(seed()) {
        error!(error = %e, "Seed data is inconsistent");
        return Err(e).context("Failed to load seed data");
    }

    info!(
        tasks = store.task_count(),
        todos = store.todo_count(),
        "Store seeded"
    );
    Ok(store)
}

/// Create the interceptor with the to-do routes installed
pub fn create_interceptor(store: InMemoryTaskStore) -> Result<Interceptor<InMemoryTaskStore>> {
    let mut interceptor = Interceptor::new(store);
    install_todo_routes(&mut interceptor).context("Failed to install to-do routes")?;
    Ok(interceptor)
}

/// Create the upstream forwarder, if one is configured
pub fn create_upstream(config: &Config) -> Result<Option<Upstream>> {
    match &config.upstream.url {
        Some(url) => {
            info!(upstream = %url, "Forwarding unmatched requests upstream");
            let upstream = Upstream::new(url, Duration::from_secs(config.upstream.timeout_secs))
                .context("Failed to create upstream client")?;
            Ok(Some(upstream))
        }
        None => {
            info!("No upstream configured, unmatched requests get 404");
            Ok(None)
        }
    }
}

/// Create and configure the mock server
pub fn create_server(config: &Config) -> Result<MockServer<InMemoryTaskStore>> {
    info!("Creating mock server");

    let seed = create_seed_provider(config);
    let store = create_store(config, &seed)?;
    let interceptor = create_interceptor(store)?;

    let mut server = MockServer::new(Arc::new(interceptor), seed);
    if let Some(upstream) = create_upstream(config)? {
        server = server.with_upstream(upstream);
    }

    info!("Mock server created successfully");
    Ok(server)
}

/// Initialize the complete application
pub fn initialize_app(config: &Config) -> Result<MockServer<InMemoryTaskStore>> {
    config.validate().context("Invalid configuration")?;
    create_server(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocks::IdStrategy;

    #[test]
    fn test_seed_provider_uses_configured_user() {
        let mut config = Config::default();
        config.seed.user_id = Some("alice".to_string());

        let tasks = create_seed_provider(&config)();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].owner.as_deref(), Some("alice"));
        assert!(!tasks[0].is_owned_by("bob"));
    }

    #[test]
    fn test_default_seed_provider_is_shared() {
        let tasks = create_seed_provider(&Config::default())();
        assert_eq!(tasks[0].owner, None);
        assert!(tasks[0].is_owned_by("any-user"));
    }

    #[test]
    fn test_create_store_is_seeded() {
        let config = Config::default();
        let seed = create_seed_provider(&config);
        let store = create_store(&config, &seed).unwrap();
        assert_eq!(store.task_count(), 1);
        assert_eq!(store.todo_count(), 1);
    }

    #[test]
    fn test_colliding_seed_aborts_setup() {
        let config = Config::default();
        let seed: SeedProvider = Arc::new(|| {
            let task = mocks::seed_task();
            vec![task.clone(), task]
        });
        let err = create_store(&config, &seed).unwrap_err();
        assert!(format!("{err:#}").contains("Identity collision"));
    }

    #[test]
    fn test_timestamp_strategy() {
        let mut config = Config::default();
        config.seed.id_strategy = IdStrategy::Timestamp;
        let seed = create_seed_provider(&config);
        let mut store = create_store(&config, &seed).unwrap();

        let id = store.create_todo(mocks::STUB_TASK_ID, "stamped").unwrap();
        assert!(id.starts_with("stub_"));
    }

    #[test]
    fn test_create_upstream() {
        let mut config = Config::default();
        assert!(create_upstream(&config).unwrap().is_none());

        config.upstream.url = Some("http://localhost:5001".to_string());
        assert!(create_upstream(&config).unwrap().is_some());
    }

    #[test]
    fn test_initialize_app_rejects_invalid_config() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(initialize_app(&config).is_err());
    }
}
