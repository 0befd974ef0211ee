use std::sync::Arc;

use anyhow::{Context, Result};

use sparse_bridge::{
    cli::config_path_from_args,
    config::{Config, MembershipServiceConfig},
    content::InMemoryRepository,
    logging::init_tracing,
    membership::{
        EventIngress, HttpMembershipService, MembershipService, MembershipSyncHandler,
        MembershipSyncWorker, NoopMembershipService,
    },
    resource::SparseResourceProvider,
    server,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let logging_guard = init_tracing(&config.logging)?;

    let repository = match &config.resource.seed_path {
        Some(seed_path) => InMemoryRepository::from_seed_file(seed_path)?,
        None => InMemoryRepository::new(),
    };
    tracing::info!(target: "main", entries = repository.len(), "content_store_ready");
    let provider = Arc::new(SparseResourceProvider::new(
        Arc::new(repository),
        config.resource.roots.clone(),
    ));

    let service: Arc<dyn MembershipService> = match &config.membership.service {
        MembershipServiceConfig::Noop => Arc::new(NoopMembershipService),
        MembershipServiceConfig::Http {
            config: http_config,
        } => Arc::new(
            HttpMembershipService::new(http_config)
                .context("failed to construct membership service")?,
        ),
    };
    let handler = Arc::new(MembershipSyncHandler::with_topics(
        service,
        config.membership.topics.iter().cloned(),
    ));
    let (ingress, event_rx) = EventIngress::channel(config.membership.queue_capacity);
    let worker_task = tokio::spawn(
        MembershipSyncWorker::new(handler, event_rx, config.membership.max_in_flight).run(),
    );

    let exit_reason = server::run(&config.socket_path, provider, ingress).await?;
    let dispatched = worker_task
        .await
        .context("membership worker join failed")?;

    tracing::info!(
        target: "main",
        run_id = %logging_guard.run_id(),
        exit_reason = ?exit_reason,
        dispatched_events = dispatched,
        "sparse_bridge_stopped"
    );
    Ok(())
}
