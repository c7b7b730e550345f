use actix_web::{web, App, HttpServer};
use clap::Parser;
use countries_api::config::{Config, StartupError};
use countries_api::db::Database;
use countries_api::job_controller::state::{start_job_updater, JobsState};
use countries_api::sync::{BulkLoader, Fetcher, GithubSource, SyncService};
use countries_api::{configure_app, AppState};
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;

#[actix_web::main]
async fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::parse();

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    config.validate()?;

    let db = Database::open(&config.database_path)?;
    info!("Connected to database at {}", config.database_path.display());

    std::fs::create_dir_all(&config.data_dir).map_err(|source| StartupError::DataDir {
        path: config.data_dir.clone(),
        source,
    })?;

    let source = GithubSource::new(&config.github_api_url)?
        .with_ref(config.source_ref.clone())
        .with_token(config.github_token.clone());
    let fetcher = Fetcher::new(Arc::new(source), config.max_concurrent_fetches);
    let loader = BulkLoader::new(db.clone());
    let sync = SyncService::new(fetcher, loader, config.pipeline());

    let (jobs, rx) = JobsState::new();
    let updater_state = jobs.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    let state = AppState::new(db, sync, jobs);
    let sync_path = config.sync_path.clone();
    info!(
        "Server running at http://{}:{} (sync endpoint {})",
        config.host, config.port, sync_path
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.db.clone())
            .app_data(state.sync.clone())
            .app_data(state.jobs.clone())
            .configure(|cfg| configure_app(cfg, &sync_path))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
