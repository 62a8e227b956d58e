use std::process::ExitCode;

use tracing::{error, info, warn};

use forum_server::config::AdminConfig;
use forum_server::db::{NewUser, Role, UserRepository};
use forum_server::{hash_password, storage, AppState, AuditAction, Config, Database, WebServer};

fn load_config(path: &str) -> forum_server::Result<Config> {
    let config = match Config::load_with_env(path) {
        Ok(config) => config,
        Err(forum_server::ForumError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("{path} not found, using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
        Err(e) => return Err(e),
    };
    config.validate()?;
    Ok(config)
}

async fn ensure_admin(db: &Database, admin: &AdminConfig) -> forum_server::Result<()> {
    let repo = UserRepository::new(db.pool());
    if repo.get_by_username(&admin.username).await?.is_some()
        || repo.get_by_email(&admin.email).await?.is_some()
    {
        return Ok(());
    }

    let hash = hash_password(&admin.password)
        .map_err(|e| forum_server::ForumError::Config(format!("admin password: {e}")))?;
    let user = repo
        .create(&NewUser::new(&admin.username, &admin.email, hash).with_role(Role::Admin))
        .await?;
    info!("Created admin account {} ({})", user.username, user.id);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = forum_server::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        forum_server::logging::init_console_only(&config.logging);
    }

    info!("Forum server starting");

    let db = match Database::open(&config.database.url, config.database.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.url, e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(admin) = &config.admin {
        if let Err(e) = ensure_admin(&db, admin).await {
            warn!("Could not create admin account: {}", e);
        }
    }

    let mut app_state = AppState::new(db, &config.web);
    match storage::build_store(&config.avatars).await {
        Ok(store) => {
            info!("Avatar storage backend: {}", store.name());
            let max_bytes = (config.avatars.max_upload_size_mb as usize) * 1024 * 1024;
            app_state = app_state.with_avatar_store(store, max_bytes);
        }
        Err(e) => {
            warn!("Avatar storage unavailable, uploads disabled: {}", e);
        }
    }

    let server = match WebServer::new(&config.server, &config.web, &config.avatars, app_state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = server.addr().to_string();
    forum_server::Auditor::new().success(None, AuditAction::ServerStart, &addr);

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
