use anyhow::{bail, Context};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warden::{
    auth::service::password_strength_error,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    types::{NewUser, UserRole},
    utils::toml_config::LogFormat,
    AppState, CredentialStore, DatabaseProvider, TursoClient, WardenConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        None | Some(Commands::Serve) => serve(&cli.config, cli.verbose).await,
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => match init::run(
            InitConfig {
                path,
                force,
                host,
                port,
            },
            &output,
        ) {
            InitResult::Success | InitResult::AlreadyExists => Ok(()),
            InitResult::Error(e) => bail!(e),
        },
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        Some(Commands::CreateAdmin {
            email,
            password,
            first_name,
            last_name,
        }) => {
            create_admin(
                &cli.config,
                NewUser {
                    email,
                    password,
                    first_name,
                    last_name,
                    role: Some(UserRole::Admin),
                    active: Some(true),
                },
                &output,
            )
            .await
        }
    }
}

async fn serve(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = WardenConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    init_tracing(&config, verbose)?;

    let secret = config.jwt_secret()?;
    let db = connect(&config).await?;
    let addr = config.bind_address();

    let app = warden::build_app(AppState::new(config, Arc::new(db), &secret));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Warden listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &WardenConfig, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Invalid log filter")?;

    let subscriber = tracing_subscriber::registry().with(filter);
    let result = match config.server.log_format {
        LogFormat::Pretty => subscriber.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    };

    result.context("Failed to init tracing")
}

async fn connect(config: &WardenConfig) -> anyhow::Result<TursoClient> {
    let provider = config.database_provider()?;

    if let DatabaseProvider::SQLite { path } = &provider {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    Ok(provider.create_client().await?)
}

fn show_config(config_path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = WardenConfig::read(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    output.header(&format!("Configuration ({})", config_path.display()));
    output.kv("server", &config.bind_address());
    output.kv("log_level", &config.server.log_level);
    output.kv("log_format", &format!("{:?}", config.server.log_format));
    output.kv("cors_origins", &config.server.cors_origins.join(", "));
    output.kv("jwt_secret_env", &config.auth.jwt_secret_env);
    output.kv("cookie_secure", &config.auth.cookie_secure.to_string());
    output.kv("database", &config.database.url);
    output.newline();

    if validate {
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                bail!("configuration is invalid");
            }
        }
    }

    Ok(())
}

async fn create_admin(config_path: &Path, admin: NewUser, output: &Output) -> anyhow::Result<()> {
    let config = WardenConfig::read(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    if let Some(message) = password_strength_error(&admin.password) {
        output.error(message);
        bail!("password rejected");
    }

    if config.database_provider()? == DatabaseProvider::Memory {
        output.warning("database.url is in-memory; the account will not outlive this command");
    }

    let credentials = CredentialStore::new(Arc::new(connect(&config).await?));
    let user = credentials.create(admin).await?;

    output.success(&format!("Created admin {} (id {})", user.full_name(), user.id));
    output.kv("email", &user.email);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
