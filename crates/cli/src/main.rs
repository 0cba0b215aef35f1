use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalogue HTTP service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect, apply migrations, and serve the HTTP API (default)
    Serve,
    /// Connect and apply migrations, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint(),
        "bookshelf bootstrap starting"
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&settings).await,
        Command::Migrate => migrate(&settings).await,
    }
}

/// Connect and register modules, then bring the schema up to date.
async fn prepare(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let pool = bookshelf_db::connect(&settings.database)
        .await
        .with_context(|| "could not load the database")?;

    let mut registry = ModuleRegistry::new();
    bookshelf_app::register_all(&mut registry, &pool);

    let applied = bookshelf_db::ensure_schema(&pool, &registry.collect_migrations())
        .await
        .with_context(|| "could not migrate db")?;
    tracing::info!(applied, "schema is up to date");

    Ok(registry)
}

async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    prepare(settings).await?;
    Ok(())
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let registry = prepare(settings).await?;
    let ctx = InitCtx { settings };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("bookshelf bootstrap complete");

    let served =
        bookshelf_http::start_server(&registry, settings, bookshelf_http::shutdown_signal()).await;

    let stopped = registry.stop_all().await;
    shutdown_outcome(served, stopped)
}

/// The server's own result wins; a failed module stop is only logged.
fn shutdown_outcome(served: anyhow::Result<()>, stopped: anyhow::Result<()>) -> anyhow::Result<()> {
    if let Err(err) = stopped {
        tracing::error!(error = ?err, "module shutdown failed");
    }
    served
}
