//! educa server binary.
//!
//! Selects the deployment environment (`--env` or `EDUCA_ENV`), loads
//! configuration, opens the SQLite store, and serves the JSON API. The other
//! subcommands are the administrative interface for populating the catalog.
//!
//! ```text
//! cargo run -p educa-server -- --env production serve
//! cargo run -p educa-server -- create-user alice
//! ```

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use educa_api::auth::hash_password;
use educa_core::{
  content::{ContentKind, ItemPayload, NewItem},
  course::{NewContent, NewCourse, NewModule},
  store::CatalogStore,
  subject::NewSubject,
  user::NewUser,
};
use educa_server::{AppConfig, Environment};
use educa_store_sqlite::SqliteStore;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Educa course catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "educa.toml")]
  config: PathBuf,

  /// Deployment environment whose defaults the configuration starts from.
  #[arg(long, value_enum, env = "EDUCA_ENV", default_value_t = Environment::Development)]
  env: Environment,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,

  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,

  /// Create a user; the password is read from stdin.
  CreateUser { username: String },

  CreateSubject {
    #[arg(long)]
    title: String,
    #[arg(long)]
    slug:  String,
  },

  CreateCourse {
    /// Id of the owning user.
    #[arg(long)]
    owner:    i64,
    #[arg(long)]
    subject:  i64,
    #[arg(long)]
    title:    String,
    #[arg(long)]
    slug:     String,
    #[arg(long, default_value = "")]
    overview: String,
  },

  /// Append a module to a course, or place it with `--order`.
  AddModule {
    #[arg(long)]
    course:      i64,
    #[arg(long)]
    title:       String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    order:       Option<u32>,
  },

  /// Create a content item and place it in a module.
  AddContent {
    #[arg(long)]
    module: i64,
    /// Id of the authoring user.
    #[arg(long)]
    owner:  i64,
    /// One of `text`, `file`, `image`, `video`.
    #[arg(long)]
    kind:   ContentKind,
    #[arg(long)]
    title:  String,
    /// Uploaded file path, or the URL for a video.
    #[arg(long)]
    source: String,
    #[arg(long)]
    order:  Option<u32>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Serve);

  // Helper mode: hash a password and exit.
  if let Command::HashPassword = command {
    let password = read_password()?;
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let settings = AppConfig::load(cli.env, &cli.config)
    .with_context(|| format!("failed to load {} configuration", cli.env))?;

  let store_path = settings.database_path()?;
  let store = SqliteStore::open(store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match command {
    Command::Serve => serve(settings, store).await,
    Command::HashPassword => Ok(()),
    Command::CreateUser { username } => {
      let password_hash = hash_password(&read_password()?)
        .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
      let user = store.create_user(NewUser { username, password_hash }).await?;
      tracing::info!(id = user.id, username = %user.username, "user created");
      print_json(&user)
    }
    Command::CreateSubject { title, slug } => {
      print_json(&store.create_subject(NewSubject { title, slug }).await?)
    }
    Command::CreateCourse { owner, subject, title, slug, overview } => {
      let course = store
        .create_course(NewCourse { owner, subject, title, slug, overview })
        .await?;
      print_json(&course)
    }
    Command::AddModule { course, title, description, order } => {
      let module = store
        .add_module(NewModule { course, title, description, order })
        .await?;
      print_json(&module)
    }
    Command::AddContent { module, owner, kind, title, source, order } => {
      let payload = match kind {
        ContentKind::Text => ItemPayload::Text { file: source },
        ContentKind::File => ItemPayload::File { file: source },
        ContentKind::Image => ItemPayload::Image { file: source },
        ContentKind::Video => ItemPayload::Video { url: source },
      };
      let item = store.create_item(NewItem { owner, title, payload }).await?;
      let content = store
        .add_content(NewContent { module, item: item.item_ref(), order })
        .await?;
      print_json(&content)
    }
  }
}

async fn serve(settings: AppConfig, store: SqliteStore) -> anyhow::Result<()> {
  // Both were validated on load.
  let cache    = settings.cache.backend()?;
  let realtime = settings.realtime.backends()?;
  tracing::info!(environment = %settings.environment, %cache, ?realtime, "backends configured");

  let app = educa_server::app(Arc::new(store));
  let address = settings.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Read a password from the first line of stdin.
fn read_password() -> anyhow::Result<String> {
  let stdin = io::stdin();
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
