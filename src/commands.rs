use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::{Cli, Commands, ConfigArgs, DownloadArgs, StartArgs};
use crate::core::error::MinemError;
use crate::core::fetch::ArtifactFetcher;
use crate::core::http::build_http_client;
use crate::core::launch::{self, LaunchOptions, LaunchOutcome};
use crate::core::project::{Project, PROPERTIES_FILE};
use crate::core::properties;
use crate::core::registry::{RegistryStore, ServerStatus};
use crate::output;

/// Per-invocation context handed to every command.
pub struct CommandContext {
    /// Directory the command was invoked from.
    pub cwd: PathBuf,
    pub registry: RegistryStore,
    pub quiet: bool,
}

impl CommandContext {
    pub async fn from_env(quiet: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("unable to read the current directory")?;
        let registry = RegistryStore::default_location()?;
        registry.ensure_exists().await?;
        Ok(Self {
            cwd,
            registry,
            quiet,
        })
    }
}

/// Dispatch a parsed command line. Returns the process exit code.
pub async fn run(cli: Cli) -> Result<i32> {
    let ctx = CommandContext::from_env(cli.quiet).await?;
    dispatch(&ctx, cli.command).await
}

pub async fn dispatch(ctx: &CommandContext, command: Commands) -> Result<i32> {
    match command {
        Commands::Init => init(ctx).await,
        Commands::Download(args) => download(ctx, args).await,
        Commands::Start(args) => start(ctx, args).await,
        Commands::Config(args) => config(ctx, args).await,
        Commands::Server => server(ctx).await,
    }
}

pub async fn init(ctx: &CommandContext) -> Result<i32> {
    let project = Project::init(&ctx.cwd).await?;

    let name = project.name();
    let path = std::fs::canonicalize(&project.root).unwrap_or_else(|_| project.root.clone());
    if ctx.registry.register(&name, &path).await? {
        info!("registered server '{}'", name);
    } else {
        warn!("a server named '{}' is already registered", name);
    }
    Ok(0)
}

pub async fn download(ctx: &CommandContext, args: DownloadArgs) -> Result<i32> {
    let project = Project::load(&ctx.cwd).await?;
    let client = build_http_client().context("unable to build the HTTP client")?;

    let fetched = ArtifactFetcher::new(client)
        .with_progress(output::download_bar(ctx.quiet))
        .fetch(
            &args.version,
            &project.server_dir(),
            &project.config.server_file,
        )
        .await
        .context("error while downloading server")?;

    info!(
        "minecraft server {} saved to {}",
        fetched.version,
        fetched.path.display()
    );
    Ok(0)
}

pub async fn start(ctx: &CommandContext, args: StartArgs) -> Result<i32> {
    let root = match &args.name {
        Some(name) => ctx.registry.lookup(name).await?.path,
        None => ctx.cwd.clone(),
    };
    let project = Project::load(&root).await?;
    let options = LaunchOptions::from_project(&project, args.detach);

    if args.detach {
        return match launch::launch(&options).await? {
            LaunchOutcome::Detached { pid } => {
                info!("server is running in the background with pid {}", pid);
                Ok(0)
            }
            LaunchOutcome::Exited(code) => Ok(code),
        };
    }

    mark_status(ctx, &root, ServerStatus::Online).await;
    let outcome = launch::launch(&options).await;
    mark_status(ctx, &root, ServerStatus::Offline).await;

    match outcome? {
        LaunchOutcome::Exited(code) => Ok(code),
        LaunchOutcome::Detached { .. } => Ok(0),
    }
}

async fn mark_status(ctx: &CommandContext, root: &Path, status: ServerStatus) {
    if let Err(e) = ctx.registry.set_status_for_path(root, status).await {
        warn!("unable to mark server {}: {}", status, e);
    }
}

pub async fn config(ctx: &CommandContext, args: ConfigArgs) -> Result<i32> {
    let project = Project::load(&ctx.cwd).await?;
    let path = project.properties_path();
    if !path.is_file() {
        anyhow::bail!(
            "{} was not found in {}, start the server once to generate it",
            PROPERTIES_FILE,
            project.server_dir().display()
        );
    }

    if args.list {
        for property in properties::list_properties(&path).await? {
            println!("{}", output::format_property(&property.key, &property.value));
        }
        return Ok(0);
    }

    let setting = args
        .setting
        .context("a setting name is required unless --list is given")?;

    match args.value {
        Some(value) => {
            properties::set_property(&path, &setting, &value).await?;
            info!("set {} to '{}'", setting, value);
        }
        None => match properties::get_property(&path, &setting).await? {
            Some(value) => println!("{}", output::format_property(&setting, &value)),
            None => return Err(MinemError::SettingNotFound(setting).into()),
        },
    }
    Ok(0)
}

pub async fn server(ctx: &CommandContext) -> Result<i32> {
    let registry = ctx.registry.load().await?;
    if registry.servers.is_empty() {
        info!("no servers registered yet, use 'minem init' to add one");
    }
    for entry in &registry.servers {
        info!("{}", output::format_server(entry));
    }
    Ok(0)
}
