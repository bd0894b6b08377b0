mod app;
mod roots_commands;
mod session;
mod skills_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    skilldash_skills::ScopeFilter,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "skilldash",
    version,
    about = "Skilldash: which AI coding agents are installed, and which skills they use"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/skilldash/).
    #[arg(long, global = true, env = "SKILLDASH_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
    /// Custom data directory (overrides default data dir).
    #[arg(long, global = true, env = "SKILLDASH_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List known agents and whether they are installed.
    Agents {
        /// Include agents that were not detected.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// List installed skills.
    Skills {
        #[arg(long, default_value = "all")]
        scope: ScopeFilter,
        #[arg(long)]
        json: bool,
    },
    /// Show one skill's manifest and instructions.
    Show {
        /// Skill name, or the path of its directory.
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Check installed skills for updates.
    Check {
        #[arg(long)]
        json: bool,
    },
    /// Update every skill, or only NAME.
    Update { name: Option<String> },
    /// Install skills from a package source.
    Add {
        /// Source such as `owner/repo`, a git URL or a local path.
        source: String,
        /// Target agent id (repeatable).
        #[arg(short = 'a', long = "agent")]
        agents: Vec<String>,
        /// Install only this skill from the source (repeatable).
        #[arg(short = 's', long = "skill")]
        skills: Vec<String>,
        /// Install into the global skills directories.
        #[arg(short = 'g', long)]
        global: bool,
        /// Only list the skills the source provides.
        #[arg(long)]
        list: bool,
        /// Install every skill the source provides.
        #[arg(long)]
        all: bool,
        /// Project to install into (defaults to the current directory).
        #[arg(long, conflicts_with = "global")]
        project: Option<PathBuf>,
    },
    /// Uninstall skills.
    Remove {
        #[arg(required = true)]
        names: Vec<String>,
        /// Agent id to remove for (repeatable).
        #[arg(short = 'a', long = "agent")]
        agents: Vec<String>,
        #[arg(short = 'g', long)]
        global: bool,
        #[arg(long, conflicts_with = "global")]
        project: Option<PathBuf>,
    },
    /// Scaffold a new skill.
    Init {
        name: String,
        /// Directory to create it in (defaults to the current directory).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Manage the directories searched for project skills.
    Roots {
        #[command(subcommand)]
        action: roots_commands::RootsAction,
    },
    /// Re-scan whenever a SKILL.md changes on disk.
    #[cfg(feature = "file-watcher")]
    Watch,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "skilldash starting");

    if let Some(ref dir) = cli.config_dir {
        skilldash_config::set_config_dir(dir.clone());
    }
    if let Some(ref dir) = cli.data_dir {
        skilldash_config::set_data_dir(dir.clone());
    }

    match cli.command {
        Commands::Roots { action } => roots_commands::handle_roots(action),
        Commands::Agents { all, json } => skills_commands::agents(all, json).await,
        Commands::Skills { scope, json } => skills_commands::skills(scope, json).await,
        Commands::Show { name, json } => skills_commands::show(&name, json).await,
        Commands::Check { json } => skills_commands::check(json).await,
        Commands::Update { name } => skills_commands::update(name).await,
        Commands::Add {
            source,
            agents,
            skills,
            global,
            list,
            all,
            project,
        } => {
            let request = skilldash_bridge::ToolRequest::add(source, global, project)
                .with_agents(agents)
                .with_skills(skills)
                .list_only(list)
                .all(all);
            skills_commands::mutate(request).await
        },
        Commands::Remove {
            names,
            agents,
            global,
            project,
        } => {
            let request =
                skilldash_bridge::ToolRequest::remove(names, global, project).with_agents(agents);
            skills_commands::mutate(request).await
        },
        Commands::Init { name, dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            skills_commands::mutate(skilldash_bridge::ToolRequest::init(name, dir)).await
        },
        #[cfg(feature = "file-watcher")]
        Commands::Watch => skills_commands::watch().await,
    }
}
