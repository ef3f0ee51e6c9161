use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::RwLock;

use clashdash_cli::commands::{self, BoostRequest};
use clashdash_cli::logging::init_logging;
use clashdash_cli::readline;
use clashdash_cli::state::CliState;
use clashdash_core::{AppConfig, BoostKind};
use clashdash_types::UpgradeCategory;

#[tokio::main]
async fn main() -> Result<(), String> {
    let loaded = AppConfig::load();
    let log_dir = loaded.as_ref().ok().and_then(|config| config.log_dir.clone());
    let _log_guard = init_logging(log_dir.as_deref());
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Using default config");
        AppConfig::default()
    });
    let state = Arc::new(RwLock::new(CliState::with_config(config)));

    // One-shot mode when invoked with a subcommand
    if std::env::args().len() > 1 {
        let cli = Cli::try_parse_from(std::env::args()).map_err(|e| e.to_string())?;
        dispatch(cli, state).await?;
        return Ok(());
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Boost-aware upgrade timers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a game export (`-` reads stdin)
    Import { path: String },
    /// Running upgrades with boosted timers
    Status,
    /// Builders widget view
    Widget,
    Profiles,
    AddProfile {
        tag: String,
        #[arg(short, long)]
        builders: Option<u32>,
    },
    Select { index: usize },
    Rename {
        index: usize,
        name: String,
        #[arg(short, long)]
        tag: Option<String>,
    },
    DeleteProfile { index: usize },
    /// Start a boost now
    Boost {
        kind: BoostArg,
        /// Defaults to the in-game duration of the boost
        #[arg(short, long)]
        minutes: Option<i64>,
        /// Helper level for apprentice and assistant
        #[arg(short, long)]
        level: Option<u8>,
        /// Row from `status` a helper works on
        #[arg(short, long)]
        target: Option<usize>,
        /// Queue for a category boost
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Explicit bonus overriding the default
        #[arg(long)]
        bonus: Option<f64>,
    },
    ClearBoosts,
    GoldPass { percent: i64 },
    /// Planned completion notifications
    Notifications {
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },
    /// Drop finished upgrades and expired boosts
    Prune,
    /// Forget the current profile's imported data
    Clear,
    /// Back to a single empty profile
    Reset,
    /// Fetch the current profile from the game API
    Refresh,
    Config,
    Exit,
}

#[derive(Clone, Copy, ValueEnum)]
enum BoostArg {
    ClockTower,
    BuilderPotion,
    ResearchPotion,
    PetPotion,
    BuilderApprentice,
    LabAssistant,
    Category,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    HomeVillage,
    Laboratory,
    PetHouse,
    BuilderBase,
    StarLab,
}

impl From<CategoryArg> for UpgradeCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::HomeVillage => Self::HomeVillage,
            CategoryArg::Laboratory => Self::Laboratory,
            CategoryArg::PetHouse => Self::PetHouse,
            CategoryArg::BuilderBase => Self::BuilderBase,
            CategoryArg::StarLab => Self::StarLab,
        }
    }
}

fn boost_kind(arg: BoostArg, category: Option<CategoryArg>) -> Result<BoostKind, String> {
    Ok(match arg {
        BoostArg::ClockTower => BoostKind::ClockTower,
        BoostArg::BuilderPotion => BoostKind::BuilderPotion,
        BoostArg::ResearchPotion => BoostKind::ResearchPotion,
        BoostArg::PetPotion => BoostKind::PetPotion,
        BoostArg::BuilderApprentice => BoostKind::BuilderApprentice,
        BoostArg::LabAssistant => BoostKind::LabAssistant,
        BoostArg::Category => BoostKind::CategoryWide {
            category: category
                .ok_or("category boost needs --category")?
                .into(),
        },
    })
}

async fn respond(line: &str, state: Arc<RwLock<CliState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "clashdash".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    dispatch(cli, state).await
}

async fn dispatch(cli: Cli, state: Arc<RwLock<CliState>>) -> Result<bool, String> {
    match cli.command {
        Some(Commands::Import { path }) => commands::import_file(&path, state).await?,
        Some(Commands::Status) => commands::show_status(state).await?,
        Some(Commands::Widget) => commands::show_widget(state).await?,
        Some(Commands::Profiles) => commands::list_profiles(state).await?,
        Some(Commands::AddProfile { tag, builders }) => {
            commands::add_profile(&tag, builders, state).await?
        }
        Some(Commands::Select { index }) => commands::select_profile(index, state).await?,
        Some(Commands::Rename { index, name, tag }) => {
            commands::rename_profile(index, &name, tag.as_deref(), state).await?
        }
        Some(Commands::DeleteProfile { index }) => commands::delete_profile(index, state).await?,
        Some(Commands::Boost {
            kind,
            minutes,
            level,
            target,
            category,
            bonus,
        }) => {
            let request = BoostRequest {
                kind: boost_kind(kind, category)?,
                minutes,
                level,
                target,
                bonus,
            };
            commands::add_boost(request, state).await?
        }
        Some(Commands::ClearBoosts) => commands::clear_boosts(state).await?,
        Some(Commands::GoldPass { percent }) => commands::set_gold_pass(percent, state).await?,
        Some(Commands::Notifications { on, off }) => {
            let enable = match (on, off) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::show_notifications(enable, state).await?
        }
        Some(Commands::Prune) => commands::prune(state).await?,
        Some(Commands::Clear) => commands::clear_data(state).await?,
        Some(Commands::Reset) => commands::reset(state).await?,
        Some(Commands::Refresh) => commands::refresh(state).await?,
        Some(Commands::Config) => commands::show_settings(state).await?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
