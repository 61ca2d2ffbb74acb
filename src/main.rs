use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use healthtrack::commands;
use healthtrack::config;
use healthtrack::platform;
use healthtrack::session::clock::now_ms;
use healthtrack::units::Kind;
use healthtrack::OutputFormat;

#[derive(Parser)]
#[command(name = "htrack")]
#[command(about = "Activity, water and body tracking from the terminal")]
#[command(version)]
struct Cli {
    /// Pin the current time (ms since epoch)
    #[arg(long, global = true, hide = true)]
    now: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activity session timing
    Session(SessionArgs),

    /// Convert a measurement between base and display units
    Convert {
        #[arg(value_enum)]
        kind: Kind,
        #[arg(help = "Value to convert", allow_negative_numbers = true)]
        value: f64,
        #[arg(long, help = "Convert a base value into this unit")]
        to: Option<String>,
        #[arg(long, help = "Convert a value in this unit back to base")]
        from: Option<String>,
    },

    /// Unit and language preferences
    Settings(SettingsArgs),

    /// Height and weight
    Profile(ProfileArgs),

    /// Water intake log
    Water(WaterArgs),

    /// Settings API credentials
    Auth(AuthArgs),

    /// Show or change configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct SessionArgs {
    #[command(subcommand)]
    action: SessionAction,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Start a new session
    Start,
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Stop the session and print its active time
    Stop,
    /// Show the current session
    Status {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the elapsed time periodically
    Watch {
        #[arg(long, help = "Seconds between updates (defaults to config)")]
        interval: Option<u64>,
        #[arg(long, help = "Stop after this many updates")]
        ticks: Option<u32>,
    },
}

#[derive(Args)]
struct SettingsArgs {
    #[command(subcommand)]
    action: SettingsAction,
}

#[derive(Subcommand)]
enum SettingsAction {
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// e.g. `settings set water "fl oz"`
    Set { field: String, unit: String },
}

#[derive(Args)]
struct ProfileArgs {
    #[command(subcommand)]
    action: ProfileAction,
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    SetHeight {
        value: f64,
        #[arg(long, help = "cm or ft (defaults to preference)")]
        unit: Option<String>,
    },
    SetWeight {
        value: f64,
        #[arg(long, help = "kg or g (defaults to preference)")]
        unit: Option<String>,
    },
}

#[derive(Args)]
struct WaterArgs {
    #[command(subcommand)]
    action: WaterAction,
}

#[derive(Subcommand)]
enum WaterAction {
    /// Log an intake
    Add {
        amount: f64,
        #[arg(long, help = "ml or \"fl oz\" (defaults to preference)")]
        unit: Option<String>,
    },
    /// Show today's total
    Today,
}

#[derive(Args)]
struct AuthArgs {
    #[command(subcommand)]
    action: AuthAction,
}

#[derive(Subcommand)]
enum AuthAction {
    Login { token: String },
    Logout,
    Status,
}

#[derive(Parser)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Set { key: String, value: String },
    Get { key: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = config::load().unwrap_or_else(|e| {
        log::debug!("using default config: {:#}", e);
        config::Config::default()
    });

    let now = cli.now.unwrap_or_else(now_ms);

    // Commands that never touch the store
    match &cli.command {
        Commands::Convert {
            kind,
            value,
            to,
            from,
        } => {
            return commands::convert::convert(*kind, *value, to.as_deref(), from.as_deref());
        }
        Commands::Auth(args) => {
            return match &args.action {
                AuthAction::Login { token } => commands::auth::login(token),
                AuthAction::Logout => commands::auth::logout(),
                AuthAction::Status => commands::auth::status(&config),
            };
        }
        Commands::Config(args) => {
            return match &args.action {
                ConfigAction::List => commands::config::list(&config),
                ConfigAction::Set { key, value } => commands::config::set(key, value),
                ConfigAction::Get { key } => commands::config::get(key, &config),
            };
        }
        _ => {}
    }

    let store = platform::open_store(config.state.state_dir_override.as_ref())?;

    match &cli.command {
        Commands::Session(args) => match &args.action {
            SessionAction::Start => commands::session::start(&store, now)?,
            SessionAction::Pause => commands::session::pause(&store, now)?,
            SessionAction::Resume => commands::session::resume(&store, now)?,
            SessionAction::Stop => commands::session::stop(&store, now)?,
            SessionAction::Status { format } => commands::session::status(&store, now, *format)?,
            SessionAction::Watch { interval, ticks } => {
                commands::session::watch(&config, &store, *interval, *ticks, cli.now)?
            }
        },
        Commands::Settings(args) => match &args.action {
            SettingsAction::List { format } => commands::settings::list(&store, *format)?,
            SettingsAction::Set { field, unit } => {
                commands::settings::set(&config, &store, field, unit)?
            }
        },
        Commands::Profile(args) => match &args.action {
            ProfileAction::Show => commands::profile::show(&store)?,
            ProfileAction::SetHeight { value, unit } => {
                commands::profile::set_height(&store, *value, unit.as_deref())?
            }
            ProfileAction::SetWeight { value, unit } => {
                commands::profile::set_weight(&store, *value, unit.as_deref())?
            }
        },
        Commands::Water(args) => match &args.action {
            WaterAction::Add { amount, unit } => {
                commands::water::add(&store, *amount, unit.as_deref(), now)?
            }
            WaterAction::Today => commands::water::today(&store, now)?,
        },
        Commands::Convert { .. } | Commands::Auth(_) | Commands::Config(_) => {}
    }

    Ok(())
}
