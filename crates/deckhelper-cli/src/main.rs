use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use deckhelper_api::Server;
use deckhelper_core::{
    present, top_candidates, Card, Collection, ConfigManager, DeckHelperError, RankedCommander,
    Settings,
};
use deckhelper_sources::Recommender;
use dialoguer::{theme::ColorfulTheme, Input};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deckhelper")]
#[command(about = "Commander deck helper - find commanders that fit your cards", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (pretty, json)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Directory holding default.toml and friends
    #[arg(long, global = true, env = "DECKHELPER_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a collection and rank commanders for it
    Recommend {
        /// Card to add (repeatable). Prompts interactively when omitted.
        #[arg(short, long = "card")]
        cards: Vec<String>,
    },

    /// Look up a single card by (fuzzy) name
    Lookup {
        name: String,
    },

    /// Configuration files
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init,

    /// Print the effective settings
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let settings = config.settings().clone();
    init_tracing(&settings, cli.verbose);

    if let Err(e) = execute_command(&cli, &config, settings).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ConfigManager> {
    match &cli.config_dir {
        Some(dir) => ConfigManager::from_dir(dir.clone(), None)
            .with_context(|| format!("Failed to load configuration from {}", dir.display())),
        None => ConfigManager::new().context("Failed to load configuration"),
    }
}

fn init_tracing(settings: &Settings, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Everything else stays at `warn`; the workspace crates log at `level`.
fn default_filter(level: &str) -> String {
    format!(
        "warn,deckhelper={0},deckhelper_core={0},deckhelper_sources={0},deckhelper_api={0}",
        level
    )
}

async fn execute_command(cli: &Cli, config: &ConfigManager, settings: Settings) -> Result<()> {
    match &cli.command {
        Commands::Recommend { cards } => execute_recommend(cli.output, cards, &settings).await,
        Commands::Lookup { name } => execute_lookup(cli.output, name, &settings).await,
        Commands::Config(cmd) => execute_config_command(cli, cmd, config),
        Commands::Serve { host, port } => {
            let mut settings = settings;
            if let Some(host) = host {
                settings.server.host = host.clone();
            }
            if let Some(port) = port {
                settings.server.port = *port;
            }
            let server = Server::from_settings(settings).context("Failed to start server")?;
            server.run().await?;
            Ok(())
        }
    }
}

async fn execute_recommend(
    format: OutputFormat,
    names: &[String],
    settings: &Settings,
) -> Result<()> {
    let recommender =
        Recommender::from_settings(settings).context("Failed to build HTTP clients")?;

    let collection = if names.is_empty() {
        prompt_collection(&recommender).await?
    } else {
        let mut collection = Collection::new();
        for name in names {
            if let Some(card) = lookup_or_report(&recommender, name).await? {
                collection.insert(card);
            }
        }
        collection
    };

    if collection.is_empty() {
        bail!("no cards found, nothing to recommend");
    }

    if let OutputFormat::Pretty = format {
        println!("\n{}", "Cards".cyan().bold());
        for card in &collection {
            println!("  {}", card.name);
        }
        println!(
            "{} {}",
            "Colors:".cyan().bold(),
            collection.color_identity().to_string().yellow()
        );
        println!("Finding commanders...");
    }

    let scored = recommender
        .recommend(&collection)
        .await
        .context("Failed to score commanders")?;
    let candidate_count = scored.len();
    let ranked = present(&top_candidates(scored.into_values(), recommender.top_n()));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Pretty => {
            println!(
                "{} candidates scored. Top {}:\n",
                candidate_count.to_string().yellow(),
                ranked.len()
            );
            print!("{}", render_ranked(&ranked));
        }
    }
    Ok(())
}

/// Reads names one per line until an empty line.
async fn prompt_collection(recommender: &Recommender) -> Result<Collection> {
    let theme = ColorfulTheme::default();
    let mut collection = Collection::new();
    println!("Enter card names, one per line. Empty line to finish.");

    loop {
        let name: String = Input::with_theme(&theme)
            .with_prompt(format!("Card #{}", collection.len() + 1))
            .allow_empty(true)
            .interact_text()?;
        if name.trim().is_empty() {
            break;
        }
        if let Some(card) = lookup_or_report(recommender, name.trim()).await? {
            println!("  {} {}", "Added".green(), card.name);
            collection.insert(card);
        }
    }
    Ok(collection)
}

/// Prints lookup misses and carries on; any other failure stops the run.
async fn lookup_or_report(recommender: &Recommender, name: &str) -> Result<Option<Card>> {
    match recommender.lookup(name).await {
        Ok(card) => Ok(Some(card)),
        Err(DeckHelperError::NotFound(message)) => {
            println!("  {}", message.red());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to look up {:?}", name)),
    }
}

async fn execute_lookup(format: OutputFormat, name: &str, settings: &Settings) -> Result<()> {
    let recommender =
        Recommender::from_settings(settings).context("Failed to build HTTP clients")?;
    let card = recommender.lookup(name).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Pretty => print!("{}", render_card(&card)),
    }
    Ok(())
}

fn execute_config_command(cli: &Cli, cmd: &ConfigCommands, config: &ConfigManager) -> Result<()> {
    match cmd {
        ConfigCommands::Init => {
            let path = match &cli.config_dir {
                Some(dir) => ConfigManager::write_default_config(dir)?,
                None => ConfigManager::init_user_config_dir()?,
            };
            println!("{} {}", "Configuration at".green(), path.display());
        }
        ConfigCommands::Show => {
            let settings = config.settings();
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
                OutputFormat::Pretty => {
                    println!(
                        "{} {}",
                        "# loaded from".dimmed(),
                        config.config_dir().display()
                    );
                    print!("{}", toml::to_string_pretty(settings)?);
                }
            }
        }
    }
    Ok(())
}

fn render_ranked(ranked: &[RankedCommander]) -> String {
    let mut out = String::new();
    for row in ranked {
        out.push_str(&format!("{}. {}\n", row.rank, row.name.bold()));
        out.push_str(&format!("   Score: {}/10\n", row.score.to_string().yellow()));
        for image in &row.images {
            out.push_str(&format!("   {}\n", image.dimmed()));
        }
    }
    out
}

fn render_card(card: &Card) -> String {
    let mut out = format!("{}\n", card.name.cyan().bold());
    if let Some(type_line) = &card.type_line {
        out.push_str(&format!("  {}\n", type_line));
    }
    out.push_str(&format!("  Color identity: {}\n", card.color_identity));
    out.push_str(&format!(
        "  Commander legal: {}\n",
        if card.is_commander_legal() {
            "yes".green()
        } else {
            "no".red()
        }
    ));
    for image in card.image_urls() {
        out.push_str(&format!("  {}\n", image));
    }
    out
}
