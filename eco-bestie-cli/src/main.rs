//! CLI entry point for eco-bestie

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::{Input, Select};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use eco_bestie_chat::{ChatExchange, PersonaRegistry, SamplingParams};
use eco_bestie_core::catalog::{Catalog, EntryKind};
use eco_bestie_core::config::{Config, ConfigLoader};
use eco_bestie_core::logging::init_logging;
use eco_bestie_providers::{CompletionProvider, OfflineClient, OpenAiClient};

#[derive(Parser)]
#[command(name = "eco-bestie")]
#[command(about = "Your sustainable living assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize eco-bestie configuration
    Onboard,
    /// Start an interactive chat visit
    Chat {
        /// Persona id for the system prompt
        #[arg(short, long)]
        persona: Option<String>,
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,
        /// Answer from canned tips without calling the endpoint
        #[arg(long)]
        offline: bool,
    },
    /// Ask a single question and print the reply
    Ask {
        /// The question to ask
        message: String,
        /// Persona id for the system prompt
        #[arg(short, long)]
        persona: Option<String>,
        /// Answer from canned tips without calling the endpoint
        #[arg(long)]
        offline: bool,
    },
    /// List catalog tips, products, and swaps
    Tips {
        /// Only show entries of this kind
        #[arg(short, long)]
        kind: Option<TipKind>,
    },
    /// Show resolved configuration
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TipKind {
    Product,
    EcoTip,
    Swap,
}

impl From<TipKind> for EntryKind {
    fn from(kind: TipKind) -> Self {
        match kind {
            TipKind::Product => EntryKind::Product,
            TipKind::EcoTip => EntryKind::EcoTip,
            TipKind::Swap => EntryKind::Swap,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    match cli.command {
        Commands::Onboard => cmd_onboard(&loader),
        Commands::Chat {
            persona,
            model,
            offline,
        } => cmd_chat(&loader, persona, model, offline).await,
        Commands::Ask {
            message,
            persona,
            offline,
        } => cmd_ask(&loader, message, persona, offline).await,
        Commands::Tips { kind } => cmd_tips(&loader, kind),
        Commands::Status => cmd_status(&loader),
    }
}

/// Build the exchange for one visit from config plus CLI overrides
fn build_exchange(
    config: &Config,
    persona_override: Option<String>,
    model_override: Option<String>,
    offline: bool,
) -> Result<ChatExchange> {
    let registry = PersonaRegistry::new();
    let persona_id = persona_override.unwrap_or_else(|| config.assistant.persona.clone());
    let persona = registry.find(&persona_id).ok_or_else(|| {
        let known: Vec<&str> = registry.all().iter().map(|p| p.id.as_str()).collect();
        anyhow::anyhow!(
            "Unknown persona '{}' (available: {})",
            persona_id,
            known.join(", ")
        )
    })?;

    let provider: Arc<dyn CompletionProvider> = if offline || config.provider.offline {
        Arc::new(OfflineClient::default())
    } else {
        if config.provider.api_key.trim().is_empty() {
            anyhow::bail!(
                "No API key configured. Set OPENAI_API_KEY or run `eco-bestie onboard`."
            );
        }
        Arc::new(OpenAiClient::from_config(&config.provider, &config.assistant))
    };

    let params = SamplingParams {
        model: model_override,
        max_tokens: config.assistant.max_tokens,
        temperature: config.assistant.temperature,
    };

    Ok(ChatExchange::new(
        provider,
        persona.system_prompt.clone(),
        params,
    ))
}

fn thinking_spinner() -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Thinking green thoughts... 🌱");
    spinner
}

/// Interactive chat visit: one session, one line of input at a time
async fn cmd_chat(
    loader: &ConfigLoader,
    persona: Option<String>,
    model: Option<String>,
    offline: bool,
) -> Result<()> {
    let config = loader.load()?;
    let _guard = init_logging(&config.logging);

    let mut exchange = build_exchange(&config, persona, model, offline)?;
    info!(
        persona = %config.assistant.persona,
        offline = offline || config.provider.offline,
        "Starting chat visit"
    );

    println!("{}", style("🌿 Your Eco Bestie").green().bold());
    println!("Ask me anything about sustainable living, zero waste, eco-friendly swaps, and more.");
    println!(
        "{}",
        style("Type /reset to start over, /quit to leave.").dim()
    );
    if offline || config.provider.offline {
        println!("{}", style("🧪 Offline mode is ON — no credits used.").cyan());
    }

    loop {
        let line: String = Input::new()
            .with_prompt("💬 you")
            .allow_empty(true)
            .interact_text()?;
        let trimmed = line.trim();

        match trimmed {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                exchange.reset();
                println!("{}", style("Session cleared. Fresh start!").dim());
                continue;
            }
            _ => {}
        }

        let spinner = thinking_spinner();
        let outcome = exchange.ask(trimmed).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(reply) => {
                println!("{} {}", style("🌸 eco bestie:").green().bold(), reply);
            }
            Err(err) => {
                println!("{}", style(err.user_notice()).yellow());
            }
        }
    }

    Ok(())
}

/// One-shot question
async fn cmd_ask(
    loader: &ConfigLoader,
    message: String,
    persona: Option<String>,
    offline: bool,
) -> Result<()> {
    let config = loader.load()?;
    let _guard = init_logging(&config.logging);

    let mut exchange = build_exchange(&config, persona, None, offline)?;
    info!(offline = offline || config.provider.offline, "One-shot ask");

    let spinner = thinking_spinner();
    let outcome = exchange.ask(&message).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(reply) => {
            println!("{}", reply);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", style(err.user_notice()).yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize configuration interactively
fn cmd_onboard(loader: &ConfigLoader) -> Result<()> {
    println!("{}", style("Welcome to Eco Bestie setup 🌿").green().bold());

    let mut config = loader.load().unwrap_or_default();

    let api_key: String = Input::new()
        .with_prompt("OpenAI-compatible API key (leave empty to keep current)")
        .allow_empty(true)
        .interact_text()?;
    if !api_key.trim().is_empty() {
        config.provider.api_key = api_key.trim().to_string();
    }

    let registry = PersonaRegistry::new();
    let labels: Vec<String> = registry
        .all()
        .iter()
        .map(|p| format!("{} ({})", p.display_name, p.id))
        .collect();
    let default_index = registry
        .all()
        .iter()
        .position(|p| p.id == config.assistant.persona)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Pick a persona")
        .items(&labels)
        .default(default_index)
        .interact()?;
    config.assistant.persona = registry.all()[selection].id.clone();

    loader.save(&config)?;

    println!(
        "\n{}",
        style("Configuration saved successfully!").green().bold()
    );
    println!(
        "Config location: {}",
        loader.config_dir().join("config.json").display()
    );
    println!("\nYou can now run:");
    println!("  {} - Start chatting", style("eco-bestie chat").cyan());
    println!(
        "  {} - Ask one question",
        style("eco-bestie ask 'How do I start composting?'").cyan()
    );

    Ok(())
}

/// List catalog entries
fn cmd_tips(loader: &ConfigLoader, kind: Option<TipKind>) -> Result<()> {
    let config = loader.load()?;
    let catalog = Catalog::load(&config.catalog)?;

    let entries: Vec<&eco_bestie_core::catalog::CatalogEntry> = match kind {
        Some(kind) => catalog.of_kind(kind.into()),
        None => catalog.all().iter().collect(),
    };

    if entries.is_empty() {
        println!("No catalog entries found.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {} {}",
            entry.emoji,
            style(&entry.title).bold(),
            style(format!("[{}]", entry.kind.label())).dim()
        );
        println!("   {}", entry.description);
        if let Some(link) = &entry.link {
            println!("   {}", style(link).cyan().underlined());
        }
        println!();
    }

    Ok(())
}

/// Show resolved configuration
fn cmd_status(loader: &ConfigLoader) -> Result<()> {
    let config = loader.load()?;

    println!("{}", style("Eco Bestie status").bold());
    println!("Config dir:  {}", loader.config_dir().display());
    println!("Model:       {}", config.assistant.model);
    println!("Persona:     {}", config.assistant.persona);
    println!("Temperature: {}", config.assistant.temperature);
    println!("Max tokens:  {}", config.assistant.max_tokens);
    println!("API base:    {}", config.provider.api_base);
    println!(
        "API key:     {}",
        if config.provider.api_key.trim().is_empty() {
            style("not set").red().to_string()
        } else {
            style("configured").green().to_string()
        }
    );
    println!(
        "Offline:     {}",
        if config.provider.offline { "yes" } else { "no" }
    );
    println!(
        "Catalog:     {}",
        config.catalog.path.as_deref().unwrap_or("built-in")
    );

    Ok(())
}
