//! Command-line front end for Grandma's Kitchen: style inference, catalog
//! search, knowledge-context assembly, recipe generation, and the eval
//! harness with its release gate. JSON goes to stdout, logs and human
//! messages to stderr, and a failed gate exits nonzero.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::KitchenConfig;
use env_logger::Env;
use kitchen_evals::{baseline_cases, load_cases, run_harness, RunStore, RunSummary};
use kitchen_generate::{GenerationRequest, RecipeClient};
use kitchen_knowledge::{build_context, EmbeddingProvider, KnowledgeInput, PackLibrary};
use kitchen_personalization::{
    extract_regional_signals, personalization_context, PreferenceStore,
};
use kitchen_protocol::RegenerationStyle;
use kitchen_style::{infer_style, search_styles, InferenceRequest, StyleCatalog, StyleQuery};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grandmas-kitchen", version)]
#[command(about = "Grandma's Kitchen: cooking style inference, cuisine knowledge retrieval, recipe generation, and eval gating")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API key override (GRANDMAS_KITCHEN_API_KEY, falling back to OPENAI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Chat model override (OPENAI_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// API base URL override (GRANDMAS_KITCHEN_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Data directory for the taste profile, embedding cache, and eval runs
    /// (GRANDMAS_KITCHEN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the cooking style behind a food memory or request
    Infer {
        /// The user's message or food memory
        #[arg(long)]
        message: String,

        /// Conversation thread id, when this message continues one
        #[arg(long)]
        thread_id: Option<String>,

        /// Style id already active in the conversation
        #[arg(long)]
        current_style: Option<String>,

        /// Path to a style catalog JSON file (default: builtin catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Search the style catalog
    Styles {
        /// Free-text query over labels, regions, and aliases
        #[arg(long)]
        query: Option<String>,

        /// Restrict matches to one cuisine
        #[arg(long)]
        cuisine: Option<String>,

        /// Maximum number of matches
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Assemble the knowledge context a generation request would receive
    Context {
        #[arg(long)]
        cuisine: String,

        #[arg(long)]
        prompt: String,

        /// Regional style label, e.g. "Sicilian"
        #[arg(long)]
        regional_style: Option<String>,

        /// Regeneration style: faster, traditional, or vegetarian
        #[arg(long)]
        regeneration: Option<String>,

        /// Skip the embedding rerank and keep lexical snippet order
        #[arg(long)]
        no_rerank: bool,

        /// Output format: json or prompt
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Generate a recipe
    Generate {
        #[arg(long)]
        cuisine: String,

        /// Grandma persona name, e.g. "Nonna Rosa"
        #[arg(long)]
        persona: String,

        #[arg(long)]
        prompt: String,

        /// Regeneration style: faster, traditional, or vegetarian
        #[arg(long)]
        regeneration: Option<String>,

        /// Force the deterministic mock generator even when a key is set
        #[arg(long)]
        mock_only: bool,
    },

    /// Run the eval harness or inspect stored runs
    Eval {
        #[command(subcommand)]
        command: EvalCommands,
    },
}

#[derive(Subcommand)]
enum EvalCommands {
    /// Run the case suite and persist the summary. Exits 1 when the
    /// release gate fails.
    Run {
        /// Path to a custom case file (default: builtin baseline suite)
        #[arg(long)]
        cases: Option<PathBuf>,
    },

    /// Print the most recent stored run. Exits 1 when its gate failed.
    Latest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = KitchenConfig::from_env();
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(model) = cli.model {
        config.model = Some(model);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Infer {
            message,
            thread_id,
            current_style,
            catalog,
        } => run_infer(&config, &message, thread_id, current_style, catalog),
        Commands::Styles {
            query,
            cuisine,
            limit,
        } => run_styles(query, cuisine, limit),
        Commands::Context {
            cuisine,
            prompt,
            regional_style,
            regeneration,
            no_rerank,
            format,
        } => {
            run_context(
                &config,
                &cuisine,
                &prompt,
                regional_style,
                regeneration,
                no_rerank,
                &format,
            )
            .await
        }
        Commands::Generate {
            cuisine,
            persona,
            prompt,
            regeneration,
            mock_only,
        } => run_generate(&config, &cuisine, &persona, &prompt, regeneration, mock_only).await,
        Commands::Eval { command } => match command {
            EvalCommands::Run { cases } => run_eval(&config, cases).await,
            EvalCommands::Latest => run_eval_latest(&config),
        },
    }
}

fn parse_regeneration(value: &str) -> anyhow::Result<RegenerationStyle> {
    RegenerationStyle::parse(value).ok_or_else(|| {
        let known: Vec<&str> = RegenerationStyle::ALL.iter().map(|s| s.as_str()).collect();
        anyhow::anyhow!(
            "unknown regeneration style '{value}' (expected one of: {})",
            known.join(", ")
        )
    })
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

fn run_infer(
    config: &KitchenConfig,
    message: &str,
    thread_id: Option<String>,
    current_style: Option<String>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<()> {
    let catalog = match catalog {
        Some(path) => StyleCatalog::from_path(&path)
            .with_context(|| format!("failed to load style catalog from {}", path.display()))?,
        None => StyleCatalog::builtin(),
    };

    let store = PreferenceStore::open(config.profile_path())
        .context("failed to open the taste profile")?;

    let request = InferenceRequest {
        message,
        thread_id: thread_id.as_deref(),
        current_style_id: current_style.as_deref(),
        preference_weights: store.style_weights(),
    };
    let inference = infer_style(&catalog, &request).context("style inference failed")?;
    print_json(&inference)
}

fn run_styles(
    query: Option<String>,
    cuisine: Option<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let catalog = StyleCatalog::builtin();
    let matches = search_styles(
        &catalog,
        &StyleQuery {
            query: query.as_deref(),
            cuisine: cuisine.as_deref(),
            limit,
        },
    );
    log::info!("{} style(s) matched", matches.len());
    print_json(&matches)
}

async fn run_context(
    config: &KitchenConfig,
    cuisine: &str,
    prompt: &str,
    regional_style: Option<String>,
    regeneration: Option<String>,
    no_rerank: bool,
    format: &str,
) -> anyhow::Result<()> {
    let regeneration_style = regeneration.as_deref().map(parse_regeneration).transpose()?;

    let library = PackLibrary::builtin();
    let input = KnowledgeInput {
        cuisine,
        persona_name: "",
        prompt,
        regional_style: regional_style.as_deref(),
        regeneration_style,
    };

    let embedder = if no_rerank { None } else { config.embedder() };
    if embedder.is_none() && !no_rerank {
        log::debug!("no API key, skipping the embedding rerank");
    }
    let context = build_context(
        &library,
        &input,
        embedder.as_ref().map(|e| e as &dyn EmbeddingProvider),
    )
    .await;

    match format {
        "prompt" => {
            println!("{}", context.format_for_prompt());
            Ok(())
        }
        "json" => print_json(&context),
        other => anyhow::bail!("unknown format '{other}' (expected json or prompt)"),
    }
}

async fn run_generate(
    config: &KitchenConfig,
    cuisine: &str,
    persona: &str,
    prompt: &str,
    regeneration: Option<String>,
    mock_only: bool,
) -> anyhow::Result<()> {
    let regeneration_style = regeneration.as_deref().map(parse_regeneration).transpose()?;
    let now = chrono::Utc::now();

    let mut store = PreferenceStore::open(config.profile_path())
        .context("failed to open the taste profile")?;
    let personalization = personalization_context(&store, cuisine, Some(prompt), now);

    let embedder = if mock_only { None } else { config.embedder() };
    let library = PackLibrary::builtin();
    let knowledge = build_context(
        &library,
        &KnowledgeInput {
            cuisine,
            persona_name: persona,
            prompt,
            regional_style: personalization.regional_style.as_deref(),
            regeneration_style,
        },
        embedder.as_ref().map(|e| e as &dyn EmbeddingProvider),
    )
    .await;

    let client = if mock_only {
        RecipeClient::new(None)
    } else {
        config.recipe_client()
    };
    let recipe = client
        .generate_recipe(&GenerationRequest {
            persona_name: persona,
            cuisine,
            prompt,
            regional_style: personalization.regional_style.as_deref(),
            regeneration_style,
            knowledge: Some(&knowledge),
        })
        .await;

    let signals = extract_regional_signals(prompt, cuisine);
    store.record_signals(cuisine, "prompt", None, &signals, now);
    store.record_generation(
        Some(persona),
        Some(cuisine),
        personalization.regional_style.as_deref(),
    );
    store.save().context("failed to save the taste profile")?;

    print_json(&json!({
        "model": client.model_name(),
        "regionalStyle": personalization.regional_style,
        "preferenceNotes": personalization.preference_notes,
        "knowledgePackId": knowledge.pack_id,
        "recipe": recipe,
    }))
}

async fn run_eval(config: &KitchenConfig, cases: Option<PathBuf>) -> anyhow::Result<()> {
    let cases = match cases {
        Some(path) => load_cases(&path)
            .with_context(|| format!("failed to load cases from {}", path.display()))?,
        None => baseline_cases(),
    };
    log::info!("running eval harness over {} case(s)", cases.len());

    let client = config.recipe_client();
    let summary = run_harness(&client, &cases)
        .await
        .context("eval harness failed")?;

    let store = RunStore::new(&config.data_dir);
    let path = store.save(&summary).context("failed to persist the run")?;
    log::info!("run summary saved to {}", path.display());

    print_json(&summary)?;
    report_gate(&summary);
    Ok(())
}

fn run_eval_latest(config: &KitchenConfig) -> anyhow::Result<()> {
    let store = RunStore::new(&config.data_dir);
    let summary = store.latest().context("no stored eval runs")?;
    print_json(&summary)?;
    report_gate(&summary);
    Ok(())
}

/// Exit nonzero on a failed gate so CI can block a release on it.
fn report_gate(summary: &RunSummary) {
    if summary.gate.passed() {
        eprintln!("Release gate passed.");
        return;
    }
    eprintln!("Release gate FAILED:");
    for reason in &summary.gate.reasons {
        eprintln!("  - {reason}");
    }
    std::process::exit(1);
}
