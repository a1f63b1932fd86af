//! tandoor-import - extract recipes with an AI model and push them into Tandoor

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use std::path::PathBuf;

use tandoor_import::{
    export_recipe, import_from_url, ExportOutcome, ExtractionInput, PipelineError, ProviderKind,
    RecipeExtractor, Settings, TandoorClient,
};

#[derive(Parser)]
#[command(name = "tandoor-import", version, about = "Import recipes into Tandoor")]
struct Cli {
    /// AI provider (defaults to `default_provider` from config.toml)
    #[arg(long, global = true, value_enum)]
    provider: Option<Provider>,

    /// Model name for the provider
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a recipe and print it as JSON
    Extract(Source),

    /// Extract a recipe and create it in Tandoor
    Export {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        tandoor: TandoorArgs,
    },

    /// Let Tandoor parse a recipe page itself, without AI
    Import {
        url: String,
        #[command(flatten)]
        tandoor: TandoorArgs,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Recipe page to fetch
    #[arg(long)]
    url: Option<String>,

    /// Pasted recipe text
    #[arg(long)]
    text: Option<String>,

    /// Photo of a recipe
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args)]
struct TandoorArgs {
    /// Tandoor instance URL (overrides `tandoor.base_url`)
    #[arg(long)]
    base_url: Option<String>,

    /// Tandoor API token (overrides `tandoor.token`)
    #[arg(long)]
    token: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Openai,
    Anthropic,
    Google,
}

impl From<Provider> for ProviderKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Openai => ProviderKind::OpenAI,
            Provider::Anthropic => ProviderKind::Anthropic,
            Provider::Google => ProviderKind::Google,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        if let PipelineError::CreateError { candidate, .. } = &e {
            // Keep the extracted record so the user can retry by hand
            if let Ok(json) = serde_json::to_string_pretty(candidate) {
                eprintln!("{}", json);
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), PipelineError> {
    let settings = Settings::load()?;

    match cli.command {
        Commands::Extract(source) => {
            let extractor = build_extractor(&settings, cli.provider, cli.model)?;
            let recipe = extractor.extract(&source.into_input().await?).await?;
            print_json(&recipe)
        }
        Commands::Export { source, tandoor } => {
            let client = tandoor_client(&settings, tandoor)?;
            let extractor = build_extractor(&settings, cli.provider, cli.model)?;
            let recipe = extractor.extract(&source.into_input().await?).await?;
            report(export_recipe(&client, &recipe).await?)
        }
        Commands::Import { url, tandoor } => {
            let client = tandoor_client(&settings, tandoor)?;
            report(import_from_url(&client, &url).await?)
        }
    }
}

impl Source {
    async fn into_input(self) -> Result<ExtractionInput, PipelineError> {
        match (self.url, self.text, self.image) {
            (Some(url), _, _) => Ok(ExtractionInput::Url(url)),
            (_, Some(text), _) => Ok(ExtractionInput::Text(text)),
            (_, _, Some(path)) => ExtractionInput::image_from_path(path).await,
            _ => Err(PipelineError::InvalidInput(
                "one of --url, --text or --image is required".to_string(),
            )),
        }
    }
}

fn build_extractor(
    settings: &Settings,
    provider: Option<Provider>,
    model: Option<String>,
) -> Result<RecipeExtractor, PipelineError> {
    let mut builder = RecipeExtractor::builder().settings(settings.clone());
    if let Some(provider) = provider {
        builder = builder.provider(provider.into());
    }
    if let Some(model) = model {
        builder = builder.model(model);
    }
    builder.build()
}

fn tandoor_client(settings: &Settings, args: TandoorArgs) -> Result<TandoorClient, PipelineError> {
    let mut settings = settings.clone();
    if args.base_url.is_some() {
        settings.tandoor.base_url = args.base_url;
    }
    if args.token.is_some() {
        settings.tandoor.token = args.token;
    }
    tandoor_import::tandoor_client(&settings)
}

fn report(outcome: ExportOutcome) -> Result<(), PipelineError> {
    info!("Created Tandoor recipe {}", outcome.recipe.id);
    if let Some(e) = &outcome.image_error {
        warn!("{}", e);
        eprintln!("Warning: recipe created without image: {}", e);
    }
    print_json(&outcome.recipe)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| PipelineError::InvalidInput(format!("could not serialise output: {e}")))?;
    println!("{}", json);
    Ok(())
}
