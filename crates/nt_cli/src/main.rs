use clap::{Args, Parser, Subcommand};
use nt_core::{Article, CompletionOptions, Result, SpeechSynthesizer, TextField, VoiceSettings};
use nt_inference::keywords::TfIdfExtractor;
use nt_inference::models::openai::{OpenAiConfig, OpenAiModel, DEFAULT_CHAT_MODEL};
use nt_inference::speech::{save_audio, ElevenLabsClient, ElevenLabsConfig};
use nt_inference::synthesis::{load_prompt, StorySynthesizer};
use nt_news::{print_articles, NewsApiClient, NewsApiConfig};
use nt_storage::{IndexConfig, VectorDatabase, DEFAULT_TOP_N};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

mod logging;

const DEFAULT_QUERY: &str = "Latest political news";

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, index and narrate news headlines", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Embedding provider: hash (default), openai, ollama, or fastembed when built with that feature
    #[arg(long, global = true, default_value = "hash")]
    embedder: String,
    #[arg(long, global = true)]
    embedding_model: Option<String>,
    #[arg(long, global = true)]
    embedding_url: Option<String>,
    #[arg(long, global = true)]
    dimension: Option<usize>,
    #[arg(long, global = true, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[arg(long, global = true, default_value = nt_news::client::DEFAULT_BASE_URL)]
    news_api_url: String,
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print recent headlines
    Fetch(FetchArgs),
    /// Index recent headlines and print the closest matches for a query
    Query(QueryArgs),
    /// Write a story from the closest matches and optionally narrate it
    Brief(BriefArgs),
}

#[derive(Args, Debug, Clone)]
struct FetchArgs {
    /// Comma separated NewsAPI source ids
    #[arg(long, value_delimiter = ',', default_value = "cnn,fox-news,the-new-york-times")]
    sources: Vec<String>,
    /// Only keep articles published within this many hours
    #[arg(long, default_value_t = nt_news::DEFAULT_HOURS, value_parser = clap::value_parser!(i64).range(0..))]
    hours: i64,
}

#[derive(Args, Debug, Clone)]
struct QueryArgs {
    #[arg(default_value = DEFAULT_QUERY)]
    text: String,
    #[command(flatten)]
    fetch: FetchArgs,
    /// Number of results
    #[arg(short, default_value_t = 3)]
    k: usize,
    /// Attach topic, keywords and embedding to each indexed article
    #[arg(long)]
    enrich: bool,
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
    /// Field embedded when not enriching: title-and-description, title, description or content
    #[arg(long, default_value = "title-and-description")]
    text_field: TextField,
}

#[derive(Args, Debug)]
struct BriefArgs {
    #[command(flatten)]
    query: QueryArgs,
    /// Prompt template with {query} and {articles} placeholders
    #[arg(long)]
    prompt_file: PathBuf,
    /// Chat model used for synthesis
    #[arg(long, default_value = DEFAULT_CHAT_MODEL)]
    model: String,
    #[arg(long)]
    openai_url: Option<String>,
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,
    #[arg(long, default_value_t = 500)]
    max_tokens: u32,
    /// Narrate the story with this ElevenLabs voice
    #[arg(long)]
    voice_id: Option<String>,
    /// Where narrated MP3 audio is written. Its duration is not reported
    #[arg(long, default_value = "brief.mp3")]
    audio_out: PathBuf,
    #[arg(long, default_value_t = 0.5)]
    stability: f32,
    #[arg(long, default_value_t = 0.5)]
    similarity_boost: f32,
    #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    elevenlabs_api_key: Option<String>,
    #[arg(long, default_value = nt_inference::speech::DEFAULT_BASE_URL)]
    elevenlabs_url: String,
}

impl Cli {
    fn news_client(&self) -> Result<NewsApiClient> {
        NewsApiClient::new(NewsApiConfig {
            api_key: self.news_api_key.clone(),
            base_url: self.news_api_url.clone(),
        })
    }

    fn embedder_config(&self) -> nt_inference::Config {
        nt_inference::Config {
            provider: Some(self.embedder.clone()),
            api_key: match self.embedder.as_str() {
                "openai" => self.openai_api_key.clone(),
                _ => None,
            },
            model_name: self.embedding_model.clone(),
            base_url: self.embedding_url.clone(),
            dimension: self.dimension,
        }
    }
}

async fn fetch(cli: &Cli, args: &FetchArgs) -> Result<Vec<Article>> {
    let client = cli.news_client()?;
    info!("📰 Fetching headlines from {}", args.sources.join(", "));
    client.fetch_top_headlines(&args.sources, args.hours).await
}

/// Fetch, index and query. `None` when there was nothing to index.
async fn run_query(cli: &Cli, args: &QueryArgs) -> Result<Option<Vec<Article>>> {
    let articles = fetch(cli, &args.fetch).await?;
    if articles.is_empty() {
        println!("No articles to index.");
        return Ok(None);
    }

    println!("\nNews from the past {} hours:\n", args.fetch.hours);
    print_articles(&articles)?;

    let embedder = nt_inference::create_embedder(&cli.embedder_config())?;
    let config = IndexConfig {
        enrich: args.enrich,
        top_n: args.top_n,
        text_field: args.text_field,
    };
    let mut db = VectorDatabase::new(embedder, config);
    if args.enrich {
        db = db.with_keyword_extractor(Arc::new(TfIdfExtractor::new()?));
    }
    db.build_index(articles).await?;
    println!("\nVector index built with {} documents.", db.len());

    println!("\nQuerying vector index for: '{}'", args.text);
    let results = db.query(&args.text, args.k).await?;
    println!("\nQuery results:");
    print_articles(&results)?;
    Ok(Some(results))
}

async fn brief(cli: &Cli, args: &BriefArgs) -> Result<()> {
    // Load the template and the chat client before spending any API calls
    let template = load_prompt(&args.prompt_file).await?;
    let mut openai = OpenAiConfig { api_key: cli.openai_api_key.clone(), ..OpenAiConfig::default() };
    if let Some(url) = &args.openai_url {
        openai.base_url = url.clone();
    }
    let model = OpenAiModel::new(openai)?.with_chat_model(args.model.clone());
    let synthesizer = StorySynthesizer::new(Arc::new(model)).with_options(CompletionOptions {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
    });

    let Some(articles) = run_query(cli, &args.query).await? else {
        return Ok(());
    };

    let story = synthesizer.synthesize_story(&args.query.text, &articles, &template).await?;
    println!("\nSynthesized story:\n\n{}\n", story);

    if let Some(voice_id) = &args.voice_id {
        let speech = ElevenLabsClient::new(ElevenLabsConfig {
            api_key: args.elevenlabs_api_key.clone(),
            base_url: args.elevenlabs_url.clone(),
        })?;
        let settings = VoiceSettings {
            stability: args.stability,
            similarity_boost: args.similarity_boost,
        };
        info!("🔊 Narrating story with voice {}", voice_id);
        let audio = speech.synthesize(&story, voice_id, settings).await?;
        save_audio(&audio, &args.audio_out).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    debug!("{:?}", cli.embedder_config());

    match &cli.command {
        Commands::Fetch(args) => {
            let articles = fetch(&cli, args).await?;
            print_articles(&articles)?;
        }
        Commands::Query(args) => {
            run_query(&cli, args).await?;
        }
        Commands::Brief(args) => brief(&cli, args).await?,
    }
    Ok(())
}
