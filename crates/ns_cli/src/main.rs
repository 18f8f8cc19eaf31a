use std::io::{stdout, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ns_core::config::{
    InferenceConfig, ModelKind, NewsApiConfig, Settings, DEFAULT_HF_API_URL, DEFAULT_MODEL_DIR,
    DEFAULT_NEWS_API_URL, FINBERT_MODEL_ID,
};
use ns_core::logging::init_logging;
use ns_core::SentimentPipeline;
use ns_fetch::NewsApiFetcher;
use ns_web::AppState;
use tracing::info;

mod output;

#[derive(Parser, Debug)]
#[command(author, version, about = "Company news sentiment dashboard", long_about = None)]
pub struct Cli {
    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[arg(long, env = "NEWSAPI_URL", default_value = DEFAULT_NEWS_API_URL)]
    news_api_url: String,
    /// Sentiment backend
    #[arg(long, env = "NS_MODEL", value_enum, default_value_t = ModelKind::Finbert)]
    model: ModelKind,
    /// Where the FinBERT files are cached
    #[arg(long, env = "NS_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,
    #[arg(long, env = "HF_API_URL", default_value = DEFAULT_HF_API_URL)]
    hf_api_url: String,
    /// HuggingFace access token, only used by the huggingface backend
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,
    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the web dashboard
    Serve {
        #[arg(long, default_value = "127.0.0.1:8501")]
        bind: SocketAddr,
    },
    /// Analyse one company and print the result
    Analyze {
        company: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            news_api: NewsApiConfig::new(self.news_api_key.clone().unwrap_or_default())
                .with_base_url(self.news_api_url.clone()),
            inference: InferenceConfig {
                model: self.model,
                model_id: FINBERT_MODEL_ID.to_string(),
                model_dir: self.model_dir.clone(),
                hf_api_url: self.hf_api_url.clone(),
                hf_token: self.hf_token.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let settings = cli.settings();
    settings.validate()?;

    let fetcher = Arc::new(NewsApiFetcher::new(settings.news_api.clone())?);
    info!("🧠 Loading sentiment model ({})", settings.inference.model);
    let model = ns_inference::create_model(&settings.inference).await?;
    let pipeline = SentimentPipeline::new(fetcher, model);

    match cli.command {
        Commands::Serve { bind } => {
            ns_web::serve(bind, AppState::new(pipeline)).await?;
        }
        Commands::Analyze { company, json } => {
            let report = pipeline.run(&company).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let mut out = stdout().lock();
                let styled = out.is_terminal();
                output::write_report(&mut out, &report, styled)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "ns",
            "--news-api-key",
            "abc",
            "--model",
            "dummy",
            "analyze",
            "Acme Corp",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.model, ModelKind::Dummy);
        match cli.command {
            Commands::Analyze { ref company, json } => {
                assert_eq!(company, "Acme Corp");
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
        let settings = cli.settings();
        assert_eq!(settings.news_api.api_key, "abc");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_serve_default_bind() {
        let cli = Cli::try_parse_from(["ns", "--news-api-key", "abc", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.to_string(), "127.0.0.1:8501"),
            _ => panic!("expected serve"),
        }
    }
}
