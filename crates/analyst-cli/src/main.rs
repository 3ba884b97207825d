//! Command-line interface for analyst-rs

mod menu;

use analyst_market::{AppConfig, Assistant, Language};
use anyhow::bail;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "Menu-driven financial analysis assistant", long_about = None, version)]
struct Args {
    /// Directory for transcripts and image responses (overrides ANALYST_OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Prompt language, `en` or `es` (overrides ANALYST_LANGUAGE)
    #[arg(short, long)]
    language: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let dotenv = analyst_utils::load_dotenv();
    analyst_utils::init_tracing("warn,analyst_market=info,analyst_cli=info");
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();
    let config = apply_args(AppConfig::from_env()?, args)?;
    info!(
        "Writing reports to {} in {}",
        config.output_dir.display(),
        config.language
    );

    let assistant = Assistant::new(config)?;
    menu::run(&assistant, &mut io::stdin().lock()).await
}

fn apply_args(mut config: AppConfig, args: Args) -> anyhow::Result<AppConfig> {
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    if let Some(code) = args.language {
        let language = Language::from_code(&code);
        if !language.is_known() {
            bail!("Unsupported language '{code}', expected en or es");
        }
        config.language = language;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from(["analyst", "--output-dir", "reports", "-l", "es"]);
        let config = apply_args(AppConfig::default(), args).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.language, Language::Spanish);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let args = Args::parse_from(["analyst", "--language", "fr"]);
        let err = apply_args(AppConfig::default(), args).unwrap_err();
        assert!(err.to_string().contains("Unsupported language 'fr'"));
    }
}
