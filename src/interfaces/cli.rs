use crate::domain::error::ServiceError;
use crate::domain::model::TranslationRequest;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aitranslator")]
#[command(about = "AI-powered Chinese to English translation with keyword extraction.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Translate every non-empty line of a file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Use this config file instead of the default location
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Override the server bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the server port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Text to translate; without it the HTTP server is started
    #[arg(num_args = 1..)]
    pub text: Vec<String>,
}

/// Join positional arguments into one validated, trimmed text
pub fn text_from_args(args: &[String]) -> Result<String, ServiceError> {
    TranslationRequest::new(&args.join(" ")).map(TranslationRequest::into_text)
}

/// Validate every non-blank line of a file; blank lines are skipped
pub fn texts_from_file(content: &str) -> Result<Vec<String>, ServiceError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            TranslationRequest::new(line)
                .map(TranslationRequest::into_text)
                .map_err(|e| e.with_detail("line", idx + 1))
        })
        .collect()
}
