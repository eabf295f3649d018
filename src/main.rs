// Main entry point
use ai_translator::infrastructure::config::{
    generate_config_sample, get_config_path, load_config, Config,
};
use ai_translator::infrastructure::logging::init_logging;
use ai_translator::interfaces::api::router;
use ai_translator::interfaces::cli::{text_from_args, texts_from_file, Cli};
use ai_translator::presentation::render::{format_batch, format_result};
use ai_translator::presentation::theme::Theme;
use ai_translator::state::AppState;
use clap::Parser;
use colored::Colorize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        generate_config_sample(cli.config.as_deref())?;
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(host) = &cli.host {
        config.app.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.app.port = port;
    }

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.status {
        print_status(&config, cli.config.as_deref());
        return Ok(());
    }

    let state = AppState::new(config.clone())?;
    let theme_name = cli.theme.as_deref().unwrap_or("temp");

    if let Some(path) = &cli.file {
        let content = tokio::fs::read_to_string(path).await?;
        let texts = texts_from_file(&content)?;
        if texts.is_empty() {
            eprintln!("{}", "No text found in file".red());
            std::process::exit(1);
        }

        let results = state.translator.batch_translate(&texts).await;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            print!("{}", format_batch(&texts, &results, &Theme::from_name(theme_name)));
        }
        return Ok(());
    }

    if !cli.text.is_empty() {
        let text = text_from_args(&cli.text)?;
        let result = state.translator.translate(&text).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", format_result(&text, &result, &Theme::from_name(theme_name)));
        }
        return Ok(());
    }

    serve(state, &config).await
}

async fn serve(state: AppState, config: &Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.app.host, config.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        app = %config.app.name,
        env = %config.app.env,
        "Starting server on {}",
        addr
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve once Ctrl-C is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    eprintln!("\n收到中断信号，正在优雅关闭...");
}

fn print_status(config: &Config, explicit: Option<&std::path::Path>) {
    println!("{}", "aitranslator Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        get_config_path(explicit)
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found (using defaults)".to_string())
    );
    println!("Environment: {}", config.app.env);
    println!("Listen: {}:{}", config.app.host, config.app.port);
    println!("Model: {} ({})", config.llm.model, config.llm.api_base);

    if config.llm.api_key.trim().is_empty() {
        println!("LLM API: {}", "Not configured".yellow());
    } else {
        println!("LLM API: Configured");
    }
}
