//! ollamakit - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ollamakit::cli::{write_token, Args, Commands, Verbosity};
use ollamakit::logging::{LogLevel, Logger};
use ollamakit::types::{format_size, GenerationStats};
use ollamakit::{ClientError, OllamaClient};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.client_config()?;
    init_tracing(config.effective_log_level());

    let logger = Logger::tracing(config.effective_log_level());
    let client = OllamaClient::with_logger(config, logger)
        .context("Failed to create Ollama client")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if let Err(e) = run(&args, &client, cancel).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if matches!(e.downcast_ref::<ClientError>(), Some(ClientError::HttpError(_))) {
            eprintln!(
                "\nIs Ollama running at {}? Start with: ollama serve",
                client.config().base_url
            );
        }
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let directive = match level {
        LogLevel::None => "off".to_string(),
        other => format!("ollamakit={}", other),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn run(args: &Args, client: &OllamaClient, cancel: CancellationToken) -> Result<()> {
    let verbosity = args.verbosity();

    match &args.command {
        Commands::Chat {
            model,
            prompt,
            system,
            no_stream,
        } => {
            let mut builder = client
                .chat_builder()
                .with_model(model)
                .with_cancellation(cancel.clone());
            if let Some(system) = system {
                builder = builder.with_system_message(system);
            }
            builder = builder.with_user_message(prompt);

            if *no_stream {
                let response = builder.execute().await?;
                println!("{}", response.message.content);
                print_stats(verbosity, &response.stats);
            } else {
                let mut last = GenerationStats::default();
                builder
                    .stream(|chunk| {
                        let mut out = std::io::stdout().lock();
                        write_token(&mut out, &chunk.message.content, client.logger(), &cancel);
                        if chunk.done {
                            last = chunk.stats;
                        }
                    })
                    .await?;
                println!();
                print_stats(verbosity, &last);
            }
        }

        Commands::Generate {
            model,
            prompt,
            raw,
            no_stream,
        } => {
            let builder = client
                .completion_builder()
                .with_model(model)
                .with_prompt(prompt)
                .with_raw(*raw)
                .with_cancellation(cancel.clone());

            if *no_stream {
                let response = builder.execute().await?;
                println!("{}", response.response);
                print_stats(verbosity, &response.stats);
            } else {
                let mut last = GenerationStats::default();
                builder
                    .stream(|chunk| {
                        let mut out = std::io::stdout().lock();
                        write_token(&mut out, &chunk.response, client.logger(), &cancel);
                        if chunk.done {
                            last = chunk.stats;
                        }
                    })
                    .await?;
                println!();
                print_stats(verbosity, &last);
            }
        }

        Commands::Embed { model, inputs } => {
            let response = client
                .embeddings_builder()
                .with_model(model)
                .with_inputs(inputs)
                .with_cancellation(cancel)
                .execute()
                .await?;

            for (input, vector) in inputs.iter().zip(&response.embeddings) {
                let preview: Vec<String> =
                    vector.iter().take(4).map(|v| format!("{:.4}", v)).collect();
                println!(
                    "{} [{}] {}",
                    input.cyan(),
                    vector.len(),
                    format!("{}, ...", preview.join(", ")).dimmed()
                );
            }
        }

        Commands::Models => {
            let list = client.models().with_cancellation(cancel).list().await?;
            if list.models.is_empty() {
                println!("No models installed.");
                println!("\nPull a model with:");
                println!("  ollamakit pull llama3.2");
            } else {
                println!("{}", "Available models:".bold());
                for model in &list.models {
                    println!(
                        "  • {:<32} {:>10}  {}",
                        model.name.green(),
                        model.formatted_size(),
                        model.description().dimmed()
                    );
                }
            }
        }

        Commands::Show { model } => {
            let info = client
                .models()
                .with_cancellation(cancel)
                .show(model)
                .await?;
            println!("{}", model.bold());
            if let Some(family) = &info.details.family {
                println!("  family:        {}", family);
            }
            if let Some(size) = &info.details.parameter_size {
                println!("  parameters:    {}", size);
            }
            if let Some(quant) = &info.details.quantization_level {
                println!("  quantization:  {}", quant);
            }
            if !info.capabilities.is_empty() {
                println!("  capabilities:  {}", info.capabilities.join(", "));
            }
            if verbosity.show_stats() {
                if let Some(template) = &info.template {
                    println!("\n{}\n{}", "Template:".bold(), template);
                }
            }
        }

        Commands::Ps => {
            let running = client.status().with_cancellation(cancel).running().await?;
            if running.models.is_empty() {
                println!("No models loaded.");
            }
            for process in &running.models {
                let expires = process
                    .expires_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  • {:<32} {:>10} VRAM  expires {}",
                    process.name.green(),
                    format_size(process.size_vram),
                    expires
                );
            }
        }

        Commands::Version => {
            let version = client.status().with_cancellation(cancel).version().await?;
            println!("Ollama server {}", version.version.bold());
        }

        Commands::Pull { model } => {
            println!("Pulling {}...", model.cyan());
            let status = client
                .models()
                .with_cancellation(cancel)
                .pull(model)
                .await?;
            report_status(&status.status);
        }

        Commands::Delete { model } => {
            client
                .models()
                .with_cancellation(cancel)
                .delete(model)
                .await?;
            println!("{} Deleted {}", "✓".green(), model);
        }
    }

    Ok(())
}

fn print_stats(verbosity: Verbosity, stats: &GenerationStats) {
    if !verbosity.show_stats() {
        return;
    }
    if let Some(tps) = stats.tokens_per_second() {
        eprintln!(
            "{}",
            format!(
                "{} tokens, {:.1} tokens/s",
                stats.eval_count.unwrap_or_default(),
                tps
            )
            .dimmed()
        );
    }
}

fn report_status(status: &str) {
    if status == "success" {
        println!("{} {}", "✓".green(), status);
    } else {
        println!("{} {}", "!".yellow(), status);
    }
}
