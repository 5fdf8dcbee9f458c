use std::{path::Path, sync::Arc};

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use pulsegate::{
    adapters::{LoggingConsumer, ShutdownReporter},
    config::{ReceiverConfigValidator, models::ReceiverConfig},
    core::DatapointReceiver,
    metrics,
    protocol::JsonDecoder,
    tracing_setup,
    utils::graceful_shutdown::GracefulShutdown,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Start the receiver (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Determine the command to run
    let (command, config_path) = match args.command {
        Some(Commands::Validate { config }) => ("validate", config),
        Some(Commands::Init { config }) => ("init", config),
        Some(Commands::Serve { config }) => ("serve", config),
        None => ("serve", args.config), // Default to serve with config from args
    };

    match command {
        "validate" => {
            return validate_config_command(&config_path).await;
        }
        "init" => {
            return init_config_command(&config_path).await;
        }
        "serve" => {
            // Continue with normal server startup
        }
        _ => unreachable!(),
    }

    // Configure tracing_subscriber for JSON output
    tracing_setup::init_tracing().map_err(|e| eyre!("Failed to initialize tracing: {}", e))?;

    // Register metric descriptions
    metrics::init_metrics().map_err(|e| eyre!("Failed to initialize metrics: {}", e))?;

    tracing::info!("Loading configuration from {config_path}");

    let config: ReceiverConfig = pulsegate::config::load_config(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    ReceiverConfigValidator::validate(&config).wrap_err("Invalid configuration")?;

    tracing::info!(
        "Starting Pulsegate receiver '{}' on {}",
        config.name,
        config.endpoint
    );

    let receiver = DatapointReceiver::new(
        config,
        Arc::new(JsonDecoder),
        Arc::new(LoggingConsumer),
    )
    .wrap_err("Failed to construct receiver")?;

    // Create graceful shutdown manager
    let graceful_shutdown = Arc::new(GracefulShutdown::new());

    // Start signal handler for graceful shutdown
    let signal_handler_shutdown = graceful_shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signal_handler_shutdown.run_signal_handler().await {
            tracing::error!("Signal handler error: {}", e);
        }
    });

    // Fatal listener failures take the process down through the same path
    let host = Arc::new(ShutdownReporter::new(graceful_shutdown.clone()));
    receiver
        .start(host)
        .await
        .map_err(|e| eyre!("Failed to start receiver: {}", e))?;

    let reason = graceful_shutdown.wait_for_shutdown_signal().await;
    tracing::info!("Shutdown signal received: {:?}", reason);

    if let Err(e) = receiver.stop().await {
        tracing::warn!("Receiver stop reported: {}", e);
    }

    // Shutdown tracing on exit
    tracing_setup::shutdown_tracing();

    Ok(())
}

/// Validate configuration file and exit
async fn validate_config_command(config_path: &str) -> Result<()> {
    use pulsegate::config::load_config;

    println!("🔍 Validating configuration file: {config_path}");

    // First check if file exists and is readable
    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    // Try to parse the configuration
    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    };

    // Validate the configuration
    match ReceiverConfigValidator::validate(&config) {
        Ok(()) => {
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Endpoint: {}", config.endpoint);
            println!("   • Receiver Name: {}", config.name);
            println!("   • Server Timeout: {}s", config.server_timeout_secs);
            println!("   • Max Body Bytes: {}", config.max_body_bytes);
            println!();
            println!("🎉 Configuration is valid and ready to use!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • Verify endpoint format (e.g., '0.0.0.0:9943')");
            println!("   • Ensure the receiver name is non-empty");
            println!("   • Ensure timeouts and size limits are greater than zero");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# Pulsegate Receiver Configuration

# The address to listen on
endpoint = "0.0.0.0:9943"

# Logical receiver name used for metrics and span tagging
name = "datapoint"

# Uniform read/write deadline applied to every connection, in seconds
server_timeout_secs = 20

# Maximum accepted payload size in bytes, after decompression
max_body_bytes = 33554432
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {config_path}");
    println!("   Run 'pulsegate serve --config {config_path}' to start the receiver");
    Ok(())
}
