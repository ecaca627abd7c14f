use tracing::{error, info};

use blogmon::{Config, WebServer};

/// Default configuration file.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let mut config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("Invalid environment override: {e}");
        std::process::exit(1);
    }
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = blogmon::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        blogmon::logging::init_console_only(&config.logging.level);
    }

    info!("blogmon - blog RSS monitor");
    info!("Monitoring {} feed(s)", config.feeds.len());

    let service = match blogmon::setup::build_service(&config).await {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to start monitor: {}", e);
            std::process::exit(1);
        }
    };

    if config.scheduler.enabled {
        blogmon::start_scheduler(service.clone(), &config.scheduler);
    }

    let server = match WebServer::new(&config.server, service) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
