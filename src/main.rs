use rgen_image_proxy::{logger, server, Config, ModelCatalog};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file first
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();

    if let Err(e) = logger::init_with_config(config.logger_config()) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port,
    );
    logger::log_config_info(&config, &ModelCatalog::builtin());

    if !config.huggingface.has_api_key() {
        log::warn!("⚠️  HUGGINGFACE_API_KEY is not set; generation requests will fail with 500");
    }

    if let Some(model) = &config.default_model {
        if !ModelCatalog::builtin().contains(model) {
            log::warn!("⚠️  DEFAULT_IMAGE_MODEL {} is not a known model id", model);
        }
    }

    server::run(config).await
}
