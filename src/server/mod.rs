pub mod cors;
pub mod handler;

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};

use crate::{
    config::Config,
    huggingface::{ImageClient, ImageGenerator, ModelCatalog},
};

pub use handler::generate_image;

pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

/// Everything a request needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: ModelCatalog,
    pub generator: Arc<dyn ImageGenerator>,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            config,
            catalog: ModelCatalog::builtin(),
            generator,
        }
    }

    pub fn from_config(config: Config) -> Self {
        let client = ImageClient::new(config.huggingface.inference_url.clone());
        Self::new(config, Arc::new(client))
    }
}

/// Registers the endpoint for every method; the handler owns the method gate.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(GENERATE_IMAGE_PATH).route(web::route().to(generate_image)));
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let bind = (config.host.clone(), config.port);
    let state = web::Data::new(AppState::from_config(config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
