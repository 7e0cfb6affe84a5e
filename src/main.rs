use std::sync::Arc;
use actix_web::{App, HttpServer, HttpResponse, web};
use actix_cors::Cors;
use log::{info, error};
use dotenv::dotenv;
use pix_backend::config::{self, EnvKeySource, ServerConfig, PIX_KEY_VAR};
use pix_backend::routes;
use pix_backend::services::PixService;
use pix_backend::traits::KeySource;
use pix_backend::utils::masking::mask_key;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    let server_config = ServerConfig::load()?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(server_config.log_level.clone()));

    let profile = config::load_payload_profile()?;
    let render_options = config::load_render_options();

    let key_source = EnvKeySource::default();
    match key_source.recipient_key() {
        Some(key) => info!("Recipient key loaded from {}: {}", PIX_KEY_VAR, mask_key(&key)),
        None => error!("{} is not set - payment code generation will fail until it is", PIX_KEY_VAR),
    }

    let pix_service = web::Data::new(PixService::new(Arc::new(key_source), profile, render_options));

    let (host, port) = (server_config.host, server_config.port);
    info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        // Configure CORS middleware
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(pix_service.clone())
            .configure(routes::configure)
            .route("/health", web::get().to(|| async {
                info!("Health check");
                HttpResponse::Ok().body("OK")
            }))
    })
    .bind(format!("{host}:{port}"))?
    .run()
    .await?;

    info!("Server shutting down");
    Ok(())
}
