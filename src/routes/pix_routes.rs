use actix_web::web;
use crate::handlers::pix_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/pix", web::post().to(pix_handlers::generate_pix))
            .route("/pix/verify", web::post().to(pix_handlers::verify_pix))
    );
}
