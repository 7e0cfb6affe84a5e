use actix_web::{web, HttpResponse};
use log::{info, error};
use serde::{Deserialize, Serialize};
use crate::models::{ApiError, PixRequest, PixResponse};
use crate::services::PixService;
use crate::utils::masking::mask_key;
use crate::utils::payment_code::verify;

/// Generate a payment code for the configured recipient key
pub async fn generate_pix(
    pix_service: web::Data<PixService>,
    request: web::Json<PixRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let service = pix_service.clone();

    // QR rendering is CPU-bound; keep it off the async workers.
    let code = web::block(move || service.generate(&request))
        .await
        .map_err(|e| {
            error!("PIX generation task failed: {}", e);
            ApiError::InternalError(e.to_string())
        })??;

    Ok(HttpResponse::Ok().json(PixResponse::from(code)))
}

#[derive(Deserialize)]
pub struct VerifyPixRequest {
    pub payload: String,
}

#[derive(Serialize)]
pub struct VerifyPixResponse {
    pub valid: bool,
    pub masked_key: String,
    pub amount: Option<String>,
    pub merchant_name: String,
    pub merchant_city: String,
    pub reference: Option<String>,
    pub crc: String,
}

/// Check structure and checksum of a payload produced elsewhere
pub async fn verify_pix(request: web::Json<VerifyPixRequest>) -> Result<HttpResponse, ApiError> {
    let decoded = verify(request.payload.trim()).map_err(|e| {
        info!("Payload rejected: {}", e);
        ApiError::ValidationError(e.to_string())
    })?;

    Ok(HttpResponse::Ok().json(VerifyPixResponse {
        valid: true,
        masked_key: mask_key(&decoded.key),
        amount: decoded.amount,
        merchant_name: decoded.merchant_name,
        merchant_city: decoded.merchant_city,
        reference: decoded.reference,
        crc: decoded.crc,
    }))
}
