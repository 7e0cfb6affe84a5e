use serde::{Deserialize, Serialize};
use crate::models::Amount;
use crate::services::qr_service::RenderedCode;

#[derive(Debug, Clone, Deserialize)]
pub struct PixRequest {
    /// Locale-formatted amount, e.g. `"R$ 1.234,56"`.
    #[serde(alias = "valor")]
    pub amount: String,
    #[serde(default, alias = "renavam", alias = "referencia")]
    pub reference: Option<String>,
}

/// A generated payment code and its rendering.
#[derive(Debug, Clone)]
pub struct PixCode {
    pub payload: String,
    pub amount: Amount,
    pub masked_key: String,
    /// The reference label as embedded in the payload.
    pub reference: String,
    pub qr_code: RenderedCode,
}

#[derive(Debug, Serialize)]
pub struct PixResponse {
    pub payload: String,
    pub qr_code_url: String,
    /// True when `qr_code_url` is the placeholder image, not a scannable code.
    pub fallback: bool,
    pub masked_key: String,
    pub reference: String,
    pub amount: String,
    pub amount_display: String,
}

impl From<PixCode> for PixResponse {
    fn from(code: PixCode) -> Self {
        PixResponse {
            fallback: code.qr_code.is_fallback(),
            qr_code_url: code.qr_code.data_uri,
            payload: code.payload,
            masked_key: code.masked_key,
            reference: code.reference,
            amount: code.amount.to_string(),
            amount_display: code.amount.to_brl_display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_portuguese_field_names() {
        let request: PixRequest = serde_json::from_str(r#"{"valor": "R$ 10,00", "renavam": "12345678"}"#).unwrap();
        assert_eq!(request.amount, "R$ 10,00");
        assert_eq!(request.reference.as_deref(), Some("12345678"));

        let request: PixRequest = serde_json::from_str(r#"{"amount": "10.00"}"#).unwrap();
        assert_eq!(request.reference, None);
    }
}
