use std::sync::Arc;
use log::{error, info, warn};
use crate::models::{ErrorKind, PixCode, PixError, PixRequest};
use crate::services::qr_service::{render_with, QrPngRenderer, RenderOptions};
use crate::traits::{CodeRenderer, KeySource};
use crate::utils::payment_code::{build_payload, reference_label, validate_inputs, PayloadProfile};

#[derive(Clone)]
pub struct PixService {
    key_source: Arc<dyn KeySource>,
    renderer: Arc<dyn CodeRenderer>,
    profile: PayloadProfile,
    render_options: RenderOptions,
}

impl PixService {
    pub fn new(key_source: Arc<dyn KeySource>, profile: PayloadProfile, render_options: RenderOptions) -> Self {
        Self {
            key_source,
            renderer: Arc::new(QrPngRenderer),
            profile,
            render_options,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn CodeRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Encodes the payload for the key configured right now, then renders it.
    pub fn generate(&self, request: &PixRequest) -> Result<PixCode, PixError> {
        let raw_key = self.key_source.recipient_key();
        let (amount, key) = validate_inputs(&request.amount, raw_key.as_deref()).map_err(|e| {
            match e.kind() {
                ErrorKind::Configuration => error!("Recipient key rejected: {}", e),
                _ => warn!("Rejected amount {:?}: {}", request.amount, e),
            }
            e
        })?;

        info!(
            "Generating PIX: amount={}, key={}, reference={:?}",
            amount.to_brl_display(),
            key,
            request.reference
        );

        let reference = request.reference.as_deref();
        let payload = build_payload(&amount, &key, reference, &self.profile).map_err(|e| {
            if e.kind() == ErrorKind::Input {
                warn!("Rejected reference {:?}: {}", request.reference, e);
            }
            e
        })?;
        let qr_code = render_with(self.renderer.as_ref(), &payload, &self.render_options);

        info!(
            "PIX generated: {} for key {} ({} chars{})",
            amount.to_brl_display(),
            key,
            payload.len(),
            if qr_code.is_fallback() { ", placeholder image" } else { "" }
        );

        Ok(PixCode {
            payload,
            amount,
            masked_key: key.masked(),
            reference: reference_label(reference, &self.profile).to_string(),
            qr_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticKeySource;
    use crate::services::qr_service::RenderKind;
    use crate::utils::payment_code::verify;

    struct BrokenRenderer;

    impl CodeRenderer for BrokenRenderer {
        fn render_png(&self, _payload: &str, _options: &RenderOptions) -> Result<Vec<u8>, PixError> {
            Err(PixError::RenderFailure("forced".to_string()))
        }
    }

    fn request(amount: &str, reference: Option<&str>) -> PixRequest {
        PixRequest {
            amount: amount.to_string(),
            reference: reference.map(str::to_string),
        }
    }

    fn service(keys: Arc<StaticKeySource>) -> PixService {
        PixService::new(keys, PayloadProfile::default(), RenderOptions::default())
    }

    #[test]
    fn test_generate() {
        let keys = Arc::new(StaticKeySource::new(Some("teste@exemplo.com".to_string())));
        let code = service(keys).generate(&request("R$ 123,45", Some("12345678"))).unwrap();

        assert!(code.payload.ends_with("6304312B"));
        assert_eq!(code.amount.cents(), 12345);
        assert_eq!(code.masked_key, "test....com");
        assert_eq!(code.reference, "12345678");
        assert_eq!(code.qr_code.kind, RenderKind::Png);
        assert!(verify(&code.payload).is_ok());
    }

    #[test]
    fn test_missing_key() {
        let keys = Arc::new(StaticKeySource::default());
        let result = service(keys).generate(&request("R$ 123,45", None));
        assert_eq!(result.unwrap_err(), PixError::MissingKey);
    }

    #[test]
    fn test_key_is_refetched_per_call() {
        let keys = Arc::new(StaticKeySource::new(Some("primeira@exemplo.com".to_string())));
        let service = service(keys.clone());

        let first = service.generate(&request("10,00", None)).unwrap();
        keys.set(Some("segunda@exemplo.com".to_string()));
        let second = service.generate(&request("10,00", None)).unwrap();
        keys.set(None);
        let third = service.generate(&request("10,00", None));

        assert_eq!(verify(&first.payload).unwrap().key, "primeira@exemplo.com");
        assert_eq!(verify(&second.payload).unwrap().key, "segunda@exemplo.com");
        assert_eq!(third.unwrap_err(), PixError::MissingKey);
    }

    #[test]
    fn test_short_key_is_a_configuration_error() {
        let keys = Arc::new(StaticKeySource::new(Some("123".to_string())));
        let err = service(keys).generate(&request("10,00", None)).unwrap_err();
        assert_eq!(err, PixError::KeyTooShort { len: 3, min: 11 });
        assert_eq!(err.code(), "CHAVE_NAO_CONFIGURADA");
    }

    #[test]
    fn test_unusable_key_is_a_configuration_error() {
        for raw in ["k".repeat(78), "joão@exemplo.com".to_string()] {
            let keys = Arc::new(StaticKeySource::new(Some(raw.clone())));
            let err = service(keys).generate(&request("10,00", None)).unwrap_err();
            assert!(matches!(err, PixError::InvalidKey(_)), "key {:?} gave {:?}", raw, err);
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert_eq!(err.code(), "CHAVE_NAO_CONFIGURADA");
        }
    }

    #[test]
    fn test_unusable_key_reported_before_bad_amount() {
        let keys = Arc::new(StaticKeySource::new(Some("joão@exemplo.com".to_string())));
        let err = service(keys).generate(&request("abc", None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_non_ascii_reference_is_an_input_error() {
        let keys = Arc::new(StaticKeySource::new(Some("teste@exemplo.com".to_string())));
        let err = service(keys).generate(&request("10,00", Some("RÉF123"))).unwrap_err();
        assert!(matches!(err, PixError::InvalidReference(_)));
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.code(), "REFERENCIA_INVALIDA");
    }

    #[test]
    fn test_reference_echoes_embedded_label() {
        let keys = Arc::new(StaticKeySource::new(Some("teste@exemplo.com".to_string())));
        let service = service(keys);

        let truncated = service.generate(&request("10,00", Some("DOC-2024-000123"))).unwrap();
        assert_eq!(truncated.reference, "DOC-2024");
        let absent = service.generate(&request("10,00", Some("N/A"))).unwrap();
        assert_eq!(absent.reference, "***");
    }

    #[test]
    fn test_invalid_amount() {
        let keys = Arc::new(StaticKeySource::new(Some("teste@exemplo.com".to_string())));
        let err = service(keys).generate(&request("-5,00", None)).unwrap_err();
        assert_eq!(err, PixError::InvalidAmount("-5,00".to_string()));
    }

    #[test]
    fn test_render_failure_still_returns_payload() {
        let keys = Arc::new(StaticKeySource::new(Some("teste@exemplo.com".to_string())));
        let service = service(keys).with_renderer(Arc::new(BrokenRenderer));

        let code = service.generate(&request("R$ 123,45", Some("12345678"))).unwrap();
        assert!(code.qr_code.is_fallback());
        assert!(!code.qr_code.data_uri.is_empty());
        assert!(verify(&code.payload).is_ok());
    }
}
