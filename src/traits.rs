use crate::models::PixError;
use crate::services::qr_service::RenderOptions;

/// Supplies the recipient key configured for the service.
///
/// Called once per request; the value may appear, change or disappear between
/// calls and must not be cached by callers.
pub trait KeySource: Send + Sync {
    fn recipient_key(&self) -> Option<String>;
}

/// Turns a finished payload into PNG bytes of a scannable code.
pub trait CodeRenderer: Send + Sync {
    fn render_png(&self, payload: &str, options: &RenderOptions) -> Result<Vec<u8>, PixError>;
}
