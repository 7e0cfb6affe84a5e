use std::{env, sync::RwLock};
use log::{info, warn};
use crate::models::PixError;
use crate::services::qr_service::{
    RenderOptions, DEFAULT_DARK_COLOR, DEFAULT_LIGHT_COLOR, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE,
};
use crate::traits::KeySource;
use crate::utils::masking::mask_key;
use crate::utils::payment_code::{PayloadProfile, DEFAULT_MERCHANT_CITY, DEFAULT_MERCHANT_NAME, DEFAULT_REFERENCE};

pub const PIX_KEY_VAR: &str = "PIX_KEY";

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| format!("SERVER_PORT must be a number: {}", e))?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig { host, port, log_level })
    }
}

/// Payload literals from `PIX_MERCHANT_NAME`, `PIX_MERCHANT_CITY` and
/// `PIX_DEFAULT_REFERENCE`, falling back to the compiled-in defaults.
pub fn load_payload_profile() -> Result<PayloadProfile, PixError> {
    let profile = PayloadProfile {
        merchant_name: env_or("PIX_MERCHANT_NAME", DEFAULT_MERCHANT_NAME),
        merchant_city: env_or("PIX_MERCHANT_CITY", DEFAULT_MERCHANT_CITY),
        default_reference: env_or("PIX_DEFAULT_REFERENCE", DEFAULT_REFERENCE),
    };
    profile.validate()?;
    info!(
        "Payload profile: merchant {:?}, city {:?}, default reference {:?}",
        profile.merchant_name, profile.merchant_city, profile.default_reference
    );
    Ok(profile)
}

pub fn load_render_options() -> RenderOptions {
    RenderOptions {
        size: render_size(env::var("PIX_QR_SIZE").ok().as_deref()),
        dark_color: env_or("PIX_QR_DARK_COLOR", DEFAULT_DARK_COLOR),
        light_color: env_or("PIX_QR_LIGHT_COLOR", DEFAULT_LIGHT_COLOR),
    }
}

fn render_size(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_SIZE;
    };
    match raw.trim().parse::<u32>() {
        Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => size,
        Ok(size) => {
            warn!(
                "PIX_QR_SIZE {} outside {}..={}, using {}",
                size, MIN_SIZE, MAX_SIZE, DEFAULT_SIZE
            );
            DEFAULT_SIZE
        }
        Err(_) => {
            warn!("PIX_QR_SIZE {:?} is not a number, using {}", raw, DEFAULT_SIZE);
            DEFAULT_SIZE
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Reads the recipient key from the environment on every call.
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new(PIX_KEY_VAR)
    }
}

impl KeySource for EnvKeySource {
    fn recipient_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|k| !k.trim().is_empty())
    }
}

/// In-process key holder; whoever owns it may replace or clear the key at any time.
#[derive(Default)]
pub struct StaticKeySource {
    key: RwLock<Option<String>>,
}

impl StaticKeySource {
    pub fn new(key: Option<String>) -> Self {
        Self { key: RwLock::new(key) }
    }

    pub fn set(&self, key: Option<String>) {
        match &key {
            Some(k) => info!("Recipient key set to {}", mask_key(k)),
            None => info!("Recipient key removed"),
        }
        match self.key.write() {
            Ok(mut guard) => *guard = key,
            Err(poisoned) => *poisoned.into_inner() = key,
        }
    }
}

impl KeySource for StaticKeySource {
    fn recipient_key(&self) -> Option<String> {
        match self.key.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
