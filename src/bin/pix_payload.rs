use std::process::ExitCode;
use clap::Parser;
use dotenv::dotenv;
use log::error;
use pix_backend::config::{self, EnvKeySource};
use pix_backend::services::qr_service;
use pix_backend::traits::KeySource;
use pix_backend::utils::masking::mask_key;
use pix_backend::utils::payment_code::{encode, verify};

/// Generate or check a Pix "copia e cola" payload offline
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Amount, e.g. "R$ 1.234,56" or 1234.56
    #[arg(short, long, required_unless_present = "verify")]
    amount: Option<String>,

    /// Recipient key; defaults to the PIX_KEY environment variable
    #[arg(short, long)]
    key: Option<String>,

    /// Reference (only the first 8 characters are embedded)
    #[arg(short, long)]
    reference: Option<String>,

    /// Also print the QR code as a data URI
    #[arg(long)]
    qr: bool,

    /// Verify an existing payload instead of generating one
    #[arg(long, conflicts_with_all = ["amount", "key", "reference", "qr"])]
    verify: Option<String>,
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let args = Args::parse();

    if let Some(payload) = args.verify {
        return match verify(payload.trim()) {
            Ok(decoded) => {
                println!("valid: CRC {}", decoded.crc);
                println!("key: {}", mask_key(&decoded.key));
                println!("amount: {}", decoded.amount.as_deref().unwrap_or("-"));
                println!("merchant: {} / {}", decoded.merchant_name, decoded.merchant_city);
                println!("reference: {}", decoded.reference.as_deref().unwrap_or("-"));
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                eprintln!("invalid: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let profile = match config::load_payload_profile() {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("{} ({})", e, e.code());
            return ExitCode::FAILURE;
        }
    };

    let key = args.key.or_else(|| EnvKeySource::default().recipient_key());
    let amount = args.amount.unwrap_or_default();

    match encode(&amount, key.as_deref(), args.reference.as_deref(), &profile) {
        Ok(payload) => {
            println!("{}", payload);
            if args.qr {
                let code = qr_service::render(&payload, &config::load_render_options());
                if code.is_fallback() {
                    eprintln!("QR rendering failed, printing placeholder image");
                }
                println!("{}", code.data_uri);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} ({})", e, e.code());
            ExitCode::FAILURE
        }
    }
}
