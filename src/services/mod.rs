pub mod qr_service;
mod pix_service;

pub use pix_service::PixService;
