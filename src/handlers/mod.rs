pub mod pix_handlers;

pub use pix_handlers::*;
