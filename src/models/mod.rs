pub mod amount;
pub mod error;
pub mod key;
pub mod pix;

pub use amount::Amount;
pub use error::{ApiError, ErrorKind, ErrorResponse, PixError};
pub use key::RecipientKey;
pub use pix::{PixCode, PixRequest, PixResponse};
