use std::fmt;
use crate::models::PixError;
use crate::utils::masking::mask_key;

/// The payee's registered payment address (e-mail, phone, CPF/CNPJ or random key).
///
/// Only the length and character set are checked. `Debug` and `Display` print
/// the masked form; use [`RecipientKey::expose`] to embed the real value.
#[derive(Clone, PartialEq, Eq)]
pub struct RecipientKey(String);

impl RecipientKey {
    pub const MIN_LEN: usize = 11;
    /// `0014BR.GOV.BCB.PIX` plus the `01NN` header leave 77 characters in a
    /// 99-character account field.
    pub const MAX_LEN: usize = 77;

    pub fn new(key: impl Into<String>) -> Result<Self, PixError> {
        let key = key.into();
        let len = key.chars().count();
        if len < Self::MIN_LEN {
            return Err(PixError::KeyTooShort { len, min: Self::MIN_LEN });
        }
        if let Some((position, ch)) = key.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
            return Err(PixError::InvalidKey(format!(
                "non-ASCII character {:?} at position {}",
                ch, position
            )));
        }
        if len > Self::MAX_LEN {
            return Err(PixError::InvalidKey(format!(
                "{} characters (maximum {})",
                len,
                Self::MAX_LEN
            )));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        mask_key(&self.0)
    }
}

impl fmt::Debug for RecipientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecipientKey").field(&self.masked()).finish()
    }
}

impl fmt::Display for RecipientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
