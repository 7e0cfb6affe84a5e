//! Payment-code ("Pix copia e cola") payload assembly and verification.
//!
//! The payload is a flat run of TLV fields in a fixed order, closed by a
//! CRC-16 field computed over everything before its value, including the
//! `6304` header of the checksum field itself.

use log::debug;
use crate::models::{Amount, PixError, RecipientKey};
use crate::utils::amount::{normalize_amount, MAX_CANONICAL_LEN};
use crate::utils::crc16::checksum_hex;
use crate::utils::tlv::{decode, field, field_with_max, TlvField};

mod tags {
    pub const PAYLOAD_FORMAT: &str = "00";
    pub const MERCHANT_ACCOUNT: &str = "26";
    pub const CATEGORY_CODE: &str = "52";
    pub const CURRENCY: &str = "53";
    pub const AMOUNT: &str = "54";
    pub const COUNTRY: &str = "58";
    pub const MERCHANT_NAME: &str = "59";
    pub const MERCHANT_CITY: &str = "60";
    pub const ADDITIONAL_DATA: &str = "62";
    pub const CRC: &str = "63";

    // Inside MERCHANT_ACCOUNT.
    pub const GUI: &str = "00";
    pub const KEY: &str = "01";

    // Inside ADDITIONAL_DATA.
    pub const REFERENCE_LABEL: &str = "05";
}

pub const PAYLOAD_FORMAT_INDICATOR: &str = "01";
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";
pub const MERCHANT_CATEGORY_CODE: &str = "0000";
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_CODE: &str = "BR";
/// Closes the additional-data field after the reference label.
pub const ADDITIONAL_DATA_TRAILER: &str = "070503***";

pub const DEFAULT_MERCHANT_NAME: &str = "LOJA EXEMPLO";
pub const DEFAULT_MERCHANT_CITY: &str = "SAO PAULO";
pub const DEFAULT_REFERENCE: &str = "***";

pub const MAX_REFERENCE_LEN: usize = 8;
pub const MAX_MERCHANT_NAME_LEN: usize = 25;
pub const MAX_MERCHANT_CITY_LEN: usize = 15;
pub const MAX_REFERENCE_LABEL_LEN: usize = 25;

const CRC_LEN: usize = 4;

/// The fixed literals of a payload that vary per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadProfile {
    pub merchant_name: String,
    pub merchant_city: String,
    /// Used in the reference label when the caller supplies none.
    pub default_reference: String,
}

impl Default for PayloadProfile {
    fn default() -> Self {
        Self {
            merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
            merchant_city: DEFAULT_MERCHANT_CITY.to_string(),
            default_reference: DEFAULT_REFERENCE.to_string(),
        }
    }
}

impl PayloadProfile {
    pub fn validate(&self) -> Result<(), PixError> {
        field_with_max(tags::MERCHANT_NAME, &self.merchant_name, MAX_MERCHANT_NAME_LEN)?;
        field_with_max(tags::MERCHANT_CITY, &self.merchant_city, MAX_MERCHANT_CITY_LEN)?;
        field_with_max(tags::REFERENCE_LABEL, &self.default_reference, MAX_REFERENCE_LABEL_LEN)?;
        Ok(())
    }
}

/// The reference label that ends up in the payload: the caller's reference cut
/// to eight characters, or the profile default when absent, blank or `N/A`.
pub fn reference_label<'a>(reference: Option<&'a str>, profile: &'a PayloadProfile) -> &'a str {
    match reference.filter(|r| !r.trim().is_empty() && *r != "N/A") {
        Some(r) => r
            .char_indices()
            .nth(MAX_REFERENCE_LEN)
            .map(|(end, _)| &r[..end])
            .unwrap_or(r),
        None => &profile.default_reference,
    }
}

/// Assembles the payload for already-validated inputs.
pub fn build_payload(
    amount: &Amount,
    key: &RecipientKey,
    reference: Option<&str>,
    profile: &PayloadProfile,
) -> Result<String, PixError> {
    let account = [field(tags::GUI, PIX_GUI)?, field(tags::KEY, key.expose())?].concat();
    // The default label is checked by `PayloadProfile::validate`.
    let label = field(tags::REFERENCE_LABEL, reference_label(reference, profile)).map_err(|e| match reference {
        Some(_) => PixError::InvalidReference(e.to_string()),
        None => e,
    })?;
    let additional = [
        label,
        ADDITIONAL_DATA_TRAILER.to_string(),
    ]
    .concat();

    let mut payload = [
        field(tags::PAYLOAD_FORMAT, PAYLOAD_FORMAT_INDICATOR)?,
        field(tags::MERCHANT_ACCOUNT, &account)?,
        field(tags::CATEGORY_CODE, MERCHANT_CATEGORY_CODE)?,
        field(tags::CURRENCY, CURRENCY_BRL)?,
        field_with_max(tags::AMOUNT, &amount.to_string(), MAX_CANONICAL_LEN)?,
        field(tags::COUNTRY, COUNTRY_CODE)?,
        field_with_max(tags::MERCHANT_NAME, &profile.merchant_name, MAX_MERCHANT_NAME_LEN)?,
        field_with_max(tags::MERCHANT_CITY, &profile.merchant_city, MAX_MERCHANT_CITY_LEN)?,
        field(tags::ADDITIONAL_DATA, &additional)?,
    ]
    .concat();

    payload.push_str(tags::CRC);
    payload.push_str(&format!("{:02}", CRC_LEN));
    let crc = checksum_hex(&payload)?;
    payload.push_str(&crc);

    debug!("Payload built for key {} ({} chars, CRC {})", key, payload.len(), crc);
    Ok(payload)
}

/// Checks the configured key, then the user's amount.
///
/// Configuration faults win over input faults: with no usable key the amount
/// is never looked at. `None` means no key has been configured.
pub fn validate_inputs(amount: &str, key: Option<&str>) -> Result<(Amount, RecipientKey), PixError> {
    let key = RecipientKey::new(key.ok_or(PixError::MissingKey)?)?;
    let amount = normalize_amount(amount)?;
    Ok((amount, key))
}

/// Validates raw inputs and assembles the payload.
pub fn encode(
    amount: &str,
    key: Option<&str>,
    reference: Option<&str>,
    profile: &PayloadProfile,
) -> Result<String, PixError> {
    let (amount, key) = validate_inputs(amount, key)?;
    build_payload(&amount, &key, reference, profile)
}

/// The meaningful fields read back out of a verified payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub key: String,
    pub amount: Option<String>,
    pub merchant_name: String,
    pub merchant_city: String,
    pub reference: Option<String>,
    pub crc: String,
}

/// Checks structure and checksum of a finished payload.
pub fn verify(payload: &str) -> Result<DecodedPayload, PixError> {
    let fields = decode(payload)?;

    let crc_field = match fields.last() {
        Some(f) if f.tag == tags::CRC && f.len() == CRC_LEN => f,
        _ => return Err(PixError::MalformedPayload("missing trailing CRC field".to_string())),
    };
    let expected = checksum_hex(&payload[..payload.len() - CRC_LEN])?;
    if !crc_field.value.eq_ignore_ascii_case(&expected) {
        return Err(PixError::ChecksumMismatch {
            expected,
            found: crc_field.value.clone(),
        });
    }

    let find = |tag: &str| fields.iter().find(|f| f.tag == tag);
    let required = |tag: &str| {
        find(tag)
            .map(|f| f.value.clone())
            .ok_or_else(|| PixError::MalformedPayload(format!("missing field {}", tag)))
    };

    if required(tags::PAYLOAD_FORMAT)? != PAYLOAD_FORMAT_INDICATOR {
        return Err(PixError::MalformedPayload("unsupported payload format".to_string()));
    }

    let account = find(tags::MERCHANT_ACCOUNT)
        .ok_or_else(|| PixError::MalformedPayload("missing merchant account".to_string()))?
        .children()?;
    let child = |children: &[TlvField], tag: &str| children.iter().find(|f| f.tag == tag).map(|f| f.value.clone());
    if child(&account, tags::GUI).as_deref() != Some(PIX_GUI) {
        return Err(PixError::MalformedPayload("unknown account GUI".to_string()));
    }
    let key = child(&account, tags::KEY)
        .ok_or_else(|| PixError::MalformedPayload("missing recipient key".to_string()))?;

    let reference = match find(tags::ADDITIONAL_DATA) {
        Some(f) => child(&f.children()?, tags::REFERENCE_LABEL),
        None => None,
    };

    Ok(DecodedPayload {
        key,
        amount: find(tags::AMOUNT).map(|f| f.value.clone()),
        merchant_name: required(tags::MERCHANT_NAME)?,
        merchant_city: required(tags::MERCHANT_CITY)?,
        reference,
        crc: crc_field.value.clone(),
    })
}
