//! Tag-length-value fields: two-digit tag, two-digit length, value.
//!
//! Nested structures are built by passing the output of [`field`] calls as the
//! value of a parent [`field`].

use crate::models::PixError;

/// Largest value a two-digit length can describe.
pub const MAX_VALUE_LEN: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: String,
    pub value: String,
}

impl TlvField {
    /// Declared length of the value as it appears on the wire.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Parses this field's value as a nested run of TLV fields.
    pub fn children(&self) -> Result<Vec<TlvField>, PixError> {
        decode(&self.value)
    }
}

pub fn field(tag: &str, value: &str) -> Result<String, PixError> {
    field_with_max(tag, value, MAX_VALUE_LEN)
}

/// Like [`field`], with a tighter ceiling for fields the payment network caps
/// below 99 characters.
pub fn field_with_max(tag: &str, value: &str, max: usize) -> Result<String, PixError> {
    if tag.len() != 2 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PixError::MalformedPayload(format!("invalid tag {:?}", tag)));
    }
    if let Some((position, ch)) = value.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(PixError::InvalidCharacter { ch, position });
    }
    let max = max.min(MAX_VALUE_LEN);
    if value.len() > max {
        return Err(PixError::FieldTooLong {
            tag: tag.to_string(),
            len: value.len(),
            max,
        });
    }
    Ok(format!("{}{:02}{}", tag, value.len(), value))
}

/// Splits a flat TLV run into its fields, in order.
pub fn decode(input: &str) -> Result<Vec<TlvField>, PixError> {
    if !input.is_ascii() {
        return Err(PixError::MalformedPayload("payload is not ASCII".to_string()));
    }

    let mut fields = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(PixError::MalformedPayload(format!("truncated header {:?}", rest)));
        }
        let (tag, after_tag) = rest.split_at(2);
        let (len_digits, after_len) = after_tag.split_at(2);
        if !tag.bytes().all(|b| b.is_ascii_digit()) || !len_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::MalformedPayload(format!("invalid header {:?}", &rest[..4])));
        }
        let len: usize = len_digits
            .parse()
            .map_err(|_| PixError::MalformedPayload(format!("invalid length {:?}", len_digits)))?;
        if after_len.len() < len {
            return Err(PixError::MalformedPayload(format!(
                "field {} declares {} characters, {} left",
                tag,
                len,
                after_len.len()
            )));
        }
        let (value, remaining) = after_len.split_at(len);
        fields.push(TlvField {
            tag: tag.to_string(),
            value: value.to_string(),
        });
        rest = remaining;
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_prefixes_zero_padded_length() {
        assert_eq!(field("00", "01").unwrap(), "000201");
        assert_eq!(field("53", "986").unwrap(), "5303986");
        assert_eq!(field("54", "123.45").unwrap(), "5406123.45");
        assert_eq!(field("62", "").unwrap(), "6200");
        assert_eq!(field("59", &"A".repeat(99)).unwrap().len(), 103);
    }

    #[test]
    fn test_nested_fields_compose() {
        let inner = format!(
            "{}{}",
            field("00", "BR.GOV.BCB.PIX").unwrap(),
            field("01", "teste@exemplo.com").unwrap()
        );
        assert_eq!(
            field("26", &inner).unwrap(),
            "26390014BR.GOV.BCB.PIX0117teste@exemplo.com"
        );
    }

    #[test]
    fn test_rejects_values_over_99() {
        assert_eq!(
            field("26", &"x".repeat(100)),
            Err(PixError::FieldTooLong { tag: "26".to_string(), len: 100, max: 99 })
        );
    }

    #[test]
    fn test_field_with_max() {
        assert!(field_with_max("60", "CURITIBA", 15).is_ok());
        assert_eq!(
            field_with_max("60", "SAO JOSE DOS CAMPOS", 15),
            Err(PixError::FieldTooLong { tag: "60".to_string(), len: 19, max: 15 })
        );
        // A ceiling above 99 is still bounded by the length digits.
        assert!(field_with_max("59", &"x".repeat(100), 500).is_err());
    }

    #[test]
    fn test_rejects_bad_tags_and_non_ascii() {
        assert!(matches!(field("5", "x"), Err(PixError::MalformedPayload(_))));
        assert!(matches!(field("5a", "x"), Err(PixError::MalformedPayload(_))));
        assert_eq!(
            field("60", "SÃO PAULO"),
            Err(PixError::InvalidCharacter { ch: 'Ã', position: 1 })
        );
    }

    #[test]
    fn test_decode_round_trip_with_children() {
        let payload = "00020126390014BR.GOV.BCB.PIX0117teste@exemplo.com5303986";
        let fields = decode(payload).unwrap();
        let tags: Vec<&str> = fields.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, ["00", "26", "53"]);

        let account = fields[1].children().unwrap();
        assert_eq!(account[0].value, "BR.GOV.BCB.PIX");
        assert_eq!(account[1].value, "teste@exemplo.com");
        assert_eq!(account[1].len(), 17);
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        assert!(decode("000").is_err());
        assert!(decode("0005ab").is_err());
        assert!(decode("00xx01").is_err());
        assert!(decode("").unwrap().is_empty());
    }
}
