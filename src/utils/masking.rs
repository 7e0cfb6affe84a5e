/// Masks a recipient key for logs and responses: first four and last four
/// characters, e.g. `+551...8888`. Keys too short to hide anything become `****`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("teste@exemplo.com"), "test....com");
        assert_eq!(mask_key("+5511999998888"), "+551...8888");
        assert_eq!(mask_key("123e4567-e89b-12d3-a456-426614174000"), "123e...4000");
    }

    #[test]
    fn test_short_values_are_fully_hidden() {
        assert_eq!(mask_key(""), "****");
        assert_eq!(mask_key("abcdefgh"), "****");
        assert_eq!(mask_key("abcdefghi"), "abcd...fghi");
    }
}
