use std::io::{self, Read};

use worstof_core::market::Basket;

/// JSON basket piped on stdin. `None` when stdin is a terminal or the pipe
/// carried nothing.
pub fn read_basket() -> Result<Option<Basket>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    parse_basket(io::stdin().lock())
}

/// Parse a `{"series": [...]}` basket from `reader`; blank input is `None`.
pub fn parse_basket<R: Read>(mut reader: R) -> Result<Option<Basket>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let basket: Basket = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse basket from stdin: {}", e))?;
    Ok(Some(basket))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_none() {
        assert!(parse_basket("  \n".as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_parse_piped_basket() {
        let json = r#"{"series":[{"name":"TERNA","observations":[
            {"date":"2024-01-02","price":7.52},{"date":"2024-01-03","price":7.49}]}]}"#;
        let basket = parse_basket(json.as_bytes()).unwrap().unwrap();
        assert_eq!(basket.names(), vec!["TERNA"]);
    }

    #[test]
    fn test_invalid_basket_reports_stdin() {
        let json = r#"{"series":[]}"#;
        let err = parse_basket(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }
}
