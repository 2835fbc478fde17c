use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ListError, Result};
use crate::types::{ParsedList, RuleLine};

/// Marker of the list's update annotation, e.g. `! Last Modified: Sat, 01 Jun 2024 12:00:00 -0400`
const LAST_MODIFIED_MARKER: &str = "Last Modified";

/// Captures the text following the `Last Modified` marker
static LAST_MODIFIED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Last Modified:?\s*(.*)$")
        .expect("LAST_MODIFIED_PATTERN: hardcoded regex is invalid")
});

/// GFWList payloads are wrapped at 64 columns and not always padded
const LIST_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Parse raw list bytes into host tokens.
///
/// `source` names the list in error messages. When `encoded` is set the bytes
/// are base64-decoded first; embedded whitespace is ignored.
pub fn parse_list(source: &str, raw: &[u8], encoded: bool) -> Result<ParsedList> {
    if !encoded {
        return Ok(parse_text(&String::from_utf8_lossy(raw)));
    }

    let compact: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let decoded = LIST_ENGINE.decode(&compact).map_err(|e| ListError::Decode {
        source_name: source.to_string(),
        message: e.to_string(),
    })?;

    Ok(parse_text(&String::from_utf8_lossy(&decoded)))
}

/// Parse already-decoded list text into host tokens.
pub fn parse_text(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();

    for (line_num, line) in text.lines().enumerate() {
        match classify_line(line) {
            RuleLine::UpdateTime(time) => parsed.update_time = Some(time),
            RuleLine::Token(token) => parsed.tokens.push(token),
            RuleLine::Whitelist => debug!("Skipping whitelist rule at line {}: {}", line_num + 1, line.trim()),
            RuleLine::Comment | RuleLine::Empty => {}
        }
    }

    parsed.accepted = parsed.tokens.len();
    parsed
}

/// Classify a single rule line.
///
/// Prefix checks are order-sensitive: `@@||` must be tested before
/// `@@|http`, and `||` before `|`.
pub fn classify_line(line: &str) -> RuleLine {
    let line = line.trim();

    if line.contains(LAST_MODIFIED_MARKER) {
        let time = LAST_MODIFIED_PATTERN
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        return RuleLine::UpdateTime(time);
    }

    if line.starts_with('!') {
        return RuleLine::Comment;
    }

    if line.is_empty() {
        return RuleLine::Empty;
    }

    if line.starts_with("@@||") {
        return RuleLine::Whitelist;
    }

    let token = if line.starts_with("@@|http") {
        &line[3..]
    } else if let Some(rest) = line.strip_prefix('.') {
        rest
    } else if let Some(rest) = line.strip_prefix("||") {
        rest
    } else if let Some(rest) = line.strip_prefix('|') {
        rest
    } else {
        line
    };

    RuleLine::Token(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> RuleLine {
        RuleLine::Token(s.to_string())
    }

    #[test]
    fn test_last_modified_pattern_compiles() {
        assert!(LAST_MODIFIED_PATTERN.is_match("! Last Modified: today"));
    }

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(classify_line(".example.com"), token("example.com"));
        assert_eq!(classify_line("||ads.example.com"), token("ads.example.com"));
        assert_eq!(classify_line("|http://example.com/x"), token("http://example.com/x"));
        assert_eq!(classify_line("example.com"), token("example.com"));
    }

    #[test]
    fn test_classify_skipped_lines() {
        assert_eq!(classify_line("! comment"), RuleLine::Comment);
        assert_eq!(classify_line(""), RuleLine::Empty);
        assert_eq!(classify_line("   "), RuleLine::Empty);
        assert_eq!(classify_line("@@||allowed.com"), RuleLine::Whitelist);
    }

    #[test]
    fn test_classify_whitelist_url_becomes_token() {
        assert_eq!(
            classify_line("@@|http://allowed.example.com"),
            token("http://allowed.example.com")
        );
        assert_eq!(classify_line("@@|https://a.com/"), token("https://a.com/"));
    }

    #[test]
    fn test_classify_strips_prefix_once() {
        assert_eq!(classify_line("..example.com"), token(".example.com"));
        assert_eq!(classify_line("||||example.com"), token("||example.com"));
        assert_eq!(classify_line("|.example.com"), token(".example.com"));
    }

    #[test]
    fn test_classify_at_at_other_forms_are_tokens() {
        // Only `@@||` and `@@|http` are special; other `@@` lines pass through
        assert_eq!(classify_line("@@example.com"), token("@@example.com"));
    }

    #[test]
    fn test_classify_last_modified() {
        assert_eq!(
            classify_line("! Last Modified: Sat, 01 Jun 2024 12:00:00 -0400"),
            RuleLine::UpdateTime("Sat, 01 Jun 2024 12:00:00 -0400".to_string())
        );
        // Marker anywhere in the line wins over every other rule
        assert_eq!(
            classify_line("||Last Modified.example.com"),
            RuleLine::UpdateTime(".example.com".to_string())
        );
    }

    #[test]
    fn test_classify_trims_carriage_return() {
        assert_eq!(classify_line("||example.com\r"), token("example.com"));
    }

    #[test]
    fn test_parse_text_counts_and_update_time() {
        let text = "\
[AutoProxy 0.2.9]
! Checksum: abc
! Last Modified: Sat, 01 Jun 2024 12:00:00 -0400

||foo.example.com
.bar.example.org
@@||allowed.com
@@|http://quirk.example.net
|https://pipe.example.io/path
";
        let parsed = parse_text(text);
        assert_eq!(
            parsed.update_time.as_deref(),
            Some("Sat, 01 Jun 2024 12:00:00 -0400")
        );
        assert_eq!(
            parsed.tokens,
            vec![
                "[AutoProxy 0.2.9]",
                "foo.example.com",
                "bar.example.org",
                "http://quirk.example.net",
                "https://pipe.example.io/path",
            ]
        );
        assert_eq!(parsed.accepted, 5);
    }

    #[test]
    fn test_parse_text_without_update_time() {
        let parsed = parse_text("example.com\n");
        assert!(parsed.update_time.is_none());
        assert_eq!(parsed.accepted, 1);
    }

    #[test]
    fn test_parse_list_plain() {
        let parsed = parse_list("list", b"||a.com\n.b.com\n", false).unwrap();
        assert_eq!(parsed.tokens, vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_parse_list_base64_wrapped() {
        let text = "! Last Modified: now\n||foo.example.com\n.bar.example.org\n";
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        // Wrap like the upstream file
        let wrapped: String = encoded
            .as_bytes()
            .chunks(16)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        let parsed = parse_list("gfwlist", wrapped.as_bytes(), true).unwrap();
        assert_eq!(parsed.update_time.as_deref(), Some("now"));
        assert_eq!(parsed.tokens, vec!["foo.example.com", "bar.example.org"]);
    }

    #[test]
    fn test_parse_list_base64_unpadded() {
        let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode("a.com\n");
        let parsed = parse_list("gfwlist", encoded.as_bytes(), true).unwrap();
        assert_eq!(parsed.tokens, vec!["a.com"]);
    }

    #[test]
    fn test_parse_list_invalid_base64() {
        let result = parse_list("gfwlist", b"||not*base64", true);
        match result {
            Err(ListError::Decode { source_name, .. }) => assert_eq!(source_name, "gfwlist"),
            other => panic!("expected Decode error, got {:?}", other),
        }
    }
}
