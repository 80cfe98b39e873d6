//! Decoding of the free-form `genre` field into badge labels.
//!
//! The backend stores genres as a stringified list, which arrives in several
//! flavours: proper JSON (`["Baroque"]`), JSON wrapped in an extra pair of
//! quotes (`'["Baroque"]'`), Python-style reprs (`['Baroque', 'Rococo']`), or
//! a bare name. Decoding never fails.

use serde_json::Value;

const QUOTES: [char; 2] = ['\'', '"'];

/// Splits a genre field into tag labels. Always returns at least one entry.
///
/// Valid JSON decides on its own: a non-empty list gives its items, anything
/// else gives the raw field back. Bracket recovery only runs on text that is
/// not JSON at all.
pub fn parse_genres(raw: &str) -> Vec<String> {
    let genres = match serde_json::from_str::<Value>(strip_outer_quotes(raw)) {
        Ok(Value::Array(items)) => labels(items.into_iter().map(|item| match item {
            Value::String(genre) => genre,
            other => other.to_string(),
        })),
        Ok(_) => Vec::new(),
        Err(_) => extract_bracketed_list(raw).unwrap_or_default(),
    };

    if genres.is_empty() {
        return vec![raw.to_string()];
    }
    genres
}

fn strip_outer_quotes(raw: &str) -> &str {
    let trimmed = raw.strip_prefix(QUOTES).unwrap_or(raw);
    trimmed.strip_suffix(QUOTES).unwrap_or(trimmed)
}

/// Trims each label and drops the blank ones
fn labels(pieces: impl Iterator<Item = String>) -> Vec<String> {
    pieces
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Recovers `a, b` out of the first `[a, b]` span, dropping stray quotes
fn extract_bracketed_list(raw: &str) -> Option<Vec<String>> {
    let open = raw.find('[')?;
    let inner = &raw[open + 1..];
    let close = inner.find(']')?;

    Some(labels(
        inner[..close]
            .split(',')
            .map(|piece| piece.replace(QUOTES, "")),
    ))
}

/// Badge colour for a genre label; unknown genres get `gray`
pub fn genre_tone(genre: &str) -> &'static str {
    match genre {
        "Baroque" => "purple",
        "Art Nouveau Modern" => "pink",
        "Cubism" => "blue",
        "Contemporary Realism" => "green",
        "Color Field Painting" => "orange",
        "Early Renaissance" => "amber",
        "Impressionism" => "cyan",
        "Abstract Expressionism" => "red",
        "Surrealism" => "indigo",
        "Pop Art" => "fuchsia",
        "Minimalism" => "slate",
        _ => "gray",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_list() {
        assert_eq!(parse_genres(r#"["Baroque", "Rococo"]"#), vec!["Baroque", "Rococo"]);
    }

    #[test]
    fn test_quoted_json_list() {
        assert_eq!(parse_genres(r#"'["Cubism"]'"#), vec!["Cubism"]);
        assert_eq!(parse_genres(r#""["Pop Art"]""#), vec!["Pop Art"]);
    }

    #[test]
    fn test_python_style_list() {
        assert_eq!(
            parse_genres("['Impressionism', 'Post-Impressionism']"),
            vec!["Impressionism", "Post-Impressionism"]
        );
    }

    #[test]
    fn test_bare_string_falls_back_to_itself() {
        assert_eq!(parse_genres("Surrealism"), vec!["Surrealism"]);
    }

    #[test]
    fn test_non_list_json_falls_back_to_original() {
        assert_eq!(parse_genres("42"), vec!["42"]);
        assert_eq!(parse_genres(r#"{"a": 1}"#), vec![r#"{"a": 1}"#]);
    }

    #[test]
    fn test_empty_list_keeps_original() {
        assert_eq!(parse_genres("[]"), vec!["[]"]);
        assert_eq!(parse_genres("'[]'"), vec!["'[]'"]);
        assert_eq!(parse_genres(r#"["", " "]"#), vec![r#"["", " "]"#]);
    }

    #[test]
    fn test_json_string_is_not_bracket_recovered() {
        assert_eq!(parse_genres(r#"'"[a, b]"'"#), vec![r#"'"[a, b]"'"#]);
    }

    #[test]
    fn test_non_string_items_are_stringified() {
        assert_eq!(parse_genres("[1, true]"), vec!["1", "true"]);
    }

    #[test]
    fn test_malformed_inputs_never_come_back_empty() {
        let inputs = [
            "",
            "'",
            "\"\"",
            "[",
            "]",
            "[[",
            "['unterminated",
            "['a',, 'b']",
            "{not json}",
            "['Baroque'] trailing",
            "'['",
            "\u{1F3A8}",
            "[]",
            "'[]'",
            "['', '']",
            "[,]",
        ];
        for input in inputs {
            let genres = parse_genres(input);
            assert!(!genres.is_empty(), "no genres for {input:?}");
            if !input.is_empty() {
                assert!(
                    genres.iter().all(|genre| !genre.is_empty()),
                    "blank genre in {genres:?} for {input:?}"
                );
            }
        }
    }

    #[test]
    fn test_partial_bracket_recovery() {
        assert_eq!(parse_genres("junk ['Baroque'] trailing"), vec!["Baroque"]);
        assert_eq!(parse_genres("['a',, 'b']"), vec!["a", "b"]);
        assert_eq!(parse_genres("['', '']"), vec!["['', '']"]);
    }

    #[test]
    fn test_genre_tone() {
        assert_eq!(genre_tone("Baroque"), "purple");
        assert_eq!(genre_tone("Minimalism"), "slate");
        assert_eq!(genre_tone("Fauvism"), "gray");
    }
}
