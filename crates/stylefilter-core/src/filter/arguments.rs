use crate::filter::ArgumentError;
use serde_json::{Number, Value};

pub const DEFAULT_SEPARATOR: char = ',';

/// Text rendering of a clause's argument list, as typed into a single input
/// field. Blank text is an empty list; a double-quoted token is always a
/// string, so `""` stands for one empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentFormat {
    pub separator: char,
    pub trim: bool,
    pub infer_types: bool,
}

impl Default for ArgumentFormat {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            trim: true,
            infer_types: true,
        }
    }
}

impl ArgumentFormat {
    /// Separators must not occur inside a quote, an escape, or a bare
    /// number, or formatted text would not parse back to the same values.
    pub fn is_valid_separator(separator: char) -> bool {
        !(matches!(separator, '"' | '\\' | '.' | '-' | '+')
            || separator.is_whitespace()
            || separator.is_ascii_alphanumeric())
    }

    pub fn parse_arguments(&self, text: &str) -> Result<Vec<Value>, ArgumentError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        split_fields(text, self.separator)?
            .into_iter()
            .map(|field| self.parse_field(field))
            .collect()
    }

    pub fn format_arguments(&self, arguments: &[Value]) -> String {
        let mut out = String::new();
        for (idx, value) in arguments.iter().enumerate() {
            if idx > 0 {
                out.push(self.separator);
            }
            match value {
                Value::String(text) if self.needs_quotes(text) => push_quoted(&mut out, text),
                Value::String(text) => out.push_str(text),
                other => out.push_str(&other.to_string()),
            }
        }
        out
    }

    fn parse_field(&self, field: &str) -> Result<Value, ArgumentError> {
        let trimmed = field.trim();
        if let Some(rest) = trimmed.strip_prefix('"') {
            return unquote(rest).map(Value::String);
        }

        let token = if self.trim { trimmed } else { field };
        if self.infer_types {
            if let Some(value) = infer_scalar(token) {
                return Ok(value);
            }
        }
        Ok(Value::String(token.to_string()))
    }

    fn needs_quotes(&self, text: &str) -> bool {
        if text.is_empty() || text.contains(self.separator) {
            return true;
        }
        if text.trim_start().starts_with('"') {
            return true;
        }
        if self.trim && text.trim() != text {
            return true;
        }
        self.infer_types && infer_scalar(text).is_some()
    }
}

fn split_fields(text: &str, separator: char) -> Result<Vec<&str>, ArgumentError> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut field_started = false;

    for (idx, ch) in text.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quotes = false;
            }
            continue;
        }

        if ch == separator {
            fields.push(&text[start..idx]);
            start = idx + ch.len_utf8();
            field_started = false;
        } else if ch == '"' && !field_started {
            in_quotes = true;
            field_started = true;
        } else if !ch.is_whitespace() {
            field_started = true;
        }
    }

    if in_quotes {
        return Err(ArgumentError::UnterminatedQuote);
    }
    fields.push(&text[start..]);
    Ok(fields)
}

fn unquote(rest: &str) -> Result<String, ArgumentError> {
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => return Err(ArgumentError::UnterminatedQuote),
            },
            '"' => {
                let trailing = rest[idx + 1..].trim();
                if !trailing.is_empty() {
                    return Err(ArgumentError::TrailingText(trailing.to_string()));
                }
                return Ok(out);
            }
            _ => out.push(ch),
        }
    }
    Err(ArgumentError::UnterminatedQuote)
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

fn infer_scalar(token: &str) -> Option<Value> {
    match token {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if let Ok(int) = token.parse::<i64>() {
        return Some(Value::Number(Number::from(int)));
    }
    if let Ok(int) = token.parse::<u64>() {
        return Some(Value::Number(Number::from(int)));
    }
    // f64 parsing also accepts words like "inf" and "NaN"
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
        return None;
    }
    let float = token.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::ArgumentFormat;
    use crate::filter::ArgumentError;
    use serde_json::json;

    #[test]
    fn blank_text_is_no_arguments() {
        let format = ArgumentFormat::default();
        assert!(format.parse_arguments("").unwrap().is_empty());
        assert!(format.parse_arguments("   ").unwrap().is_empty());
    }

    #[test]
    fn quoted_empty_string_is_one_argument() {
        let format = ArgumentFormat::default();
        assert_eq!(format.parse_arguments("\"\"").unwrap(), vec![json!("")]);
        assert_eq!(format.format_arguments(&[json!("")]), "\"\"");
    }

    #[test]
    fn infers_scalars() {
        let format = ArgumentFormat::default();
        assert_eq!(
            format.parse_arguments("park, 3, 2.5, true, \"4\", inf").unwrap(),
            vec![json!("park"), json!(3), json!(2.5), json!(true), json!("4"), json!("inf")]
        );
    }

    #[test]
    fn keeps_strings_without_inference() {
        let format = ArgumentFormat {
            infer_types: false,
            ..ArgumentFormat::default()
        };
        assert_eq!(
            format.parse_arguments("3,true").unwrap(),
            vec![json!("3"), json!("true")]
        );
    }

    #[test]
    fn untrimmed_fields_keep_spaces() {
        let format = ArgumentFormat {
            trim: false,
            infer_types: false,
            ..ArgumentFormat::default()
        };
        assert_eq!(
            format.parse_arguments("a, b").unwrap(),
            vec![json!("a"), json!(" b")]
        );
    }

    #[test]
    fn separator_inside_quotes() {
        let format = ArgumentFormat::default();
        assert_eq!(
            format.parse_arguments("\"a,b\",c").unwrap(),
            vec![json!("a,b"), json!("c")]
        );
        assert_eq!(
            format.parse_arguments("\"say \\\"hi\\\"\"").unwrap(),
            vec![json!("say \"hi\"")]
        );
    }

    #[test]
    fn custom_separator() {
        let format = ArgumentFormat {
            separator: '|',
            ..ArgumentFormat::default()
        };
        assert_eq!(
            format.parse_arguments("a,b|c").unwrap(),
            vec![json!("a,b"), json!("c")]
        );
        assert_eq!(format.format_arguments(&[json!("a,b"), json!(1)]), "a,b|1");
    }

    #[test]
    fn malformed_quotes() {
        let format = ArgumentFormat::default();
        assert_eq!(
            format.parse_arguments("\"abc").unwrap_err(),
            ArgumentError::UnterminatedQuote
        );
        assert_eq!(
            format.parse_arguments("\"abc\"def").unwrap_err(),
            ArgumentError::TrailingText("def".to_string())
        );
    }

    #[test]
    fn format_quotes_ambiguous_strings() {
        let format = ArgumentFormat::default();
        let arguments = vec![json!("park"), json!("3"), json!(3), json!("a,b"), json!(" x")];
        let text = format.format_arguments(&arguments);
        assert_eq!(text, "park,\"3\",3,\"a,b\",\" x\"");
        assert_eq!(format.parse_arguments(&text).unwrap(), arguments);
    }

    #[test]
    fn separator_validation() {
        assert!(ArgumentFormat::is_valid_separator(','));
        assert!(ArgumentFormat::is_valid_separator(';'));
        assert!(!ArgumentFormat::is_valid_separator('"'));
        assert!(!ArgumentFormat::is_valid_separator(' '));
        for separator in ['.', '-', '+', 'e', 'E', '7'] {
            assert!(!ArgumentFormat::is_valid_separator(separator), "{separator}");
        }
        assert!(ArgumentFormat::is_valid_separator('|'));
    }

    #[test]
    fn large_unsigned_integers_keep_precision() {
        let format = ArgumentFormat::default();
        let parsed = format.parse_arguments("18446744073709551615").unwrap();
        assert_eq!(parsed, vec![json!(u64::MAX)]);
        assert_eq!(format.format_arguments(&parsed), "18446744073709551615");
    }
}
