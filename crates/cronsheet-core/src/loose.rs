//! Tolerant parsing of JSON-ish cell text.
//!
//! Sheet cells hold argument payloads in strict JSON, in Ruby hash
//! notation (`{:client_key => 'acme'}`), or in something in between.
//! Parsing runs an ordered chain of [`Attempt`]s; the first one that yields
//! a JSON object wins and the fallback is an empty object.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// A parsed key/value payload.
pub type JsonObject = Map<String, Value>;

/// One rewrite-then-parse step of the tolerant chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The text as-is.
    Strict,
    /// Every `=>` rewritten to `:`.
    ArrowToColon,
    /// Bare and symbol keys before `=>` quoted, remaining `=>` rewritten
    /// to `:`, single quotes turned into double quotes.
    Coerced,
}

/// Chain for argument columns: strict JSON first.
pub const ARGS_CHAIN: &[Attempt] = &[Attempt::Strict, Attempt::ArrowToColon, Attempt::Coerced];

/// Chain for the ETL `Scheduled` column, which is always hash-like.
pub const SCHEDULED_CHAIN: &[Attempt] = &[Attempt::ArrowToColon, Attempt::Coerced];

impl Attempt {
    fn rewrite(self, text: &str) -> Cow<'_, str> {
        match self {
            Attempt::Strict => Cow::Borrowed(text),
            Attempt::ArrowToColon => Cow::Owned(text.replace("=>", ":")),
            Attempt::Coerced => Cow::Owned(coerce(text)),
        }
    }

    /// Run this attempt; only JSON objects count as success.
    pub fn parse(self, text: &str) -> Option<JsonObject> {
        match serde_json::from_str::<Value>(&self.rewrite(text)) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Run `chain` over `text`, falling back to an empty object.
pub fn parse_with(chain: &[Attempt], text: &str) -> JsonObject {
    if text.is_empty() {
        return JsonObject::new();
    }
    chain
        .iter()
        .find_map(|attempt| attempt.parse(text))
        .unwrap_or_default()
}

/// Parse an argument payload.
///
/// ```
/// use cronsheet_core::loose::parse_args;
///
/// let args = parse_args("{:client_key => 'acme', 'channel' => 'email'}");
/// assert_eq!(args["client_key"], "acme");
/// assert_eq!(args["channel"], "email");
/// ```
pub fn parse_args(text: &str) -> JsonObject {
    parse_with(ARGS_CHAIN, text)
}

/// Parse a Ruby-hash-like `Scheduled` cell.
pub fn parse_rubyish(text: &str) -> JsonObject {
    parse_with(SCHEDULED_CHAIN, text)
}

fn coerce(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;
    while let Some(pos) = rest.find("=>") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 2..];
        push_key_separator(&mut out);
    }
    out.push_str(rest);
    out.replace('\'', "\"")
}

/// Quote the identifier (optionally a `:symbol`) that precedes a `=>`
/// and terminate it with `:`. Without an identifier just emit `:`.
fn push_key_separator(out: &mut String) {
    let end = out.trim_end().len();
    let start = out[..end]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map(|(i, _)| i);

    let Some(start) = start else {
        out.push(':');
        return;
    };

    let key = out[start..end].to_string();
    let cut = if out[..start].ends_with(':') {
        start - 1
    } else {
        start
    };
    out.truncate(cut);
    out.push('"');
    out.push_str(&key);
    out.push_str("\":");
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
