// Just enough HTML tokenizing to walk autoindex pages.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<!(?:[^>])*>|<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("tag regex is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    EndTag {
        name: String,
    },
    Text(String),
}

impl Token {
    pub fn is_start(&self, tag: &str) -> bool {
        matches!(self, Token::StartTag { name, .. } if name == tag)
    }

    pub fn is_end(&self, tag: &str) -> bool {
        matches!(self, Token::EndTag { name } if name == tag)
    }

    /// Value of attribute `key` on a start tag.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Token::StartTag { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Splits `html` into start tags, end tags and decoded text runs.
/// Comments and doctype declarations are dropped.
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TAG_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut tokens, &html[last..whole.start()]);
        last = whole.end();

        let Some(name) = caps.get(2) else { continue };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            tokens.push(Token::EndTag { name });
        } else {
            let attrs = caps.get(3).map(|m| parse_attrs(m.as_str())).unwrap_or_default();
            tokens.push(Token::StartTag { name, attrs });
        }
    }
    push_text(&mut tokens, &html[last..]);
    tokens
}

fn push_text(tokens: &mut Vec<Token>, raw: &str) {
    if !raw.is_empty() {
        tokens.push(Token::Text(decode_entities(raw)));
    }
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            Some((key, value))
        })
        .collect()
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
