use alloc::{string::String, vec::Vec};
use core::mem;

use crate::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    MetHyphen,
    ReadingShortGroup,
    ReadingLongKey,
    ReadingBareString,
    ReadingQuoted { quote: char },
    Escaped { quote: char },
}

#[inline]
fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

#[inline]
fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        c => c,
    }
}

/// The token currently being built. `kind` stays `None` while we've only
/// seen a lone hyphen, which is never emitted on its own.
#[derive(Debug, Default)]
struct Pending {
    kind: Option<TokenKind>,
    text: String,
}

impl Pending {
    #[inline]
    fn start(&mut self, kind: TokenKind) {
        self.kind = Some(kind);
    }

    /// Emit the pending token (if it has a kind) and reset for the next one
    fn flush(&mut self, tokens: &mut Vec<Token>) {
        let text = mem::take(&mut self.text);

        if let Some(kind) = self.kind.take() {
            tokens.push(Token { kind, text });
        }
    }

    /// End of input: only non-empty tokens survive
    fn finish(mut self, tokens: &mut Vec<Token>) {
        if !self.text.is_empty() {
            self.flush(tokens);
        }
    }
}

/**
Split `input` into tokens, honoring `"`, `'` and `` ` `` quoting and
backslash escapes inside quotes.

This never fails. Malformed input degrades gracefully: an unterminated quote
runs to the end of the input, and a lone `-` is dropped. All validation is
left to whoever consumes the tokens.

```
use argot_lexer::{tokenize, Token, TokenKind};

assert_eq!(
    tokenize(r#"-abc --key "spaced value""#),
    [
        Token::new(TokenKind::ShortGroup, "-abc"),
        Token::new(TokenKind::LongKey, "--key"),
        Token::new(TokenKind::StringValue, "spaced value"),
    ]
);
```
*/
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending = Pending::default();
    let mut state = State::Initial;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        let mut consumed = c.len_utf8();

        state = match state {
            State::Initial if c.is_whitespace() => State::Initial,
            State::Initial if c == '-' => {
                pending.text.push(c);
                State::MetHyphen
            }
            State::Initial if is_quote(c) => {
                pending.start(TokenKind::StringValue);
                State::ReadingQuoted { quote: c }
            }
            State::Initial => {
                pending.start(TokenKind::StringValue);
                pending.text.push(c);
                State::ReadingBareString
            }

            State::MetHyphen if c == '-' => {
                pending.start(TokenKind::LongKey);
                pending.text.push(c);
                State::ReadingLongKey
            }
            State::MetHyphen if c.is_whitespace() => {
                pending.flush(&mut tokens);
                State::Initial
            }
            State::MetHyphen => {
                pending.start(TokenKind::ShortGroup);
                pending.text.push(c);
                State::ReadingShortGroup
            }

            State::ReadingShortGroup | State::ReadingLongKey | State::ReadingBareString
                if c.is_whitespace() =>
            {
                pending.flush(&mut tokens);
                State::Initial
            }
            unquoted @ (State::ReadingShortGroup
            | State::ReadingLongKey
            | State::ReadingBareString) => {
                pending.text.push(c);
                unquoted
            }

            // A closing quote ends the token immediately, even if another
            // quote follows with no whitespace: `"a""b"` is two tokens.
            State::ReadingQuoted { quote } if c == quote => {
                pending.flush(&mut tokens);
                State::Initial
            }
            State::ReadingQuoted { quote } if c == '\\' => State::Escaped { quote },
            State::ReadingQuoted { quote } => {
                // Copy the whole run up to the next quote or backslash. Both
                // are ASCII, so the match is always on a char boundary.
                let run = memchr::memchr2(quote as u8, b'\\', rest.as_bytes())
                    .unwrap_or(rest.len());
                pending.text.push_str(&rest[..run]);
                consumed = run;
                State::ReadingQuoted { quote }
            }

            State::Escaped { quote } => {
                pending.text.push(unescape(c));
                State::ReadingQuoted { quote }
            }
        };

        rest = &rest[consumed..];
    }

    pending.finish(&mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use pretty_assertions::assert_eq;

    use super::*;

    fn string(text: &str) -> Token {
        Token::new(TokenKind::StringValue, text)
    }

    fn short(text: &str) -> Token {
        Token::new(TokenKind::ShortGroup, text)
    }

    fn long(text: &str) -> Token {
        Token::new(TokenKind::LongKey, text)
    }

    #[test]
    fn single_tokens() {
        assert_eq!(tokenize("asdf"), vec![string("asdf")]);
        assert_eq!(tokenize("-s"), vec![short("-s")]);
        assert_eq!(
            tokenize("--this-is-long-key"),
            vec![long("--this-is-long-key")]
        );
    }

    #[test]
    fn short_then_long() {
        assert_eq!(
            tokenize("-s --this-is-long-key"),
            vec![short("-s"), long("--this-is-long-key")]
        );
    }

    #[test]
    fn quoted_value_keeps_spaces() {
        assert_eq!(
            tokenize(r#"--key "spaced value""#),
            vec![long("--key"), string("spaced value")]
        );
    }

    #[test]
    fn escapes_inside_quotes() {
        assert_eq!(
            tokenize(r#"-abc --key "\\spaced \"value\"""#),
            vec![short("-abc"), long("--key"), string(r#"\spaced "value""#)]
        );
    }

    #[test]
    fn control_escapes() {
        assert_eq!(
            tokenize(r#""a\nb" "a\tb" "a\rb" "a\\nb" "\q""#),
            vec![
                string("a\nb"),
                string("a\tb"),
                string("a\rb"),
                string("a\\nb"),
                string("q"),
            ]
        );
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(
            tokenize(r#"-abc --key "strange value"#),
            vec![short("-abc"), long("--key"), string("strange value")]
        );
        assert_eq!(
            tokenize(r#""unterminated value"#),
            vec![string("unterminated value")]
        );
    }

    #[test]
    fn unterminated_after_escape() {
        assert_eq!(tokenize(r#""abc\"#), vec![string("abc")]);
    }

    #[test]
    fn quote_right_after_closing_quote_opens_new_token() {
        assert_eq!(
            tokenize(r#"-abc --key "strange value"" -def"#),
            vec![
                short("-abc"),
                long("--key"),
                string("strange value"),
                string(" -def"),
            ]
        );
        assert_eq!(
            tokenize(r#""a""b""c""#),
            vec![string("a"), string("b"), string("c")]
        );
    }

    #[test]
    fn quotes_inside_keys_are_literal() {
        assert_eq!(
            tokenize(r#"--k@y-" abc"#),
            vec![long(r#"--k@y-""#), string("abc")]
        );
    }

    #[test]
    fn other_quotes_are_literal_inside_a_quote() {
        assert_eq!(
            tokenize(r#""mixed'quotes" 'a`b'"#),
            vec![string("mixed'quotes"), string("a`b")]
        );
    }

    #[test]
    fn all_three_quote_styles() {
        assert_eq!(
            tokenize("'value a' `value b` \"value c\""),
            vec![string("value a"), string("value b"), string("value c")]
        );
        assert_eq!(
            tokenize("`cmd with spaces`"),
            vec![string("cmd with spaces")]
        );
    }

    #[test]
    fn empty_quotes_make_empty_values() {
        assert_eq!(
            tokenize("'' \"\" ``"),
            vec![string(""), string(""), string("")]
        );
    }

    #[test]
    fn closing_quote_then_bare_text() {
        assert_eq!(tokenize(r#""abc"def"#), vec![string("abc"), string("def")]);
    }

    #[test]
    fn lone_hyphens_are_dropped() {
        assert!(tokenize("-").is_empty());
        assert_eq!(tokenize("- foo -"), vec![string("foo")]);
    }

    #[test]
    fn double_hyphen_is_a_long_key() {
        assert_eq!(tokenize("--"), vec![long("--")]);
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n  ").is_empty());
    }

    #[test]
    fn negative_numbers_are_short_groups() {
        assert_eq!(
            tokenize("-g -5 -999999"),
            vec![short("-g"), short("-5"), short("-999999")]
        );
    }

    #[test]
    fn unicode_code_points() {
        assert_eq!(
            tokenize("--long-🔑 🚌 -🍏🍎 \"🤡 🤡\""),
            vec![
                long("--long-🔑"),
                string("🚌"),
                short("-🍏🍎"),
                string("🤡 🤡"),
            ]
        );
    }
}
