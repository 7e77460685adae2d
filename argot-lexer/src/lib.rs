#![no_std]

/*!
Low-level tokenizing for `argot`. Turns shell-like text into a stream of
typed tokens, and dispatches those tokens to a [`Visitor`], taking care of the
distinction between long keys, short flags, flag groups and positionals. No
type handling happens here. Usually this is too low level to use directly.
*/

extern crate alloc;

#[cfg(test)]
extern crate std;

mod lexer;

use alloc::string::String;
use core::{fmt, str::Chars};

pub use lexer::tokenize;

/// The three shapes a token can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Free text with no leading hyphen: `asdf`, `"quoted value"`.
    StringValue,

    /// A single hyphen followed by one or more flag letters: `-s`, `-abc`.
    ShortGroup,

    /// Two leading hyphens: `--this-is-long-key`.
    LongKey,
}

/**
A single token produced by [`tokenize`] or [`classify`].

For [`TokenKind::ShortGroup`] and [`TokenKind::LongKey`], the text includes
the leading hyphens. For [`TokenKind::StringValue`], quote delimiters have
been stripped and escapes resolved.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    #[inline]
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/**
Classify an argument that has already been split and unquoted (usually by a
shell), without any further lexing. `--…` is a long key, `-…` is a short
group, and everything else is a string value.
*/
#[must_use]
pub fn classify(argument: &str) -> Token {
    let kind = if argument.starts_with("--") {
        TokenKind::LongKey
    } else if argument.starts_with('-') {
        TokenKind::ShortGroup
    } else {
        TokenKind::StringValue
    };

    Token::new(kind, argument)
}

/**
A run of glommed short flags, like the `abc` in `-abc`. Always has at least
two letters; a single letter is passed to [`Visitor::visit_short`] instead.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortGroup<'tok> {
    flags: &'tok str,
}

impl<'tok> ShortGroup<'tok> {
    /// The flag letters, without the leading hyphen
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'tok str {
        self.flags
    }

    /// Each flag letter in the group, in order
    #[inline]
    pub fn flags(&self) -> Chars<'tok> {
        self.flags.chars()
    }
}

impl fmt::Display for ShortGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}", self.flags)
    }
}

/**
The [`TokenCursor`] type operates by passing the tokens it finds into a
[`Visitor`], to be handled.
 */
pub trait Visitor<'tok> {
    type Value;

    /// A positional value.
    fn visit_positional(self, argument: &'tok str) -> Self::Value;

    /// A long option or flag, such as `--option`. `option` includes the
    /// leading hyphens.
    fn visit_long(self, option: &'tok str, arg: impl ArgAccess<'tok>) -> Self::Value;

    /// A single short option or flag, such as `-o`
    fn visit_short(self, option: char, arg: impl ArgAccess<'tok>) -> Self::Value;

    /// A group of glommed short flags, such as `-abc`. Flags in a group can't
    /// take values.
    fn visit_short_group(self, group: ShortGroup<'tok>) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given option needs a value,
based on the identity of the option.

Consider `--foo bar`. Is this a flag `--foo` and a positional `bar`, or a
single option `--foo bar` that takes a value? The cursor can't classify this
on its own, so a visitor requests a value via this trait only for options that
need them.
*/
pub trait ArgAccess<'tok>: Sized {
    /**
    Consume the next token and return its raw text, whatever its kind. This
    should only be called by options that need a value; flags should ignore
    it, so that the next token is handled on its own.

    Returns [`None`] if the tokens have been exhausted.
    */
    fn take(self) -> Option<&'tok str>;
}

/**
A `TokenCursor` walks a sequence of [`Token`]s, sending each one to the given
[`Visitor`] in a call to [`next_arg`][TokenCursor::next_arg].

The cursor operates entirely on borrowed tokens. The `'tok` lifetime refers to
the token buffer, which lives for one parse call.
*/
#[derive(Debug, Clone)]
pub struct TokenCursor<I> {
    tokens: I,
}

impl<'tok, I> TokenCursor<I>
where
    I: Iterator<Item = &'tok Token>,
{
    #[inline]
    #[must_use]
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'tok>,
    {
        let token = self.tokens.next()?;
        let text = token.text();

        Some(match token.kind() {
            TokenKind::StringValue => visitor.visit_positional(text),
            TokenKind::LongKey => visitor.visit_long(text, NextToken { tokens: &mut self.tokens }),
            TokenKind::ShortGroup => {
                let flags = text.strip_prefix('-').unwrap_or(text);
                let mut letters = flags.chars();

                match (letters.next(), letters.next()) {
                    // A bare `-` can only come from `classify`; treat it as a
                    // positional, like stdin in most tools.
                    (None, _) => visitor.visit_positional(text),
                    (Some(option), None) => {
                        visitor.visit_short(option, NextToken { tokens: &mut self.tokens })
                    }
                    (Some(_), Some(_)) => visitor.visit_short_group(ShortGroup { flags }),
                }
            }
        })
    }
}

/// ArgAccess implementation that takes the next token from the stream,
/// regardless of its kind.
struct NextToken<'a, I> {
    tokens: &'a mut I,
}

impl<'tok, I> ArgAccess<'tok> for NextToken<'_, I>
where
    I: Iterator<Item = &'tok Token>,
{
    #[inline]
    fn take(self) -> Option<&'tok str> {
        self.tokens.next().map(Token::text)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec, vec::Vec};

    use pretty_assertions::assert_eq;

    use super::*;

    /// Records each visit as a string, consuming option values for any
    /// option whose letter or name starts with `v`.
    struct Recorder<'a>(&'a mut Vec<String>);

    impl<'tok> Visitor<'tok> for Recorder<'_> {
        type Value = ();

        fn visit_positional(self, argument: &'tok str) {
            self.0.push(format!("pos:{argument}"));
        }

        fn visit_long(self, option: &'tok str, arg: impl ArgAccess<'tok>) {
            match option.starts_with("--v") {
                true => self.0.push(format!("long:{option}={:?}", arg.take())),
                false => self.0.push(format!("long:{option}")),
            }
        }

        fn visit_short(self, option: char, arg: impl ArgAccess<'tok>) {
            match option == 'v' {
                true => self.0.push(format!("short:{option}={:?}", arg.take())),
                false => self.0.push(format!("short:{option}")),
            }
        }

        fn visit_short_group(self, group: ShortGroup<'tok>) {
            self.0.push(format!("group:{group}"));
        }
    }

    fn record(tokens: &[Token]) -> Vec<String> {
        let mut cursor = TokenCursor::new(tokens);
        let mut log = Vec::new();

        while let Some(()) = cursor.next_arg(Recorder(&mut log)) {}

        log
    }

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify("--key"), Token::new(TokenKind::LongKey, "--key"));
        assert_eq!(classify("-abc"), Token::new(TokenKind::ShortGroup, "-abc"));
        assert_eq!(classify("-"), Token::new(TokenKind::ShortGroup, "-"));
        assert_eq!(
            classify("has \"quotes\""),
            Token::new(TokenKind::StringValue, "has \"quotes\"")
        );
    }

    #[test]
    fn options_take_the_next_token_whatever_its_kind() {
        let tokens = tokenize("--value --flag -v -x pos -ab");

        assert_eq!(
            record(&tokens),
            vec![
                "long:--value=Some(\"--flag\")",
                "short:v=Some(\"-x\")",
                "pos:pos",
                "group:-ab",
            ]
        );
    }

    #[test]
    fn flags_leave_the_next_token_alone() {
        let tokens = tokenize("--flag pos -f pos2");

        assert_eq!(
            record(&tokens),
            vec!["long:--flag", "pos:pos", "short:f", "pos:pos2"]
        );
    }

    #[test]
    fn missing_value_at_end() {
        let tokens = tokenize("--value");

        assert_eq!(record(&tokens), vec!["long:--value=None"]);
    }

    #[test]
    fn bare_hyphen_is_positional() {
        let tokens = [classify("-"), classify("--")];

        assert_eq!(record(&tokens), vec!["pos:-", "long:--"]);
    }

    #[test]
    fn unicode_short_flags() {
        let tokens = tokenize("-🤠 -🍏🍎");

        assert_eq!(record(&tokens), vec!["short:🤠", "group:-🍏🍎"]);
    }
}
