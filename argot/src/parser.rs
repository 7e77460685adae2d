use core::fmt::Display;
use std::io::Read;

use argot_lexer::{Token, classify, tokenize};
use itertools::Itertools as _;

use crate::{bind::bind_tokens, errors::Error, index::FieldIndex, schema::Schema};

/// What to do with an argument that doesn't match any field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownArguments {
    /// Fail the parse with [`Error::UnknownKey`] or
    /// [`Error::UnexpectedPositional`]
    #[default]
    Reject,

    /// Log the argument and move on. A valued option in a flag group is
    /// still an error, as is a missing required field.
    Skip,
}

/**
Binds text or arguments into a [`Schema`].

Each parse builds a fresh [`FieldIndex`] from the target, binds tokens into it
left to right, and then checks that every required field was given. The first
problem ends the parse; fields bound before it keep their values.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    unknown: UnknownArguments,
}

impl Parser {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn unknown_arguments(self, unknown: UnknownArguments) -> Self {
        Self { unknown }
    }

    /// Tokenize `text` with shell-like quoting, then bind it into `target`
    pub fn parse<S>(&self, text: &str, target: &mut S) -> Result<(), Error>
    where
        S: Schema + ?Sized,
    {
        let tokens = tokenize(text);
        tracing::trace!(tokens = tokens.len(), "tokenized input");

        self.bind_into(&tokens, target)
    }

    /**
    Join `parts` with single spaces and parse the result. The parts are
    re-tokenized, so quote characters and whitespace inside a part are
    significant: `["a b"]` binds two positionals, not one. Use
    [`parse_args`][Parser::parse_args] to bind parts as-is.
    */
    pub fn parse_parts<I, S>(&self, parts: I, target: &mut S) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Display,
        S: Schema + ?Sized,
    {
        self.parse(&parts.into_iter().join(" "), target)
    }

    /// Bind arguments that were already split, typically by a shell. Each one
    /// is a single token, classified by its leading hyphens, with no quote or
    /// escape handling.
    pub fn parse_args<I, S>(&self, args: I, target: &mut S) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: Schema + ?Sized,
    {
        let tokens: Vec<Token> = args
            .into_iter()
            .map(|argument| classify(argument.as_ref()))
            .collect();

        self.bind_into(&tokens, target)
    }

    /// Read everything from `reader` and [`parse`][Parser::parse] it.
    pub fn parse_reader<R, S>(&self, mut reader: R, target: &mut S) -> Result<(), Error>
    where
        R: Read,
        S: Schema + ?Sized,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        self.parse(&text, target)
    }

    fn bind_into<S>(&self, tokens: &[Token], target: &mut S) -> Result<(), Error>
    where
        S: Schema + ?Sized,
    {
        let mut index = FieldIndex::build(target)?;
        self.bind(tokens, &mut index)
    }

    /// Bind tokens into an index that's already been built, then check for
    /// missing required fields.
    pub fn bind(&self, tokens: &[Token], index: &mut FieldIndex<'_>) -> Result<(), Error> {
        bind_tokens(tokens, index, self.unknown)?;
        index.check_required()
    }
}
