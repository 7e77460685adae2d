/*!
Bind shell-like command lines into plain structs, driven by per-field
annotations.

Each field of the target struct carries an annotation: a comma separated list
of a short spelling (`-v`), a long spelling (`--verbose`), `positional`, and
`required`. Text is split into tokens with shell-like quoting (see
[`argot_lexer::tokenize`]) and then bound field by field:

```
use argot::Schema;

#[derive(Debug, Default, Schema)]
struct Arguments {
    #[arg("-v,--verbose")]
    verbose: bool,

    #[arg("--jobs")]
    jobs: i64,

    #[arg("--tag,-t")]
    tags: Vec<String>,

    #[arg("positional,required")]
    input: String,

    #[arg("positional")]
    rest: Vec<String>,
}

let mut args = Arguments::default();
argot::parse(r#"-v --jobs 4 -t a --tag "b c" in.txt x y"#, &mut args).unwrap();

assert!(args.verbose);
assert_eq!(args.jobs, 4);
assert_eq!(args.tags, ["a", "b c"]);
assert_eq!(args.input, "in.txt");
assert_eq!(args.rest, ["x", "y"]);
```

Supported field types are `bool` (a flag), `i64`, `String`, `Vec<i64>` and
`Vec<String>`. Instead of deriving [`Schema`][trait@Schema], you can implement
it by hand, listing each field as a [`FieldSpec`].

The free functions use a default [`Parser`], which rejects anything it
doesn't recognize. Use [`Parser`] directly to opt in to skipping unknown
arguments instead.
*/

pub mod arguments;
mod bind;
pub mod errors;
pub mod index;
pub mod parser;
pub mod schema;

use core::fmt;
use std::io;

pub use argot_derive::Schema;
pub use argot_lexer::{Token, TokenKind, classify, tokenize};

pub use crate::arguments::LoadedArguments;
pub use crate::errors::{Error, SchemaError};
pub use crate::index::FieldIndex;
pub use crate::parser::{Parser, UnknownArguments};
pub use crate::schema::{FieldRef, FieldSpec, Schema, UnsupportedList};

/// The set of spellings that identify a particular option (`-s`, `--long`).
/// Long spellings include their leading `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tags<'a> {
    /// This field uses only a long spelling
    Long { long: &'a str },

    /// This field uses only a short spelling
    Short { short: char },

    /// This field uses both a long and short spelling
    LongShort { long: &'a str, short: char },
}

impl<'a> Tags<'a> {
    /// Build tags out of optional spellings. Returns `None` if both are absent.
    #[inline]
    #[must_use]
    pub const fn new(long: Option<&'a str>, short: Option<char>) -> Option<Self> {
        match (long, short) {
            (None, None) => None,
            (Some(long), None) => Some(Tags::Long { long }),
            (None, Some(short)) => Some(Tags::Short { short }),
            (Some(long), Some(short)) => Some(Tags::LongShort { long, short }),
        }
    }

    /// Get the long spelling, if any
    #[inline]
    #[must_use]
    pub const fn long(&self) -> Option<&'a str> {
        match *self {
            Tags::Long { long } | Tags::LongShort { long, .. } => Some(long),
            Tags::Short { .. } => None,
        }
    }

    /// Get the short spelling, if any
    #[inline]
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        match *self {
            Tags::Short { short } | Tags::LongShort { short, .. } => Some(short),
            Tags::Long { .. } => None,
        }
    }
}

/// Prefers the long spelling, since it's usually the more descriptive one.
impl fmt::Display for Tags<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Tags::Long { long } | Tags::LongShort { long, .. } => f.write_str(long),
            Tags::Short { short } => write!(f, "-{short}"),
        }
    }
}

/// Tokenize `text` and bind it into `target`, using a default [`Parser`].
pub fn parse<S>(text: &str, target: &mut S) -> Result<(), Error>
where
    S: Schema + ?Sized,
{
    Parser::default().parse(text, target)
}

/// Join `parts` with single spaces, then [`parse`] the result. See
/// [`Parser::parse_parts`] for the caveats.
pub fn parse_parts<I, S>(parts: I, target: &mut S) -> Result<(), Error>
where
    I: IntoIterator,
    I::Item: fmt::Display,
    S: Schema + ?Sized,
{
    Parser::default().parse_parts(parts, target)
}

/// Bind already-split arguments into `target`, with no quote handling. See
/// [`Parser::parse_args`].
pub fn parse_args<I, S>(args: I, target: &mut S) -> Result<(), Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    S: Schema + ?Sized,
{
    Parser::default().parse_args(args, target)
}

/// Read all of `reader` as text, then [`parse`] it.
pub fn parse_reader<R, S>(reader: R, target: &mut S) -> Result<(), Error>
where
    R: io::Read,
    S: Schema + ?Sized,
{
    Parser::default().parse_reader(reader, target)
}
