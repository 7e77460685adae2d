/*!
Error types for the various phases of binding: problems with a struct's
annotations ([`SchemaError`]), problems coercing a single value
([`ValueError`]), and everything that can abort a parse ([`Error`]).
 */

use std::io;

/// The field annotations of a [`Schema`][crate::Schema] are invalid. These
/// are detected while building the [`FieldIndex`][crate::FieldIndex], before
/// any tokens are bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// An annotation token isn't `positional`, `required`, `-x` or `--xyz`
    #[error("field `{field}` has an invalid annotation {token:?}")]
    InvalidAnnotation { field: &'static str, token: String },

    /// A field declared two long or two short spellings
    #[error("field `{field}` declares both {first} and {second}; use one of each kind at most")]
    RepeatedSpelling {
        field: &'static str,
        first: String,
        second: String,
    },

    /// Positional fields are bound by position only
    #[error("field `{field}` is positional, so it can't also have a short or long spelling")]
    PositionalWithSpelling { field: &'static str },

    /// Two fields share a spelling
    #[error("{spelling} is used by both `{first}` and `{second}`")]
    DuplicateSpelling {
        spelling: String,
        first: &'static str,
        second: &'static str,
    },

    /// Only one positional collection can collect the overflow
    #[error(
        "`{first}` and `{second}` are both positional collections; \
        at most one field can collect the remaining positionals"
    )]
    MultipleOverflow {
        first: &'static str,
        second: &'static str,
    },
}

/// A value couldn't be stored in a field. This contains no information about
/// the field itself; [`Error`] adds that context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The text didn't parse as the field's type
    #[error("{message}")]
    Invalid { message: String },

    /// The field's type can't be bound at all
    #[error("values of type `{type_name}` can't be bound from an argument")]
    Unsupported { type_name: &'static str },
}

/// Everything that can go wrong during a parse. The first error aborts the
/// parse; fields bound before it keep their new values.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A `--long` or `-s` option didn't match any field
    #[error("unrecognized option {key}")]
    UnknownKey { key: String },

    /// A flag in a `-abc` group is an option that takes a value
    #[error("{key} takes a value, so it can't be grouped with other flags in {group}")]
    NotAFlag { key: String, group: String },

    /// An option that takes a value was the last token
    #[error("{key} requires a value")]
    MissingValue { key: String },

    /// The value couldn't be parsed into the field's type
    #[error("invalid value {value:?} for `{field}`: {message}")]
    InvalidValue {
        field: &'static str,
        value: String,
        message: String,
    },

    /// A value was assigned to a field whose type can't be bound
    #[error("field `{field}` has type `{type_name}`, which can't be bound from an argument")]
    UnsupportedType {
        field: &'static str,
        type_name: &'static str,
    },

    /// There was nowhere to put a positional argument
    #[error("unexpected positional argument {value:?}")]
    UnexpectedPositional { value: String },

    /// A required field never got a value
    #[error("required argument {label} (field `{field}`) wasn't provided")]
    RequiredFieldMissing { field: &'static str, label: String },

    /// A process argument wasn't valid unicode
    #[error("argument {argument:?} isn't valid unicode")]
    InvalidUnicode { argument: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn value(field: &'static str, value: &str, error: ValueError) -> Self {
        match error {
            ValueError::Invalid { message } => Self::InvalidValue {
                field,
                value: value.to_owned(),
                message,
            },
            ValueError::Unsupported { type_name } => Self::UnsupportedType { field, type_name },
        }
    }
}
