use core::fmt::Display;

use argot_lexer::{ArgAccess, ShortGroup, Token, TokenCursor, Visitor};
use lazy_format::lazy_format;

use crate::errors::Error;
use crate::index::{FieldId, FieldIndex};
use crate::parser::UnknownArguments;

/// Binds tokens one at a time into the fields of a [`FieldIndex`]. Tracks the
/// next free positional slot.
struct Binder<'i, 'a> {
    index: &'i mut FieldIndex<'a>,
    position: usize,
    unknown: UnknownArguments,
}

impl Binder<'_, '_> {
    /// Handle an argument that doesn't match anything in the index
    fn unrecognized(&self, error: Error) -> Result<(), Error> {
        match self.unknown {
            UnknownArguments::Reject => Err(error),
            UnknownArguments::Skip => {
                tracing::debug!(%error, "skipping unrecognized argument");
                Ok(())
            }
        }
    }

    /// An option matched the field `id`. Flags are raised; anything else
    /// consumes the next token as its value.
    fn present<'tok>(
        &mut self,
        id: FieldId,
        key: impl Display,
        arg: impl ArgAccess<'tok>,
    ) -> Result<(), Error> {
        let field = self.index.field_mut(id);

        if field.raise() {
            return Ok(());
        }

        match arg.take() {
            Some(value) => field.assign(value),
            None => Err(Error::MissingValue {
                key: key.to_string(),
            }),
        }
    }
}

impl<'tok> Visitor<'tok> for &mut Binder<'_, '_> {
    type Value = Result<(), Error>;

    fn visit_positional(self, argument: &'tok str) -> Self::Value {
        tracing::trace!(argument, position = self.position, "positional");

        let id = match self.index.slot(self.position) {
            Some(id) => {
                self.position += 1;
                id
            }
            None => match self.index.overflow() {
                Some(id) => id,
                None => {
                    return self.unrecognized(Error::UnexpectedPositional {
                        value: argument.to_owned(),
                    });
                }
            },
        };

        self.index.field_mut(id).assign(argument)
    }

    fn visit_long(self, option: &'tok str, arg: impl ArgAccess<'tok>) -> Self::Value {
        tracing::trace!(option, "long option");

        match self.index.long(option) {
            Some(id) => self.present(id, option, arg),
            None => self.unrecognized(Error::UnknownKey {
                key: option.to_owned(),
            }),
        }
    }

    fn visit_short(self, option: char, arg: impl ArgAccess<'tok>) -> Self::Value {
        tracing::trace!(%option, "short option");

        let key = lazy_format!("-{option}");

        match self.index.short(option) {
            Some(id) => self.present(id, key, arg),
            None => self.unrecognized(Error::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    fn visit_short_group(self, group: ShortGroup<'tok>) -> Self::Value {
        tracing::trace!(%group, "short flag group");

        for option in group.flags() {
            let key = lazy_format!("-{option}");

            match self.index.short(option) {
                None => self.unrecognized(Error::UnknownKey {
                    key: key.to_string(),
                })?,
                Some(id) => {
                    if !self.index.field_mut(id).raise() {
                        return Err(Error::NotAFlag {
                            key: key.to_string(),
                            group: group.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Bind every token into `index`, in order. Stops at the first error.
pub(crate) fn bind_tokens(
    tokens: &[Token],
    index: &mut FieldIndex<'_>,
    unknown: UnknownArguments,
) -> Result<(), Error> {
    let mut cursor = TokenCursor::new(tokens);
    let mut binder = Binder {
        index,
        position: 0,
        unknown,
    };

    while let Some(result) = cursor.next_arg(&mut binder) {
        result?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use argot_lexer::tokenize;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::{FieldSpec, Schema};

    #[derive(Debug, Default)]
    struct Sample {
        all: bool,
        brief: bool,
        color: String,
        depth: i64,
        first: String,
        rest: Vec<String>,
    }

    impl Schema for Sample {
        fn fields(&mut self) -> Vec<FieldSpec<'_>> {
            vec![
                FieldSpec::new("all", "-a", &mut self.all),
                FieldSpec::new("brief", "-b,--brief", &mut self.brief),
                FieldSpec::new("color", "-c,--color", &mut self.color),
                FieldSpec::new("depth", "--depth", &mut self.depth),
                FieldSpec::new("first", "positional", &mut self.first),
                FieldSpec::new("rest", "positional", &mut self.rest),
            ]
        }
    }

    fn bind(text: &str, sample: &mut Sample, unknown: UnknownArguments) -> Result<(), Error> {
        let tokens = tokenize(text);
        let mut index = FieldIndex::build(sample)?;
        bind_tokens(&tokens, &mut index, unknown)
    }

    #[test]
    fn positionals_fill_slots_then_overflow() {
        let mut sample = Sample::default();
        bind("one two three", &mut sample, UnknownArguments::Reject).unwrap();

        assert_eq!(sample.first, "one");
        assert_eq!(sample.rest, ["two", "three"]);
    }

    #[test]
    fn values_are_taken_verbatim() {
        let mut sample = Sample::default();
        bind("--color --brief -b", &mut sample, UnknownArguments::Reject).unwrap();

        assert_eq!(sample.color, "--brief");
        assert!(sample.brief);
    }

    #[test]
    fn grouped_flags() {
        let mut sample = Sample::default();
        bind("-ab", &mut sample, UnknownArguments::Reject).unwrap();

        assert!(sample.all);
        assert!(sample.brief);
    }

    #[test]
    fn valued_option_in_group() {
        let mut sample = Sample::default();
        let error = bind("-abc", &mut sample, UnknownArguments::Reject).unwrap_err();

        match error {
            Error::NotAFlag { key, group } => {
                assert_eq!(key, "-c");
                assert_eq!(group, "-abc");
            }
            other => panic!("expected NotAFlag, got {other:?}"),
        }

        // Flags before the bad letter were already raised
        assert!(sample.all);
    }

    #[test]
    fn unknown_letter_in_group() {
        let mut sample = Sample::default();
        let error = bind("-azb", &mut sample, UnknownArguments::Reject).unwrap_err();

        match error {
            Error::UnknownKey { key } => assert_eq!(key, "-z"),
            other => panic!("expected UnknownKey, got {other:?}"),
        }

        assert!(sample.all);
        assert!(!sample.brief);
    }

    #[test]
    fn missing_value_names_the_key() {
        let mut sample = Sample::default();

        assert!(matches!(
            bind("-c", &mut sample, UnknownArguments::Reject),
            Err(Error::MissingValue { key }) if key == "-c"
        ));
        assert!(matches!(
            bind("--depth", &mut sample, UnknownArguments::Reject),
            Err(Error::MissingValue { key }) if key == "--depth"
        ));
    }

    #[test]
    fn skipping_unknown_arguments() {
        let mut sample = Sample::default();
        bind(
            "--nope -z -azb one two",
            &mut sample,
            UnknownArguments::Skip,
        )
        .unwrap();

        assert!(sample.all);
        assert!(sample.brief);
        assert_eq!(sample.first, "one");
        assert_eq!(sample.rest, ["two"]);
    }

    #[test]
    fn skipping_still_rejects_valued_options_in_groups() {
        let mut sample = Sample::default();

        assert!(matches!(
            bind("-zc", &mut sample, UnknownArguments::Skip),
            Err(Error::NotAFlag { .. })
        ));
    }
}
