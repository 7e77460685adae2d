/*!
The [`Schema`] trait, which describes the bindable fields of a struct, and
the [`FieldRef`] handles used to write into them.

Usually you'll get a [`Schema`] implementation from `#[derive(Schema)]`, but
writing one by hand is straightforward:

```
use argot::{FieldRef, FieldSpec, Schema};

#[derive(Default)]
struct Arguments {
    verbose: bool,
    paths: Vec<String>,
}

impl Schema for Arguments {
    fn fields(&mut self) -> Vec<FieldSpec<'_>> {
        vec![
            FieldSpec::new("verbose", "-v,--verbose", &mut self.verbose),
            FieldSpec::new("paths", "positional", &mut self.paths),
        ]
    }
}

let mut args = Arguments::default();
argot::parse("a -v b", &mut args).unwrap();

assert!(args.verbose);
assert_eq!(args.paths, ["a", "b"]);
```
*/

use core::fmt;
use std::num::ParseIntError;

use crate::errors::ValueError;

/**
A struct whose fields can be bound from command line arguments.

[`fields`][Schema::fields] lists every bindable field in declaration order,
each with its annotation and a mutable handle to its storage. It's called
once per parse.
*/
pub trait Schema {
    fn fields(&mut self) -> Vec<FieldSpec<'_>>;
}

/**
One field of a [`Schema`]: its name, its annotation, and a handle to its
storage.

The annotation is a comma separated list of tokens: `positional`, `required`,
a short spelling like `-v`, or a long spelling like `--verbose`. Whitespace
around each token is ignored.
*/
#[derive(Debug)]
pub struct FieldSpec<'a> {
    pub(crate) name: &'static str,
    pub(crate) annotation: &'a str,
    pub(crate) placeholder: Option<&'static str>,
    pub(crate) slot: FieldRef<'a>,
}

impl<'a> FieldSpec<'a> {
    #[inline]
    #[must_use]
    pub fn new(name: &'static str, annotation: &'a str, slot: impl Into<FieldRef<'a>>) -> Self {
        Self {
            name,
            annotation,
            placeholder: None,
            slot: slot.into(),
        }
    }

    /// Describe a field whose type can't be bound. The field can still be
    /// declared, but assigning a value to it is an error.
    #[inline]
    #[must_use]
    pub fn unsupported(name: &'static str, annotation: &'a str, type_name: &'static str) -> Self {
        Self::new(name, annotation, FieldRef::Unsupported(type_name))
    }

    /// Describe a `Vec` whose element type can't be bound. Like any other
    /// collection it's emptied before each parse and can collect the
    /// remaining positionals, but assigning a value to it is an error.
    #[inline]
    #[must_use]
    pub fn unsupported_list<T>(
        name: &'static str,
        annotation: &'a str,
        type_name: &'static str,
        list: &'a mut Vec<T>,
    ) -> Self {
        Self::new(
            name,
            annotation,
            FieldRef::unsupported_list(type_name, list),
        )
    }

    /// Set the user-facing name of this field, used in error messages for
    /// positional fields. Defaults to the field name.
    #[inline]
    #[must_use]
    pub fn placeholder(self, placeholder: &'static str) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn annotation(&self) -> &'a str {
        self.annotation
    }
}

/// Anything that can be emptied, regardless of what it holds
trait Clear {
    fn clear(&mut self);
}

impl<T> Clear for Vec<T> {
    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// A `Vec` of some element type that can't be bound. It can only be emptied.
pub struct UnsupportedList<'a> {
    type_name: &'static str,
    list: &'a mut dyn Clear,
}

impl UnsupportedList<'_> {
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for UnsupportedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsupportedList")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/**
A mutable handle to a single field's storage. Only a small set of types can
be bound; anything else is described with [`FieldRef::Unsupported`] (or
[`FieldRef::UnsupportedList`] for a `Vec`), which fails on the first attempt
to assign to it.
*/
#[derive(Debug)]
#[non_exhaustive]
pub enum FieldRef<'a> {
    /// A flag. Set to `true` when it appears, never takes a value
    Flag(&'a mut bool),
    Int(&'a mut i64),
    Text(&'a mut String),
    IntList(&'a mut Vec<i64>),
    TextList(&'a mut Vec<String>),

    /// A field of some other type, given by name
    Unsupported(&'static str),

    /// A `Vec` of some other element type. It's still a collection: it's
    /// emptied before each parse and can be the positional overflow.
    UnsupportedList(UnsupportedList<'a>),
}

macro_rules! field_refs {
    ($($variant:ident: $type:ty,)*) => {
        $(
            impl<'a> From<&'a mut $type> for FieldRef<'a> {
                #[inline]
                fn from(slot: &'a mut $type) -> Self {
                    Self::$variant(slot)
                }
            }
        )*
    };
}

field_refs! {
    Flag: bool,
    Int: i64,
    Text: String,
    IntList: Vec<i64>,
    TextList: Vec<String>,
}

impl<'a> FieldRef<'a> {
    /// Describe a `Vec` whose element type can't be bound, keeping enough of
    /// a handle to empty it.
    #[inline]
    #[must_use]
    pub fn unsupported_list<T>(type_name: &'static str, list: &'a mut Vec<T>) -> Self {
        Self::UnsupportedList(UnsupportedList { type_name, list })
    }

    /// True if this field is a boolean flag, which never takes a value
    #[inline]
    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag(_))
    }

    /// True if this field collects every value it's given
    #[inline]
    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            Self::IntList(_) | Self::TextList(_) | Self::UnsupportedList(_)
        )
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match *self {
            Self::Flag(_) => "bool",
            Self::Int(_) => "i64",
            Self::Text(_) => "String",
            Self::IntList(_) => "Vec<i64>",
            Self::TextList(_) => "Vec<String>",
            Self::Unsupported(type_name) => type_name,
            Self::UnsupportedList(ref list) => list.type_name(),
        }
    }

    /// Empty out collections, so that nothing leaks in from a previous parse.
    pub(crate) fn reset(&mut self) {
        match self {
            Self::IntList(list) => list.clear(),
            Self::TextList(list) => list.clear(),
            Self::UnsupportedList(list) => list.list.clear(),
            Self::Flag(_) | Self::Int(_) | Self::Text(_) | Self::Unsupported(_) => {}
        }
    }

    /// Returns false if this isn't a flag.
    pub(crate) fn raise_flag(&mut self) -> bool {
        match self {
            Self::Flag(flag) => {
                **flag = true;
                true
            }
            _ => false,
        }
    }

    /// Coerce `value` into this field's type, then either replace the current
    /// value or append to the collection.
    pub(crate) fn assign(&mut self, value: &str) -> Result<(), ValueError> {
        match self {
            Self::Int(slot) => **slot = parse_int(value)?,
            Self::Text(slot) => **slot = value.to_owned(),
            Self::IntList(list) => list.push(parse_int(value)?),
            Self::TextList(list) => list.push(value.to_owned()),
            Self::Flag(_) | Self::Unsupported(_) | Self::UnsupportedList(_) => {
                return Err(ValueError::Unsupported {
                    type_name: self.type_name(),
                });
            }
        }

        Ok(())
    }
}

fn parse_int(value: &str) -> Result<i64, ValueError> {
    value.parse().map_err(|err: ParseIntError| ValueError::Invalid {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn assign_replaces_single_values() {
        let mut text = String::from("old");
        let mut slot = FieldRef::from(&mut text);

        slot.assign("a").unwrap();
        slot.assign("b").unwrap();

        assert_eq!(text, "b");
    }

    #[test]
    fn assign_appends_to_collections() {
        let mut list: Vec<i64> = Vec::new();
        let mut slot = FieldRef::from(&mut list);

        slot.assign("1").unwrap();
        slot.assign("-2").unwrap();
        slot.assign("+3").unwrap();

        assert_eq!(list, [1, -2, 3]);
    }

    #[test]
    fn reset_clears_collections_only() {
        let mut list = vec![String::from("stale")];
        let mut number: i64 = 7;

        FieldRef::from(&mut list).reset();
        FieldRef::from(&mut number).reset();

        assert!(list.is_empty());
        assert_eq!(number, 7);
    }

    #[test]
    fn bad_integers_are_invalid() {
        let mut number: i64 = 0;
        let error = FieldRef::from(&mut number).assign("abc").unwrap_err();

        assert!(matches!(error, ValueError::Invalid { .. }));
        assert_eq!(number, 0);
    }

    #[test]
    fn flags_and_unknown_types_reject_values() {
        let mut flag = false;

        assert!(matches!(
            FieldRef::from(&mut flag).assign("true"),
            Err(ValueError::Unsupported { type_name: "bool" })
        ));
        assert!(matches!(
            FieldRef::Unsupported("f64").assign("1.5"),
            Err(ValueError::Unsupported { type_name: "f64" })
        ));
        assert!(!flag);
    }

    #[test]
    fn unsupported_lists_are_collections() {
        let mut ratios = vec![1.5_f64, 2.5];
        let mut slot = FieldRef::unsupported_list("Vec<f64>", &mut ratios);

        assert!(slot.is_multi());
        assert_eq!(slot.type_name(), "Vec<f64>");
        assert!(matches!(
            slot.assign("3.5"),
            Err(ValueError::Unsupported {
                type_name: "Vec<f64>"
            })
        ));

        slot.reset();
        assert!(ratios.is_empty());
    }

    #[test]
    fn only_flags_can_be_raised() {
        let mut flag = false;
        let mut text = String::new();

        assert!(FieldRef::from(&mut flag).raise_flag());
        assert!(!FieldRef::from(&mut text).raise_flag());
        assert!(flag);
    }
}
