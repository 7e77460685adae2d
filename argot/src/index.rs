/*!
The [`FieldIndex`]: lookup tables from spellings and positions to the fields
of a [`Schema`], built once per parse from the fields' annotations.
*/

use std::collections::{HashMap, hash_map::Entry};
use std::hash::Hash;

use crate::Tags;
use crate::errors::{Error, SchemaError};
use crate::schema::{FieldRef, FieldSpec, Schema};

/// Identifies a field in a [`FieldIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

/// The parsed form of a field annotation like `"-v,--verbose,required"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Annotation<'a> {
    long: Option<&'a str>,
    short: Option<char>,
    positional: bool,
    required: bool,
}

/// `-x`, where `x` is any single character other than `-` or whitespace
fn short_spelling(token: &str) -> Option<char> {
    let mut letters = token.strip_prefix('-')?.chars();

    match (letters.next(), letters.next()) {
        (Some(short), None) if short != '-' && !short.is_whitespace() => Some(short),
        _ => None,
    }
}

/// `--` followed by at least one character
fn long_spelling(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .filter(|name| !name.is_empty())
        .map(|_| token)
}

impl<'a> Annotation<'a> {
    fn parse(field: &'static str, annotation: &'a str) -> Result<Self, SchemaError> {
        let mut parsed = Self::default();

        for token in annotation.split(',').map(str::trim) {
            if token == "positional" {
                parsed.positional = true;
            } else if token == "required" {
                parsed.required = true;
            } else if let Some(long) = long_spelling(token) {
                if let Some(first) = parsed.long.replace(long) {
                    return Err(SchemaError::RepeatedSpelling {
                        field,
                        first: first.to_owned(),
                        second: long.to_owned(),
                    });
                }
            } else if let Some(short) = short_spelling(token) {
                if let Some(first) = parsed.short.replace(short) {
                    return Err(SchemaError::RepeatedSpelling {
                        field,
                        first: format!("-{first}"),
                        second: format!("-{short}"),
                    });
                }
            } else {
                return Err(SchemaError::InvalidAnnotation {
                    field,
                    token: token.to_owned(),
                });
            }
        }

        if parsed.positional && (parsed.long.is_some() || parsed.short.is_some()) {
            return Err(SchemaError::PositionalWithSpelling { field });
        }

        Ok(parsed)
    }
}

/// A single field in the index, along with whether it's been given a value
/// yet during this parse.
#[derive(Debug)]
pub struct FieldDescriptor<'a> {
    name: &'static str,
    placeholder: Option<&'static str>,
    tags: Option<Tags<'a>>,
    positional: bool,
    required: bool,
    presented: bool,
    slot: FieldRef<'a>,
}

impl<'a> FieldDescriptor<'a> {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn tags(&self) -> Option<Tags<'a>> {
        self.tags
    }

    #[inline]
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// True once this field has been given a value (or raised, for flags)
    #[inline]
    #[must_use]
    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// The Rust type of this field, as bound
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.slot.type_name()
    }

    /// How this field is described to users: its spelling, or its
    /// placeholder for positionals.
    #[must_use]
    pub fn label(&self) -> String {
        match self.tags {
            Some(tags) => tags.to_string(),
            None => format!("<{}>", self.placeholder.unwrap_or(self.name)),
        }
    }

    /// Set a flag field to true. Returns false (and changes nothing) if this
    /// field isn't a flag.
    pub(crate) fn raise(&mut self) -> bool {
        let raised = self.slot.raise_flag();
        self.presented |= raised;
        raised
    }

    /// Coerce and store a value in this field
    pub(crate) fn assign(&mut self, value: &str) -> Result<(), Error> {
        self.slot
            .assign(value)
            .map_err(|error| Error::value(self.name, value, error))?;

        self.presented = true;
        Ok(())
    }
}

/// Record `tag` as belonging to `id`, unless another field already claimed it
fn claim<T: Hash + Eq>(
    known: &mut HashMap<T, FieldId>,
    fields: &[FieldDescriptor<'_>],
    tag: Option<T>,
    id: FieldId,
    name: &'static str,
    spelling: impl FnOnce(&T) -> String,
) -> Result<(), SchemaError> {
    match tag {
        None => Ok(()),
        Some(tag) => match known.entry(tag) {
            Entry::Occupied(entry) => Err(SchemaError::DuplicateSpelling {
                spelling: spelling(entry.key()),
                first: fields[entry.get().0].name,
                second: name,
            }),
            Entry::Vacant(entry) => {
                entry.insert(id);
                Ok(())
            }
        },
    }
}

/**
Lookup tables for the fields of a [`Schema`], keyed by long spelling, short
spelling, and positional slot.

Positional fields that hold a single value get slots 0, 1, 2, … in declaration
order. The first positional collection (a `Vec` field) doesn't get a slot;
instead it collects every positional value after the slots are filled.

Building the index also empties every collection field, so a struct can be
reused for several parses without values leaking between them.
*/
#[derive(Debug)]
pub struct FieldIndex<'a> {
    fields: Vec<FieldDescriptor<'a>>,
    by_long: HashMap<&'a str, FieldId>,
    by_short: HashMap<char, FieldId>,
    slots: Vec<FieldId>,
    overflow: Option<FieldId>,
    required: Vec<FieldId>,
}

impl<'a> FieldIndex<'a> {
    /// Build the index for `target`, borrowing its fields for as long as the
    /// index lives.
    pub fn build<S>(target: &'a mut S) -> Result<Self, SchemaError>
    where
        S: Schema + ?Sized,
    {
        Self::from_specs(target.fields())
    }

    pub fn from_specs(specs: impl IntoIterator<Item = FieldSpec<'a>>) -> Result<Self, SchemaError> {
        let mut index = Self {
            fields: Vec::new(),
            by_long: HashMap::new(),
            by_short: HashMap::new(),
            slots: Vec::new(),
            overflow: None,
            required: Vec::new(),
        };

        for spec in specs {
            let FieldSpec {
                name,
                annotation,
                placeholder,
                mut slot,
            } = spec;

            let annotation = Annotation::parse(name, annotation)?;
            let id = FieldId(index.fields.len());

            slot.reset();

            claim(
                &mut index.by_long,
                &index.fields,
                annotation.long,
                id,
                name,
                |long| long.to_string(),
            )?;
            claim(
                &mut index.by_short,
                &index.fields,
                annotation.short,
                id,
                name,
                |short| format!("-{short}"),
            )?;

            if annotation.positional {
                match (slot.is_multi(), index.overflow) {
                    (false, _) => index.slots.push(id),
                    (true, None) => index.overflow = Some(id),
                    (true, Some(first)) => {
                        return Err(SchemaError::MultipleOverflow {
                            first: index.fields[first.0].name,
                            second: name,
                        });
                    }
                }
            }

            if annotation.required {
                index.required.push(id);
            }

            index.fields.push(FieldDescriptor {
                name,
                placeholder,
                tags: Tags::new(annotation.long, annotation.short),
                positional: annotation.positional,
                required: annotation.required,
                presented: false,
                slot,
            });
        }

        tracing::debug!(
            fields = index.fields.len(),
            slots = index.slots.len(),
            overflow = index.overflow.is_some(),
            "built field index"
        );

        Ok(index)
    }

    /// Every field, in declaration order
    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<'a>> {
        self.fields.iter()
    }

    #[inline]
    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldDescriptor<'a> {
        &self.fields[id.0]
    }

    #[inline]
    pub(crate) fn field_mut(&mut self, id: FieldId) -> &mut FieldDescriptor<'a> {
        &mut self.fields[id.0]
    }

    /// Look up a field by its full long spelling, including the `--`
    #[inline]
    #[must_use]
    pub fn long(&self, option: &str) -> Option<FieldId> {
        self.by_long.get(option).copied()
    }

    #[inline]
    #[must_use]
    pub fn short(&self, option: char) -> Option<FieldId> {
        self.by_short.get(&option).copied()
    }

    /// The single-value positional field at this slot, if any
    #[inline]
    #[must_use]
    pub fn slot(&self, position: usize) -> Option<FieldId> {
        self.slots.get(position).copied()
    }

    /// The positional collection that takes values beyond the slots
    #[inline]
    #[must_use]
    pub fn overflow(&self) -> Option<FieldId> {
        self.overflow
    }

    /// Check that every required field got a value. Reports the first one
    /// (in declaration order) that didn't.
    pub fn check_required(&self) -> Result<(), Error> {
        match self
            .required
            .iter()
            .map(|&id| self.field(id))
            .find(|field| !field.is_presented())
        {
            None => Ok(()),
            Some(field) => Err(Error::RequiredFieldMissing {
                field: field.name(),
                label: field.label(),
            }),
        }
    }
}
