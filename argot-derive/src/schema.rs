use std::collections::{HashMap, hash_map::Entry};
use std::fmt::Display;
use std::hash::Hash;

use darling::ast::Data;
use darling::util::{Ignored, SpannedValue};
use heck::ToShoutySnakeCase as _;
use itertools::Itertools as _;
use lazy_format::lazy_format;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Attribute, Generics, Ident, LitStr, Type, ext::IdentExt as _, spanned::Spanned as _};

use crate::annotation::Annotation;
use crate::field::FieldKind;

#[derive(darling::FromField)]
#[darling(forward_attrs(arg))]
pub struct SchemaField {
    ident: Option<Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
}

#[derive(darling::FromDeriveInput)]
#[darling(supports(struct_named))]
pub struct SchemaInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, SchemaField>,
}

/// A field with its annotation parsed and its type classified
struct ParsedField<'a> {
    ident: &'a Ident,
    name: String,
    literal: LitStr,
    annotation: Annotation,
    kind: FieldKind,
}

impl<'a> ParsedField<'a> {
    fn from_field(field: &'a SchemaField) -> syn::Result<Self> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.ty.span(), "Schema fields must be named"))?;

        let mut attrs = field.attrs.iter().filter(|attr| attr.path().is_ident("arg"));

        let literal: LitStr = match (attrs.next(), attrs.next()) {
            (None, _) => {
                return Err(syn::Error::new(
                    ident.span(),
                    lazy_format!("field `{ident}` needs an #[arg(\"...\")] annotation"),
                ));
            }
            (Some(_), Some(duplicate)) => {
                return Err(syn::Error::new(
                    duplicate.span(),
                    "only one #[arg] annotation is allowed per field",
                ));
            }
            (Some(attr), None) => attr.parse_args()?,
        };

        Ok(Self {
            ident,
            name: ident.unraw().to_string(),
            annotation: Annotation::parse(&literal)?,
            literal,
            kind: FieldKind::of(&field.ty),
        })
    }

    fn spec(&self) -> TokenStream2 {
        let Self {
            ident,
            ref name,
            ref literal,
            ref kind,
            ..
        } = *self;

        let slot = kind.slot(ident);
        let placeholder = name.to_shouty_snake_case();

        quote! {
            ::argot::FieldSpec::new(#name, #literal, #slot).placeholder(#placeholder)
        }
    }
}

fn detect_collision<T: Hash + Eq + Copy, M: Display>(
    known_tags: &mut HashMap<T, Span>,
    new_tag: Option<SpannedValue<T>>,
    message: impl Fn(T) -> M,
) -> syn::Result<()> {
    match new_tag {
        Some(tag) => match known_tags.entry(*tag) {
            Entry::Occupied(entry) => {
                let mut err1 = syn::Error::new(
                    tag.span(),
                    lazy_format!("{tag} is used by more than one field", tag = message(*tag)),
                );
                let err2 = syn::Error::new(*entry.get(), "first used here");

                err1.combine(err2);
                Err(err1)
            }
            Entry::Vacant(entry) => {
                entry.insert(tag.span());
                Ok(())
            }
        },
        None => Ok(()),
    }
}

/// Check the annotations across all fields: no shared spellings, and at most
/// one positional collection.
fn validate(fields: &[ParsedField<'_>]) -> syn::Result<()> {
    let mut long_tags = HashMap::new();
    let mut short_tags = HashMap::new();
    let mut overflow: Option<&ParsedField<'_>> = None;

    for field in fields {
        detect_collision(&mut long_tags, field.annotation.long(), |tag| tag)?;
        detect_collision(&mut short_tags, field.annotation.short(), |tag| {
            lazy_format!("-{tag}")
        })?;

        if field.annotation.positional && field.kind.is_multi() {
            if let Some(first) = overflow {
                let mut err1 = syn::Error::new(
                    field.literal.span(),
                    lazy_format!(
                        "`{second}` and `{first}` are both positional collections; \
                        at most one field can collect the remaining positionals",
                        second = field.name,
                        first = first.name,
                    ),
                );
                err1.combine(syn::Error::new(first.literal.span(), "first collection here"));

                return Err(err1);
            }

            overflow = Some(field);
        }
    }

    Ok(())
}

pub fn derive_schema(input: &SchemaInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = input
        .data
        .as_ref()
        .take_struct()
        .ok_or_else(|| syn::Error::new(name.span(), "Schema can only be derived for structs"))?;

    let fields: Vec<ParsedField<'_>> = fields
        .iter()
        .map(|&field| ParsedField::from_field(field))
        .try_collect()?;

    validate(&fields)?;

    let specs = fields.iter().map(ParsedField::spec);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::argot::Schema for #name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::argot::FieldSpec<'_>> {
                ::std::vec![#(#specs,)*]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use darling::FromDeriveInput as _;
    use syn::{DeriveInput, parse_quote};

    use super::*;

    fn derive(input: DeriveInput) -> syn::Result<TokenStream2> {
        let input = SchemaInput::from_derive_input(&input)
            .map_err(|err| syn::Error::new(Span::call_site(), err))?;

        derive_schema(&input)
    }

    fn error_message(input: DeriveInput) -> String {
        match derive(input) {
            Ok(tokens) => panic!("expected an error, got {tokens}"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn generates_one_spec_per_field() {
        let tokens = derive(parse_quote! {
            struct Arguments {
                #[arg("-v,--verbose")]
                verbose: bool,

                #[arg("positional")]
                ratio: f64,

                #[arg("positional")]
                r#type: Vec<String>,
            }
        })
        .unwrap()
        .to_string();

        assert!(tokens.contains("impl :: argot :: Schema for Arguments"));
        assert!(tokens.contains(r#"FieldSpec :: new ("verbose" , "-v,--verbose""#));
        assert!(tokens.contains(r#"FieldRef :: Unsupported ("f64")"#));
        assert!(tokens.contains(r#". placeholder ("TYPE")"#));
    }

    #[test]
    fn missing_annotation() {
        let message = error_message(parse_quote! {
            struct Arguments {
                verbose: bool,
            }
        });

        assert!(message.contains("needs an #[arg"), "{message}");
    }

    #[test]
    fn duplicate_spelling() {
        let message = error_message(parse_quote! {
            struct Arguments {
                #[arg("-v")]
                verbose: bool,

                #[arg("--value,-v")]
                value: String,
            }
        });

        assert!(message.contains("-v is used by more than one field"), "{message}");
    }

    #[test]
    fn two_overflow_fields() {
        let message = error_message(parse_quote! {
            struct Arguments {
                #[arg("positional")]
                first: Vec<String>,

                #[arg("positional")]
                second: Vec<i64>,
            }
        });

        assert!(message.contains("both positional collections"), "{message}");
    }

    #[test]
    fn two_overflow_fields_of_any_element_type() {
        let message = error_message(parse_quote! {
            struct Arguments {
                #[arg("positional")]
                ratios: Vec<f64>,

                #[arg("positional")]
                switches: Vec<bool>,
            }
        });

        assert!(message.contains("`switches` and `ratios`"), "{message}");
    }

    #[test]
    fn unsupported_vecs_keep_a_handle() {
        let tokens = derive(parse_quote! {
            struct Arguments {
                #[arg("positional")]
                ratios: Vec<f64>,
            }
        })
        .unwrap()
        .to_string();

        assert!(
            tokens.contains(r#"FieldRef :: unsupported_list ("Vec<f64>" , & mut self . ratios)"#),
            "{tokens}"
        );
    }

    #[test]
    fn invalid_token() {
        let message = error_message(parse_quote! {
            struct Arguments {
                #[arg("-v,verbose")]
                verbose: bool,
            }
        });

        assert!(message.contains("invalid annotation token \"verbose\""), "{message}");
    }

    #[test]
    fn enums_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Arguments {
                A,
            }
        };

        assert!(SchemaInput::from_derive_input(&input).is_err());
    }
}
