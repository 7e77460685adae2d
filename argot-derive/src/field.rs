use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// What a field's type binds as. This is purely syntactic: `bool` means the
/// primitive, even if the name has been shadowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Flag,
    Int,
    Text,
    IntList,
    TextList,

    /// A `Vec` of any other element type, as written in the source
    UnsupportedList(String),

    /// Any other type, as written in the source
    Unsupported(String),
}

/// The last segment of a plain path type, like `String` or `Vec<i64>`
fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match *ty {
        Type::Path(TypePath { qself: None, ref path }) => path.segments.last(),
        Type::Group(ref group) => last_segment(&group.elem),
        _ => None,
    }
}

fn scalar_kind(ty: &Type) -> Option<FieldKind> {
    let segment = last_segment(ty)?;

    if !segment.arguments.is_none() {
        return None;
    }

    if segment.ident == "bool" {
        Some(FieldKind::Flag)
    } else if segment.ident == "i64" {
        Some(FieldKind::Int)
    } else if segment.ident == "String" {
        Some(FieldKind::Text)
    } else {
        None
    }
}

fn list_kind(ty: &Type) -> Option<FieldKind> {
    let segment = last_segment(ty)?;

    if segment.ident != "Vec" {
        return None;
    }

    let PathArguments::AngleBracketed(ref arguments) = segment.arguments else {
        return None;
    };

    let mut arguments = arguments.args.iter();

    match (arguments.next(), arguments.next()) {
        (Some(GenericArgument::Type(element)), None) => Some(match scalar_kind(element) {
            Some(FieldKind::Int) => FieldKind::IntList,
            Some(FieldKind::Text) => FieldKind::TextList,
            _ => FieldKind::UnsupportedList(type_name(ty)),
        }),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Render a type roughly as it was written: the token stream's spaces are
/// kept only between two words, so `Vec < f64 >` becomes `Vec<f64>`.
fn type_name(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let mut name = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ' '
            && !(name.ends_with(is_word_char) && chars.peek().copied().is_some_and(is_word_char))
        {
            continue;
        }

        name.push(c);
    }

    name
}

impl FieldKind {
    pub fn of(ty: &Type) -> Self {
        scalar_kind(ty)
            .or_else(|| list_kind(ty))
            .unwrap_or_else(|| Self::Unsupported(type_name(ty)))
    }

    pub fn is_multi(&self) -> bool {
        matches!(
            *self,
            Self::IntList | Self::TextList | Self::UnsupportedList(_)
        )
    }

    /// The storage expression for a `FieldSpec`: a mutable borrow of the
    /// field, tagged with its type name if it can't be bound
    pub fn slot(&self, field: impl ToTokens) -> TokenStream2 {
        match *self {
            Self::Unsupported(ref name) => quote! { ::argot::FieldRef::Unsupported(#name) },
            Self::UnsupportedList(ref name) => quote! {
                ::argot::FieldRef::unsupported_list(#name, &mut self.#field)
            },
            _ => quote! { ::argot::FieldRef::from(&mut self.#field) },
        }
    }
}
