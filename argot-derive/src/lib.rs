mod annotation;
mod field;
mod schema;

use darling::FromDeriveInput as _;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::DeriveInput;

use crate::schema::SchemaInput;

fn derive_schema_result(item: TokenStream2) -> Result<TokenStream2, TokenStream2> {
    let input: DeriveInput = syn::parse2(item).map_err(|err| err.to_compile_error())?;
    let input = SchemaInput::from_derive_input(&input).map_err(|err| err.write_errors())?;

    schema::derive_schema(&input).map_err(|err| err.to_compile_error())
}

/// Implement `argot::Schema` for a struct with named fields. Every field
/// needs an `#[arg("...")]` annotation, which is checked at compile time.
#[proc_macro_derive(Schema, attributes(arg))]
pub fn derive_schema(item: TokenStream) -> TokenStream {
    match derive_schema_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(tokens) => tokens.into(),
    }
}
