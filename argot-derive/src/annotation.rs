use darling::util::SpannedValue;
use lazy_format::lazy_format;
use syn::LitStr;

/// The parsed contents of an `#[arg("...")]` attribute. Spellings keep the
/// span of the literal they came from, for collision errors.
pub struct Annotation {
    pub long: Option<SpannedValue<String>>,
    pub short: Option<SpannedValue<char>>,
    pub positional: bool,
    pub required: bool,
}

fn short_spelling(token: &str) -> Option<char> {
    let mut letters = token.strip_prefix('-')?.chars();

    match (letters.next(), letters.next()) {
        (Some(short), None) if short != '-' && !short.is_whitespace() => Some(short),
        _ => None,
    }
}

fn is_long_spelling(token: &str) -> bool {
    token.strip_prefix("--").is_some_and(|name| !name.is_empty())
}

impl Annotation {
    pub fn parse(literal: &LitStr) -> syn::Result<Self> {
        let span = literal.span();
        let value = literal.value();

        let mut parsed = Self {
            long: None,
            short: None,
            positional: false,
            required: false,
        };

        for token in value.split(',').map(str::trim) {
            if token == "positional" {
                parsed.positional = true;
            } else if token == "required" {
                parsed.required = true;
            } else if is_long_spelling(token) {
                let spelling = SpannedValue::new(token.to_owned(), span);

                if let Some(first) = parsed.long.replace(spelling) {
                    let first = first.as_str();

                    return Err(syn::Error::new(
                        span,
                        lazy_format!("{token} conflicts with {first}; use one long spelling at most"),
                    ));
                }
            } else if let Some(short) = short_spelling(token) {
                if let Some(first) = parsed.short.replace(SpannedValue::new(short, span)) {
                    let first = *first;

                    return Err(syn::Error::new(
                        span,
                        lazy_format!("-{short} conflicts with -{first}; use one short spelling at most"),
                    ));
                }
            } else {
                return Err(syn::Error::new(
                    span,
                    lazy_format!(
                        "invalid annotation token {token:?}; expected `positional`, \
                        `required`, `-x` or `--xyz`"
                    ),
                ));
            }
        }

        if parsed.positional && (parsed.long.is_some() || parsed.short.is_some()) {
            return Err(syn::Error::new(
                span,
                "positional fields can't have a short or long spelling",
            ));
        }

        Ok(parsed)
    }

    pub fn long(&self) -> Option<SpannedValue<&str>> {
        self.long
            .as_ref()
            .map(|long| SpannedValue::new(long.as_str(), long.span()))
    }

    pub fn short(&self) -> Option<SpannedValue<char>> {
        self.short
    }
}
