use std::ffi::{OsStr, OsString};

use crate::{errors::Error, parser::Parser, schema::Schema};

/// Helper type for loading arguments from the environment.
///
/// Process arguments are already split by the shell, so they're bound with
/// [`Parser::parse_args`]: no quote handling, and each argument is classified
/// only by its leading hyphens. The first argument (the program name) is
/// never bound.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<OsString>,
}

impl LoadedArguments {
    pub fn from_env() -> Self {
        std::env::args_os().collect()
    }

    /// The program name, if the platform provided one
    pub fn argv0(&self) -> Option<&OsStr> {
        self.arguments.first().map(OsString::as_os_str)
    }

    /// Every argument after the program name, which must all be unicode.
    fn arguments(&self) -> Result<Vec<&str>, Error> {
        self.arguments
            .get(1..)
            .unwrap_or(&[])
            .iter()
            .map(|argument| {
                argument.to_str().ok_or_else(|| Error::InvalidUnicode {
                    argument: argument.to_string_lossy().into_owned(),
                })
            })
            .collect()
    }

    pub fn parse_into<S>(&self, parser: &Parser, target: &mut S) -> Result<(), Error>
    where
        S: Schema + ?Sized,
    {
        parser.parse_args(self.arguments()?, target)
    }
}

impl<T: Into<OsString>> FromIterator<T> for LoadedArguments {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            arguments: iter.into_iter().map(Into::into).collect(),
        }
    }
}
