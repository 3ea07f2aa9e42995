//! Machine translation of new lemmas.

mod microsoft;

use crate::error::TranslationError;

pub use microsoft::{DEFAULT_ENDPOINT, MicrosoftTranslator};

pub trait Translator {
    /// Translate `text` into locale `to`. With `from` unset the backend picks
    /// its default source language.
    fn translate(&self, text: &str, to: &str, from: Option<&str>) -> Result<String, TranslationError>;
}
