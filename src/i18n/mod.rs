pub(crate) mod translator;

pub use translator::{StaticTranslator, TranslatorTrait};
