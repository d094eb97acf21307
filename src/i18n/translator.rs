use std::collections::HashMap;

use lazy_static::lazy_static;

/// Translation lookup used for notification text. The catalog internals are
/// opaque to the engine; callers pass a language, a key and parameters.
pub trait TranslatorTrait: Send + Sync {
    fn translate(&self, lang: &str, key: &str, params: &HashMap<&str, String>) -> String;
}

lazy_static! {
    static ref CATALOG: HashMap<&'static str, HashMap<&'static str, &'static str>> = {
        let mut en = HashMap::new();
        en.insert("notification.trade_closed.title", "Trade closed");
        en.insert(
            "notification.trade_closed.body",
            "{symbol} {type} {size} closed with profit {profit}",
        );
        en.insert("notification.weekly_summary.title", "Weekly summary: {account}");
        en.insert(
            "notification.weekly_summary.body",
            "{trades} trades closed this week, net profit {profit}",
        );

        let mut catalog = HashMap::new();
        catalog.insert("en", en);
        catalog
    };
}

const FALLBACK_LANG: &str = "en";

/// Translator over the built-in static catalog. Unknown languages fall back
/// to English; unknown keys fall back to the key itself.
#[derive(Debug, Default)]
pub struct StaticTranslator;

impl TranslatorTrait for StaticTranslator {
    fn translate(&self, lang: &str, key: &str, params: &HashMap<&str, String>) -> String {
        let template = CATALOG
            .get(lang)
            .and_then(|messages| messages.get(key))
            .or_else(|| CATALOG.get(FALLBACK_LANG).and_then(|m| m.get(key)))
            .copied()
            .unwrap_or(key);

        let mut text = template.to_string();
        for (name, value) in params {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_parameters() {
        let translator = StaticTranslator;
        let mut params = HashMap::new();
        params.insert("symbol", "EURUSD".to_string());
        params.insert("type", "buy".to_string());
        params.insert("size", "0.1".to_string());
        params.insert("profit", "50.00".to_string());
        let text = translator.translate("en", "notification.trade_closed.body", &params);
        assert_eq!(text, "EURUSD buy 0.1 closed with profit 50.00");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let translator = StaticTranslator;
        let text = translator.translate("xx", "notification.trade_closed.title", &HashMap::new());
        assert_eq!(text, "Trade closed");
    }

    #[test]
    fn unknown_key_falls_back_to_the_key() {
        let translator = StaticTranslator;
        let text = translator.translate("en", "no.such.key", &HashMap::new());
        assert_eq!(text, "no.such.key");
    }
}
