//! Dictionary and translator links per study locale.
//!
//! Locales are the flag codes offered by the reader (`de`, `se`, `dk`, ...),
//! not ISO language codes.

use serde::{Deserialize, Serialize};

/// External lookup provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryProvider {
    DictCc,
    DeepL,
    FreeDictionary,
    GoogleTranslate,
}

impl DictionaryProvider {
    pub const ALL: [DictionaryProvider; 4] = [
        Self::DictCc,
        Self::DeepL,
        Self::FreeDictionary,
        Self::GoogleTranslate,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DictCc => "dict.cc",
            Self::DeepL => "DeepL",
            Self::FreeDictionary => "Dictionary",
            Self::GoogleTranslate => "Translate",
        }
    }
}

struct LocaleLinks {
    code: &'static str,
    dict_cc: &'static str,
    deepl: &'static str,
    free_dictionary: &'static str,
    google: &'static str,
}

impl LocaleLinks {
    fn template(&self, provider: DictionaryProvider) -> &'static str {
        match provider {
            DictionaryProvider::DictCc => self.dict_cc,
            DictionaryProvider::DeepL => self.deepl,
            DictionaryProvider::FreeDictionary => self.free_dictionary,
            DictionaryProvider::GoogleTranslate => self.google,
        }
    }
}

const WORD: &str = "{word}";

const GENERIC_FREE_DICTIONARY: &str = "https://www.thefreedictionary.com/{word}";

const FALLBACK: LocaleLinks = LocaleLinks {
    code: "",
    dict_cc: "https://m.dict.cc/turkish-english/{word}.html",
    deepl: "https://www.deepl.com/en/translator#tr/en/{word}",
    free_dictionary: GENERIC_FREE_DICTIONARY,
    google: "https://translate.google.com/?sl=auto&tl=en&text={word}&op=translate",
};

const LOCALES: &[LocaleLinks] = &[
    LocaleLinks {
        code: "dk",
        dict_cc: "https://m.dict.cc/danish-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#da/en/{word}",
        // No Danish edition exists.
        free_dictionary: GENERIC_FREE_DICTIONARY,
        google: "https://translate.google.com/?sl=da&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "nl",
        dict_cc: "https://m.dict.cc/dutch-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#nl/en/{word}",
        free_dictionary: "https://nl.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=nl&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "fr",
        dict_cc: "https://m.dict.cc/french-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#fr/en/{word}",
        free_dictionary: "https://fr.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=fr&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "de",
        dict_cc: "https://m.dict.cc/deutsch-englisch/{word}.html",
        deepl: "https://www.deepl.com/en/translator#de/en/{word}",
        free_dictionary: "https://de.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=de&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "it",
        dict_cc: "https://m.dict.cc/italian-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#it/en/{word}",
        free_dictionary: "https://it.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=it&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "no",
        dict_cc: "https://m.dict.cc/norwegian-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#nb/en/{word}",
        free_dictionary: "https://no.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=no&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "pl",
        dict_cc: "https://m.dict.cc/polish-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#pl/en/{word}",
        free_dictionary: "https://pl.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=pl&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "pt",
        dict_cc: "https://m.dict.cc/portuguese-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#pt/en/{word}",
        free_dictionary: "https://pt.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=pt&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "ru",
        dict_cc: "https://m.dict.cc/russian-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#ru/en/{word}",
        free_dictionary: "https://ru.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=ru&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "es",
        dict_cc: "https://m.dict.cc/spanish-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#es/en/{word}",
        free_dictionary: "https://es.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=es&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "se",
        dict_cc: "https://m.dict.cc/swedish-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#sv/en/{word}",
        // No Swedish edition exists.
        free_dictionary: GENERIC_FREE_DICTIONARY,
        google: "https://translate.google.com/?sl=sv&tl=en&text={word}&op=translate",
    },
    LocaleLinks {
        code: "tr",
        dict_cc: "https://m.dict.cc/turkish-english/{word}.html",
        deepl: "https://www.deepl.com/en/translator#tr/en/{word}",
        free_dictionary: "https://tr.thefreedictionary.com/{word}",
        google: "https://translate.google.com/?sl=tr&tl=en&text={word}&op=translate",
    },
];

/// Locale codes with a dedicated link set.
pub fn supported_locales() -> impl Iterator<Item = &'static str> {
    LOCALES.iter().map(|links| links.code)
}

pub fn is_supported_locale(code: &str) -> bool {
    find(code).is_some()
}

fn find(code: &str) -> Option<&'static LocaleLinks> {
    let code = code.trim();
    LOCALES
        .iter()
        .find(|links| links.code.eq_ignore_ascii_case(code))
}

/// URL template for a locale, with `{word}` as placeholder.
///
/// Missing or unknown locales use the fallback set.
pub fn url_template(locale: Option<&str>, provider: DictionaryProvider) -> &'static str {
    locale
        .and_then(find)
        .unwrap_or(&FALLBACK)
        .template(provider)
}

/// Lookup URL for a word.
pub fn dictionary_link(locale: Option<&str>, provider: DictionaryProvider, word: &str) -> String {
    url_template(locale, provider).replace(WORD, &urlencoding::encode(word.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_links() {
        assert_eq!(
            dictionary_link(Some("de"), DictionaryProvider::DictCc, "Hund"),
            "https://m.dict.cc/deutsch-englisch/Hund.html"
        );
        assert_eq!(
            dictionary_link(Some("de"), DictionaryProvider::DeepL, "Hund"),
            "https://www.deepl.com/en/translator#de/en/Hund"
        );
    }

    #[test]
    fn locale_is_case_insensitive() {
        assert_eq!(
            url_template(Some("SE"), DictionaryProvider::GoogleTranslate),
            url_template(Some("se"), DictionaryProvider::GoogleTranslate)
        );
    }

    #[test]
    fn unknown_locale_falls_back() {
        assert_eq!(
            dictionary_link(Some("xx"), DictionaryProvider::GoogleTranslate, "Hund"),
            "https://translate.google.com/?sl=auto&tl=en&text=Hund&op=translate"
        );
        assert_eq!(
            dictionary_link(None, DictionaryProvider::FreeDictionary, "Hund"),
            "https://www.thefreedictionary.com/Hund"
        );
    }

    #[test]
    fn word_is_percent_encoded() {
        assert_eq!(
            dictionary_link(Some("de"), DictionaryProvider::DeepL, "Straße"),
            "https://www.deepl.com/en/translator#de/en/Stra%C3%9Fe"
        );
    }

    #[test]
    fn every_template_has_placeholder() {
        for links in LOCALES.iter().chain(std::iter::once(&FALLBACK)) {
            for provider in DictionaryProvider::ALL {
                assert!(links.template(provider).contains(WORD), "{}", links.code);
            }
        }
    }

    #[test]
    fn supports_twelve_locales() {
        assert_eq!(supported_locales().count(), 12);
        assert!(is_supported_locale("tr"));
        assert!(!is_supported_locale("en"));
    }
}
