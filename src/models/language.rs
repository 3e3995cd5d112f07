use serde::{Deserialize, Serialize};

/// The two editions the backend serves. Anything that is not
/// (case/whitespace-insensitively) "en" falls back to Dutch, including
/// values persisted by older app versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Nl,
    En,
}

impl Language {
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("en") {
            Language::En
        } else {
            Language::Nl
        }
    }

    /// Value sent as the `lang` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Language::Nl => "nl",
            Language::En => "en",
        }
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Language::parse(&s)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.as_param().to_string()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_param())
    }
}
