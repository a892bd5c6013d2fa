//! Display locale and translation lookup.
//!
//! `I18n` is the context object handed to renderers. It is loaded from a
//! key-value store once and writes the locale back on every change.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::logging::{log, obj, v_str, Domain, Level};
use crate::storage::KeyValueStore;

pub const LOCALE_KEY: &str = "locale";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Hi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "en" => Some(Locale::En),
            "hi" => Some(Locale::Hi),
            _ => None,
        }
    }

    /// Unsupported or missing identifiers fall back to English.
    pub fn or_default(s: Option<&str>) -> Self {
        s.and_then(Locale::parse).unwrap_or_default()
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Locale::En => EN,
            Locale::Hi => HI,
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("dashboard", "Dashboard"),
    ("riskMap", "Risk Map"),
    ("explainableAI", "Explainable AI"),
    ("incidents", "Incidents"),
    ("maintenance", "Maintenance"),
    ("heroTitle", "The Future of Mine Safety is"),
    ("heroPredictive", "Predictive"),
    (
        "heroSubtitle",
        "Our AI-powered platform analyzes real-time data to forecast slope instability, protecting your people, assets, and operations.",
    ),
    ("predictPreventProtect", "Predict. Prevent. Protect."),
    ("viewRiskMap", "View Risk Map"),
];

const HI: &[(&str, &str)] = &[
    ("dashboard", "डैशबोर्ड"),
    ("riskMap", "जोखिम मानचित्र"),
    ("explainableAI", "स्पष्टीकरणीय AI"),
    ("incidents", "घटनाएँ"),
    ("maintenance", "रखरखाव"),
    ("heroTitle", "खदान सुरक्षा का भविष्य है"),
    ("heroPredictive", "पूर्वानुमानित"),
    (
        "heroSubtitle",
        "हमारा AI प्लेटफ़ॉर्म वास्तविक-समय डेटा का विश्लेषण कर ढलान अस्थिरता का पूर्वानुमान करता है, लोगों, परिसंपत्तियों और संचालन की रक्षा करता है।",
    ),
    ("predictPreventProtect", "पूर्वानुमान. रोकथाम. सुरक्षा."),
    ("viewRiskMap", "जोखिम मानचित्र देखें"),
];

/// Look up `key` in `locale`; unknown keys come back unchanged.
pub fn translate<'a>(locale: Locale, key: &'a str) -> &'a str {
    locale
        .table()
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Every translation key of `locale`, in table order.
pub fn keys(locale: Locale) -> impl Iterator<Item = &'static str> {
    locale.table().iter().map(|(k, _)| *k)
}

pub struct I18n<S: KeyValueStore> {
    locale: Locale,
    store: S,
}

impl<S: KeyValueStore> I18n<S> {
    /// Initialise from the stored preference.
    pub fn load(store: S) -> Result<Self> {
        let stored = store.get(LOCALE_KEY)?;
        let locale = Locale::or_default(stored.as_deref());
        if let Some(raw) = stored.as_deref().filter(|r| Locale::parse(r).is_none()) {
            log(
                Level::Warn,
                Domain::Settings,
                "locale_fallback",
                obj(&[("stored", v_str(raw)), ("using", v_str(locale.as_str()))]),
            );
        }
        Ok(Self { locale, store })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch locale and persist it.
    pub fn set_locale(&mut self, locale: Locale) -> Result<()> {
        self.store.set(LOCALE_KEY, locale.as_str())?;
        if self.locale != locale {
            log(
                Level::Info,
                Domain::Settings,
                "locale_changed",
                obj(&[
                    ("from", v_str(self.locale.as_str())),
                    ("to", v_str(locale.as_str())),
                ]),
            );
        }
        self.locale = locale;
        Ok(())
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(self.locale, key)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
