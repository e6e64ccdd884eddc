//! Typed message keys and per-language lookup tables
//!
//! Every label the service renders is a [`MessageKey`]. A [`Translator`] resolves keys through a
//! lookup table for its language and falls back to the English text when an entry is missing,
//! so a raw key never reaches a client.

use crate::error_category::ErrorCategory;
use crate::estimate::{CostGroupKind, CostItem, Tier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    German,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
        }
    }

    /// Pick the first supported language from an `Accept-Language` header value
    ///
    /// Unsupported or malformed values resolve to English.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .filter_map(|tag| tag.trim().parse::<Language>().ok())
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        match primary.as_str() {
            "en" | "english" => Ok(Language::English),
            "de" | "german" => Ok(Language::German),
            _ => Err(format!("unsupported language '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    CostItemLabel(CostItem),
    CostItemTooltip(CostItem, Tier),
    GroupHeader(CostGroupKind),
    TierName(Tier),
    UserError(ErrorCategory),
}

/// Anything that can turn a message key into display text
pub trait MessageLookup {
    fn text(&self, key: MessageKey) -> String;
}

impl<F> MessageLookup for F
where
    F: Fn(MessageKey) -> String,
{
    fn text(&self, key: MessageKey) -> String {
        self(key)
    }
}

/// Resolves message keys for one language
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    table: Arc<HashMap<MessageKey, String>>,
}

impl Translator {
    /// Translator backed by the built-in table for `language`
    pub fn for_language(language: Language) -> Self {
        let table = match language {
            Language::English => HashMap::new(),
            Language::German => german_table(),
        };
        Self::with_table(language, table)
    }

    /// Translator backed by a caller-supplied table
    pub fn with_table(language: Language, table: HashMap<MessageKey, String>) -> Self {
        Self {
            language,
            table: Arc::new(table),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::for_language(Language::English)
    }
}

impl MessageLookup for Translator {
    fn text(&self, key: MessageKey) -> String {
        match self.table.get(&key) {
            Some(text) => text.clone(),
            None => english(key).to_string(),
        }
    }
}

/// English text for every key; the fallback for all other languages
pub fn english(key: MessageKey) -> &'static str {
    use CostItem::*;
    use Tier::*;

    match key {
        MessageKey::CostItemLabel(item) => match item {
            DesignFee => "Design fee",
            Construction => "Construction labor",
            RenovationPrep => "Renovation prep & demolition",
            KitchenJoinery => "Kitchen joinery",
            Wardrobes => "Built-in wardrobes",
            Appliances => "Appliance package",
            Furniture => "Furniture & decor",
        },
        MessageKey::CostItemTooltip(item, tier) => match (item, tier) {
            (DesignFee, Budget) => "Concept layout and a single finishes board, one revision round.",
            (DesignFee, Standard) => "Full design project with technical drawings and two revision rounds.",
            (DesignFee, Premium) => "Bespoke design, detailed joinery drawings and site supervision.",
            (Construction, Budget) => "Rough and finish labor with entry-level materials.",
            (Construction, Standard) => "Rough and finish labor with mid-range tiles, paint and flooring.",
            (Construction, Premium) => "Specialist trades with natural stone, hardwood and custom finishes.",
            (RenovationPrep, _) => "Demolition, debris removal and surface preparation of the existing space.",
            (KitchenJoinery, Budget) => "Flat-pack carcasses with laminate fronts and worktop.",
            (KitchenJoinery, Standard) => "Made-to-measure units with lacquered fronts and composite worktop.",
            (KitchenJoinery, Premium) => "Custom cabinetry with solid wood or stone, priced per linear meter.",
            (Wardrobes, Budget) => "Modular wardrobes with melamine finish.",
            (Wardrobes, Standard) => "Built-in wardrobes with soft-close hardware.",
            (Wardrobes, Premium) => "Floor-to-ceiling bespoke wardrobes with integrated lighting.",
            (Appliances, Budget) => "Essential appliance set from value brands.",
            (Appliances, Standard) => "Energy-efficient mid-range appliance package.",
            (Appliances, Premium) => "Premium integrated appliances and professional range hood.",
            (Furniture, Budget) => "Ready-made furniture and basic decor.",
            (Furniture, Standard) => "Curated furniture, lighting and textiles.",
            (Furniture, Premium) => "Designer furniture, statement lighting and smart-home devices.",
        },
        MessageKey::GroupHeader(kind) => match kind {
            CostGroupKind::DesignProject => "Design Project",
            CostGroupKind::ShellAndFinishes => "Shell & Finishes",
            CostGroupKind::FixedJoinery => "Fixed Joinery",
            CostGroupKind::MovablesAndTech => "Movables & Tech",
        },
        MessageKey::TierName(tier) => match tier {
            Budget => "Budget",
            Standard => "Standard",
            Premium => "Premium",
        },
        MessageKey::UserError(category) => match category {
            ErrorCategory::RateLimit => "Too many requests right now. Please wait a moment and try again.",
            ErrorCategory::SessionExpired => "Your session has expired. Please sign in again.",
            ErrorCategory::InsufficientCredits => "You have no credits left. Buy more credits to continue.",
            ErrorCategory::Network => "Connection problem. Check your internet connection and try again.",
            ErrorCategory::GenerationUnavailable => "The visualization service is temporarily unavailable. Please try again later.",
            ErrorCategory::Upload => "We could not process your photo. Please upload a different image.",
            ErrorCategory::Payment => "The payment could not be processed. You have not been charged.",
            ErrorCategory::Generic => "Something went wrong. Please try again.",
        },
    }
}

fn german_table() -> HashMap<MessageKey, String> {
    use CostItem::*;

    let entries: Vec<(MessageKey, &str)> = vec![
        (MessageKey::CostItemLabel(DesignFee), "Planungshonorar"),
        (MessageKey::CostItemLabel(Construction), "Bauleistungen"),
        (MessageKey::CostItemLabel(RenovationPrep), "Rückbau & Vorbereitung"),
        (MessageKey::CostItemLabel(KitchenJoinery), "Küchenschreinerei"),
        (MessageKey::CostItemLabel(Wardrobes), "Einbauschränke"),
        (MessageKey::CostItemLabel(Appliances), "Gerätepaket"),
        (MessageKey::CostItemLabel(Furniture), "Möbel & Dekoration"),
        (MessageKey::CostItemTooltip(RenovationPrep, Tier::Budget), "Abbruch, Entsorgung und Untergrundvorbereitung."),
        (MessageKey::CostItemTooltip(RenovationPrep, Tier::Standard), "Abbruch, Entsorgung und Untergrundvorbereitung."),
        (MessageKey::CostItemTooltip(RenovationPrep, Tier::Premium), "Abbruch, Entsorgung und Untergrundvorbereitung."),
        (MessageKey::GroupHeader(CostGroupKind::DesignProject), "Planung"),
        (MessageKey::GroupHeader(CostGroupKind::ShellAndFinishes), "Rohbau & Ausbau"),
        (MessageKey::GroupHeader(CostGroupKind::FixedJoinery), "Einbauten"),
        (MessageKey::GroupHeader(CostGroupKind::MovablesAndTech), "Möbel & Technik"),
        (MessageKey::TierName(Tier::Budget), "Basis"),
        (MessageKey::TierName(Tier::Standard), "Standard"),
        (MessageKey::TierName(Tier::Premium), "Premium"),
        (MessageKey::UserError(ErrorCategory::RateLimit), "Zu viele Anfragen. Bitte warte einen Moment."),
        (MessageKey::UserError(ErrorCategory::SessionExpired), "Deine Sitzung ist abgelaufen. Bitte melde dich erneut an."),
        (MessageKey::UserError(ErrorCategory::InsufficientCredits), "Du hast keine Credits mehr. Kaufe neue Credits, um fortzufahren."),
        (MessageKey::UserError(ErrorCategory::Network), "Verbindungsproblem. Bitte prüfe deine Internetverbindung."),
        (MessageKey::UserError(ErrorCategory::GenerationUnavailable), "Der Visualisierungsdienst ist vorübergehend nicht verfügbar."),
        (MessageKey::UserError(ErrorCategory::Upload), "Dein Foto konnte nicht verarbeitet werden. Bitte lade ein anderes Bild hoch."),
        (MessageKey::UserError(ErrorCategory::Payment), "Die Zahlung konnte nicht verarbeitet werden. Es wurde nichts abgebucht."),
        (MessageKey::UserError(ErrorCategory::Generic), "Etwas ist schiefgelaufen. Bitte versuche es erneut."),
    ];

    entries
        .into_iter()
        .map(|(key, text)| (key, text.to_string()))
        .collect()
}
