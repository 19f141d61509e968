use std::sync::OnceLock;

use regex::Regex;

use super::IssueType;

/// One detection category and the patterns that make it up.
pub(crate) struct PiiRule {
    pub(crate) kind: IssueType,
    patterns: Vec<Regex>,
    exclude: Option<fn(&str) -> bool>,
}

impl PiiRule {
    fn new(kind: IssueType, patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|pattern| Regex::new(pattern).expect("built-in PII pattern compiles"))
            .collect();
        Self {
            kind,
            patterns,
            exclude: None,
        }
    }

    fn excluding(mut self, exclude: fn(&str) -> bool) -> Self {
        self.exclude = Some(exclude);
        self
    }

    /// Distinct matched substrings, in pattern order then position order.
    ///
    /// Patterns with a capture group report the first group rather than the whole
    /// match so leading context (e.g. the whitespace before a handle) is dropped.
    pub(crate) fn find_all(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let Some(matched) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                let value = matched.as_str().trim();
                if value.is_empty()
                    || self.exclude.is_some_and(|exclude| exclude(value))
                    || found.iter().any(|existing| existing == value)
                {
                    continue;
                }
                found.push(value.to_string());
            }
        }
        found
    }
}

const PHONE_PATTERNS: &[&str] = &[
    // Mobile: 07xxx xxxxxx, 07xxx xxx xxx
    r"\b07\d{3}\s?\d{3}\s?\d{3}\b",
    // Landline: 01xxx / 02x / 03xx ranges
    r"\b0[1-3]\d{1,3}\s?\d{3,4}\s?\d{3,4}\b",
    // International: +44 7700 900123, +44 (0)20 7946 0958
    r"\+44\s?(?:\(0\)\s?)?\d{2,4}\s?\d{3,4}\s?\d{3,4}\b",
];

const EMAIL_PATTERNS: &[&str] = &[r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"];

// Casing: e-mail addresses and links match in any case. Postcodes and plates
// match when written wholly upper or wholly lower case, never mixed. Street
// addresses and names need the capitalised word that sets them apart from
// trade prose; only street keywords ignore case.

const POSTCODE_PATTERNS: &[&str] = &[
    r"\b[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2}\b",
    r"\b[a-z]{1,2}\d[a-z\d]?\s*\d[a-z]{2}\b",
];

const SOCIAL_PATTERNS: &[&str] = &[
    r"(?:^|[\s(,;:])(@[A-Za-z0-9_.]{2,30})",
    r"(?i)\b(?:https?://)?(?:www\.)?(?:facebook|fb|instagram|twitter|x|tiktok|linkedin|snapchat|youtube)\.com/[A-Za-z0-9_.\-/]+",
    r"(?i)\b(?:facebook|instagram|insta|tiktok|snapchat|twitter|linkedin)\s+(?:profile|page|account|handle)\b",
];

const VEHICLE_PATTERNS: &[&str] = &[
    // Current format: AB12 CDE / ab12 cde
    r"\b[A-Z]{2}\d{2}\s?[A-Z]{3}\b",
    r"\b[a-z]{2}\d{2}\s?[a-z]{3}\b",
    // Prefix format: A123 BCD (upper case only, lower case collides with road numbers)
    r"\b[A-Z]\d{1,3}\s?[A-Z]{3}\b",
];

const ADDRESS_PATTERNS: &[&str] = &[
    r"\b\d{1,4}[A-Za-z]?,?\s+(?:[A-Z][A-Za-z'-]*\s+){1,3}(?i:street|st|road|rd|avenue|ave|lane|ln|drive|dr|close|crescent|cres|way|court|ct|place|pl|gardens|gdns|terrace|grove|square|sq|hill|mews|row|walk|parade)\b",
    r"\b(?:Flat|FLAT|Apartment|APARTMENT|Apt|APT|Unit|UNIT)\s*\d+[A-Za-z]?\b",
];

const NAME_PATTERNS: &[&str] = &[
    // Mr, Mrs, Ms and Mx never start ordinary prose, so the surname may be lower case.
    r"\b(?:Mrs|Mr|Ms|Mx|MRS|MR)\.?\s+[A-Za-z][a-z]+(?:[ -][A-Z][a-z]+)*",
    // "Miss" and "Dr" are also a verb and a street abbreviation.
    r"\b(?:Miss|Dr|MISS|DR)\.?\s+[A-Z][a-z]+(?:[ -][A-Z][a-z]+)*",
];

/// Lower-case inward codes that read as ordinals ("a4 3rd") are not postcodes.
fn is_ordinal(candidate: &str) -> bool {
    let lower = !candidate.chars().any(|c| c.is_ascii_uppercase());
    lower && ["st", "nd", "rd", "th"].iter().any(|suffix| candidate.ends_with(suffix))
}

/// Compiled detection rules, built on first use and shared for the process lifetime.
pub(crate) fn rules() -> &'static [PiiRule] {
    static RULES: OnceLock<Vec<PiiRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            PiiRule::new(IssueType::PhoneNumber, PHONE_PATTERNS),
            PiiRule::new(IssueType::Email, EMAIL_PATTERNS),
            PiiRule::new(IssueType::FullPostcode, POSTCODE_PATTERNS).excluding(is_ordinal),
            PiiRule::new(IssueType::SocialMedia, SOCIAL_PATTERNS),
            PiiRule::new(IssueType::VehicleReg, VEHICLE_PATTERNS),
            PiiRule::new(IssueType::Address, ADDRESS_PATTERNS),
            PiiRule::new(IssueType::PersonalName, NAME_PATTERNS),
        ]
    })
}
