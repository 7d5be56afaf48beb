// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Heading rules and the built-in default table
//!
//! The default table is consulted when the injected store has no exact
//! match. It encodes the Vietnamese mobile allow-list, the Vietnamese
//! landline area codes and the international country codes.

use std::{
    collections::HashMap,
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::HeadingStatus;

use crate::error::{HeadingError, HeadingResult};

static PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{1,4}$").expect("prefix regex is valid"));

static DEFAULT_TABLE: LazyLock<DefaultHeadingTable> = LazyLock::new(DefaultHeadingTable::build);

/// Region reported for Vietnamese mobile headings
pub const VIETNAM_REGION: &str = "Vietnam";

/// Region reported when nothing matches
pub const UNKNOWN_REGION: &str = "Unknown";

/// Vietnamese mobile network prefixes, all trusted
const VIETNAM_MOBILE_HEADS: &[&str] = &[
    "096", "097", "098", "032", "033", "034", "035", "036", "037", "038", "039", "070", "076",
    "077", "078", "079", "081", "082", "083", "084", "085", "088", "091", "094", "087", "092",
    "056", "058", "099", "089", "059", "090", "093", "095", "+84",
];

/// Vietnamese landline area codes
const VIETNAM_LANDLINE_AREAS: &[(&str, &str)] = &[
    ("024", "Hà Nội"),
    ("028", "TP.HCM"),
    ("025", "Hải Phòng"),
    ("026", "Đà Nẵng"),
    ("027", "Cần Thơ"),
    ("029", "Nghệ An"),
    ("020", "Thái Bình"),
    ("021", "Hải Dương"),
    ("022", "Nam Định"),
    ("023", "Ninh Bình"),
    ("0203", "Hà Giang"),
    ("0204", "Cao Bằng"),
    ("0206", "Lạng Sơn"),
    ("0208", "Tuyên Quang"),
    ("0209", "Lào Cai"),
    ("0210", "Điện Biên"),
    ("0211", "Lai Châu"),
    ("0212", "Sơn La"),
    ("0213", "Yên Bái"),
    ("0214", "Hoà Bình"),
    ("0215", "Thái Nguyên"),
    ("0216", "Lạng Sơn"),
    ("0218", "Phú Thọ"),
    ("0219", "Vĩnh Phúc"),
    ("0220", "Bắc Giang"),
    ("0221", "Bắc Kạn"),
    ("0222", "Quảng Ninh"),
    ("0225", "Hải Dương"),
    ("0226", "Hưng Yên"),
    ("0227", "Hà Nam"),
    ("0228", "Thái Bình"),
    ("0229", "Nam Định"),
    ("0230", "Ninh Bình"),
    ("0231", "Thanh Hóa"),
    ("0232", "Nghệ An"),
    ("0233", "Hà Tĩnh"),
    ("0234", "Quảng Bình"),
    ("0235", "Quảng Trị"),
    ("0236", "Thừa Thiên Huế"),
    ("0237", "Quảng Nam"),
    ("0238", "Kon Tum"),
    ("0239", "Quảng Ngãi"),
    ("0240", "Gia Lai"),
    ("0241", "Bình Định"),
    ("0242", "Phú Yên"),
    ("0243", "Đắk Lắk"),
    ("0244", "Khánh Hòa"),
    ("0245", "Lâm Đồng"),
    ("0246", "Ninh Thuận"),
    ("0247", "Tây Ninh"),
    ("0248", "Bình Phước"),
    ("0249", "Đắk Nông"),
    ("0250", "Bình Thuận"),
    ("0251", "Bà Rịa-Vũng Tàu"),
    ("0252", "Đồng Nai"),
    ("0253", "Bình Dương"),
    ("0254", "Long An"),
    ("0255", "Tiền Giang"),
    ("0256", "Bến Tre"),
    ("0257", "Vĩnh Long"),
    ("0258", "Trà Vinh"),
    ("0259", "An Giang"),
    ("0260", "Đồng Tháp"),
    ("0261", "Kiên Giang"),
    ("0262", "Cà Mau"),
    ("0263", "Hậu Giang"),
    ("0269", "Bạc Liêu"),
    ("0270", "Sóc Trăng"),
    ("0271", "Cần Thơ"),
    ("0272", "An Giang"),
    ("0273", "Kiên Giang"),
    ("0274", "Cà Mau"),
    ("0275", "Bạc Liêu"),
    ("0276", "Sóc Trăng"),
    ("0277", "An Giang"),
    ("0278", "Vĩnh Long"),
    ("0279", "Cần Thơ"),
];

/// International country codes; only Vietnam is trusted
const INTERNATIONAL_HEADS: &[(&str, &str)] = &[
    ("+1", "USA/Canada"),
    ("+44", "United Kingdom"),
    ("+86", "China"),
    ("+91", "India"),
    ("+81", "Japan"),
    ("+49", "Germany"),
    ("+33", "France"),
    ("+39", "Italy"),
    ("+34", "Spain"),
    ("+7", "Russia"),
    ("+55", "Brazil"),
    ("+52", "Mexico"),
    ("+61", "Australia"),
    ("+27", "South Africa"),
    ("+20", "Egypt"),
    ("+234", "Nigeria"),
    ("+254", "Kenya"),
    ("+66", "Thailand"),
    ("+65", "Singapore"),
    ("+60", "Malaysia"),
    ("+62", "Indonesia"),
    ("+63", "Philippines"),
    ("+84", "Vietnam"),
    ("+82", "South Korea"),
    ("+90", "Turkey"),
    ("+98", "Iran"),
    ("+92", "Pakistan"),
    ("+880", "Bangladesh"),
    ("+94", "Sri Lanka"),
    ("+95", "Myanmar"),
    ("+856", "Laos"),
    ("+855", "Cambodia"),
    ("+673", "Brunei"),
    ("+976", "Mongolia"),
    ("+380", "Ukraine"),
    ("+375", "Belarus"),
    ("+373", "Moldova"),
    ("+996", "Kyrgyzstan"),
    ("+998", "Uzbekistan"),
    ("+992", "Tajikistan"),
    ("+993", "Turkmenistan"),
    ("+994", "Azerbaijan"),
    ("+995", "Georgia"),
    ("+374", "Armenia"),
    ("+371", "Latvia"),
    ("+372", "Estonia"),
    ("+370", "Lithuania"),
    ("+48", "Poland"),
    ("+420", "Czech Republic"),
    ("+421", "Slovakia"),
    ("+36", "Hungary"),
    ("+40", "Romania"),
    ("+359", "Bulgaria"),
    ("+385", "Croatia"),
    ("+381", "Serbia"),
    ("+382", "Montenegro"),
    ("+383", "Kosovo"),
    ("+389", "North Macedonia"),
    ("+386", "Slovenia"),
    ("+387", "Bosnia and Herzegovina"),
];

#[derive(Deserialize)]
struct RawHeadingRule {
    prefix: String,
    region: String,
    status: HeadingStatus,
}

/// A validated mapping from a heading prefix to a region and status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHeadingRule")]
pub struct HeadingRule {
    prefix: String,
    region: String,
    status: HeadingStatus,
}

impl HeadingRule {
    /// Create a new heading rule with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is not 1-4 digits with an optional
    /// leading '+', or if the region is blank
    pub fn new(
        prefix: impl Into<String>,
        region: impl Into<String>,
        status: HeadingStatus,
    ) -> HeadingResult<Self> {
        let prefix = prefix.into();
        let region = region.into();

        if !PREFIX_REGEX.is_match(&prefix) {
            return Err(HeadingError::invalid_prefix(
                &prefix,
                "expected 1-4 digits with an optional leading '+'",
            ));
        }

        if region.trim().is_empty() {
            return Err(HeadingError::invalid_region(format!(
                "region for prefix '{prefix}' cannot be empty"
            )));
        }

        Ok(Self {
            prefix,
            region,
            status,
        })
    }

    /// Create a trusted rule
    pub fn safe(prefix: impl Into<String>, region: impl Into<String>) -> HeadingResult<Self> {
        Self::new(prefix, region, HeadingStatus::Safe)
    }

    /// Create an untrusted rule
    pub fn unsafe_rule(
        prefix: impl Into<String>,
        region: impl Into<String>,
    ) -> HeadingResult<Self> {
        Self::new(prefix, region, HeadingStatus::Unsafe)
    }

    /// Get the heading prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get the region label
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the safety status
    pub fn status(&self) -> HeadingStatus {
        self.status
    }
}

impl TryFrom<RawHeadingRule> for HeadingRule {
    type Error = HeadingError;

    fn try_from(raw: RawHeadingRule) -> Result<Self, Self::Error> {
        Self::new(raw.prefix, raw.region, raw.status)
    }
}

/// Built-in heading table used when the store has no match
#[derive(Debug)]
pub struct DefaultHeadingTable {
    rules: HashMap<String, HeadingRule>,
}

impl DefaultHeadingTable {
    /// Get the process-wide default table
    pub fn builtin() -> &'static Self {
        &DEFAULT_TABLE
    }

    fn build() -> Self {
        let international = INTERNATIONAL_HEADS.iter().map(|(prefix, country)| {
            let status = if *country == VIETNAM_REGION {
                HeadingStatus::Safe
            } else {
                HeadingStatus::Unsafe
            };
            (*prefix, (*country).to_string(), status)
        });
        let landline = VIETNAM_LANDLINE_AREAS.iter().map(|(prefix, area)| {
            (
                *prefix,
                format!("{VIETNAM_REGION} - {area}"),
                HeadingStatus::Unsafe,
            )
        });
        let mobile = VIETNAM_MOBILE_HEADS
            .iter()
            .map(|prefix| (*prefix, VIETNAM_REGION.to_string(), HeadingStatus::Safe));

        // Later sources win, so the mobile allow-list has the final say.
        let rules = international
            .chain(landline)
            .chain(mobile)
            .map(|(prefix, region, status)| {
                (
                    prefix.to_string(),
                    HeadingRule {
                        prefix: prefix.to_string(),
                        region,
                        status,
                    },
                )
            })
            .collect();

        Self { rules }
    }

    /// Look up a heading in the default table
    pub fn lookup(&self, head: &str) -> Option<&HeadingRule> {
        self.rules.get(head)
    }

    /// Number of built-in rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for the international country codes
    ///
    /// These are what an administrative populate step seeds into a store.
    pub fn international_rules(&self) -> impl Iterator<Item = &HeadingRule> {
        INTERNATIONAL_HEADS
            .iter()
            .filter_map(|(prefix, _)| self.rules.get(*prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_validation() {
        assert!(HeadingRule::safe("096", "Vietnam").is_ok());
        assert!(HeadingRule::safe("+84", "Vietnam").is_ok());
        assert!(HeadingRule::safe("+1", "USA/Canada").is_ok());
        assert!(HeadingRule::safe("0203", "Hà Giang").is_ok());

        assert!(HeadingRule::safe("", "Nowhere").is_err());
        assert!(HeadingRule::safe("+", "Nowhere").is_err());
        assert!(HeadingRule::safe("12345", "Nowhere").is_err());
        assert!(HeadingRule::safe("09a", "Nowhere").is_err());
        assert!(HeadingRule::safe("++84", "Nowhere").is_err());
        assert!(HeadingRule::safe("\u{ff10}\u{ff19}\u{ff16}", "Fullwidth").is_err());
        assert!(HeadingRule::safe("\u{660}\u{669}\u{666}", "Arabic-Indic").is_err());
        assert!(HeadingRule::safe("+\u{0968}\u{0967}", "Devanagari").is_err());
    }

    #[test]
    fn region_validation() {
        let error = HeadingRule::unsafe_rule("024", "   ").unwrap_err();
        assert!(matches!(error, HeadingError::InvalidRegion { .. }));
    }

    #[test]
    fn deserialization_validates() {
        let rule: HeadingRule =
            serde_json::from_str(r#"{"prefix":"+44","region":"United Kingdom","status":"unsafe"}"#)
                .unwrap();
        assert_eq!(rule.prefix(), "+44");
        assert!(rule.status().is_unsafe());

        let bad = serde_json::from_str::<HeadingRule>(
            r#"{"prefix":"+44444","region":"Nowhere","status":"unsafe"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn builtin_entries_are_valid_rules() {
        for rule in DefaultHeadingTable::builtin().rules.values() {
            assert!(
                HeadingRule::new(rule.prefix(), rule.region(), rule.status()).is_ok(),
                "invalid builtin prefix {}",
                rule.prefix()
            );
        }
    }

    #[test]
    fn mobile_heads_are_safe() {
        let table = DefaultHeadingTable::builtin();
        for head in ["096", "032", "088", "+84"] {
            let rule = table.lookup(head).unwrap();
            assert_eq!(rule.region(), VIETNAM_REGION);
            assert!(rule.status().is_safe());
        }
    }

    #[test]
    fn landline_heads_are_unsafe_with_area() {
        let table = DefaultHeadingTable::builtin();
        let rule = table.lookup("024").unwrap();
        assert_eq!(rule.region(), "Vietnam - Hà Nội");
        assert!(rule.status().is_unsafe());

        let rule = table.lookup("0236").unwrap();
        assert_eq!(rule.region(), "Vietnam - Thừa Thiên Huế");
    }

    #[test]
    fn international_heads_are_unsafe_except_vietnam() {
        let table = DefaultHeadingTable::builtin();
        let rule = table.lookup("+1").unwrap();
        assert_eq!(rule.region(), "USA/Canada");
        assert!(rule.status().is_unsafe());

        let safe: Vec<_> = table
            .international_rules()
            .filter(|rule| rule.status().is_safe())
            .map(HeadingRule::prefix)
            .collect();
        assert_eq!(safe, vec!["+84"]);
        assert_eq!(table.international_rules().count(), INTERNATIONAL_HEADS.len());
    }
}
