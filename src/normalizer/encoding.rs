//! Categorical encodings fixed at training time.
//!
//! Two policies live here. Closed-set fields ([`PropertyType`],
//! [`BuildingState`]) are part of the request contract and reject unknown
//! labels. Open lookup tables ([`CategoryTable`]) serve enrichment fields and
//! degrade unknown labels to a fallback code.

use crate::utils::{fold_key, normalize_enum_label};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Apartment,
    House,
    Others,
}

impl PropertyType {
    pub const ACCEPTED: &'static [&'static str] = &["APARTMENT", "HOUSE", "OTHERS"];

    pub fn parse(label: &str) -> Option<Self> {
        match normalize_enum_label(label).as_str() {
            "APARTMENT" => Some(Self::Apartment),
            "HOUSE" => Some(Self::House),
            "OTHERS" => Some(Self::Others),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Apartment => 0,
            Self::House => 1,
            Self::Others => 2,
        }
    }
}

/// Building condition, encoded ordinally from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingState {
    ToRebuild,
    ToRenovate,
    Good,
    JustRenovated,
    New,
}

impl BuildingState {
    pub const ACCEPTED: &'static [&'static str] =
        &["NEW", "GOOD", "TO RENOVATE", "JUST RENOVATED", "TO REBUILD"];

    pub fn parse(label: &str) -> Option<Self> {
        match normalize_enum_label(label).as_str() {
            "NEW" => Some(Self::New),
            "GOOD" => Some(Self::Good),
            "TO RENOVATE" => Some(Self::ToRenovate),
            "JUST RENOVATED" => Some(Self::JustRenovated),
            "TO REBUILD" => Some(Self::ToRebuild),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::ToRebuild => 0,
            Self::ToRenovate => 1,
            Self::Good => 2,
            Self::JustRenovated => 3,
            Self::New => 4,
        }
    }
}

/// Label → code table with a fallback for labels the table has never seen.
#[derive(Debug)]
pub struct CategoryTable {
    name: &'static str,
    codes: HashMap<String, u8>,
    fallback: u8,
}

impl CategoryTable {
    fn build(name: &'static str, entries: &[(&str, u8)], fallback: u8) -> Self {
        let codes = entries
            .iter()
            .map(|(label, code)| (fold_key(label), *code))
            .collect();
        Self { name, codes, fallback }
    }

    pub fn fallback(&self) -> u8 {
        self.fallback
    }

    pub fn lookup(&self, label: &str) -> Option<u8> {
        self.codes.get(&fold_key(label)).copied()
    }

    /// Never fails: unseen labels resolve to the table's fallback code.
    pub fn encode(&self, label: &str) -> u8 {
        self.lookup(label).unwrap_or_else(|| {
            debug!(
                "Unseen {} label {:?}, using fallback code {}",
                self.name, label, self.fallback
            );
            self.fallback
        })
    }
}

pub static PROVINCES: Lazy<CategoryTable> = Lazy::new(|| {
    CategoryTable::build(
        "province",
        &[
            ("Brussels", 1),
            ("Brussels-Capital", 1),
            ("Brussels-Capital Region", 1),
            ("Bruxelles", 1),
            ("Luxembourg", 2),
            ("Antwerp", 3),
            ("Anvers", 3),
            ("Antwerpen", 3),
            ("Flemish Brabant", 4),
            ("East Flanders", 5),
            ("West Flanders", 6),
            ("Liège", 7),
            ("Walloon Brabant", 8),
            ("Limburg", 9),
            ("Namur", 10),
            ("Hainaut", 11),
        ],
        1,
    )
});

pub static SUBTYPES: Lazy<CategoryTable> = Lazy::new(|| {
    CategoryTable::build(
        "subtype",
        &[
            ("APARTMENT", 1),
            ("HOUSE", 2),
            ("FLAT_STUDIO", 3),
            ("DUPLEX", 4),
            ("PENTHOUSE", 5),
            ("GROUND_FLOOR", 6),
            ("APARTMENT_BLOCK", 7),
            ("MANSION", 8),
            ("EXCEPTIONAL_PROPERTY", 9),
            ("MIXED_USE_BUILDING", 10),
            ("TRIPLEX", 11),
            ("LOFT", 12),
            ("VILLA", 13),
            ("TOWN_HOUSE", 14),
            ("CHALET", 15),
            ("MANOR_HOUSE", 16),
            ("SERVICE_FLAT", 17),
            ("KOT", 18),
            ("FARMHOUSE", 19),
            ("BUNGALOW", 20),
            ("COUNTRY_COTTAGE", 21),
            ("OTHER_PROPERTY", 22),
            ("CASTLE", 23),
            ("PAVILION", 24),
        ],
        1,
    )
});

pub static EPC_SCORES: Lazy<CategoryTable> = Lazy::new(|| {
    CategoryTable::build(
        "epc-score",
        &[
            ("A+", 8),
            ("A", 7),
            ("B", 6),
            ("C", 5),
            ("D", 4),
            ("E", 3),
            ("F", 2),
            ("G", 1),
        ],
        4,
    )
});
