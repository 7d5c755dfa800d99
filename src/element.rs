//! Basic elements: named numeric traits with a provenance tag and a tier.

use crate::error::{MalformedKind, MalformedRecordError};
use crate::key::AffixKey;
use crate::record::{child_path, required, Record, RecordMap};

/// Source tag for elements granted by static configuration.
pub const SOURCE_CONFIG: &str = "CONFIG";

/// Source tag for elements rolled at random.
pub const SOURCE_RANDOM: &str = "RANDOM";

/// One basic element attached to an item.
///
/// Entries are immutable once built; replace them by adding a new entry
/// with the same key.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::element::{BasicEntry, SOURCE_RANDOM};
///
/// let entry = BasicEntry::new("fire", SOURCE_RANDOM, 3);
/// assert_eq!(entry.key().as_str(), "fire");
/// assert_eq!(entry.source(), "RANDOM");
/// assert_eq!(entry.tier(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicEntry {
    key: AffixKey,
    source: String,
    tier: u32,
}

impl BasicEntry {
    pub fn new(key: impl Into<AffixKey>, source: impl Into<String>, tier: u32) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
            tier,
        }
    }

    pub fn key(&self) -> &AffixKey {
        &self.key
    }

    /// Provenance tag. Free-form and case-sensitive.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub(crate) fn to_record(&self) -> Record {
        let mut map = RecordMap::with_capacity(3);
        map.insert("key".to_string(), Record::from(self.key.as_str()));
        map.insert("source".to_string(), Record::from(self.source.as_str()));
        map.insert("tier".to_string(), tier_record(self.tier));
        Record::from(map)
    }

    pub(crate) fn from_record(record: &Record, path: &str) -> Result<Self, MalformedRecordError> {
        let map = record.expect_compound(path)?;

        let key_path = child_path(path, "key");
        let key = required(map, path, "key")?.expect_str(&key_path)?;

        let source_path = child_path(path, "source");
        let source = required(map, path, "source")?.expect_str(&source_path)?;

        let tier_path = child_path(path, "tier");
        let raw_tier = required(map, path, "tier")?.expect_long(&tier_path)?;
        let tier = u32::try_from(raw_tier)
            .map_err(|_| MalformedRecordError::new(tier_path, MalformedKind::TierOutOfRange(raw_tier)))?;

        Ok(Self::new(key, source, tier))
    }
}

// Tiers above i32::MAX are written as longs so they read back unchanged.
fn tier_record(tier: u32) -> Record {
    match i32::try_from(tier) {
        Ok(small) => Record::Int(small),
        Err(_) => Record::Long(i64::from(tier)),
    }
}
