//! Affix key module.
//!
//! Provides the `AffixKey` type, an interned string identifier used both
//! for basic element keys and for modifier attachment slots. Keys follow
//! the host's resource-location convention: an optional `namespace:`
//! prefix followed by a path.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Namespace assumed for keys written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Interned string identifier for affix elements and attachment slots.
///
/// Uses `Arc<str>` so cloning a key out of a `WeaponData` is cheap.
/// Keys are case-sensitive and compared by content.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::AffixKey;
///
/// let fire = AffixKey::new("fire");
/// let fire2: AffixKey = "fire".into();
/// let fire3: AffixKey = String::from("fire").into();
///
/// assert_eq!(fire, fire2);
/// assert_eq!(fire, fire3);
/// assert_ne!(fire, AffixKey::new("Fire"));
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AffixKey(Arc<str>);

impl Serialize for AffixKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

struct AffixKeyVisitor;

impl<'de> Visitor<'de> for AffixKeyVisitor {
    type Value = AffixKey;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a non-empty affix key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<AffixKey, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(AffixKey::new(v))
    }
}

// Empty keys are refused when reading configuration; entries built in code
// are not checked.
impl<'de> Deserialize<'de> for AffixKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AffixKeyVisitor)
    }
}

impl AffixKey {
    /// Create a new `AffixKey` from a string slice.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weapon_affix::AffixKey;
    ///
    /// let key = AffixKey::new("generic.armor");
    /// assert_eq!(key.as_str(), "generic.armor");
    /// ```
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace part of the key, or [`DEFAULT_NAMESPACE`] when absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weapon_affix::AffixKey;
    ///
    /// assert_eq!(AffixKey::new("affixes:fire").namespace(), "affixes");
    /// assert_eq!(AffixKey::new("generic.armor").namespace(), "minecraft");
    /// ```
    pub fn namespace(&self) -> &str {
        self.0
            .split_once(':')
            .map_or(DEFAULT_NAMESPACE, |(namespace, _)| namespace)
    }

    /// Key without its namespace prefix.
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.as_str(), |(_, path)| path)
    }

    /// Whether two keys name the same thing once the default namespace
    /// is filled in, so `fire` matches `minecraft:fire`.
    pub fn same_location(&self, other: &AffixKey) -> bool {
        self.namespace() == other.namespace() && self.path() == other.path()
    }
}

impl From<&str> for AffixKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AffixKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for AffixKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AffixKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
