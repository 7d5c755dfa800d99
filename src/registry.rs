//! Element and attachment registration tables.
//!
//! An `AffixRegistry` is an explicit table of the basic elements and
//! attachment slots a game recognises. It is built by the caller, usually
//! from a TOML file, and handed to whatever needs it.
//!
//! ```toml
//! attachments = ["generic.attack_damage", "generic.armor"]
//!
//! [[elements]]
//! key = "fire"
//! max_tier = 5
//! sources = ["CONFIG", "RANDOM"]
//! ```

use crate::error::AffixError;
use crate::key::AffixKey;
use crate::weapon_data::WeaponData;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Registration entry for one basic element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDef {
    pub key: AffixKey,
    /// Highest tier this element may carry.
    #[serde(default = "default_max_tier")]
    pub max_tier: u32,
    /// Allowed source tags. Empty accepts any source.
    #[serde(default)]
    pub sources: Vec<String>,
}

fn default_max_tier() -> u32 {
    u32::MAX
}

impl ElementDef {
    pub fn new(key: impl Into<AffixKey>) -> Self {
        Self {
            key: key.into(),
            max_tier: default_max_tier(),
            sources: Vec::new(),
        }
    }

    pub fn with_max_tier(mut self, max_tier: u32) -> Self {
        self.max_tier = max_tier;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    fn allows_source(&self, source: &str) -> bool {
        self.sources.is_empty() || self.sources.iter().any(|s| s == source)
    }
}

/// Known elements and attachment slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixRegistry {
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    /// Registered attachment slots. Empty accepts any slot.
    #[serde(default)]
    pub attachments: Vec<AffixKey>,
}

impl AffixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element. A later definition for the same location
    /// replaces the earlier one.
    pub fn register_element(&mut self, def: ElementDef) {
        match self
            .elements
            .iter_mut()
            .find(|e| e.key.same_location(&def.key))
        {
            Some(existing) => *existing = def,
            None => self.elements.push(def),
        }
    }

    pub fn register_attachment(&mut self, key: impl Into<AffixKey>) {
        let key = key.into();
        if !self.has_attachment(&key) {
            self.attachments.push(key);
        }
    }

    /// Look up an element; `fire` and `minecraft:fire` are the same key.
    pub fn element(&self, key: &str) -> Option<&ElementDef> {
        let wanted = AffixKey::new(key);
        self.elements.iter().find(|e| e.key.same_location(&wanted))
    }

    fn has_attachment(&self, key: &AffixKey) -> bool {
        self.attachments.iter().any(|a| a.same_location(key))
    }

    /// Load a registry from a TOML file.
    pub fn load_toml(path: &Path) -> Result<Self, AffixError> {
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a registry from TOML text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weapon_affix::AffixRegistry;
    ///
    /// let registry = AffixRegistry::parse_toml(r#"
    ///     [[elements]]
    ///     key = "fire"
    ///     max_tier = 3
    /// "#).unwrap();
    ///
    /// assert_eq!(registry.element("fire").unwrap().max_tier, 3);
    /// ```
    pub fn parse_toml(content: &str) -> Result<Self, AffixError> {
        let registry: AffixRegistry = toml::from_str(content)?;
        tracing::debug!(
            elements = registry.elements.len(),
            attachments = registry.attachments.len(),
            "loaded affix registry"
        );
        Ok(registry)
    }

    /// Check `data` against the registered tables.
    ///
    /// Returns the first violation found, elements before modifiers.
    pub fn validate(&self, data: &WeaponData) -> Result<(), AffixError> {
        for entry in data.basic_elements() {
            let def = self
                .element(entry.key().as_str())
                .ok_or_else(|| AffixError::UnknownElement(entry.key().clone()))?;
            if entry.tier() > def.max_tier {
                return Err(AffixError::TierAboveMax {
                    key: entry.key().clone(),
                    tier: entry.tier(),
                    max_tier: def.max_tier,
                });
            }
            if !def.allows_source(entry.source()) {
                return Err(AffixError::DisallowedSource {
                    key: entry.key().clone(),
                    source_tag: entry.source().to_string(),
                });
            }
        }

        if !self.attachments.is_empty() {
            for entry in data.initial_modifiers() {
                if !self.has_attachment(&entry.attachment_key) {
                    return Err(AffixError::UnknownAttachment(entry.attachment_key.clone()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{SOURCE_CONFIG, SOURCE_RANDOM};
    use crate::modifier::{AttributeModifier, InitialModifierEntry, Operation};

    fn registry() -> AffixRegistry {
        let mut registry = AffixRegistry::new();
        registry.register_element(ElementDef::new("fire").with_max_tier(3));
        registry.register_element(ElementDef::new("holy").with_source(SOURCE_CONFIG));
        registry.register_attachment("generic.armor");
        registry
    }

    #[test]
    fn test_parse_defaults() {
        let registry = AffixRegistry::parse_toml(
            r#"
            [[elements]]
            key = "fire"
            "#,
        )
        .unwrap();
        let fire = registry.element("fire").unwrap();
        assert_eq!(fire.max_tier, u32::MAX);
        assert!(fire.sources.is_empty());
        assert!(registry.attachments.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let registry = AffixRegistry::parse_toml(
            r#"
            attachments = ["generic.attack_damage"]

            [[elements]]
            key = "frost"
            max_tier = 4
            sources = ["RANDOM"]
            "#,
        )
        .unwrap();
        assert_eq!(registry.attachments, vec![AffixKey::new("generic.attack_damage")]);
        let frost = registry.element("frost").unwrap();
        assert_eq!(frost.max_tier, 4);
        assert_eq!(frost.sources, vec!["RANDOM".to_string()]);
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = AffixRegistry::parse_toml("[[elements]]\nmax_tier = 2").unwrap_err();
        assert!(matches!(err, AffixError::Toml(_)));
    }

    #[test]
    fn test_register_element_replaces() {
        let mut registry = registry();
        registry.register_element(ElementDef::new("fire").with_max_tier(9));
        assert_eq!(registry.elements.len(), 2);
        assert_eq!(registry.element("fire").unwrap().max_tier, 9);
    }

    #[test]
    fn test_validate_accepts_registered_data() {
        let mut data = WeaponData::new();
        data.add_basic_element("fire", SOURCE_RANDOM, 3);
        data.add_basic_element("holy", SOURCE_CONFIG, 1);
        data.add_initial_modifier(InitialModifierEntry::new(
            "generic.armor",
            AttributeModifier::random("Plate", 2.0, Operation::AddValue),
        ));
        assert!(registry().validate(&data).is_ok());
    }

    #[test]
    fn test_validate_unknown_element() {
        let mut data = WeaponData::new();
        data.add_basic_element("shadow", SOURCE_RANDOM, 1);
        let err = registry().validate(&data).unwrap_err();
        assert!(matches!(err, AffixError::UnknownElement(k) if k.as_str() == "shadow"));
    }

    #[test]
    fn test_validate_tier_above_max() {
        let mut data = WeaponData::new();
        data.add_basic_element("fire", SOURCE_RANDOM, 4);
        let err = registry().validate(&data).unwrap_err();
        assert!(matches!(
            err,
            AffixError::TierAboveMax {
                tier: 4,
                max_tier: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_disallowed_source() {
        let mut data = WeaponData::new();
        data.add_basic_element("holy", SOURCE_RANDOM, 1);
        let err = registry().validate(&data).unwrap_err();
        assert!(matches!(err, AffixError::DisallowedSource { .. }));
    }

    #[test]
    fn test_validate_unknown_attachment() {
        let mut data = WeaponData::new();
        data.add_initial_modifier(InitialModifierEntry::new(
            "generic.luck",
            AttributeModifier::random("Clover", 1.0, Operation::AddValue),
        ));
        let err = registry().validate(&data).unwrap_err();
        assert!(matches!(err, AffixError::UnknownAttachment(k) if k.as_str() == "generic.luck"));
    }

    #[test]
    fn test_default_namespace_matches_bare_keys() {
        let mut registry = registry();
        registry.register_attachment("minecraft:generic.armor");
        assert_eq!(registry.attachments.len(), 1);
        assert!(registry.element("minecraft:fire").is_some());
        assert!(registry.element("affixes:fire").is_none());

        let mut data = WeaponData::new();
        data.add_basic_element("minecraft:fire", SOURCE_RANDOM, 2);
        data.add_initial_modifier(InitialModifierEntry::new(
            "minecraft:generic.armor",
            AttributeModifier::random("Plate", 1.0, Operation::AddValue),
        ));
        assert!(registry.validate(&data).is_ok());
    }

    #[test]
    fn test_empty_key_in_toml_rejected() {
        let err = AffixRegistry::parse_toml("[[elements]]\nkey = \"\"").unwrap_err();
        assert!(matches!(err, AffixError::Toml(_)));
    }

    #[test]
    fn test_empty_attachment_table_accepts_any_slot() {
        let mut data = WeaponData::new();
        data.add_initial_modifier(InitialModifierEntry::new(
            "anything",
            AttributeModifier::random("Any", 1.0, Operation::AddValue),
        ));
        assert!(AffixRegistry::new().validate(&data).is_ok());
    }
}
