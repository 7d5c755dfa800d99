//! The `WeaponData` aggregate and its persisted form.

use crate::element::BasicEntry;
use crate::error::{AffixError, MalformedRecordError};
use crate::key::AffixKey;
use crate::modifier::{apply_modifiers, AttributeModifier, InitialModifierEntry};
use crate::record::{index_path, required, Record, RecordMap};

const BASIC_ELEMENTS: &str = "basic_elements";
const INITIAL_MODIFIERS: &str = "initial_modifiers";

/// Affix data attached to one item.
///
/// Holds basic elements and initial modifiers in insertion order. The
/// two sequences are independent; neither refers to the other.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::{AttributeModifier, InitialModifierEntry, Operation, WeaponData};
///
/// let mut data = WeaponData::new();
/// data.add_basic_element("fire", "RANDOM", 2);
/// data.add_initial_modifier(InitialModifierEntry::new(
///     "generic.attack_damage",
///     AttributeModifier::random("Fire edge", 3.0, Operation::AddValue),
/// ));
///
/// let record = data.to_record();
/// let restored = WeaponData::from_record(&record).unwrap();
/// assert_eq!(restored, data);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponData {
    basic_elements: Vec<BasicEntry>,
    initial_modifiers: Vec<InitialModifierEntry>,
}

impl WeaponData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a basic element.
    ///
    /// No uniqueness check is made; a later entry with the same key
    /// shadows earlier ones in [`WeaponData::basic_element`].
    pub fn add_basic_element(
        &mut self,
        key: impl Into<AffixKey>,
        source: impl Into<String>,
        tier: u32,
    ) {
        self.basic_elements.push(BasicEntry::new(key, source, tier));
    }

    /// Append an initial modifier. Duplicate keys and identifiers are kept.
    pub fn add_initial_modifier(&mut self, entry: InitialModifierEntry) {
        self.initial_modifiers.push(entry);
    }

    pub fn basic_elements(&self) -> &[BasicEntry] {
        &self.basic_elements
    }

    pub fn initial_modifiers(&self) -> &[InitialModifierEntry] {
        &self.initial_modifiers
    }

    pub fn is_empty(&self) -> bool {
        self.basic_elements.is_empty() && self.initial_modifiers.is_empty()
    }

    /// The most recently added element with `key`, if any.
    pub fn basic_element(&self, key: &str) -> Option<&BasicEntry> {
        self.basic_elements
            .iter()
            .rev()
            .find(|entry| entry.key().as_str() == key)
    }

    /// Modifiers targeting one attachment slot, in insertion order.
    pub fn modifiers_for<'a>(
        &'a self,
        attachment_key: &'a str,
    ) -> impl Iterator<Item = &'a AttributeModifier> + 'a {
        self.initial_modifiers
            .iter()
            .filter(move |entry| entry.attachment_key.as_str() == attachment_key)
            .map(|entry| &entry.modifier)
    }

    /// Apply every modifier targeting `attachment_key` to `base`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weapon_affix::{AttributeModifier, InitialModifierEntry, Operation, WeaponData};
    ///
    /// let mut data = WeaponData::new();
    /// data.add_initial_modifier(InitialModifierEntry::new(
    ///     "generic.armor",
    ///     AttributeModifier::random("Plating", 0.25, Operation::AddMultipliedBase),
    /// ));
    ///
    /// assert_eq!(data.resolve_attachment("generic.armor", 8.0), 10.0);
    /// assert_eq!(data.resolve_attachment("generic.luck", 8.0), 8.0);
    /// ```
    pub fn resolve_attachment(&self, attachment_key: &str, base: f64) -> f64 {
        apply_modifiers(base, self.modifiers_for(attachment_key))
    }

    /// Build the persisted record for this data.
    ///
    /// Always contains both sequences, even when empty.
    pub fn to_record(&self) -> Record {
        let elements = self
            .basic_elements
            .iter()
            .map(BasicEntry::to_record)
            .collect::<Vec<_>>();
        let modifiers = self
            .initial_modifiers
            .iter()
            .map(InitialModifierEntry::to_record)
            .collect::<Vec<_>>();

        let mut map = RecordMap::with_capacity(2);
        map.insert(BASIC_ELEMENTS.to_string(), Record::from(elements));
        map.insert(INITIAL_MODIFIERS.to_string(), Record::from(modifiers));
        Record::from(map)
    }

    /// Rebuild data from a persisted record.
    ///
    /// Every field is required. The first structural problem found is
    /// returned with its field path.
    pub fn from_record(record: &Record) -> Result<Self, MalformedRecordError> {
        let result = Self::decode(record);
        match &result {
            Ok(data) => tracing::debug!(
                basic_elements = data.basic_elements.len(),
                initial_modifiers = data.initial_modifiers.len(),
                "decoded weapon data"
            ),
            Err(err) => tracing::warn!(path = %err.path, kind = %err.kind, "rejected weapon data record"),
        }
        result
    }

    fn decode(record: &Record) -> Result<Self, MalformedRecordError> {
        let root = record.expect_compound("")?;

        let elements = required(root, "", BASIC_ELEMENTS)?.expect_list(BASIC_ELEMENTS)?;
        let basic_elements = elements
            .iter()
            .enumerate()
            .map(|(i, node)| BasicEntry::from_record(node, &index_path(BASIC_ELEMENTS, i)))
            .collect::<Result<Vec<_>, _>>()?;

        let modifiers = required(root, "", INITIAL_MODIFIERS)?.expect_list(INITIAL_MODIFIERS)?;
        let initial_modifiers = modifiers
            .iter()
            .enumerate()
            .map(|(i, node)| {
                InitialModifierEntry::from_record(node, &index_path(INITIAL_MODIFIERS, i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            basic_elements,
            initial_modifiers,
        })
    }

    /// Serialize the persisted record as JSON text.
    ///
    /// A modifier amount that is NaN or infinite cannot be written and is
    /// reported as malformed at its field path.
    pub fn to_json(&self) -> Result<String, AffixError> {
        self.to_record().to_json_string()
    }

    /// Parse JSON text holding a persisted record.
    pub fn from_json(json: &str) -> Result<Self, AffixError> {
        let record = Record::from_json_str(json)?;
        Ok(Self::from_record(&record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedKind;
    use crate::modifier::Operation;
    use uuid::Uuid;

    fn sample() -> WeaponData {
        let mut data = WeaponData::new();
        data.add_basic_element("fire", "CONFIG", 1);
        data.add_basic_element("frost", "RANDOM", 4);
        data.add_initial_modifier(InitialModifierEntry::new(
            "generic.attack_damage",
            AttributeModifier::new(Uuid::from_u128(42), "Edge", 2.0, Operation::AddValue),
        ));
        data
    }

    #[test]
    fn test_empty_record_shape() {
        let json = WeaponData::new().to_json().unwrap();
        assert_eq!(json, r#"{"basic_elements":[],"initial_modifiers":[]}"#);
    }

    #[test]
    fn test_json_uses_record_layout() {
        let json = sample().to_json().unwrap();
        assert!(json.contains(r#""modifier_id":"00000000-0000-0000-0000-00000000002a""#));
        assert!(json.contains(r#""operation":"ADD_VALUE""#));
        assert!(!json.contains(r#""modifier":"#));
        assert_eq!(WeaponData::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_empty_round_trip() {
        let data = WeaponData::new();
        let restored = WeaponData::from_record(&data.to_record()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored, data);
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let data = sample();
        let restored = WeaponData::from_record(&data.to_record()).unwrap();
        assert_eq!(restored, data);
        assert_eq!(restored.basic_elements()[0].key().as_str(), "fire");
        assert_eq!(restored.basic_elements()[1].key().as_str(), "frost");
    }

    #[test]
    fn test_last_write_wins_lookup() {
        let mut data = sample();
        data.add_basic_element("fire", "RANDOM", 5);
        assert_eq!(data.basic_elements().len(), 3);
        let fire = data.basic_element("fire").unwrap();
        assert_eq!(fire.tier(), 5);
        assert_eq!(fire.source(), "RANDOM");
        assert!(data.basic_element("poison").is_none());
    }

    #[test]
    fn test_views_are_detached_from_store() {
        let data = sample();
        let mut copy = data.basic_elements().to_vec();
        copy.clear();
        assert_eq!(data.basic_elements().len(), 2);
    }

    #[test]
    fn test_missing_sequence_rejected() {
        let record = Record::from_json_str(r#"{"basic_elements":[]}"#).unwrap();
        let err = WeaponData::from_record(&record).unwrap_err();
        assert_eq!(err.path, "initial_modifiers");
        assert_eq!(err.kind, MalformedKind::MissingField);
    }

    #[test]
    fn test_root_must_be_compound() {
        let record = Record::List(Vec::new());
        let err = WeaponData::from_record(&record).unwrap_err();
        assert_eq!(err.path, "");
    }

    #[test]
    fn test_error_path_points_at_entry() {
        let json = r#"{"basic_elements":[{"key":"a","source":"CONFIG","tier":1},{"key":"b","source":3,"tier":1}],"initial_modifiers":[]}"#;
        let err = WeaponData::from_json(json).unwrap_err();
        match err {
            AffixError::Malformed(e) => assert_eq!(e.path, "basic_elements[1].source"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_infinite_amount_not_written() {
        let mut data = sample();
        data.add_initial_modifier(InitialModifierEntry::new(
            "generic.armor",
            AttributeModifier::new(Uuid::from_u128(7), "Boundless", f64::INFINITY, Operation::AddValue),
        ));
        match data.to_json().unwrap_err() {
            AffixError::Malformed(e) => {
                assert_eq!(e.path, "initial_modifiers[1].amount");
                assert_eq!(e.kind, MalformedKind::NonFinite);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_operation_reports_path() {
        let json = r#"{"basic_elements":[],"initial_modifiers":[{"attachment_key":"a","modifier_id":"00000000-0000-0000-0000-000000000001","modifier_name":"n","amount":1.0,"operation":null}]}"#;
        match WeaponData::from_json(json).unwrap_err() {
            AffixError::Malformed(e) => assert_eq!(e.path, "initial_modifiers[0].operation"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_json_is_codec_error() {
        let err = WeaponData::from_json("{not json").unwrap_err();
        assert!(matches!(err, AffixError::Json(_)));
    }
}
