//! Attribute modifiers and their application.
//!
//! An `InitialModifierEntry` pairs an attachment slot with an
//! `AttributeModifier`. Modifiers combine the way the host's attribute
//! system combines them: collapsed by identifier, then applied in three
//! ordered stages.
//!
//! ```text
//! x = base + Σ ADD_VALUE
//! y = x + x * Σ ADD_MULTIPLIED_BASE
//! y = y * Π (1 + ADD_MULTIPLIED_TOTAL)
//! ```

use crate::error::{MalformedKind, MalformedRecordError};
use crate::key::AffixKey;
use crate::record::{child_path, required, Record, RecordMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How a modifier's amount combines with the attribute value.
///
/// Variants are listed in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// Added to the base value.
    AddValue,
    /// Multiplies the post-addition value and is added on top.
    AddMultipliedBase,
    /// Multiplies the running total by `1 + amount`.
    AddMultipliedTotal,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::AddValue,
        Operation::AddMultipliedBase,
        Operation::AddMultipliedTotal,
    ];

    /// The persisted tag for this operation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weapon_affix::Operation;
    ///
    /// assert_eq!(Operation::AddMultipliedBase.as_str(), "ADD_MULTIPLIED_BASE");
    /// assert_eq!("ADD_VALUE".parse::<Operation>(), Ok(Operation::AddValue));
    /// assert!("add_value".parse::<Operation>().is_err());
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::AddValue => "ADD_VALUE",
            Operation::AddMultipliedBase => "ADD_MULTIPLIED_BASE",
            Operation::AddMultipliedTotal => "ADD_MULTIPLIED_TOTAL",
        }
    }
}

/// Error returned when parsing an unknown operation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute modifier.
///
/// The identifier is what the host deduplicates on, so it must stay
/// stable across save and load.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModifier {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub operation: Operation,
}

impl AttributeModifier {
    pub fn new(id: Uuid, name: impl Into<String>, amount: f64, operation: Operation) -> Self {
        Self {
            id,
            name: name.into(),
            amount,
            operation,
        }
    }

    /// Create a modifier with a freshly generated random identifier.
    pub fn random(name: impl Into<String>, amount: f64, operation: Operation) -> Self {
        Self::new(Uuid::new_v4(), name, amount, operation)
    }
}

/// A modifier applied to an attachment slot when the item is initialized.
///
/// `attachment_key` names the logical slot; it need not match the
/// underlying attribute's own identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialModifierEntry {
    pub attachment_key: AffixKey,
    pub modifier: AttributeModifier,
}

impl InitialModifierEntry {
    pub fn new(attachment_key: impl Into<AffixKey>, modifier: AttributeModifier) -> Self {
        Self {
            attachment_key: attachment_key.into(),
            modifier,
        }
    }

    pub(crate) fn to_record(&self) -> Record {
        let mut map = RecordMap::with_capacity(5);
        map.insert(
            "attachment_key".to_string(),
            Record::from(self.attachment_key.as_str()),
        );
        map.insert(
            "modifier_id".to_string(),
            Record::from(self.modifier.id.hyphenated().to_string()),
        );
        map.insert(
            "modifier_name".to_string(),
            Record::from(self.modifier.name.as_str()),
        );
        map.insert("amount".to_string(), Record::from(self.modifier.amount));
        map.insert(
            "operation".to_string(),
            Record::from(self.modifier.operation.as_str()),
        );
        Record::from(map)
    }

    pub(crate) fn from_record(record: &Record, path: &str) -> Result<Self, MalformedRecordError> {
        let map = record.expect_compound(path)?;

        let key_path = child_path(path, "attachment_key");
        let attachment_key = required(map, path, "attachment_key")?.expect_str(&key_path)?;

        let id_path = child_path(path, "modifier_id");
        let id = decode_uuid(required(map, path, "modifier_id")?, &id_path)?;

        let name_path = child_path(path, "modifier_name");
        let name = required(map, path, "modifier_name")?.expect_str(&name_path)?;

        let amount_path = child_path(path, "amount");
        let amount = required(map, path, "amount")?.expect_double(&amount_path)?;

        let op_path = child_path(path, "operation");
        let tag = required(map, path, "operation")?.expect_str(&op_path)?;
        let operation = tag.parse::<Operation>().map_err(|e| {
            MalformedRecordError::new(op_path.as_str(), MalformedKind::UnknownOperation(e.0))
        })?;

        Ok(Self::new(
            attachment_key,
            AttributeModifier::new(id, name, amount, operation),
        ))
    }
}

/// Read a UUID stored either as a string or as `[most, least]` longs.
fn decode_uuid(record: &Record, path: &str) -> Result<Uuid, MalformedRecordError> {
    match record {
        Record::String(raw) => Uuid::parse_str(raw)
            .map_err(|_| MalformedRecordError::new(path, MalformedKind::InvalidUuid(raw.clone()))),
        Record::List(halves) => match halves.as_slice() {
            [most, least] => {
                let most = most.expect_long(&format!("{}[0]", path))?;
                let least = least.expect_long(&format!("{}[1]", path))?;
                Ok(Uuid::from_u64_pair(most as u64, least as u64))
            }
            _ => Err(MalformedRecordError::new(
                path,
                MalformedKind::InvalidUuid(format!("list of {} elements", halves.len())),
            )),
        },
        other => Err(MalformedRecordError::new(
            path,
            MalformedKind::WrongType {
                expected: "uuid",
                found: other.type_name(),
            },
        )),
    }
}

/// Apply modifiers to a base value.
///
/// Modifiers sharing an identifier collapse to the last one given,
/// matching the host's deduplication by identifier.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::{apply_modifiers, AttributeModifier, Operation};
///
/// let mods = vec![
///     AttributeModifier::random("flat", 4.0, Operation::AddValue),
///     AttributeModifier::random("base", 0.5, Operation::AddMultipliedBase),
///     AttributeModifier::random("total", 1.0, Operation::AddMultipliedTotal),
/// ];
///
/// // (10 + 4) = 14, 14 + 14 * 0.5 = 21, 21 * 2 = 42
/// assert_eq!(apply_modifiers(10.0, &mods), 42.0);
/// ```
pub fn apply_modifiers<'a, I>(base: f64, modifiers: I) -> f64
where
    I: IntoIterator<Item = &'a AttributeModifier>,
{
    let mut by_id: IndexMap<Uuid, &AttributeModifier> = IndexMap::new();
    for modifier in modifiers {
        by_id.insert(modifier.id, modifier);
    }

    let sum_of = |op: Operation| -> f64 {
        by_id
            .values()
            .filter(|m| m.operation == op)
            .map(|m| m.amount)
            .sum()
    };

    let added = base + sum_of(Operation::AddValue);
    let mut value = added + added * sum_of(Operation::AddMultipliedBase);
    for modifier in by_id
        .values()
        .filter(|m| m.operation == Operation::AddMultipliedTotal)
    {
        value *= 1.0 + modifier.amount;
    }

    tracing::trace!(base, modifiers = by_id.len(), value, "applied modifiers");
    value
}
