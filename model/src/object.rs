// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Object identity: validated type tags, labels, and `(type, id)` keys.

use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};

/// A short type tag naming a kind of hardware-backed object (e.g. `dpni`).
///
/// Legal tags are 1 to [`ObjectType::MAX_LEN`] bytes of lowercase ASCII
/// alphanumerics, `_`, or `-`.  It is deliberately not possible to build an
/// `ObjectType` from an arbitrary string without validation; use
/// [`ObjectType::new`].
///
/// `Ord` is byte-wise string order, which is the primary sort key of every
/// object listing in a layout.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ObjectType(String);

impl ObjectType {
    /// The maximum legal length of a type tag, in bytes.
    pub const MAX_LEN: usize = 16;

    /// Create a new [`ObjectType`] from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidObjectType`] error if the tag is empty, too long,
    /// or contains anything but lowercase ASCII alphanumerics, `_`, or `-`.
    pub fn new(tag: impl AsRef<str>) -> Result<ObjectType, InvalidObjectType> {
        let tag = tag.as_ref();
        if tag.is_empty() {
            return Err(InvalidObjectType::Empty);
        }
        if tag.len() > ObjectType::MAX_LEN {
            return Err(InvalidObjectType::TooLong(tag.to_string()));
        }
        if !tag
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(InvalidObjectType::IllegalCharacter(tag.to_string()));
        }
        Ok(ObjectType(tag.to_string()))
    }

    /// Get the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ObjectType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectType {
    type Error = InvalidObjectType;

    fn try_from(tag: String) -> Result<ObjectType, Self::Error> {
        ObjectType::new(tag)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = InvalidObjectType;

    fn try_from(tag: &str) -> Result<ObjectType, Self::Error> {
        ObjectType::new(tag)
    }
}

impl From<ObjectType> for String {
    fn from(tag: ObjectType) -> String {
        tag.0
    }
}

/// Errors that can occur when validating an [`ObjectType`].
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum InvalidObjectType {
    #[error("object type tags may not be empty")]
    Empty,
    #[error("object type tag '{0}' is longer than {MAX} bytes", MAX = ObjectType::MAX_LEN)]
    TooLong(String),
    #[error("object type tag '{0}' contains illegal characters")]
    IllegalCharacter(String),
}

/// An optional human-readable object label.
///
/// Labels are 1 to [`ObjectLabel::MAX_LEN`] bytes of printable ASCII.  The
/// length cap matches what the firmware stores for an object, so a layout
/// snapshot can always be re-applied verbatim.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ObjectLabel(String);

impl ObjectLabel {
    /// The maximum legal length of a label, in bytes.
    pub const MAX_LEN: usize = 15;

    /// Create a new [`ObjectLabel`] from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidObjectLabel`] error if the label is empty, longer
    /// than [`ObjectLabel::MAX_LEN`] bytes, or not printable ASCII.
    pub fn new(label: impl AsRef<str>) -> Result<ObjectLabel, InvalidObjectLabel> {
        let label = label.as_ref();
        if label.is_empty() {
            return Err(InvalidObjectLabel::Empty);
        }
        if label.len() > ObjectLabel::MAX_LEN {
            return Err(InvalidObjectLabel::TooLong(label.to_string()));
        }
        if !label.bytes().all(|b| (0x20..0x7f).contains(&b)) {
            return Err(InvalidObjectLabel::IllegalCharacter(label.to_string()));
        }
        Ok(ObjectLabel(label.to_string()))
    }

    /// Get the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectLabel {
    type Error = InvalidObjectLabel;

    fn try_from(label: String) -> Result<ObjectLabel, Self::Error> {
        ObjectLabel::new(label)
    }
}

impl From<ObjectLabel> for String {
    fn from(label: ObjectLabel) -> String {
        label.0
    }
}

/// Errors that can occur when validating an [`ObjectLabel`].
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum InvalidObjectLabel {
    #[error("object labels may not be empty")]
    Empty,
    #[error("object label '{0}' is longer than {MAX} bytes", MAX = ObjectLabel::MAX_LEN)]
    TooLong(String),
    #[error("object label '{0}' contains non-printable characters")]
    IllegalCharacter(String),
}

/// The identity of one object in the fabric: its type tag plus numeric id.
///
/// A key is unique across the *entire* tree, not merely within one
/// container.  Renders as `type@id`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectKey {
    object_type: ObjectType,
    id: u32,
}

impl ObjectKey {
    #[must_use]
    pub fn new(object_type: ObjectType, id: u32) -> ObjectKey {
        ObjectKey { object_type, id }
    }

    #[must_use]
    pub fn object_type(&self) -> &ObjectType {
        &self.object_type
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.object_type, self.id)
    }
}

impl std::str::FromStr for ObjectKey {
    type Err = InvalidObjectKey;

    /// Parse the `type@id` rendering back into a key.
    fn from_str(input: &str) -> Result<ObjectKey, Self::Err> {
        let (tag, id) = input
            .split_once('@')
            .ok_or_else(|| InvalidObjectKey::MissingSeparator(input.to_string()))?;
        let object_type = ObjectType::new(tag)?;
        let id = id
            .parse::<u32>()
            .map_err(|_| InvalidObjectKey::BadId(input.to_string()))?;
        Ok(ObjectKey::new(object_type, id))
    }
}

/// Errors that can occur when parsing a `type@id` string.
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum InvalidObjectKey {
    #[error("'{0}' is missing the '@' separator")]
    MissingSeparator(String),
    #[error(transparent)]
    BadType(#[from] InvalidObjectType),
    #[error("'{0}' does not carry a numeric object id")]
    BadId(String),
}

/// One hardware-backed resource instance.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    key: ObjectKey,
    label: Option<ObjectLabel>,
}

impl Object {
    #[must_use]
    pub fn new(key: ObjectKey, label: Option<ObjectLabel>) -> Object {
        Object { key, label }
    }

    #[must_use]
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    #[must_use]
    pub fn label(&self) -> Option<&ObjectLabel> {
        self.label.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legal_type_tags() {
        for tag in ["dpni", "dpio", "dpsw", "a", "x-1", "some_type_0"] {
            assert_eq!(ObjectType::new(tag).unwrap().as_str(), tag);
        }
    }

    #[test]
    fn empty_type_tag_is_rejected() {
        assert_eq!(ObjectType::new("").unwrap_err(), InvalidObjectType::Empty);
    }

    #[test]
    fn oversized_type_tag_is_rejected() {
        let tag = "a".repeat(ObjectType::MAX_LEN + 1);
        assert_eq!(
            ObjectType::new(&tag).unwrap_err(),
            InvalidObjectType::TooLong(tag)
        );
    }

    #[test]
    fn uppercase_type_tag_is_rejected() {
        assert_eq!(
            ObjectType::new("DPNI").unwrap_err(),
            InvalidObjectType::IllegalCharacter("DPNI".to_string())
        );
    }

    #[test]
    fn label_length_is_capped_at_15() {
        assert!(ObjectLabel::new("a".repeat(15)).is_ok());
        let long = "a".repeat(16);
        assert_eq!(
            ObjectLabel::new(&long).unwrap_err(),
            InvalidObjectLabel::TooLong(long)
        );
    }

    #[test]
    fn label_rejects_control_characters() {
        assert_eq!(
            ObjectLabel::new("a\tb").unwrap_err(),
            InvalidObjectLabel::IllegalCharacter("a\tb".to_string())
        );
    }

    #[test]
    fn key_display() {
        let key = ObjectKey::new(ObjectType::new("dpni").unwrap(), 5);
        assert_eq!(key.to_string(), "dpni@5");
    }

    #[test]
    fn key_order_is_type_then_id() {
        let k = |t: &str, id| ObjectKey::new(ObjectType::new(t).unwrap(), id);
        let mut keys = vec![k("dpni", 6), k("dpio", 0), k("dpni", 5), k("dpio", 12)];
        keys.sort();
        assert_eq!(
            keys,
            vec![k("dpio", 0), k("dpio", 12), k("dpni", 5), k("dpni", 6)]
        );
    }
}
