//! Node numbers: the 32-bit identifiers of mesh participants.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A mesh node number.
///
/// Zero is reserved for anonymous packets and never names a real node.
/// Serializes as a bare integer; as a JSON map key it becomes the decimal
/// string the snapshot format uses. Deserializes from either form, since
/// map keys reach flattened structs as strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeNum(u32);

impl NodeNum {
    /// The anonymous sender.
    pub const UNKNOWN: Self = Self(0);

    pub const fn new(num: u32) -> Self {
        Self(num)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == 0
    }

    /// The `!xxxxxxxx` form used in bus topics and radio user ids.
    pub fn to_user_id(&self) -> String {
        format!("!{:08x}", self.0)
    }
}

impl From<u32> for NodeNum {
    fn from(num: u32) -> Self {
        Self(num)
    }
}

impl fmt::Display for NodeNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a node number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseNodeNumError(String);

impl fmt::Display for ParseNodeNumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid node number: {:?}", self.0)
    }
}

impl std::error::Error for ParseNodeNumError {}

impl Serialize for NodeNum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for NodeNum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeNumVisitor)
    }
}

struct NodeNumVisitor;

impl<'de> Visitor<'de> for NodeNumVisitor {
    type Value = NodeNum;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 32-bit node number or its decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeNum, E> {
        u32::try_from(v)
            .map(NodeNum)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeNum, E> {
        u32::try_from(v)
            .map(NodeNum)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeNum, E> {
        v.parse::<u32>()
            .map(NodeNum)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl FromStr for NodeNum {
    type Err = ParseNodeNumError;

    /// Accepts decimal (`"11184641"`) or the `!`-prefixed hex user id (`"!00aaaa01"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix('!') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse::<u32>(),
        };
        parsed
            .map(Self)
            .map_err(|_| ParseNodeNumError(s.to_string()))
    }
}
