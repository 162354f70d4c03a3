//! Phase identifiers split into a coarse mineral name and a generation index.

use std::convert::Infallible;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fine-grained phase identifier such as `olivine_1` or `liquid`.
///
/// Identifiers are parsed once when a table is ingested. A trailing
/// `_<digits>` segment is the generation index; any other identifier is a bare
/// name without a generation. Ordering is by name, then generation (bare names
/// sort before numbered generations).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseId {
    name: String,
    generation: Option<u32>,
}

impl PhaseId {
    /// Creates an identifier from its parts.
    pub fn new(name: impl Into<String>, generation: Option<u32>) -> Self {
        Self {
            name: name.into(),
            generation,
        }
    }

    /// Parses a formatted identifier.
    pub fn parse(raw: &str) -> Self {
        if let Some((name, suffix)) = raw.rsplit_once('_') {
            let numeric = !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit());
            if numeric && !name.is_empty() {
                if let Ok(generation) = suffix.parse::<u32>() {
                    return Self::new(name, Some(generation));
                }
            }
        }
        Self::new(raw, None)
    }

    /// Coarse mineral-type name shared by every generation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generation index, when the identifier carries one.
    pub fn generation(&self) -> Option<u32> {
        self.generation
    }

    /// True for the first or only generation of a phase.
    pub fn is_first_generation(&self) -> bool {
        matches!(self.generation, None | Some(0))
    }
}

impl Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation {
            Some(generation) => write!(f, "{}_{}", self.name, generation),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for PhaseId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for PhaseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PhaseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
