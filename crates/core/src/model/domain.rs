use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown domain: {raw}")]
pub struct DomainParseError {
    pub raw: String,
}

//
// ─── DOMAIN TAG ────────────────────────────────────────────────────────────────
//

/// One of the three PMP knowledge areas a question belongs to.
///
/// Serialized with the lowercase wire names used by the backend
/// (`personas`, `proceso`, `entorno`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainTag {
    /// People.
    Personas,
    /// Process.
    Proceso,
    /// Business Environment.
    Entorno,
}

impl DomainTag {
    /// All concrete domains, in display order.
    pub const ALL: [DomainTag; 3] = [DomainTag::Personas, DomainTag::Proceso, DomainTag::Entorno];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DomainTag::Personas => "personas",
            DomainTag::Proceso => "proceso",
            DomainTag::Entorno => "entorno",
        }
    }

    /// Human-readable name of the knowledge area.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DomainTag::Personas => "People",
            DomainTag::Proceso => "Process",
            DomainTag::Entorno => "Business Environment",
        }
    }

    /// Position of this tag in [`DomainTag::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            DomainTag::Personas => 0,
            DomainTag::Proceso => 1,
            DomainTag::Entorno => 2,
        }
    }
}

impl fmt::Display for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainTag {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personas" => Ok(DomainTag::Personas),
            "proceso" => Ok(DomainTag::Proceso),
            "entorno" => Ok(DomainTag::Entorno),
            _ => Err(DomainParseError { raw: s.to_string() }),
        }
    }
}

//
// ─── DOMAIN SELECTION ──────────────────────────────────────────────────────────
//

/// Domain requested by the user when asking for a question.
///
/// `Random` only ever appears in requests. It is resolved to a concrete
/// [`DomainTag`] before anything is fetched or recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainSelection {
    Concrete(DomainTag),
    Random,
}

impl DomainSelection {
    /// Wire value of the `Random` selection.
    pub const RANDOM_WIRE_NAME: &'static str = "aleatorio";

    /// Resolve to a concrete tag. `Random` is an independent uniform draw.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> DomainTag {
        match self {
            DomainSelection::Concrete(tag) => tag,
            DomainSelection::Random => DomainTag::ALL[rng.random_range(0..DomainTag::ALL.len())],
        }
    }

    #[must_use]
    pub fn is_random(self) -> bool {
        matches!(self, DomainSelection::Random)
    }
}

impl From<DomainTag> for DomainSelection {
    fn from(tag: DomainTag) -> Self {
        DomainSelection::Concrete(tag)
    }
}

impl fmt::Display for DomainSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSelection::Concrete(tag) => tag.fmt(f),
            DomainSelection::Random => f.write_str(Self::RANDOM_WIRE_NAME),
        }
    }
}

impl FromStr for DomainSelection {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aleatorio" | "random" => Ok(DomainSelection::Random),
            other => other
                .parse::<DomainTag>()
                .map(DomainSelection::Concrete)
                .map_err(|_| DomainParseError { raw: s.to_string() }),
        }
    }
}
