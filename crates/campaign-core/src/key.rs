//! Actor identity used to merge repeated death notifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Separator between the components of an [`ActorKey`] in its text form.
pub const KEY_SEPARATOR: char = '|';

/// One of the two opposing sides in a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Red,
    Blue,
}

impl Faction {
    /// Map the host's army index (1 = Red, 2 = Blue).
    pub fn from_army(army: i32) -> Option<Self> {
        match army {
            1 => Some(Self::Red),
            2 => Some(Self::Blue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Faction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Red" => Ok(Self::Red),
            "Blue" => Ok(Self::Blue),
            other => Err(CoreError::UnknownFaction(other.to_string())),
        }
    }
}

/// Coarse actor category. Only these two kinds take part in campaign scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorKind {
    Airborne,
    Ground,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Airborne => "Airborne",
            Self::Ground => "Ground",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Airborne" => Ok(Self::Airborne),
            "Ground" => Ok(Self::Ground),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}

/// Deterministic composite identity of an actor.
///
/// Two actors with the same faction, kind, short name and internal type
/// name produce equal keys. The text form is
/// `"<faction>|<kind>|<short_name>|<internal_type_name>"`, which is also the
/// serialized form handed to the scoring core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorKey {
    faction: Faction,
    kind: ActorKind,
    short_name: String,
    internal_type_name: String,
}

impl ActorKey {
    /// Build a key, rejecting components that contain [`KEY_SEPARATOR`].
    pub fn new(
        faction: Faction,
        kind: ActorKind,
        short_name: impl Into<String>,
        internal_type_name: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let short_name = short_name.into();
        let internal_type_name = internal_type_name.into();
        check_component("short_name", &short_name)?;
        check_component("internal_type_name", &internal_type_name)?;

        Ok(Self {
            faction,
            kind,
            short_name,
            internal_type_name,
        })
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn internal_type_name(&self) -> &str {
        &self.internal_type_name
    }
}

fn check_component(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.contains(KEY_SEPARATOR) {
        return Err(CoreError::KeySeparator {
            field,
            value: value.to_string(),
            separator: KEY_SEPARATOR,
        });
    }
    Ok(())
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.faction,
            self.kind,
            self.short_name,
            self.internal_type_name,
            sep = KEY_SEPARATOR
        )
    }
}

impl FromStr for ActorKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        let [faction, kind, short_name, internal_type_name] = parts.as_slice() else {
            return Err(CoreError::MalformedKey(s.to_string()));
        };

        Self::new(
            faction.parse()?,
            kind.parse()?,
            *short_name,
            *internal_type_name,
        )
    }
}

impl From<ActorKey> for String {
    fn from(key: ActorKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ActorKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
