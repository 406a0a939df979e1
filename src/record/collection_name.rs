use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;

/// The closed set of collections known to the store.
///
/// Each variant maps to one physical table, provisioned when the database
/// initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionName {
    Notifications,
}

impl CollectionName {
    /// Every registered collection, in provisioning order.
    pub const ALL: &'static [CollectionName] = &[CollectionName::Notifications];

    /// Table name used by the storage engine.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Notifications => "notifications",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = DatabaseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| DatabaseError::InvalidCollection {
                name: name.to_string(),
            })
    }
}
