use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    /// Display-only capacity; negative when the server overbooked.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Activities keyed by name, in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(String, Activity)>,
}

impl Catalog {
    pub fn new(entries: Vec<(String, Activity)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries
            .iter()
            .map(|(name, activity)| (name.as_str(), activity))
    }
}

#[cfg(test)]
impl Catalog {
    pub(crate) fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, activity)| activity)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of activity name to activity details")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut entries: Vec<(String, Activity)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, activity)) = access.next_entry::<String, Activity>()? {
            // Later duplicates win, keeping the position of the first.
            match entries.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = activity,
                None => entries.push((name, activity)),
            }
        }
        Ok(Catalog { entries })
    }
}
