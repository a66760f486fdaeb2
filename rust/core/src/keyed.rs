// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UUID-keyed collections serialized as plain JSON arrays.
//!
//! Registries and child sets are stored as insertion-ordered maps for O(1)
//! duplicate checks but written as arrays. On load, entries are re-keyed and
//! later duplicates are dropped.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Items that carry their own UUID key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for crate::geometry::Geometry {
    fn key(&self) -> &str {
        &self.uuid
    }
}

impl Keyed for crate::material::Material {
    fn key(&self) -> &str {
        self.uuid()
    }
}

impl Keyed for crate::object::Object3D {
    fn key(&self) -> &str {
        &self.uuid
    }
}

pub fn serialize<T, S>(items: &IndexMap<String, T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    serializer.collect_seq(items.values())
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    T: Deserialize<'de> + Keyed,
    D: Deserializer<'de>,
{
    let list = Vec::<T>::deserialize(deserializer)?;
    let mut items = IndexMap::with_capacity(list.len());
    for item in list {
        if !items.contains_key(item.key()) {
            items.insert(item.key().to_string(), item);
        }
    }
    Ok(items)
}
