//! Map-shaped serde support, enabled by the `serde` feature.
//!
//! Entries serialize in the map's current iteration order. Deserialization
//! builds a map with the natural key order; duplicate keys keep the last value.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::sorted_map::SortedMap;

impl<K, V, C> Serialize for SortedMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
    C: Fn(&K, &K) -> Ordering,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SortedMapVisitor<K, V> {
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'de, K, V> Visitor<'de> for SortedMapVisitor<K, V>
where
    K: Deserialize<'de> + PartialOrd,
    V: Deserialize<'de>,
{
    type Value = SortedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = SortedMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.set(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for SortedMap<K, V>
where
    K: Deserialize<'de> + PartialOrd,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SortedMapVisitor {
            marker: PhantomData,
        })
    }
}
