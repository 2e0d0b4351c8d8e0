//! `serde` support, enabled by the `serde` feature.
//!
//! Hash maps and sets serialize as plain maps and sequences, so they interchange
//! with `HashMap`/`HashSet`. Pairs serialize as two-element tuples. A
//! [`FrontCodedList`] serializes as its ratio plus the decoded arrays and is
//! compressed again on the way in.

use core::fmt;
use core::marker::PhantomData;

use ::serde::de::{self, MapAccess, SeqAccess, Visitor};
use ::serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::Strategy;
use crate::lists::FrontCodedList;
use crate::maps::OpenHashMap;
use crate::pair::{ImmutablePair, MutablePair, Pair, SortedPair};
use crate::sets::OpenHashSet;

// Caps the preallocation requested by an untrusted size hint.
const MAX_PREALLOCATED: usize = 1 << 16;

// --- Hash map ---

impl<K: Serialize, V: Serialize, S> Serialize for OpenHashMap<K, V, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, K, V, S> Deserialize<'de> for OpenHashMap<K, V, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    S: Strategy<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor<K, V, S>(PhantomData<fn() -> (K, V, S)>);

        impl<'de, K, V, S> Visitor<'de> for MapVisitor<K, V, S>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
            S: Strategy<K> + Default,
        {
            type Value = OpenHashMap<K, V, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OpenHashMap::with_strategy(S::default());
                map.reserve(access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED));
                while let Some((k, v)) = access.next_entry()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

// --- Hash set ---

impl<K: Serialize, S> Serialize for OpenHashSet<K, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for k in self.iter() {
            seq.serialize_element(k)?;
        }
        seq.end()
    }
}

impl<'de, K, S> Deserialize<'de> for OpenHashSet<K, S>
where
    K: Deserialize<'de>,
    S: Strategy<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SetVisitor<K, S>(PhantomData<fn() -> (K, S)>);

        impl<'de, K, S> Visitor<'de> for SetVisitor<K, S>
        where
            K: Deserialize<'de>,
            S: Strategy<K> + Default,
        {
            type Value = OpenHashSet<K, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = OpenHashSet::with_strategy(S::default());
                set.reserve(access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED));
                while let Some(k) = access.next_element()? {
                    set.insert(k);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor(PhantomData))
    }
}

// --- Pairs ---

macro_rules! pair_serde {
    ($name:ident) => {
        impl<L: Serialize, R: Serialize> Serialize for $name<L, R> {
            fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
            where
                Ser: Serializer,
            {
                (self.left(), self.right()).serialize(serializer)
            }
        }

        impl<'de, L: Deserialize<'de>, R: Deserialize<'de>> Deserialize<'de> for $name<L, R> {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                <(L, R)>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

pair_serde!(ImmutablePair);
pair_serde!(MutablePair);

impl<T: Serialize> Serialize for SortedPair<T> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        (self.left(), self.right()).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for SortedPair<T> {
    /// Reorders the components if the input was not sorted.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <(T, T)>::deserialize(deserializer).map(Self::from)
    }
}

// --- Front-coded list ---

struct Arrays<'a, T>(&'a FrontCodedList<T>);

impl<T: Clone + Serialize> Serialize for Arrays<'_, T> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl<T: Clone + Serialize> Serialize for FrontCodedList<T> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut state = serializer.serialize_struct("FrontCodedList", 2)?;
        state.serialize_field("ratio", &self.ratio())?;
        state.serialize_field("arrays", &Arrays(self))?;
        state.end()
    }
}

impl<'de, T> Deserialize<'de> for FrontCodedList<T>
where
    T: Clone + PartialEq + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListVisitor<T>(PhantomData<fn() -> T>);

        impl<'de, T> Visitor<'de> for ListVisitor<T>
        where
            T: Clone + PartialEq + Deserialize<'de>,
        {
            type Value = FrontCodedList<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("FrontCodedList struct")
            }

            // Binary formats hand struct fields over as a sequence.
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let ratio: usize = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;
                let arrays: Vec<Vec<T>> = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(1, &self))?;
                FrontCodedList::new(arrays, ratio).map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut ratio: Option<usize> = None;
                let mut arrays: Option<Vec<Vec<T>>> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "ratio" => ratio = Some(map.next_value()?),
                        "arrays" => arrays = Some(map.next_value()?),
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                let ratio = ratio.ok_or_else(|| <A::Error as de::Error>::missing_field("ratio"))?;
                let arrays = arrays.ok_or_else(|| <A::Error as de::Error>::missing_field("arrays"))?;
                FrontCodedList::new(arrays, ratio).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_struct(
            "FrontCodedList",
            &["ratio", "arrays"],
            ListVisitor(PhantomData),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::FloatBitsStrategy;
    use crate::CollectionError;

    #[test]
    fn test_serde_map_roundtrip_as_json_object() {
        let mut map: OpenHashMap<String, i32> = OpenHashMap::new();
        map.insert("one".to_string(), 1);
        map.insert("two".to_string(), 2);
        let json = serde_json::to_string(&map).unwrap();
        let std_map: std::collections::HashMap<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(std_map.len(), 2);
        assert_eq!(std_map["two"], 2);

        let back: OpenHashMap<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_serde_set_with_float_strategy() {
        let set: OpenHashSet<f64, FloatBitsStrategy> = [1.5, -0.0, 0.0].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        let back: OpenHashSet<f64, FloatBitsStrategy> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 3);
        assert!(back.contains(&-0.0));
    }

    #[test]
    fn test_serde_pairs_as_tuples() {
        let p = ImmutablePair::of(3, "x".to_string());
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"[3,"x"]"#);
        let m: MutablePair<i32, String> = serde_json::from_str(r#"[4,"y"]"#).unwrap();
        assert_eq!(m.into_inner(), (4, "y".to_string()));
        let s: SortedPair<i32> = serde_json::from_str("[9,2]").unwrap();
        assert_eq!(s, SortedPair::of(2, 9));
    }

    #[test]
    fn test_serde_front_coded_list() {
        let list = FrontCodedList::<u8>::new([b"abc".to_vec(), b"abd".to_vec(), b"b".to_vec()], 2)
            .unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"{"ratio":2,"arrays":[[97,98,99],[97,98,100],[98]]}"#);
        let back: FrontCodedList<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
        assert_eq!(back.ratio(), 2);

        let bad = serde_json::from_str::<FrontCodedList<u8>>(r#"{"ratio":0,"arrays":[]}"#);
        let msg = bad.unwrap_err().to_string();
        assert!(msg.contains(&CollectionError::invalid_ratio(0).to_string()));
    }
}
