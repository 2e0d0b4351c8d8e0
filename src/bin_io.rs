//! Bulk binary dumps, enabled by the `serde` feature.
//!
//! Two layouts are supported. An *object* dump is one `bincode` record holding a
//! whole collection, readable only as that collection type. An *item* dump is a
//! bare concatenation of `bincode` records, one per element, with no count or
//! header; it is read back until the input ends, into any collection that
//! implements `Extend`, so a tree set can be dumped and reloaded as a hash set.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use ::serde::Serialize;
use ::serde::de::DeserializeOwned;

use crate::error::{CollectionError, Result};

fn io_err(err: std::io::Error) -> CollectionError {
    CollectionError::io_error(err.to_string())
}

fn codec_err(err: bincode::Error) -> CollectionError {
    CollectionError::io_error(format!("bincode: {}", err))
}

/// Writes `value` as a single record.
pub fn store_object<T, W>(value: &T, mut writer: W) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    bincode::serialize_into(&mut writer, value).map_err(codec_err)?;
    writer.flush().map_err(io_err)
}

/// Reads a record written by [`store_object`].
pub fn load_object<T, R>(reader: R) -> Result<T>
where
    T: DeserializeOwned,
    R: Read,
{
    bincode::deserialize_from(reader).map_err(codec_err)
}

/// Writes every item as its own record. Returns the number of items written.
pub fn store_items<'a, T, I, W>(items: I, mut writer: W) -> Result<u64>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
    W: Write,
{
    let mut count = 0u64;
    for item in items {
        bincode::serialize_into(&mut writer, item).map_err(codec_err)?;
        count += 1;
    }
    writer.flush().map_err(io_err)?;
    Ok(count)
}

/// Reads records until the input ends, feeding them to `into`. Returns the
/// number of items read.
///
/// # Errors
/// [`CollectionError::Io`] if the input ends inside a record.
pub fn load_items_into<T, E, R>(mut reader: R, into: &mut E) -> Result<u64>
where
    T: DeserializeOwned,
    E: Extend<T>,
    R: BufRead,
{
    let mut count = 0u64;
    while !reader.fill_buf().map_err(io_err)?.is_empty() {
        let item: T = bincode::deserialize_from(&mut reader).map_err(codec_err)?;
        into.extend(std::iter::once(item));
        count += 1;
    }
    Ok(count)
}

/// Reads every record into a `Vec`.
pub fn load_items<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut items = Vec::new();
    load_items_into(reader, &mut items)?;
    Ok(items)
}

/// [`store_items`] into a newly created (or truncated) file.
pub fn store_items_to_file<'a, T, I, P>(items: I, path: P) -> Result<u64>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(io_err)?;
    let count = store_items(items, BufWriter::new(file))?;
    log::debug!("stored {} items to {}", count, path.display());
    Ok(count)
}

/// [`load_items_into`] from a file.
pub fn load_items_from_file<T, E, P>(path: P, into: &mut E) -> Result<u64>
where
    T: DeserializeOwned,
    E: Extend<T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(io_err)?;
    let count = load_items_into(BufReader::new(file), into)?;
    log::debug!("loaded {} items from {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::FrontCodedList;
    use crate::maps::OpenHashMap;
    use crate::sets::{OpenHashSet, RBTreeSet};

    #[test]
    fn test_bin_io_items_reload_into_other_collection() {
        let tree: RBTreeSet<i64> = [-3, 40, 7, 1 << 40].into_iter().collect();
        let mut buf = Vec::new();
        assert_eq!(store_items(tree.iter(), &mut buf).unwrap(), 4);
        // Fixed-width integers: 8 bytes per record and nothing else.
        assert_eq!(buf.len(), 32);

        let mut set: OpenHashSet<i64> = OpenHashSet::new();
        assert_eq!(load_items_into(&buf[..], &mut set).unwrap(), 4);
        assert_eq!(set.len(), 4);
        assert!(set.contains(&(1 << 40)));

        let back: Vec<i64> = load_items(&buf[..]).unwrap();
        assert_eq!(back, vec![-3, 7, 40, 1 << 40]);
        assert!(load_items::<i64, _>(std::io::empty()).unwrap().is_empty());
    }

    #[test]
    fn test_bin_io_object_roundtrip() {
        let mut map: OpenHashMap<String, u32> = OpenHashMap::new();
        map.insert("alpha".to_string(), 1);
        map.insert("beta".to_string(), 2);
        let mut buf = Vec::new();
        store_object(&map, &mut buf).unwrap();
        let back: OpenHashMap<String, u32> = load_object(&buf[..]).unwrap();
        assert_eq!(back, map);

        let list = FrontCodedList::<u8>::new([b"node".to_vec(), b"nodes".to_vec()], 4).unwrap();
        buf.clear();
        store_object(&list, &mut buf).unwrap();
        let back: FrontCodedList<u8> = load_object(&buf[..]).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_bin_io_truncated_input() {
        let mut buf = Vec::new();
        store_items([1u64, 2, 3].iter(), &mut buf).unwrap();
        buf.truncate(buf.len() - 3);
        let err = load_items::<u64, _>(&buf[..]).unwrap_err();
        assert_eq!(err.category(), "io");

        let err = load_object::<String, _>(&[9u8][..]).unwrap_err();
        assert!(matches!(err, CollectionError::Io { .. }));
    }

    #[test]
    fn test_bin_io_file_roundtrip() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!("prim-collections-{}.bin", std::process::id()));
        let words = vec!["x".to_string(), "yy".to_string()];
        assert_eq!(store_items_to_file(&words, &path).unwrap(), 2);
        let mut back: Vec<String> = Vec::new();
        assert_eq!(load_items_from_file(&path, &mut back).unwrap(), 2);
        assert_eq!(back, words);
        std::fs::remove_file(&path).unwrap();

        let err = load_items_from_file::<String, _, _>(&path, &mut back).unwrap_err();
        assert_eq!(err.category(), "io");
    }
}
