//! Unflattening of `SECTION_SUB_0_FIELD`-style keys into configuration trees.

use std::collections::BTreeMap;

use crate::error::{StrataError, StrataResult};
use crate::path::{KeyPath, Segment};
use crate::value::{Dict, Value};


/// Leaf text that parses as an explicit null. Case-sensitive.
const NULL_KEYWORD: &str = "null";

/// Mutable position inside the tree under construction.
enum Slot<'tree> {
    Map(&'tree mut Dict),
    List(&'tree mut Vec<Value>),
}

/// Parser turning flat `(key, value)` pairs into a nested [`Dict`].
///
/// Keys split on the separator and each segment names one level of the
/// output tree: a segment followed by a numeric segment opens an array, any
/// other segment opens an object, and the final segment carries the value.
/// Segments are lowercased and empty segments are discarded. Entries are
/// processed in sorted key order, so the result is independent of input
/// ordering. The leaf text `null` stores an explicit [`Value::Null`];
/// stored nulls (explicit or array gap fillers) read as absent and may be
/// overwritten by later keys.
///
/// # Examples
///
/// ```
/// use strata_config::{FlatKeyParser, Value};
///
/// let parsed = FlatKeyParser::new('_').parse([
///     ("SERVER_HOST".to_owned(), "localhost".to_owned()),
///     ("SERVER_PORTS_0".to_owned(), "80".to_owned()),
/// ])?;
/// let server = parsed.get("server");
/// assert_eq!(
///     server.and_then(|node| node.get("host")),
///     Some(&Value::from("localhost")),
/// );
/// assert_eq!(
///     server.and_then(|node| node.get("ports")),
///     Some(&Value::Array(vec![Value::from("80")])),
/// );
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FlatKeyParser {
    separator: char,
}

impl FlatKeyParser {
    /// Create a parser splitting keys on `separator`.
    #[must_use]
    pub const fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Parse flat entries into a nested tree.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::DuplicateKey`] when two entries share a raw
    /// key or assign the same leaf twice, and
    /// [`StrataError::AmbiguousStructure`] when a key addresses a position
    /// whose container kind conflicts with an earlier key.
    pub fn parse<I>(&self, entries: I) -> StrataResult<Dict>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut snapshot = BTreeMap::new();
        for (key, value) in entries {
            if snapshot.insert(key.clone(), value).is_some() {
                return Err(StrataError::DuplicateKey {
                    path: self.key_path(&key),
                    key,
                });
            }
        }

        let mut root = Dict::new();
        for (key, value) in &snapshot {
            self.apply(&mut root, key, value)?;
        }
        Ok(root)
    }

    /// Walk one key's segments, materialising containers along the way and
    /// assigning the leaf at the final segment.
    fn apply(&self, root: &mut Dict, key: &str, raw: &str) -> StrataResult<()> {
        let segments = self.segments(key);
        let Some(last) = segments.len().checked_sub(1) else {
            // A key made only of separators carries no address.
            return Ok(());
        };

        let mut trace = KeyPath::new();
        let mut cursor = Slot::Map(root);
        for (position, segment) in segments.iter().enumerate() {
            if position == last {
                return Self::assign(cursor, segment, raw, &mut trace, key);
            }
            let wants_list = segments
                .get(position + 1)
                .is_some_and(|next| next.parse::<usize>().is_ok());
            cursor = Self::descend(cursor, segment, wants_list, &mut trace, key)?;
        }
        Ok(())
    }

    /// Split a key into lowercased, non-empty segments.
    fn segments(&self, key: &str) -> Vec<String> {
        key.split(self.separator)
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    /// Best-effort path for a key that never reached the tree walk.
    fn key_path(&self, key: &str) -> KeyPath {
        self.segments(key)
            .into_iter()
            .map(|segment| match segment.parse::<usize>() {
                Ok(index) => Segment::Index(index),
                Err(_) => Segment::Key(segment),
            })
            .collect()
    }

    /// Enter the container at `segment`, creating it when the position is
    /// empty. Stored nulls read as absent and are replaced.
    fn descend<'tree>(
        cursor: Slot<'tree>,
        segment: &str,
        wants_list: bool,
        trace: &mut KeyPath,
        key: &str,
    ) -> StrataResult<Slot<'tree>> {
        match cursor {
            Slot::Map(entries) => {
                trace.push(Segment::Key(segment.to_owned()));
                let slot = entries
                    .entry(segment.to_owned())
                    .or_insert_with(|| Self::container(wants_list));
                Self::open_container(slot, wants_list, trace, key)
            }
            Slot::List(items) => {
                // List cursors only arise after the walk saw a numeric segment.
                let Ok(index) = segment.parse::<usize>() else {
                    return Err(StrataError::AmbiguousStructure {
                        key: key.to_owned(),
                        path: trace.clone(),
                    });
                };
                trace.push(Segment::Index(index));
                if items.len() <= index {
                    items.resize(index + 1, Value::Null);
                }
                match items.get_mut(index) {
                    Some(slot) => Self::open_container(slot, wants_list, trace, key),
                    // The resize above makes the position exist.
                    None => Err(StrataError::AmbiguousStructure {
                        key: key.to_owned(),
                        path: trace.clone(),
                    }),
                }
            }
        }
    }

    /// Assign the leaf value at `segment` inside `cursor`.
    fn assign(
        cursor: Slot<'_>,
        segment: &str,
        raw: &str,
        trace: &mut KeyPath,
        key: &str,
    ) -> StrataResult<()> {
        match cursor {
            Slot::Map(entries) => {
                trace.push(Segment::Key(segment.to_owned()));
                match entries.get_mut(segment) {
                    None => {
                        entries.insert(segment.to_owned(), Self::leaf(raw));
                        Ok(())
                    }
                    Some(slot) if slot.is_null() => {
                        *slot = Self::leaf(raw);
                        Ok(())
                    }
                    Some(_) => Err(StrataError::DuplicateKey {
                        key: key.to_owned(),
                        path: trace.clone(),
                    }),
                }
            }
            Slot::List(items) => {
                let Ok(index) = segment.parse::<usize>() else {
                    return Err(StrataError::AmbiguousStructure {
                        key: key.to_owned(),
                        path: trace.clone(),
                    });
                };
                trace.push(Segment::Index(index));
                if items.len() <= index {
                    items.resize(index + 1, Value::Null);
                }
                match items.get_mut(index) {
                    Some(slot) if slot.is_null() => {
                        *slot = Self::leaf(raw);
                        Ok(())
                    }
                    Some(_) => Err(StrataError::DuplicateKey {
                        key: key.to_owned(),
                        path: trace.clone(),
                    }),
                    // The resize above makes the position exist.
                    None => Err(StrataError::DuplicateKey {
                        key: key.to_owned(),
                        path: trace.clone(),
                    }),
                }
            }
        }
    }

    /// View `slot` as the wanted container kind, replacing stored nulls
    /// with a fresh container first.
    fn open_container<'tree>(
        slot: &'tree mut Value,
        wants_list: bool,
        trace: &KeyPath,
        key: &str,
    ) -> StrataResult<Slot<'tree>> {
        if slot.is_null() {
            *slot = Self::container(wants_list);
        }
        match (wants_list, slot) {
            (true, Value::Array(items)) => Ok(Slot::List(items)),
            (false, Value::Object(entries)) => Ok(Slot::Map(entries)),
            _ => Err(StrataError::AmbiguousStructure {
                key: key.to_owned(),
                path: trace.clone(),
            }),
        }
    }

    /// An empty container of the kind the next segment implies.
    const fn container(wants_list: bool) -> Value {
        if wants_list {
            Value::Array(Vec::new())
        } else {
            Value::Object(Dict::new())
        }
    }

    /// Interpret leaf text, mapping the null keyword to an explicit null.
    fn leaf(raw: &str) -> Value {
        if raw == NULL_KEYWORD {
            Value::Null
        } else {
            Value::String(raw.to_owned())
        }
    }
}
