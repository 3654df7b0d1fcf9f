//! Key paths locating values inside a configuration tree.

use std::fmt;

/// One step of a [`KeyPath`]: an object field or an array position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Field name inside an object.
    Key(String),
    /// Element position inside an array.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => f.write_str(name),
            Self::Index(position) => write!(f, "{position}"),
        }
    }
}

/// Location of a value inside a configuration tree.
///
/// Renders dot-joined with array positions in decimal, for example
/// `nested.items.2.name`. The empty path denotes the tree root and renders
/// as `root`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// The root path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// A new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// A new path descending into the object field `name`.
    #[must_use]
    pub fn key(&self, name: &str) -> Self {
        self.child(Segment::Key(name.to_owned()))
    }

    /// A new path descending into the array position `position`.
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        self.child(Segment::Index(position))
    }

    /// Append `segment` in place.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("root");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<Segment> for KeyPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
