//! Tag values.

use indexmap::IndexMap;

use crate::error::{NbtError, Result};

/// Type id of a tag, as written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TagType {
    type Error = NbtError;

    fn try_from(id: u8) -> Result<Self> {
        Ok(match id {
            0 => TagType::End,
            1 => TagType::Byte,
            2 => TagType::Short,
            3 => TagType::Int,
            4 => TagType::Long,
            5 => TagType::Float,
            6 => TagType::Double,
            7 => TagType::ByteArray,
            8 => TagType::String,
            9 => TagType::List,
            10 => TagType::Compound,
            11 => TagType::IntArray,
            12 => TagType::LongArray,
            other => return Err(NbtError::UnknownTag(other)),
        })
    }
}

/// A single NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Tag::Compound(value)
    }
}

impl From<List> for Tag {
    fn from(value: List) -> Self {
        Tag::List(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<Vec<i64>> for Tag {
    fn from(value: Vec<i64>) -> Self {
        Tag::LongArray(value)
    }
}

/// Homogeneous list of tags.
///
/// The element type is kept even when the list is empty, because encoders
/// disagree on what an empty list's type byte should be and re-encoding must
/// not change it.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: TagType,
    items: Vec<Tag>,
}

impl List {
    /// Empty list with the given declared element type.
    pub fn empty(element: TagType) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// Build a list from items, checking they all share one type.
    ///
    /// An empty `items` produces a list typed `End`.
    pub fn from_items(items: Vec<Tag>) -> Result<Self> {
        let element = items.first().map(Tag::tag_type).unwrap_or(TagType::End);
        if let Some(bad) = items.iter().find(|t| t.tag_type() != element) {
            return Err(NbtError::MixedList {
                expected: element,
                found: bad.tag_type(),
            });
        }
        Ok(Self { element, items })
    }

    /// List of compounds.
    pub fn of_compounds(items: impl IntoIterator<Item = Compound>) -> Self {
        Self {
            element: TagType::Compound,
            items: items.into_iter().map(Tag::Compound).collect(),
        }
    }

    pub(crate) fn from_parts(element: TagType, items: Vec<Tag>) -> Self {
        Self { element, items }
    }

    pub fn element_type(&self) -> TagType {
        self.element
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    /// Items that are compounds, in order. Non-compound items are skipped.
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.items.iter().filter_map(Tag::as_compound)
    }

    /// Append an item. Fails if it does not match the element type, unless
    /// the list is still empty, in which case the list adopts its type.
    pub fn push(&mut self, tag: Tag) -> Result<()> {
        if self.items.is_empty() {
            self.element = tag.tag_type();
        } else if tag.tag_type() != self.element {
            return Err(NbtError::MixedList {
                expected: self.element,
                found: tag.tag_type(),
            });
        }
        self.items.push(tag);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Named fields, kept in the order they were read or inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    fields: IndexMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.fields.get(key)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tag>) -> Option<Tag> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.fields.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.get(key).and_then(Tag::as_compound)
    }

    pub fn get_compound_mut(&mut self, key: &str) -> Option<&mut Compound> {
        match self.fields.get_mut(key) {
            Some(Tag::Compound(c)) => Some(c),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&List> {
        self.get(key).and_then(Tag::as_list)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Tag::as_str)
    }

    pub fn get_long_array(&self, key: &str) -> Option<&[i64]> {
        self.get(key).and_then(Tag::as_long_array)
    }
}

impl<K: Into<String>, V: Into<Tag>> FromIterator<(K, V)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A root compound together with its (usually empty) name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedCompound {
    pub name: String,
    pub root: Compound,
}

impl NamedCompound {
    pub fn new(name: impl Into<String>, root: Compound) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }
}
