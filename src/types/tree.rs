use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::types::ObjectType;

/// a directory listing - immediate children sorted by name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// create a new tree, validating and sorting entries
    pub fn new(mut entries: Vec<TreeEntry>) -> Result<Self> {
        for entry in &entries {
            validate_entry_name(&entry.name)?;
        }

        // byte-wise order keeps the encoding independent of readdir order
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        for window in entries.windows(2) {
            if window[0].name == window[1].name {
                return Err(Error::InvalidEntryName(format!(
                    "duplicate entry: {}",
                    window[0].name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// create an empty tree
    pub fn empty() -> Self {
        Self { entries: vec![] }
    }

    /// get entries slice
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// consume and return entries
    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }

    /// look up entry by name
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// serialize to the on-disk payload
    ///
    /// one `"<type> <oid> <name>"` line per entry, joined by `\n`,
    /// no trailing newline.
    pub fn encode(&self) -> Vec<u8> {
        self.entries
            .iter()
            .map(|e| format!("{} {} {}", e.kind, e.oid, e.name))
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes()
    }

    /// parse a tree payload read from object `oid`
    ///
    /// unsafe entry names fail with `PathTraversal`; anything else that
    /// does not fit the line format fails with `MalformedObject`.
    pub fn parse(oid: &Oid, payload: &[u8]) -> Result<Self> {
        let malformed = |message: String| Error::MalformedObject { oid: *oid, message };

        let text = std::str::from_utf8(payload)
            .map_err(|e| malformed(format!("tree is not utf-8: {}", e)))?;
        if text.is_empty() {
            return Ok(Self::empty());
        }

        let mut entries = Vec::new();
        for (lineno, line) in text.split('\n').enumerate() {
            let mut parts = line.splitn(3, ' ');
            let (kind, entry_oid, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(o), Some(n)) => (k, o, n),
                _ => {
                    return Err(malformed(format!(
                        "line {}: expected '<type> <oid> <name>'",
                        lineno + 1
                    )))
                }
            };

            let kind = EntryKind::from_tag(kind).ok_or_else(|| {
                malformed(format!("line {}: bad entry type {:?}", lineno + 1, kind))
            })?;
            let entry_oid = Oid::from_hex(entry_oid)
                .map_err(|_| malformed(format!("line {}: bad oid {:?}", lineno + 1, entry_oid)))?;

            validate_entry_name(name).map_err(|e| match e {
                Error::PathTraversal(_) => e,
                other => malformed(other.to_string()),
            })?;

            entries.push(TreeEntry::new(kind, entry_oid, name));
        }

        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        for window in entries.windows(2) {
            if window[0].name == window[1].name {
                return Err(malformed(format!("duplicate entry: {}", window[0].name)));
            }
        }

        Ok(Self { entries })
    }
}

/// validate an entry name
///
/// path separators of the host platform and dot segments are reported as
/// `PathTraversal` since they would let a checkout write outside its
/// target directory. `/` is rejected everywhere so trees stay portable.
pub fn validate_entry_name(name: &str) -> Result<()> {
    let has_separator = name.contains('/') || name.chars().any(std::path::is_separator);
    if has_separator || name == "." || name == ".." {
        return Err(Error::PathTraversal(name.to_string()));
    }
    if name.is_empty() {
        return Err(Error::InvalidEntryName("empty name".to_string()));
    }
    if name.contains('\n') {
        return Err(Error::InvalidEntryName(format!(
            "name contains newline: {:?}",
            name
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidEntryName(format!(
            "name contains null byte: {:?}",
            name
        )));
    }
    Ok(())
}

/// a single entry in a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub oid: Oid,
    pub name: String,
}

impl TreeEntry {
    pub fn new(kind: EntryKind, oid: Oid, name: impl Into<String>) -> Self {
        Self {
            kind,
            oid,
            name: name.into(),
        }
    }

    pub fn blob(oid: Oid, name: impl Into<String>) -> Self {
        Self::new(EntryKind::Blob, oid, name)
    }

    pub fn tree(oid: Oid, name: impl Into<String>) -> Self {
        Self::new(EntryKind::Tree, oid, name)
    }
}

/// kind of tree entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// regular file content
    Blob,
    /// subdirectory
    Tree,
}

impl EntryKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "blob" => Some(EntryKind::Blob),
            "tree" => Some(EntryKind::Tree),
            _ => None,
        }
    }

    /// object type the entry oid must resolve to
    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryKind::Blob => ObjectType::Blob,
            EntryKind::Tree => ObjectType::Tree,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.object_type().as_str())
    }
}
