use crate::error::{Error, Result};
use crate::oid::Oid;

/// a snapshot record: root tree, optional parent, message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// root tree oid
    pub tree: Oid,
    /// previous commit, `None` for a root commit
    pub parent: Option<Oid>,
    pub message: String,
}

impl Commit {
    pub fn new(tree: Oid, parent: Option<Oid>, message: impl Into<String>) -> Self {
        Self {
            tree,
            parent,
            message: message.into(),
        }
    }

    /// is this an initial commit (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// serialize to the on-disk payload
    ///
    /// `tree <oid>\n[parent <oid>\n]\n<message>\n`
    pub fn encode(&self) -> Vec<u8> {
        let mut out = format!("tree {}\n", self.tree);
        if let Some(parent) = &self.parent {
            out.push_str(&format!("parent {}\n", parent));
        }
        out.push('\n');
        out.push_str(&self.message);
        out.push('\n');
        out.into_bytes()
    }

    /// parse a commit payload read from object `oid`
    pub fn parse(oid: &Oid, payload: &[u8]) -> Result<Self> {
        let malformed = |message: String| Error::MalformedCommit { oid: *oid, message };

        let text = std::str::from_utf8(payload)
            .map_err(|e| malformed(format!("commit is not utf-8: {}", e)))?;

        let mut tree = None;
        let mut parent = None;
        let mut lines = text.split('\n');
        let mut saw_separator = false;

        for line in lines.by_ref() {
            if line.is_empty() {
                saw_separator = true;
                break;
            }

            let parts: Vec<&str> = line.split(' ').collect();
            let &[key, value] = parts.as_slice() else {
                return Err(malformed(format!("bad header line {:?}", line)));
            };

            let value = Oid::from_hex(value)
                .map_err(|_| malformed(format!("bad oid in {} header: {:?}", key, value)))?;

            let slot = match key {
                "tree" => &mut tree,
                "parent" => &mut parent,
                _ => return Err(malformed(format!("unknown header {:?}", key))),
            };
            if slot.replace(value).is_some() {
                return Err(malformed(format!("duplicate {} header", key)));
            }
        }

        if !saw_separator {
            return Err(malformed("missing blank line after headers".to_string()));
        }
        let tree = tree.ok_or_else(|| malformed("missing tree header".to_string()))?;

        let mut message = lines.collect::<Vec<_>>().join("\n");
        // drop the terminator written by encode()
        if message.ends_with('\n') {
            message.pop();
        }

        Ok(Self {
            tree,
            parent,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes([byte; 32])
    }

    #[test]
    fn test_root_commit_encoding() {
        let c = Commit::new(oid(0xaa), None, "first");
        let expected = format!("tree {}\n\nfirst\n", "aa".repeat(32));
        assert_eq!(c.encode(), expected.into_bytes());
        assert!(c.is_root());
    }

    #[test]
    fn test_child_commit_encoding() {
        let c = Commit::new(oid(0xaa), Some(oid(0xbb)), "second");
        let expected = format!(
            "tree {}\nparent {}\n\nsecond\n",
            "aa".repeat(32),
            "bb".repeat(32)
        );
        assert_eq!(c.encode(), expected.into_bytes());
        assert!(!c.is_root());
    }

    #[test]
    fn test_parse_encoded() {
        let c = Commit::new(oid(1), Some(oid(2)), "subject\n\nbody line\nmore");
        let parsed = Commit::parse(&Oid::ZERO, &c.encode()).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn test_parse_empty_message() {
        let c = Commit::new(oid(1), None, "");
        let parsed = Commit::parse(&Oid::ZERO, &c.encode()).unwrap();
        assert_eq!(parsed.message, "");
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let payload = format!("tree {}\n\nmsg", "11".repeat(32));
        let parsed = Commit::parse(&Oid::ZERO, payload.as_bytes()).unwrap();
        assert_eq!(parsed.message, "msg");
        assert_eq!(parsed.parent, None);
    }

    #[test]
    fn test_parse_malformed() {
        let t = "11".repeat(32);
        let cases = vec![
            format!("tree {} extra\n\nmsg\n", t),
            "tree\n\nmsg\n".to_string(),
            format!("tree {}\nauthor {}\n\nmsg\n", t, t),
            format!("tree {}\ntree {}\n\nmsg\n", t, t),
            format!("parent {}\n\nmsg\n", t),
            "tree nothex\n\nmsg\n".to_string(),
            format!("tree {}", t),
        ];

        for payload in cases {
            let result = Commit::parse(&Oid::ZERO, payload.as_bytes());
            assert!(
                matches!(result, Err(Error::MalformedCommit { .. })),
                "{payload:?} should be malformed"
            );
        }
    }
}
