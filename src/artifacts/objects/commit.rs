//! Commit object
//!
//! A commit links a root tree hash to an optional parent commit, with author,
//! committer and message.
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <<email>> <timestamp> <timezone>
//! committer <name> <<email>> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Lines are joined with `\n`; nothing follows the message. The `parent` line
//! is omitted for the first commit of a chain.

use crate::areas::database::ObjectStore;
use crate::artifacts::objects::hash_object::{DigestAlgorithm, hash_object};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::LazyLock;

/// A header line: a key without spaces, one space, a non-empty value
const HEADER_LINE_REGEX: &str = r"^([^ ]+) (.+)$";

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEADER_LINE_REGEX).expect("header line pattern is valid"));

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author with the current local time
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Author {
            name: name.into(),
            email: email.into(),
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Author {
            name: name.into(),
            email: email.into(),
            timestamp,
        }
    }

    /// "Name <email> timestamp timezone", as written in the commit text
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load author information from `GIT_AUTHOR_NAME`, `GIT_AUTHOR_EMAIL` and,
    /// optionally, `GIT_AUTHOR_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`)
    ///
    /// Without a date the current time is used.
    pub fn load_from_env() -> Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME")
            .map_err(|_| Error::invalid_author("GIT_AUTHOR_NAME not set"))?;
        let email = std::env::var("GIT_AUTHOR_EMAIL")
            .map_err(|_| Error::invalid_author("GIT_AUTHOR_EMAIL not set"))?;

        match std::env::var("GIT_AUTHOR_DATE") {
            Ok(date) => {
                let timestamp = DateTime::parse_from_rfc2822(&date)
                    .or_else(|_| DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z"))
                    .map_err(|e| Error::invalid_author(format!("GIT_AUTHOR_DATE {date:?}: {e}")))?;
                Ok(Author::new_with_timestamp(name, email, timestamp))
            }
            Err(_) => Ok(Author::new(name, email)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // split from the right: the name may contain spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(Error::invalid_author(format!("{value:?}")));
        }

        let offset = parse_offset(parts[0])?;
        let seconds = parts[1]
            .parse::<i64>()
            .map_err(|_| Error::invalid_author(format!("invalid timestamp {:?}", parts[1])))?;
        let name_email = parts[2];

        let email_start = name_email
            .find('<')
            .ok_or_else(|| Error::invalid_author(format!("missing '<' in {name_email:?}")))?;
        let email_end = name_email
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| Error::invalid_author(format!("missing '>' in {name_email:?}")))?;

        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::invalid_author(format!("timestamp {seconds} out of range")))?
            .with_timezone(&offset);

        Ok(Author {
            name: name_email[..email_start].trim().to_string(),
            email: name_email[email_start + 1..email_end].to_string(),
            timestamp,
        })
    }
}

/// Parse a `+hhmm` / `-hhmm` offset
fn parse_offset(zone: &str) -> Result<FixedOffset> {
    let invalid = || Error::invalid_author(format!("invalid timezone {zone:?}"));

    let (sign, digits) = match zone.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => return Err(invalid()),
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Identity and message for a commit about to be created
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct CommitData {
    pub author: Author,
    pub committer: Author,
    pub message: String,
}

/// Header lines and message of a commit text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitFields {
    pub headers: Vec<(String, String)>,
    pub message: String,
}

impl CommitFields {
    /// Value of the last header with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn tree(&self) -> Option<&str> {
        self.get("tree")
    }

    pub fn parent(&self) -> Option<&str> {
        self.get("parent")
    }
}

/// Commit object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree_oid: ObjectId,
    parent: Option<ObjectId>,
    author: Author,
    committer: Author,
    message: String,
    buffer: Bytes,
    oid: ObjectId,
}

impl Commit {
    /// Build a commit of `tree_oid` and register it in `store`
    pub fn create(
        store: &mut ObjectStore,
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        author: Author,
        committer: Author,
        message: impl Into<String>,
    ) -> Result<Self> {
        let message = message.into();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let mut commit = Commit {
            tree_oid,
            parent,
            author,
            committer,
            message,
            buffer: Bytes::new(),
            oid: ObjectId::default(),
        };
        commit.serialize(store.algorithm())?;
        store.store_object(&commit);

        Ok(commit)
    }

    /// Rebuild a commit from its text
    pub fn from_buffer(buffer: Bytes, algorithm: DigestAlgorithm) -> Result<Self> {
        let fields = Self::deserialize(&buffer)?;

        let header = |key: &str| {
            fields
                .get(key)
                .ok_or_else(|| Error::corrupt_object(format!("commit has no {key} line")))
        };

        let tree_oid = ObjectId::try_parse(header("tree")?)?;
        let parent = fields.parent().map(ObjectId::try_parse).transpose()?;
        let author = Author::try_from(header("author")?)?;
        let committer = Author::try_from(header("committer")?)?;
        let oid = hash_object(Some(&buffer), ObjectType::Commit, algorithm)?.oid;

        Ok(Commit {
            tree_oid,
            parent,
            author,
            committer,
            message: fields.message,
            buffer,
            oid,
        })
    }

    /// Split a commit text into its header lines and message
    ///
    /// The first empty line ends the headers; everything after it, blank
    /// lines included, is the message. Any other non-header
    /// line is rejected with its zero-based line number.
    pub fn deserialize(buffer: &[u8]) -> Result<CommitFields> {
        let text = std::str::from_utf8(buffer)
            .map_err(|e| Error::corrupt_object(format!("commit is not UTF-8: {e}")))?;

        let mut fields = CommitFields::default();
        let mut lines = text.split('\n').enumerate();

        for (index, line) in lines.by_ref() {
            if let Some(captures) = HEADER_LINE.captures(line) {
                fields
                    .headers
                    .push((captures[1].to_string(), captures[2].to_string()));
            } else if line.is_empty() {
                break;
            } else {
                return Err(Error::MalformedCommit {
                    line: index,
                    content: line.to_string(),
                });
            }
        }

        fields.message = lines.map(|(_, line)| line).collect::<Vec<_>>().join("\n");

        Ok(fields)
    }

    fn serialize(&mut self, algorithm: DigestAlgorithm) -> Result<()> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        self.buffer = Bytes::from(lines.join("\n"));
        self.oid = hash_object(Some(&self.buffer), ObjectType::Commit, algorithm)?.oid;

        Ok(())
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Header lines and message, read back from the stored text
    pub fn fields(&self) -> Result<CommitFields> {
        Self::deserialize(&self.buffer)
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn oid(&self) -> &ObjectId {
        &self.oid
    }

    fn stored_data(&self) -> Bytes {
        self.buffer.clone()
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }
}
