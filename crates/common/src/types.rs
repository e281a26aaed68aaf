use serde::{Deserialize, Serialize};

/// Unique identifier for an aggregate instance.
///
/// Identifiers are opaque strings chosen by the caller. The file-backed
/// event store uses them verbatim as file names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateId(String);

impl AggregateId {
    /// Creates an aggregate ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AggregateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AggregateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AggregateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AggregateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Version number for an aggregate, used for optimistic concurrency control.
///
/// A fresh aggregate is at version 0. Each applied event bumps it by one, so
/// the first persisted event carries version 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) for a new aggregate.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the first version (1) for the first event.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// The version a writer believes an aggregate has when it saves new events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedVersion {
    /// The aggregate must not have any recorded events yet.
    New,

    /// The aggregate's last recorded event must carry exactly this version.
    Exact(Version),
}

impl ExpectedVersion {
    /// The version new events are numbered from.
    ///
    /// `New` and `Exact(0)` both start numbering at 1.
    pub fn base(&self) -> Version {
        match self {
            ExpectedVersion::New => Version::initial(),
            ExpectedVersion::Exact(version) => *version,
        }
    }

    /// Returns true if this expectation matches the aggregate's current version.
    ///
    /// `current` is `None` when no events have been recorded.
    pub fn matches(&self, current: Option<Version>) -> bool {
        match current {
            None => self.base() == Version::initial(),
            Some(current) => matches!(self, ExpectedVersion::Exact(v) if *v == current),
        }
    }
}

impl From<Version> for ExpectedVersion {
    fn from(version: Version) -> Self {
        ExpectedVersion::Exact(version)
    }
}

/// Negative values (conventionally `-1`) mean "the aggregate does not exist yet".
impl From<i64> for ExpectedVersion {
    fn from(value: i64) -> Self {
        if value < 0 {
            ExpectedVersion::New
        } else {
            ExpectedVersion::Exact(Version::new(value))
        }
    }
}

impl std::fmt::Display for ExpectedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedVersion::New => write!(f, "new"),
            ExpectedVersion::Exact(version) => write!(f, "{version}"),
        }
    }
}
