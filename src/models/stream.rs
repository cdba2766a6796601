use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase of a stream relative to a reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Live,
    Upcoming,
    Ended,
    Unknown,
}

impl Status {
    /// Classifies a stream at `now`.
    ///
    /// `always_live == 1` wins over everything else; otherwise both bounds
    /// are required and the window is inclusive on both ends. Upstream sends
    /// `0` for an unset time, so zero counts as missing.
    pub fn classify(
        now: i64,
        always_live: i64,
        starts_at: Option<i64>,
        ends_at: Option<i64>,
    ) -> Self {
        if always_live == 1 {
            return Status::Live;
        }
        let is_set = |t: &i64| *t != 0;
        let (Some(start), Some(end)) = (starts_at.filter(is_set), ends_at.filter(is_set)) else {
            return Status::Unknown;
        };
        if now < start {
            Status::Upcoming
        } else if now <= end {
            Status::Live
        } else {
            Status::Ended
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Live => "live",
            Status::Upcoming => "upcoming",
            Status::Ended => "ended",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(Status::Live),
            "upcoming" => Ok(Status::Upcoming),
            "ended" => Ok(Status::Ended),
            "unknown" => Ok(Status::Unknown),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One normalized stream, as served by `/api/streams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub poster: Option<String>,
    pub uri_name: Option<String>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub always_live: i64,
    #[serde(rename = "allowpaststreams")]
    pub allow_past_streams: i64,
    pub category: String,
    pub iframe: Option<String>,
    pub status: Status,
}

/// Result of the last successful flatten. Replaced whole, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedPayload {
    pub timestamp: Option<Value>,
    pub performance: Option<Value>,
    pub items: Vec<StreamRecord>,
}
