//! The canonical segment type.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Free-form key/value metadata attached to a segment.
pub type Tags = BTreeMap<String, String>;

/// Stable identifier of a segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    /// A fresh, never reused identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SegmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A time range on the media timeline.
///
/// Either bound may be open: a missing `start` extends to the start of the
/// timeline, a missing `end` to the end of the media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Unique segment ID
    #[serde(default = "SegmentId::generate")]
    pub id: SegmentId,
    /// Start in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// End in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Label shown in the UI and written to exports
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Option<Tags>,
    /// Index into the segment color palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_index: Option<usize>,
}

impl Segment {
    /// Create a segment with a fresh ID.
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self {
            id: SegmentId::generate(),
            start,
            end,
            name: String::new(),
            tags: None,
            color_index: None,
        }
    }

    /// Create a segment with both bounds set.
    pub fn from_range(start: f64, end: f64) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a tag. Values are stored as strings.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.tags
            .get_or_insert_with(Tags::new)
            .insert(key.into(), value.to_string());
        self
    }

    /// Replace the tags.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Start with an open bound resolved to the timeline origin.
    #[inline]
    pub fn apparent_start(&self) -> f64 {
        self.start.unwrap_or(0.0)
    }

    /// End with an open bound resolved to `duration`, or 0 when the
    /// duration is not known yet.
    #[inline]
    pub fn apparent_end(&self, duration: Option<f64>) -> f64 {
        self.end.or(duration).unwrap_or(0.0)
    }

    /// Length of the resolved range. Negative while a bound is being dragged
    /// past the other one.
    pub fn apparent_duration(&self, duration: Option<f64>) -> f64 {
        self.apparent_end(duration) - self.apparent_start()
    }

    /// True if the resolved range has positive length.
    pub fn is_valid(&self, duration: Option<f64>) -> bool {
        self.apparent_duration(duration) > 0.0
    }

    /// Look up a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }
}

/// Resolve a segment's start. See [`Segment::apparent_start`].
pub fn get_seg_apparent_start(segment: &Segment) -> f64 {
    segment.apparent_start()
}

/// Resolve a segment's end. See [`Segment::apparent_end`].
pub fn get_seg_apparent_end(segment: &Segment, duration: Option<f64>) -> f64 {
    segment.apparent_end(duration)
}

/// True if `duration` is a usable media length.
pub fn is_duration_valid(duration: Option<f64>) -> bool {
    duration.is_some_and(|d| d.is_finite() && d > 0.0)
}

/// Coerce arbitrary JSON tag values into strings.
///
/// Strings are kept as-is, numbers and booleans use their JSON text,
/// `null` becomes empty and nested values are stored as compact JSON.
pub fn coerce_tags(raw: BTreeMap<String, serde_json::Value>) -> Tags {
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}

/// Serde adapter applying [`coerce_tags`].
pub fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<Tags>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(coerce_tags))
}
