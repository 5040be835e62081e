//! Media type parsing and matching.
//!
//! Route registrations declare the media types they produce; incoming
//! requests carry the media types they accept. Matching is wildcard-aware
//! (`*/*` and `type/*`) and ranked, so the resolver can prefer an exact
//! produced type over one that only matched through a wildcard.
//!
//! Parameters after `;` (e.g. `charset=utf-8`) are ignored; quality factors
//! and charset negotiation belong to the transport layer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error produced when parsing a media type string.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MediaTypeError {
    /// Input was not of the `type/subtype` form.
    #[error("invalid media type '{0}': expected type/subtype")]
    InvalidFormat(String),

    /// A wildcard type must carry a wildcard subtype (`*/*`, never `*/json`).
    #[error("invalid media type '{0}': wildcard type requires wildcard subtype")]
    WildcardType(String),
}

/// An HTTP media type: a `type/subtype` pair, possibly wildcarded.
///
/// Both halves are stored lowercased; media types compare
/// case-insensitively per RFC 9110.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    ty: String,
    subtype: String,
}

impl MediaType {
    /// The full wildcard `*/*`, which matches any media type.
    #[must_use]
    pub fn wildcard() -> Self {
        MediaType {
            ty: "*".to_string(),
            subtype: "*".to_string(),
        }
    }

    /// The primary type (e.g. `text` in `text/plain`).
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The subtype (e.g. `plain` in `text/plain`).
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// True for `*/*`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.ty == "*"
    }

    /// True for `type/*` with a concrete primary type.
    #[must_use]
    pub fn is_subtype_wildcard(&self) -> bool {
        self.subtype == "*" && self.ty != "*"
    }

    /// True when neither half is a wildcard.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.ty != "*" && self.subtype != "*"
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ty, self.subtype)
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Drop parameters: "text/plain; charset=utf-8" -> "text/plain"
        let essence = s.split(';').next().unwrap_or("").trim();
        let (ty, subtype) = essence
            .split_once('/')
            .ok_or_else(|| MediaTypeError::InvalidFormat(s.to_string()))?;
        let ty = ty.trim().to_ascii_lowercase();
        let subtype = subtype.trim().to_ascii_lowercase();
        if ty.is_empty() || subtype.is_empty() {
            return Err(MediaTypeError::InvalidFormat(s.to_string()));
        }
        if ty == "*" && subtype != "*" {
            return Err(MediaTypeError::WildcardType(s.to_string()));
        }
        Ok(MediaType { ty, subtype })
    }
}

impl Serialize for MediaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<MediaType>().map_err(serde::de::Error::custom)
    }
}

/// How closely an accepted media type matched a produced one.
///
/// Ordering matters: `Exact > SubtypeWildcard > Wildcard`. The resolver
/// uses this as its second tie-break, after static segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchQuality {
    /// Matched only through `*/*` on either side.
    Wildcard,
    /// Primary types equal, one subtype was `*`.
    SubtypeWildcard,
    /// Both concrete and equal.
    Exact,
}

/// Match one accepted media type against one produced media type.
///
/// Returns `None` when they cannot serve each other.
#[must_use]
pub fn quality(accepted: &MediaType, produced: &MediaType) -> Option<MatchQuality> {
    if accepted.is_wildcard() || produced.is_wildcard() {
        return Some(MatchQuality::Wildcard);
    }
    if accepted.ty != produced.ty {
        return None;
    }
    if accepted.subtype == "*" || produced.subtype == "*" {
        return Some(MatchQuality::SubtypeWildcard);
    }
    if accepted.subtype == produced.subtype {
        return Some(MatchQuality::Exact);
    }
    None
}

/// Best match quality between a produced set and an accepted set.
///
/// An empty accepted list behaves as `*/*`: clients that state no
/// preference can be served anything.
#[must_use]
pub fn best_quality(produces: &[MediaType], accepted: &[MediaType]) -> Option<MatchQuality> {
    if accepted.is_empty() {
        return if produces.is_empty() {
            None
        } else {
            Some(MatchQuality::Wildcard)
        };
    }
    let mut best: Option<MatchQuality> = None;
    for a in accepted {
        for p in produces {
            if let Some(q) = quality(a, p) {
                if best.map_or(true, |b| q > b) {
                    best = Some(q);
                }
            }
        }
    }
    best
}

/// Whether two produced sets can serve at least one common media type.
///
/// Used during registration to decide if two routes on the same path can
/// ever answer the same request.
#[must_use]
pub fn sets_intersect(a: &[MediaType], b: &[MediaType]) -> bool {
    a.iter().any(|x| b.iter().any(|y| quality(x, y).is_some()))
}
