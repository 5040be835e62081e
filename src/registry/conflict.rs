use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Stable identifier of a conflict group, assigned in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConflictId(pub(crate) u32);

impl ConflictId {
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Display for ConflictId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "conflict-{}", self.0)
    }
}

/// Whether a conflict group spans application roots.
///
/// The distinction matters operationally: a same-root group usually means
/// two resource methods collided inside one application, while a cross-root
/// group means two applications claim the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    SameRoot,
    CrossRoot,
}

impl Display for ConflictKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::SameRoot => write!(f, "same-root"),
            ConflictKind::CrossRoot => write!(f, "cross-root"),
        }
    }
}

/// One deduplicated group of overlapping route registrations.
///
/// Created at most once per connected group of overlapping templates,
/// during the single-threaded registration phase. Exactly one logical
/// warning exists per record for the registry's lifetime, however many
/// requests later hit the ambiguous path.
#[derive(Debug, Clone)]
pub struct ConflictRecord {
    id: ConflictId,
    members: BTreeSet<usize>,
    roots: BTreeSet<String>,
}

impl ConflictRecord {
    pub(crate) fn new(
        id: ConflictId,
        members: impl IntoIterator<Item = usize>,
        roots: impl IntoIterator<Item = String>,
    ) -> Self {
        ConflictRecord {
            id,
            members: members.into_iter().collect(),
            roots: roots.into_iter().collect(),
        }
    }

    pub(crate) fn absorb(&mut self, other: ConflictRecord) {
        self.members.extend(other.members);
        self.roots.extend(other.roots);
    }

    pub(crate) fn add_member(&mut self, index: usize, root: &str) {
        self.members.insert(index);
        if !self.roots.contains(root) {
            self.roots.insert(root.to_string());
        }
    }

    #[must_use]
    pub fn id(&self) -> ConflictId {
        self.id
    }

    /// Registration indices of the member routes, ascending.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Application roots represented in this group.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }

    #[must_use]
    pub fn kind(&self) -> ConflictKind {
        if self.roots.len() > 1 {
            ConflictKind::CrossRoot
        } else {
            ConflictKind::SameRoot
        }
    }
}

/// Serializable summary of every conflict group in a registry.
///
/// This is the machine-readable face of the diagnostics surface; the lint
/// binary prints it as JSON.
#[derive(Debug, Serialize)]
pub struct ConflictReport {
    pub total: usize,
    pub conflicts: Vec<ConflictEntry>,
}

/// One conflict group, rendered with human-readable route descriptors.
#[derive(Debug, Serialize)]
pub struct ConflictEntry {
    pub id: u32,
    pub kind: ConflictKind,
    pub routes: Vec<String>,
}
