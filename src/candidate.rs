//! Candidate snapshots and reference resolution.
//!
//! The host owns the real candidate nodes; the engine only ever sees
//! [`Candidate`] descriptors snapshotted into a [`CandidateSet`] whenever
//! the host's child list changes. Resolution maps an arbitrary
//! [`Reference`] to a canonical (position, node, value) triple and is a
//! pure function of the current snapshot.

/// Stable opaque identity of a host-owned candidate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateId(pub u64);

/// One selectable/displayable panel managed by the flip container.
///
/// The engine never creates or destroys candidates; it reads them and
/// moves the "currently displayed" marker between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Host-assigned node identity.
    pub id: CandidateId,
    /// Optional display value used for value lookups.
    pub value: Option<String>,
}

impl Candidate {
    /// Candidate without a value.
    #[must_use]
    pub const fn new(id: CandidateId) -> Self {
        Self { id, value: None }
    }

    /// Candidate with a value.
    #[must_use]
    pub fn with_value(id: CandidateId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: Some(value.into()),
        }
    }
}

/// A reference to a candidate: by position, textual value, or node
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Integer slot in the current ordered set.
    Index(usize),
    /// First candidate whose value equals the string.
    Value(String),
    /// Identity lookup. A node outside the current set never resolves -
    /// outside references are not trusted.
    Node(CandidateId),
}

impl Reference {
    /// Short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Index(i) => format!("index {i}"),
            Self::Value(v) => format!("value \"{v}\""),
            Self::Node(CandidateId(id)) => format!("node {id}"),
        }
    }
}

/// Canonical (position, node, value) triple produced by resolution.
///
/// All fields are `None` when the reference did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateInfo {
    /// Resolved position in the set.
    pub position: Option<usize>,
    /// Resolved node identity.
    pub id: Option<CandidateId>,
    /// Resolved candidate value.
    pub value: Option<String>,
}

impl CandidateInfo {
    /// Whether the reference resolved to a concrete candidate.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.position.is_some()
    }
}

/// Ordered snapshot of the host's candidates.
///
/// Rebuilt whenever the host's child list changes (a structural event,
/// not a per-step concern). Insertion order defines sequential loop
/// order. Values need not be unique; value lookups return the first
/// match. That ambiguity is resolved by first-match, not "fixed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Snapshot from an ordered candidate list.
    #[must_use]
    pub const fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the snapshot holds no candidates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate at `position`, bounds-checked.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Candidate> {
        self.candidates.get(position)
    }

    /// Iterate candidates in loop order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Position of a node identity, if present in the snapshot.
    #[must_use]
    pub fn position_of(&self, id: CandidateId) -> Option<usize> {
        self.candidates.iter().position(|c| c.id == id)
    }

    /// Position of the first candidate whose value equals `value`.
    #[must_use]
    pub fn position_of_value(&self, value: &str) -> Option<usize> {
        self.candidates
            .iter()
            .position(|c| c.value.as_deref() == Some(value))
    }

    /// Resolve an arbitrary reference into a canonical triple.
    ///
    /// Pure function of the current snapshot: `None`, an unknown node, a
    /// missing value, and an out-of-range index all resolve to the empty
    /// [`CandidateInfo`].
    #[must_use]
    pub fn resolve(&self, reference: Option<&Reference>) -> CandidateInfo {
        let position = match reference {
            None => None,
            Some(Reference::Index(i)) => {
                self.candidates.get(*i).map(|_| *i)
            }
            Some(Reference::Value(v)) => self.position_of_value(v),
            Some(Reference::Node(id)) => self.position_of(*id),
        };
        self.info_at(position)
    }

    /// Canonical triple for a bare position.
    #[must_use]
    pub fn info_at(&self, position: Option<usize>) -> CandidateInfo {
        match position.and_then(|p| self.candidates.get(p).map(|c| (p, c)))
        {
            Some((p, candidate)) => CandidateInfo {
                position: Some(p),
                id: Some(candidate.id),
                value: candidate.value.clone(),
            },
            None => CandidateInfo::default(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
