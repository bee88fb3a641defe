use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::threshold::FilterMode;

// ── Identifiers ────────────────────────────────────────────────────

/// Identifier of a graph node: an rsid, a phenotype code, etc.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A genetic-population subgroup label, always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ancestry(String);

impl Ancestry {
    pub fn new(label: &str) -> Self {
        Self(label.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Column holding this ancestry's values, e.g. `beta.eur` for prefix `beta.`.
    pub fn column(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

impl std::fmt::Display for Ancestry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ancestry {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// One ancestry, or two ancestries being compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestrySelection {
    pub primary: Ancestry,
    pub secondary: Option<Ancestry>,
}

impl AncestrySelection {
    pub fn single(ancestry: Ancestry) -> Self {
        Self {
            primary: ancestry,
            secondary: None,
        }
    }

    pub fn compare(first: Ancestry, second: Ancestry) -> Self {
        Self {
            primary: first,
            secondary: Some(second),
        }
    }

    pub fn mode(&self) -> FilterMode {
        if self.secondary.is_some() {
            FilterMode::Comparison
        } else {
            FilterMode::Single
        }
    }
}

// ── Association values ─────────────────────────────────────────────

/// Sign of an association's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Direction {
    /// Sign of `beta`; zero and NaN are neutral.
    pub fn from_beta(beta: f64) -> Self {
        if beta > 0.0 {
            Self::Positive
        } else if beta < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Negative),
            0 => Some(Self::Neutral),
            1 => Some(Self::Positive),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Self::Neutral
    }
}

impl Mul for Direction {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match self.as_i8() * rhs.as_i8() {
            1 => Self::Positive,
            -1 => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.as_i8()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::from_i8(value).ok_or_else(|| format!("invalid direction {value}"))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => f.write_str("-1"),
            Self::Neutral => f.write_str("0"),
            Self::Positive => f.write_str("+1"),
        }
    }
}

/// P-value used for anything missing or unparseable: it never passes a cutoff.
pub const MISSING_PVALUE: f64 = 1.0;

/// Statistics of one association for one ancestry.
///
/// Values are normalized on construction: a missing beta is NaN and a
/// missing p-value is [`MISSING_PVALUE`], so the filter predicates exclude
/// them without any special casing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssociationStats {
    pub pvalue: f64,
    /// Signed effect size.
    pub beta: f64,
    pub direction: Direction,
}

impl AssociationStats {
    pub fn new(beta: f64, pvalue: f64) -> Self {
        let pvalue = if pvalue.is_nan() { MISSING_PVALUE } else { pvalue };
        Self {
            pvalue,
            beta,
            direction: Direction::from_beta(beta),
        }
    }

    /// Parse raw cell text, normalizing anything unusable.
    pub fn parse(beta: &str, pvalue: &str) -> Self {
        let beta = parse_number(beta).unwrap_or(f64::NAN);
        let pvalue = parse_number(pvalue).unwrap_or(MISSING_PVALUE);
        Self::new(beta, pvalue)
    }

    pub fn missing() -> Self {
        Self::new(f64::NAN, MISSING_PVALUE)
    }

    pub fn has_beta(&self) -> bool {
        !self.beta.is_nan()
    }
}

/// Parse a numeric cell; empty, `NA` and other text yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Opaque per-row/per-node columns carried through for display only.
pub type DisplayMetadata = BTreeMap<String, serde_json::Value>;

/// Convert a raw cell into a display value: numbers become JSON numbers.
pub fn display_value(raw: &str) -> serde_json::Value {
    parse_number(raw)
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| serde_json::Value::String(raw.to_string()), serde_json::Value::Number)
}

/// Display fields describing one endpoint of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointMeta {
    pub color: Option<String>,
    pub label: Option<String>,
    pub category: Option<String>,
    pub chromosome: Option<String>,
}

/// One row of association data: a source–target pair with per-ancestry stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub source: NodeId,
    pub target: NodeId,
    pub stats: BTreeMap<Ancestry, AssociationStats>,
    pub source_meta: EndpointMeta,
    pub target_meta: EndpointMeta,
    pub display: DisplayMetadata,
}

impl Record {
    /// Stats for `ancestry`; an ancestry absent from the table reads as missing.
    pub fn stats_for(&self, ancestry: &Ancestry) -> AssociationStats {
        self.stats
            .get(ancestry)
            .copied()
            .unwrap_or_else(AssociationStats::missing)
    }
}

// ── Graph types ────────────────────────────────────────────────────

/// Which side of the bipartite association graph a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    /// SNP-like entities.
    Primary,
    /// Phenotype-like entities.
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub category: Option<String>,
    pub label: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
    /// Never read by filtering code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub display: DisplayMetadata,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            category: None,
            label: None,
            size: None,
            color: None,
            display: DisplayMetadata::new(),
        }
    }

    /// Label if known, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Absolute beta; NaN when the beta is missing.
    pub weight: f64,
    pub direction: Direction,
    pub pvalue: f64,
    /// Second ancestry's p-value, set by the comparative merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvalue2: Option<f64>,
}

impl Edge {
    pub fn from_stats(source: NodeId, target: NodeId, stats: &AssociationStats) -> Self {
        Self {
            source,
            target,
            weight: stats.beta.abs(),
            direction: stats.direction,
            pvalue: stats.pvalue,
            pvalue2: None,
        }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other(&self, id: &NodeId) -> Option<&NodeId> {
        if &self.source == id {
            Some(&self.target)
        } else if &self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Nodes and edges surviving one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl DerivedGraph {
    pub fn node_ids(&self) -> HashSet<&NodeId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    /// True when every edge endpoint is in the node set.
    pub fn is_consistent(&self) -> bool {
        let ids = self.node_ids();
        self.edges
            .iter()
            .all(|e| ids.contains(&e.source) && ids.contains(&e.target))
    }
}
