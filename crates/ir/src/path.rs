//! The unit that is compiled once, shipped between processes and evaluated
//! many times.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::IrError;
use crate::node::{IrChild, PathNode};
use crate::predicate::PredicateNode;
use crate::validate::{validate_path, validate_predicate};

/// Deepest record nesting a tree may have. serde_json refuses documents
/// nested 128 levels deep, and a serialized query wraps the tree once more.
pub const MAX_NESTING: usize = 120;

const PREDICATE_TAGS: &[&str] = &[
    "conjunction",
    "disjunction",
    "negation",
    "comparison",
    "exists",
    "isUnknown",
    "startsWith",
    "likeRegex",
];

/// A path is either value-producing or, at top level, a bare predicate
/// (`$.a == 1`), whose result is a single boolean or null item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IrRoot {
    Path(PathNode),
    Predicate(PredicateNode),
}

impl From<PathNode> for IrRoot {
    fn from(node: PathNode) -> Self {
        IrRoot::Path(node)
    }
}

impl From<PredicateNode> for IrRoot {
    fn from(node: PredicateNode) -> Self {
        IrRoot::Predicate(node)
    }
}

impl<'de> Deserialize<'de> for IrRoot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Route on the tag so errors name the real problem instead of
        // "did not match any variant".
        let value = Value::deserialize(deserializer)?;
        let is_predicate = value
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|tag| PREDICATE_TAGS.contains(&tag));
        if is_predicate {
            PredicateNode::deserialize(value)
                .map(IrRoot::Predicate)
                .map_err(D::Error::custom)
        } else {
            PathNode::deserialize(value)
                .map(IrRoot::Path)
                .map_err(D::Error::custom)
        }
    }
}

impl IrRoot {
    pub fn depth(&self) -> usize {
        self.as_child().depth()
    }

    /// Object/array nesting of the tree's interchange record.
    pub fn encoded_depth(&self) -> usize {
        self.as_child().encoded_depth()
    }

    fn as_child(&self) -> IrChild<'_> {
        match self {
            IrRoot::Path(node) => IrChild::Path(node),
            IrRoot::Predicate(node) => IrChild::Predicate(node),
        }
    }
}

/// A validated IR tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IrRoot", into = "IrRoot")]
pub struct IrJsonPath {
    root: IrRoot,
}

impl IrJsonPath {
    /// Validates scoping and per-node rules, and rejects trees nested
    /// deeper than [`MAX_NESTING`] so every accepted tree can be decoded again.
    pub fn new(root: impl Into<IrRoot>) -> Result<Self, IrError> {
        let root = root.into();
        let depth = root.encoded_depth();
        if depth > MAX_NESTING {
            return Err(IrError::TooDeep {
                depth,
                limit: MAX_NESTING,
            });
        }
        match &root {
            IrRoot::Path(node) => validate_path(node)?,
            IrRoot::Predicate(node) => validate_predicate(node)?,
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &IrRoot {
        &self.root
    }

    pub fn into_root(self) -> IrRoot {
        self.root
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Encodes the tree in the interchange format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes and re-validates a tree produced by [`IrJsonPath::to_json`].
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl TryFrom<IrRoot> for IrJsonPath {
    type Error = IrError;

    fn try_from(root: IrRoot) -> Result<Self, Self::Error> {
        Self::new(root)
    }
}

impl From<IrJsonPath> for IrRoot {
    fn from(path: IrJsonPath) -> Self {
        path.root
    }
}
