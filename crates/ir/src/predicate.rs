//! Predicate IR nodes, evaluated under three-valued logic.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::node::{IrChild, PathNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PredicateNode {
    Conjunction(Conjunction),
    Disjunction(Disjunction),
    Negation(Negation),
    Comparison(Comparison),
    Exists(Exists),
    IsUnknown(IsUnknown),
    StartsWith(StartsWith),
    LikeRegex(LikeRegex),
}

/// `left && right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conjunction {
    left: Box<PredicateNode>,
    right: Box<PredicateNode>,
}

impl Conjunction {
    pub fn left(&self) -> &PredicateNode {
        &self.left
    }

    pub fn right(&self) -> &PredicateNode {
        &self.right
    }
}

/// `left || right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disjunction {
    left: Box<PredicateNode>,
    right: Box<PredicateNode>,
}

impl Disjunction {
    pub fn left(&self) -> &PredicateNode {
        &self.left
    }

    pub fn right(&self) -> &PredicateNode {
        &self.right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Negation {
    operand: Box<PredicateNode>,
}

impl Negation {
    pub fn operand(&self) -> &PredicateNode {
        &self.operand
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl ComparisonOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    operator: ComparisonOperator,
    left: Box<PathNode>,
    right: Box<PathNode>,
}

impl Comparison {
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn left(&self) -> &PathNode {
        &self.left
    }

    pub fn right(&self) -> &PathNode {
        &self.right
    }
}

/// `exists(operand)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exists {
    operand: Box<PathNode>,
}

impl Exists {
    pub fn operand(&self) -> &PathNode {
        &self.operand
    }
}

/// `(operand) is unknown`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsUnknown {
    operand: Box<PredicateNode>,
}

impl IsUnknown {
    pub fn operand(&self) -> &PredicateNode {
        &self.operand
    }
}

/// `whole starts with initial`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartsWith {
    whole: Box<PathNode>,
    initial: Box<PathNode>,
}

impl StartsWith {
    pub fn whole(&self) -> &PathNode {
        &self.whole
    }

    pub fn initial(&self) -> &PathNode {
        &self.initial
    }
}

/// `operand like_regex "pattern" flag "flags"`.
///
/// The pattern is compiled when the node is built, so a malformed pattern
/// surfaces once at construction rather than on every evaluated row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LikeRegexRecord", into = "LikeRegexRecord")]
pub struct LikeRegex {
    operand: Box<PathNode>,
    pattern: String,
    flags: Option<String>,
    regex: Regex,
}

#[derive(Serialize, Deserialize)]
struct LikeRegexRecord {
    operand: Box<PathNode>,
    pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<String>,
}

impl LikeRegex {
    pub fn new(
        operand: PathNode,
        pattern: impl Into<String>,
        flags: Option<&str>,
    ) -> Result<Self, IrError> {
        let pattern = pattern.into();
        let regex = compile_regex(&pattern, flags)?;
        Ok(Self {
            operand: Box::new(operand),
            pattern,
            flags: flags.map(str::to_string),
            regex,
        })
    }

    pub fn operand(&self) -> &PathNode {
        &self.operand
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for LikeRegex {
    fn eq(&self, other: &Self) -> bool {
        self.operand == other.operand && self.pattern == other.pattern && self.flags == other.flags
    }
}

impl TryFrom<LikeRegexRecord> for LikeRegex {
    type Error = IrError;

    fn try_from(record: LikeRegexRecord) -> Result<Self, Self::Error> {
        let regex = compile_regex(&record.pattern, record.flags.as_deref())?;
        Ok(Self {
            operand: record.operand,
            pattern: record.pattern,
            flags: record.flags,
            regex,
        })
    }
}

impl From<LikeRegex> for LikeRegexRecord {
    fn from(node: LikeRegex) -> Self {
        Self {
            operand: node.operand,
            pattern: node.pattern,
            flags: node.flags,
        }
    }
}

fn compile_regex(pattern: &str, flags: Option<&str>) -> Result<Regex, IrError> {
    let flags = flags.unwrap_or("");
    let literal = flags.contains('q');
    let source = if literal {
        regex::escape(pattern)
    } else {
        pattern.to_string()
    };

    let mut builder = RegexBuilder::new(&source);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'q' => {}
            other => {
                return Err(IrError::InvalidRegex {
                    pattern: pattern.to_string(),
                    message: format!("unsupported flag '{}'", other),
                });
            }
        }
    }

    builder.build().map_err(|e| {
        log::debug!("Rejected like_regex pattern '{}': {}", pattern, e);
        IrError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        }
    })
}

// --- Construction API ---

impl PredicateNode {
    pub fn and(left: PredicateNode, right: PredicateNode) -> Self {
        PredicateNode::Conjunction(Conjunction {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn or(left: PredicateNode, right: PredicateNode) -> Self {
        PredicateNode::Disjunction(Disjunction {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: PredicateNode) -> Self {
        PredicateNode::Negation(Negation {
            operand: Box::new(operand),
        })
    }

    pub fn compare(operator: ComparisonOperator, left: PathNode, right: PathNode) -> Self {
        PredicateNode::Comparison(Comparison {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn exists(operand: PathNode) -> Self {
        PredicateNode::Exists(Exists {
            operand: Box::new(operand),
        })
    }

    pub fn is_unknown(operand: PredicateNode) -> Self {
        PredicateNode::IsUnknown(IsUnknown {
            operand: Box::new(operand),
        })
    }

    pub fn starts_with(whole: PathNode, initial: PathNode) -> Self {
        PredicateNode::StartsWith(StartsWith {
            whole: Box::new(whole),
            initial: Box::new(initial),
        })
    }

    pub fn like_regex(
        operand: PathNode,
        pattern: impl Into<String>,
        flags: Option<&str>,
    ) -> Result<Self, IrError> {
        LikeRegex::new(operand, pattern, flags).map(PredicateNode::LikeRegex)
    }

    pub fn children(&self) -> Vec<IrChild<'_>> {
        match self {
            PredicateNode::Conjunction(node) => vec![
                IrChild::Predicate(&node.left),
                IrChild::Predicate(&node.right),
            ],
            PredicateNode::Disjunction(node) => vec![
                IrChild::Predicate(&node.left),
                IrChild::Predicate(&node.right),
            ],
            PredicateNode::Negation(node) => vec![IrChild::Predicate(&node.operand)],
            PredicateNode::Comparison(node) => {
                vec![IrChild::Path(&node.left), IrChild::Path(&node.right)]
            }
            PredicateNode::Exists(node) => vec![IrChild::Path(&node.operand)],
            PredicateNode::IsUnknown(node) => vec![IrChild::Predicate(&node.operand)],
            PredicateNode::StartsWith(node) => {
                vec![IrChild::Path(&node.whole), IrChild::Path(&node.initial)]
            }
            PredicateNode::LikeRegex(node) => vec![IrChild::Path(&node.operand)],
        }
    }

    pub fn depth(&self) -> usize {
        IrChild::Predicate(self).depth()
    }
}
