//! Renders IR trees back to SQL/JSON path text for diagnostics.
//!
//! Binary operators and logical connectives are always parenthesized, so the
//! output is unambiguous without tracking precedence.

use std::fmt;

use serde_json::Value;

use crate::node::{
    ArithmeticBinary, ArithmeticUnary, ArrayAccessor, ArraySelection, DescendantMemberAccessor,
    Filter, ItemMethod, Literal, MemberAccessor, MethodCall, NamedVariable, PathNode,
    WildcardMemberAccessor,
};
use crate::path::{IrJsonPath, IrRoot};
use crate::predicate::{
    Comparison, Conjunction, Disjunction, Exists, IsUnknown, LikeRegex, Negation, PredicateNode,
    StartsWith,
};
use crate::visitor::{PathVisitor, PredicateVisitor};

struct PathPrinter;

type Out<'a, 'f> = &'a mut fmt::Formatter<'f>;

fn quoted(text: &str) -> Value {
    Value::String(text.to_string())
}

impl<'n, 'a, 'f> PathVisitor<'n, Out<'a, 'f>> for PathPrinter {
    type Output = fmt::Result;

    fn visit_context_variable(&self, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("$")
    }

    fn visit_current_item(&self, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("@")
    }

    fn visit_last_index(&self, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("last")
    }

    fn visit_named_variable(&self, node: &'n NamedVariable, f: Out<'a, 'f>) -> fmt::Result {
        write!(f, "${}", node.name())
    }

    fn visit_literal(&self, node: &'n Literal, f: Out<'a, 'f>) -> fmt::Result {
        write!(f, "{}", node.value())
    }

    fn visit_member_accessor(&self, node: &'n MemberAccessor, f: Out<'a, 'f>) -> fmt::Result {
        node.base().accept(self, &mut *f)?;
        write!(f, ".{}", quoted(node.key()))
    }

    fn visit_wildcard_member_accessor(
        &self,
        node: &'n WildcardMemberAccessor,
        f: Out<'a, 'f>,
    ) -> fmt::Result {
        node.base().accept(self, &mut *f)?;
        f.write_str(".*")
    }

    fn visit_descendant_member_accessor(
        &self,
        node: &'n DescendantMemberAccessor,
        f: Out<'a, 'f>,
    ) -> fmt::Result {
        node.base().accept(self, &mut *f)?;
        write!(f, ".**.{}", quoted(node.key()))
    }

    fn visit_array_accessor(&self, node: &'n ArrayAccessor, f: Out<'a, 'f>) -> fmt::Result {
        node.base().accept(self, &mut *f)?;
        match node.selection() {
            ArraySelection::Wildcard => f.write_str("[*]"),
            ArraySelection::Subscripts(subscripts) => {
                f.write_str("[")?;
                for (i, subscript) in subscripts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    subscript.from().accept(self, &mut *f)?;
                    if let Some(to) = subscript.to() {
                        f.write_str(" to ")?;
                        to.accept(self, &mut *f)?;
                    }
                }
                f.write_str("]")
            }
        }
    }

    fn visit_filter(&self, node: &'n Filter, f: Out<'a, 'f>) -> fmt::Result {
        node.base().accept(self, &mut *f)?;
        f.write_str(" ? (")?;
        node.predicate().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_arithmetic_unary(&self, node: &'n ArithmeticUnary, f: Out<'a, 'f>) -> fmt::Result {
        write!(f, "{}(", node.operator().symbol())?;
        node.operand().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_arithmetic_binary(&self, node: &'n ArithmeticBinary, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("(")?;
        node.left().accept(self, &mut *f)?;
        write!(f, " {} ", node.operator().symbol())?;
        node.right().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_method(&self, node: &'n MethodCall, f: Out<'a, 'f>) -> fmt::Result {
        node.base().accept(self, &mut *f)?;
        match node.method() {
            ItemMethod::Datetime {
                template: Some(template),
            } => write!(f, ".datetime({})", quoted(template.source())),
            method => write!(f, ".{}()", method.name()),
        }
    }
}

impl<'n, 'a, 'f> PredicateVisitor<'n, Out<'a, 'f>> for PathPrinter {
    type Output = fmt::Result;

    fn visit_conjunction(&self, node: &'n Conjunction, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("(")?;
        node.left().accept(self, &mut *f)?;
        f.write_str(" && ")?;
        node.right().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_disjunction(&self, node: &'n Disjunction, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("(")?;
        node.left().accept(self, &mut *f)?;
        f.write_str(" || ")?;
        node.right().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_negation(&self, node: &'n Negation, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("!(")?;
        node.operand().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_comparison(&self, node: &'n Comparison, f: Out<'a, 'f>) -> fmt::Result {
        node.left().accept(self, &mut *f)?;
        write!(f, " {} ", node.operator().symbol())?;
        node.right().accept(self, &mut *f)
    }

    fn visit_exists(&self, node: &'n Exists, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("exists (")?;
        node.operand().accept(self, &mut *f)?;
        f.write_str(")")
    }

    fn visit_is_unknown(&self, node: &'n IsUnknown, f: Out<'a, 'f>) -> fmt::Result {
        f.write_str("(")?;
        node.operand().accept(self, &mut *f)?;
        f.write_str(") is unknown")
    }

    fn visit_starts_with(&self, node: &'n StartsWith, f: Out<'a, 'f>) -> fmt::Result {
        node.whole().accept(self, &mut *f)?;
        f.write_str(" starts with ")?;
        node.initial().accept(self, &mut *f)
    }

    fn visit_like_regex(&self, node: &'n LikeRegex, f: Out<'a, 'f>) -> fmt::Result {
        node.operand().accept(self, &mut *f)?;
        write!(f, " like_regex {}", quoted(node.pattern()))?;
        if let Some(flags) = node.flags() {
            write!(f, " flag {}", quoted(flags))?;
        }
        Ok(())
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&PathPrinter, f)
    }
}

impl fmt::Display for PredicateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&PathPrinter, f)
    }
}

impl fmt::Display for IrRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrRoot::Path(node) => node.fmt(f),
            IrRoot::Predicate(node) => node.fmt(f),
        }
    }
}

impl fmt::Display for IrJsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root().fmt(f)
    }
}
