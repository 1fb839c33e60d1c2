//! The sequence evaluator.
//!
//! [`EvaluationContext`] is the evaluation visitor: it carries what is fixed
//! for one call (input item, bindings, mode, limits) while the per-node
//! [`Scope`] carries what changes on the way down (current item, `last`,
//! depth). Items borrowed from the input or the tree stay borrowed; only
//! computed items are owned.

use std::borrow::Cow;

use serde_json::Value;
use sqlpath_ir::{
    ArithmeticBinary, ArithmeticUnary, ArrayAccessor, ArraySelection, DescendantMemberAccessor,
    Filter, IrError, IrJsonPath, IrRoot, Literal, MemberAccessor, MethodCall, NamedVariable,
    PathNode, PathVisitor, PredicateNode, WildcardMemberAccessor,
};

use crate::bindings::VariableBindings;
use crate::config::EvaluatorConfig;
use crate::error::{EvalResult, PathError};
use crate::item::JsonItem;
use crate::methods::apply_method;
use crate::mode::Mode;
use crate::numeric::Numeric;
use crate::truth::Truth;

/// An ordered result sequence. Duplicates are kept.
pub type Sequence<'a> = Vec<Cow<'a, Value>>;

/// Evaluation state that changes while descending the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub(crate) current: Option<&'a Value>,
    pub(crate) last: Option<i64>,
    pub(crate) depth: usize,
}

/// Evaluation state that is fixed for one call.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    input: &'a Value,
    bindings: &'a dyn VariableBindings,
    mode: Mode,
    config: EvaluatorConfig,
}

/// Evaluates IR trees under a fixed configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    fn context<'a>(
        &self,
        input: &'a Value,
        mode: Mode,
        bindings: &'a dyn VariableBindings,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            input,
            bindings,
            mode,
            config: self.config,
        }
    }

    /// Evaluates a value-producing tree, borrowing from the input and the
    /// tree wherever possible.
    pub fn evaluate_sequence_borrowed<'a>(
        &self,
        root: &'a PathNode,
        input: &'a Value,
        mode: Mode,
        bindings: &'a dyn VariableBindings,
    ) -> EvalResult<Sequence<'a>> {
        log::trace!("evaluating {} path {}", mode, root);
        let ctx = self.context(input, mode, bindings);
        ctx.eval_path(root, Scope::default())
    }

    pub fn evaluate_sequence(
        &self,
        root: &PathNode,
        input: &Value,
        mode: Mode,
        bindings: &dyn VariableBindings,
    ) -> EvalResult<Vec<Value>> {
        self.evaluate_sequence_borrowed(root, input, mode, bindings)
            .map(|items| items.into_iter().map(Cow::into_owned).collect())
    }

    pub fn evaluate_predicate(
        &self,
        root: &PredicateNode,
        input: &Value,
        mode: Mode,
        bindings: &dyn VariableBindings,
    ) -> EvalResult<Truth> {
        log::trace!("evaluating {} predicate {}", mode, root);
        let ctx = self.context(input, mode, bindings);
        ctx.eval_predicate(root, Scope::default())
    }

    /// Evaluates a validated path. A predicate root yields a single item:
    /// `true`, `false`, or `null` for UNKNOWN.
    pub fn evaluate(
        &self,
        path: &IrJsonPath,
        input: &Value,
        mode: Mode,
        bindings: &dyn VariableBindings,
    ) -> EvalResult<Vec<Value>> {
        match path.root() {
            IrRoot::Path(node) => self.evaluate_sequence(node, input, mode, bindings),
            IrRoot::Predicate(node) => self
                .evaluate_predicate(node, input, mode, bindings)
                .map(|truth| vec![truth.to_value()]),
        }
    }
}

/// Evaluates `root` against `input` with the default configuration.
pub fn evaluate_sequence(
    root: &PathNode,
    input: &Value,
    mode: Mode,
    bindings: &dyn VariableBindings,
) -> EvalResult<Vec<Value>> {
    Evaluator::default().evaluate_sequence(root, input, mode, bindings)
}

/// Evaluates the predicate `root` against `input` with the default
/// configuration.
pub fn evaluate_predicate(
    root: &PredicateNode,
    input: &Value,
    mode: Mode,
    bindings: &dyn VariableBindings,
) -> EvalResult<Truth> {
    Evaluator::default().evaluate_predicate(root, input, mode, bindings)
}

impl<'a> EvaluationContext<'a> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn enter(&self, scope: Scope<'a>) -> EvalResult<Scope<'a>> {
        let depth = scope.depth + 1;
        if depth > self.config.max_depth {
            log::debug!("depth guard tripped at {}", self.config.max_depth);
            return Err(PathError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(Scope { depth, ..scope })
    }

    pub(crate) fn eval_path(&self, node: &'a PathNode, scope: Scope<'a>) -> EvalResult<Sequence<'a>> {
        let scope = self.enter(scope)?;
        node.accept(self, scope)
    }

    pub(crate) fn eval_predicate(
        &self,
        node: &'a PredicateNode,
        scope: Scope<'a>,
    ) -> EvalResult<Truth> {
        let scope = self.enter(scope)?;
        node.accept(self, scope)
    }

    /// Lax mode sees through one level of array nesting.
    pub(crate) fn unwrap_arrays(&self, items: Sequence<'a>) -> Sequence<'a> {
        if !self.mode.is_lax() {
            return items;
        }
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Cow::Borrowed(Value::Array(elements)) => {
                    out.extend(elements.iter().map(Cow::Borrowed))
                }
                Cow::Owned(Value::Array(elements)) => {
                    out.extend(elements.into_iter().map(Cow::Owned))
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Runs `select` on every item and collects what it picks. Borrowed items
    /// yield borrowed picks; picks from computed items are cloned out. An
    /// error drops that item's picks and goes through the mode policy.
    fn flat_select<F>(&self, items: Sequence<'a>, mut select: F) -> EvalResult<Sequence<'a>>
    where
        F: for<'v> FnMut(&'v Value, &mut Vec<&'v Value>) -> EvalResult<()>,
    {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Cow::Borrowed(value) => {
                    let mut picked = Vec::new();
                    match select(value, &mut picked) {
                        Ok(()) => out.extend(picked.into_iter().map(Cow::Borrowed)),
                        Err(err) => self.mode.absorb(err)?,
                    }
                }
                Cow::Owned(value) => {
                    let mut picked = Vec::new();
                    match select(&value, &mut picked) {
                        Ok(()) => out.extend(picked.into_iter().cloned().map(Cow::Owned)),
                        Err(err) => self.mode.absorb(err)?,
                    }
                }
            }
        }
        Ok(out)
    }

    /// The predicate sees `item` as `@`. The item may be computed, so the
    /// predicate runs in a context narrowed to the item's lifetime.
    fn test_item<'b>(
        &self,
        predicate: &'b PredicateNode,
        item: &'b Value,
        scope: Scope<'_>,
    ) -> EvalResult<Truth>
    where
        'a: 'b,
    {
        let inner: EvaluationContext<'b> = *self;
        inner.eval_predicate(
            predicate,
            Scope {
                current: Some(item),
                last: scope.last,
                depth: scope.depth,
            },
        )
    }

    fn subscript_index(&self, node: &'a PathNode, scope: Scope<'a>) -> EvalResult<i64> {
        let items = self.eval_path(node, scope)?;
        match items.as_slice() {
            [item] => item
                .as_numeric()
                .ok_or_else(|| {
                    PathError::type_error(format!(
                        "array subscript is a {} item, expected a number",
                        item.item_type().as_str()
                    ))
                })?
                .to_index(),
            items => Err(PathError::type_error(format!(
                "array subscript produced {} items, expected exactly one",
                items.len()
            ))),
        }
    }

    fn select_elements<'v>(
        &self,
        item: &'v Value,
        selection: &'a ArraySelection,
        scope: Scope<'a>,
        picked: &mut Vec<&'v Value>,
    ) -> EvalResult<()> {
        let lax = self.mode.is_lax();
        let elements: &'v [Value] = match item {
            Value::Array(elements) => elements,
            other if lax => std::slice::from_ref(other),
            other => {
                return Err(PathError::structural(format!(
                    "array accessor applied to {} item",
                    other.item_type().as_str()
                )));
            }
        };
        let subscripts = match selection {
            ArraySelection::Wildcard => {
                picked.extend(elements);
                return Ok(());
            }
            ArraySelection::Subscripts(subscripts) => subscripts,
        };

        let size = elements.len() as i64;
        let inner = Scope {
            last: Some(size - 1),
            ..scope
        };
        for subscript in subscripts {
            let from = self.subscript_index(subscript.from(), inner)?;
            let Some(to) = subscript.to() else {
                if (0..size).contains(&from) {
                    picked.push(&elements[from as usize]);
                } else if !lax {
                    return Err(PathError::structural(format!(
                        "array index {} out of bounds for size {}",
                        from, size
                    )));
                }
                continue;
            };
            let to = self.subscript_index(to, inner)?;
            if lax {
                let (from, to) = (from.max(0), to.min(size - 1));
                if from <= to {
                    picked.extend(&elements[from as usize..=to as usize]);
                }
            } else if from < 0 || to >= size || from > to {
                return Err(PathError::structural(format!(
                    "array slice [{} to {}] out of bounds for size {}",
                    from, to, size
                )));
            } else {
                picked.extend(&elements[from as usize..=to as usize]);
            }
        }
        Ok(())
    }

    /// The single numeric operand of a binary arithmetic node.
    fn numeric_operand(&self, items: Sequence<'a>, side: &str) -> EvalResult<Numeric> {
        let items = self.unwrap_arrays(items);
        match items.as_slice() {
            [item] => item.as_numeric().ok_or_else(|| {
                PathError::type_error(format!(
                    "{} operand of arithmetic is a {} item",
                    side,
                    item.item_type().as_str()
                ))
            }),
            items => Err(PathError::type_error(format!(
                "{} operand of arithmetic has {} items, expected exactly one",
                side,
                items.len()
            ))),
        }
    }
}

fn descendants<'v>(item: &'v Value, key: &str, picked: &mut Vec<&'v Value>) {
    match item {
        Value::Object(members) => {
            for (name, value) in members {
                if name == key {
                    picked.push(value);
                }
                descendants(value, key, picked);
            }
        }
        Value::Array(elements) => {
            for element in elements {
                descendants(element, key, picked);
            }
        }
        _ => {}
    }
}

fn missing_scope(symbol: &'static str, message: &str) -> PathError {
    PathError::InvalidIr(IrError::scope(symbol, message))
}

impl<'a> PathVisitor<'a, Scope<'a>> for EvaluationContext<'a> {
    type Output = EvalResult<Sequence<'a>>;

    fn visit_context_variable(&self, _scope: Scope<'a>) -> Self::Output {
        Ok(vec![Cow::Borrowed(self.input)])
    }

    fn visit_current_item(&self, scope: Scope<'a>) -> Self::Output {
        scope
            .current
            .map(|item| vec![Cow::Borrowed(item)])
            .ok_or_else(|| missing_scope("@", "no current item outside a filter predicate"))
    }

    fn visit_last_index(&self, scope: Scope<'a>) -> Self::Output {
        scope
            .last
            .map(|last| vec![Cow::Owned(Value::from(last))])
            .ok_or_else(|| missing_scope("last", "no array is being subscripted"))
    }

    fn visit_named_variable(&self, node: &'a NamedVariable, _scope: Scope<'a>) -> Self::Output {
        self.bindings
            .lookup(node.name())
            .map(|value| vec![Cow::Borrowed(value)])
            .ok_or_else(|| PathError::UnboundVariable {
                name: node.name().to_string(),
            })
    }

    fn visit_literal(&self, node: &'a Literal, _scope: Scope<'a>) -> Self::Output {
        Ok(vec![Cow::Borrowed(node.value())])
    }

    fn visit_member_accessor(&self, node: &'a MemberAccessor, scope: Scope<'a>) -> Self::Output {
        let items = self.eval_path(node.base(), scope)?;
        let key = node.key();
        let lax = self.mode.is_lax();
        self.flat_select(items, |item, picked| match item {
            Value::Object(members) => {
                picked.extend(members.get(key));
                Ok(())
            }
            Value::Array(elements) if lax => {
                picked.extend(elements.iter().filter_map(|element| element.object_get(key)));
                Ok(())
            }
            other => Err(PathError::structural(format!(
                "member accessor .{} applied to {} item",
                key,
                other.item_type().as_str()
            ))),
        })
    }

    fn visit_wildcard_member_accessor(
        &self,
        node: &'a WildcardMemberAccessor,
        scope: Scope<'a>,
    ) -> Self::Output {
        let items = self.eval_path(node.base(), scope)?;
        let items = self.unwrap_arrays(items);
        self.flat_select(items, |item, picked| match item {
            Value::Object(members) => {
                picked.extend(members.values());
                Ok(())
            }
            other => Err(PathError::structural(format!(
                "wildcard member accessor applied to {} item",
                other.item_type().as_str()
            ))),
        })
    }

    fn visit_descendant_member_accessor(
        &self,
        node: &'a DescendantMemberAccessor,
        scope: Scope<'a>,
    ) -> Self::Output {
        let items = self.eval_path(node.base(), scope)?;
        let key = node.key();
        self.flat_select(items, |item, picked| {
            descendants(item, key, picked);
            Ok(())
        })
    }

    fn visit_array_accessor(&self, node: &'a ArrayAccessor, scope: Scope<'a>) -> Self::Output {
        let items = self.eval_path(node.base(), scope)?;
        let selection = node.selection();
        self.flat_select(items, |item, picked| {
            self.select_elements(item, selection, scope, picked)
        })
    }

    fn visit_filter(&self, node: &'a Filter, scope: Scope<'a>) -> Self::Output {
        let items = self.eval_path(node.base(), scope)?;
        let items = self.unwrap_arrays(items);
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if self.test_item(node.predicate(), &item, scope)?.is_true() {
                kept.push(item);
            }
        }
        Ok(kept)
    }

    fn visit_arithmetic_unary(&self, node: &'a ArithmeticUnary, scope: Scope<'a>) -> Self::Output {
        let items = self.eval_path(node.operand(), scope)?;
        let number = match self.numeric_operand(items, "unary") {
            Ok(number) => number,
            Err(err) => {
                self.mode.absorb(err)?;
                return Ok(Vec::new());
            }
        };
        let result = number.apply_unary(node.operator())?;
        Ok(vec![Cow::Owned(result.into_value()?)])
    }

    fn visit_arithmetic_binary(&self, node: &'a ArithmeticBinary, scope: Scope<'a>) -> Self::Output {
        let left = self.eval_path(node.left(), scope)?;
        let right = self.eval_path(node.right(), scope)?;
        let operands = self
            .numeric_operand(left, "left")
            .and_then(|l| Ok((l, self.numeric_operand(right, "right")?)));
        let (l, r) = match operands {
            Ok(pair) => pair,
            Err(err) => {
                self.mode.absorb(err)?;
                return Ok(Vec::new());
            }
        };
        let result = l.apply(node.operator(), r)?;
        Ok(vec![Cow::Owned(result.into_value()?)])
    }

    fn visit_method(&self, node: &'a MethodCall, scope: Scope<'a>) -> Self::Output {
        let items = self.eval_path(node.base(), scope)?;
        let method = node.method();
        let items = if method.unwraps_arrays() {
            self.unwrap_arrays(items)
        } else {
            items
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match apply_method(method, &item, self.mode) {
                Ok(values) => out.extend(values.into_iter().map(Cow::Owned)),
                Err(err) => self.mode.absorb(err)?,
            }
        }
        Ok(out)
    }
}
