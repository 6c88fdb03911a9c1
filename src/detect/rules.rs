//! The built-in detectors.
//!
//! Each detector looks at a single node and appends zero or more advisories.
//! A node whose shape a detector does not expect is skipped for that
//! detector only.

use crate::config::Config;
use crate::parser::{FunctionDef, NodeId, NodeKind, SyntaxTree};

use super::{Advisory, Rule};

/// A single stateless rule evaluated against one node.
pub trait Detector: Send + Sync {
    fn rule(&self) -> Rule;

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>);
}

pub const RANGE_LOOP_MESSAGE: &str =
    "Consider using 'enumerate' instead of 'range(len(...))' for cleaner loops.";

pub const PRINT_CALL_MESSAGE: &str =
    "Avoid using 'print' statements for debugging in production code. Consider using logging instead.";

/// Plain `def` statements. `async def` is a different statement and the
/// function rules leave it alone.
fn function_def(tree: &SyntaxTree, id: NodeId) -> Option<&FunctionDef> {
    match tree.kind(id)? {
        NodeKind::FunctionDef(func) if !func.is_async => Some(func),
        _ => None,
    }
}

/// `for i in range(...)`, not `async for`.
pub struct RangeLoop;

impl Detector for RangeLoop {
    fn rule(&self) -> Rule {
        Rule::RangeLoop
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(NodeKind::For(for_loop)) = tree.kind(id) else {
            return;
        };
        if for_loop.is_async {
            return;
        }
        let Some(NodeKind::Call(call)) = for_loop.iter.and_then(|iter| tree.kind(iter)) else {
            return;
        };
        if call.callee.as_deref() == Some("range") {
            out.push(Advisory::new(RANGE_LOOP_MESSAGE));
        }
    }
}

/// Function bodies with more statements than `max_statements`.
pub struct LongFunction {
    pub max_statements: usize,
}

impl Detector for LongFunction {
    fn rule(&self) -> Rule {
        Rule::LongFunction
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(func) = function_def(tree, id) else {
            return;
        };
        if func.body_len > self.max_statements {
            out.push(Advisory::new(format!(
                "Function '{}' is quite long. Consider refactoring.",
                func.name
            )));
        }
    }
}

/// Functions declaring more than `max_params` positional-or-keyword parameters.
pub struct TooManyParameters {
    pub max_params: usize,
}

impl Detector for TooManyParameters {
    fn rule(&self) -> Rule {
        Rule::TooManyParameters
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(func) = function_def(tree, id) else {
            return;
        };
        let count = func.positional_or_keyword().count();
        if count > self.max_params {
            out.push(Advisory::new(format!(
                "Function '{}' has {} arguments. Consider reducing the number of parameters for better readability.",
                func.name, count
            )));
        }
    }
}

/// `def f(items=[])` and friends. One advisory per offending parameter.
pub struct MutableDefault;

impl Detector for MutableDefault {
    fn rule(&self) -> Rule {
        Rule::MutableDefault
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(func) = function_def(tree, id) else {
            return;
        };
        for param in &func.params {
            let Some(default) = param.default.and_then(|d| tree.kind(d)) else {
                continue;
            };
            if default.is_mutable_literal() {
                out.push(Advisory::new(format!(
                    "Function '{}' has mutable default argument '{}'. Avoid using mutable defaults.",
                    func.name, param.name
                )));
            }
        }
    }
}

/// Block statements sitting more than `max_depth` links below the module.
pub struct DeepNesting {
    pub max_depth: usize,
}

impl DeepNesting {
    fn message(&self) -> String {
        format!(
            "Code is nested more than {} levels deep. Consider refactoring to reduce complexity.",
            self.max_depth
        )
    }
}

impl Detector for DeepNesting {
    fn rule(&self) -> Rule {
        Rule::DeepNesting
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(kind) = tree.kind(id) else {
            return;
        };
        if kind.is_nesting_block() && tree.depth(id) > self.max_depth {
            out.push(Advisory::new(self.message()));
        }
    }
}

pub struct MissingFunctionDocstring;

impl Detector for MissingFunctionDocstring {
    fn rule(&self) -> Rule {
        Rule::MissingFunctionDocstring
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(func) = function_def(tree, id) else {
            return;
        };
        if func.docstring.is_none() {
            out.push(Advisory::new(format!(
                "Function '{}' is missing a docstring. Add one to improve code documentation.",
                func.name
            )));
        }
    }
}

pub struct MissingClassDocstring;

impl Detector for MissingClassDocstring {
    fn rule(&self) -> Rule {
        Rule::MissingClassDocstring
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(NodeKind::ClassDef(class)) = tree.kind(id) else {
            return;
        };
        if class.docstring.is_none() {
            out.push(Advisory::new(format!(
                "Class '{}' is missing a docstring. Add one to improve code documentation.",
                class.name
            )));
        }
    }
}

/// Calls to the bare `print` builtin.
pub struct PrintCall;

impl Detector for PrintCall {
    fn rule(&self) -> Rule {
        Rule::PrintCall
    }

    fn check(&self, tree: &SyntaxTree, id: NodeId, out: &mut Vec<Advisory>) {
        let Some(NodeKind::Call(call)) = tree.kind(id) else {
            return;
        };
        if call.callee.as_deref() == Some("print") {
            out.push(Advisory::new(PRINT_CALL_MESSAGE));
        }
    }
}

/// Build the detector battery in registration order, skipping rules the
/// config disables.
pub fn detectors(config: &Config) -> Vec<Box<dyn Detector>> {
    let thresholds = &config.thresholds;
    Rule::ALL
        .into_iter()
        .filter(|rule| config.is_rule_enabled(*rule))
        .map(|rule| -> Box<dyn Detector> {
            match rule {
                Rule::RangeLoop => Box::new(RangeLoop),
                Rule::LongFunction => Box::new(LongFunction {
                    max_statements: thresholds.max_body_statements,
                }),
                Rule::TooManyParameters => Box::new(TooManyParameters {
                    max_params: thresholds.max_parameters,
                }),
                Rule::MutableDefault => Box::new(MutableDefault),
                Rule::DeepNesting => Box::new(DeepNesting {
                    max_depth: thresholds.max_nesting_depth,
                }),
                Rule::MissingFunctionDocstring => Box::new(MissingFunctionDocstring),
                Rule::MissingClassDocstring => Box::new(MissingClassDocstring),
                Rule::PrintCall => Box::new(PrintCall),
            }
        })
        .collect()
}
