//! Tree builder: tree-sitter concrete tree to `SyntaxTree` arena.
//!
//! The lowering is a single pre-order pass. Every node is pushed with its
//! parent index already known, so the arena is complete before any detector
//! asks for ancestry.

use std::collections::HashMap;

use tracing::debug;
use tree_sitter::{Node as TsNode, Parser};

use super::validate;
use super::{
    Call, ClassDef, ForLoop, FunctionDef, Node, NodeId, NodeKind, ParamKind, Parameter,
    SyntaxTree,
};
use crate::error::AnalyzeError;

/// Deepest concrete tree the builder will descend into. Bracket and indent
/// limits are enforced separately; this bounds the recursion.
const MAX_TREE_DEPTH: usize = 600;

/// Grammar nodes that carry no meaning of their own; their children attach
/// to the enclosing node.
const TRANSPARENT_KINDS: &[&str] = &[
    "block",
    "else_clause",
    "finally_clause",
    "argument_list",
    "parenthesized_expression",
    "pair",
    "decorator",
    "with_clause",
    "type",
    "as_pattern",
];

/// Extras and markers that never become nodes.
const DROPPED_KINDS: &[&str] = &[
    "comment",
    "line_continuation",
    "keyword_separator",
    "positional_separator",
];

/// Python 2 statements the grammar still accepts.
const LEGACY_KINDS: &[&str] = &["print_statement", "exec_statement"];

/// Parse a Python snippet into a `SyntaxTree`.
///
/// Fails with `AnalyzeError::SyntaxInvalid` when the source is not valid
/// Python 3.
pub fn parse(source: &str) -> Result<SyntaxTree, AnalyzeError> {
    if source.contains('\0') {
        return Err(reject("source contains a NUL byte"));
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| AnalyzeError::ParserUnavailable(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| reject("parser returned no tree"))?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(reject("tree contains error or missing nodes"));
    }
    validate::check(root, source.as_bytes()).map_err(reject)?;

    let mut builder = Builder::new(source.as_bytes());
    let module = builder.push(NodeKind::Module, None, root);
    builder.lower_children(root, module, 1)?;

    debug!(nodes = builder.nodes.len(), "built syntax tree");
    Ok(SyntaxTree::from_nodes(builder.nodes))
}

fn reject(reason: &str) -> AnalyzeError {
    debug!(reason, "rejecting snippet");
    AnalyzeError::SyntaxInvalid
}

fn named_children<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !DROPPED_KINDS.contains(&c.kind()))
        .collect()
}

/// Whether `node` has an anonymous `token` child (`async`).
fn has_token(node: TsNode, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

/// Strip any number of enclosing parentheses.
fn unwrap_parens(mut node: TsNode) -> TsNode {
    while node.kind() == "parenthesized_expression" {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

struct Builder<'src> {
    source: &'src [u8],
    nodes: Vec<Node>,
    /// tree-sitter node id -> arena id, for attributes that point at children.
    lowered: HashMap<usize, NodeId>,
}

impl<'src> Builder<'src> {
    fn new(source: &'src [u8]) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            lowered: HashMap::new(),
        }
    }

    fn text(&self, node: TsNode) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    fn field_text(&self, node: TsNode, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n))
            .unwrap_or_default()
    }

    fn lowered_id(&self, node: TsNode) -> Option<NodeId> {
        self.lowered.get(&node.id()).copied()
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>, ts: TsNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            line: ts.start_position().row + 1,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.lowered.insert(ts.id(), id);
        id
    }

    fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    fn lower_children(
        &mut self,
        ts: TsNode,
        parent: NodeId,
        depth: usize,
    ) -> Result<(), AnalyzeError> {
        for child in named_children(ts) {
            self.lower(child, parent, depth + 1)?;
        }
        Ok(())
    }

    /// Lower one concrete node under `parent`. Returns the arena id when the
    /// node produced one (transparent nodes do not).
    fn lower(
        &mut self,
        ts: TsNode,
        parent: NodeId,
        depth: usize,
    ) -> Result<Option<NodeId>, AnalyzeError> {
        if depth > MAX_TREE_DEPTH {
            return Err(reject("nesting exceeds the builder's depth limit"));
        }

        let kind = ts.kind();
        if DROPPED_KINDS.contains(&kind) {
            return Ok(None);
        }
        if LEGACY_KINDS.contains(&kind) {
            return Err(reject("python 2 statement"));
        }
        if TRANSPARENT_KINDS.contains(&kind) || self.wraps_assignment(ts) {
            self.lower_children(ts, parent, depth)?;
            return Ok(None);
        }

        match kind {
            "decorated_definition" => self.lower_decorated(ts, parent, depth),
            "if_statement" => self.lower_if(ts, parent, depth).map(Some),
            "function_definition" => self.lower_function(ts, parent, depth).map(Some),
            "class_definition" => self.lower_class(ts, parent, depth).map(Some),
            "for_statement" => self.lower_for(ts, parent, depth).map(Some),
            "call" => self.lower_call(ts, parent, depth).map(Some),
            _ => {
                let id = self.push(statement_kind(ts), Some(parent), ts);
                self.lower_children(ts, id, depth)?;
                Ok(Some(id))
            }
        }
    }

    /// `x = 1` is an assignment statement, not an expression statement.
    fn wraps_assignment(&self, ts: TsNode) -> bool {
        if ts.kind() != "expression_statement" {
            return false;
        }
        let children = named_children(ts);
        children.len() == 1
            && matches!(
                children[0].kind(),
                "assignment" | "augmented_assignment"
            )
    }

    fn lower_decorated(
        &mut self,
        ts: TsNode,
        parent: NodeId,
        depth: usize,
    ) -> Result<Option<NodeId>, AnalyzeError> {
        let Some(definition) = ts.child_by_field_name("definition") else {
            self.lower_children(ts, parent, depth)?;
            return Ok(None);
        };

        let def_id = self.lower(definition, parent, depth + 1)?;
        let target = def_id.unwrap_or(parent);
        for decorator in named_children(ts)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
        {
            self.lower_children(decorator, target, depth + 1)?;
        }
        Ok(def_id)
    }

    /// `elif` branches nest under the previous branch; `else` bodies attach
    /// to the last branch.
    fn lower_if(&mut self, ts: TsNode, parent: NodeId, depth: usize) -> Result<NodeId, AnalyzeError> {
        let if_id = self.push(NodeKind::If, Some(parent), ts);
        let mut branch = if_id;
        let mut branch_depth = depth;

        for child in named_children(ts) {
            match child.kind() {
                "elif_clause" => {
                    branch_depth += 1;
                    if branch_depth > MAX_TREE_DEPTH {
                        return Err(reject("nesting exceeds the builder's depth limit"));
                    }
                    let elif_id = self.push(NodeKind::If, Some(branch), child);
                    self.lower_children(child, elif_id, branch_depth)?;
                    branch = elif_id;
                }
                "else_clause" => self.lower_children(child, branch, branch_depth)?,
                _ => {
                    self.lower(child, branch, branch_depth + 1)?;
                }
            }
        }
        Ok(if_id)
    }

    fn lower_function(
        &mut self,
        ts: TsNode,
        parent: NodeId,
        depth: usize,
    ) -> Result<NodeId, AnalyzeError> {
        let id = self.push(NodeKind::Other("function_definition"), Some(parent), ts);

        let mut params = Vec::new();
        for child in named_children(ts) {
            if child.kind() == "parameters" {
                params = self.lower_parameters(child, id, depth + 1)?;
            } else {
                self.lower(child, id, depth + 1)?;
            }
        }

        let (body_len, docstring) = match ts.child_by_field_name("body") {
            Some(body) => (statement_count(body), self.docstring(body)),
            None => (0, None),
        };

        self.set_kind(
            id,
            NodeKind::FunctionDef(FunctionDef {
                name: self.field_text(ts, "name"),
                is_async: has_token(ts, "async"),
                params,
                body_len,
                docstring,
            }),
        );
        Ok(id)
    }

    fn lower_parameters(
        &mut self,
        ts: TsNode,
        func: NodeId,
        depth: usize,
    ) -> Result<Vec<Parameter>, AnalyzeError> {
        let args_id = self.push(NodeKind::Other("parameters"), Some(func), ts);
        let mut params: Vec<Parameter> = Vec::new();
        let mut keyword_only = false;

        let mut cursor = ts.walk();
        let markers: Vec<TsNode> = ts.named_children(&mut cursor).collect();
        for child in markers {
            match child.kind() {
                "positional_separator" => {
                    for p in params
                        .iter_mut()
                        .filter(|p| p.kind == ParamKind::PositionalOrKeyword)
                    {
                        p.kind = ParamKind::PositionalOnly;
                    }
                    continue;
                }
                "keyword_separator" => {
                    keyword_only = true;
                    continue;
                }
                _ => {}
            }

            self.lower(child, args_id, depth + 1)?;
            let Some(param) = self.parameter(child, keyword_only) else {
                continue;
            };

            if param.kind == ParamKind::VarPositional {
                keyword_only = true;
            }
            params.push(param);
        }
        Ok(params)
    }

    fn parameter(&self, ts: TsNode, keyword_only: bool) -> Option<Parameter> {
        let plain = if keyword_only {
            ParamKind::KeywordOnly
        } else {
            ParamKind::PositionalOrKeyword
        };

        match ts.kind() {
            "identifier" => Some(Parameter {
                name: self.text(ts),
                kind: plain,
                default: None,
            }),
            "typed_parameter" => {
                let inner = named_children(ts).into_iter().next()?;
                match inner.kind() {
                    "identifier" => Some(Parameter {
                        name: self.text(inner),
                        kind: plain,
                        default: None,
                    }),
                    "list_splat_pattern" | "dictionary_splat_pattern" => self.splat(inner),
                    _ => None,
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = self.text(ts.child_by_field_name("name")?);
                let default = ts
                    .child_by_field_name("value")
                    .and_then(|v| self.lowered_id(unwrap_parens(v)));
                Some(Parameter {
                    name,
                    kind: plain,
                    default,
                })
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => self.splat(ts),
            _ => None,
        }
    }

    fn splat(&self, ts: TsNode) -> Option<Parameter> {
        let kind = if ts.kind() == "list_splat_pattern" {
            ParamKind::VarPositional
        } else {
            ParamKind::VarKeyword
        };
        let name = named_children(ts).into_iter().next()?;
        Some(Parameter {
            name: self.text(name),
            kind,
            default: None,
        })
    }

    fn lower_class(&mut self, ts: TsNode, parent: NodeId, depth: usize) -> Result<NodeId, AnalyzeError> {
        let id = self.push(NodeKind::Other("class_definition"), Some(parent), ts);
        self.lower_children(ts, id, depth)?;

        let docstring = ts
            .child_by_field_name("body")
            .and_then(|body| self.docstring(body));
        self.set_kind(
            id,
            NodeKind::ClassDef(ClassDef {
                name: self.field_text(ts, "name"),
                docstring,
            }),
        );
        Ok(id)
    }

    fn lower_for(&mut self, ts: TsNode, parent: NodeId, depth: usize) -> Result<NodeId, AnalyzeError> {
        let id = self.push(NodeKind::Other("for_statement"), Some(parent), ts);
        self.lower_children(ts, id, depth)?;

        let iter = ts
            .child_by_field_name("right")
            .and_then(|right| self.lowered_id(unwrap_parens(right)));
        self.set_kind(
            id,
            NodeKind::For(ForLoop {
                iter,
                is_async: has_token(ts, "async"),
            }),
        );
        Ok(id)
    }

    fn lower_call(&mut self, ts: TsNode, parent: NodeId, depth: usize) -> Result<NodeId, AnalyzeError> {
        let id = self.push(NodeKind::Other("call"), Some(parent), ts);
        self.lower_children(ts, id, depth)?;

        let callee = ts
            .child_by_field_name("function")
            .map(unwrap_parens)
            .filter(|f| f.kind() == "identifier")
            .map(|f| self.text(f));
        self.set_kind(id, NodeKind::Call(Call { callee }));
        Ok(id)
    }

    /// Text of the docstring opening `body`, if there is one.
    fn docstring(&self, body: TsNode) -> Option<String> {
        let first = named_children(body).into_iter().next()?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let values = named_children(first);
        if values.len() != 1 {
            return None;
        }

        let value = unwrap_parens(values[0]);
        match value.kind() {
            "string" => self.string_literal(value),
            "concatenated_string" => {
                let mut text = String::new();
                for part in named_children(value) {
                    text.push_str(&self.string_literal(part)?);
                }
                Some(text)
            }
            _ => None,
        }
    }

    /// Contents of a plain `str` literal; `None` for bytes and f-strings.
    fn string_literal(&self, ts: TsNode) -> Option<String> {
        if ts.kind() != "string" {
            return None;
        }
        let parts = named_children(ts);
        if parts.iter().any(|p| p.kind() == "interpolation") {
            return None;
        }

        let start = parts.iter().find(|p| p.kind() == "string_start")?;
        let prefix = self.text(*start).to_ascii_lowercase();
        if prefix.contains('b') || prefix.contains('f') {
            return None;
        }

        let end = parts.iter().rev().find(|p| p.kind() == "string_end")?;
        let content = self
            .source
            .get(start.end_byte()..end.start_byte())
            .unwrap_or_default();
        Some(String::from_utf8_lossy(content).into_owned())
    }
}

/// Direct statements of a block, comments excluded.
fn statement_count(block: TsNode) -> usize {
    named_children(block).len()
}

/// `async with` and `try`/`except*` get their own kinds, as in Python's AST.
fn statement_kind(ts: TsNode<'_>) -> NodeKind {
    match ts.kind() {
        "with_statement" if has_token(ts, "async") => NodeKind::AsyncWith,
        "try_statement"
            if named_children(ts)
                .iter()
                .any(|c| c.kind() == "except_group_clause") =>
        {
            NodeKind::TryStar
        }
        other => simple_kind(other),
    }
}

fn simple_kind(kind: &'static str) -> NodeKind {
    match kind {
        "while_statement" => NodeKind::While,
        "try_statement" => NodeKind::Try,
        "except_clause" | "except_group_clause" => NodeKind::ExceptHandler,
        "with_statement" => NodeKind::With,
        "match_statement" => NodeKind::Match,
        "case_clause" => NodeKind::MatchCase,
        "list" => NodeKind::List,
        "dictionary" => NodeKind::Dict,
        "set" => NodeKind::Set,
        other => NodeKind::Other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn functions(tree: &SyntaxTree) -> Vec<FunctionDef> {
        tree.iter()
            .filter_map(|(_, n)| match &n.kind {
                NodeKind::FunctionDef(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }

    fn first_of(tree: &SyntaxTree, pred: impl Fn(&NodeKind) -> bool) -> NodeId {
        tree.iter()
            .find(|(_, n)| pred(&n.kind))
            .map(|(id, _)| id)
            .expect("node should exist")
    }

    #[test]
    fn test_every_non_root_node_has_a_parent() {
        let tree = parse(
            r#"
import os

class Config:
    """Settings."""

    def load(self, path="cfg.yaml"):
        with open(path) as fh:
            return fh.read()
"#,
        )
        .unwrap();

        for (id, node) in tree.iter() {
            if id == tree.root() {
                assert!(node.parent.is_none());
            } else {
                let parent = node.parent.expect("non-root node must have a parent");
                assert!(parent < id, "parents precede children");
                assert!(tree.get(parent).unwrap().children.contains(&id));
            }
        }
    }

    #[test]
    fn test_unterminated_paren_is_invalid() {
        assert_eq!(parse("x = (").unwrap_err(), AnalyzeError::SyntaxInvalid);
    }

    #[test]
    fn test_python2_print_is_invalid() {
        assert_eq!(parse("print 'hi'\n").unwrap_err(), AnalyzeError::SyntaxInvalid);
    }

    #[test]
    fn test_nul_byte_is_invalid() {
        assert_eq!(parse("x = 1\0").unwrap_err(), AnalyzeError::SyntaxInvalid);
    }

    #[test]
    fn test_non_default_after_default_is_invalid() {
        assert_eq!(
            parse("def f(a=1, b):\n    pass\n").unwrap_err(),
            AnalyzeError::SyntaxInvalid
        );
        // Keyword-only parameters may follow defaults.
        assert!(parse("def f(a=1, *, b):\n    pass\n").is_ok());
    }

    #[test]
    fn test_empty_source_is_an_empty_module() {
        let tree = parse("").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.kind(tree.root()), Some(&NodeKind::Module));
    }

    #[test]
    fn test_function_attributes() {
        let tree = parse(
            r#"
async def fetch(a, b: int, /, c, d=[], *args, e={}, **kwargs):
    """Fetch things."""
    x = 1
    # comment
    return x
"#,
        )
        .unwrap();

        let funcs = functions(&tree);
        assert_eq!(funcs.len(), 1);
        let f = &funcs[0];
        assert_eq!(f.name, "fetch");
        assert!(f.is_async);
        assert_eq!(f.body_len, 3);
        assert_eq!(f.docstring.as_deref(), Some("Fetch things."));

        let kinds: Vec<(&str, ParamKind)> =
            f.params.iter().map(|p| (p.name.as_str(), p.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("a", ParamKind::PositionalOnly),
                ("b", ParamKind::PositionalOnly),
                ("c", ParamKind::PositionalOrKeyword),
                ("d", ParamKind::PositionalOrKeyword),
                ("args", ParamKind::VarPositional),
                ("e", ParamKind::KeywordOnly),
                ("kwargs", ParamKind::VarKeyword),
            ]
        );
        assert_eq!(f.positional_or_keyword().count(), 2);

        let d_default = f.params[3].default.expect("d has a default");
        assert_eq!(tree.kind(d_default), Some(&NodeKind::List));
        let e_default = f.params[5].default.expect("e has a default");
        assert_eq!(tree.kind(e_default), Some(&NodeKind::Dict));
    }

    #[test]
    fn test_docstring_variants() {
        let tree = parse(
            r#"
def plain():
    'single quoted'

def fstring():
    f"not a docstring"

def raw_bytes():
    b"not a docstring"

def late():
    x = 1
    "too late"

def concatenated():
    ("part one "
     "part two")
"#,
        )
        .unwrap();

        let docs: Vec<(String, bool)> = functions(&tree)
            .into_iter()
            .map(|f| (f.name, f.docstring.is_some()))
            .collect();
        assert_eq!(
            docs,
            vec![
                ("plain".to_string(), true),
                ("fstring".to_string(), false),
                ("raw_bytes".to_string(), false),
                ("late".to_string(), false),
                ("concatenated".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_nested_ifs_follow_python_depth() {
        let tree = parse(
            r#"
def f(a, b, c):
    if a:
        if b:
            if c:
                pass
"#,
        )
        .unwrap();

        let depths: Vec<usize> = tree
            .iter()
            .filter(|(_, n)| n.kind == NodeKind::If)
            .map(|(id, _)| tree.depth(id))
            .collect();
        // module -> def -> if -> if -> if
        assert_eq!(depths, vec![2, 3, 4]);
    }

    #[test]
    fn test_elif_chains_nest() {
        let tree = parse(
            r#"
if a:
    pass
elif b:
    pass
elif c:
    pass
else:
    for i in x:
        pass
"#,
        )
        .unwrap();

        let depths: Vec<usize> = tree
            .iter()
            .filter(|(_, n)| n.kind == NodeKind::If)
            .map(|(id, _)| tree.depth(id))
            .collect();
        assert_eq!(depths, vec![1, 2, 3]);

        let for_id = first_of(&tree, |k| matches!(k, NodeKind::For(_)));
        assert_eq!(tree.depth(for_id), 4);
    }

    #[test]
    fn test_decorators_attach_to_definition() {
        let tree = parse(
            r#"
@register(print)
def handler():
    pass
"#,
        )
        .unwrap();

        let func = first_of(&tree, |k| matches!(k, NodeKind::FunctionDef(_)));
        assert_eq!(tree.parent(func), Some(tree.root()));

        let call = first_of(&tree, |k| matches!(k, NodeKind::Call(_)));
        assert_eq!(tree.parent(call), Some(func));
    }

    #[test]
    fn test_for_iter_and_call_callee() {
        let tree = parse("for i in (range(10)):\n    log.info(i)\n").unwrap();

        let for_id = first_of(&tree, |k| matches!(k, NodeKind::For(_)));
        let Some(NodeKind::For(loop_attrs)) = tree.kind(for_id) else {
            panic!("expected a for loop");
        };
        let iter = loop_attrs.iter.expect("iterable should be lowered");
        assert_eq!(
            tree.kind(iter),
            Some(&NodeKind::Call(Call {
                callee: Some("range".to_string())
            }))
        );

        let callees: Vec<Option<String>> = tree
            .iter()
            .filter_map(|(_, n)| match &n.kind {
                NodeKind::Call(c) => Some(c.callee.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(callees, vec![Some("range".to_string()), None]);
    }

    #[test]
    fn test_assignment_statement_is_transparent() {
        let tree = parse("x = [1, 2]\n").unwrap();
        let list = first_of(&tree, |k| *k == NodeKind::List);
        // module -> assignment -> list
        assert_eq!(tree.depth(list), 2);
    }

    fn nested_ifs(levels: usize) -> String {
        let mut source = String::new();
        for level in 0..levels {
            source.push_str(&"    ".repeat(level));
            source.push_str("if x:\n");
        }
        source.push_str(&"    ".repeat(levels));
        source.push_str("pass\n");
        source
    }

    #[test]
    fn test_indentation_limit() {
        assert!(parse(&nested_ifs(50)).is_ok());
        assert!(parse(&nested_ifs(99)).is_ok());
        assert_eq!(parse(&nested_ifs(100)).unwrap_err(), AnalyzeError::SyntaxInvalid);
        assert_eq!(parse(&nested_ifs(250)).unwrap_err(), AnalyzeError::SyntaxInvalid);
    }

    #[test]
    fn test_bracket_limit() {
        let parens = |n: usize| format!("x = {}1{}\n", "(".repeat(n), ")".repeat(n));
        assert!(parse(&parens(150)).is_ok());
        assert!(parse(&parens(200)).is_ok());
        assert_eq!(parse(&parens(201)).unwrap_err(), AnalyzeError::SyntaxInvalid);

        let calls = |n: usize| format!("x = {}1{}\n", "f(".repeat(n), ")".repeat(n));
        assert!(parse(&calls(150)).is_ok());
    }

    #[test]
    fn test_python3_only_rules() {
        for bad in [
            "print(end='', 'x')\n",
            "f(**k, *a)\n",
            "f(**k, a)\n",
            "x = a <> b\n",
            "x = 0777\n",
            "x = 10L\n",
            "g = lambda a=1, b: 0\n",
            "g = lambda *: 0\n",
            "def f(*):\n    pass\n",
            "def f(*, **k):\n    pass\n",
            "if x:\n\tpass\n        pass\n",
        ] {
            assert_eq!(parse(bad).unwrap_err(), AnalyzeError::SyntaxInvalid, "{:?}", bad);
        }

        for good in [
            "f(a, b=1, *c, d=2, **e)\n",
            "f(a=1, *b)\n",
            "f(**k, a=1)\n",
            "x = a != b\n",
            "x = 00 + 0_0 + 0o777 + 0777j\n",
            "g = lambda a=1, *, b: 0\n",
            "g = lambda a, *args, b=2: 0\n",
            "def f(*, a):\n    pass\n",
            "def f(a, b=1, /, c=2, *, d, **k):\n    pass\n",
            "if x:\n\tpass\n\tpass\n",
            "if x:\n    if y:\n        pass\n    pass\npass\n",
        ] {
            assert!(parse(good).is_ok(), "{:?} should parse", good);
        }
    }

    #[test]
    fn test_async_with_and_try_star_kinds() {
        let tree = parse(
            r#"
async def f():
    async with a:
        pass
    with b:
        pass

try:
    pass
except* ValueError:
    pass

try:
    pass
except ValueError:
    pass
"#,
        )
        .unwrap();

        let kinds: Vec<&str> = tree.iter().map(|(_, n)| n.kind.as_str()).collect();
        assert_eq!(kinds.iter().filter(|k| **k == "async_with").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "with").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "try_star").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "try").count(), 1);
    }
}
