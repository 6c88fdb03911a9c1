//! Python 3 rules the tree-sitter grammar does not enforce.
//!
//! The grammar is deliberately lenient: it accepts Python 2 leftovers,
//! argument and parameter orderings the compiler refuses, and nesting past
//! the tokenizer's limits. `check` walks the concrete tree once, without
//! recursion, and reports the first such construct.

use std::collections::BTreeSet;

use tree_sitter::Node as TsNode;

/// Indentation stack depth at which the tokenizer gives up.
pub(super) const MAX_INDENT_LEVELS: usize = 100;

/// Deepest bracket nesting the tokenizer accepts.
pub(super) const MAX_BRACKET_DEPTH: usize = 200;

/// Statements and clauses whose first token starts a logical line.
const LINE_START_KINDS: &[&str] = &[
    "decorator",
    "function_definition",
    "class_definition",
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "case_clause",
];

const TAB_ERROR: &str = "inconsistent use of tabs and spaces in indentation";

/// Reject source that parses but is not valid Python 3.
pub(super) fn check(root: TsNode, source: &[u8]) -> Result<(), &'static str> {
    let mut checker = Checker {
        source,
        brackets: 0,
        line_starts: BTreeSet::new(),
    };

    let mut cursor = root.walk();
    loop {
        checker.visit(cursor.node())?;
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return check_indentation(source, &checker.line_starts);
            }
        }
    }
}

struct Checker<'src> {
    source: &'src [u8],
    /// Open brackets at the current point of the pre-order walk.
    brackets: usize,
    /// Rows that begin a statement, for the indentation check.
    line_starts: BTreeSet<usize>,
}

impl<'src> Checker<'src> {
    fn visit(&mut self, node: TsNode) -> Result<(), &'static str> {
        if !node.is_named() {
            return self.visit_token(node.kind());
        }

        match node.kind() {
            "argument_list" => check_arguments(node)?,
            "parameters" | "lambda_parameters" => check_parameters(node)?,
            "integer" => check_integer(node.utf8_text(self.source).unwrap_or(""))?,
            _ => {}
        }

        if self.starts_line(node) {
            self.line_starts.insert(node.start_position().row);
        }
        Ok(())
    }

    fn visit_token(&mut self, kind: &str) -> Result<(), &'static str> {
        match kind {
            "(" | "[" | "{" => {
                self.brackets += 1;
                if self.brackets > MAX_BRACKET_DEPTH {
                    return Err("too many nested parentheses");
                }
            }
            ")" | "]" | "}" => self.brackets = self.brackets.saturating_sub(1),
            "<>" => return Err("the <> operator"),
            _ => {}
        }
        Ok(())
    }

    /// Whether `node` is a statement written first on its line.
    fn starts_line(&self, node: TsNode) -> bool {
        let is_statement = LINE_START_KINDS.contains(&node.kind())
            || node
                .parent()
                .is_some_and(|p| matches!(p.kind(), "module" | "block"));
        if !is_statement || node.kind() == "comment" {
            return false;
        }

        let start = node.start_byte();
        let column = node.start_position().column;
        self.source
            .get(start - column.min(start)..start)
            .is_some_and(|lead| lead.iter().all(|b| matches!(b, b' ' | b'\t' | b'\x0c')))
    }
}

/// Call arguments: positionals, then keywords, with `*x` never after `**y`.
fn check_arguments(args: TsNode) -> Result<(), &'static str> {
    let mut keyword = false;
    let mut dict_splat = false;

    let mut cursor = args.walk();
    for arg in args.named_children(&mut cursor) {
        match arg.kind() {
            "comment" => {}
            "keyword_argument" => keyword = true,
            "dictionary_splat" => dict_splat = true,
            "list_splat" => {
                if dict_splat {
                    return Err("iterable argument unpacking follows keyword argument unpacking");
                }
            }
            _ => {
                if dict_splat {
                    return Err("positional argument follows keyword argument unpacking");
                }
                if keyword {
                    return Err("positional argument follows keyword argument");
                }
            }
        }
    }
    Ok(())
}

/// Shape of one entry in a `def` or `lambda` parameter list.
enum ParamShape {
    Plain,
    Default,
    BareStar,
    VarPositional,
    VarKeyword,
    Tuple,
    Marker,
}

fn param_shape(param: TsNode) -> ParamShape {
    match param.kind() {
        "identifier" => ParamShape::Plain,
        "default_parameter" | "typed_default_parameter" => ParamShape::Default,
        "keyword_separator" => ParamShape::BareStar,
        "list_splat_pattern" => ParamShape::VarPositional,
        "dictionary_splat_pattern" => ParamShape::VarKeyword,
        "tuple_pattern" => ParamShape::Tuple,
        "typed_parameter" => {
            let mut cursor = param.walk();
            let inner = param.named_children(&mut cursor).next();
            match inner {
                Some(inner) => param_shape(inner),
                None => ParamShape::Marker,
            }
        }
        _ => ParamShape::Marker,
    }
}

/// Parameter lists: no plain parameter after a default (until `*`), a bare
/// `*` needs a keyword-only parameter, no Python 2 tuple parameters.
fn check_parameters(params: TsNode) -> Result<(), &'static str> {
    let mut after_star = false;
    let mut bare_star_pending = false;
    let mut seen_default = false;

    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param_shape(param) {
            ParamShape::Plain | ParamShape::Default if after_star => bare_star_pending = false,
            ParamShape::Plain => {
                if seen_default {
                    return Err("non-default parameter follows default parameter");
                }
            }
            ParamShape::Default => seen_default = true,
            ParamShape::BareStar => {
                after_star = true;
                bare_star_pending = true;
            }
            ParamShape::VarPositional => after_star = true,
            ParamShape::VarKeyword => {
                if bare_star_pending {
                    return Err("named parameters must follow bare *");
                }
            }
            ParamShape::Tuple => return Err("tuple parameter unpacking"),
            ParamShape::Marker => {}
        }
    }

    if bare_star_pending {
        return Err("named parameters must follow bare *");
    }
    Ok(())
}

/// Integer literals: no `L` suffix, no leading zeros on non-zero decimals.
fn check_integer(text: &str) -> Result<(), &'static str> {
    if text.ends_with(|c| matches!(c, 'l' | 'L')) {
        return Err("long integer suffix");
    }
    if text.ends_with(|c| matches!(c, 'j' | 'J')) {
        return Ok(());
    }

    let bytes = text.as_bytes();
    let leading_zero = bytes.len() > 1
        && bytes[0] == b'0'
        && (bytes[1].is_ascii_digit() || bytes[1] == b'_');
    if leading_zero && !bytes.iter().all(|b| matches!(b, b'0' | b'_')) {
        return Err("leading zeros in decimal integer literal");
    }
    Ok(())
}

/// Indentation width with tabs to multiples of 8, and with tabs as 1.
fn indent_columns(line: &[u8]) -> (usize, usize) {
    let (mut col, mut alt) = (0, 0);
    for &b in line {
        match b {
            b' ' => {
                col += 1;
                alt += 1;
            }
            b'\t' => {
                col = (col / 8 + 1) * 8;
                alt += 1;
            }
            b'\x0c' => {
                col = 0;
                alt = 0;
            }
            _ => break,
        }
    }
    (col, alt)
}

/// Replays the tokenizer's indent stack over the statement rows. Every
/// comparison must agree under both tab widths, and the stack may not grow
/// past `MAX_INDENT_LEVELS`.
fn check_indentation(source: &[u8], rows: &BTreeSet<usize>) -> Result<(), &'static str> {
    let lines: Vec<&[u8]> = source.split(|&b| b == b'\n').collect();
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];

    for &row in rows {
        let Some(line) = lines.get(row) else {
            continue;
        };
        let (col, alt) = indent_columns(line);
        let (top_col, top_alt) = stack.last().copied().unwrap_or((0, 0));

        if col == top_col {
            if alt != top_alt {
                return Err(TAB_ERROR);
            }
        } else if col > top_col {
            if alt <= top_alt {
                return Err(TAB_ERROR);
            }
            if stack.len() >= MAX_INDENT_LEVELS {
                return Err("too many levels of indentation");
            }
            stack.push((col, alt));
        } else {
            while stack.len() > 1 && stack.last().is_some_and(|&(c, _)| col < c) {
                stack.pop();
            }
            if stack.last().copied() != Some((col, alt)) {
                return Err(TAB_ERROR);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_literals() {
        for ok in ["0", "00", "0_0", "10", "1_000", "0x1F", "0o17", "0b101", "0777j"] {
            assert!(check_integer(ok).is_ok(), "{} should be accepted", ok);
        }
        for bad in ["0777", "007", "01_0", "10L", "0xFFl"] {
            assert!(check_integer(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_indent_columns() {
        assert_eq!(indent_columns(b"pass"), (0, 0));
        assert_eq!(indent_columns(b"    pass"), (4, 4));
        assert_eq!(indent_columns(b"\tpass"), (8, 1));
        assert_eq!(indent_columns(b"  \tpass"), (8, 3));
    }

    #[test]
    fn test_indent_stack() {
        let rows: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
        assert!(check_indentation(b"if x:\n\tpass\n\tpass\n", &rows).is_ok());
        assert!(check_indentation(b"if x:\n    pass\n    pass\n", &rows).is_ok());
        assert_eq!(
            check_indentation(b"if x:\n\tpass\n        pass\n", &rows),
            Err(TAB_ERROR)
        );
    }
}
