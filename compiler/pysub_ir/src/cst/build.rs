//! Concrete tree construction helpers.
//!
//! Grammar-parser adapters and tests build trees through these functions
//! instead of spelling out every rule level by hand. Operands are lifted
//! through the precedence chain automatically: passing an `atom` where a
//! `term` is expected wraps it as `factor(power(atom_expr(atom)))`.
//!
//! Tokens are created without positions. [`layout`] renders the tree back to
//! source text and assigns every token its span in that text, so
//! diagnostics computed from the result point at real line/column pairs.
//!
//! ```
//! use pysub_ir::cst::build::{chain, file, ident, int, layout, statement};
//! use pysub_ir::cst::NodeKind;
//!
//! let sum = chain(NodeKind::ArithExpr, ident("a"), vec![("+", int("1"))]);
//! let fixture = layout(file(vec![statement(sum)]));
//! assert_eq!(fixture.source, "a + 1\n");
//! ```

use super::{Child, ConcreteNode, NodeKind, Token, TokenKind};
use crate::Span;

/// Precedence chain from tightest to loosest binding.
///
/// Each level's operands are nodes of the previous level.
const CHAIN: [NodeKind; 16] = [
    NodeKind::Atom,
    NodeKind::AtomExpr,
    NodeKind::Power,
    NodeKind::Factor,
    NodeKind::Term,
    NodeKind::ArithExpr,
    NodeKind::ShiftExpr,
    NodeKind::AndExpr,
    NodeKind::XorExpr,
    NodeKind::Expr,
    NodeKind::Comparison,
    NodeKind::NotTest,
    NodeKind::AndTest,
    NodeKind::OrTest,
    NodeKind::Test,
    NodeKind::TestlistStarExpr,
];

fn chain_level(kind: NodeKind) -> Option<usize> {
    CHAIN.iter().position(|level| *level == kind)
}

// -- Tokens --

pub fn name(text: &str) -> Token {
    Token::new(TokenKind::Name, text, Span::DUMMY)
}

pub fn number(text: &str) -> Token {
    Token::new(TokenKind::Number, text, Span::DUMMY)
}

pub fn string(text: &str) -> Token {
    Token::new(TokenKind::String, text, Span::DUMMY)
}

pub fn keyword(text: &str) -> Token {
    Token::new(TokenKind::Keyword, text, Span::DUMMY)
}

/// Operator token; alphabetic operators (`and`, `in`, `is`) become keywords.
pub fn op(text: &str) -> Token {
    if text.chars().all(|c| c.is_ascii_alphabetic()) {
        keyword(text)
    } else {
        Token::new(TokenKind::Operator, text, Span::DUMMY)
    }
}

pub fn newline() -> Token {
    Token::new(TokenKind::Newline, "\n", Span::DUMMY)
}

pub fn end_marker() -> Token {
    Token::new(TokenKind::EndMarker, "", Span::DUMMY)
}

// -- Generic nodes --

pub fn node(kind: NodeKind, children: Vec<Child>) -> ConcreteNode {
    ConcreteNode::new(kind, children)
}

/// Wrap `node` in single-child rule nodes until it reaches `target`.
///
/// Nodes outside the precedence chain, or already looser than `target`,
/// are returned unchanged.
pub fn lift(node: ConcreteNode, target: NodeKind) -> ConcreteNode {
    let (Some(mut level), Some(target_level)) = (chain_level(node.kind), chain_level(target))
    else {
        return node;
    };
    let mut current = node;
    while level < target_level {
        level += 1;
        current = ConcreteNode::new(CHAIN[level], vec![Child::Node(current)]);
    }
    current
}

/// Operand level of a chain rule (`arith_expr` → `term`).
fn operand_kind(kind: NodeKind) -> NodeKind {
    match kind {
        NodeKind::Comparison => NodeKind::Expr,
        NodeKind::AndTest => NodeKind::NotTest,
        _ => chain_level(kind)
            .and_then(|level| level.checked_sub(1))
            .map_or(kind, |level| CHAIN[level]),
    }
}

/// Flat operator chain: `first op operand op operand ...`.
///
/// In a `comparison`, multi-word operators (`not in`, `is not`) become a
/// `comp_op` node.
pub fn chain<'a>(
    kind: NodeKind,
    first: ConcreteNode,
    rest: impl IntoIterator<Item = (&'a str, ConcreteNode)>,
) -> ConcreteNode {
    let operand = operand_kind(kind);
    let mut children = vec![Child::Node(lift(first, operand))];
    for (operator, next) in rest {
        if kind == NodeKind::Comparison && operator.contains(' ') {
            let words = operator.split_whitespace().map(|w| Child::Token(keyword(w)));
            children.push(Child::Node(node(NodeKind::CompOp, words.collect())));
        } else {
            children.push(Child::Token(op(operator)));
        }
        children.push(Child::Node(lift(next, operand)));
    }
    ConcreteNode::new(kind, children)
}

// -- Atoms --

pub fn atom(token: Token) -> ConcreteNode {
    node(NodeKind::Atom, vec![Child::Token(token)])
}

pub fn ident(text: &str) -> ConcreteNode {
    atom(name(text))
}

pub fn int(text: &str) -> ConcreteNode {
    atom(number(text))
}

pub fn str_lit(text: &str) -> ConcreteNode {
    atom(string(text))
}

/// `True`, `False`, `None`.
pub fn constant(text: &str) -> ConcreteNode {
    atom(keyword(text))
}

pub fn ellipsis() -> ConcreteNode {
    atom(op("..."))
}

/// Adjacent string literals: `'a' 'b'`.
pub fn strings(texts: &[&str]) -> ConcreteNode {
    node(
        NodeKind::Atom,
        texts.iter().map(|t| Child::Token(string(t))).collect(),
    )
}

/// `( inner )`.
pub fn paren(inner: ConcreteNode) -> ConcreteNode {
    let comp = node(
        NodeKind::TestlistComp,
        vec![Child::Node(lift(inner, NodeKind::Test))],
    );
    node(
        NodeKind::Atom,
        vec![Child::Token(op("(")), Child::Node(comp), Child::Token(op(")"))],
    )
}

/// `[ a, b ]`.
pub fn list_display(items: Vec<ConcreteNode>) -> ConcreteNode {
    let mut children = vec![Child::Token(op("["))];
    if !items.is_empty() {
        children.push(Child::Node(node(
            NodeKind::TestlistComp,
            comma_separated(items, NodeKind::Test),
        )));
    }
    children.push(Child::Token(op("]")));
    node(NodeKind::Atom, children)
}

/// `{}`.
pub fn empty_dict() -> ConcreteNode {
    node(
        NodeKind::Atom,
        vec![Child::Token(op("{")), Child::Token(op("}"))],
    )
}

// -- Atom expressions --

/// `( args )` trailer; arguments are kept as a single test for simplicity.
pub fn call_trailer(args: Option<ConcreteNode>) -> ConcreteNode {
    let mut children = vec![Child::Token(op("("))];
    if let Some(arg) = args {
        children.push(Child::Node(lift(arg, NodeKind::Test)));
    }
    children.push(Child::Token(op(")")));
    node(NodeKind::Trailer, children)
}

pub fn subscript_trailer(index: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::Trailer,
        vec![
            Child::Token(op("[")),
            Child::Node(lift(index, NodeKind::Test)),
            Child::Token(op("]")),
        ],
    )
}

pub fn attribute_trailer(attr: &str) -> ConcreteNode {
    node(
        NodeKind::Trailer,
        vec![Child::Token(op(".")), Child::Token(name(attr))],
    )
}

/// `atom trailer*`.
pub fn with_trailers(base: ConcreteNode, trailers: Vec<ConcreteNode>) -> ConcreteNode {
    let mut children = vec![Child::Node(base)];
    children.extend(trailers.into_iter().map(Child::Node));
    node(NodeKind::AtomExpr, children)
}

/// `await atom`.
pub fn awaited(base: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::AtomExpr,
        vec![Child::Token(keyword("await")), Child::Node(base)],
    )
}

/// `base ** exponent`.
pub fn power(base: ConcreteNode, exponent: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::Power,
        vec![
            Child::Node(lift(base, NodeKind::AtomExpr)),
            Child::Token(op("**")),
            Child::Node(lift(exponent, NodeKind::Factor)),
        ],
    )
}

// -- Prefix operators --

/// `+x`, `-x`, `~x`.
pub fn factor(operator: &str, operand: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::Factor,
        vec![
            Child::Token(op(operator)),
            Child::Node(lift(operand, NodeKind::Factor)),
        ],
    )
}

/// `not x`.
pub fn not(operand: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::NotTest,
        vec![
            Child::Token(keyword("not")),
            Child::Node(lift(operand, NodeKind::NotTest)),
        ],
    )
}

/// `*x`.
pub fn star(operand: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::StarExpr,
        vec![
            Child::Token(op("*")),
            Child::Node(lift(operand, NodeKind::Expr)),
        ],
    )
}

// -- Test-level forms --

/// `lambda: body`, already wrapped in a `test` node.
pub fn lambda(body: ConcreteNode) -> ConcreteNode {
    let lambdef = node(
        NodeKind::Lambdef,
        vec![
            Child::Token(keyword("lambda")),
            Child::Token(op(":")),
            Child::Node(lift(body, NodeKind::Test)),
        ],
    );
    node(NodeKind::Test, vec![Child::Node(lambdef)])
}

/// `body if condition else orelse`.
pub fn conditional(
    body: ConcreteNode,
    condition: ConcreteNode,
    orelse: ConcreteNode,
) -> ConcreteNode {
    node(
        NodeKind::Test,
        vec![
            Child::Node(lift(body, NodeKind::OrTest)),
            Child::Token(keyword("if")),
            Child::Node(lift(condition, NodeKind::OrTest)),
            Child::Token(keyword("else")),
            Child::Node(lift(orelse, NodeKind::Test)),
        ],
    )
}

/// `yield` or `yield value`.
pub fn yield_expr(value: Option<ConcreteNode>) -> ConcreteNode {
    let mut children = vec![Child::Token(keyword("yield"))];
    if let Some(value) = value {
        let arg = node(
            NodeKind::YieldArg,
            vec![Child::Node(testlist(vec![value], false))],
        );
        children.push(Child::Node(arg));
    }
    node(NodeKind::YieldExpr, children)
}

fn comma_separated(items: Vec<ConcreteNode>, level: NodeKind) -> Vec<Child> {
    let mut children = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            children.push(Child::Token(op(",")));
        }
        let item = if item.kind == NodeKind::StarExpr {
            item
        } else {
            lift(item, level)
        };
        children.push(Child::Node(item));
    }
    children
}

/// `a, *b, c` as a `testlist_star_expr`, optionally with a trailing comma.
pub fn testlist_star(items: Vec<ConcreteNode>, trailing_comma: bool) -> ConcreteNode {
    let mut children = comma_separated(items, NodeKind::Test);
    if trailing_comma {
        children.push(Child::Token(op(",")));
    }
    node(NodeKind::TestlistStarExpr, children)
}

/// `a, b` as a `testlist` (right-hand side of augmented assignment).
pub fn testlist(items: Vec<ConcreteNode>, trailing_comma: bool) -> ConcreteNode {
    let mut children = comma_separated(items, NodeKind::Test);
    if trailing_comma {
        children.push(Child::Token(op(",")));
    }
    node(NodeKind::Testlist, children)
}

// -- Statements --

/// Operand of an `expr_stmt`: lifted to `testlist_star_expr` unless it is
/// already a list or a yield.
fn expr_stmt_operand(operand: ConcreteNode) -> Child {
    match operand.kind {
        NodeKind::Testlist | NodeKind::YieldExpr => Child::Node(operand),
        NodeKind::StarExpr => Child::Node(node(
            NodeKind::TestlistStarExpr,
            vec![Child::Node(operand)],
        )),
        _ => Child::Node(lift(operand, NodeKind::TestlistStarExpr)),
    }
}

/// Bare expression statement body.
pub fn expr_stmt(expression: ConcreteNode) -> ConcreteNode {
    node(NodeKind::ExprStmt, vec![expr_stmt_operand(expression)])
}

/// `target = value`.
pub fn assign(target: ConcreteNode, value: ConcreteNode) -> ConcreteNode {
    assign_chain(vec![target, value])
}

/// `a = b = c ...`.
pub fn assign_chain(operands: Vec<ConcreteNode>) -> ConcreteNode {
    let mut children = Vec::new();
    for (i, operand) in operands.into_iter().enumerate() {
        if i > 0 {
            children.push(Child::Token(op("=")));
        }
        children.push(expr_stmt_operand(operand));
    }
    node(NodeKind::ExprStmt, children)
}

/// `target op= value`; a plain expression value becomes a one-item `testlist`.
pub fn aug_assign(target: ConcreteNode, operator: &str, value: ConcreteNode) -> ConcreteNode {
    let augassign = node(NodeKind::Augassign, vec![Child::Token(op(operator))]);
    let value = match value.kind {
        NodeKind::Testlist | NodeKind::YieldExpr => value,
        _ => testlist(vec![value], false),
    };
    node(
        NodeKind::ExprStmt,
        vec![
            expr_stmt_operand(target),
            Child::Node(augassign),
            Child::Node(value),
        ],
    )
}

/// `target: annotation` or `target: annotation = value`.
pub fn annotated(
    target: ConcreteNode,
    annotation: ConcreteNode,
    value: Option<ConcreteNode>,
) -> ConcreteNode {
    let mut ann = vec![
        Child::Token(op(":")),
        Child::Node(lift(annotation, NodeKind::Test)),
    ];
    if let Some(value) = value {
        ann.push(Child::Token(op("=")));
        ann.push(Child::Node(lift(value, NodeKind::Test)));
    }
    node(
        NodeKind::ExprStmt,
        vec![
            expr_stmt_operand(target),
            Child::Node(node(NodeKind::Annassign, ann)),
        ],
    )
}

pub fn pass_stmt() -> ConcreteNode {
    node(NodeKind::PassStmt, vec![Child::Token(keyword("pass"))])
}

pub fn del_stmt(target: ConcreteNode) -> ConcreteNode {
    node(
        NodeKind::DelStmt,
        vec![
            Child::Token(keyword("del")),
            Child::Node(lift(target, NodeKind::Expr)),
        ],
    )
}

/// `break`, `continue`, `return`, `raise` or `yield` wrapped in a `flow_stmt`.
pub fn flow_stmt(kind: NodeKind, keyword_text: &str) -> ConcreteNode {
    let inner = node(kind, vec![Child::Token(keyword(keyword_text))]);
    node(NodeKind::FlowStmt, vec![Child::Node(inner)])
}

/// Single-keyword statement with a name operand: `import os`, `global x`.
pub fn keyword_stmt(kind: NodeKind, keyword_text: &str, operand: &str) -> ConcreteNode {
    node(
        kind,
        vec![Child::Token(keyword(keyword_text)), Child::Token(name(operand))],
    )
}

/// Wrap a statement body in `small_stmt` unless it already is one.
fn small(body: ConcreteNode) -> ConcreteNode {
    if body.kind == NodeKind::SmallStmt {
        body
    } else {
        node(NodeKind::SmallStmt, vec![Child::Node(body)])
    }
}

/// `small ; small ; ... NEWLINE`.
pub fn simple_stmt(bodies: Vec<ConcreteNode>, trailing_semicolon: bool) -> ConcreteNode {
    let mut children = Vec::new();
    for (i, body) in bodies.into_iter().enumerate() {
        if i > 0 {
            children.push(Child::Token(op(";")));
        }
        children.push(Child::Node(small(body)));
    }
    if trailing_semicolon {
        children.push(Child::Token(op(";")));
    }
    children.push(Child::Token(newline()));
    node(NodeKind::SimpleStmt, children)
}

/// One full statement line from a statement body or expression.
///
/// Expressions become expression statements; `expr_stmt` and other
/// small-statement bodies are used as-is.
pub fn statement(body: ConcreteNode) -> ConcreteNode {
    let body = if is_small_statement_body(body.kind) {
        body
    } else {
        expr_stmt(body)
    };
    node(
        NodeKind::Stmt,
        vec![Child::Node(simple_stmt(vec![body], false))],
    )
}

fn is_small_statement_body(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::SmallStmt
            | NodeKind::ExprStmt
            | NodeKind::DelStmt
            | NodeKind::PassStmt
            | NodeKind::FlowStmt
            | NodeKind::ImportStmt
            | NodeKind::GlobalStmt
            | NodeKind::NonlocalStmt
            | NodeKind::AssertStmt
    )
}

/// Minimal compound statement: `keyword test : NEWLINE`, wrapped in
/// `stmt(compound_stmt(...))`.
pub fn compound(kind: NodeKind, keyword_text: &str) -> ConcreteNode {
    let inner = node(
        kind,
        vec![
            Child::Token(keyword(keyword_text)),
            Child::Node(lift(ident("x"), NodeKind::Test)),
            Child::Token(op(":")),
            Child::Token(newline()),
        ],
    );
    let compound = node(NodeKind::CompoundStmt, vec![Child::Node(inner)]);
    node(NodeKind::Stmt, vec![Child::Node(compound)])
}

// -- Entry points --

/// `file_input` from statements, terminated by the end marker.
pub fn file(statements: Vec<ConcreteNode>) -> ConcreteNode {
    let mut children: Vec<Child> = statements.into_iter().map(Child::Node).collect();
    children.push(Child::Token(end_marker()));
    node(NodeKind::FileInput, children)
}

/// `file_input` from arbitrary children (statements interleaved with blank lines).
pub fn file_with(children: Vec<Child>) -> ConcreteNode {
    let mut children = children;
    children.push(Child::Token(end_marker()));
    node(NodeKind::FileInput, children)
}

/// `single_input` around a simple or compound statement, or a bare newline.
pub fn single_input(body: Option<ConcreteNode>) -> ConcreteNode {
    let children = match body {
        None => vec![Child::Token(newline())],
        Some(body) if body.kind == NodeKind::CompoundStmt => {
            vec![Child::Node(body), Child::Token(newline())]
        }
        Some(body) => vec![Child::Node(body)],
    };
    node(NodeKind::SingleInput, children)
}

/// `eval_input: testlist NEWLINE* EOF`.
pub fn eval_input(list: ConcreteNode) -> ConcreteNode {
    let list = if list.kind == NodeKind::Testlist {
        list
    } else {
        testlist(vec![list], false)
    };
    node(
        NodeKind::EvalInput,
        vec![
            Child::Node(list),
            Child::Token(newline()),
            Child::Token(end_marker()),
        ],
    )
}

// -- Layout --

/// A laid-out tree together with the source text its spans refer to.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub source: String,
    pub root: ConcreteNode,
}

/// Render `root` to source text and assign every token its span.
///
/// Tokens are separated by a single space; line breaks end a line with no
/// trailing space.
pub fn layout(root: ConcreteNode) -> Fixture {
    let mut source = String::new();
    let root = place_node(root, &mut source);
    Fixture { source, root }
}

fn place_node(node: ConcreteNode, source: &mut String) -> ConcreteNode {
    let children = node
        .children
        .into_iter()
        .map(|child| match child {
            Child::Node(inner) => Child::Node(place_node(inner, source)),
            Child::Token(token) => Child::Token(place_token(token, source)),
        })
        .collect();
    ConcreteNode::new(node.kind, children)
}

fn place_token(token: Token, source: &mut String) -> Token {
    let at_line_start = source.is_empty() || source.ends_with('\n');
    if !at_line_start && token.kind != TokenKind::Newline && !token.text.is_empty() {
        source.push(' ');
    }
    let start = offset(source);
    source.push_str(&token.text);
    Token {
        span: Span::new(start, offset(source)),
        ..token
    }
}

fn offset(source: &str) -> u32 {
    u32::try_from(source.len()).unwrap_or(u32::MAX)
}
