//! Concrete syntax tree.
//!
//! The tree an external grammar parser hands to lowering: one node per
//! grammar rule application, with ordered children that are either nested
//! rule nodes or terminal tokens. Nothing is collapsed, so a lone literal in
//! a statement sits under the full chain of precedence rules
//! (`test` → `or_test` → … → `atom`).
//!
//! Chains of same-precedence binary operators are flat: `a - b - c` is one
//! `arith_expr` node with children `term, '-', term, '-', term`.
//!
//! Trees are immutable once built. Lowering only borrows them.

pub mod build;


use std::fmt;

use crate::{Span, Spanned};

/// Grammar rule that produced a [`ConcreteNode`].
///
/// Closed set mirroring the Python 3 grammar rules the lowering pass can
/// encounter. Dispatch sites match on it exhaustively.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // Entry points
    FileInput,
    SingleInput,
    EvalInput,

    // Statements
    Stmt,
    SimpleStmt,
    SmallStmt,
    ExprStmt,
    Annassign,
    Augassign,
    DelStmt,
    PassStmt,
    FlowStmt,
    BreakStmt,
    ContinueStmt,
    ReturnStmt,
    RaiseStmt,
    YieldStmt,
    ImportStmt,
    GlobalStmt,
    NonlocalStmt,
    AssertStmt,

    // Compound statements
    CompoundStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    TryStmt,
    WithStmt,
    Funcdef,
    Classdef,
    Decorated,
    AsyncStmt,

    // Expressions, loosest binding first
    TestlistStarExpr,
    Testlist,
    Test,
    TestNocond,
    Lambdef,
    LambdefNocond,
    OrTest,
    AndTest,
    NotTest,
    Comparison,
    CompOp,
    StarExpr,
    Expr,
    XorExpr,
    AndExpr,
    ShiftExpr,
    ArithExpr,
    Term,
    Factor,
    Power,
    AtomExpr,
    Atom,
    Trailer,
    TestlistComp,
    YieldExpr,
    YieldArg,
}

impl NodeKind {
    /// The grammar rule name, as written in the grammar file.
    pub const fn rule_name(self) -> &'static str {
        match self {
            NodeKind::FileInput => "file_input",
            NodeKind::SingleInput => "single_input",
            NodeKind::EvalInput => "eval_input",
            NodeKind::Stmt => "stmt",
            NodeKind::SimpleStmt => "simple_stmt",
            NodeKind::SmallStmt => "small_stmt",
            NodeKind::ExprStmt => "expr_stmt",
            NodeKind::Annassign => "annassign",
            NodeKind::Augassign => "augassign",
            NodeKind::DelStmt => "del_stmt",
            NodeKind::PassStmt => "pass_stmt",
            NodeKind::FlowStmt => "flow_stmt",
            NodeKind::BreakStmt => "break_stmt",
            NodeKind::ContinueStmt => "continue_stmt",
            NodeKind::ReturnStmt => "return_stmt",
            NodeKind::RaiseStmt => "raise_stmt",
            NodeKind::YieldStmt => "yield_stmt",
            NodeKind::ImportStmt => "import_stmt",
            NodeKind::GlobalStmt => "global_stmt",
            NodeKind::NonlocalStmt => "nonlocal_stmt",
            NodeKind::AssertStmt => "assert_stmt",
            NodeKind::CompoundStmt => "compound_stmt",
            NodeKind::IfStmt => "if_stmt",
            NodeKind::WhileStmt => "while_stmt",
            NodeKind::ForStmt => "for_stmt",
            NodeKind::TryStmt => "try_stmt",
            NodeKind::WithStmt => "with_stmt",
            NodeKind::Funcdef => "funcdef",
            NodeKind::Classdef => "classdef",
            NodeKind::Decorated => "decorated",
            NodeKind::AsyncStmt => "async_stmt",
            NodeKind::TestlistStarExpr => "testlist_star_expr",
            NodeKind::Testlist => "testlist",
            NodeKind::Test => "test",
            NodeKind::TestNocond => "test_nocond",
            NodeKind::Lambdef => "lambdef",
            NodeKind::LambdefNocond => "lambdef_nocond",
            NodeKind::OrTest => "or_test",
            NodeKind::AndTest => "and_test",
            NodeKind::NotTest => "not_test",
            NodeKind::Comparison => "comparison",
            NodeKind::CompOp => "comp_op",
            NodeKind::StarExpr => "star_expr",
            NodeKind::Expr => "expr",
            NodeKind::XorExpr => "xor_expr",
            NodeKind::AndExpr => "and_expr",
            NodeKind::ShiftExpr => "shift_expr",
            NodeKind::ArithExpr => "arith_expr",
            NodeKind::Term => "term",
            NodeKind::Factor => "factor",
            NodeKind::Power => "power",
            NodeKind::AtomExpr => "atom_expr",
            NodeKind::Atom => "atom",
            NodeKind::Trailer => "trailer",
            NodeKind::TestlistComp => "testlist_comp",
            NodeKind::YieldExpr => "yield_expr",
            NodeKind::YieldArg => "yield_arg",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// Lexical class of a [`Token`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Identifier.
    Name,
    /// Numeric literal of any radix or form (`42`, `0x1f`, `1.5`, `2j`).
    Number,
    /// String literal, quotes and prefixes included.
    String,
    /// Reserved word (`True`, `not`, `lambda`, ...).
    Keyword,
    /// Operator or delimiter (`+`, `+=`, `(`, `,`, ...).
    Operator,
    /// Logical line break.
    Newline,
    Indent,
    Dedent,
    /// End of input.
    EndMarker,
}

impl TokenKind {
    /// Line separators and the end marker carry no statement content.
    pub const fn is_structural(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::EndMarker)
    }
}

/// Terminal leaf of the concrete tree.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw lexeme as it appears in source.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Check kind and text together, e.g. `token.is(TokenKind::Keyword, "not")`.
    #[inline]
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    #[inline]
    pub fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

/// A child slot: nested rule node or terminal token.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Child {
    Node(ConcreteNode),
    Token(Token),
}

impl Child {
    pub fn as_node(&self) -> Option<&ConcreteNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Child::Token(token) => Some(token),
            Child::Node(_) => None,
        }
    }

    /// Check whether this child is the given token, e.g. the `=` of an assignment.
    pub fn is_token(&self, kind: TokenKind, text: &str) -> bool {
        self.as_token().is_some_and(|token| token.is(kind, text))
    }
}

impl Spanned for Child {
    fn span(&self) -> Span {
        match self {
            Child::Node(node) => node.span,
            Child::Token(token) => token.span,
        }
    }
}

impl From<ConcreteNode> for Child {
    fn from(node: ConcreteNode) -> Self {
        Child::Node(node)
    }
}

impl From<Token> for Child {
    fn from(token: Token) -> Self {
        Child::Token(token)
    }
}

/// Interior node of the concrete tree.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConcreteNode {
    kind: NodeKind,
    children: Vec<Child>,
    span: Span,
}

impl ConcreteNode {
    /// Create a node whose span covers its first through last child.
    ///
    /// A childless node gets [`Span::DUMMY`].
    pub fn new(kind: NodeKind, children: Vec<Child>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::DUMMY,
        };
        ConcreteNode {
            kind,
            children,
            span,
        }
    }

    /// Create a node with an explicit span, for parsers that track their own.
    pub fn with_span(kind: NodeKind, children: Vec<Child>, span: Span) -> Self {
        ConcreteNode {
            kind,
            children,
            span,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Nested rule nodes, skipping tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = &ConcreteNode> {
        self.children.iter().filter_map(Child::as_node)
    }

    /// Direct token children, skipping nested nodes.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(Child::as_token)
    }

    /// First direct child node of the given kind.
    pub fn find_child(&self, kind: NodeKind) -> Option<&ConcreteNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    /// Leftmost token anywhere under this node.
    pub fn first_token(&self) -> Option<&Token> {
        self.children.iter().find_map(|child| match child {
            Child::Token(token) => Some(token),
            Child::Node(node) => node.first_token(),
        })
    }

    /// Texts of every token under this node, in source order, joined by a space.
    ///
    /// Multi-token operators such as `not in` render the way they read.
    pub fn token_text(&self) -> String {
        let mut texts = Vec::new();
        self.collect_token_texts(&mut texts);
        texts.join(" ")
    }

    fn collect_token_texts<'a>(&'a self, texts: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Child::Token(token) => texts.push(&token.text),
                Child::Node(node) => node.collect_token_texts(texts),
            }
        }
    }
}

impl Spanned for ConcreteNode {
    fn span(&self) -> Span {
        self.span
    }
}
