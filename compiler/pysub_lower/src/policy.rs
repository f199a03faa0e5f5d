//! Catalogue of rejected constructs.
//!
//! The evaluator understands literals, unary/binary/logical expressions,
//! expression statements and single-target assignments. Every other
//! grammatically valid construct maps to exactly one [`Construct`], and its
//! `Display` is the human-readable category used in diagnostics.

use std::fmt;

use pysub_ir::cst::NodeKind;

/// A construct outside the supported subset.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Construct {
    // Expressions
    LambdaExpressions,
    ConditionalExpressions,
    StarredExpressions,
    YieldExpressions,
    TupleExpressions,
    ChainedComparisons,

    /// An operator outside its level's supported set, by source text.
    Operator(String),

    // Atoms and trailers
    AwaitExpressions,
    FunctionCalls,
    Subscripts,
    AttributeAccess,
    NoneLiteral,
    Ellipsis,
    ParenthesizedExpressions,
    ListDisplays,
    DictOrSetDisplays,
    ImplicitStringConcatenation,
    NonIntegerLiterals,
    IntegerOverflow,

    // Assignments
    StarredAssignmentTargets,
    MultipleAssignmentTargets,
    ChainedAssignments,
    AnnotatedAssignments,
    AugmentedYieldAssignment,

    // Simple statements
    MultipleStatementsPerLine,
    DelStatements,
    PassStatements,
    BreakStatements,
    ContinueStatements,
    ReturnStatements,
    RaiseStatements,
    YieldStatements,
    ImportStatements,
    GlobalStatements,
    NonlocalStatements,
    AssertStatements,

    // Compound statements
    IfStatements,
    WhileLoops,
    ForLoops,
    TryStatements,
    WithStatements,
    FunctionDefinitions,
    ClassDefinitions,
    DecoratedDefinitions,
    AsyncStatements,
}

impl Construct {
    /// Category name as it reads in a sentence.
    pub fn category(&self) -> String {
        let text = match self {
            Construct::LambdaExpressions => "lambda expressions",
            Construct::ConditionalExpressions => "conditional expressions",
            Construct::StarredExpressions => "starred expressions",
            Construct::YieldExpressions => "yield expressions",
            Construct::TupleExpressions => "tuple expressions",
            Construct::ChainedComparisons => "chained comparisons",
            Construct::Operator(symbol) => return format!("the `{symbol}` operator"),
            Construct::AwaitExpressions => "await expressions",
            Construct::FunctionCalls => "function calls",
            Construct::Subscripts => "subscripts",
            Construct::AttributeAccess => "attribute access",
            Construct::NoneLiteral => "`None`",
            Construct::Ellipsis => "the ellipsis literal",
            Construct::ParenthesizedExpressions => "parenthesized expressions",
            Construct::ListDisplays => "list displays",
            Construct::DictOrSetDisplays => "dict and set displays",
            Construct::ImplicitStringConcatenation => "implicit string concatenation",
            Construct::NonIntegerLiterals => "non-integer numeric literals",
            Construct::IntegerOverflow => "integer literals outside the 64-bit range",
            Construct::StarredAssignmentTargets => "starred assignment targets",
            Construct::MultipleAssignmentTargets => "multiple assignment targets",
            Construct::ChainedAssignments => "chained assignments",
            Construct::AnnotatedAssignments => "annotated assignments",
            Construct::AugmentedYieldAssignment => "augmented assignment of yield expressions",
            Construct::MultipleStatementsPerLine => "multiple statements on one line",
            Construct::DelStatements => "del statements",
            Construct::PassStatements => "pass statements",
            Construct::BreakStatements => "break statements",
            Construct::ContinueStatements => "continue statements",
            Construct::ReturnStatements => "return statements",
            Construct::RaiseStatements => "raise statements",
            Construct::YieldStatements => "yield statements",
            Construct::ImportStatements => "import statements",
            Construct::GlobalStatements => "global statements",
            Construct::NonlocalStatements => "nonlocal statements",
            Construct::AssertStatements => "assert statements",
            Construct::IfStatements => "if statements",
            Construct::WhileLoops => "while loops",
            Construct::ForLoops => "for loops",
            Construct::TryStatements => "try statements",
            Construct::WithStatements => "with statements",
            Construct::FunctionDefinitions => "function definitions",
            Construct::ClassDefinitions => "class definitions",
            Construct::DecoratedDefinitions => "decorated definitions",
            Construct::AsyncStatements => "async statements",
        };
        text.to_string()
    }

    /// Categories naming a single thing take "is", the rest "are".
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            Construct::Operator(_)
                | Construct::NoneLiteral
                | Construct::Ellipsis
                | Construct::AttributeAccess
                | Construct::ImplicitStringConcatenation
        )
    }

    pub fn is_compound_statement(&self) -> bool {
        matches!(
            self,
            Construct::IfStatements
                | Construct::WhileLoops
                | Construct::ForLoops
                | Construct::TryStatements
                | Construct::WithStatements
                | Construct::FunctionDefinitions
                | Construct::ClassDefinitions
                | Construct::DecoratedDefinitions
                | Construct::AsyncStatements
        )
    }

    /// The construct a compound statement rule represents.
    pub fn for_compound_rule(kind: NodeKind) -> Option<Construct> {
        let construct = match kind {
            NodeKind::IfStmt => Construct::IfStatements,
            NodeKind::WhileStmt => Construct::WhileLoops,
            NodeKind::ForStmt => Construct::ForLoops,
            NodeKind::TryStmt => Construct::TryStatements,
            NodeKind::WithStmt => Construct::WithStatements,
            NodeKind::Funcdef => Construct::FunctionDefinitions,
            NodeKind::Classdef => Construct::ClassDefinitions,
            NodeKind::Decorated => Construct::DecoratedDefinitions,
            NodeKind::AsyncStmt => Construct::AsyncStatements,
            NodeKind::FileInput | NodeKind::SingleInput | NodeKind::EvalInput | NodeKind::Stmt
            | NodeKind::SimpleStmt | NodeKind::SmallStmt | NodeKind::ExprStmt
            | NodeKind::Annassign | NodeKind::Augassign | NodeKind::DelStmt
            | NodeKind::PassStmt | NodeKind::BreakStmt | NodeKind::ContinueStmt
            | NodeKind::ReturnStmt | NodeKind::RaiseStmt | NodeKind::YieldStmt
            | NodeKind::ImportStmt | NodeKind::GlobalStmt | NodeKind::NonlocalStmt
            | NodeKind::AssertStmt | NodeKind::FlowStmt | NodeKind::CompoundStmt
            | NodeKind::TestlistStarExpr | NodeKind::Testlist | NodeKind::Test
            | NodeKind::TestNocond | NodeKind::Lambdef | NodeKind::LambdefNocond
            | NodeKind::OrTest | NodeKind::AndTest | NodeKind::NotTest | NodeKind::Comparison
            | NodeKind::CompOp | NodeKind::StarExpr | NodeKind::Expr | NodeKind::XorExpr
            | NodeKind::AndExpr | NodeKind::ShiftExpr | NodeKind::ArithExpr | NodeKind::Term
            | NodeKind::Factor | NodeKind::Power | NodeKind::AtomExpr | NodeKind::Atom
            | NodeKind::Trailer | NodeKind::TestlistComp | NodeKind::YieldExpr
            | NodeKind::YieldArg => return None,
        };
        Some(construct)
    }

    /// The construct a small-statement rule other than `expr_stmt`
    /// represents. Flow statements are classified by their inner rule.
    pub fn for_small_statement_rule(kind: NodeKind) -> Option<Construct> {
        let construct = match kind {
            NodeKind::DelStmt => Construct::DelStatements,
            NodeKind::PassStmt => Construct::PassStatements,
            NodeKind::BreakStmt => Construct::BreakStatements,
            NodeKind::ContinueStmt => Construct::ContinueStatements,
            NodeKind::ReturnStmt => Construct::ReturnStatements,
            NodeKind::RaiseStmt => Construct::RaiseStatements,
            NodeKind::YieldStmt => Construct::YieldStatements,
            NodeKind::ImportStmt => Construct::ImportStatements,
            NodeKind::GlobalStmt => Construct::GlobalStatements,
            NodeKind::NonlocalStmt => Construct::NonlocalStatements,
            NodeKind::AssertStmt => Construct::AssertStatements,
            NodeKind::FileInput | NodeKind::SingleInput | NodeKind::EvalInput | NodeKind::Stmt
            | NodeKind::SimpleStmt | NodeKind::SmallStmt | NodeKind::ExprStmt
            | NodeKind::Annassign | NodeKind::Augassign | NodeKind::FlowStmt
            | NodeKind::CompoundStmt | NodeKind::IfStmt | NodeKind::WhileStmt
            | NodeKind::ForStmt | NodeKind::TryStmt | NodeKind::WithStmt | NodeKind::Funcdef
            | NodeKind::Classdef | NodeKind::Decorated | NodeKind::AsyncStmt
            | NodeKind::TestlistStarExpr | NodeKind::Testlist | NodeKind::Test
            | NodeKind::TestNocond | NodeKind::Lambdef | NodeKind::LambdefNocond
            | NodeKind::OrTest | NodeKind::AndTest | NodeKind::NotTest | NodeKind::Comparison
            | NodeKind::CompOp | NodeKind::StarExpr | NodeKind::Expr | NodeKind::XorExpr
            | NodeKind::AndExpr | NodeKind::ShiftExpr | NodeKind::ArithExpr | NodeKind::Term
            | NodeKind::Factor | NodeKind::Power | NodeKind::AtomExpr | NodeKind::Atom
            | NodeKind::Trailer | NodeKind::TestlistComp | NodeKind::YieldExpr
            | NodeKind::YieldArg => return None,
        };
        Some(construct)
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_category_names_symbol() {
        assert_eq!(Construct::Operator("//".into()).to_string(), "the `//` operator");
        assert!(Construct::Operator("%".into()).is_singular());
        assert!(!Construct::LambdaExpressions.is_singular());
    }

    #[test]
    fn test_compound_rules_map_to_compound_constructs() {
        let rules = [
            NodeKind::IfStmt,
            NodeKind::WhileStmt,
            NodeKind::ForStmt,
            NodeKind::TryStmt,
            NodeKind::WithStmt,
            NodeKind::Funcdef,
            NodeKind::Classdef,
            NodeKind::Decorated,
            NodeKind::AsyncStmt,
        ];
        for rule in rules {
            let construct = Construct::for_compound_rule(rule);
            assert!(
                construct.as_ref().is_some_and(Construct::is_compound_statement),
                "{rule} should map to a compound statement, got {construct:?}"
            );
        }
        assert_eq!(Construct::for_compound_rule(NodeKind::ExprStmt), None);
    }

    #[test]
    fn test_small_statement_rules() {
        assert_eq!(
            Construct::for_small_statement_rule(NodeKind::PassStmt),
            Some(Construct::PassStatements)
        );
        assert_eq!(
            Construct::for_small_statement_rule(NodeKind::ReturnStmt).map(|c| c.to_string()),
            Some("return statements".to_string())
        );
        assert_eq!(Construct::for_small_statement_rule(NodeKind::FlowStmt), None);
        assert_eq!(Construct::for_small_statement_rule(NodeKind::ExprStmt), None);
    }

    #[test]
    fn test_rule_lookups_are_disjoint() {
        for kind in [
            NodeKind::FileInput,
            NodeKind::CompoundStmt,
            NodeKind::ArithExpr,
            NodeKind::Atom,
            NodeKind::YieldArg,
        ] {
            assert_eq!(Construct::for_compound_rule(kind), None, "{kind}");
            assert_eq!(Construct::for_small_statement_rule(kind), None, "{kind}");
        }
        assert_eq!(Construct::for_small_statement_rule(NodeKind::IfStmt), None);
        assert_eq!(Construct::for_compound_rule(NodeKind::PassStmt), None);
    }
}
