use std::fmt;

/// Error codes for all lowering diagnostics.
///
/// Format: E#### where first digit indicates the failure class:
/// - E0xxx: Syntax errors (parser rejection, malformed trees)
/// - E1xxx: Constructs outside the supported subset
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax Errors (E0xxx)
    /// The grammar parser rejected the input, or the tree does not match
    /// the grammar
    E0001,

    // Subset Errors (E1xxx)
    /// Construct not allowed in the supported subset
    E1001,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: [ErrorCode; 2] = [ErrorCode::E0001, ErrorCode::E1001];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E1001 => "E1001",
        }
    }

    /// One-line description for `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "syntax error",
            ErrorCode::E1001 => "construct not allowed",
        }
    }

    /// Check if this is a syntax error (E0xxx).
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, ErrorCode::E0001)
    }

    /// Check if this reports a construct outside the subset (E1xxx).
    pub fn is_subset_error(&self) -> bool {
        matches!(self, ErrorCode::E1001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
