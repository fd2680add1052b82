//! Text-level checks over a candidate statement.
//!
//! These deliberately look at the raw text, including string literals and
//! comments, and never try to understand SQL. They catch what the parser-based
//! checks in [`super::structure`] might let through, and the other way around.

use std::sync::OnceLock;

use regex::Regex;

/// Keywords whose presence anywhere in a statement causes rejection.
pub const FORBIDDEN_KEYWORDS: [&str; 8] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "EXEC", "EXECUTE",
];

/// A statement-chaining or comment-smuggling pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenPattern {
    /// `;` followed anywhere later by a forbidden keyword.
    ChainedKeyword,
    /// `;` followed by a line comment.
    SemicolonComment,
    /// A `/* ... */` region.
    BlockComment,
    /// A line comment followed anywhere later by `;`.
    CommentedSemicolon,
}

impl ForbiddenPattern {
    const ALL: [ForbiddenPattern; 4] = [
        ForbiddenPattern::ChainedKeyword,
        ForbiddenPattern::SemicolonComment,
        ForbiddenPattern::BlockComment,
        ForbiddenPattern::CommentedSemicolon,
    ];

    pub fn description(self) -> &'static str {
        match self {
            ForbiddenPattern::ChainedKeyword => "a semicolon followed by a forbidden keyword",
            ForbiddenPattern::SemicolonComment => "a semicolon followed by a line comment",
            ForbiddenPattern::BlockComment => "a block comment",
            ForbiddenPattern::CommentedSemicolon => "a line comment followed by a semicolon",
        }
    }

    fn regex(self) -> &'static Regex {
        static CHAINED: OnceLock<Regex> = OnceLock::new();
        static SEMICOLON_COMMENT: OnceLock<Regex> = OnceLock::new();
        static BLOCK_COMMENT: OnceLock<Regex> = OnceLock::new();
        static COMMENTED_SEMICOLON: OnceLock<Regex> = OnceLock::new();

        match self {
            ForbiddenPattern::ChainedKeyword => CHAINED.get_or_init(|| {
                compile(&format!(r"(?is);.*\b(?:{})\b", FORBIDDEN_KEYWORDS.join("|")))
            }),
            ForbiddenPattern::SemicolonComment => {
                SEMICOLON_COMMENT.get_or_init(|| compile(r";\s*--"))
            }
            ForbiddenPattern::BlockComment => BLOCK_COMMENT.get_or_init(|| compile(r"(?s)/\*.*\*/")),
            ForbiddenPattern::CommentedSemicolon => {
                COMMENTED_SEMICOLON.get_or_init(|| compile(r"(?s)--.*;"))
            }
        }
    }
}

fn keyword_regex() -> &'static Regex {
    static KEYWORDS: OnceLock<Regex> = OnceLock::new();
    KEYWORDS.get_or_init(|| compile(&format!(r"(?i)\b({})\b", FORBIDDEN_KEYWORDS.join("|"))))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("forbidden-pattern regexes are valid")
}

/// Find the first forbidden keyword appearing as a whole token, ignoring case.
/// Returns the keyword in upper case.
pub fn find_forbidden_keyword(sql: &str) -> Option<String> {
    keyword_regex()
        .captures(sql)
        .and_then(|captures| captures.get(1))
        .map(|keyword| keyword.as_str().to_uppercase())
}

/// Find the first statement-chaining pattern present in the text.
pub fn find_forbidden_pattern(sql: &str) -> Option<ForbiddenPattern> {
    ForbiddenPattern::ALL
        .into_iter()
        .find(|pattern| pattern.regex().is_match(sql))
}
