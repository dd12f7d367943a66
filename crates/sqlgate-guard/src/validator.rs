//! Safety validation of candidate queries.
//!
//! Two independent checks must both pass:
//!
//! 1. **Denylist**: the lower-cased text must not contain any of
//!    [`FORBIDDEN_KEYWORDS`] as a substring. Matching is not
//!    token-aware, so identifiers and string literals that merely contain a
//!    keyword (`updates`, `created_at`, `'please delete me'`) are rejected too.
//! 2. **Statement shape**: the text is tokenized and split on `;`. There must
//!    be at least one non-blank statement, and the first token of the first
//!    statement must start with `select` (case-insensitive).
//!
//! In [`ValidationMode::Compatible`] only the first statement is inspected, so
//! `SELECT 1; VACUUM` passes this validator. [`ValidationMode::Strict`] closes
//! that gap by requiring exactly one statement that parses as a query. Strict
//! mode also rejects text ending in a `--` comment, since the row limit
//! appended afterwards would land inside the comment.

use sqlgate_core::ValidationMode;
use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};
use std::fmt;

/// Operation keywords that may not appear anywhere in a candidate.
pub const FORBIDDEN_KEYWORDS: [&str; 9] = [
    "insert", "update", "delete", "drop", "alter", "truncate", "create", "grant", "revoke",
];

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    /// A forbidden keyword occurs somewhere in the text.
    Forbidden { keyword: &'static str },
    /// No statements after tokenizing.
    Empty,
    /// The first statement does not lead with `select`.
    NotSelect { leading: String },
    /// Strict mode only: more than one statement.
    MultipleStatements { count: usize },
    /// Strict mode only: the text ends in a line comment.
    TrailingLineComment,
    /// The text could not be tokenized, or (strict mode) parsed as one query.
    Unparseable { reason: String },
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => write!(f, "safe"),
            Verdict::Forbidden { keyword } => write!(f, "contains forbidden keyword '{}'", keyword),
            Verdict::Empty => write!(f, "no statement found"),
            Verdict::NotSelect { leading } => {
                write!(f, "statement starts with '{}', expected SELECT", leading)
            }
            Verdict::MultipleStatements { count } => {
                write!(f, "{} statements found, expected exactly one", count)
            }
            Verdict::TrailingLineComment => write!(f, "ends with a line comment"),
            Verdict::Unparseable { reason } => write!(f, "could not parse: {}", reason),
        }
    }
}

/// Decides whether a candidate query may be executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyValidator {
    mode: ValidationMode,
}

impl SafetyValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    /// `true` when the candidate passes every check.
    pub fn is_safe(&self, candidate: &str) -> bool {
        self.verdict(candidate).is_safe()
    }

    /// Validate `candidate` and explain the outcome.
    pub fn verdict(&self, candidate: &str) -> Verdict {
        let lower = candidate.to_lowercase();
        if let Some(keyword) = FORBIDDEN_KEYWORDS.into_iter().find(|kw| lower.contains(kw)) {
            return Verdict::Forbidden { keyword };
        }

        let tokens = match Tokenizer::new(&PostgreSqlDialect {}, candidate).tokenize() {
            Ok(tokens) => tokens,
            Err(e) => {
                return Verdict::Unparseable {
                    reason: e.to_string(),
                };
            }
        };
        let statements = split_statements(&tokens);

        let Some(first) = statements.first() else {
            return Verdict::Empty;
        };

        // Blank statements are filtered out, so there is always a leading token.
        let leading = first.first().map(Token::to_string).unwrap_or_default();
        if !leading.to_lowercase().starts_with("select") {
            return Verdict::NotSelect { leading };
        }

        if self.mode == ValidationMode::Strict {
            if statements.len() > 1 {
                return Verdict::MultipleStatements {
                    count: statements.len(),
                };
            }
            if ends_with_line_comment(&tokens) {
                return Verdict::TrailingLineComment;
            }
            return match Parser::parse_sql(&PostgreSqlDialect {}, candidate) {
                Ok(parsed) if parsed.len() == 1 && matches!(parsed[0], Statement::Query(_)) => {
                    Verdict::Safe
                }
                Ok(parsed) => Verdict::Unparseable {
                    reason: format!("expected a single query, got {} statement(s)", parsed.len()),
                },
                Err(e) => Verdict::Unparseable {
                    reason: e.to_string(),
                },
            };
        }

        Verdict::Safe
    }
}

/// Split a token stream on `;` into statements.
///
/// Each statement starts at its first token that is not a space, tab or
/// newline (a leading comment is kept, and is not `select`). Statements made
/// only of whitespace and comments are dropped.
fn split_statements(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut statements = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::SemiColon => {
                push_statement(&mut statements, std::mem::take(&mut current));
            }
            Token::EOF => {}
            Token::Whitespace(Whitespace::Space | Whitespace::Tab | Whitespace::Newline)
                if current.is_empty() => {}
            other => current.push(other.clone()),
        }
    }
    push_statement(&mut statements, current);

    statements
}

fn ends_with_line_comment(tokens: &[Token]) -> bool {
    let last = tokens.iter().rev().find(|t| {
        !matches!(
            t,
            Token::EOF | Token::Whitespace(Whitespace::Space | Whitespace::Tab | Whitespace::Newline)
        )
    });
    matches!(last, Some(Token::Whitespace(Whitespace::SingleLineComment { .. })))
}

fn push_statement(statements: &mut Vec<Vec<Token>>, statement: Vec<Token>) {
    if statement.iter().any(|t| !matches!(t, Token::Whitespace(_))) {
        statements.push(statement);
    }
}
