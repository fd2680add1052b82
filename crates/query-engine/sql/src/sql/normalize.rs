//! Cosmetic clean-up of generator output.
//!
//! Normalization never fails and never changes the meaning of a statement:
//! it removes markdown fences, lower-cases bare identifiers, and re-indents.
//! Garbage in produces garbage out, which the validator then rejects.

use std::sync::OnceLock;

use regex::Regex;
use sqlformat::{FormatOptions, Indent, QueryParams};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Word};

use super::string::NormalizedStatement;

fn language_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?i)```[ \t]*(?:sql|postgresql|postgres|pgsql|psql)\b\s*")
            .expect("valid fence pattern")
    })
}

fn bare_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```\s*").expect("valid fence pattern"))
}

/// Normalize a raw generation candidate.
pub fn normalize(candidate: &str) -> NormalizedStatement {
    let unfenced = strip_fences(candidate);
    let prepared = Prepared::new(unfenced.trim());
    let formatted = sqlformat::format(
        &prepared.text,
        &QueryParams::None,
        FormatOptions {
            indent: Indent::Spaces(2),
            uppercase: true,
            lines_between_queries: 1,
            ..FormatOptions::default()
        },
    );
    NormalizedStatement::new(prepared.restore(formatted.trim()))
}

/// Remove markdown code fences, with or without a language tag.
pub fn strip_fences(candidate: &str) -> String {
    let without_tagged = language_fence().replace_all(candidate, "");
    bare_fence().replace_all(&without_tagged, "").trim().to_string()
}

/// Lower-case every unquoted word. String literals, quoted identifiers,
/// dollar-quoted strings and comments are copied as written. Keywords are
/// lowered too; the formatter upper-cases them again afterwards.
///
/// Text the tokenizer cannot split into tokens is returned unchanged.
pub fn lowercase_identifiers(sql: &str) -> String {
    match source_tokens(sql) {
        Some(tokens) => tokens
            .iter()
            .map(|(token, text)| {
                if is_bare_word(token) {
                    text.to_lowercase()
                } else {
                    (*text).to_string()
                }
            })
            .collect(),
        None => sql.to_string(),
    }
}

/// Marks a stand-in literal. Statements already containing it get no stand-ins.
const SHIELD: char = '\u{1}';

/// Statement text ready for the formatter.
///
/// The formatter splits prefixed literals such as `E'...'` into a word and a
/// plain string, which changes their meaning. Those literals are swapped for
/// plain stand-in strings before formatting and put back afterwards.
struct Prepared {
    text: String,
    shielded: Vec<(String, String)>,
}

impl Prepared {
    fn new(sql: &str) -> Self {
        let Some(tokens) = source_tokens(sql) else {
            return Prepared {
                text: sql.to_string(),
                shielded: vec![],
            };
        };
        let can_shield = !sql.contains(SHIELD);

        let mut text = String::with_capacity(sql.len());
        let mut shielded = vec![];
        for (token, source) in tokens {
            if is_bare_word(&token) {
                text.push_str(&source.to_lowercase());
            } else if can_shield && is_prefixed_literal(&token) {
                let stand_in = format!("'{SHIELD}{}'", shielded.len());
                text.push_str(&stand_in);
                shielded.push((stand_in, source.to_string()));
            } else {
                text.push_str(source);
            }
        }
        Prepared { text, shielded }
    }

    fn restore(&self, formatted: &str) -> String {
        self.shielded
            .iter()
            .fold(formatted.to_string(), |text, (stand_in, original)| {
                text.replacen(stand_in.as_str(), original, 1)
            })
    }
}

fn is_bare_word(token: &Token) -> bool {
    matches!(
        token,
        Token::Word(Word {
            quote_style: None,
            ..
        })
    )
}

fn is_prefixed_literal(token: &Token) -> bool {
    matches!(
        token,
        Token::EscapedStringLiteral(_) | Token::NationalStringLiteral(_) | Token::HexStringLiteral(_)
    )
}

/// Split `sql` into PostgreSQL tokens, each paired with the exact source text
/// it was read from.
fn source_tokens(sql: &str) -> Option<Vec<(Token, &str)>> {
    let located = Tokenizer::new(&PostgreSqlDialect {}, sql)
        .tokenize_with_location()
        .ok()?;

    // Byte offset of every character, plus one past the end.
    let offsets: Vec<usize> = sql
        .char_indices()
        .map(|(at, _)| at)
        .chain(std::iter::once(sql.len()))
        .collect();
    // Character index at which each line starts.
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(
            sql.chars()
                .enumerate()
                .filter(|(_, c)| *c == '\n')
                .map(|(at, _)| at + 1),
        )
        .collect();

    let starts = located
        .iter()
        .map(|located| {
            let line = usize::try_from(located.location.line).ok()?;
            let column = usize::try_from(located.location.column).ok()?;
            let line_start = line_starts.get(line.checked_sub(1)?)?;
            offsets.get(line_start + column.checked_sub(1)?).copied()
        })
        .collect::<Option<Vec<usize>>>()?;

    let ends = starts.iter().skip(1).copied().chain(std::iter::once(sql.len()));
    located
        .into_iter()
        .zip(starts.iter().copied().zip(ends))
        .map(|(located, (start, end))| Some((located.token, sql.get(start..end)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn strips_tagged_fences() {
        assert_eq!(
            strip_fences("```sql\nSELECT 1\n```"),
            "SELECT 1".to_string()
        );
        assert_eq!(strip_fences("```SQL SELECT 1```"), "SELECT 1".to_string());
        assert_eq!(
            strip_fences("```postgresql\nSELECT 1\n```\n"),
            "SELECT 1".to_string()
        );
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(strip_fences("```\nSELECT 1\n```"), "SELECT 1".to_string());
        assert_eq!(strip_fences("  SELECT 1  "), "SELECT 1".to_string());
    }

    #[test]
    fn lowercases_outside_literals() {
        assert_eq!(
            lowercase_identifiers("SELECT Address FROM Balances WHERE TokenStandard = 'ZTS1ZNN'"),
            "select address from balances where tokenstandard = 'ZTS1ZNN'"
        );
    }

    #[test]
    fn keeps_quoted_identifiers_and_escaped_quotes() {
        assert_eq!(
            lowercase_identifiers(r#"SELECT "ProducerName" FROM Momentums WHERE Name = 'It''S'"#),
            r#"select "ProducerName" from momentums where name = 'It''S'"#
        );
    }

    #[test]
    fn keeps_escape_strings() {
        assert_eq!(
            lowercase_identifiers(r"SELECT E'A\'B C' AS X"),
            r"select E'A\'B C' as x"
        );
    }

    #[test]
    fn keeps_dollar_quotes_and_comments_but_not_parameters() {
        assert_eq!(
            lowercase_identifiers("SELECT $Tag$Mixed Case$Tag$, $1 FROM T -- Note\n/* Block */"),
            "select $Tag$Mixed Case$Tag$, $1 from t -- Note\n/* Block */"
        );
    }

    #[test]
    fn untokenizable_text_is_copied_verbatim() {
        assert_eq!(lowercase_identifiers("SELECT 'ABC"), "SELECT 'ABC");
    }

    #[test]
    fn nested_block_comments_are_kept_whole() {
        assert_eq!(
            lowercase_identifiers("SELECT /* Outer /* Inner */ STILL Comment */ X"),
            "select /* Outer /* Inner */ STILL Comment */ x"
        );
    }

    #[test]
    fn multi_line_statements_keep_their_literals() {
        assert_eq!(
            lowercase_identifiers("SELECT Address,\n  'Mixed\nCase' AS Label\nFROM Balances"),
            "select address,\n  'Mixed\nCase' as label\nfrom balances"
        );
    }

    #[test]
    fn escape_strings_survive_formatting() {
        let normalized = normalize(r"SELECT E'It\'s' AS S");
        assert_eq!(normalized.as_str(), "SELECT\n  E'It\\'s' AS s");
    }

    #[test]
    fn prefixed_literals_survive_formatting() {
        let normalized = normalize("SELECT N'Zenon' AS Network, X'1F' AS Flag, e'a\\tb' AS Tab");
        let text = normalized.as_str();
        assert!(text.contains("N'Zenon'"), "{text}");
        assert!(text.contains("X'1F'"), "{text}");
        assert!(text.contains(r"e'a\tb'"), "{text}");
        assert!(!text.contains('\u{1}'), "{text}");
    }

    #[test]
    fn upper_cases_keywords_and_lower_cases_identifiers() {
        let normalized = normalize("```sql\nselect Address, Balance from Balances where TokenStandard = 'zts1ZNN' limit 10;\n```");
        let text = normalized.as_str();
        assert!(text.starts_with("SELECT"), "{text}");
        assert!(text.contains("FROM"), "{text}");
        assert!(text.contains("WHERE"), "{text}");
        assert!(text.contains("LIMIT"), "{text}");
        assert!(text.contains("balances"), "{text}");
        assert!(text.contains("tokenstandard"), "{text}");
        assert!(text.contains("'zts1ZNN'"), "{text}");
        assert!(!text.contains("```"), "{text}");
    }

    #[test]
    fn normalization_is_idempotent() {
        let candidates = [
            "SELECT b.address, b.balance / 100000000.0 AS znn_balance FROM balances b WHERE b.tokenstandard = 'zts1znnxxxxxxxxxxxxx9z4ulx' ORDER BY b.balance DESC LIMIT 10;",
            "select name, owneraddress from pillars where isrevoked = false order by rank asc",
            "SELECT COUNT(*) AS n FROM accountblocks WHERE momentumtimestamp > 1000 GROUP BY address HAVING COUNT(*) > 2",
            "SELECT 1; SELECT 2;",
            r"SELECT E'It\'s' AS s, name FROM pillars",
            "DROP TABLE accounts;",
            "",
        ];
        for candidate in candidates {
            let once = normalize(candidate);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "candidate: {candidate}");
        }
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert!(normalize("```sql\n```").is_empty());
        assert!(normalize("   ").is_empty());
    }
}
