//! # Cypher statement handling
//!
//! The pipeline treats statements as opaque text. Two operations still need
//! to see clause structure:
//!
//! - [`inject_limit`] caps a statement's result set before visualization.
//! - [`extract_statement`] isolates the statement in a model completion.
//!
//! Both work on the token stream from [`lexer`]; neither validates grammar.

pub mod lexer;

use lexer::{Token, TokenKind};
use crate::Result;

/// Insert `WITH * LIMIT <cap>` before the final top-level `RETURN` of each
/// `UNION` branch.
///
/// A statement without a top-level `RETURN` is returned unchanged.
pub fn inject_limit(statement: &str, cap: usize) -> Result<String> {
    let tokens = lexer::tokenize(statement)?;
    let positions = final_return_positions(&tokens);

    let mut capped = statement.to_string();
    for pos in positions.into_iter().rev() {
        capped.insert_str(pos, &format!("WITH * LIMIT {cap} "));
    }
    Ok(capped)
}

/// Byte offsets of the projection clause ending each top-level branch.
fn final_return_positions(tokens: &[Token]) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut last_return = None;
    for token in tokens.iter().filter(|t| t.depth == 0) {
        match token.kind {
            TokenKind::Return => last_return = Some(token.span.start),
            TokenKind::Union | TokenKind::Eof => positions.extend(last_return.take()),
            _ => {}
        }
    }
    positions
}

/// Isolate a statement in a language-model completion.
///
/// Strips a markdown code fence and a leading `<dialect>:` label, then takes
/// text from the first line that opens with a statement keyword up to the
/// next blank line or the next `Question:`/`<dialect>:` pair marker. Lines
/// that look like clauses win over keyword-led prose ("With pleasure!").
/// `None` when no line opens with a statement keyword.
pub fn extract_statement(completion: &str, dialect: &str) -> Option<String> {
    let lines: Vec<&str> = strip_code_fence(completion).lines().collect();
    let head = |i: usize| strip_label(lines[i].trim(), dialect);

    let openers: Vec<usize> = (0..lines.len()).filter(|&i| opens_statement(head(i))).collect();
    let start = openers
        .iter()
        .copied()
        .find(|&i| clause_shaped(head(i)))
        .or_else(|| openers.first().copied())?;

    let mut statement = vec![head(start)];
    for raw in &lines[start + 1..] {
        let line = raw.trim();
        if line.is_empty() || has_label(line, "Question") || has_label(line, dialect) {
            break;
        }
        statement.push(raw.trim_end());
    }

    let statement = statement.join("\n");
    let statement = statement.trim();
    (!statement.is_empty()).then(|| statement.to_string())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_fence = &text[open + 3..];
    // Skip the info string (```cypher).
    let body = match after_fence.find('\n') {
        Some(nl) => &after_fence[nl + 1..],
        None => after_fence,
    };
    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// `line` starts with `<label>:`, label compared case-insensitively.
fn has_label(line: &str, label: &str) -> bool {
    line.get(..label.len()).is_some_and(|head| head.eq_ignore_ascii_case(label))
        && line[label.len()..].starts_with(':')
}

fn strip_label<'a>(line: &'a str, dialect: &str) -> &'a str {
    if has_label(line, dialect) {
        line[dialect.len() + 1..].trim_start()
    } else {
        line
    }
}

fn opens_statement(line: &str) -> bool {
    let word_end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    word_end > 0 && lexer::keyword_or_ident(&line[..word_end]).starts_statement()
}

/// After its leading keyword the line has a pattern, parameter or another
/// clause keyword. Lines that do not scan are prose.
fn clause_shaped(line: &str) -> bool {
    let Ok(tokens) = lexer::tokenize(line) else {
        return false;
    };
    tokens
        .iter()
        .skip(1)
        .any(|t| matches!(t.kind, TokenKind::Open | TokenKind::Parameter) || t.kind.is_keyword())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_limit_before_return() {
        let capped = inject_limit("MATCH (m:Movie)<-[:DIRECTED]-(d) RETURN d.name", 50).unwrap();
        assert_eq!(capped, "MATCH (m:Movie)<-[:DIRECTED]-(d) WITH * LIMIT 50 RETURN d.name");
    }

    #[test]
    fn test_inject_limit_only_final_return() {
        let capped = inject_limit(
            "CALL { MATCH (n:Movie) RETURN n } WITH n MATCH (n)<-[r]-(p) RETURN n, r, p",
            10,
        ).unwrap();
        assert_eq!(
            capped,
            "CALL { MATCH (n:Movie) RETURN n } WITH n MATCH (n)<-[r]-(p) WITH * LIMIT 10 RETURN n, r, p"
        );
    }

    #[test]
    fn test_inject_limit_each_union_branch() {
        let capped = inject_limit(
            "MATCH (p:Person) RETURN p.name AS name UNION MATCH (g:Genre) RETURN g.name AS name",
            5,
        ).unwrap();
        assert_eq!(
            capped,
            "MATCH (p:Person) WITH * LIMIT 5 RETURN p.name AS name UNION \
             MATCH (g:Genre) WITH * LIMIT 5 RETURN g.name AS name"
        );
    }

    #[test]
    fn test_inject_limit_ignores_return_in_literal() {
        let capped = inject_limit("MATCH (m {title: 'RETURN'}) return m", 50).unwrap();
        assert_eq!(capped, "MATCH (m {title: 'RETURN'}) WITH * LIMIT 50 return m");
    }

    #[test]
    fn test_inject_limit_without_return_is_unchanged() {
        let stmt = "MERGE (g:Genre {name: 'Noir'})";
        assert_eq!(inject_limit(stmt, 50).unwrap(), stmt);
    }

    #[test]
    fn test_inject_limit_rejects_unterminated_string() {
        assert!(inject_limit("MATCH (m {title: 'Heat}) RETURN m", 50).is_err());
    }

    #[test]
    fn test_extract_plain_statement() {
        let stmt = extract_statement(" MATCH (m:Movie) RETURN m.title \n", "Cypher");
        assert_eq!(stmt.as_deref(), Some("MATCH (m:Movie) RETURN m.title"));
    }

    #[test]
    fn test_extract_strips_label_and_fence() {
        let completion = "Here is the query:\n```cypher\nCypher: MATCH (m:Movie {title: 'Inception'})\nRETURN m\n```\nHope it helps.";
        let stmt = extract_statement(completion, "Cypher");
        assert_eq!(stmt.as_deref(), Some("MATCH (m:Movie {title: 'Inception'})\nRETURN m"));
    }

    #[test]
    fn test_extract_stops_at_blank_line() {
        let completion = "MATCH (p:Person)\nRETURN p.name\n\nThis returns every person.";
        let stmt = extract_statement(completion, "Cypher");
        assert_eq!(stmt.as_deref(), Some("MATCH (p:Person)\nRETURN p.name"));
    }

    #[test]
    fn test_extract_skips_echoed_question() {
        let completion = "Question: Who directed Heat?\nCypher: MATCH (m:Movie {title: 'Heat'})<-[:DIRECTED]-(d) RETURN d.name";
        let stmt = extract_statement(completion, "Cypher");
        assert_eq!(
            stmt.as_deref(),
            Some("MATCH (m:Movie {title: 'Heat'})<-[:DIRECTED]-(d) RETURN d.name")
        );
    }

    #[test]
    fn test_extract_stops_at_next_question() {
        let completion = "MATCH (m:Movie) RETURN m\nQuestion: Who acted in Heat?\nCypher: MATCH (a) RETURN a";
        assert_eq!(extract_statement(completion, "Cypher").as_deref(), Some("MATCH (m:Movie) RETURN m"));
    }

    #[test]
    fn test_extract_stops_at_dialect_label() {
        let completion = "MATCH (m:Movie)\nRETURN m.title\ncypher: MATCH (p:Person) RETURN p";
        assert_eq!(extract_statement(completion, "Cypher").as_deref(), Some("MATCH (m:Movie)\nRETURN m.title"));
    }

    #[test]
    fn test_extract_skips_keyword_led_prose() {
        let completion = "With pleasure! Here is the query:\nMATCH (m:Movie {title: 'Heat'}) RETURN m";
        assert_eq!(
            extract_statement(completion, "Cypher").as_deref(),
            Some("MATCH (m:Movie {title: 'Heat'}) RETURN m")
        );
    }

    #[test]
    fn test_extract_falls_back_to_bare_statement() {
        assert_eq!(extract_statement("RETURN 1", "Cypher").as_deref(), Some("RETURN 1"));
    }

    #[test]
    fn test_extract_none_without_keyword() {
        assert_eq!(extract_statement("", "Cypher"), None);
        assert_eq!(extract_statement("I don't know.", "Cypher"), None);
        assert_eq!(extract_statement("Matches are hard", "Cypher"), None);
    }
}
