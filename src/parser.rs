//! Best-effort SQL summarizing for span names.
//!
//! Naming is diagnostic-only: anything this module cannot classify comes
//! back as a generic label, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

static FROM_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bFROM\s+[`"\[]?(\w+)"#).unwrap());

static INTO_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bINTO\s+[`"\[]?(\w+)"#).unwrap());

static UPDATE_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bUPDATE\s+[`"\[]?(\w+)"#).unwrap());

static TABLE_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bTABLE\s+(?:IF\s+(?:NOT\s+)?EXISTS\s+)?[`"\[]?(\w+)"#).unwrap()
});

static TRUNCATE_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bTRUNCATE\s+(?:TABLE\s+)?[`"\[]?(\w+)"#).unwrap());

/// First keyword of the statement, upper-cased.
fn leading_keyword(sql: &str) -> Option<String> {
    let token: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if token.is_empty() {
        None
    } else {
        Some(token.to_ascii_uppercase())
    }
}

/// Map a leading keyword to the verb used in span names.
fn classify(keyword: &str) -> Option<&'static str> {
    match keyword {
        "SELECT" | "WITH" => Some("SELECT"),
        "INSERT" => Some("INSERT"),
        "REPLACE" => Some("REPLACE"),
        "UPDATE" => Some("UPDATE"),
        "DELETE" => Some("DELETE"),
        "CREATE" => Some("CREATE"),
        "DROP" => Some("DROP"),
        "ALTER" => Some("ALTER"),
        "TRUNCATE" => Some("TRUNCATE"),
        "BEGIN" | "START" => Some("BEGIN"),
        "COMMIT" => Some("COMMIT"),
        "ROLLBACK" => Some("ROLLBACK"),
        "SET" => Some("SET"),
        _ => None,
    }
}

/// Primary table targeted by the statement, when one can be determined.
fn table_name(verb: &str, sql: &str) -> Option<String> {
    let pattern = match verb {
        "SELECT" | "DELETE" => &*FROM_TABLE,
        "INSERT" | "REPLACE" => &*INTO_TABLE,
        "UPDATE" => &*UPDATE_TABLE,
        "CREATE" | "DROP" | "ALTER" => &*TABLE_CLAUSE,
        "TRUNCATE" => &*TRUNCATE_TARGET,
        _ => return None,
    };

    pattern
        .captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Summarize a statement as `"VERB table"`, or `"VERB"` when no table can be
/// extracted, or `"QUERY"` when the statement is unrecognizable.
pub(crate) fn statement_summary(sql: &str) -> String {
    let Some(verb) = leading_keyword(sql).as_deref().and_then(classify) else {
        return "QUERY".to_owned();
    };

    match table_name(verb, sql) {
        Some(table) => format!("{verb} {table}"),
        None => verb.to_owned(),
    }
}
