// src/repositories/query.rs
//
// Id-selection query composer
//
// PRINCIPLES:
// - A criterion that is absent adds nothing (no join, no predicate)
// - Joins are keyed; two criteria on the same relation share one join
// - Values are always bound, never spliced into SQL text
// - Substring needles are escaped, so `%` and `_` match literally
// - Predicates are AND-ed, so their order never changes the matched set

use rusqlite::types::Value;

/// A rendered `SELECT DISTINCT <key> ...` with its bound parameters,
/// in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct IdQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl IdQuery {
    /// True when no criterion restricted the selection
    pub fn is_unrestricted(&self) -> bool {
        self.params.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    key: &'static str,
    from: &'static str,
    joins: Vec<(&'static str, String)>,
    predicates: Vec<String>,
    params: Vec<Value>,
}

impl SelectBuilder {
    /// `key` is the selected id column (e.g. `i.id`), `from` the aliased
    /// base table (e.g. `idol i`).
    pub fn new(key: &'static str, from: &'static str) -> Self {
        Self {
            key,
            from,
            joins: Vec::new(),
            predicates: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add a join unless one with the same key is already present
    pub fn join(&mut self, key: &'static str, clause: impl Into<String>) -> &mut Self {
        if !self.joins.iter().any(|(existing, _)| *existing == key) {
            self.joins.push((key, clause.into()));
        }
        self
    }

    /// Add a predicate with exactly one `?` placeholder
    pub fn filter(&mut self, predicate: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.predicates.push(predicate.into());
        self.params.push(value.into());
        self
    }

    /// Add a predicate whose placeholders are bound to `values` in order
    pub fn filter_many(&mut self, predicate: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.predicates.push(predicate.into());
        self.params.extend(values);
        self
    }

    /// Substring match on one column
    pub fn contains(&mut self, column: &str, needle: &str) -> &mut Self {
        self.filter(substring_clause(column), substring_pattern(needle))
    }

    /// Substring match on any of `columns`, each bound to the same needle
    pub fn contains_any(&mut self, columns: &[&str], needle: &str) -> &mut Self {
        let predicate = columns
            .iter()
            .map(|c| substring_clause(c))
            .collect::<Vec<_>>()
            .join(" OR ");
        let values = columns
            .iter()
            .map(|_| Value::Text(substring_pattern(needle)))
            .collect();
        self.filter_many(format!("({})", predicate), values)
    }

    pub fn build(&self) -> IdQuery {
        let mut sql = format!("SELECT DISTINCT {} FROM {}", self.key, self.from);
        for (_, clause) in &self.joins {
            sql.push(' ');
            sql.push_str(clause);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }

        IdQuery {
            sql,
            params: self.params.clone(),
        }
    }
}

/// Escape character used by every substring clause
pub const LIKE_ESCAPE: char = '\\';

/// `<column> LIKE ? ESCAPE '\'`, to be bound with `substring_pattern`
pub fn substring_clause(column: &str) -> String {
    format!("{} LIKE ? ESCAPE '{}'", column, LIKE_ESCAPE)
}

/// `%needle%` with LIKE metacharacters in `needle` escaped
pub fn substring_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// A free-text criterion counts only when it has non-whitespace content.
/// The raw value is what gets bound.
pub fn text_criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_selects_everything() {
        let query = SelectBuilder::new("i.id", "idol i").build();

        assert_eq!(query.sql, "SELECT DISTINCT i.id FROM idol i");
        assert!(query.params.is_empty());
        assert!(query.is_unrestricted());
    }

    #[test]
    fn test_joins_are_deduplicated_by_key() {
        let mut builder = SelectBuilder::new("i.id", "idol i");
        builder
            .join("membership", "JOIN idol_group ig ON ig.idol_id = i.id")
            .contains("g.name", "DLE")
            .join("membership", "JOIN idol_group ig ON ig.idol_id = i.id")
            .contains("c.name", "Cube");

        let query = builder.build();
        assert_eq!(query.sql.matches("JOIN idol_group").count(), 1);
        assert_eq!(
            query.params,
            vec![Value::Text("%DLE%".into()), Value::Text("%Cube%".into())]
        );
    }

    #[test]
    fn test_predicates_are_and_ed_with_bound_values() {
        let mut builder = SelectBuilder::new("m.id", "media_content m");
        builder.filter("m.type = ?", "movie".to_string()).filter("m.id = ?", 7i64);

        let query = builder.build();
        assert_eq!(
            query.sql,
            "SELECT DISTINCT m.id FROM media_content m WHERE m.type = ? AND m.id = ?"
        );
        assert_eq!(query.params, vec![Value::Text("movie".into()), Value::Integer(7)]);
    }

    #[test]
    fn test_contains_any_binds_needle_per_column() {
        let mut builder = SelectBuilder::new("i.id", "idol i");
        builder.contains_any(&["i.name", "i.korean_name"], "소연");

        let query = builder.build();
        assert!(query.sql.ends_with(
            "WHERE (i.name LIKE ? ESCAPE '\\' OR i.korean_name LIKE ? ESCAPE '\\')"
        ));
        assert_eq!(query.params, vec![Value::Text("%소연%".into()); 2]);
    }

    #[test]
    fn test_quotes_never_reach_sql_text() {
        let mut builder = SelectBuilder::new("i.id", "idol i");
        builder.contains("i.name", "O'Brien'; DROP TABLE idol; --");

        let query = builder.build();
        assert!(!query.sql.contains("O'Brien"));
    }

    #[test]
    fn test_substring_pattern_escapes_wildcards() {
        assert_eq!(substring_pattern("Yuqi"), "%Yuqi%");
        assert_eq!(substring_pattern("_"), "%\\_%");
        assert_eq!(substring_pattern("S%n"), "%S\\%n%");
        assert_eq!(substring_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_escaped_pattern_matches_literally() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let hit = |haystack: &str, needle: &str| -> bool {
            conn.query_row(
                &format!("SELECT {}", substring_clause("?1")),
                rusqlite::params![haystack, substring_pattern(needle)],
                |row| row.get(0),
            )
            .unwrap()
        };

        assert!(hit("Soyeon", "yeo"));
        assert!(hit("Soyeon", "SOY"));
        assert!(!hit("Soyeon", "_"));
        assert!(!hit("Soyeon", "S%n"));
        assert!(!hit("axb", "a_b"));
        assert!(hit("100% Real", "0% R"));
        assert!(hit("snake_case", "e_c"));
        assert!(hit("C:\\idol", ":\\i"));
    }

    #[test]
    fn test_blank_text_criterion_is_absent() {
        assert_eq!(text_criterion(&None), None);
        assert_eq!(text_criterion(&Some("   ".to_string())), None);
        assert_eq!(text_criterion(&Some(" Yuqi".to_string())), Some(" Yuqi"));
    }
}
