use rusqlite::ToSql;

/// Accumulates AND-ed conditions with their positional parameters
#[derive(Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition whose `?` placeholders consume `values` in order
    pub fn push(&mut self, condition: impl Into<String>, values: Vec<Box<dyn ToSql>>) {
        self.conditions.push(condition.into());
        self.params.extend(values);
    }

    /// Match `term` as a substring of any of `columns`, case-insensitively
    pub fn push_search(&mut self, columns: &[&str], term: &str) {
        let pattern = like_pattern(term);
        let condition = columns
            .iter()
            .map(|column| format!("LOWER({}) LIKE ? ESCAPE '\\'", column))
            .collect::<Vec<_>>()
            .join(" OR ");
        let values = columns
            .iter()
            .map(|_| Box::new(pattern.clone()) as Box<dyn ToSql>)
            .collect();
        self.push(format!("({})", condition), values);
    }

    /// ` WHERE a AND b`, or an empty string without conditions
    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

/// `%term%` with LIKE wildcards in the term escaped. Only ASCII is folded,
/// matching SQLite's `LOWER()`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_ascii_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_clause() {
        let clause = WhereClause::new();
        assert_eq!(clause.sql(), "");
        assert!(clause.params().is_empty());
    }

    #[test]
    fn test_conditions_are_anded() {
        let mut clause = WhereClause::new();
        clause.push("a = ?", vec![Box::new(1i64)]);
        clause.push_search(&["name", "school"], "Ram");

        assert_eq!(
            clause.sql(),
            " WHERE a = ? AND (LOWER(name) LIKE ? ESCAPE '\\' OR LOWER(school) LIKE ? ESCAPE '\\')"
        );
        assert_eq!(clause.params().len(), 3);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Ab"), "%ab%");
        assert_eq!(like_pattern("50%_x"), "%50\\%\\_x%");
    }

    #[test]
    fn test_like_pattern_folds_ascii_only() {
        assert_eq!(like_pattern("ÉMILE"), "%Émile%");
        assert_eq!(like_pattern("संदिग्ध"), "%संदिग्ध%");
    }
}
