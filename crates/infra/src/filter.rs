use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

/// Filter shared by every organization-owned listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub organization_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Escapes `LIKE` wildcards so user input only matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl ListFilter {
    /// Appends `AND ...` clauses; the builder must already hold a `WHERE 1=1`.
    pub fn push_where(&self, query: &mut QueryBuilder<'_, Postgres>, search_columns: &[&str]) {
        if let Some(organization_id) = self.organization_id {
            query.push(" AND organization_id = ");
            query.push_bind(organization_id);
        }

        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() && !search_columns.is_empty() {
                let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
                query.push(" AND (");
                for (i, column) in search_columns.iter().enumerate() {
                    if i > 0 {
                        query.push(" OR ");
                    }
                    query.push(format!("LOWER({column}) LIKE "));
                    query.push_bind(pattern.clone());
                    query.push(" ESCAPE '\\'");
                }
                query.push(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_search_clause_over_all_columns() {
        let filter = ListFilter {
            organization_id: None,
            search: Some("  Hawks ".to_string()),
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT id FROM teams WHERE 1=1");
        filter.push_where(&mut query, &["name", "nick"]);

        assert_eq!(
            query.sql(),
            r"SELECT id FROM teams WHERE 1=1 AND (LOWER(name) LIKE $1 ESCAPE '\' OR LOWER(nick) LIKE $2 ESCAPE '\')"
        );
    }

    #[test]
    fn wildcards_in_search_are_literal() {
        assert_eq!(escape_like("100%"), r"100\%");
        assert_eq!(escape_like("a_b"), r"a\_b");
        assert_eq!(escape_like(r"c:\x"), r"c:\\x");
        assert_eq!(escape_like("hawks"), "hawks");
    }

    #[test]
    fn blank_search_adds_nothing() {
        let filter = ListFilter {
            organization_id: None,
            search: Some("   ".to_string()),
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT id FROM teams WHERE 1=1");
        filter.push_where(&mut query, &["name"]);

        assert_eq!(query.sql(), "SELECT id FROM teams WHERE 1=1");
    }
}
