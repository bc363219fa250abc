//! Query descriptions and the SQL they turn into.

use sea_orm::{DbBackend, Statement, Value};

use super::resource::{Resource, Table};
use super::values::{ColumnValue, ContentValues};

/// A `WHERE` fragment with positional `?` arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<ColumnValue>,
}

impl Selection {
    pub fn new<I, V>(clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ColumnValue>,
    {
        Self {
            clause: clause.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `column = ?` bound to `value`.
    pub fn eq(column: &str, value: impl Into<ColumnValue>) -> Self {
        Self::new(format!("{column} = ?"), [value])
    }

    /// A blank clause matches every row, the same as no selection at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.clause.trim().is_empty()
    }
}

/// The selection that actually filters; blank ones are dropped with their args.
fn effective(selection: Option<&Selection>) -> Option<&Selection> {
    selection.filter(|s| !s.is_blank())
}

/// Projection, filter and ordering for a provider query.
///
/// Projection entries and the sort order are SQL fragments supplied by the
/// caller, the same trust boundary as the selection clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub projection: Option<Vec<String>>,
    pub selection: Option<Selection>,
    pub sort_order: Option<String>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    #[must_use]
    pub fn filter<I, V>(self, clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ColumnValue>,
    {
        self.selection(Selection::new(clause, args))
    }

    #[must_use]
    pub fn order_by(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }
}

/// `FROM` clause of the movie-with-trailers-and-reviews view.
const MOVIE_WITH_EXTRAS_FROM: &str = "movie \
     LEFT JOIN trailer ON movie.movie_id = trailer.movie_key \
     LEFT JOIN review ON movie.movie_id = review.movie_key";

const MOVIE_ID_SELECTION: &str = "movie.movie_id = ?";

/// Default projection of the join view. Every label is unique so rows can be
/// read back by column name.
pub const MOVIE_WITH_EXTRAS_COLUMNS: &[&str] = &[
    "movie.movie_id",
    "movie.original_title",
    "movie.poster_image",
    "movie.release_date",
    "movie.runtime",
    "movie.vote_average",
    "movie.overview",
    "trailer.trailer_id",
    "trailer.uri",
    "trailer.name",
    "review.review_id",
    "review.author",
    "review.content",
];

/// Label SQLite gives a projected expression: the alias after `AS`, else the
/// bare column name of a qualified reference.
#[must_use]
pub fn column_label(expr: &str) -> String {
    let trimmed = expr.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(pos) = lower.rfind(" as ") {
        return unquote(trimmed[pos + 4..].trim()).to_string();
    }
    let last = trimmed.rsplit('.').next().unwrap_or(trimmed);
    unquote(last).to_string()
}

fn unquote(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
}

pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn bind(args: impl IntoIterator<Item = ColumnValue>) -> Vec<Value> {
    args.into_iter().map(Value::from).collect()
}

/// A SELECT statement plus the labels of its result columns.
pub(crate) struct SelectPlan {
    pub statement: Statement,
    pub labels: Vec<String>,
}

pub(crate) fn build_select(resource: &Resource, query: &Query) -> SelectPlan {
    let (from, default_columns, mut clauses, mut args) = match resource {
        Resource::MovieWithExtras(id) => (
            MOVIE_WITH_EXTRAS_FROM.to_string(),
            MOVIE_WITH_EXTRAS_COLUMNS
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![MOVIE_ID_SELECTION.to_string()],
            vec![ColumnValue::from(*id)],
        ),
        other => {
            let table = other.table();
            (
                table.name().to_string(),
                table.columns(),
                Vec::new(),
                Vec::new(),
            )
        }
    };

    if let Some(selection) = effective(query.selection.as_ref()) {
        clauses.push(format!("({})", selection.clause));
        args.extend(selection.args.iter().cloned());
    }

    let columns = query
        .projection
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or(default_columns);
    let labels = columns.iter().map(|c| column_label(c)).collect();

    let mut sql = format!("SELECT {} FROM {from}", columns.join(", "));
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    if let Some(order) = query.sort_order.as_deref().filter(|o| !o.trim().is_empty()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }

    SelectPlan {
        statement: Statement::from_sql_and_values(DbBackend::Sqlite, sql, bind(args)),
        labels,
    }
}

pub(crate) fn build_insert(table: Table, values: &ContentValues) -> Statement {
    if values.is_empty() {
        return Statement::from_string(
            DbBackend::Sqlite,
            format!("INSERT INTO {} DEFAULT VALUES", table.name()),
        );
    }

    let columns: Vec<String> = values.iter().map(|(c, _)| quote_ident(c)).collect();
    let placeholders = vec!["?"; values.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        table.name(),
        columns.join(", ")
    );
    Statement::from_sql_and_values(
        DbBackend::Sqlite,
        sql,
        bind(values.iter().map(|(_, v)| v.clone())),
    )
}

pub(crate) fn build_update(
    table: Table,
    values: &ContentValues,
    selection: Option<&Selection>,
) -> Statement {
    let assignments: Vec<String> = values
        .iter()
        .map(|(c, _)| format!("{} = ?", quote_ident(c)))
        .collect();
    let mut sql = format!("UPDATE {} SET {}", table.name(), assignments.join(", "));
    let mut args: Vec<ColumnValue> = values.iter().map(|(_, v)| v.clone()).collect();

    if let Some(selection) = effective(selection) {
        sql.push_str(" WHERE ");
        sql.push_str(&selection.clause);
        args.extend(selection.args.iter().cloned());
    }

    Statement::from_sql_and_values(DbBackend::Sqlite, sql, bind(args))
}

/// A missing or blank selection deletes every row, spelled `WHERE 1` so the engine
/// still reports the affected count.
pub(crate) fn build_delete(table: Table, selection: Option<&Selection>) -> Statement {
    let (clause, args) = effective(selection).map_or_else(
        || ("1".to_string(), Vec::new()),
        |s| (s.clause.clone(), s.args.clone()),
    );
    Statement::from_sql_and_values(
        DbBackend::Sqlite,
        format!("DELETE FROM {} WHERE {clause}", table.name()),
        bind(args),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieId;

    #[test]
    fn labels_strip_qualifiers_and_aliases() {
        assert_eq!(column_label("movie.original_title"), "original_title");
        assert_eq!(column_label("trailer.name AS trailer_name"), "trailer_name");
        assert_eq!(column_label("COUNT(*) as total"), "total");
        assert_eq!(column_label("\"overview\""), "overview");
        assert_eq!(column_label("runtime"), "runtime");
    }

    #[test]
    fn table_select_uses_entity_columns_by_default() {
        let plan = build_select(&Resource::Trailers, &Query::new());
        assert_eq!(
            plan.statement.sql,
            "SELECT id, movie_key, trailer_id, uri, name FROM trailer"
        );
        assert_eq!(plan.labels.len(), 5);
    }

    #[test]
    fn table_select_with_filter_and_order() {
        let query = Query::new()
            .projection(["original_title"])
            .filter("vote_average > ?", [7.0])
            .order_by("original_title ASC");
        let plan = build_select(&Resource::Movies, &query);
        assert_eq!(
            plan.statement.sql,
            "SELECT original_title FROM movie WHERE (vote_average > ?) ORDER BY original_title ASC"
        );
        assert_eq!(plan.statement.values.map(|v| v.0.len()), Some(1));
    }

    #[test]
    fn join_select_filters_on_remote_id() {
        let plan = build_select(
            &Resource::MovieWithExtras(MovieId::new(12345)),
            &Query::new(),
        );
        assert!(plan.statement.sql.contains("LEFT JOIN trailer"));
        assert!(plan.statement.sql.contains("LEFT JOIN review"));
        assert!(plan.statement.sql.ends_with("WHERE movie.movie_id = ?"));
        assert_eq!(plan.labels[0], "movie_id");
        assert_eq!(plan.labels.len(), MOVIE_WITH_EXTRAS_COLUMNS.len());
    }

    #[test]
    fn delete_without_selection_matches_everything() {
        let stmt = build_delete(Table::Review, None);
        assert_eq!(stmt.sql, "DELETE FROM review WHERE 1");
    }

    #[test]
    fn blank_selection_is_dropped_with_its_args() {
        let blank = Selection::new("  ", [1_i64]);

        let plan = build_select(&Resource::Movies, &Query::new().selection(blank.clone()));
        assert!(!plan.statement.sql.contains("WHERE"));
        assert_eq!(plan.statement.values.map_or(0, |v| v.0.len()), 0);

        let plan = build_select(
            &Resource::MovieWithExtras(MovieId::new(4)),
            &Query::new().selection(blank.clone()),
        );
        assert!(plan.statement.sql.ends_with("WHERE movie.movie_id = ?"));
        assert_eq!(plan.statement.values.map(|v| v.0.len()), Some(1));

        let values = ContentValues::new().with("runtime", 90);
        let stmt = build_update(Table::Movie, &values, Some(&blank));
        assert_eq!(stmt.sql, "UPDATE movie SET \"runtime\" = ?");
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(1));

        let stmt = build_delete(Table::Trailer, Some(&blank));
        assert_eq!(stmt.sql, "DELETE FROM trailer WHERE 1");
    }

    #[test]
    fn insert_quotes_columns() {
        let values = ContentValues::new()
            .with("movie_key", 1_i64)
            .with("review_id", "r1");
        let stmt = build_insert(Table::Review, &values);
        assert_eq!(
            stmt.sql,
            "INSERT INTO review (\"movie_key\", \"review_id\") VALUES (?, ?)"
        );
    }
}
