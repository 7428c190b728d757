//! Query helpers - costruzione dinamica di WHERE, liste paginate e UPDATE parziali
//!
//! Tutti i valori forniti dal client passano come parametri bind, mai concatenati
//! nella stringa SQL. Colonne e ORDER BY sono sempre `&'static str` scelti dal codice.

use crate::core::pagination::{Page, PageParams, Pagination};
use sqlx::mysql::MySqlRow;
use sqlx::{Executor, FromRow, MySql, MySqlPool, QueryBuilder};

/// Valore legato a una condizione del filtro
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl From<i32> for BindValue {
    fn from(v: i32) -> Self {
        BindValue::Int(v as i64)
    }
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::Int(v)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Bool(v)
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

#[derive(Debug, Clone)]
enum Condition {
    Compare {
        column: &'static str,
        op: &'static str,
        value: BindValue,
    },
    Search {
        columns: Vec<&'static str>,
        pattern: String,
    },
    EqOrNull {
        column: &'static str,
        value: BindValue,
    },
    Raw(&'static str),
}

/// Insieme di condizioni in AND, riapplicabile a più query (COUNT e SELECT)
#[derive(Debug, Clone, Default)]
pub struct SqlFilter {
    conditions: Vec<Condition>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn compare(mut self, column: &'static str, op: &'static str, value: BindValue) -> Self {
        self.conditions.push(Condition::Compare { column, op, value });
        self
    }

    pub fn eq(self, column: &'static str, value: impl Into<BindValue>) -> Self {
        self.compare(column, " = ", value.into())
    }

    pub fn eq_opt<V: Into<BindValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Come `eq_opt`, ma ignora le stringhe vuote (tipico dei query param `?city=`)
    pub fn eq_text(self, column: &'static str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn gte_opt<V: Into<BindValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.compare(column, " >= ", v.into()),
            None => self,
        }
    }

    pub fn lte_opt<V: Into<BindValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.compare(column, " <= ", v.into()),
            None => self,
        }
    }

    /// `(col1 LIKE ? OR col2 LIKE ? ...)` con il termine racchiuso tra `%`
    pub fn search(mut self, columns: &[&'static str], term: Option<&str>) -> Self {
        let term = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => return self,
        };
        if columns.is_empty() {
            return self;
        }
        self.conditions.push(Condition::Search {
            columns: columns.to_vec(),
            pattern: format!("%{}%", escape_like(term)),
        });
        self
    }

    /// `(col = ? OR col IS NULL)`, es. notifiche personali + broadcast
    pub fn eq_or_null(mut self, column: &'static str, value: impl Into<BindValue>) -> Self {
        self.conditions.push(Condition::EqOrNull {
            column,
            value: value.into(),
        });
        self
    }

    /// Condizione fissa senza parametri, es. `j.is_active = 1`
    pub fn raw(mut self, sql: &'static str) -> Self {
        self.conditions.push(Condition::Raw(sql));
        self
    }

    pub fn push_where(&self, qb: &mut QueryBuilder<'static, MySql>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::Compare { column, op, value } => {
                    qb.push(*column);
                    qb.push(*op);
                    push_value(qb, value);
                }
                Condition::Search { columns, pattern } => {
                    qb.push("(");
                    for (j, column) in columns.iter().enumerate() {
                        if j > 0 {
                            qb.push(" OR ");
                        }
                        qb.push(*column);
                        qb.push(" LIKE ");
                        qb.push_bind(pattern.clone());
                    }
                    qb.push(")");
                }
                Condition::EqOrNull { column, value } => {
                    qb.push("(");
                    qb.push(*column);
                    qb.push(" = ");
                    push_value(qb, value);
                    qb.push(" OR ");
                    qb.push(*column);
                    qb.push(" IS NULL)");
                }
                Condition::Raw(sql) => {
                    qb.push(*sql);
                }
            }
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, MySql>, value: &BindValue) {
    match value {
        BindValue::Int(v) => qb.push_bind(*v),
        BindValue::Float(v) => qb.push_bind(*v),
        BindValue::Text(v) => qb.push_bind(v.clone()),
        BindValue::Bool(v) => qb.push_bind(*v),
    };
}

/// Escape dei caratteri jolly di LIKE
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Lista filtrata e ordinata: `COUNT(*)` + `LIMIT/OFFSET` con lo stesso filtro
#[derive(Debug, Clone)]
pub struct ListQuery {
    select: &'static str,
    count: &'static str,
    filter: SqlFilter,
    order_by: &'static str,
}

impl ListQuery {
    /// `select` e `count` sono le parti `SELECT ... FROM ... JOIN ...` senza WHERE
    pub fn new(select: &'static str, count: &'static str) -> Self {
        Self {
            select,
            count,
            filter: SqlFilter::new(),
            order_by: "created_at DESC",
        }
    }

    pub fn filter(mut self, filter: SqlFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn count_query(&self) -> QueryBuilder<'static, MySql> {
        let mut qb = QueryBuilder::new(self.count);
        self.filter.push_where(&mut qb);
        qb
    }

    pub fn select_query(&self, limit: i64, offset: i64) -> QueryBuilder<'static, MySql> {
        let mut qb = QueryBuilder::new(self.select);
        self.filter.push_where(&mut qb);
        qb.push(" ORDER BY ");
        qb.push(self.order_by);
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);
        qb
    }

    pub async fn fetch_page<T>(&self, pool: &MySqlPool, params: PageParams) -> Result<Page<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let total_items: i64 = self
            .count_query()
            .build_query_scalar()
            .fetch_one(pool)
            .await?;

        let items = self
            .select_query(params.limit as i64, params.offset())
            .build_query_as::<T>()
            .fetch_all(pool)
            .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(params, total_items),
        })
    }

    /// Solo i primi `limit` risultati, senza conteggio
    pub async fn fetch_top<T>(&self, pool: &MySqlPool, limit: u32) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        self.select_query(limit as i64, 0)
            .build_query_as::<T>()
            .fetch_all(pool)
            .await
    }
}

/// UPDATE parziale: vengono scritte solo le colonne con valore `Some`
pub struct UpdateBuilder {
    qb: QueryBuilder<'static, MySql>,
    touched: bool,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        let mut qb = QueryBuilder::new("UPDATE ");
        qb.push(table);
        qb.push(" SET ");
        Self { qb, touched: false }
    }

    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'static + sqlx::Encode<'static, MySql> + sqlx::Type<MySql> + Send,
    {
        if let Some(v) = value {
            if self.touched {
                self.qb.push(", ");
            }
            self.qb.push(column);
            self.qb.push(" = ");
            self.qb.push_bind(v);
            self.touched = true;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.touched
    }

    pub fn sql_for(&mut self, key_column: &'static str, id: i32) -> &str {
        self.qb.push(" WHERE ");
        self.qb.push(key_column);
        self.qb.push(" = ");
        self.qb.push_bind(id);
        self.qb.sql()
    }

    /// Esegue l'UPDATE sulla riga `key_column = id`; ritorna le righe toccate
    /// (0 anche quando non c'era nulla da aggiornare)
    pub async fn execute<'c, E>(mut self, key_column: &'static str, id: i32, executor: E) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = MySql>,
    {
        if !self.touched {
            return Ok(0);
        }
        self.sql_for(key_column, id);
        let result = self.qb.build().execute(executor).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where() {
        let q = ListQuery::new("SELECT * FROM blogs", "SELECT COUNT(*) FROM blogs");
        assert_eq!(q.count_query().sql(), "SELECT COUNT(*) FROM blogs");
        assert_eq!(
            q.select_query(10, 0).sql(),
            "SELECT * FROM blogs ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn test_conditions_are_joined_with_and() {
        let filter = SqlFilter::new()
            .eq("c.university_id", 3)
            .eq_opt::<i32>("c.subject_id", None)
            .gte_opt("c.tuition_fee", Some(1000.0))
            .raw("c.is_active = 1");
        let q = ListQuery::new("SELECT c.* FROM courses c", "SELECT COUNT(*) FROM courses c")
            .filter(filter)
            .order_by("c.title ASC");

        assert_eq!(
            q.count_query().sql(),
            "SELECT COUNT(*) FROM courses c WHERE c.university_id = ? AND c.tuition_fee >= ? AND c.is_active = 1"
        );
        assert!(q.select_query(5, 5).sql().ends_with("ORDER BY c.title ASC LIMIT ? OFFSET ?"));
    }

    #[test]
    fn test_search_spans_columns() {
        let filter = SqlFilter::new().search(&["u.name", "u.city"], Some("  oxford "));
        let mut qb = QueryBuilder::new("SELECT * FROM university_details u");
        filter.push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM university_details u WHERE (u.name LIKE ? OR u.city LIKE ?)"
        );
    }

    #[test]
    fn test_blank_search_and_text_are_ignored() {
        let filter = SqlFilter::new()
            .search(&["b.title"], Some("   "))
            .search(&["b.title"], None)
            .eq_text("b.city", Some(""));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_eq_or_null() {
        let filter = SqlFilter::new().eq_or_null("n.user_id", 9);
        let mut qb = QueryBuilder::new("SELECT * FROM notifications n");
        filter.push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM notifications n WHERE (n.user_id = ? OR n.user_id IS NULL)"
        );
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_update_builder_only_sets_present_fields() {
        let mut update = UpdateBuilder::new("subjects");
        update
            .set("name", Some("Physics".to_string()))
            .set::<String>("slug", None)
            .set("updated_by", Some(4));
        assert_eq!(
            update.sql_for("id", 7),
            "UPDATE subjects SET name = ?, updated_by = ? WHERE id = ?"
        );
    }

    #[test]
    fn test_update_builder_without_fields_is_empty() {
        let mut update = UpdateBuilder::new("subjects");
        update.set::<String>("name", None);
        assert!(update.is_empty());
    }
}
