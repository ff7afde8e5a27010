//! A small SQL expression model rendered per dialect.
//!
//! Metrics and catalog strategies build [`SqlExpr`] trees and [`SelectQuery`]
//! values; the query runner renders them for its own dialect. Keeping the tree
//! unrendered until execution lets the same metric definition push down to
//! MySQL, BigQuery or DataFusion.

use std::fmt::Write as _;

use crate::dialect::Dialect;
use crate::error::{ProfilerError, Result};
use crate::security::SqlSecurity;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
}

/// SQL expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// A column reference, optionally qualified by a relation alias.
    Column {
        /// Relation alias qualifying the column.
        qualifier: Option<String>,
        /// Column name.
        name: String,
    },
    /// A literal value.
    Literal(Literal),
    /// `COUNT(*)`.
    CountStar,
    /// `COUNT(expr)`.
    Count(Box<SqlExpr>),
    /// `COUNT(DISTINCT expr)`.
    CountDistinct(Box<SqlExpr>),
    /// `SUM(expr)`.
    Sum(Box<SqlExpr>),
    /// Median of `expr`, in the dialect's own spelling.
    Median(Box<SqlExpr>),
    /// `left + right`.
    Add(Box<SqlExpr>, Box<SqlExpr>),
    /// `LOWER(expr)`.
    Lower(Box<SqlExpr>),
    /// `left = right`.
    Eq(Box<SqlExpr>, Box<SqlExpr>),
    /// `expr IS NULL`.
    IsNull(Box<SqlExpr>),
    /// `CAST(expr AS <text type>)`, in the dialect's own text type.
    CastText(Box<SqlExpr>),
    /// `CASE WHEN condition THEN then ELSE otherwise END`.
    Case {
        /// Boolean condition.
        condition: Box<SqlExpr>,
        /// Value when the condition holds.
        then: Box<SqlExpr>,
        /// Value otherwise.
        otherwise: Box<SqlExpr>,
    },
    /// Search-semantics regular expression match.
    RegexpMatch {
        /// Matched operand.
        expr: Box<SqlExpr>,
        /// Pattern source.
        pattern: String,
    },
    /// A named function call rendered verbatim, e.g. `TIMESTAMP_MILLIS(x)`.
    Function {
        /// Function name.
        name: String,
        /// Arguments.
        args: Vec<SqlExpr>,
    },
}

impl SqlExpr {
    /// Unqualified column reference.
    pub fn col(name: impl Into<String>) -> Self {
        SqlExpr::Column {
            qualifier: None,
            name: name.into(),
        }
    }

    /// Column reference qualified by a relation alias.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        SqlExpr::Column {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    /// Integer literal.
    pub fn int(value: i64) -> Self {
        SqlExpr::Literal(Literal::Int(value))
    }

    /// String literal.
    pub fn string(value: impl Into<String>) -> Self {
        SqlExpr::Literal(Literal::Str(value.into()))
    }

    /// `COUNT(self)`.
    pub fn count(self) -> Self {
        SqlExpr::Count(Box::new(self))
    }

    /// `COUNT(DISTINCT self)`.
    pub fn count_distinct(self) -> Self {
        SqlExpr::CountDistinct(Box::new(self))
    }

    /// `SUM(self)`.
    pub fn sum(self) -> Self {
        SqlExpr::Sum(Box::new(self))
    }

    /// Median of `self`.
    pub fn median(self) -> Self {
        SqlExpr::Median(Box::new(self))
    }

    /// `LOWER(self)`.
    pub fn lower(self) -> Self {
        SqlExpr::Lower(Box::new(self))
    }

    /// `self + other`.
    pub fn plus(self, other: SqlExpr) -> Self {
        SqlExpr::Add(Box::new(self), Box::new(other))
    }

    /// `self = other`.
    pub fn equals(self, other: SqlExpr) -> Self {
        SqlExpr::Eq(Box::new(self), Box::new(other))
    }

    /// `self IS NULL`.
    pub fn is_null(self) -> Self {
        SqlExpr::IsNull(Box::new(self))
    }

    /// `self` cast to the dialect's text type.
    pub fn cast_text(self) -> Self {
        SqlExpr::CastText(Box::new(self))
    }

    /// `self` matches `pattern` anywhere in the value.
    pub fn regexp_match(self, pattern: impl Into<String>) -> Self {
        SqlExpr::RegexpMatch {
            expr: Box::new(self),
            pattern: pattern.into(),
        }
    }

    /// `CASE WHEN condition THEN then ELSE otherwise END`.
    pub fn case_when(condition: SqlExpr, then: SqlExpr, otherwise: SqlExpr) -> Self {
        SqlExpr::Case {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Named function call.
    pub fn function(name: impl Into<String>, args: Vec<SqlExpr>) -> Self {
        SqlExpr::Function {
            name: name.into(),
            args,
        }
    }

    /// Attaches a result label.
    pub fn label(self, label: impl Into<String>) -> Projection {
        Projection {
            expr: self,
            label: label.into(),
        }
    }

    /// Renders the expression for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        Ok(match self {
            SqlExpr::Column { qualifier, name } => {
                let column = SqlSecurity::quote_identifier(name, dialect)?;
                match qualifier {
                    Some(q) => format!("{}.{column}", SqlSecurity::quote_identifier(q, dialect)?),
                    None => column,
                }
            }
            SqlExpr::Literal(Literal::Int(v)) => v.to_string(),
            SqlExpr::Literal(Literal::Str(s)) => SqlSecurity::string_literal(s, dialect)?,
            SqlExpr::CountStar => "COUNT(*)".to_string(),
            SqlExpr::Count(e) => format!("COUNT({})", e.to_sql(dialect)?),
            SqlExpr::CountDistinct(e) => format!("COUNT(DISTINCT {})", e.to_sql(dialect)?),
            SqlExpr::Sum(e) => format!("SUM({})", e.to_sql(dialect)?),
            SqlExpr::Median(e) => dialect.median(&e.to_sql(dialect)?).ok_or_else(|| {
                ProfilerError::query(dialect, "median has no single-aggregate form")
            })?,
            SqlExpr::Add(l, r) => format!("({} + {})", l.to_sql(dialect)?, r.to_sql(dialect)?),
            SqlExpr::Lower(e) => format!("LOWER({})", e.to_sql(dialect)?),
            SqlExpr::Eq(l, r) => format!("{} = {}", l.to_sql(dialect)?, r.to_sql(dialect)?),
            SqlExpr::IsNull(e) => format!("{} IS NULL", e.to_sql(dialect)?),
            SqlExpr::CastText(e) => {
                format!("CAST({} AS {})", e.to_sql(dialect)?, dialect.text_type())
            }
            SqlExpr::Case {
                condition,
                then,
                otherwise,
            } => format!(
                "CASE WHEN {} THEN {} ELSE {} END",
                condition.to_sql(dialect)?,
                then.to_sql(dialect)?,
                otherwise.to_sql(dialect)?
            ),
            SqlExpr::RegexpMatch { expr, pattern } => {
                SqlSecurity::validate_regex_pattern(pattern)?;
                let literal = SqlSecurity::string_literal(pattern, dialect)?;
                dialect.regexp_match(&expr.to_sql(dialect)?, &literal)
            }
            SqlExpr::Function { name, args } => {
                let args = args
                    .iter()
                    .map(|a| a.to_sql(dialect))
                    .collect::<Result<Vec<_>>>()?;
                format!("{name}({})", args.join(", "))
            }
        })
    }
}

/// An expression with its result label.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Projected expression.
    pub expr: SqlExpr,
    /// Result column label.
    pub label: String,
}

impl Projection {
    fn to_sql(&self, dialect: Dialect) -> Result<String> {
        Ok(format!(
            "{} AS {}",
            self.expr.to_sql(dialect)?,
            SqlSecurity::quote_identifier(&self.label, dialect)?
        ))
    }
}

/// A relation name with optional qualifier.
///
/// Parts of the qualifier are rendered dot-separated. Catalog relations such
/// as `INFORMATION_SCHEMA.TABLES` are marked `raw` and rendered verbatim;
/// everything else is quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct TableName {
    /// Qualifier parts (database, schema, project...).
    pub qualifier: Vec<String>,
    /// Relation name.
    pub name: String,
    /// Render name and qualifier without quoting.
    pub raw: bool,
}

impl TableName {
    /// Unqualified, quoted relation.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            qualifier: Vec::new(),
            name: name.into(),
            raw: false,
        }
    }

    /// Schema-qualified, quoted relation.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: vec![schema.into()],
            name: name.into(),
            raw: false,
        }
    }

    /// A catalog relation rendered verbatim, e.g. `information_schema.tables`.
    pub fn catalog(path: &str) -> Self {
        let mut parts: Vec<String> = path.split('.').map(str::to_owned).collect();
        let name = parts.pop().unwrap_or_default();
        Self {
            qualifier: parts,
            name,
            raw: true,
        }
    }

    /// Prefixes the relation with quoted qualifier parts.
    ///
    /// Used for user-supplied prefixes such as a Snowflake database in front of
    /// `INFORMATION_SCHEMA.TABLES`, or a BigQuery project and dataset in front
    /// of `__TABLES__`.
    pub fn with_prefix<I, S>(self, prefix: I) -> PrefixedTableName
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrefixedTableName {
            prefix: prefix.into_iter().map(Into::into).collect(),
            table: self,
        }
    }

    /// Renders the relation for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        if self.raw {
            let mut parts = self.qualifier.clone();
            parts.push(self.name.clone());
            return Ok(parts.join("."));
        }
        let mut rendered = Vec::with_capacity(self.qualifier.len() + 1);
        for part in self.qualifier.iter().chain(std::iter::once(&self.name)) {
            rendered.push(SqlSecurity::quote_identifier(part, dialect)?);
        }
        Ok(rendered.join("."))
    }
}

/// A catalog relation behind a quoted, user-supplied prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixedTableName {
    prefix: Vec<String>,
    table: TableName,
}

/// Source relation of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    /// A named relation.
    Table(TableName),
    /// A named relation behind a quoted prefix.
    Prefixed(PrefixedTableName),
    /// A derived table.
    Subquery {
        /// Inner query.
        query: Box<SelectQuery>,
        /// Alias of the derived table.
        alias: String,
    },
}

impl FromItem {
    fn to_sql(&self, dialect: Dialect) -> Result<String> {
        match self {
            FromItem::Table(t) => t.to_sql(dialect),
            FromItem::Prefixed(p) => {
                let mut parts = p
                    .prefix
                    .iter()
                    .map(|part| SqlSecurity::quote_identifier(part, dialect))
                    .collect::<Result<Vec<_>>>()?;
                parts.push(p.table.to_sql(dialect)?);
                Ok(parts.join("."))
            }
            FromItem::Subquery { query, alias } => Ok(format!(
                "({}) {}",
                query.to_sql(dialect)?,
                SqlSecurity::quote_identifier(alias, dialect)?
            )),
        }
    }
}

impl From<TableName> for FromItem {
    fn from(table: TableName) -> Self {
        FromItem::Table(table)
    }
}

impl From<PrefixedTableName> for FromItem {
    fn from(table: PrefixedTableName) -> Self {
        FromItem::Prefixed(table)
    }
}

/// An inner join against a second source.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Joined relation.
    pub source: FromItem,
    /// Join conditions, combined with `AND`.
    pub on: Vec<SqlExpr>,
}

/// A single-block `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Projected expressions.
    pub projections: Vec<Projection>,
    /// Source relation.
    pub from: FromItem,
    /// Optional inner join.
    pub join: Option<Join>,
    /// Filters, combined with `AND`.
    pub filters: Vec<SqlExpr>,
}

impl SelectQuery {
    /// Creates `SELECT projections FROM from`.
    pub fn new(projections: Vec<Projection>, from: impl Into<FromItem>) -> Self {
        Self {
            projections,
            from: from.into(),
            join: None,
            filters: Vec::new(),
        }
    }

    /// Adds `WHERE` conditions.
    pub fn filter(mut self, filters: impl IntoIterator<Item = SqlExpr>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Adds an inner join.
    pub fn join(mut self, source: impl Into<FromItem>, on: Vec<SqlExpr>) -> Self {
        self.join = Some(Join {
            source: source.into(),
            on,
        });
        self
    }

    /// Wraps the query as a derived table.
    pub fn into_subquery(self, alias: impl Into<String>) -> FromItem {
        FromItem::Subquery {
            query: Box::new(self),
            alias: alias.into(),
        }
    }

    /// Label of every projection, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.projections.iter().map(|p| p.label.as_str()).collect()
    }

    /// Renders the statement for `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String> {
        let projections = self
            .projections
            .iter()
            .map(|p| p.to_sql(dialect))
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!(
            "SELECT {} FROM {}",
            projections.join(", "),
            self.from.to_sql(dialect)?
        );

        if let Some(join) = &self.join {
            let on = join
                .on
                .iter()
                .map(|c| c.to_sql(dialect))
                .collect::<Result<Vec<_>>>()?;
            let _ = write!(
                sql,
                " JOIN {} ON {}",
                join.source.to_sql(dialect)?,
                on.join(" AND ")
            );
        }

        if !self.filters.is_empty() {
            let filters = self
                .filters
                .iter()
                .map(|f| f.to_sql(dialect))
                .collect::<Result<Vec<_>>>()?;
            let _ = write!(sql, " WHERE {}", filters.join(" AND "));
        }

        Ok(sql)
    }
}
