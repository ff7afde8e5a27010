//! SQL dialect identifiers and their rendering rules.
//!
//! A [`Dialect`] selects two things: which catalog strategy the table metric
//! computer uses, and how queries are rendered to SQL text (identifier quoting,
//! literal escaping, regular-expression match syntax).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Database products with dedicated table-metric strategies.
///
/// `Base` is the generic dialect: ANSI-style quoting with `~` regex matching,
/// which is also what DataFusion understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Generic SQL, used when no specific strategy applies.
    Base,
    /// Snowflake.
    Snowflake,
    /// Oracle Database.
    Oracle,
    /// ClickHouse.
    ClickHouse,
    /// Google BigQuery.
    BigQuery,
    /// MySQL.
    #[serde(rename = "mysql")]
    MySql,
    /// Amazon Redshift.
    Redshift,
}

impl Dialect {
    /// All dialects, generic first.
    pub const ALL: [Dialect; 7] = [
        Dialect::Base,
        Dialect::Snowflake,
        Dialect::Oracle,
        Dialect::ClickHouse,
        Dialect::BigQuery,
        Dialect::MySql,
        Dialect::Redshift,
    ];

    /// Returns the stable lowercase identifier of the dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Base => "base",
            Dialect::Snowflake => "snowflake",
            Dialect::Oracle => "oracle",
            Dialect::ClickHouse => "clickhouse",
            Dialect::BigQuery => "bigquery",
            Dialect::MySql => "mysql",
            Dialect::Redshift => "redshift",
        }
    }

    /// Parses a dialect name as reported by a connection (case-insensitive).
    ///
    /// Returns `None` for products without a dedicated strategy; callers route
    /// those to [`Dialect::Base`].
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }

    /// Like [`Dialect::parse`], but unknown products map to the generic dialect.
    pub fn parse_or_base(name: &str) -> Self {
        Self::parse(name).unwrap_or(Dialect::Base)
    }

    /// Character used to quote identifiers.
    pub fn identifier_quote(&self) -> char {
        match self {
            Dialect::MySql | Dialect::BigQuery | Dialect::ClickHouse => '`',
            _ => '"',
        }
    }

    /// Whether string literals treat backslash as an escape character.
    pub fn processes_backslash_escapes(&self) -> bool {
        matches!(
            self,
            Dialect::MySql | Dialect::BigQuery | Dialect::ClickHouse
        )
    }

    /// Renders a search-semantics regular expression match.
    ///
    /// `operand` and `pattern_literal` must already be rendered SQL. Every form
    /// here matches when the pattern is found anywhere in the value, so anchors
    /// inside the pattern carry the same meaning on every dialect.
    pub fn regexp_match(&self, operand: &str, pattern_literal: &str) -> String {
        match self {
            Dialect::MySql => format!("{operand} REGEXP {pattern_literal}"),
            Dialect::Oracle => format!("REGEXP_LIKE({operand}, {pattern_literal})"),
            // Snowflake's REGEXP_LIKE is implicitly anchored at both ends.
            Dialect::Snowflake => format!("REGEXP_INSTR({operand}, {pattern_literal}) > 0"),
            Dialect::BigQuery => format!("REGEXP_CONTAINS({operand}, {pattern_literal})"),
            Dialect::ClickHouse => format!("match({operand}, {pattern_literal})"),
            Dialect::Base | Dialect::Redshift => format!("{operand} ~ {pattern_literal}"),
        }
    }

    /// Type name used to cast values to text.
    pub fn text_type(&self) -> &'static str {
        match self {
            Dialect::MySql => "CHAR",
            Dialect::BigQuery => "STRING",
            Dialect::ClickHouse => "String",
            Dialect::Oracle => "VARCHAR2(4000)",
            Dialect::Base | Dialect::Snowflake | Dialect::Redshift => "VARCHAR",
        }
    }

    /// Renders a median aggregate, `None` where no single aggregate exists.
    pub fn median(&self, operand: &str) -> Option<String> {
        match self {
            Dialect::Base | Dialect::Snowflake | Dialect::Oracle | Dialect::Redshift => {
                Some(format!("MEDIAN({operand})"))
            }
            Dialect::ClickHouse => Some(format!("median({operand})")),
            Dialect::BigQuery => Some(format!("APPROX_QUANTILES({operand}, 2)[OFFSET(1)]")),
            Dialect::MySql => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
