//! Content-based value classification.
//!
//! Each [`AccuracyCategory`] is a regular expression describing one kind of
//! well-formed value. Classification metrics count how many values of a
//! column match a category; the accuracy ratio then picks the dominant one.
//! Column names are never consulted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::name::MetricName;

mod accuracy_count;
mod classification;

pub use accuracy_count::{AccuracyCount, CURRENCY_EXPRESSION};
pub use classification::AccuracyClassificationCount;
pub(crate) use classification::match_count_expr;

/// A data-type category recognised by pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyCategory {
    Address,
    BankCardNumber,
    ChineseName,
    Date,
    Email,
    IdNumber,
    IpAddress,
    Phone,
    PostCode,
    Url,
}

impl AccuracyCategory {
    /// Tie-break priority of the accuracy ratio.
    ///
    /// When two categories share the maximum count the one listed first wins.
    /// This order is a fixed policy; it is neither alphabetical nor registry
    /// order, and changing it changes which category is reported.
    pub const PRIORITY: [AccuracyCategory; 10] = [
        AccuracyCategory::Address,
        AccuracyCategory::BankCardNumber,
        AccuracyCategory::ChineseName,
        AccuracyCategory::Date,
        AccuracyCategory::Email,
        AccuracyCategory::IdNumber,
        AccuracyCategory::IpAddress,
        AccuracyCategory::Phone,
        AccuracyCategory::PostCode,
        AccuracyCategory::Url,
    ];

    /// Category label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            AccuracyCategory::Address => "address",
            AccuracyCategory::BankCardNumber => "bankcardnumber",
            AccuracyCategory::ChineseName => "chinesename",
            AccuracyCategory::Date => "date",
            AccuracyCategory::Email => "email",
            AccuracyCategory::IdNumber => "idnumber",
            AccuracyCategory::IpAddress => "ipaddress",
            AccuracyCategory::Phone => "phone",
            AccuracyCategory::PostCode => "postcode",
            AccuracyCategory::Url => "url",
        }
    }

    /// Name of the metric counting this category.
    pub fn metric_name(&self) -> MetricName {
        match self {
            AccuracyCategory::Address => MetricName::AccuracyAddressCount,
            AccuracyCategory::BankCardNumber => MetricName::AccuracyBankCardNumberCount,
            AccuracyCategory::ChineseName => MetricName::AccuracyChineseNameCount,
            AccuracyCategory::Date => MetricName::AccuracyDateCount,
            AccuracyCategory::Email => MetricName::AccuracyEmailCount,
            AccuracyCategory::IdNumber => MetricName::AccuracyIdNumberCount,
            AccuracyCategory::IpAddress => MetricName::AccuracyIpAddressCount,
            AccuracyCategory::Phone => MetricName::AccuracyPhoneCount,
            AccuracyCategory::PostCode => MetricName::AccuracyPostCodeCount,
            AccuracyCategory::Url => MetricName::AccuracyUrlCount,
        }
    }

    /// Regular expression recognising the category.
    ///
    /// Patterns use only plain capturing groups and character classes, with
    /// no backslash escapes, so the same text runs on every pushdown engine
    /// whatever its literal escaping rules.
    pub fn expression(&self) -> &'static str {
        match self {
            AccuracyCategory::Address => {
                "^([^省]+省|[^市]+市|[^区]+区|[^县]+县)?([^市]+市|[^区]+区|[^县]+县)?\
                 ([^区]+区|[^县]+县)?([^镇]+镇|[^乡]+乡)?[^省市区县]*$"
            }
            AccuracyCategory::BankCardNumber => {
                "^(62[0-5][0-9]{13,16})|(4[0-9]{12}([0-9]{3})?)|(5[1-5][0-9]{14})$"
            }
            AccuracyCategory::ChineseName => "^[一-龥]{1,3}$",
            AccuracyCategory::Date => {
                "^(19|20)[0-9]{2}[-/年](0[1-9]|1[012])[-/月](0[1-9]|[12][0-9]|3[01])$|^19[0-9]{2}(0[1-9]|1[012])(0[1-9]|[12][0-9]|3[01])$|^19[0-9]{2}年(0[1-9]|1[012])月(0[1-9]|[12][0-9]|3[01])日.*$"
            }
            AccuracyCategory::Email => "^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+[.][a-zA-Z0-9.-]+$",
            AccuracyCategory::IdNumber => {
                "^[0-9]{6}(19|20)[0-9]{2}(0[1-9]|1[012])(0[1-9]|[12][0-9]|3[01])[0-9]{3}([0-9]|X|x)$"
            }
            AccuracyCategory::IpAddress => {
                "^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)[.](25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)[.](25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)[.](25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$"
            }
            AccuracyCategory::Phone => "^[0-9]{10}$",
            AccuracyCategory::PostCode => "^[0-9]{6}$",
            AccuracyCategory::Url => {
                "^(http|https|ftp)://[a-zA-Z0-9]+([.-][a-zA-Z0-9]+)*[.][a-zA-Z]{2,}(:[0-9]{1,5})?(/.*)?$"
            }
        }
    }

    /// Compiled form of [`AccuracyCategory::expression`].
    pub fn regex(&self) -> &'static Regex {
        &COMPILED[self.position()]
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

static COMPILED: Lazy<Vec<Regex>> = Lazy::new(|| {
    AccuracyCategory::PRIORITY
        .iter()
        .map(|category| {
            // Patterns are constants covered by unit tests.
            #[allow(clippy::expect_used)]
            Regex::new(category.expression()).expect("Hard-coded regex pattern should be valid")
        })
        .collect()
});

impl fmt::Display for AccuracyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
