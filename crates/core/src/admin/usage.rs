//! Usage reporting type definitions
//!
//! The API reports usage in base-10 gigabytes (1 GB = 10^9 bytes).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const BYTES_PER_GB: f64 = 1e9;

/// Calendar month, serialized as its number (1-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Month {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Ok(match n {
            1 => Month::January,
            2 => Month::February,
            3 => Month::March,
            4 => Month::April,
            5 => Month::May,
            6 => Month::June,
            7 => Month::July,
            8 => Month::August,
            9 => Month::September,
            10 => Month::October,
            11 => Month::November,
            12 => Month::December,
            _ => return Err(format!("Invalid month: {n}")),
        })
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.number()
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A month of a given year, used to bound monthly usage queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthYear {
    pub year: u16,
    pub month: Month,
}

impl MonthYear {
    pub fn new(month: Month, year: u16) -> Self {
        Self { year, month }
    }
}

/// Usage of a single bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,

    #[serde(rename = "usageGB", default)]
    pub usage_gb: f64,
}

impl Bucket {
    /// Usage converted to bytes
    pub fn bytes_used(&self) -> f64 {
        self.usage_gb * BYTES_PER_GB
    }
}

/// Helpers over a list of bucket usages
pub trait Buckets {
    /// Sum of usage across all buckets, in bytes
    fn bytes_used_combined(&self) -> u64;

    /// Usage of the bucket called `name` in bytes, or 0 if absent
    fn bytes_used_by_name(&self, name: &str) -> u64;
}

impl Buckets for [Bucket] {
    fn bytes_used_combined(&self) -> u64 {
        self.iter().map(|b| b.bytes_used() as u64).sum()
    }

    fn bytes_used_by_name(&self, name: &str) -> u64 {
        self.iter()
            .find(|b| b.name == name)
            .map(|b| b.bytes_used() as u64)
            .unwrap_or(0)
    }
}

/// Summary usage of a sub-account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccount {
    #[serde(default)]
    pub sub_account_name: String,

    #[serde(default)]
    pub sub_account_id: String,

    #[serde(default)]
    pub create_time: String,

    #[serde(rename = "usageGB", default)]
    pub usage_gb: f64,

    #[serde(default)]
    pub users: u32,

    #[serde(default)]
    pub service_accounts: u32,

    #[serde(default)]
    pub buckets: u32,

    /// Days remaining before the trial expires
    #[serde(default)]
    pub trial: u32,
}

/// Usage details for one reporting period.
///
/// `year`/`month` are only present in monthly reports, `num_buckets` only in
/// the current usage report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_buckets: Option<u32>,

    #[serde(rename = "totalUsageGB", default)]
    pub total_usage_gb: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<Bucket>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_accounts: Vec<SubAccount>,
}

impl Usage {
    /// Total usage converted to bytes
    pub fn bytes_used_combined(&self) -> u64 {
        (self.total_usage_gb * BYTES_PER_GB) as u64
    }

    fn period(&self) -> Option<MonthYear> {
        Some(MonthYear::new(self.month?, self.year?))
    }
}

/// Total usage in GB for each month present in `usages`
pub fn monthly_total_usage_gb(usages: &[Usage]) -> HashMap<MonthYear, f64> {
    usages
        .iter()
        .filter_map(|u| u.period().map(|p| (p, u.total_usage_gb)))
        .collect()
}

/// Response of the monthly usage endpoint.
///
/// `usage_by_sub_account` is empty unless the query was made with master
/// account credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsage {
    #[serde(default)]
    pub usage_by_bucket: Vec<Usage>,

    #[serde(default)]
    pub usage_by_sub_account: Vec<Usage>,
}

/// Sub-account section of the current usage report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountUsage {
    #[serde(rename = "totalUsageGB", default)]
    pub total_usage_gb: f64,

    #[serde(default)]
    pub sub_accounts: Vec<SubAccount>,
}

/// Response of the current usage endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUsage {
    #[serde(default)]
    pub usage_by_bucket: Usage,

    #[serde(default)]
    pub usage_by_sub_account: SubAccountUsage,
}
