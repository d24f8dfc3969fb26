//! Financial aggregation.
//!
//! Summary figures are never persisted: they are recomputed from the stored
//! entry totals every time they are read.
//!
//! - `total_expenses = Σ expense.total`
//! - `total_earnings = Σ earning.total`
//! - `profit_loss = total_earnings - total_expenses`
//! - `roi = profit_loss / total_expenses × 100`, rounded to two decimals and
//!   undefined when there are no expenses.
//!
//! Arithmetic is checked: a figure that does not fit a `Decimal` is an
//! [`EngineError::InvalidAmount`], never a panic or a missing ROI.

use std::{collections::BTreeMap, str::FromStr};

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Batch, Earning, EngineError, Expense, ResultEngine,
    money::{checked_sum, round_cents},
};

/// Anything with a category and a stored total.
pub trait Entry {
    fn category(&self) -> &str;
    fn total(&self) -> Decimal;
}

impl Entry for Expense {
    fn category(&self) -> &str {
        &self.category
    }

    fn total(&self) -> Decimal {
        self.total
    }
}

impl Entry for Earning {
    fn category(&self) -> &str {
        &self.category
    }

    fn total(&self) -> Decimal {
        self.total
    }
}

/// Sum of the stored totals.
pub fn sum_totals<E: Entry>(entries: &[E]) -> ResultEngine<Decimal> {
    checked_sum(entries.iter().map(Entry::total))
}

/// Return on investment in percent, `None` exactly when `total_expenses` is
/// zero.
pub fn roi(profit_loss: Decimal, total_expenses: Decimal) -> ResultEngine<Option<Decimal>> {
    if total_expenses.is_zero() {
        return Ok(None);
    }
    profit_loss
        .checked_div(total_expenses)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| Some(round_cents(percent)))
        .ok_or_else(|| EngineError::InvalidAmount("roi out of range".to_string()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_expenses: Decimal,
    pub total_earnings: Decimal,
    pub profit_loss: Decimal,
    pub roi: Option<Decimal>,
}

impl Totals {
    pub fn new(total_expenses: Decimal, total_earnings: Decimal) -> ResultEngine<Self> {
        let profit_loss = total_earnings
            .checked_sub(total_expenses)
            .ok_or_else(|| EngineError::InvalidAmount("profit/loss out of range".to_string()))?;
        Ok(Self {
            total_expenses,
            total_earnings,
            profit_loss,
            roi: roi(profit_loss, total_expenses)?,
        })
    }

    pub fn of(expenses: &[Expense], earnings: &[Earning]) -> ResultEngine<Self> {
        Self::new(sum_totals(expenses)?, sum_totals(earnings)?)
    }
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            total_expenses: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
            profit_loss: Decimal::ZERO,
            roi: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

fn collect_breakdown<'a>(
    pairs: impl IntoIterator<Item = (&'a str, Decimal)>,
) -> ResultEngine<Vec<CategoryTotal>> {
    let mut groups: BTreeMap<&str, Decimal> = BTreeMap::new();
    for (category, total) in pairs {
        let sum = groups.entry(category).or_default();
        *sum = checked_sum([*sum, total])?;
    }
    Ok(groups
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect())
}

/// Group entries by category string, summing totals. Sorted by category.
pub fn category_breakdown<E: Entry>(entries: &[E]) -> ResultEngine<Vec<CategoryTotal>> {
    collect_breakdown(entries.iter().map(|e| (e.category(), e.total())))
}

/// Merge several breakdowns into one, summing equal categories.
pub fn merge_breakdowns<'a>(
    breakdowns: impl IntoIterator<Item = &'a [CategoryTotal]>,
) -> ResultEngine<Vec<CategoryTotal>> {
    collect_breakdown(
        breakdowns
            .into_iter()
            .flatten()
            .map(|c| (c.category.as_str(), c.total)),
    )
}

/// Aggregated view of one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch: Batch,
    pub totals: Totals,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub earnings_by_category: Vec<CategoryTotal>,
}

impl BatchSummary {
    pub fn new(batch: Batch, expenses: &[Expense], earnings: &[Earning]) -> ResultEngine<Self> {
        Ok(Self {
            batch,
            totals: Totals::of(expenses, earnings)?,
            expenses_by_category: category_breakdown(expenses)?,
            earnings_by_category: category_breakdown(earnings)?,
        })
    }
}

/// Dashboard time window, counted back from today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// First day of the window ending on `today`.
    pub fn since(self, today: NaiveDate) -> NaiveDate {
        let since = match self {
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::Quarter => today.checked_sub_months(Months::new(3)),
            Self::Year => today.checked_sub_months(Months::new(12)),
        };
        since.unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for TimeRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(EngineError::InvalidName(format!("invalid range: {other}"))),
        }
    }
}

/// A batch is in the window when its active period overlaps `[since, today]`.
/// Open batches are treated as running until today.
pub fn active_between(batch: &Batch, since: NaiveDate, today: NaiveDate) -> bool {
    let end = batch.end_date.unwrap_or(today);
    batch.start_date <= today && end >= since
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub range: TimeRange,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub batches: Vec<BatchSummary>,
    pub overall: Totals,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub earnings_by_category: Vec<CategoryTotal>,
}

impl Dashboard {
    /// Keeps the summaries active in `range` and sums them up.
    pub fn new(
        range: TimeRange,
        today: NaiveDate,
        summaries: Vec<BatchSummary>,
    ) -> ResultEngine<Self> {
        let since = range.since(today);
        let batches: Vec<BatchSummary> = summaries
            .into_iter()
            .filter(|s| active_between(&s.batch, since, today))
            .collect();

        let overall = Totals::new(
            checked_sum(batches.iter().map(|s| s.totals.total_expenses))?,
            checked_sum(batches.iter().map(|s| s.totals.total_earnings))?,
        )?;
        let expenses_by_category =
            merge_breakdowns(batches.iter().map(|s| s.expenses_by_category.as_slice()))?;
        let earnings_by_category =
            merge_breakdowns(batches.iter().map(|s| s.earnings_by_category.as_slice()))?;

        Ok(Self {
            range,
            since,
            until: today,
            batches,
            overall,
            expenses_by_category,
            earnings_by_category,
        })
    }
}
