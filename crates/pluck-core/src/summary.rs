use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::TransactionRecord;

/// Money in and out across a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub transactions: usize,
    /// Net amount per description.
    pub totals: BTreeMap<String, Decimal>,
    /// Sum of negative amounts (itself negative or zero).
    pub debits: Decimal,
    /// Sum of positive amounts.
    pub credits: Decimal,
    /// How much more went out than came in, never below zero.
    pub net_outflow: Decimal,
    /// Days the net balance lasts at the average monthly spend, taking the
    /// debits as a year's worth. Zero when nothing was spent or the figure
    /// does not fit.
    pub runway_days: i64,
}

/// Sums clamp at the ends of the `Decimal` range.
fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(if b.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

pub fn summarize(transactions: &[TransactionRecord]) -> Summary {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for t in transactions {
        let total = totals.entry(t.description.clone()).or_default();
        *total = saturating_add(*total, t.amount);
        if t.amount.is_sign_negative() {
            debits = saturating_add(debits, t.amount);
        } else {
            credits = saturating_add(credits, t.amount);
        }
    }

    // Both sides are non-negative, so the difference stays in range.
    let net_outflow = (debits.abs() - credits.abs()).max(Decimal::ZERO);

    Summary {
        transactions: transactions.len(),
        totals,
        debits,
        credits,
        net_outflow,
        runway_days: runway_days(debits, credits).unwrap_or_else(|| {
            tracing::warn!(%debits, %credits, "runway out of range");
            0
        }),
    }
}

/// `None` only on overflow; no spending is a runway of zero.
fn runway_days(debits: Decimal, credits: Decimal) -> Option<i64> {
    let monthly_spend = debits.abs().checked_div(Decimal::from(12))?;
    if monthly_spend.is_zero() {
        return Some(0);
    }
    credits
        .checked_add(debits)?
        .checked_div(monthly_spend)?
        .checked_mul(Decimal::from(30))?
        .trunc()
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn txn(description: &str, amount: Decimal) -> TransactionRecord {
        TransactionRecord {
            date: "2024-01-15".into(),
            description: description.into(),
            amount,
        }
    }

    #[test]
    fn test_empty() {
        let s = summarize(&[]);
        assert_eq!(s, Summary::default());
    }

    #[test]
    fn test_totals_and_sides() {
        let s = summarize(&[
            txn("PAYROLL", dec!(1200.00)),
            txn("COFFEE SHOP", dec!(-5.50)),
            txn("COFFEE SHOP", dec!(-4.50)),
            txn("RENT", dec!(-600.00)),
        ]);
        assert_eq!(s.transactions, 4);
        assert_eq!(s.totals["COFFEE SHOP"], dec!(-10.00));
        assert_eq!(s.debits, dec!(-610.00));
        assert_eq!(s.credits, dec!(1200.00));
        assert_eq!(s.net_outflow, Decimal::ZERO);
    }

    #[test]
    fn test_runway() {
        // 1200 spent per "year" -> 100 a month; 300 left -> 90 days.
        let s = summarize(&[txn("PAYROLL", dec!(1500)), txn("RENT", dec!(-1200))]);
        assert_eq!(s.runway_days, 90);
    }

    #[test]
    fn test_overspending() {
        let s = summarize(&[txn("PAYROLL", dec!(100)), txn("RENT", dec!(-1300))]);
        assert_eq!(s.net_outflow, dec!(1200));
        assert_eq!(s.runway_days, -332);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let s = summarize(&[
            txn("DEPOSIT", Decimal::MAX),
            txn("DEPOSIT", Decimal::MAX),
            txn("ATM", Decimal::MIN),
            txn("ATM", dec!(-1)),
        ]);
        assert_eq!(s.credits, Decimal::MAX);
        assert_eq!(s.debits, Decimal::MIN);
        assert_eq!(s.totals["DEPOSIT"], Decimal::MAX);
        assert_eq!(s.net_outflow, Decimal::ZERO);
    }

    #[test]
    fn test_runway_overflow_is_zero() {
        let s = summarize(&[
            txn(
                "DEPOSIT",
                Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000, 0),
            ),
            txn("ATM WITHDRAWAL", dec!(-0.01)),
        ]);
        assert_eq!(s.runway_days, 0);
        assert_eq!(s.debits, dec!(-0.01));
    }

    #[test]
    fn test_no_debits_means_no_runway() {
        let s = summarize(&[txn("PAYROLL", dec!(100))]);
        assert_eq!(s.runway_days, 0);
    }
}
