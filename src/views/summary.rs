// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregates derived from loaded lists. Recomputed on every call.

use serde::Serialize;

use crate::models::{
    AlertSettings, CreditCard, Goal, InvestmentAllocation, PlannedExpense, Transaction,
    TransactionKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub income: f64,
    /// Sum of expense magnitudes.
    pub expense: f64,
    pub balance: f64,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) = transactions
        .iter()
        .fold((0.0, 0.0), |(inc, exp), t| match t.kind {
            TransactionKind::Income => (inc + t.amount, exp),
            TransactionKind::Expense => (inc, exp + t.amount.abs()),
        });
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Share of the limit already used, in percent. 0 for a zero limit.
pub fn card_utilisation(card: &CreditCard) -> f64 {
    if card.limit_amount == 0.0 {
        0.0
    } else {
        (card.limit_amount - card.available_amount) / card.limit_amount * 100.0
    }
}

pub fn overall_utilisation(cards: &[CreditCard]) -> f64 {
    let limit: f64 = cards.iter().map(|c| c.limit_amount).sum();
    let used: f64 = cards
        .iter()
        .map(|c| c.limit_amount - c.available_amount)
        .sum();
    if limit == 0.0 { 0.0 } else { used / limit * 100.0 }
}

pub fn is_subscription(t: &Transaction) -> bool {
    t.kind == TransactionKind::Expense
        && t.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains("assinatura"))
}

pub fn subscription_spend(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| is_subscription(t))
        .map(|t| t.amount.abs())
        .sum()
}

/// `spent / budget` in percent; 0 when there is no budget.
pub fn budget_ratio(spent: f64, budget: f64) -> f64 {
    if budget == 0.0 { 0.0 } else { spent / budget * 100.0 }
}

pub fn limit_alert(utilisation: f64, settings: &AlertSettings) -> bool {
    utilisation >= settings.limit_percent
}

pub fn average_progress(goals: &[Goal]) -> f64 {
    if goals.is_empty() {
        0.0
    } else {
        goals.iter().map(|g| g.progress).sum::<f64>() / goals.len() as f64
    }
}

pub fn planned_total(planned: &[PlannedExpense]) -> f64 {
    planned.iter().map(|p| p.amount).sum()
}

/// Not required to be 100.
pub fn allocation_total(allocations: &[InvestmentAllocation]) -> f64 {
    allocations.iter().map(|a| a.percent).sum()
}

pub fn page_count(count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Width for a progress bar, clamped to 0..=100.
pub fn bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardStyle;

    fn tx(amount: f64, kind: TransactionKind, category: Option<&str>) -> Transaction {
        Transaction {
            id: "t".into(),
            description: "x".into(),
            subtitle: None,
            amount,
            kind,
            category: category.map(str::to_string),
            created_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    fn card(limit: f64, available: f64) -> CreditCard {
        CreditCard {
            id: "c".into(),
            name: "Prime".into(),
            holder_name: "Ana".into(),
            last_digits: "6420".into(),
            limit_amount: limit,
            available_amount: available,
            style: CardStyle::Alt,
        }
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let list = vec![
            tx(4200.0, TransactionKind::Income, None),
            tx(980.0, TransactionKind::Income, Some("Freelance")),
            tx(-320.4, TransactionKind::Expense, Some("Mercado")),
            tx(-38.9, TransactionKind::Expense, None),
        ];
        let t = totals(&list);
        assert!((t.income - 5180.0).abs() < 1e-9);
        assert!((t.expense - 359.3).abs() < 1e-9);
        assert!((t.income - t.expense - t.balance).abs() < 1e-9);
        assert_eq!(totals(&[]), Totals::default());
    }

    #[test]
    fn utilisation_per_card_and_overall() {
        assert_eq!(card_utilisation(&card(8000.0, 4680.0)).round(), 42.0);
        assert_eq!(card_utilisation(&card(0.0, 0.0)), 0.0);
        let all = [card(8000.0, 4000.0), card(2000.0, 2000.0)];
        assert_eq!(overall_utilisation(&all), 40.0);
        assert_eq!(overall_utilisation(&[]), 0.0);
    }

    #[test]
    fn subscriptions_match_category_case_insensitively() {
        let list = vec![
            tx(-39.9, TransactionKind::Expense, Some("Assinaturas")),
            tx(-20.0, TransactionKind::Expense, Some("assinatura streaming")),
            tx(-100.0, TransactionKind::Expense, Some("Mercado")),
            tx(50.0, TransactionKind::Income, Some("Assinaturas")),
        ];
        assert!((subscription_spend(&list) - 59.9).abs() < 1e-9);
        assert_eq!(budget_ratio(105.0, 210.0), 50.0);
        assert_eq!(budget_ratio(10.0, 0.0), 0.0);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn limit_alert_fires_at_threshold() {
        let s = AlertSettings::default();
        assert!(limit_alert(70.0, &s));
        assert!(!limit_alert(69.9, &s));
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_width(140.0), 100.0);
        assert_eq!(bar_width(-3.0), 0.0);
        assert_eq!(bar_width(f64::NAN), 0.0);
    }
}
