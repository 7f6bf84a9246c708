// src/models/finance.rs

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::scoped_repo::CompanyRecord;

/// Quantos meses o resumo financeiro cobre (incluindo o atual).
pub const SUMMARY_MONTHS: u32 = 6;

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Revenue, // Receita
    Expense, // Despesa
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    #[schema(ignore)]
    pub company_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub date: NaiveDate,

    #[schema(example = "Venda para Liam Johnson")]
    pub description: String,

    pub kind: TransactionKind,

    #[schema(example = "250.00")]
    pub amount: Decimal,

    #[serde(default)]
    #[schema(example = "Liam Johnson")]
    pub customer: Option<String>,

    #[serde(default)]
    #[schema(example = "Laptop Pro")]
    pub product: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord for Transaction {
    const COLLECTION: &'static str = "transactions";
    const LABEL: &'static str = "Transação";
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub kind: TransactionKind,

    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_positive"))]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

// Filtros da listagem (?from=2025-01-01&to=2025-01-31&customer=Liam)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionFilter {
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
    pub customer: Option<String>,
    pub product: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.from.is_some_and(|from| tx.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| tx.date > to) {
            return false;
        }
        if let Some(customer) = self.customer.as_deref().filter(|c| !c.is_empty()) {
            if tx.customer.as_deref() != Some(customer) {
                return false;
            }
        }
        if let Some(product) = self.product.as_deref().filter(|p| !p.is_empty()) {
            if tx.product.as_deref() != Some(product) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    #[schema(example = "2025-03")]
    pub month: String,
    #[schema(example = "1200.00")]
    pub revenue: Decimal,
    #[schema(example = "300.00")]
    pub expenses: Decimal,
}

/// Receitas e despesas por mês nos últimos `SUMMARY_MONTHS` meses terminando
/// em `today`, do mais antigo para o mais recente. Meses sem movimento vêm zerados.
pub fn monthly_summary(transactions: &[Transaction], today: NaiveDate) -> Vec<MonthlySummary> {
    let current = today.with_day(1).unwrap_or(today);

    (0..SUMMARY_MONTHS)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|start| {
            let (mut revenue, mut expenses) = (Decimal::ZERO, Decimal::ZERO);
            for tx in transactions
                .iter()
                .filter(|tx| tx.date.year() == start.year() && tx.date.month() == start.month())
            {
                match tx.kind {
                    TransactionKind::Revenue => revenue = revenue.saturating_add(tx.amount),
                    TransactionKind::Expense => expenses = expenses.saturating_add(tx.amount),
                }
            }
            MonthlySummary {
                month: start.format("%Y-%m").to_string(),
                revenue,
                expenses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, kind: TransactionKind, amount: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            date: date.parse().unwrap(),
            description: "x".into(),
            kind,
            amount: Decimal::from(amount),
            customer: Some("Liam".into()),
            product: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_covers_six_months_oldest_first() {
        let txs = vec![
            tx("2025-03-02", TransactionKind::Revenue, 100),
            tx("2025-03-20", TransactionKind::Expense, 40),
            tx("2024-11-15", TransactionKind::Revenue, 7),
            tx("2024-09-30", TransactionKind::Revenue, 999), // fora da janela
        ];
        let summary = monthly_summary(&txs, "2025-03-25".parse().unwrap());

        let months: Vec<&str> = summary.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, ["2024-10", "2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]);
        assert_eq!(summary[1].revenue, Decimal::from(7));
        assert_eq!(summary[5].revenue, Decimal::from(100));
        assert_eq!(summary[5].expenses, Decimal::from(40));
        assert_eq!(summary[0].revenue, Decimal::ZERO);
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let filter = TransactionFilter {
            from: Some("2025-01-01".parse().unwrap()),
            to: Some("2025-01-31".parse().unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&tx("2025-01-01", TransactionKind::Revenue, 1)));
        assert!(filter.matches(&tx("2025-01-31", TransactionKind::Revenue, 1)));
        assert!(!filter.matches(&tx("2025-02-01", TransactionKind::Revenue, 1)));
    }

    #[test]
    fn filter_by_customer_label() {
        let filter = TransactionFilter { customer: Some("Olivia".into()), ..Default::default() };
        assert!(!filter.matches(&tx("2025-01-01", TransactionKind::Revenue, 1)));
    }

    #[test]
    fn zero_amounts_fail_validation() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::ONE).is_ok());
    }
}
