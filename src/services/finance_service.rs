// src/services/finance_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ScopedRepository,
    models::finance::{
        monthly_summary, CreateTransactionPayload, MonthlySummary, Transaction, TransactionFilter,
        UpdateTransactionPayload,
    },
};

#[derive(Clone)]
pub struct FinanceService {
    transactions: ScopedRepository<Transaction>,
}

impl FinanceService {
    pub fn new(transactions: ScopedRepository<Transaction>) -> Self {
        Self { transactions }
    }

    pub async fn list_transactions(
        &self,
        company_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::field("from", "range", "A data inicial deve ser anterior à data final."));
            }
        }

        Ok(self
            .transactions
            .list(company_id)
            .await?
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect())
    }

    pub async fn get_transaction(&self, company_id: Uuid, id: Uuid) -> Result<Transaction, AppError> {
        self.transactions.find(company_id, id).await
    }

    pub async fn create_transaction(
        &self,
        company_id: Uuid,
        payload: &CreateTransactionPayload,
    ) -> Result<Transaction, AppError> {
        self.transactions.create(company_id, payload).await
    }

    pub async fn update_transaction(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateTransactionPayload,
    ) -> Result<Transaction, AppError> {
        self.transactions.update(company_id, id, payload).await
    }

    pub async fn delete_transaction(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.transactions.delete(company_id, id).await
    }

    /// Receitas x despesas dos últimos meses (gráfico da página Financeiro).
    pub async fn summary(&self, company_id: Uuid) -> Result<Vec<MonthlySummary>, AppError> {
        let transactions = self.transactions.list(company_id).await?;
        Ok(monthly_summary(&transactions, Utc::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        db::{DocumentStore, MemoryStore},
        models::finance::{TransactionKind, SUMMARY_MONTHS},
    };

    #[tokio::test]
    async fn filters_and_summary_use_stored_transactions() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let finance = FinanceService::new(ScopedRepository::new(store));
        let company_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        for (customer, kind) in [("Liam", TransactionKind::Revenue), ("Olivia", TransactionKind::Expense)] {
            finance
                .create_transaction(
                    company_id,
                    &CreateTransactionPayload {
                        date: today,
                        description: format!("Lançamento {customer}"),
                        kind,
                        amount: Decimal::from(100),
                        customer: Some(customer.into()),
                        product: None,
                    },
                )
                .await
                .unwrap();
        }

        let filter = TransactionFilter { customer: Some("Liam".into()), ..Default::default() };
        let liam = finance.list_transactions(company_id, &filter).await.unwrap();
        assert_eq!(liam.len(), 1);
        assert_eq!(liam[0].kind, TransactionKind::Revenue);

        let summary = finance.summary(company_id).await.unwrap();
        assert_eq!(summary.len(), SUMMARY_MONTHS as usize);
        let current = summary.last().unwrap();
        assert_eq!(current.revenue, Decimal::from(100));
        assert_eq!(current.expenses, Decimal::from(100));
    }

    #[tokio::test]
    async fn inverted_date_range_is_rejected() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let finance = FinanceService::new(ScopedRepository::new(store));
        let today = Utc::now().date_naive();

        let filter = TransactionFilter {
            from: today.succ_opt(),
            to: Some(today),
            ..Default::default()
        };
        let err = finance.list_transactions(Uuid::new_v4(), &filter).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
