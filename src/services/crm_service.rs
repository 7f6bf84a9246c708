// src/services/crm_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ScopedRepository,
    models::crm::{CreateCustomerPayload, Customer, CustomerData, UpdateCustomerPayload},
};

#[derive(Clone)]
pub struct CrmService {
    customers: ScopedRepository<Customer>,
}

impl CrmService {
    pub fn new(customers: ScopedRepository<Customer>) -> Self {
        Self { customers }
    }

    pub async fn list_customers(&self, company_id: Uuid) -> Result<Vec<Customer>, AppError> {
        self.customers.list(company_id).await
    }

    pub async fn get_customer(&self, company_id: Uuid, id: Uuid) -> Result<Customer, AppError> {
        self.customers.find(company_id, id).await
    }

    pub async fn create_customer(
        &self,
        company_id: Uuid,
        payload: &CreateCustomerPayload,
    ) -> Result<Customer, AppError> {
        let data = CustomerData {
            name: payload.name.trim(),
            email: &payload.email,
            phone: &payload.phone,
            total_spent: Decimal::ZERO,
        };
        let customer = self.customers.create(company_id, &data).await?;
        tracing::info!("🧑 Cliente '{}' criado na empresa {}", customer.name, company_id);
        Ok(customer)
    }

    // totalSpent fica de fora do payload: só as vendas concluídas o alteram
    pub async fn update_customer(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer, AppError> {
        self.customers.update(company_id, id, payload).await
    }

    pub async fn delete_customer(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.customers.delete(company_id, id).await
    }

    pub async fn count_customers(&self, company_id: Uuid) -> Result<usize, AppError> {
        Ok(self.customers.list(company_id).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{DocumentStore, MemoryStore};

    #[tokio::test]
    async fn new_customers_start_with_zero_spent() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let crm = CrmService::new(ScopedRepository::new(store));
        let company_id = Uuid::new_v4();

        let customer = crm
            .create_customer(
                company_id,
                &CreateCustomerPayload {
                    name: "Liam Johnson".into(),
                    email: "liam@example.com".into(),
                    phone: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(customer.total_spent, Decimal::ZERO);

        let patch = UpdateCustomerPayload { phone: Some("(11) 1234-5678".into()), ..Default::default() };
        let updated = crm.update_customer(company_id, customer.id, &patch).await.unwrap();
        assert_eq!(updated.phone, "(11) 1234-5678");
        assert_eq!(updated.email, customer.email);
        assert_eq!(updated.created_at, customer.created_at);
    }
}
