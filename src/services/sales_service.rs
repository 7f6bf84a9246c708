// src/services/sales_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DocumentStore, ScopedRepository, WriteBatch},
    models::{
        crm::Customer,
        finance::{CreateTransactionPayload, Transaction, TransactionKind},
        inventory::Product,
        sales::{
            compute_total, CreateOrderPayload, CreateSalePayload, LineItem, LineItemInput, Order,
            SaleStatus, Sale, SalesDocPatch, UpdateOrderPayload, UpdateSalePayload,
        },
    },
};

fn total_of(items: &[LineItem]) -> Result<Decimal, AppError> {
    compute_total(items).ok_or_else(|| {
        AppError::field("items", "range", "O total excede o valor máximo permitido.")
    })
}

#[derive(Clone)]
pub struct SalesService {
    store: Arc<dyn DocumentStore>,
    orders: ScopedRepository<Order>,
    sales: ScopedRepository<Sale>,
    products: ScopedRepository<Product>,
    customers: ScopedRepository<Customer>,
}

impl SalesService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: ScopedRepository::new(store.clone()),
            sales: ScopedRepository::new(store.clone()),
            products: ScopedRepository::new(store.clone()),
            customers: ScopedRepository::new(store.clone()),
            store,
        }
    }

    async fn resolve_customer(&self, company_id: Uuid, customer_id: Uuid) -> Result<Customer, AppError> {
        self.customers
            .find(company_id, customer_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::UnknownCustomer(customer_id),
                other => other,
            })
    }

    /// Tira o "retrato" de cada produto (nome e preço atuais) para o item.
    async fn resolve_items(&self, company_id: Uuid, inputs: &[LineItemInput]) -> Result<Vec<LineItem>, AppError> {
        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            let product = self
                .products
                .find(company_id, input.product_id)
                .await
                .map_err(|e| match e {
                    AppError::NotFound(_) => AppError::UnknownProduct(input.product_id),
                    other => other,
                })?;

            items.push(LineItem {
                product_id: Some(product.id),
                name: product.name,
                quantity: input.quantity,
                price: product.price,
            });
        }
        Ok(items)
    }

    // --- PEDIDOS ---

    pub async fn list_orders(&self, company_id: Uuid) -> Result<Vec<Order>, AppError> {
        self.orders.list(company_id).await
    }

    pub async fn get_order(&self, company_id: Uuid, id: Uuid) -> Result<Order, AppError> {
        self.orders.find(company_id, id).await
    }

    pub async fn create_order(&self, company_id: Uuid, payload: &CreateOrderPayload) -> Result<Order, AppError> {
        let customer = self.resolve_customer(company_id, payload.customer_id).await?;
        let items = self.resolve_items(company_id, &payload.items).await?;
        let total = total_of(&items)?;

        let order = self
            .orders
            .create(
                company_id,
                &SalesDocPatch {
                    customer_id: Some(customer.id),
                    customer_name: Some(&customer.name),
                    items: Some(&items),
                    status: Some(payload.status),
                    total: Some(total),
                },
            )
            .await?;

        tracing::info!("🧾 Pedido {} criado (total {})", order.id, order.total);
        Ok(order)
    }

    pub async fn update_order(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateOrderPayload,
    ) -> Result<Order, AppError> {
        self.orders.find(company_id, id).await?;

        let patch = self
            .build_patch(company_id, payload.customer_id, payload.items.as_deref(), payload.status)
            .await?;
        self.orders.merge_value(company_id, id, patch).await
    }

    pub async fn delete_order(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.orders.delete(company_id, id).await
    }

    // --- VENDAS ---

    pub async fn list_sales(&self, company_id: Uuid) -> Result<Vec<Sale>, AppError> {
        self.sales.list(company_id).await
    }

    pub async fn get_sale(&self, company_id: Uuid, id: Uuid) -> Result<Sale, AppError> {
        self.sales.find(company_id, id).await
    }

    /// Uma venda criada já concluída lança a receita e o total do cliente no mesmo lote.
    pub async fn create_sale(&self, company_id: Uuid, payload: &CreateSalePayload) -> Result<Sale, AppError> {
        let customer = self.resolve_customer(company_id, payload.customer_id).await?;
        let items = self.resolve_items(company_id, &payload.items).await?;
        let total = total_of(&items)?;

        let data = serde_json::to_value(SalesDocPatch {
            customer_id: Some(customer.id),
            customer_name: Some(&customer.name),
            items: Some(&items),
            status: Some(payload.status),
            total: Some(total),
        })?;

        let sale_id = Uuid::new_v4();
        let mut batch = WriteBatch::new();
        batch.set(ScopedRepository::<Sale>::path(company_id), sale_id, data);

        if payload.status == SaleStatus::Completed {
            self.record_completion(&mut batch, company_id, &customer, &items, total)?;
        }

        self.store.commit(batch).await?;
        tracing::info!("💰 Venda {} criada (total {})", sale_id, total);

        self.sales.find(company_id, sale_id).await
    }

    pub async fn update_sale(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateSalePayload,
    ) -> Result<Sale, AppError> {
        let current = self.sales.find(company_id, id).await?;

        let patch = self
            .build_patch(company_id, payload.customer_id, payload.items.as_deref(), payload.status)
            .await?;

        let completes = payload.status == Some(SaleStatus::Completed) && current.status != SaleStatus::Completed;
        if !completes {
            return self.sales.merge_value(company_id, id, patch).await;
        }

        // Valores finais da venda após o patch
        let customer = match payload.customer_id {
            Some(customer_id) => self.resolve_customer(company_id, customer_id).await?,
            None => self.resolve_customer(company_id, current.customer_id).await?,
        };
        let items: Vec<LineItem> = match patch.get("items") {
            Some(items) => serde_json::from_value(items.clone())?,
            None => current.items.clone(),
        };
        let total = total_of(&items)?;

        let mut batch = WriteBatch::new();
        batch.merge(ScopedRepository::<Sale>::path(company_id), id, patch);
        self.record_completion(&mut batch, company_id, &customer, &items, total)?;
        self.store.commit(batch).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Venda"),
            other => other,
        })?;

        tracing::info!("✅ Venda {} concluída (total {})", id, total);
        self.sales.find(company_id, id).await
    }

    pub async fn delete_sale(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.sales.delete(company_id, id).await
    }

    // --- COMPARTILHADO ---

    async fn build_patch<S: serde::Serialize>(
        &self,
        company_id: Uuid,
        customer_id: Option<Uuid>,
        inputs: Option<&[LineItemInput]>,
        status: Option<S>,
    ) -> Result<Value, AppError> {
        let customer = match customer_id {
            Some(customer_id) => Some(self.resolve_customer(company_id, customer_id).await?),
            None => None,
        };
        let items = match inputs {
            Some(inputs) => Some(self.resolve_items(company_id, inputs).await?),
            None => None,
        };

        let total = items.as_deref().map(total_of).transpose()?;

        Ok(serde_json::to_value(SalesDocPatch {
            customer_id: customer.as_ref().map(|c| c.id),
            customer_name: customer.as_ref().map(|c| c.name.as_str()),
            total,
            items: items.as_deref(),
            status,
        })?)
    }

    /// Efeitos de uma venda concluída: lançamento de receita + total gasto do cliente.
    fn record_completion(
        &self,
        batch: &mut WriteBatch,
        company_id: Uuid,
        customer: &Customer,
        items: &[LineItem],
        total: Decimal,
    ) -> Result<(), AppError> {
        // Venda zerada não gera lançamento
        if total <= Decimal::ZERO {
            return Ok(());
        }

        let product = match items {
            [single] => Some(single.name.clone()),
            _ => None,
        };
        let revenue = CreateTransactionPayload {
            date: Utc::now().date_naive(),
            description: format!("Venda para {}", customer.name),
            kind: TransactionKind::Revenue,
            amount: total,
            customer: Some(customer.name.clone()),
            product,
        };

        // Parte do valor lido antes do lote; sem controle de concorrência,
        // duas conclusões simultâneas do mesmo cliente podem perder uma soma.
        let total_spent = customer.total_spent.checked_add(total).ok_or_else(|| {
            AppError::field("items", "range", "O total gasto do cliente excede o valor máximo permitido.")
        })?;

        batch
            .set(
                ScopedRepository::<Transaction>::path(company_id),
                Uuid::new_v4(),
                serde_json::to_value(&revenue)?,
            )
            .merge(
                ScopedRepository::<Customer>::path(company_id),
                customer.id,
                json!({ "totalSpent": total_spent }),
            );
        Ok(())
    }
}
