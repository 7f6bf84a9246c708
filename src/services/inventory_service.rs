// src/services/inventory_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ScopedRepository,
    models::inventory::{
        Category, CategoryPayload, CreateProductPayload, Product, UpdateProductPayload,
        LOW_STOCK_THRESHOLD,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    products: ScopedRepository<Product>,
    categories: ScopedRepository<Category>,
}

impl InventoryService {
    pub fn new(products: ScopedRepository<Product>, categories: ScopedRepository<Category>) -> Self {
        Self { products, categories }
    }

    // --- PRODUTOS ---
    // O status nunca é gravado: sai sempre recalculado a partir da quantidade.

    pub async fn list_products(&self, company_id: Uuid) -> Result<Vec<Product>, AppError> {
        Ok(self
            .products
            .list(company_id)
            .await?
            .into_iter()
            .map(Product::with_status)
            .collect())
    }

    pub async fn get_product(&self, company_id: Uuid, id: Uuid) -> Result<Product, AppError> {
        Ok(self.products.find(company_id, id).await?.with_status())
    }

    pub async fn create_product(
        &self,
        company_id: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        let product = self.products.create(company_id, payload).await?.with_status();
        tracing::info!("📦 Produto '{}' criado na empresa {}", product.name, company_id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        Ok(self.products.update(company_id, id, payload).await?.with_status())
    }

    pub async fn delete_product(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.products.delete(company_id, id).await
    }

    /// Produtos abaixo do limite de estoque (inclui os zerados).
    pub async fn count_low_stock(&self, company_id: Uuid) -> Result<usize, AppError> {
        Ok(self
            .list_products(company_id)
            .await?
            .iter()
            .filter(|p| p.quantity < LOW_STOCK_THRESHOLD)
            .count())
    }

    // --- CATEGORIAS ---

    pub async fn list_categories(&self, company_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.categories.list(company_id).await
    }

    pub async fn get_category(&self, company_id: Uuid, id: Uuid) -> Result<Category, AppError> {
        self.categories.find(company_id, id).await
    }

    pub async fn create_category(
        &self,
        company_id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        self.categories.create(company_id, payload).await
    }

    pub async fn update_category(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        self.categories.update(company_id, id, payload).await
    }

    pub async fn delete_category(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.categories.delete(company_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        db::{DocumentStore, MemoryStore},
        models::inventory::StockStatus,
    };

    fn service() -> InventoryService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        InventoryService::new(ScopedRepository::new(store.clone()), ScopedRepository::new(store))
    }

    fn laptop(quantity: i64) -> CreateProductPayload {
        CreateProductPayload {
            name: "Laptop Pro".into(),
            sku: Some("LP-001".into()),
            category: "Eletrônicos".into(),
            quantity,
            price: Decimal::new(750000, 2),
        }
    }

    #[tokio::test]
    async fn products_are_scoped_to_their_company() {
        let inventory = service();
        let (acme, globex) = (Uuid::new_v4(), Uuid::new_v4());

        let product = inventory.create_product(acme, &laptop(15)).await.unwrap();
        assert_eq!(product.company_id, acme);

        assert!(inventory.list_products(globex).await.unwrap().is_empty());
        assert!(matches!(
            inventory.get_product(globex, product.id).await,
            Err(AppError::NotFound("Produto"))
        ));
        assert!(inventory.delete_product(globex, product.id).await.is_err());
        assert_eq!(inventory.list_products(acme).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn status_is_recomputed_after_updates() {
        let inventory = service();
        let company_id = Uuid::new_v4();
        let product = inventory.create_product(company_id, &laptop(15)).await.unwrap();
        assert_eq!(product.status, StockStatus::InStock);

        let patch = UpdateProductPayload { quantity: Some(3), ..Default::default() };
        let updated = inventory.update_product(company_id, product.id, &patch).await.unwrap();
        assert_eq!(updated.status, StockStatus::LowStock);
        assert_eq!(updated.name, product.name);
        assert_eq!(inventory.count_low_stock(company_id).await.unwrap(), 1);
    }
}
