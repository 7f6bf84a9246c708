// src/services/dashboard_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{monthly_totals, DashboardSummary},
        sales::SaleStatus,
    },
    services::{crm_service::CrmService, inventory_service::InventoryService, sales_service::SalesService},
};

#[derive(Clone)]
pub struct DashboardService {
    sales_service: SalesService,
    crm_service: CrmService,
    inventory_service: InventoryService,
}

impl DashboardService {
    pub fn new(sales_service: SalesService, crm_service: CrmService, inventory_service: InventoryService) -> Self {
        Self { sales_service, crm_service, inventory_service }
    }

    pub async fn get_summary(&self, company_id: Uuid) -> Result<DashboardSummary, AppError> {
        let sales = self.sales_service.list_sales(company_id).await?;
        let completed: Vec<_> = sales.iter().filter(|s| s.status == SaleStatus::Completed).collect();

        Ok(DashboardSummary {
            total_revenue: completed.iter().fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.total)),
            sales_count: completed.len(),
            customers_count: self.crm_service.count_customers(company_id).await?,
            low_stock_count: self.inventory_service.count_low_stock(company_id).await?,
            monthly_sales: monthly_totals(&sales, Utc::now().year()),
        })
    }
}
