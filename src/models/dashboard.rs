// src/models/dashboard.rs

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sales::{Sale, SaleStatus};

// 1. Os cards do topo + o gráfico de vendas do ano
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(example = "45231.89")]
    pub total_revenue: Decimal, // Soma das vendas concluídas
    pub sales_count: usize,
    pub customers_count: usize,
    pub low_stock_count: usize, // Produtos abaixo do limite (inclui zerados)
    pub monthly_sales: Vec<MonthlySales>,
}

// 2. Uma barra do gráfico
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    #[schema(example = 3)]
    pub month: u32, // 1..=12
    #[schema(example = "1200.00")]
    pub total: Decimal,
}

/// Total das vendas concluídas de `year`, mês a mês (sempre 12 entradas).
pub fn monthly_totals(sales: &[Sale], year: i32) -> Vec<MonthlySales> {
    let mut totals = [Decimal::ZERO; 12];
    for sale in sales
        .iter()
        .filter(|s| s.status == SaleStatus::Completed && s.created_at.year() == year)
    {
        let slot = &mut totals[sale.created_at.month0() as usize];
        *slot = slot.saturating_add(sale.total);
    }

    totals
        .into_iter()
        .zip(1..)
        .map(|(total, month)| MonthlySales { month, total })
        .collect()
}
