pub mod auth;
pub mod crm_service;
pub mod dashboard_service;
pub mod document_service;
pub mod finance_service;
pub mod inventory_service;
pub mod rbac_service;
pub mod sales_service;
pub mod tenancy_service;
