pub mod auth;
pub mod crm;
pub mod dashboard;
pub mod documents;
pub mod finance;
pub mod inventory;
pub mod rbac;
pub mod sales;
pub mod settings;
pub mod tenancy;
