// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::list_plans,

        // --- Users ---
        handlers::tenancy::get_me,
        handlers::tenancy::get_navigation,

        // --- Settings ---
        handlers::settings::get_company,
        handlers::settings::update_company,
        handlers::settings::list_members,
        handlers::settings::add_member,

        // --- INVENTORY ---
        handlers::inventory::list_products,
        handlers::inventory::create_product,
        handlers::inventory::get_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,
        handlers::inventory::list_categories,
        handlers::inventory::create_category,
        handlers::inventory::get_category,
        handlers::inventory::update_category,
        handlers::inventory::delete_category,

        // --- CRM ---
        handlers::crm::list_customers,
        handlers::crm::create_customer,
        handlers::crm::get_customer,
        handlers::crm::update_customer,
        handlers::crm::delete_customer,

        // --- SALES ---
        handlers::sales::list_orders,
        handlers::sales::create_order,
        handlers::sales::get_order,
        handlers::sales::update_order,
        handlers::sales::delete_order,
        handlers::sales::generate_order_document,
        handlers::sales::list_sales,
        handlers::sales::create_sale,
        handlers::sales::get_sale,
        handlers::sales::update_sale,
        handlers::sales::delete_sale,
        handlers::sales::generate_sale_document,

        // --- FINANCE ---
        handlers::finance::list_transactions,
        handlers::finance::create_transaction,
        handlers::finance::get_transaction,
        handlers::finance::update_transaction,
        handlers::finance::delete_transaction,
        handlers::finance::get_summary,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- RBAC ---
        handlers::rbac::get_all_permissions,
        handlers::rbac::list_roles,
        handlers::rbac::create_role,
        handlers::rbac::update_role,
        handlers::rbac::delete_role,

        // --- Documents ---
        handlers::documents::generate_document,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::RegisterResponse,

            // --- TENANCY ---
            models::tenancy::Plan,
            models::tenancy::PlanInfo,
            models::tenancy::Company,
            models::tenancy::UpdateCompanyPayload,
            models::tenancy::UserProfile,
            models::tenancy::MeResponse,
            models::tenancy::AddMemberPayload,

            // --- Inventory ---
            models::inventory::StockStatus,
            models::inventory::Product,
            models::inventory::CreateProductPayload,
            models::inventory::UpdateProductPayload,
            models::inventory::Category,
            models::inventory::CategoryPayload,

            // --- CRM ---
            models::crm::Customer,
            models::crm::CreateCustomerPayload,
            models::crm::UpdateCustomerPayload,

            // --- Sales ---
            models::sales::LineItem,
            models::sales::LineItemInput,
            models::sales::OrderStatus,
            models::sales::Order,
            models::sales::CreateOrderPayload,
            models::sales::UpdateOrderPayload,
            models::sales::SaleStatus,
            models::sales::Sale,
            models::sales::CreateSalePayload,
            models::sales::UpdateSalePayload,

            // --- FINANCE ---
            models::finance::TransactionKind,
            models::finance::Transaction,
            models::finance::CreateTransactionPayload,
            models::finance::UpdateTransactionPayload,
            models::finance::MonthlySummary,

            // --- DASHBOARD ---
            models::dashboard::DashboardSummary,
            models::dashboard::MonthlySales,

            // --- RBAC ---
            models::rbac::PageSlug,
            models::rbac::Role,
            models::rbac::CreateRolePayload,
            models::rbac::UpdateRolePayload,
            models::rbac::PagePermission,
            models::rbac::NavEntry,

            // --- Documents ---
            models::document::DocumentStyle,
            models::document::DocumentLine,
            models::document::DocumentRequest,
            models::document::DocumentResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, Login e Planos"),
        (name = "Users", description = "Dados do Usuário e Menu"),
        (name = "Settings", description = "Empresa e Membros da Equipe"),
        (name = "Inventory", description = "Produtos e Categorias"),
        (name = "CRM", description = "Clientes"),
        (name = "Sales", description = "Pedidos e Vendas"),
        (name = "Finance", description = "Receitas e Despesas"),
        (name = "Dashboard", description = "Indicadores Gerenciais"),
        (name = "RBAC", description = "Controle de Acesso (Cargos e Páginas)"),
        (name = "Documents", description = "Geração de Documentos com IA")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
