// src/models/rbac.rs

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{db::scoped_repo::CompanyRecord, models::crm::validate_not_blank};

/// Sentinela que concede todas as páginas.
pub const ALL_PERMISSIONS: &str = "all";
pub const ADMIN_ROLE: &str = "Admin";
pub const SELLER_ROLE: &str = "Vendedor";

// As páginas do painel, na ordem do menu lateral
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageSlug {
    Dashboard,
    Sales,
    Orders,
    Inventory,
    Categories,
    Customers,
    Finance,
    Documents,
    Roles,
    Settings,
}

impl PageSlug {
    pub const ALL: [PageSlug; 10] = [
        PageSlug::Dashboard,
        PageSlug::Sales,
        PageSlug::Orders,
        PageSlug::Inventory,
        PageSlug::Categories,
        PageSlug::Customers,
        PageSlug::Finance,
        PageSlug::Documents,
        PageSlug::Roles,
        PageSlug::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageSlug::Dashboard => "dashboard",
            PageSlug::Sales => "sales",
            PageSlug::Orders => "orders",
            PageSlug::Inventory => "inventory",
            PageSlug::Categories => "categories",
            PageSlug::Customers => "customers",
            PageSlug::Finance => "finance",
            PageSlug::Documents => "documents",
            PageSlug::Roles => "roles",
            PageSlug::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageSlug::Dashboard => "Dashboard",
            PageSlug::Sales => "Vendas",
            PageSlug::Orders => "Pedidos",
            PageSlug::Inventory => "Estoque",
            PageSlug::Categories => "Categorias",
            PageSlug::Customers => "Clientes",
            PageSlug::Finance => "Financeiro",
            PageSlug::Documents => "Documentos",
            PageSlug::Roles => "Cargos",
            PageSlug::Settings => "Configurações",
        }
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageSlug::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Conjunto de permissões de um cargo: tudo, ou uma lista explícita de páginas.
///
/// No JSON é sempre uma lista de strings; `["all"]` é o curinga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub enum PermissionSet {
    All,
    Pages(BTreeSet<PageSlug>),
}

impl PermissionSet {
    /// Monta o conjunto a partir dos slugs do formulário. Uma lista que cobre
    /// todas as páginas vira o curinga, como no editor de cargos.
    pub fn from_slugs<I, S>(slugs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pages = BTreeSet::new();
        for slug in slugs {
            let slug = slug.as_ref();
            if slug == ALL_PERMISSIONS {
                return Ok(PermissionSet::All);
            }
            pages.insert(slug.parse::<PageSlug>()?);
        }

        if pages.len() == PageSlug::ALL.len() {
            Ok(PermissionSet::All)
        } else {
            Ok(PermissionSet::Pages(pages))
        }
    }

    pub fn allows(&self, page: PageSlug) -> bool {
        match self {
            PermissionSet::All => true,
            PermissionSet::Pages(pages) => pages.contains(&page),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PermissionSet::All)
    }

    /// Permissões segundo a tabela estática do menu: Admin vê tudo, os demais
    /// veem os itens que listam o seu nome.
    pub fn for_static_role(role: &str) -> Self {
        if role == ADMIN_ROLE {
            return PermissionSet::All;
        }
        PermissionSet::Pages(filter_by_role(NAV_ITEMS, role).into_iter().map(|item| item.slug).collect())
    }
}

/// Itens cujo conjunto de cargos inclui `role`, na ordem da tabela.
pub fn filter_by_role<'a>(items: &'a [NavItem], role: &str) -> Vec<&'a NavItem> {
    items
        .iter()
        .filter(|item| item.roles.iter().any(|r| *r == role))
        .collect()
}

/// Cargos criados junto com toda empresa nova.
pub fn default_roles() -> [(&'static str, PermissionSet); 2] {
    [
        (ADMIN_ROLE, PermissionSet::for_static_role(ADMIN_ROLE)),
        (SELLER_ROLE, PermissionSet::for_static_role(SELLER_ROLE)),
    ]
}

impl From<PermissionSet> for Vec<String> {
    fn from(set: PermissionSet) -> Self {
        match set {
            PermissionSet::All => vec![ALL_PERMISSIONS.to_string()],
            PermissionSet::Pages(pages) => pages.into_iter().map(|p| p.as_str().to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for PermissionSet {
    type Error = String;

    fn try_from(slugs: Vec<String>) -> Result<Self, Self::Error> {
        PermissionSet::from_slugs(slugs).map_err(|slug| format!("permissão desconhecida: {slug}"))
    }
}

// O que sai do banco (coleção roles)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "Vendedor")]
    pub name: String,
    #[schema(value_type = Vec<String>, example = json!(["dashboard", "sales", "orders"]))]
    pub permissions: PermissionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord for Role {
    const COLLECTION: &'static str = "roles";
    const LABEL: &'static str = "Cargo";
}

#[derive(Debug, Serialize)]
pub struct RoleData<'a> {
    pub name: &'a str,
    pub permissions: &'a PermissionSet,
}

// O Payload para criar um cargo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Estoquista")]
    pub name: String,

    #[schema(example = json!(["inventory", "categories"]))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[schema(example = json!(["all"]))]
    pub permissions: Option<Vec<String>>,
}

// Uma página disponível para o editor de cargos
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PagePermission {
    pub id: PageSlug,
    #[schema(example = "Estoque")]
    pub label: String,
}

// ---
// Menu lateral
// ---

/// Item de navegação: a tabela estática também diz quais cargos padrão o veem.
#[derive(Debug, Clone, Copy)]
pub struct NavItem {
    pub slug: PageSlug,
    pub label: &'static str,
    pub href: &'static str,
    pub roles: &'static [&'static str],
}

// O item como sai na API
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NavEntry {
    pub slug: PageSlug,
    #[schema(example = "Vendas")]
    pub label: String,
    #[schema(example = "/dashboard/sales")]
    pub href: String,
}

impl From<&NavItem> for NavEntry {
    fn from(item: &NavItem) -> Self {
        NavEntry {
            slug: item.slug,
            label: item.label.to_string(),
            href: item.href.to_string(),
        }
    }
}

const ADMIN_ONLY: &[&str] = &[ADMIN_ROLE];
const ADMIN_AND_SELLER: &[&str] = &[ADMIN_ROLE, SELLER_ROLE];

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { slug: PageSlug::Dashboard, label: "Dashboard", href: "/dashboard", roles: ADMIN_AND_SELLER },
    NavItem { slug: PageSlug::Sales, label: "Vendas", href: "/dashboard/sales", roles: ADMIN_AND_SELLER },
    NavItem { slug: PageSlug::Orders, label: "Pedidos", href: "/dashboard/orders", roles: ADMIN_AND_SELLER },
    NavItem { slug: PageSlug::Inventory, label: "Estoque", href: "/dashboard/inventory", roles: ADMIN_AND_SELLER },
    NavItem { slug: PageSlug::Categories, label: "Categorias", href: "/dashboard/categories", roles: ADMIN_AND_SELLER },
    NavItem { slug: PageSlug::Customers, label: "Clientes", href: "/dashboard/customers", roles: ADMIN_AND_SELLER },
    NavItem { slug: PageSlug::Finance, label: "Financeiro", href: "/dashboard/finance", roles: ADMIN_ONLY },
    NavItem { slug: PageSlug::Documents, label: "Documentos", href: "/dashboard/documents", roles: ADMIN_ONLY },
    NavItem { slug: PageSlug::Roles, label: "Cargos", href: "/dashboard/roles", roles: ADMIN_ONLY },
    NavItem { slug: PageSlug::Settings, label: "Configurações", href: "/dashboard/settings", roles: ADMIN_ONLY },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_role_names_fail_validation() {
        let create = CreateRolePayload { name: "  ".into(), permissions: vec!["sales".into()] };
        assert!(create.validate().unwrap_err().field_errors().contains_key("name"));

        let rename = UpdateRolePayload { name: Some(" ".into()), permissions: None };
        assert!(rename.validate().is_err());
    }

    #[test]
    fn wildcard_and_full_lists_collapse_to_all() {
        assert_eq!(PermissionSet::from_slugs(["all"]).unwrap(), PermissionSet::All);
        assert_eq!(
            PermissionSet::from_slugs(["sales", "all"]).unwrap(),
            PermissionSet::All
        );

        let every_slug: Vec<&str> = PageSlug::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(PermissionSet::from_slugs(every_slug).unwrap(), PermissionSet::All);
    }

    #[test]
    fn unknown_slugs_are_rejected() {
        assert_eq!(PermissionSet::from_slugs(["sales", "payroll"]), Err("payroll".to_string()));
        assert!(serde_json::from_str::<PermissionSet>(r#"["payroll"]"#).is_err());
    }

    #[test]
    fn permission_set_serializes_as_a_slug_list() {
        let set = PermissionSet::from_slugs(["orders", "dashboard"]).unwrap();
        assert_eq!(serde_json::to_value(&set).unwrap(), json!(["dashboard", "orders"]));
        assert_eq!(serde_json::to_value(PermissionSet::All).unwrap(), json!(["all"]));
    }

    #[test]
    fn explicit_set_allows_only_its_pages() {
        let set = PermissionSet::from_slugs(["sales"]).unwrap();
        assert!(set.allows(PageSlug::Sales));
        assert!(!set.allows(PageSlug::Finance));
        assert!(PermissionSet::All.allows(PageSlug::Finance));
    }

    #[test]
    fn static_roles_follow_the_nav_table() {
        assert_eq!(PermissionSet::for_static_role(ADMIN_ROLE), PermissionSet::All);
        assert_eq!(
            PermissionSet::for_static_role(SELLER_ROLE),
            PermissionSet::from_slugs(["dashboard", "sales", "orders", "inventory", "categories", "customers"])
                .unwrap()
        );
        assert_eq!(
            PermissionSet::for_static_role("Estagiário"),
            PermissionSet::Pages(BTreeSet::new())
        );
    }

    #[test]
    fn nav_table_follows_page_order() {
        let slugs: Vec<PageSlug> = NAV_ITEMS.iter().map(|i| i.slug).collect();
        assert_eq!(slugs, PageSlug::ALL.to_vec());
    }
}
