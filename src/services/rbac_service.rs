// src/services/rbac_service.rs

use std::sync::Arc;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{store::USERS, CollectionRef, DocumentStore, ScopedRepository, UserRepository, WriteBatch},
    models::rbac::{
        CreateRolePayload, NavEntry, NavItem, PagePermission, PageSlug, PermissionSet, Role, RoleData,
        UpdateRolePayload, ADMIN_ROLE, NAV_ITEMS,
    },
};

/// Itens liberados pelas permissões do cargo; o curinga libera todos.
pub fn filter_by_permissions<'a>(items: &'a [NavItem], permissions: &PermissionSet) -> Vec<&'a NavItem> {
    items
        .iter()
        .filter(|item| permissions.allows(item.slug))
        .collect()
}

fn parse_permissions(slugs: &[String]) -> Result<PermissionSet, AppError> {
    PermissionSet::from_slugs(slugs).map_err(AppError::UnknownPermission)
}

#[derive(Clone)]
pub struct RbacService {
    store: Arc<dyn DocumentStore>,
    repo: ScopedRepository<Role>,
    user_repo: UserRepository,
}

impl RbacService {
    pub fn new(store: Arc<dyn DocumentStore>, repo: ScopedRepository<Role>, user_repo: UserRepository) -> Self {
        Self { store, repo, user_repo }
    }

    // Ids dos membros da empresa que carregam o cargo `role_name`
    async fn holders_of(&self, company_id: Uuid, role_name: &str) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .user_repo
            .list_profiles_by_company(company_id)
            .await?
            .into_iter()
            .filter(|profile| profile.role == role_name)
            .map(|profile| profile.id)
            .collect())
    }

    /// Permissões efetivas de um cargo: o documento do cargo na empresa, ou a
    /// tabela estática quando a empresa não tem esse cargo cadastrado.
    pub async fn permissions_for(&self, company_id: Uuid, role_name: &str) -> Result<PermissionSet, AppError> {
        match self.repo.find_by_field(company_id, "name", role_name).await? {
            Some(role) => Ok(role.permissions),
            None => Ok(PermissionSet::for_static_role(role_name)),
        }
    }

    pub fn navigation(&self, permissions: &PermissionSet) -> Vec<NavEntry> {
        filter_by_permissions(NAV_ITEMS, permissions)
            .into_iter()
            .map(NavEntry::from)
            .collect()
    }

    pub fn list_page_permissions(&self) -> Vec<PagePermission> {
        PageSlug::ALL
            .into_iter()
            .map(|id| PagePermission { id, label: id.label().to_string() })
            .collect()
    }

    pub async fn list_roles(&self, company_id: Uuid) -> Result<Vec<Role>, AppError> {
        self.repo.list(company_id).await
    }

    pub async fn create_role(&self, company_id: Uuid, payload: &CreateRolePayload) -> Result<Role, AppError> {
        let permissions = parse_permissions(&payload.permissions)?;
        let name = payload.name.trim();

        if self.repo.find_by_field(company_id, "name", name).await?.is_some() {
            return Err(AppError::RoleAlreadyExists(name.to_string()));
        }

        let role = self
            .repo
            .create(company_id, &RoleData { name, permissions: &permissions })
            .await?;

        tracing::info!("🔐 Cargo '{}' criado na empresa {}", role.name, company_id);
        Ok(role)
    }

    pub async fn update_role(
        &self,
        company_id: Uuid,
        role_id: Uuid,
        payload: &UpdateRolePayload,
    ) -> Result<Role, AppError> {
        let current = self.repo.find(company_id, role_id).await?;
        let mut patch = Map::new();
        let mut renamed_to = None;

        if let Some(name) = payload.name.as_deref().map(str::trim) {
            if name != current.name {
                if current.name == ADMIN_ROLE {
                    return Err(AppError::ProtectedRole);
                }
                if self.repo.find_by_field(company_id, "name", name).await?.is_some() {
                    return Err(AppError::RoleAlreadyExists(name.to_string()));
                }
                renamed_to = Some(name);
            }
            patch.insert("name".into(), Value::String(name.to_string()));
        }

        if let Some(slugs) = &payload.permissions {
            let permissions = parse_permissions(slugs)?;
            if current.name == ADMIN_ROLE && !permissions.is_all() {
                return Err(AppError::ProtectedRole);
            }
            patch.insert("permissions".into(), serde_json::to_value(&permissions)?);
        }

        let Some(new_name) = renamed_to else {
            return self.repo.merge_value(company_id, role_id, Value::Object(patch)).await;
        };

        // O rótulo do cargo vive no perfil; renomear leva os membros junto no mesmo lote
        let holders = self.holders_of(company_id, &current.name).await?;
        let mut batch = WriteBatch::new();
        batch.merge(ScopedRepository::<Role>::path(company_id), role_id, Value::Object(patch));
        for user_id in &holders {
            batch.merge(CollectionRef::root(USERS), *user_id, json!({ "role": new_name }));
        }
        self.store.commit(batch).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Cargo"),
            other => other,
        })?;

        tracing::info!(
            "🔐 Cargo '{}' renomeado para '{}' ({} membros atualizados)",
            current.name,
            new_name,
            holders.len()
        );
        self.repo.find(company_id, role_id).await
    }

    pub async fn delete_role(&self, company_id: Uuid, role_id: Uuid) -> Result<(), AppError> {
        let role = self.repo.find(company_id, role_id).await?;
        if role.name == ADMIN_ROLE {
            return Err(AppError::ProtectedRole);
        }
        if !self.holders_of(company_id, &role.name).await?.is_empty() {
            return Err(AppError::RoleInUse(role.name));
        }
        self.repo.delete(company_id, role_id).await?;
        tracing::info!("🗑️ Cargo '{}' removido da empresa {}", role.name, company_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::MemoryStore,
        models::{
            rbac::{filter_by_role, SELLER_ROLE},
            tenancy::ProfileData,
        },
    };

    fn service_with_store() -> (RbacService, Arc<dyn DocumentStore>) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let rbac = RbacService::new(
            store.clone(),
            ScopedRepository::new(store.clone()),
            UserRepository::new(store.clone()),
        );
        (rbac, store)
    }

    fn service() -> RbacService {
        service_with_store().0
    }

    async fn add_profile(store: &Arc<dyn DocumentStore>, company_id: Uuid, role: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        let mut batch = WriteBatch::new();
        batch.set(
            CollectionRef::root(USERS),
            user_id,
            serde_json::to_value(ProfileData {
                name: "Membro",
                email: "membro@example.com",
                phone: "",
                company_id,
                role,
            })
            .unwrap(),
        );
        store.commit(batch).await.unwrap();
        user_id
    }

    async fn role_of(store: &Arc<dyn DocumentStore>, user_id: Uuid) -> String {
        UserRepository::new(store.clone())
            .find_profile(user_id)
            .await
            .unwrap()
            .unwrap()
            .role
    }

    fn slugs(items: Vec<&NavItem>) -> Vec<&'static str> {
        items.into_iter().map(|i| i.slug.as_str()).collect()
    }

    #[test]
    fn role_filter_keeps_table_order() {
        assert_eq!(filter_by_role(NAV_ITEMS, ADMIN_ROLE).len(), NAV_ITEMS.len());
        assert_eq!(
            slugs(filter_by_role(NAV_ITEMS, SELLER_ROLE)),
            ["dashboard", "sales", "orders", "inventory", "categories", "customers"]
        );
        assert!(filter_by_role(NAV_ITEMS, "Desconhecido").is_empty());
    }

    #[test]
    fn explicit_permissions_show_exactly_their_pages() {
        let perms = PermissionSet::from_slugs(["settings", "sales"]).unwrap();
        assert_eq!(slugs(filter_by_permissions(NAV_ITEMS, &perms)), ["sales", "settings"]);
        assert_eq!(filter_by_permissions(NAV_ITEMS, &PermissionSet::All).len(), NAV_ITEMS.len());
    }

    #[tokio::test]
    async fn stored_roles_override_the_static_table() {
        let rbac = service();
        let company_id = Uuid::new_v4();

        assert_eq!(
            rbac.permissions_for(company_id, SELLER_ROLE).await.unwrap(),
            PermissionSet::for_static_role(SELLER_ROLE)
        );

        rbac.create_role(
            company_id,
            &CreateRolePayload { name: SELLER_ROLE.into(), permissions: vec!["finance".into()] },
        )
        .await
        .unwrap();

        assert_eq!(
            rbac.permissions_for(company_id, SELLER_ROLE).await.unwrap(),
            PermissionSet::from_slugs(["finance"]).unwrap()
        );
    }

    #[tokio::test]
    async fn admin_role_is_protected() {
        let rbac = service();
        let company_id = Uuid::new_v4();
        let admin = rbac
            .create_role(company_id, &CreateRolePayload { name: ADMIN_ROLE.into(), permissions: vec!["all".into()] })
            .await
            .unwrap();

        let rename = UpdateRolePayload { name: Some("Chefe".into()), permissions: None };
        assert!(matches!(
            rbac.update_role(company_id, admin.id, &rename).await,
            Err(AppError::ProtectedRole)
        ));

        let narrow = UpdateRolePayload { name: None, permissions: Some(vec!["sales".into()]) };
        assert!(matches!(
            rbac.update_role(company_id, admin.id, &narrow).await,
            Err(AppError::ProtectedRole)
        ));

        assert!(matches!(rbac.delete_role(company_id, admin.id).await, Err(AppError::ProtectedRole)));
    }

    #[tokio::test]
    async fn role_names_are_unique_per_company() {
        let rbac = service();
        let company_id = Uuid::new_v4();
        let payload = CreateRolePayload { name: "Estoquista".into(), permissions: vec!["inventory".into()] };

        rbac.create_role(company_id, &payload).await.unwrap();
        assert!(matches!(
            rbac.create_role(company_id, &payload).await,
            Err(AppError::RoleAlreadyExists(_))
        ));
        // Outra empresa pode usar o mesmo nome
        rbac.create_role(Uuid::new_v4(), &payload).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_permission_slugs_are_rejected() {
        let rbac = service();
        let payload = CreateRolePayload { name: "RH".into(), permissions: vec!["payroll".into()] };
        assert!(matches!(
            rbac.create_role(Uuid::new_v4(), &payload).await,
            Err(AppError::UnknownPermission(slug)) if slug == "payroll"
        ));
    }

    #[tokio::test]
    async fn renaming_a_role_moves_its_members() {
        let (rbac, store) = service_with_store();
        let company_id = Uuid::new_v4();
        let seller = rbac
            .create_role(
                company_id,
                &CreateRolePayload { name: SELLER_ROLE.into(), permissions: vec!["sales".into()] },
            )
            .await
            .unwrap();
        let member = add_profile(&store, company_id, SELLER_ROLE).await;
        let owner = add_profile(&store, company_id, ADMIN_ROLE).await;
        let elsewhere = add_profile(&store, Uuid::new_v4(), SELLER_ROLE).await;

        let rename = UpdateRolePayload { name: Some("Vendas".into()), permissions: None };
        let renamed = rbac.update_role(company_id, seller.id, &rename).await.unwrap();
        assert_eq!(renamed.name, "Vendas");

        assert_eq!(role_of(&store, member).await, "Vendas");
        assert_eq!(role_of(&store, owner).await, ADMIN_ROLE);
        assert_eq!(role_of(&store, elsewhere).await, SELLER_ROLE);

        // O membro continua vendo só o que o cargo libera
        let permissions = rbac.permissions_for(company_id, &role_of(&store, member).await).await.unwrap();
        assert_eq!(permissions, PermissionSet::from_slugs(["sales"]).unwrap());
        assert_eq!(slugs(filter_by_permissions(NAV_ITEMS, &permissions)), ["sales"]);
    }

    #[tokio::test]
    async fn roles_with_members_cannot_be_deleted() {
        let (rbac, store) = service_with_store();
        let company_id = Uuid::new_v4();
        let stock = rbac
            .create_role(
                company_id,
                &CreateRolePayload { name: "Estoquista".into(), permissions: vec!["inventory".into()] },
            )
            .await
            .unwrap();
        let member = add_profile(&store, company_id, "Estoquista").await;
        // Mesmo nome em outra empresa não conta
        add_profile(&store, Uuid::new_v4(), "Estoquista").await;

        assert!(matches!(
            rbac.delete_role(company_id, stock.id).await,
            Err(AppError::RoleInUse(name)) if name == "Estoquista"
        ));
        assert_eq!(rbac.list_roles(company_id).await.unwrap().len(), 1);

        let mut batch = WriteBatch::new();
        batch.merge(CollectionRef::root(USERS), member, json!({ "role": SELLER_ROLE }));
        store.commit(batch).await.unwrap();

        rbac.delete_role(company_id, stock.id).await.unwrap();
        assert!(rbac.list_roles(company_id).await.unwrap().is_empty());
    }
}
