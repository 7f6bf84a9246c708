pub mod store;
pub use store::{CollectionRef, Document, DocumentStore, WriteBatch, WriteOp};
pub mod memory_store;
pub use memory_store::MemoryStore;
pub mod pg_store;
pub use pg_store::PgDocumentStore;
pub mod scoped_repo;
pub use scoped_repo::{CompanyRecord, ScopedRepository};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
