/// Storage access for users
use async_trait::async_trait;

use crate::{
    error::RepositoryError,
    model::{NewUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// CRUD operations against the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// All users, newest first. An empty store yields an empty list.
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// `Ok(None)` when no row has this id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;
}
