/// Business operations on users
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::RepositoryError,
    model::{NewUser, User},
    repository::UserRepository,
};

/// Sits between the HTTP handlers and storage. Rules such as
/// de-duplication or notifications belong here.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;
}

pub struct UserServiceImpl {
    repo: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.repo.create(user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.repo.find_all().await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        self.repo.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;

    #[tokio::test]
    async fn delegates_to_repository() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = UserServiceImpl::new(repo.clone());

        let created = service
            .create_user(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();

        // visible through the repository directly
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(service.list_users().await.unwrap(), vec![created.clone()]);
        assert_eq!(service.get_user_by_id(created.id).await.unwrap(), Some(created));
        assert_eq!(service.get_user_by_id(42).await.unwrap(), None);
    }
}
