use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::UserRepository;
use crate::{
    error::RepositoryError,
    model::{NewUser, User},
};

/// Process-local store with the same contract as the `users` table:
/// ids count up from 1 and `email` is unique.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: Vec<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut table = self.inner.write().await;

        if table.rows.iter().any(|row| row.email == user.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "duplicate key value violates unique constraint \"users_email_key\": email {} already exists",
                user.email
            )));
        }

        table.last_id += 1;
        let now = Utc::now();
        let row = User {
            id: table.last_id,
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let table = self.inner.read().await;
        let mut users = table.rows.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let table = self.inner.read().await;
        Ok(table.rows.iter().find(|row| row.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_timestamps() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("Alice", "alice@example.com")).await.unwrap();
        let second = repo.create(new_user("Bob", "bob@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("Alice", "alice@example.com")).await.unwrap();

        let err = repo
            .create(new_user("Alice Again", "alice@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::UniqueViolation(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_all_lists_newest_first() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_all().await.unwrap().is_empty());

        for (name, email) in [("Ann", "ann@example.com"), ("Ben", "ben@example.com"), ("Cal", "cal@example.com")] {
            repo.create(new_user(name, email)).await.unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, ["Cal", "Ben", "Ann"]);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_when_missing() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("Alice", "alice@example.com")).await.unwrap();

        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created));
        assert_eq!(repo.find_by_id(999_999).await.unwrap(), None);
    }
}
