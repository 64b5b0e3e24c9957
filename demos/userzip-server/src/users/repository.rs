use std::sync::Arc;

use tokio::sync::RwLock;

use super::domain::{UpdateMode, User, UserQuery};
use crate::errors::ApiError;

/// Users and the zip codes still available for them.
///
/// A zip code is consumed when a user gets it and released when that user
/// leaves it, so the available list never holds a code in use.
#[derive(Clone)]
pub(crate) struct Directory {
    data: Arc<RwLock<Registry>>,
}

#[derive(Debug, Clone, Default)]
struct Registry {
    users: Vec<User>,
    zip_codes: Vec<String>,
}

impl Directory {
    pub(crate) fn new(zip_codes: impl IntoIterator<Item = String>) -> Self {
        let mut registry = Registry::default();
        registry.add_zip_codes(zip_codes);
        let data = Arc::new(RwLock::new(registry));

        Self { data }
    }

    pub(crate) async fn zip_codes(&self) -> Vec<String> {
        self.data.read().await.zip_codes.clone()
    }

    pub(crate) async fn expand_zip_codes(&self, zip_codes: Vec<String>) -> Vec<String> {
        let mut data = self.data.write().await;
        data.add_zip_codes(zip_codes);
        data.zip_codes.clone()
    }

    pub(crate) async fn list_users(&self, query: &UserQuery) -> Vec<User> {
        let data = self.data.read().await;
        data.users
            .iter()
            .filter(|user| query.matches(user))
            .cloned()
            .collect()
    }

    pub(crate) async fn create_user(&self, user: User) -> Result<User, ApiError> {
        let mut data = self.data.write().await;
        data.insert(user.clone())?;
        Ok(user)
    }

    /// Creates all users or none of them
    pub(crate) async fn create_users(&self, users: Vec<User>) -> Result<usize, ApiError> {
        let mut data = self.data.write().await;

        let mut draft = data.clone();
        let count = users.len();
        for user in users {
            draft.insert(user)?;
        }
        *data = draft;

        Ok(count)
    }

    pub(crate) async fn update_user(
        &self,
        target: &User,
        new_values: User,
        mode: UpdateMode,
    ) -> Result<User, ApiError> {
        let mut data = self.data.write().await;

        let Some(index) = data.position(target) else {
            return Err(not_found(target));
        };
        let Some(current) = data.users.get(index).cloned() else {
            return Err(not_found(target));
        };

        let updated = match mode {
            UpdateMode::Replace => new_values,
            UpdateMode::Merge => User {
                age: new_values.age.or(current.age),
                zip_code: new_values.zip_code.or_else(|| current.zip_code.clone()),
                ..new_values
            },
        };

        if updated.zip_code != current.zip_code
            && let Some(zip_code) = &updated.zip_code
            && !data.is_available(zip_code)
        {
            return Err(unavailable(zip_code));
        }
        if data
            .users
            .iter()
            .enumerate()
            .any(|(other, user)| other != index && user.identity() == updated.identity())
        {
            return Err(duplicate(&updated));
        }

        if updated.zip_code != current.zip_code {
            if let Some(old) = current.zip_code {
                data.zip_codes.push(old);
            }
            if let Some(new) = &updated.zip_code {
                data.zip_codes.retain(|it| it != new);
            }
        }
        if let Some(slot) = data.users.get_mut(index) {
            *slot = updated.clone();
        }

        Ok(updated)
    }

    pub(crate) async fn delete_user(&self, target: &User) -> Result<User, ApiError> {
        let mut data = self.data.write().await;

        let Some(index) = data.position(target) else {
            return Err(not_found(target));
        };
        let removed = data.users.remove(index);
        if let Some(zip_code) = &removed.zip_code {
            data.zip_codes.push(zip_code.clone());
        }

        Ok(removed)
    }
}

impl Registry {
    fn add_zip_codes(&mut self, zip_codes: impl IntoIterator<Item = String>) {
        for zip_code in zip_codes {
            let in_use = self
                .users
                .iter()
                .any(|user| user.zip_code.as_ref() == Some(&zip_code));
            if !in_use && !self.zip_codes.contains(&zip_code) {
                self.zip_codes.push(zip_code);
            }
        }
    }

    fn is_available(&self, zip_code: &str) -> bool {
        self.zip_codes.iter().any(|it| it == zip_code)
    }

    fn position(&self, target: &User) -> Option<usize> {
        self.users
            .iter()
            .position(|user| user.identity() == target.identity())
    }

    fn insert(&mut self, user: User) -> Result<(), ApiError> {
        if let Some(zip_code) = &user.zip_code
            && !self.is_available(zip_code)
        {
            return Err(unavailable(zip_code));
        }
        if self.position(&user).is_some() {
            return Err(duplicate(&user));
        }

        if let Some(zip_code) = &user.zip_code {
            self.zip_codes.retain(|it| it != zip_code);
        }
        self.users.push(user);
        Ok(())
    }
}

fn not_found(user: &User) -> ApiError {
    ApiError::NotFound {
        message: format!("user '{}' ({:?}) not found", user.name, user.sex),
    }
}

fn unavailable(zip_code: &str) -> ApiError {
    ApiError::FailedDependency {
        message: format!("zip code '{zip_code}' is not available"),
    }
}

fn duplicate(user: &User) -> ApiError {
    ApiError::bad_request(format!(
        "user '{}' ({:?}) already exists",
        user.name, user.sex
    ))
}
