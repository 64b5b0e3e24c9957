use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl User {
    pub(crate) fn identity(&self) -> (&str, Sex) {
        (&self.name, self.sex)
    }
}

/// A user as received, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl TryFrom<UserPayload> for User {
    type Error = ApiError;

    fn try_from(value: UserPayload) -> Result<Self, Self::Error> {
        let UserPayload {
            name,
            sex,
            age,
            zip_code,
        } = value;

        let (Some(name), Some(sex)) = (name, sex) else {
            return Err(ApiError::Conflict {
                message: "name and sex are required".to_string(),
            });
        };

        Ok(Self {
            name,
            sex,
            age,
            zip_code,
        })
    }
}

/// Body of `PUT`/`PATCH /users`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub user_new_values: UserPayload,
    pub user_to_change: UserPayload,
}

/// How the new values apply to the stored user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Absent optional fields are cleared
    Replace,
    /// Absent optional fields keep their value
    Merge,
}

/// Query parameters of `GET /users`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub older_than: Option<u32>,
    pub younger_than: Option<u32>,
    pub sex: Option<Sex>,
}

impl UserQuery {
    pub(crate) fn matches(&self, user: &User) -> bool {
        let older = self
            .older_than
            .is_none_or(|limit| user.age.is_some_and(|age| age > limit));
        let younger = self
            .younger_than
            .is_none_or(|limit| user.age.is_some_and(|age| age < limit));
        let sex = self.sex.is_none_or(|sex| user.sex == sex);

        older && younger && sex
    }
}
