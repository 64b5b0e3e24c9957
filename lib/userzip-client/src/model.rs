//! Payloads of the users and zip-codes resources.

use serde::{Deserialize, Serialize};

/// Sex of a user, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    /// `MALE`
    #[display("MALE")]
    Male,
    /// `FEMALE`
    #[display("FEMALE")]
    Female,
}

/// A user of the API.
///
/// The server requires `name` and `sex`, but every field is optional here so
/// tests can send incomplete payloads on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Name; identifies the user together with `sex`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sex; identifies the user together with `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Zip code, must be available when the user is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl User {
    /// Creates a user with the two required fields.
    pub fn new(name: impl Into<String>, sex: Sex) -> Self {
        Self {
            name: Some(name.into()),
            sex: Some(sex),
            ..Self::default()
        }
    }

    /// Sets the age.
    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the zip code.
    #[must_use]
    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }
}

/// Body of `PUT`/`PATCH /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// The values the user gets.
    pub user_new_values: User,
    /// Selects the user to change.
    pub user_to_change: User,
}

impl UserUpdate {
    /// Creates an update of `user_to_change` with `user_new_values`.
    pub fn new(user_to_change: User, user_new_values: User) -> Self {
        Self {
            user_new_values,
            user_to_change,
        }
    }
}

/// HTTP method used to update a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum UpdateMethod {
    /// `PATCH /users`
    #[default]
    #[display("PATCH")]
    Patch,
    /// `PUT /users`
    #[display("PUT")]
    Put,
}

impl From<UpdateMethod> for http::Method {
    fn from(value: UpdateMethod) -> Self {
        match value {
            UpdateMethod::Patch => Self::PATCH,
            UpdateMethod::Put => Self::PUT,
        }
    }
}

/// A query parameter of `GET /users`, passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// `olderThan=<age>`
    OlderThan(u32),
    /// `youngerThan=<age>`
    YoungerThan(u32),
    /// `sex=<MALE|FEMALE>`
    Sex(Sex),
    /// Any other parameter, sent verbatim.
    Custom {
        /// Parameter name.
        name: String,
        /// Parameter value.
        value: String,
    },
}

impl UserFilter {
    /// Creates a filter sent verbatim.
    pub fn custom(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Custom {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The query parameter as a `(name, value)` pair.
    pub fn to_pair(&self) -> (String, String) {
        match self {
            Self::OlderThan(age) => ("olderThan".to_string(), age.to_string()),
            Self::YoungerThan(age) => ("youngerThan".to_string(), age.to_string()),
            Self::Sex(sex) => ("sex".to_string(), sex.to_string()),
            Self::Custom { name, value } => (name.clone(), value.clone()),
        }
    }
}
