use serde::{Deserialize, Serialize};

/// Courier account data used both to create a courier and to log in.
///
/// Every field is optional on purpose: omitting one is a documented failure
/// case of the creation and login endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

impl CourierCredentials {
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
    ) -> Self {
        Self {
            login: Some(login.into()),
            password: Some(password.into()),
            first_name: Some(first_name.into()),
        }
    }

    /// Credentials without a display name.
    pub fn login_only(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            password: Some(password.into()),
            first_name: None,
        }
    }

    pub fn with_login(mut self, login: Option<String>) -> Self {
        self.login = login;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn with_first_name(mut self, first_name: Option<String>) -> Self {
        self.first_name = first_name;
        self
    }

    /// The login request body: login and password only.
    pub fn login_form(&self) -> CourierCredentials {
        Self {
            login: self.login.clone(),
            password: self.password.clone(),
            first_name: None,
        }
    }
}
