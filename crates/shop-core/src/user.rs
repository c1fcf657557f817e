//! # Users
//!
//! Credential dataset as stored in `usuarios.json`.

use serde::{Deserialize, Serialize};

/// A registered user, including the stored password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
}

impl User {
    pub fn new(
        id: i64,
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            email: String::new(),
            name: name.into(),
        }
    }

    /// Builder: set email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Public projection returned to the client after login
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// User data safe to hand to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// All known users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDirectory {
    #[serde(rename = "usuarios")]
    pub users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a user
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// First user whose username and password both match exactly
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
