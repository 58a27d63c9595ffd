//! Session collaborator consulted by the navigation switch.
//!
//! The in-memory provider only keeps a user directory and the signed-in user;
//! it performs no credential checks and persists nothing.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Snapshot of the session: who is signed in, and whether it is still being restored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
}

/// Values submitted by the sign-up screen
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpData {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Values submitted by the sign-in screen
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session(&self) -> SessionState;

    async fn sign_in(&self, credentials: SignInData) -> Result<User>;

    async fn sign_up(&self, data: SignUpData) -> Result<User>;

    async fn sign_out(&self) -> Result<()>;
}

#[derive(Debug, Default)]
struct SessionInner {
    users: HashMap<String, User>,
    current: Option<User>,
    loading: bool,
}

/// Session provider backed by process memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionProvider {
    inner: Arc<Mutex<SessionInner>>,
}

impl InMemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that reports `loading` until [`finish_loading`](Self::finish_loading)
    pub fn loading() -> Self {
        let provider = Self::new();
        provider.lock().loading = true;
        provider
    }

    /// Add a known user without going through sign-up
    pub fn with_user(self, name: impl Into<String>, email: impl Into<String>) -> Self {
        let user = User {
            name: name.into(),
            email: email.into(),
        };
        self.lock().users.insert(normalize_email(&user.email), user);
        self
    }

    pub fn finish_loading(&self) {
        self.lock().loading = false;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    async fn session(&self) -> SessionState {
        let inner = self.lock();
        SessionState {
            user: inner.current.clone(),
            loading: inner.loading,
        }
    }

    async fn sign_in(&self, credentials: SignInData) -> Result<User> {
        let mut inner = self.lock();
        let user = inner
            .users
            .get(&normalize_email(&credentials.email))
            .cloned()
            .ok_or_else(|| anyhow!("No account found for {}", credentials.email.trim()))?;
        inner.current = Some(user.clone());
        info!(email = %user.email, "signed in");
        Ok(user)
    }

    async fn sign_up(&self, data: SignUpData) -> Result<User> {
        let key = normalize_email(&data.email);
        let mut inner = self.lock();
        if inner.users.contains_key(&key) {
            return Err(anyhow!("An account with this e-mail already exists"));
        }
        let user = User {
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
        };
        inner.users.insert(key, user.clone());
        info!(email = %user.email, "account created");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut inner = self.lock();
        if let Some(user) = inner.current.take() {
            info!(email = %user.email, "signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str) -> SignUpData {
        SignUpData {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_provider_is_signed_out() {
        let provider = InMemorySessionProvider::new();
        assert_eq!(provider.session().await, SessionState::default());
    }

    #[tokio::test]
    async fn test_loading_until_finished() {
        let provider = InMemorySessionProvider::loading();
        assert!(provider.session().await.loading);
        provider.finish_loading();
        assert!(!provider.session().await.loading);
    }

    #[tokio::test]
    async fn test_sign_up_does_not_sign_in() {
        let provider = InMemorySessionProvider::new();
        let user = provider.sign_up(signup("ana@example.com")).await.unwrap();
        assert_eq!(user.name, "Ana");
        assert!(provider.session().await.user.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_is_rejected() {
        let provider = InMemorySessionProvider::new();
        provider.sign_up(signup("ana@example.com")).await.unwrap();
        let err = provider.sign_up(signup(" ANA@example.com ")).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let provider = InMemorySessionProvider::new().with_user("Bia", "bia@example.com");
        let user = provider
            .sign_in(SignInData {
                email: "Bia@Example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.name, "Bia");
        assert_eq!(provider.session().await.user, Some(user));

        provider.sign_out().await.unwrap();
        assert!(provider.session().await.user.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_unknown_user() {
        let provider = InMemorySessionProvider::new();
        let err = provider
            .sign_in(SignInData {
                email: "ghost@example.com".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No account found"));
    }
}
