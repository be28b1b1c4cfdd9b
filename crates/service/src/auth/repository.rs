use async_trait::async_trait;
use models::Role;
use uuid::Uuid;

use super::domain::Account;
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Staff accounts take precedence over clients sharing an email.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    /// Reload an account named in a token. `role` selects the table: clients
    /// live apart from staff. The returned role is the stored one.
    async fn find_account(&self, id: Uuid, role: Role) -> Result<Option<Account>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<HashMap<Uuid, Account>>,
    }

    impl MockAuthRepository {
        /// Store an account with an already hashed password.
        pub fn insert(&self, account: Account) {
            self.accounts.lock().unwrap().insert(account.id, account);
        }

        pub fn remove(&self, id: Uuid) {
            self.accounts.lock().unwrap().remove(&id);
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            let email = email.trim().to_lowercase();
            let mut found: Vec<&Account> = accounts.values().filter(|a| a.email == email).collect();
            found.sort_by_key(|a| a.role == Role::Client);
            Ok(found.first().map(|a| (*a).clone()))
        }

        async fn find_account(&self, id: Uuid, role: Role) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts
                .get(&id)
                .filter(|a| (a.role == Role::Client) == (role == Role::Client))
                .cloned())
        }
    }
}
