//! Demo account seeding.

use anyhow::Result;
use console::style;
use serde::Serialize;

use snapvote_types::error::AccountError;

use crate::state::AppState;

/// Shared password of every demo account.
pub const DEMO_PASSWORD: &str = "123456#";

/// A demo account to create when absent.
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub username: &'static str,
    pub email: &'static str,
    pub is_superuser: bool,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 6] = [
    DemoAccount { username: "admin", email: "admin@example.com", is_superuser: true },
    DemoAccount { username: "artist1", email: "artist1@example.com", is_superuser: false },
    DemoAccount { username: "artist2", email: "artist2@example.com", is_superuser: false },
    DemoAccount { username: "artist3", email: "artist3@example.com", is_superuser: false },
    DemoAccount { username: "artist4", email: "artist4@example.com", is_superuser: false },
    DemoAccount { username: "artist5", email: "artist5@example.com", is_superuser: false },
];

#[derive(Debug, Serialize)]
struct SeedResult {
    username: &'static str,
    created: bool,
}

/// Create every missing demo account, verified, with [`DEMO_PASSWORD`].
pub async fn seed_demo(state: &AppState, json: bool) -> Result<()> {
    let mut results = Vec::with_capacity(DEMO_ACCOUNTS.len());

    for account in DEMO_ACCOUNTS {
        if state
            .account_service
            .get_user_by_email(account.email)
            .await?
            .is_some()
        {
            results.push(SeedResult { username: account.username, created: false });
            continue;
        }

        let created = match state
            .account_service
            .create_user(
                account.username,
                account.email,
                DEMO_PASSWORD,
                account.is_superuser,
                true,
            )
            .await
        {
            Ok(_) => true,
            // Username held by a non-demo account
            Err(AccountError::UsernameTaken) => false,
            Err(e) => return Err(e.into()),
        };
        results.push(SeedResult { username: account.username, created });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!();
    for result in &results {
        if result.created {
            println!("  {} Created {}", style("✓").green().bold(), style(result.username).cyan());
        } else {
            println!("  {} {} already exists", style("·").dim(), result.username);
        }
    }
    println!();
    println!(
        "  Demo password: {}",
        style(DEMO_PASSWORD).yellow().bold()
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_demo_superuser() {
        let superusers: Vec<_> = DEMO_ACCOUNTS.iter().filter(|a| a.is_superuser).collect();
        assert_eq!(superusers.len(), 1);
        assert_eq!(superusers[0].username, "admin");
    }

    #[test]
    fn test_demo_accounts_pass_validation() {
        for account in DEMO_ACCOUNTS {
            assert!(snapvote_core::validation::validate_username(account.username).is_ok());
            assert!(snapvote_core::validation::validate_email(account.email).is_ok());
        }
        assert!(snapvote_core::validation::validate_password(DEMO_PASSWORD).is_ok());
    }
}
