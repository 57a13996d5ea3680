//! User account CLI commands: create, list.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;

use crate::state::AppState;

/// Create a verified account, prompting for the password when not given.
///
/// # Examples
///
/// ```bash
/// snapvote user create moderator mod@example.com --superuser
/// ```
pub async fn create_user(
    state: &AppState,
    username: &str,
    email: &str,
    superuser: bool,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt(format!("Password for {}", style(username).bold()))
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    let user = state
        .account_service
        .create_user(username, email, &password, superuser, true)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!(
            "  {} Created {} '{}' ({})",
            style("✓").green().bold(),
            if user.is_superuser { "superuser" } else { "user" },
            style(&user.username).cyan(),
            user.id
        );
    }

    Ok(())
}

/// List all accounts.
pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.account_service.list_users().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!();
        println!(
            "  {} No users yet. Create one with: {}",
            style("i").blue().bold(),
            style("snapvote user create <username> <email>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Username").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Verified").fg(Color::White),
        Cell::new("Joined").fg(Color::White),
    ]);

    for user in &users {
        let role = if user.is_superuser {
            Cell::new("superuser").fg(Color::Magenta)
        } else {
            Cell::new("user")
        };
        let verified = if user.is_verified {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(&user.username).fg(Color::Cyan),
            Cell::new(&user.email),
            role,
            verified,
            Cell::new(user.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} user{}",
        style(users.len()).bold(),
        if users.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
