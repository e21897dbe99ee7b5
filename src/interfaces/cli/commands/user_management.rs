//! 账户管理 CLI 命令
//!
//! 用于创建第一个管理员，以及离线调整权限和配额。

use std::io::{self, IsTerminal, Write};

use colored::Colorize;

use crate::config::AppConfig;
use crate::interfaces::cli::CliError;
use crate::services::{AccountUpdate, AdminService, AuthService, NewAccountOptions};
use crate::storage::Stores;

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::ParseError(
            "No password provided. Use --password or run interactively.".to_string(),
        ));
    }

    print!("Enter password: ");
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    let password = rpassword::read_password()
        .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))?;

    print!("Confirm password: ");
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    let confirm = rpassword::read_password()
        .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))?;

    if password != confirm {
        return Err(CliError::ParseError("Passwords do not match".to_string()));
    }

    Ok(password)
}

pub async fn create_user(
    stores: &Stores,
    config: &AppConfig,
    user_id: String,
    password: Option<String>,
    admin: bool,
    limit: Option<i64>,
) -> Result<(), CliError> {
    let password = match password {
        Some(p) => p,
        None => prompt_password_with_confirm()?,
    };

    let auth = AuthService::new(stores.accounts.clone(), config.links.default_url_limit);
    let account = auth
        .create_account_with(
            &user_id,
            &password,
            NewAccountOptions {
                is_admin: admin,
                url_limit: limit,
            },
        )
        .await?;

    println!(
        "{} Created account {} (admin: {}, url limit: {})",
        "✓".bold().green(),
        account.user_id.cyan(),
        account.is_admin.to_string().magenta(),
        account.url_limit.to_string().yellow()
    );
    Ok(())
}

pub async fn set_admin(stores: &Stores, user_id: String, is_admin: bool) -> Result<(), CliError> {
    let admin = AdminService::new(stores.links.clone(), stores.accounts.clone());
    let account = admin
        .apply_account_update(
            &user_id,
            AccountUpdate {
                url_limit: None,
                is_admin: Some(is_admin),
            },
        )
        .await?;

    println!(
        "{} {} is {}",
        "✓".bold().green(),
        account.user_id.cyan(),
        if account.is_admin {
            "now an administrator".green()
        } else {
            "no longer an administrator".yellow()
        }
    );
    Ok(())
}

pub async fn set_limit(stores: &Stores, user_id: String, url_limit: i64) -> Result<(), CliError> {
    let admin = AdminService::new(stores.links.clone(), stores.accounts.clone());
    let account = admin
        .apply_account_update(
            &user_id,
            AccountUpdate {
                url_limit: Some(url_limit),
                is_admin: None,
            },
        )
        .await?;

    println!(
        "{} URL limit for {} set to {} ({} used)",
        "✓".bold().green(),
        account.user_id.cyan(),
        account.url_limit.to_string().yellow(),
        account.url_count
    );
    Ok(())
}
