//! CLI administration tool for kv-shortener.
//!
//! Talks to the same Redis store as the service, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (prompts for missing values)
//! cargo run --bin admin -- user create --username alice
//!
//! # Check a password
//! cargo run --bin admin -- user check alice
//!
//! # Issue a bearer token for an existing account
//! cargo run --bin admin -- token issue alice --minutes 1440
//!
//! # Inspect links
//! cargo run --bin admin -- link stats abc1234
//! cargo run --bin admin -- link top --limit 20
//!
//! # Check store connection
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! Same as the service: `REDIS_URL` (or its components) and `JWT_SECRET`.

use kv_shortener::application::services::{
    AccountService, LinkService, MAX_TOKEN_MINUTES, TokenService,
};
use kv_shortener::config::{self, Config, StoreBackend, mask_connection_string};
use kv_shortener::infrastructure::store::{KvStore, RedisStore};
use kv_shortener::utils::username::validate_username;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Password};
use std::sync::Arc;

/// CLI tool for managing kv-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Issue bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Verify a username/password pair
    Check { username: String },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token for an existing account
    Issue {
        username: String,

        /// Lifetime in minutes, 1-525600 (defaults to JWT_EXPIRES_MINUTES)
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_MINUTES))]
        minutes: Option<i64>,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show statistics for a code
    Stats { code: String },

    /// Show the most clicked links
    Top {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;

    if config.store_backend == StoreBackend::Memory {
        anyhow::bail!("The admin tool needs STORE_BACKEND=redis; an in-memory store is empty");
    }

    let store: Arc<dyn KvStore> = Arc::new(
        RedisStore::connect(&config.redis_url)
            .await
            .context("Failed to connect to Redis")?,
    );

    match cli.command {
        Commands::User { action } => handle_user_action(action, store).await?,
        Commands::Token { action } => handle_token_action(action, store, &config).await?,
        Commands::Link { action } => handle_link_action(action, store, &config).await?,
        Commands::Store { action } => handle_store_action(action, store, &config).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, store: Arc<dyn KvStore>) -> Result<()> {
    let accounts = AccountService::new(store);

    match action {
        UserAction::Create { username } => create_user(&accounts, username).await,
        UserAction::Check { username } => check_user(&accounts, &username).await,
    }
}

/// Creates an account, prompting for the username and password.
///
/// The password is read twice without echo.
async fn create_user(accounts: &AccountService, username: Option<String>) -> Result<()> {
    println!("{}", "👤 Create account".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    validate_username(&username).map_err(|e| anyhow::anyhow!("{}", e))?;

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if !(6..=128).contains(&password.len()) {
        anyhow::bail!("Password must be 6-128 characters");
    }

    accounts
        .create_user(&username, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Account created:".green().bold(),
        username.cyan()
    );
    println!();

    Ok(())
}

async fn check_user(accounts: &AccountService, username: &str) -> Result<()> {
    let password = Password::new().with_prompt("Password").interact()?;

    let valid = accounts
        .verify_user(username, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    if valid {
        println!("{}", "✅ Credentials are valid".green().bold());
    } else {
        println!("{}", "❌ Unknown user or wrong password".red().bold());
    }

    Ok(())
}

async fn handle_token_action(
    action: TokenAction,
    store: Arc<dyn KvStore>,
    config: &Config,
) -> Result<()> {
    match action {
        TokenAction::Issue { username, minutes } => {
            let accounts = AccountService::new(store);
            if !accounts
                .user_exists(&username)
                .await
                .map_err(|e| anyhow::anyhow!("Store error: {}", e))?
            {
                anyhow::bail!("Account '{}' does not exist", username);
            }

            let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires_minutes);
            let minutes = minutes.unwrap_or(tokens.expires_minutes());
            let token = tokens.issue_token(&username, minutes)?;

            println!("{}", "🔑 Token issued".bright_blue().bold());
            println!();
            println!("  User:    {}", username.cyan());
            println!("  Expires: in {} min", minutes.to_string().bright_white());
            println!("  Token:   {}", token.bright_yellow());
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" {}/top",
                token.bright_yellow(),
                config.base_url
            );
            println!();
        }
    }

    Ok(())
}

async fn handle_link_action(
    action: LinkAction,
    store: Arc<dyn KvStore>,
    config: &Config,
) -> Result<()> {
    let links = LinkService::new(store, config.default_code_length);

    match action {
        LinkAction::Stats { code } => {
            let stats = links
                .get_stats(&code)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "📊 Link statistics".bright_blue().bold());
            println!();
            println!("  Code:      {}", stats.code.cyan());
            println!(
                "  Short URL: {}",
                links.short_url(&config.base_url, &stats.code).bright_white()
            );
            println!("  Target:    {}", stats.original_url);
            println!(
                "  Clicks:    {}",
                stats.click_count.to_string().bright_white().bold()
            );
            if stats.expires() {
                println!(
                    "  Expires:   in {}s (of {}s)",
                    stats.ttl_remaining, stats.ttl_sec
                );
            } else {
                println!("  Expires:   {}", "never".bright_black());
            }
            println!();
        }
        LinkAction::Top { limit } => {
            let top = links
                .get_top(limit)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "🏆 Top links".bright_blue().bold());
            println!();

            if top.is_empty() {
                println!("{}", "  No clicks recorded yet".yellow());
                return Ok(());
            }

            println!(
                "  {:<4} {:<34} {:>10}",
                "#".bright_white().bold(),
                "Code".bright_white().bold(),
                "Clicks".bright_white().bold()
            );
            println!("  {}", "─".repeat(50).bright_black());

            for (rank, link) in top.iter().enumerate() {
                println!(
                    "  {:<4} {:<34} {:>10}",
                    (rank + 1).to_string().bright_black(),
                    link.code.cyan(),
                    link.clicks
                );
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_store_action(
    action: StoreAction,
    store: Arc<dyn KvStore>,
    config: &Config,
) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔌 Checking store connection...".bright_blue());

            store
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("PING failed: {}", e))?;

            println!(
                "{} {}",
                "✅ Connected to".green().bold(),
                mask_connection_string(&config.redis_url)
            );
        }
    }

    Ok(())
}
