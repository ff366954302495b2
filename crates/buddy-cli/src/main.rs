//! Buddy CLI - Look after your buddy from the terminal
//!
//! Thin client for the Buddy API: feed, drink, sleep and check vitals.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{Input, Password};
use std::fs;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use api::{BuddyClient, BuddyResponse, CreateBuddyRequest};
use config::{Config, Profile};

#[derive(Parser)]
#[command(name = "buddyctl")]
#[command(about = "Buddy CLI - Keep your buddy fed, watered and rested", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Create a buddy for a user and save it as a profile
    Adopt {
        /// Buddy name (will prompt if not provided)
        name: Option<String>,
        /// Owner's user ID
        #[arg(long)]
        user_id: Uuid,
        /// IANA timezone for the buddy's day (e.g., "Asia/Tokyo")
        #[arg(short, long)]
        timezone: Option<String>,
        /// Image URL
        #[arg(long)]
        image_url: Option<String>,
        /// Profile name to save (defaults to the buddy name, lowercased)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Manage profiles (buddy shortcuts)
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Show vitals
    Status {
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Feed the buddy
    Feed {
        /// Healthy meal
        #[arg(long, conflicts_with_all = ["junk", "photo"])]
        healthy: bool,
        /// Unhealthy meal
        #[arg(long, conflicts_with = "photo")]
        junk: bool,
        /// Photo of the meal to classify
        #[arg(long)]
        photo: Option<String>,
        /// Image URL to store in the food journal with the photo
        #[arg(long, requires = "photo")]
        image_url: Option<String>,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Give the buddy water
    Drink {
        /// Number of cups
        #[arg(default_value = "1")]
        cups: String,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Put the buddy to sleep, or wake it up
    Sleep {
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Apply pending decay now
    Tick {
        /// Bypass the one-minute throttle
        #[arg(short, long)]
        force: bool,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Record today's pedometer steps
    Steps {
        steps: i64,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Food journal
    Food {
        #[command(subcommand)]
        action: FoodAction,
    },

    /// Start or stop the server-side periodic tick
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Remove duplicate buddies of a user, keeping the latest
    Cleanup {
        /// Owner's user ID (defaults to the profile's user)
        #[arg(long)]
        user_id: Option<Uuid>,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Add a new profile
    Add {
        /// Profile name (e.g., "mochi")
        name: String,
        /// Buddy ID
        #[arg(long)]
        buddy_id: Uuid,
    },
    /// List all profiles
    List,
    /// Set default profile
    Set {
        /// Profile name to set as default
        name: String,
    },
    /// Remove a profile
    Remove {
        /// Profile name to remove
        name: String,
    },
}

#[derive(Subcommand)]
enum FoodAction {
    /// List recent meals
    List {
        /// Max entries
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Clear the journal
    Clear {
        /// Profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Start ticking
    Start {
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Stop ticking
    Stop {
        #[arg(short, long)]
        profile: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Adopt { name, user_id, timezone, image_url, profile } => {
            cmd_adopt(name, user_id, timezone, image_url, profile).await
        }
        Commands::Profile { action } => cmd_profile(action).await,
        Commands::Status { profile } => cmd_status(profile).await,
        Commands::Feed { healthy, junk, photo, image_url, profile } => {
            cmd_feed(healthy, junk, photo, image_url, profile).await
        }
        Commands::Drink { cups, profile } => cmd_drink(cups, profile).await,
        Commands::Sleep { profile } => cmd_sleep(profile).await,
        Commands::Tick { force, profile } => cmd_tick(force, profile).await,
        Commands::Steps { steps, profile } => cmd_steps(steps, profile).await,
        Commands::Food { action } => cmd_food(action).await,
        Commands::Session { action } => cmd_session(action).await,
        Commands::Cleanup { user_id, profile } => cmd_cleanup(user_id, profile).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Helpers
// ============================================

fn client(config: &Config) -> BuddyClient {
    BuddyClient::new(&config.base_url, config.api_key.as_deref())
}

/// Client plus the buddy ID of the selected profile
fn target(profile: Option<&str>) -> Result<(BuddyClient, Uuid)> {
    let config = Config::load()?;
    let buddy_id = config.buddy_id(profile).context(
        "No profile specified and no default profile set. Use -p <profile> or set a default.",
    )?;
    Ok((client(&config), buddy_id))
}

/// Green at 50+, yellow at 20+, red below
fn level(value: i32) -> ColoredString {
    let text = value.to_string();
    if value >= 50 {
        text.green()
    } else if value >= 20 {
        text.yellow()
    } else {
        text.red()
    }
}

fn ago(at: Option<DateTime<Utc>>) -> String {
    match at {
        None => "never".to_string(),
        Some(at) => {
            let minutes = (Utc::now() - at).num_minutes().max(0);
            if minutes < 60 {
                format!("{}m ago", minutes)
            } else {
                format!("{}h {}m ago", minutes / 60, minutes % 60)
            }
        }
    }
}

fn print_vitals(buddy: &BuddyResponse) {
    let state = if buddy.is_sleeping {
        match buddy.sleep_start_time {
            Some(since) => format!("💤 sleeping ({})", ago(Some(since))),
            None => "💤 sleeping".to_string(),
        }
    } else {
        "awake".to_string()
    };

    println!(
        "{} {} [{}]",
        buddy.name.cyan().bold(),
        buddy.id.to_string().dimmed(),
        state
    );
    println!("  HP:     {}/100", level(buddy.hp));
    println!("  Energy: {}/100", level(buddy.energy));
    println!(
        "  Water:  {}/{} cups (last {})",
        buddy.water_consumed,
        buddy.water_goal,
        ago(buddy.last_drank)
    );
    println!("  Food:   last {}", ago(buddy.last_fed));
    println!("  Sleep:  {:.1}h today", buddy.slept_today);
    println!("  Steps:  {}", buddy.steps);
    println!(
        "  {}",
        format!(
            "owner {} · {} · updated {}",
            buddy.user_id,
            buddy.timezone,
            ago(Some(buddy.last_updated))
        )
        .dimmed()
    );
}

/// Profile name derived from a buddy name ("Mochi Chan" -> "mochi-chan")
fn profile_name_for(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load_file()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = BuddyClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Buddy API at {}", config.base_url);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    if config.profiles.is_empty() {
        println!("\n{}", "Tip: Adopt a buddy to get started:".yellow());
        println!("  buddyctl adopt Mochi --user-id <USER_ID>");
    }

    Ok(())
}

async fn cmd_adopt(
    name: Option<String>,
    user_id: Uuid,
    timezone: Option<String>,
    image_url: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Buddy name")
            .interact_text()
            .context("Failed to read input")?,
    };

    let config = Config::load()?;
    let resp = client(&config)
        .create_buddy(&CreateBuddyRequest {
            user_id,
            name: &name,
            image_url: image_url.as_deref(),
            timezone: timezone.as_deref(),
        })
        .await?;

    let buddy = resp.buddy;
    if resp.created {
        println!("{} {} was born!", "🐣".green(), buddy.name.cyan().bold());
    } else {
        println!(
            "{} User already has {}; saving it instead",
            "!".yellow(),
            buddy.name.cyan().bold()
        );
    }

    // Persist profiles without baking environment overrides into the file
    let mut file_config = Config::load_file()?;
    let profile_name = profile.unwrap_or_else(|| profile_name_for(&buddy.name));
    file_config.add_profile(
        profile_name.clone(),
        Profile {
            buddy_id: buddy.id,
            user_id: Some(buddy.user_id),
            name: Some(buddy.name.clone()),
        },
    );
    if file_config.default_profile.is_none() {
        file_config.set_default_profile(profile_name.clone());
    }
    file_config.save()?;

    println!("{} Profile '{}' saved", "✓".green(), profile_name);
    print_vitals(&buddy);
    Ok(())
}

async fn cmd_profile(action: ProfileAction) -> Result<()> {
    let mut config = Config::load_file()?;

    match action {
        ProfileAction::Add { name, buddy_id } => {
            let mut runtime = config.clone();
            runtime.apply_overrides(|key| std::env::var(key).ok());

            // Verify the buddy exists
            let buddy = client(&runtime)
                .get_buddy(buddy_id)
                .await
                .context("Could not verify buddy")?;

            config.add_profile(
                name.clone(),
                Profile {
                    buddy_id,
                    user_id: Some(buddy.user_id),
                    name: Some(buddy.name.clone()),
                },
            );
            config.save()?;
            println!("{} Profile '{}' added ({})", "✓".green(), name, buddy.name);
        }

        ProfileAction::List => {
            if config.profiles.is_empty() {
                println!("No profiles configured.");
                println!("\n{}", "Add one with:".dimmed());
                println!("  buddyctl profile add <name> --buddy-id <BUDDY_ID>");
                return Ok(());
            }

            println!("{}", "Profiles:".bold());
            for (name, profile) in &config.profiles {
                let is_default = config.default_profile.as_ref() == Some(name);
                let default_marker = if is_default {
                    " (default)".green().to_string()
                } else {
                    String::new()
                };
                let display_name = profile.name.as_deref().unwrap_or("-");

                println!(
                    "  {} {} ({}){}",
                    name.cyan(),
                    display_name.dimmed(),
                    profile.buddy_id,
                    default_marker
                );
            }
        }

        ProfileAction::Set { name } => {
            if config.set_default_profile(name.clone()) {
                config.save()?;
                println!("{} Default profile set to '{}'", "✓".green(), name);
            } else {
                bail!("Profile '{}' not found", name);
            }
        }

        ProfileAction::Remove { name } => {
            if config.remove_profile(&name) {
                config.save()?;
                println!("{} Profile '{}' removed", "✓".green(), name);
            } else {
                bail!("Profile '{}' not found", name);
            }
        }
    }

    Ok(())
}

async fn cmd_status(profile: Option<String>) -> Result<()> {
    let (client, buddy_id) = target(profile.as_deref())?;
    let buddy = client.get_buddy(buddy_id).await?;
    print_vitals(&buddy);
    Ok(())
}

async fn cmd_feed(
    healthy: bool,
    junk: bool,
    photo: Option<String>,
    image_url: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let (client, buddy_id) = target(profile.as_deref())?;

    if let Some(path) = photo {
        let image = fs::read(&path).with_context(|| format!("Failed to read photo: {}", path))?;
        let resp = client
            .feed_photo(buddy_id, &image, image_url.as_deref())
            .await?;

        println!("{} {}", resp.title.bold(), resp.message);
        let entry = &resp.entry;
        println!(
            "  {} ({:.0}% sure) +{} HP [{}]",
            entry.name.cyan(),
            entry.confidence * 100.0,
            entry.hp_gain,
            entry.labels.join(", ").dimmed()
        );
        print_vitals(&resp.buddy);
        return Ok(());
    }

    if !healthy && !junk {
        bail!("Say what was eaten: --healthy, --junk or --photo <FILE>");
    }

    let resp = client.feed(buddy_id, healthy).await?;
    println!("{} {}", resp.title.bold(), resp.message);
    print_vitals(&resp.buddy);
    Ok(())
}

async fn cmd_drink(cups: String, profile: Option<String>) -> Result<()> {
    let (client, buddy_id) = target(profile.as_deref())?;
    let resp = client.drink(buddy_id, &cups).await?;
    println!("{} {}", resp.title.bold(), resp.message);
    print_vitals(&resp.buddy);
    Ok(())
}

async fn cmd_sleep(profile: Option<String>) -> Result<()> {
    let (client, buddy_id) = target(profile.as_deref())?;
    let resp = client.toggle_sleep(buddy_id).await?;
    println!("{} {}", resp.title.bold(), resp.message);
    print_vitals(&resp.buddy);
    Ok(())
}

async fn cmd_tick(force: bool, profile: Option<String>) -> Result<()> {
    let (client, buddy_id) = target(profile.as_deref())?;
    let resp = client.tick(buddy_id, force).await?;

    println!("Tick: {}", resp.outcome.cyan());
    for notification in &resp.notifications {
        println!(
            "  {} {} {}",
            "⚠".red(),
            format!("[{}]", notification.kind).dimmed(),
            notification.message
        );
    }
    print_vitals(&resp.buddy);
    Ok(())
}

async fn cmd_steps(steps: i64, profile: Option<String>) -> Result<()> {
    let (client, buddy_id) = target(profile.as_deref())?;
    let buddy = client.record_steps(buddy_id, steps).await?;
    println!("{} {} steps recorded", "✓".green(), buddy.steps);
    Ok(())
}

async fn cmd_food(action: FoodAction) -> Result<()> {
    match action {
        FoodAction::List { limit, profile } => {
            let (client, buddy_id) = target(profile.as_deref())?;
            let entries = client.food_journal(buddy_id, limit).await?;

            if entries.is_empty() {
                println!("No meals recorded yet.");
                return Ok(());
            }

            println!("{}", "Recent meals:".bold());
            for entry in entries {
                let badge = if entry.is_healthy {
                    "healthy".green()
                } else {
                    "unhealthy".red()
                };
                println!(
                    "  {} {} [{}] +{} HP",
                    entry.eaten_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    entry.name.cyan(),
                    badge,
                    entry.hp_gain
                );
            }
        }

        FoodAction::Clear { profile } => {
            let (client, buddy_id) = target(profile.as_deref())?;
            let resp = client.clear_food_journal(buddy_id).await?;
            println!("{} Removed {} meals", "✓".green(), resp.removed);
        }
    }

    Ok(())
}

async fn cmd_session(action: SessionAction) -> Result<()> {
    let (profile, active) = match action {
        SessionAction::Start { profile } => (profile, true),
        SessionAction::Stop { profile } => (profile, false),
    };

    let (client, buddy_id) = target(profile.as_deref())?;
    let resp = client.set_session(buddy_id, active).await?;

    if resp.ticking {
        println!("{} Vitals ticking on the server", "⏰".green());
    } else {
        println!("{} Vitals ticking stopped", "✓".green());
    }
    Ok(())
}

async fn cmd_cleanup(user_id: Option<Uuid>, profile: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let user_id = match user_id {
        Some(id) => id,
        None => config
            .get_profile(profile.as_deref())
            .and_then(|p| p.user_id)
            .context("No user ID given and the profile has none. Use --user-id <USER_ID>.")?,
    };

    let resp = client(&config).cleanup_duplicates(user_id).await?;
    println!("{} Removed {} duplicate buddies", "✓".green(), resp.removed);
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Default Profile: {}",
        config.default_profile.as_deref().unwrap_or("None").cyan()
    );
    println!("  Profiles: {}", config.profiles.len());

    Ok(())
}
