use crate::server::{config_warnings, load_config, validate_config, AppConfig};
use strikebot_core::{JsonFileStore, StrikeStore};

pub async fn run() -> anyhow::Result<()> {
    println!("Strikebot configuration check\n");

    let mut all_ok = true;

    print!("Loading configuration... ");
    let config = match load_config() {
        Ok(config) => {
            println!("ok");
            config
        }
        Err(e) => {
            println!("failed\n  {:#}", e);
            std::process::exit(1);
        }
    };

    all_ok &= check_settings(&config);
    all_ok &= check_token();
    all_ok &= check_strikes_file(&config).await;

    println!();
    if all_ok {
        println!("All checks passed. Run `strikebot serve` to start the bot.");
    } else {
        println!("Some checks failed. Please fix the issues above.");
        std::process::exit(1);
    }

    Ok(())
}

fn check_settings(config: &AppConfig) -> bool {
    print!("Validating settings... ");
    if let Err(e) = validate_config(config) {
        println!("failed\n  {:#}", e);
        return false;
    }
    println!("ok (threshold {})", config.escalation.threshold);

    for warning in config_warnings(config) {
        println!("  warning: {}", warning);
    }
    true
}

fn check_token() -> bool {
    print!("Checking DISCORD_BOT_TOKEN... ");
    match std::env::var("DISCORD_BOT_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            println!("set");
            true
        }
        _ => {
            println!("missing");
            false
        }
    }
}

async fn check_strikes_file(config: &AppConfig) -> bool {
    print!("Reading {}... ", config.storage.path);
    let store = JsonFileStore::new(&config.storage.path);
    match store.load().await {
        Ok(ledger) if ledger.is_empty() => {
            println!("empty");
            true
        }
        Ok(ledger) => {
            println!(
                "{} strike(s) for {} member(s)",
                ledger.total_strikes(),
                ledger.member_count()
            );
            true
        }
        Err(e) => {
            println!("failed\n  {}", e);
            false
        }
    }
}
