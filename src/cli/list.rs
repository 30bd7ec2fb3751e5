use crate::server::load_config;
use anyhow::Context;
use strikebot_core::{JsonFileStore, Ledger, StrikeStore};

pub async fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    let store = JsonFileStore::new(&config.storage.path);
    let ledger = store
        .load()
        .await
        .with_context(|| format!("Failed to read {}", store.path().display()))?;

    print!("{}", render(&ledger));
    Ok(())
}

fn render(ledger: &Ledger) -> String {
    if ledger.is_empty() {
        return "No strikes recorded.\n".to_string();
    }

    let mut out = format!(
        "{} member(s), {} strike(s)\n",
        ledger.member_count(),
        ledger.total_strikes()
    );
    for (member, history) in ledger {
        out.push_str(&format!("\n{} ({})\n", member, history.len()));
        for strike in history {
            let when = strike
                .issued_at()
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  {}  {}  by {}\n",
                when,
                strike.reason(),
                strike.striked_by()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use strikebot_core::{Issuer, StrikeRecord};

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Ledger::new()), "No strikes recorded.\n");
    }

    #[test]
    fn test_render_entries() {
        let mut ledger = Ledger::new();
        ledger.append("7".into(), StrikeRecord::unstamped("spam", &Issuer::named("mod")));

        let text = render(&ledger);
        assert!(text.starts_with("1 member(s), 1 strike(s)\n"));
        assert!(text.contains("\n7 (1)\n"));
        assert!(text.contains("  -  spam  by mod\n"));
    }
}
