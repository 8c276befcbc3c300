use anyhow::Result;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::account::Account;
use crate::clock::reference_zone;
use crate::types::{Amount, LedgerEntry};

const RULE_WIDTH: usize = 70;

/// Format an amount the way it is shown to customers, e.g. `R$1234.50`
pub fn format_money(amount: Amount) -> String {
    format!("R${:.2}", amount)
}

impl Serialize for LedgerEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("LedgerEntry", 4)?;
        state.serialize_field("timestamp", &self.timestamp.to_rfc3339())?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("amount", &format!("{:.2}", self.amount))?;
        state.serialize_field("balance_after", &format!("{:.2}", self.balance_after))?;
        state.end()
    }
}

/// Write all entries to the provided destination (in CSV format)
pub fn write_statement(
    destination: &mut dyn std::io::Write,
    entries: impl Iterator<Item = LedgerEntry>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(destination);

    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the account's statement for the console, closing with the current balance
pub fn render_statement(account: &Account) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!(
        "Statement for account {} - branch {}\n{}\n",
        account.number(),
        account.branch(),
        rule
    );

    let entries = account.statement();
    if entries.is_empty() {
        out.push_str("No transactions.\n");
    }
    for entry in entries {
        let timestamp = entry.timestamp.with_timezone(&reference_zone());
        out.push_str(&format!(
            "{} | {:10} | {:12} | Balance after: {}\n",
            timestamp.format("%Y-%m-%d %H:%M:%S %:z"),
            entry.kind,
            format_money(entry.amount),
            format_money(entry.balance_after)
        ));
    }

    out.push_str(&format!(
        "{}\nCurrent balance: {}\n",
        rule,
        format_money(account.balance())
    ));
    out
}
