use anyhow::{Context, Result};
use log::debug;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::bank::Bank;
use crate::error::TellerError;
use crate::statement::{format_money, render_statement, write_statement};
use crate::types::{round_cents, Amount, Customer};

const MENU: &[(&str, &str)] = &[
    ("1", "Add customer and create account"),
    ("2", "Deposit"),
    ("3", "Withdraw"),
    ("4", "Balance"),
    ("5", "Statement"),
    ("6", "List accounts"),
    ("7", "Export statement as CSV"),
    ("0", "Quit"),
];

/// Parse a user-typed amount, accepting a comma as decimal separator
pub fn parse_amount(input: &str) -> Option<Amount> {
    let normalized = input.trim().replace(',', ".");
    Amount::from_str(&normalized).ok()
}

enum Flow {
    Continue,
    Quit,
}

/// Outcome of asking for an account number
enum Lookup {
    Found(String),
    Missing,
    EndOfInput,
}

/// An interactive teller session reading commands from `input` and printing to `output`
///
/// Rejected operations are reported and the session carries on. It ends on the quit option or
/// when the input is exhausted.
pub struct Session<'a, R, W> {
    bank: &'a mut Bank,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(bank: &'a mut Bank, input: R, output: W) -> Self {
        Self {
            bank,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== MAIN MENU ===")?;
            for (key, description) in MENU {
                writeln!(self.output, "{} - {}", key, description)?;
            }

            let Some(choice) = self.ask("Choose an option: ")? else {
                break;
            };
            debug!("Menu choice {:?}", choice);

            let flow = match choice.as_str() {
                "1" => self.create_account()?,
                "2" => self.deposit()?,
                "3" => self.withdraw()?,
                "4" => self.balance()?,
                "5" => self.statement()?,
                "6" => self.list_accounts()?,
                "7" => self.export_statement()?,
                "0" => Flow::Quit,
                _ => {
                    writeln!(self.output, "Invalid option, please try again.")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        writeln!(self.output, "Closing the session. Goodbye!")?;
        Ok(())
    }

    /// Prompt for a line of input, `None` once the input is exhausted
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_amount(&mut self, prompt: &str) -> Result<Option<Amount>> {
        loop {
            let Some(raw) = self.ask(prompt)? else {
                return Ok(None);
            };
            match parse_amount(&raw) {
                Some(amount) => return Ok(Some(amount)),
                None => writeln!(self.output, "Invalid amount. Enter a number, e.g. 100.50")?,
            }
        }
    }

    /// Prompt for the number of an existing account, reporting a miss
    fn ask_account(&mut self) -> Result<Lookup> {
        let Some(number) = self.ask("Account number: ")? else {
            return Ok(Lookup::EndOfInput);
        };
        if self.bank.get_account(&number).is_none() {
            self.reject(&TellerError::AccountNotFound(number))?;
            return Ok(Lookup::Missing);
        }
        Ok(Lookup::Found(number))
    }

    fn reject(&mut self, err: &TellerError) -> Result<()> {
        writeln!(self.output, "Operation rejected: {}", err)?;
        Ok(())
    }

    fn print_statement(&mut self, number: &str) -> Result<()> {
        if let Some(account) = self.bank.get_account(number) {
            write!(self.output, "\n{}", render_statement(account))?;
        }
        Ok(())
    }

    fn create_account(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== New customer and account ===")?;
        let Some(name) = self.ask("Full name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(address) = self.ask("Address: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(national_id) = self.ask("National ID: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(birth_date) = self.ask("Birth date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Quit);
        };

        let account = self.bank.create_account_for(Customer {
            name,
            address,
            national_id,
            birth_date,
        });
        let number = account.number().to_string();
        let branch = account.branch().to_string();

        writeln!(
            self.output,
            "\nAccount created! Number: {} | Branch: {}",
            number, branch
        )?;
        self.print_statement(&number)?;
        Ok(Flow::Continue)
    }

    fn deposit(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== Deposit ===")?;
        let number = match self.ask_account()? {
            Lookup::Found(number) => number,
            Lookup::Missing => return Ok(Flow::Continue),
            Lookup::EndOfInput => return Ok(Flow::Quit),
        };
        let Some(amount) = self.ask_amount("Amount to deposit (e.g. 150.00): R$ ")? else {
            return Ok(Flow::Quit);
        };

        match self.bank.account_mut(&number).and_then(|a| a.deposit(amount)) {
            Ok(_) => writeln!(
                self.output,
                "Deposit of {} completed.",
                format_money(round_cents(amount))
            )?,
            Err(err) => self.reject(&err)?,
        }
        self.print_statement(&number)?;
        Ok(Flow::Continue)
    }

    fn withdraw(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== Withdraw ===")?;
        let number = match self.ask_account()? {
            Lookup::Found(number) => number,
            Lookup::Missing => return Ok(Flow::Continue),
            Lookup::EndOfInput => return Ok(Flow::Quit),
        };
        let Some(amount) = self.ask_amount("Amount to withdraw (e.g. 100.00): R$ ")? else {
            return Ok(Flow::Quit);
        };

        match self.bank.account_mut(&number).and_then(|a| a.withdraw(amount)) {
            Ok(_) => writeln!(
                self.output,
                "Withdrawal of {} completed.",
                format_money(round_cents(amount))
            )?,
            Err(err) => self.reject(&err)?,
        }
        self.print_statement(&number)?;
        Ok(Flow::Continue)
    }

    fn balance(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== Balance ===")?;
        let number = match self.ask_account()? {
            Lookup::Found(number) => number,
            Lookup::Missing => return Ok(Flow::Continue),
            Lookup::EndOfInput => return Ok(Flow::Quit),
        };
        if let Some(account) = self.bank.get_account(&number) {
            writeln!(
                self.output,
                "Current balance of account {}: {} (still available for withdrawal today: {})",
                account.number(),
                format_money(account.balance()),
                format_money(account.remaining_allowance_today())
            )?;
        }
        self.print_statement(&number)?;
        Ok(Flow::Continue)
    }

    fn statement(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== Statement ===")?;
        match self.ask_account()? {
            Lookup::Found(number) => self.print_statement(&number)?,
            Lookup::Missing => {}
            Lookup::EndOfInput => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn list_accounts(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== Accounts ===")?;
        let mut accounts = self.bank.list_accounts().peekable();
        if accounts.peek().is_none() {
            writeln!(self.output, "No accounts yet.")?;
        }
        for account in accounts {
            writeln!(
                self.output,
                "Account: {} | Branch: {} | Customer: {} | Balance: {}",
                account.number(),
                account.branch(),
                account.customer().name,
                format_money(account.balance())
            )?;
        }
        Ok(Flow::Continue)
    }

    fn export_statement(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== Export statement ===")?;
        let number = match self.ask_account()? {
            Lookup::Found(number) => number,
            Lookup::Missing => return Ok(Flow::Continue),
            Lookup::EndOfInput => return Ok(Flow::Quit),
        };
        let Some(path) = self.ask("File to write: ")? else {
            return Ok(Flow::Quit);
        };

        let entries = self
            .bank
            .get_account(&number)
            .map(|account| account.statement())
            .unwrap_or_default();
        let result = std::fs::File::create(&path)
            .with_context(|| format!("Cannot create {}", path))
            .and_then(|mut file| write_statement(&mut file, entries.into_iter()));

        match result {
            Ok(()) => writeln!(self.output, "Statement of {} written to {}", number, path)?,
            Err(err) => writeln!(self.output, "Could not export statement: {:#}", err)?,
        }
        Ok(Flow::Continue)
    }
}
