use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api;
use crate::application::LedgerService;
use crate::domain::{format_amount, parse_amount, AccountId, Amount, CurrencyCode};
use crate::storage::AccountRepository;
use crate::telemetry::{self, LogFormat};

/// Coffer - in-memory account ledger
#[derive(Parser)]
#[command(name = "coffer")]
#[command(about = "An in-memory account ledger with atomic transfers")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, env = "COFFER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the ledger over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "COFFER_BIND", default_value = "127.0.0.1:4567")]
        bind: SocketAddr,
    },

    /// Work with a ledger interactively, one command per line
    Shell,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let default_directive = match (&self.command, self.verbose) {
            (_, true) => "debug",
            (Commands::Serve { .. }, false) => "info",
            // Keep the prompt readable
            (Commands::Shell, false) => "warn",
        };
        telemetry::init(default_directive, self.log_format);

        // Every run starts from an empty ledger; nothing is persisted
        match self.command {
            Commands::Serve { bind } => {
                let service = Arc::new(LedgerService::in_memory());
                api::serve(service, bind).await?;
            }

            Commands::Shell => {
                let service = LedgerService::in_memory();
                let stdin = std::io::stdin();
                let mut stdout = std::io::stdout();
                run_shell(&service, stdin.lock(), &mut stdout)?;
            }
        }

        Ok(())
    }
}

/// One line of shell input.
#[derive(Parser)]
#[command(name = "coffer", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommands,
}

#[derive(Subcommand)]
pub enum ShellCommands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Deposit money into an account
    Deposit {
        /// Account ID
        id: AccountId,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account ID
        id: AccountId,

        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Source account ID
        #[arg(long)]
        from: AccountId,

        /// Destination account ID
        #[arg(long)]
        to: AccountId,
    },

    /// Show balance for an account or all accounts
    Balance {
        /// Account ID (omit for all accounts)
        id: Option<AccountId>,
    },

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Owner ID (one account per owner)
        owner: String,

        /// Opening balance
        #[arg(short, long, default_value = "0")]
        balance: String,

        /// Currency code (e.g., EUR, GBP)
        #[arg(short, long, default_value = "EUR")]
        currency: String,
    },

    /// Show account details
    Show {
        /// Account ID
        id: AccountId,
    },

    /// List all accounts
    List,

    /// Delete an account
    Delete {
        /// Account ID
        id: AccountId,
    },

    /// Delete every account
    Clear,
}

/// Read commands from `input` until EOF or `exit`, writing results to `output`.
/// A failing command prints its error and the session carries on.
pub fn run_shell<R, I, W>(service: &LedgerService<R>, input: I, output: &mut W) -> Result<()>
where
    R: AccountRepository,
    I: BufRead,
    W: Write,
{
    writeln!(output, "coffer shell - type 'help' for commands, 'exit' to quit")?;
    prompt(output)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let args: Vec<&str> = line.split_whitespace().collect();
        if args.is_empty() {
            prompt(output)?;
            continue;
        }

        match ShellLine::try_parse_from(args) {
            Ok(ShellLine {
                command: ShellCommands::Exit,
            }) => break,
            Ok(parsed) => {
                if let Err(e) = run_shell_command(service, parsed.command, output) {
                    writeln!(output, "Error: {:#}", e)?;
                }
            }
            // Also covers `help`, which clap reports as an "error"
            Err(e) => writeln!(output, "{}", e.render())?,
        }

        prompt(output)?;
    }

    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "coffer> ")?;
    output.flush()?;
    Ok(())
}

fn parse_amount_arg(amount: &str) -> Result<Amount> {
    parse_amount(amount)
        .with_context(|| format!("Invalid amount '{}'. Use '50.00' or '50'", amount))
}

fn run_shell_command<R: AccountRepository, W: Write>(
    service: &LedgerService<R>,
    cmd: ShellCommands,
    output: &mut W,
) -> Result<()> {
    match cmd {
        ShellCommands::Account(account_cmd) => run_account_command(service, account_cmd, output)?,

        ShellCommands::Deposit { id, amount } => {
            let amount = parse_amount_arg(&amount)?;
            service.deposit_money(id, amount)?;
            writeln!(output, "Deposited {} into {}", format_amount(amount), id)?;
        }

        ShellCommands::Withdraw { id, amount } => {
            let amount = parse_amount_arg(&amount)?;
            service.withdraw_money(id, amount)?;
            writeln!(output, "Withdrew {} from {}", format_amount(amount), id)?;
        }

        ShellCommands::Transfer { amount, from, to } => {
            let amount = parse_amount_arg(&amount)?;
            service.transfer_money(from, to, amount)?;
            writeln!(
                output,
                "Transferred {} {} -> {}",
                format_amount(amount),
                from,
                to
            )?;
        }

        ShellCommands::Balance { id } => run_balance_command(service, id, output)?,

        // Handled by the read loop
        ShellCommands::Exit => {}
    }
    Ok(())
}

fn run_account_command<R: AccountRepository, W: Write>(
    service: &LedgerService<R>,
    cmd: AccountCommands,
    output: &mut W,
) -> Result<()> {
    match cmd {
        AccountCommands::Create {
            owner,
            balance,
            currency,
        } => {
            let balance = parse_amount_arg(&balance)?;
            let currency: CurrencyCode = currency.parse()?;

            let id = service.create_account(owner.clone(), balance, currency)?;
            writeln!(output, "Created account: {} (owner {})", id, owner)?;
        }

        AccountCommands::Show { id } => {
            let view = service.get_account(id)?;
            writeln!(output, "Account: {}", view.account_id)?;
            writeln!(output, "  Owner:    {}", view.owner_id)?;
            writeln!(output, "  Balance:  {} {}", format_amount(view.balance), view.currency)?;
        }

        AccountCommands::List => {
            let views = service.get_all_accounts()?;
            if views.is_empty() {
                writeln!(output, "No accounts found.")?;
            } else {
                writeln!(output, "{:<36}  {:<20} {:>12} {:<8}", "ID", "OWNER", "BALANCE", "CURRENCY")?;
                writeln!(output, "{}", "-".repeat(80))?;
                for view in views {
                    writeln!(
                        output,
                        "{:<36}  {:<20} {:>12} {:<8}",
                        view.account_id,
                        truncate(&view.owner_id, 20),
                        format_amount(view.balance),
                        view.currency
                    )?;
                }
            }
        }

        AccountCommands::Delete { id } => {
            service.delete_account(id)?;
            writeln!(output, "Deleted account: {}", id)?;
        }

        AccountCommands::Clear => {
            service.delete_all_accounts()?;
            writeln!(output, "Deleted all accounts")?;
        }
    }
    Ok(())
}

fn run_balance_command<R: AccountRepository, W: Write>(
    service: &LedgerService<R>,
    id: Option<AccountId>,
    output: &mut W,
) -> Result<()> {
    match id {
        Some(id) => {
            let view = service.get_account(id)?;
            writeln!(
                output,
                "{}: {} {}",
                view.owner_id,
                format_amount(view.balance),
                view.currency
            )?;
        }
        None => {
            let views = service.get_all_accounts()?;
            if views.is_empty() {
                writeln!(output, "No accounts found.")?;
            } else {
                writeln!(output, "{:<20} {:>12} {:<8}", "OWNER", "BALANCE", "CURRENCY")?;
                writeln!(output, "{}", "-".repeat(44))?;
                for view in views {
                    writeln!(
                        output,
                        "{:<20} {:>12} {:<8}",
                        truncate(&view.owner_id, 20),
                        format_amount(view.balance),
                        view.currency
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
