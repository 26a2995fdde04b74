mod http_account;

pub use http_account::*;

use crate::domain::AccountHandle;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

enum Action {
    GetBalance,
    Deposit,
    Withdraw,
    Shutdown,
}

/// Drive the operator console against `account` until shutdown is selected.
///
/// Per-call faults are rendered and the loop continues; an unrecognized menu
/// selection is rejected locally without a remote call. Only an unreadable
/// input stream or an unparsable amount aborts with an error.
pub async fn run(
    account: &impl AccountHandle,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        write!(
            out,
            "\nEnter operation (1: Get current balance, 2: Deposit, 3: Withdraw, \
             4: Shutdown server and exit): "
        )
        .context("write prompt")?;
        out.flush().context("flush prompt")?;

        let line = read_line(input)?;
        let Some(action) = parse_action(&line) else {
            writeln!(out, "Invalid option. Please try again.").context("write message")?;
            continue;
        };

        match action {
            Action::GetBalance => match account.balance().await {
                Ok(balance) => {
                    writeln!(out, "Current balance: {balance}").context("write balance")?
                }
                Err(fault) => writeln!(out, "{fault}").context("write fault")?,
            },

            Action::Deposit => {
                let amount = read_amount(input, out, "deposit")?;
                match account.deposit(amount).await {
                    Ok(()) => writeln!(out, "Deposit successful").context("write message")?,
                    Err(fault) => writeln!(out, "{fault}").context("write fault")?,
                }
            }

            Action::Withdraw => {
                let amount = read_amount(input, out, "withdraw")?;
                match account.withdraw(amount).await {
                    Ok(()) => {
                        writeln!(out, "Withdrawal successful").context("write message")?
                    }
                    Err(fault) => writeln!(out, "{fault}").context("write fault")?,
                }
            }

            Action::Shutdown => {
                writeln!(out, "Shutting down the server and exiting")
                    .context("write message")?;
                if let Err(fault) = account.shutdown().await {
                    writeln!(out, "{fault}").context("write fault")?;
                }
                return Ok(());
            }
        }
    }
}

fn parse_action(line: &str) -> Option<Action> {
    match line.trim() {
        "1" => Some(Action::GetBalance),
        "2" => Some(Action::Deposit),
        "3" => Some(Action::Withdraw),
        "4" => Some(Action::Shutdown),
        _ => None,
    }
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("read operator input")?;
    if read == 0 {
        bail!("input stream closed");
    }
    Ok(line)
}

fn read_amount(input: &mut impl BufRead, out: &mut impl Write, verb: &str) -> Result<i64> {
    write!(out, "Enter amount to {verb}: ").context("write prompt")?;
    out.flush().context("flush prompt")?;
    let line = read_line(input)?;
    line.trim()
        .parse()
        .with_context(|| format!("malformed amount {:?}", line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountConfig, LocalAccount};
    use std::io::Cursor;

    fn account_with_balance(opening_balance: u64) -> LocalAccount {
        LocalAccount::open(AccountConfig { opening_balance })
    }

    #[tokio::test]
    async fn test_run_scripted_session() {
        let account = account_with_balance(100);
        let mut input = Cursor::new("2\n50\n3\n30\n1\n5\n4\n");
        let mut out = Vec::new();

        run(&account, &mut input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Deposit successful"));
        assert!(out.contains("Withdrawal successful"));
        assert!(out.contains("Current balance: 120"));
        assert!(out.contains("Invalid option. Please try again."));
        assert!(out.contains("Shutting down the server and exiting"));
    }

    #[tokio::test]
    async fn test_run_reports_faults_and_continues() {
        let account = account_with_balance(70);
        let mut input = Cursor::new("3\n1000\n2\n-5\n1\n4\n");
        let mut out = Vec::new();

        run(&account, &mut input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("insufficient funds"));
        assert!(out.contains("invalid amount"));
        assert!(out.contains("Current balance: 70"));
    }

    #[tokio::test]
    async fn test_run_aborts_on_malformed_amount() {
        let account = account_with_balance(0);
        let mut input = Cursor::new("2\nfifty\n");
        let mut out = Vec::new();

        let result = run(&account, &mut input, &mut out).await;

        assert!(result.is_err());
        assert_eq!(account.balance().await, Ok(0));
    }

    #[tokio::test]
    async fn test_run_aborts_on_closed_input() {
        let account = account_with_balance(0);
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        assert!(run(&account, &mut input, &mut out).await.is_err());
    }
}
