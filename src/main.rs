use clap::{App, AppSettings};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_level(true)
        .init();

    let matches = App::new("utxo-ledger")
        .about("Admits batches of transactions to a UTXO ledger.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(utxo_ledger_lib::commands::apply_command())
        .subcommand(utxo_ledger_lib::commands::balances_command())
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("apply") {
        utxo_ledger_lib::commands::run_apply_command(matches)
    } else if let Some(matches) = matches.subcommand_matches("balances") {
        utxo_ledger_lib::commands::run_balances_command(matches)
    } else {
        panic!("Should report help.");
    }
}
