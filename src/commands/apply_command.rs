use crate::scenario::Scenario;
use crate::{TxHandler, UtxoPool};
use clap::{App, Arg, ArgMatches};
use std::error::Error;
use std::path::PathBuf;

pub(crate) struct ApplyCliOptions {
    pub(crate) scenario: PathBuf,
}

impl ApplyCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let scenario = matches
            .value_of("scenario")
            .ok_or("Missing required argument: --scenario")?;
        Ok(Self {
            scenario: PathBuf::from(scenario),
        })
    }
}

pub(crate) fn scenario_arg() -> Arg<'static> {
    Arg::new("scenario")
        .short('s')
        .long("scenario")
        .value_name("PATH")
        .help("JSON file with the initial UTXO pool and the batch of transactions.")
        .takes_value(true)
        .required(true)
}

pub fn apply_command() -> App<'static> {
    App::new("apply")
        .version("0.1")
        .about("Handles the scenario's batch of transactions and prints the outcome.")
        .arg(scenario_arg())
}

pub fn run_apply_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = ApplyCliOptions::parse(matches)?;
    let scenario = Scenario::load(&options.scenario)?;
    let mut handler = TxHandler::new(scenario.pool());
    let report = handler.handle_txs_with_report(scenario.transactions().clone());

    println!("Accepted transactions");
    for transaction in &report.accepted {
        println!(
            "  {} ({})",
            scenario.transaction_name(transaction.id()),
            transaction.id()
        );
    }
    println!("Rejected transactions");
    for (transaction, rejection) in &report.rejected {
        println!(
            "  {}: {}",
            scenario.transaction_name(transaction.id()),
            rejection
        );
    }
    println!("Unspent transaction outputs");
    print_pool(&scenario, handler.pool());
    Ok(())
}

fn print_pool(scenario: &Scenario, pool: &UtxoPool) {
    let mut utxos = pool.iter().collect::<Vec<_>>();
    utxos.sort_by_key(|(outpoint, _)| **outpoint);
    for (outpoint, output) in utxos {
        println!(
            "  {}:{} -> {} {}",
            scenario.transaction_name(outpoint.utxo_id()),
            outpoint.output_index(),
            output.amount(),
            scenario.owner_name(output.owner())
        );
    }
}
