use crate::commands::apply_command::{scenario_arg, ApplyCliOptions};
use crate::scenario::Scenario;
use crate::TxHandler;
use clap::{App, Arg, ArgMatches};
use std::error::Error;

struct BalancesCliOptions {
    apply: ApplyCliOptions,
    after_batch: bool,
}

impl BalancesCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            apply: ApplyCliOptions::parse(matches)?,
            after_batch: matches.is_present("after-batch"),
        })
    }
}

pub fn balances_command() -> App<'static> {
    App::new("balances")
        .version("0.1")
        .about("Prints the unspent balance of every owner in the scenario's pool.")
        .arg(scenario_arg())
        .arg(
            Arg::new("after-batch")
                .long("after-batch")
                .help("Handle the scenario's batch of transactions before computing balances.")
                .takes_value(false)
                .required(false),
        )
}

pub fn run_balances_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = BalancesCliOptions::parse(matches)?;
    let scenario = Scenario::load(&options.apply.scenario)?;
    let mut handler = TxHandler::new(scenario.pool());
    if options.after_batch {
        handler.handle_txs(scenario.transactions().clone());
    }

    let mut balances = handler
        .pool()
        .balances()
        .into_iter()
        .map(|(owner, balance)| (scenario.owner_name(&owner), balance))
        .collect::<Vec<(String, i128)>>();
    // Sort by amount in non-increasing order, then by name.
    balances.sort_by(|(lhs_name, lhs), (rhs_name, rhs)| rhs.cmp(lhs).then(lhs_name.cmp(rhs_name)));
    for (owner, balance) in balances {
        println!("{}: {}", owner, balance);
    }
    Ok(())
}
