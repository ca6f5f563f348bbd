// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn kind_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .help("Transaction type")
        .value_parser(PossibleValuesParser::new(["income", "expense"]))
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(crate_version!())
        .about("Personal finance dashboard, ledger and category analysis")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output on stderr (-v info, -vv debug); RUST_LOG overrides"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .global(true)
                .env("FINTRACK_URL")
                .help("Hosted project URL; selects the rest backend"),
        )
        .arg(
            Arg::new("anon-key")
                .long("anon-key")
                .global(true)
                .env("FINTRACK_ANON_KEY")
                .hide_env_values(true)
                .help("Hosted project anon key"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .global(true)
                .help("Display currency for this run (USD, EUR, GBP, JPY, CNY, INR)"),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Totals and the last six months of income vs expenses")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("tx")
                .about("Transaction ledger")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .short('n')
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(kind_arg())
                        .arg(json_flag())
                        .arg(
                            Arg::new("jsonl")
                                .long("jsonl")
                                .help("Print one JSON object per line")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("json"),
                        ),
                )
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(kind_arg().default_value("expense"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .short('c')
                                .required(true)
                                .help("Category name or id"),
                        )
                        .arg(Arg::new("description").long("description").short('d'))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD, defaults to today"),
                        )
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a transaction")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("amount").long("amount").short('a'))
                        .arg(kind_arg())
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("description").long("description").short('d'))
                        .arg(Arg::new("date").long("date"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Category reference data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .arg(kind_arg())
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("analysis")
                .about("Expense breakdown by category")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .short('p')
                        .value_parser(PossibleValuesParser::new(["30d", "3m", "6m", "1y"]))
                        .default_value("30d"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("settings")
                .about("Account settings")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("profile")
                        .about("Update name and/or email")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(
                    Command::new("password")
                        .about("Change password")
                        .arg(Arg::new("new").long("new").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                )
                .subcommand(
                    Command::new("notifications")
                        .about("Email notification preference")
                        .arg(
                            Arg::new("state")
                                .required(true)
                                .value_parser(PossibleValuesParser::new(["on", "off"])),
                        ),
                ),
        )
        .subcommand(
            Command::new("auth")
                .about("Hosted backend session")
                .subcommand_required(true)
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("signup")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("name").long("name")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("config")
                .about("Backend and display configuration")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-backend")
                        .about("Choose local or rest; rest reads the global --url/--anon-key")
                        .arg(
                            Arg::new("kind")
                                .required(true)
                                .value_parser(PossibleValuesParser::new(["local", "rest"])),
                        ),
                )
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("code").required(true)),
                ),
        )
}
