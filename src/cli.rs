// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg};

use crate::export::DEFAULT_FILE_NAME;

fn json_flags(c: Command) -> Command {
    c.arg(arg!(--json "Print JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print JSON lines").action(ArgAction::SetTrue))
}

/// `--set name=value` pairs plus `--show-form` to print the form instead.
fn form_args(c: Command) -> Command {
    c.arg(
        Arg::new("set")
            .long("set")
            .value_name("NAME=VALUE")
            .action(ArgAction::Append)
            .help("Field value, repeatable"),
    )
    .arg(
        Arg::new("show-form")
            .long("show-form")
            .action(ArgAction::SetTrue)
            .help("Print the form with its current values and exit"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).value_name("ID")
}

/// list/add/edit/rm for one entity.
fn crud(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list")))
        .subcommand(form_args(Command::new("add")))
        .subcommand(form_args(Command::new("edit").arg(id_arg())))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn filter_args(c: Command) -> Command {
    c.arg(arg!(--search <TEXT> "Match description").required(false))
        .arg(arg!(--category <TEXT>).required(false))
        .arg(arg!(--from <DATE> "YYYY-MM-DD").required(false))
        .arg(arg!(--to <DATE> "YYYY-MM-DD, inclusive").required(false))
        .arg(
            arg!(--page <N>)
                .required(false)
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("1"),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_name("N")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn local_list(name: &'static str) -> Command {
    Command::new(name)
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list")))
        .subcommand(form_args(
            Command::new("set").arg(arg!(--id <ID> "Replace the entry with this id").required(false)),
        ))
        .subcommand(Command::new("rm").arg(id_arg()))
}

pub fn build_cli() -> Command {
    Command::new("fluxo")
        .about("Fluxo: personal finance dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("auth")
                .about("Sign in and out of the hosted backend")
                .subcommand_required(true)
                .subcommand(
                    Command::new("login")
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(arg!(--password <PASSWORD>).required(true)),
                )
                .subcommand(
                    Command::new("signup")
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(arg!(--password <PASSWORD>).required(true))
                        .arg(arg!(--name <NAME> "Full name").required(false)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions (Extrato)")
                .subcommand_required(true)
                .subcommand(json_flags(filter_args(Command::new("list"))))
                .subcommand(form_args(Command::new("add")))
                .subcommand(form_args(Command::new("edit").arg(id_arg())))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(filter_args(
                    Command::new("export")
                        .arg(arg!(--format <FORMAT> "csv|json").required(false).default_value("csv"))
                        .arg(
                            arg!(--out <PATH>)
                                .required(false)
                                .default_value(DEFAULT_FILE_NAME),
                        )
                        .arg(
                            arg!(--all "Export every transaction instead of one page")
                                .action(ArgAction::SetTrue),
                        ),
                )),
        )
        .subcommand(crud("cards", "Credit cards (Cartoes)"))
        .subcommand(crud("goals", "Savings goals (Metas)"))
        .subcommand(crud("planned", "Planned expenses"))
        .subcommand(
            Command::new("invest")
                .about("Investment allocations and returns")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("list")))
                .subcommand(form_args(
                    Command::new("alloc-set").arg(Arg::new("id").value_name("ID")),
                ))
                .subcommand(Command::new("alloc-rm").arg(id_arg()))
                .subcommand(form_args(
                    Command::new("return-set").arg(Arg::new("id").value_name("ID")),
                ))
                .subcommand(Command::new("return-rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("settings")
                .about("Profile and alert thresholds (Configuracoes)")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show")))
                .subcommand(form_args(Command::new("alerts")))
                .subcommand(form_args(Command::new("profile"))),
        )
        .subcommand(json_flags(
            Command::new("dashboard").about("Balance, cards and goals at a glance"),
        ))
        .subcommand(
            Command::new("local")
                .about("Values kept on this machine only")
                .subcommand_required(true)
                .subcommand(json_flags(form_args(Command::new("alerts"))))
                .subcommand(local_list("planned"))
                .subcommand(local_list("allocations"))
                .subcommand(local_list("returns")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn export_defaults_to_csv_statement() {
        let m = build_cli().get_matches_from(["fluxo", "tx", "export"]);
        let (_, tx) = m.subcommand().unwrap();
        let (_, export) = tx.subcommand().unwrap();
        assert_eq!(export.get_one::<String>("format").unwrap(), "csv");
        assert_eq!(export.get_one::<String>("out").unwrap(), DEFAULT_FILE_NAME);
        assert!(!export.get_flag("all"));
    }

    #[test]
    fn set_is_repeatable() {
        let m = build_cli().get_matches_from([
            "fluxo", "cards", "edit", "abc", "--set", "name=Prime", "--set", "style=dark",
        ]);
        let (_, cards) = m.subcommand().unwrap();
        let (_, edit) = cards.subcommand().unwrap();
        let sets: Vec<&String> = edit.get_many::<String>("set").unwrap().collect();
        assert_eq!(sets.len(), 2);
        assert_eq!(edit.get_one::<String>("id").unwrap(), "abc");
    }
}
