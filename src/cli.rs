// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn tx_cli() -> Command {
    Command::new("tx")
        .about("Record, list, edit and delete transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(req("date", "Date YYYY-MM-DD"))
                .arg(
                    req("amount", "Signed amount, e.g. 15.50")
                        .allow_hyphen_values(true),
                )
                .arg(req("category", "Spending category"))
                .arg(opt("sub", "Sub-category of the category"))
                .arg(opt("account", "Account label key (defaults to the ledger default)"))
                .arg(opt("remarks", "Free text")),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(opt("month", "Only YYYY-MM"))
                .arg(opt("category", "Only this spending category"))
                .arg(opt("account", "Only this account label key"))
                .arg(
                    opt("limit", "Show at most N rows").value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(req("id", "Transaction id")),
        )
        .subcommand(
            Command::new("edit")
                .about("Replace a transaction (delete and re-create)")
                .arg(req("id", "Transaction id"))
                .arg(opt("date", "New date YYYY-MM-DD"))
                .arg(opt("amount", "New amount").allow_hyphen_values(true))
                .arg(opt("category", "New spending category"))
                .arg(opt("sub", "New sub-category"))
                .arg(opt("account", "New account label key"))
                .arg(opt("remarks", "New remarks")),
        )
}

fn category_cli() -> Command {
    Command::new("category")
        .about("Manage spending categories and sub-categories")
        .subcommand_required(true)
        .subcommand(json_args(Command::new("list").about("List categories")))
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(req("name", "Category name")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a category and its sub-categories")
                .arg(req("name", "Category name")),
        )
        .subcommand(
            Command::new("add-sub")
                .about("Add a sub-category")
                .arg(req("category", "Category name"))
                .arg(req("name", "Sub-category name")),
        )
        .subcommand(
            Command::new("rm-sub")
                .about("Remove a sub-category")
                .arg(req("category", "Category name"))
                .arg(req("name", "Sub-category name")),
        )
}

fn label_cli() -> Command {
    Command::new("label")
        .about("Manage account labels")
        .subcommand_required(true)
        .subcommand(json_args(Command::new("list").about("List account labels")))
        .subcommand(
            Command::new("add")
                .about("Add an account label")
                .arg(req("label", "Display label"))
                .arg(opt("color", "Palette color"))
                .arg(opt("description", "Description")),
        )
        .subcommand(
            Command::new("edit")
                .about("Change an account label")
                .arg(req("key", "Label key"))
                .arg(opt("label", "Display label"))
                .arg(opt("color", "Palette color"))
                .arg(opt("description", "Description")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove an account label")
                .arg(req("key", "Label key")),
        )
        .subcommand(
            Command::new("default")
                .about("Set the default account label")
                .arg(req("key", "Label key")),
        )
}

fn remote_cli() -> Command {
    Command::new("remote")
        .about("Cloud sync configuration")
        .subcommand_required(true)
        .subcommand(json_args(
            Command::new("status").about("Show how the remote is resolved"),
        ))
        .subcommand(
            Command::new("set")
                .about("Save a remote endpoint and key locally")
                .arg(req("url", "https endpoint"))
                .arg(req("key", "Access key"))
                .arg(
                    opt("layout", "Settings layout")
                        .value_parser(["document", "normalized"]),
                ),
        )
        .subcommand(Command::new("clear").about("Forget the locally saved remote"))
        .subcommand(Command::new("test").about("Test the remote connection"))
}

pub fn build_cli() -> Command {
    Command::new("edenwallet")
        .version(crate_version!())
        .about("Personal and joint expense ledgers with cloud sync and local fallback")
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .short('l')
                .global(true)
                .default_value("personal")
                .help("Ledger to work in: personal|joint"),
        )
        .subcommand(tx_cli())
        .subcommand(category_cli())
        .subcommand(label_cli())
        .subcommand(remote_cli())
        .subcommand(Command::new("sync").about("Push queued offline changes to the remote"))
        .subcommand(
            Command::new("report")
                .about("Aggregate reports")
                .subcommand_required(true)
                .subcommand(json_args(
                    Command::new("summary")
                        .about("Totals by category, month and account label")
                        .arg(opt("from", "Start date YYYY-MM-DD"))
                        .arg(opt("to", "End date YYYY-MM-DD")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export the ledger's transactions")
                .arg(
                    opt("format", "csv|json")
                        .default_value("csv")
                        .value_parser(["csv", "json"]),
                )
                .arg(req("out", "Output file")),
        )
}
