use crate::global_settings::GlobalSettings;
use clap::{Arg, Command, builder::PossibleValuesParser};
use rust_decimal::Decimal;
use stepfun_lib::{IntervalSet, Stepfun, Timestamp};

fn function_arg(id: &'static str) -> Arg {
    Arg::new(id)
        .value_name("FUNCTION")
        .help("A step function, like \"[(-oo, undef), (0, 1.5), (10, undef)]\"")
        .required(true)
        .value_parser(|s: &str| s.parse::<Stepfun<Decimal, Decimal>>())
}

fn set_arg(id: &'static str) -> Arg {
    Arg::new(id)
        .value_name("SET")
        .help("A set of intervals, like \"{[-oo, 0), [1, 2)}\"")
        .required(true)
        .value_parser(|s: &str| s.parse::<IntervalSet<Decimal>>())
}

fn key_arg(id: &'static str, value_name: &'static str) -> Arg {
    Arg::new(id)
        .value_name(value_name)
        .required(true)
        .allow_hyphen_values(true)
        .value_parser(|s: &str| s.parse::<Decimal>())
}

pub(crate) fn build_cli() -> Command {
    Command::new("stepfun")
        .version("0.1")
        .about("Evaluate and combine step functions and sets of intervals")
        .subcommand_required(true)
        .flatten_help(true) // show help for all subcommands
        .arg_required_else_help(true) // show full help if nothing given
        .args(GlobalSettings::cli())
        .subcommand(
            Command::new("eval")
                .about("Show the value of a function at each key")
                .arg(function_arg("function"))
                .arg(
                    Arg::new("at")
                        .value_name("AT")
                        .help("Keys, -oo is the leftmost value")
                        .required(true)
                        .num_args(1..)
                        .allow_hyphen_values(true)
                        .value_parser(|s: &str| {
                            s.parse::<Timestamp<Decimal>>()
                        }),
                ),
        )
        .subcommand(
            Command::new("integral")
                .about("Integrate a function on [START, STOP)")
                .arg(function_arg("function"))
                .arg(key_arg("start", "START"))
                .arg(key_arg("stop", "STOP")),
        )
        .subcommand(
            Command::new("merge")
                .about("Combine functions, ignoring undefined values")
                .arg(
                    Arg::new("op")
                        .value_name("OP")
                        .required(true)
                        .value_parser(PossibleValuesParser::new([
                            "add", "mul", "min", "max",
                        ])),
                )
                .arg(function_arg("functions").num_args(1..)),
        )
        .subcommand(
            Command::new("intervals")
                .about("Combine two sets of intervals")
                .arg(
                    Arg::new("op")
                        .value_name("OP")
                        .required(true)
                        .value_parser(PossibleValuesParser::new([
                            "union",
                            "intersection",
                            "difference",
                            "symmetric-difference",
                        ])),
                )
                .arg(set_arg("left"))
                .arg(set_arg("right")),
        )
        .subcommand(
            Command::new("complement")
                .about("All keys not in the set")
                .arg(set_arg("set")),
        )
        .subcommand(
            // Use    eval "$(stepfun completions zsh)"
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .help("The shell to generate the completions for")
                        .required(true)
                        .value_parser(clap::builder::EnumValueParser::<
                            clap_complete_command::Shell,
                        >::new()),
                ),
        )
}
