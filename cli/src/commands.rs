use crate::global_settings::GlobalSettings;
use anyhow::{Result, anyhow, bail};
use clap::ArgMatches;
use itertools::Itertools;
use rust_decimal::Decimal;
use stepfun_lib::{Interval, IntervalSet, Stepfun, Timestamp};

type Fun = Stepfun<Decimal, Decimal>;
type Set = IntervalSet<Decimal>;

fn required<'a, T: Clone + Send + Sync + 'static>(
    args: &'a ArgMatches,
    id: &str,
) -> Result<&'a T> {
    args.get_one::<T>(id)
        .ok_or_else(|| anyhow!("missing argument {}", id))
}

fn show_value(value: Option<&Decimal>) -> String {
    value.map_or_else(|| "undef".to_string(), Decimal::to_string)
}

fn show_stepfun(settings: &GlobalSettings, f: &Fun) -> String {
    if !settings.intervals {
        return f.to_string();
    }
    let uppers = f
        .iter()
        .skip(1)
        .map(|(t, _)| t.value().cloned())
        .chain(std::iter::once(None));
    f.iter()
        .zip(uppers)
        .map(|((t, v), upper)| {
            format!(
                "{} {}",
                Interval::new(t.value().cloned(), upper),
                show_value(v.as_ref())
            )
        })
        .join("\n")
}

fn show_set(settings: &GlobalSettings, set: &Set) -> String {
    if settings.intervals && !set.is_empty() {
        set.to_intervals().iter().join("\n")
    } else {
        set.to_string()
    }
}

fn eval(args: &ArgMatches) -> Result<String> {
    let f = required::<Fun>(args, "function")?;
    Ok(args
        .get_many::<Timestamp<Decimal>>("at")
        .into_iter()
        .flatten()
        .map(|at| format!("{} {}", at, show_value(f.evaluate(at))))
        .join("\n"))
}

fn integral(args: &ArgMatches) -> Result<String> {
    let f = required::<Fun>(args, "function")?;
    let start = required::<Decimal>(args, "start")?;
    let stop = required::<Decimal>(args, "stop")?;
    Ok(f.integral(start, stop).to_string())
}

fn merge(settings: &GlobalSettings, args: &ArgMatches) -> Result<String> {
    let op: fn(Decimal, Decimal) -> Decimal =
        match required::<String>(args, "op")?.as_str() {
            "add" => |a, b| a + b,
            "mul" => |a, b| a * b,
            "min" => Decimal::min,
            "max" => Decimal::max,
            other => bail!("unknown operator {}", other),
        };
    let funs = args.get_many::<Fun>("functions").into_iter().flatten();
    let result = Stepfun::merge_all(op, funs);
    log::debug!("merged into {} steps", result.len());
    Ok(show_stepfun(settings, &result))
}

fn intervals(settings: &GlobalSettings, args: &ArgMatches) -> Result<String> {
    let left = required::<Set>(args, "left")?;
    let right = required::<Set>(args, "right")?;
    let result = match required::<String>(args, "op")?.as_str() {
        "union" => left | right,
        "intersection" => left & right,
        "difference" => left - right,
        "symmetric-difference" => left ^ right,
        other => bail!("unknown operator {}", other),
    };
    Ok(show_set(settings, &result))
}

fn complement(settings: &GlobalSettings, args: &ArgMatches) -> Result<String> {
    let set = required::<Set>(args, "set")?;
    Ok(show_set(settings, &!set))
}

/// Execute the subcommand and return what should be printed
pub fn run(settings: &GlobalSettings, matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("eval", sub)) => eval(sub),
        Some(("integral", sub)) => integral(sub),
        Some(("merge", sub)) => merge(settings, sub),
        Some(("intervals", sub)) => intervals(settings, sub),
        Some(("complement", sub)) => complement(settings, sub),
        Some((name, _)) => bail!("unknown command {}", name),
        None => bail!("no command given"),
    }
}
