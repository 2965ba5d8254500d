use std::time::Duration;

use clap::Parser;

use crate::error::DurationError;

/// Burn every cpu core while watching frequency, temperature and fans.
#[derive(Debug, Parser)]
#[command(name = "burnmon", version)]
pub struct Args {
    /// Total run length, e.g. `90s`, `2m`, `1m30s`
    #[arg(short, long, default_value = "50s", value_parser = parse_duration)]
    pub duration: Duration,

    /// Interactive graphs instead of one line per second
    #[arg(short, long)]
    pub graph: bool,

    /// Initial number of burn workers (default: logical cpu count)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

impl Args {
    /// Workers to start with. Graph mode never starts below one.
    pub fn initial_workers(&self) -> usize {
        let workers = self.workers.unwrap_or_else(num_cpus::get);
        if self.graph {
            workers.max(1)
        } else {
            workers
        }
    }
}

/// Parses `<number><unit>` sequences such as `1m30s` or `1.5h`; a bare number is seconds.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationError::Empty);
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let number = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| DurationError::InvalidNumber(s.to_owned()))
    };

    if input.chars().all(is_number) {
        return non_zero(number(input)?);
    }

    let mut secs = 0.0;
    let mut rest = input;
    while !rest.is_empty() {
        let split = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let (value, tail) = rest.split_at(split);
        if value.is_empty() {
            return Err(DurationError::InvalidNumber(rest.to_owned()));
        }
        let value = number(value)?;

        let split = tail.find(is_number).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(split);
        secs += match unit {
            "" => return Err(DurationError::MissingUnit(rest.to_owned())),
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            other => return Err(DurationError::UnknownUnit(other.to_owned())),
        };
        rest = tail;
    }

    non_zero(secs)
}

fn non_zero(secs: f64) -> Result<Duration, DurationError> {
    let duration = Duration::try_from_secs_f64(secs).map_err(|_| DurationError::TooLarge)?;
    if duration.is_zero() {
        return Err(DurationError::Zero);
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_units() {
        assert_eq!(parse_duration("50s"), Ok(Duration::from_secs(50)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    }

    #[test]
    fn combined_and_fractional() {
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1.5m"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h0m5s"), Ok(Duration::from_secs(3605)));
    }

    #[test]
    fn bare_number_is_seconds() {
        assert_eq!(parse_duration("30"), Ok(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(parse_duration("0s"), Err(DurationError::Zero));
        assert_eq!(parse_duration("0"), Err(DurationError::Zero));
        assert_eq!(parse_duration("0.0000000001s"), Err(DurationError::Zero));
        assert_eq!(
            parse_duration("99999999999999999999999h"),
            Err(DurationError::TooLarge)
        );
        assert_eq!(
            parse_duration("5d"),
            Err(DurationError::UnknownUnit("d".to_owned()))
        );
        assert_eq!(
            parse_duration("1m5"),
            Err(DurationError::MissingUnit("5".to_owned()))
        );
        assert_eq!(
            parse_duration("s"),
            Err(DurationError::InvalidNumber("s".to_owned()))
        );
        assert_eq!(
            parse_duration("1..2s"),
            Err(DurationError::InvalidNumber("1..2".to_owned()))
        );
    }

    #[test]
    fn cli_defaults() {
        let args = Args::try_parse_from(["burnmon"]).unwrap();
        assert_eq!(args.duration, Duration::from_secs(50));
        assert!(!args.graph);
        assert_eq!(args.initial_workers(), num_cpus::get());
    }

    #[test]
    fn graph_mode_keeps_at_least_one_worker() {
        let args = Args::try_parse_from(["burnmon", "--graph", "--workers", "0"]).unwrap();
        assert_eq!(args.initial_workers(), 1);

        let args = Args::try_parse_from(["burnmon", "-w", "0", "-d", "3s"]).unwrap();
        assert_eq!(args.initial_workers(), 0);
        assert_eq!(args.duration, Duration::from_secs(3));
    }

    #[test]
    fn cli_rejects_zero_duration() {
        assert!(Args::try_parse_from(["burnmon", "--duration", "0s"]).is_err());
    }
}
