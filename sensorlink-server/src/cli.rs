use chrono::NaiveDate;

use crate::errors::QueryError;
use crate::models::{parse_input_date, DateRange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read transport text from stdin and store decoded readings
    Ingest,
    /// Print known sensors with their display names
    Sensors,
    /// Print grouped readings as JSON
    Query { sensor: Option<String>, range: DateRange },
}

impl Command {
    /// Parses arguments following the program name. `today` anchors `--last-days`.
    pub fn parse<I>(args: I, today: NaiveDate) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        let command = match args.next().as_deref() {
            None | Some("ingest") => Command::Ingest,
            Some("sensors") => Command::Sensors,
            Some("query") => return Self::parse_query(args, today),
            Some(other) => return Err(QueryError::UnknownCommand(other.to_string())),
        };

        match args.next() {
            Some(extra) => Err(QueryError::UnknownArgument(extra)),
            None => Ok(command),
        }
    }

    fn parse_query(mut args: impl Iterator<Item = String>, today: NaiveDate) -> Result<Self, QueryError> {
        let mut sensor = None;
        let mut start = None;
        let mut end = None;
        let mut range = DateRange::default();

        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| QueryError::MissingValue(flag.clone()));

            match flag.as_str() {
                "--sensor" => sensor = Some(value()?),
                "--start" => start = Some(parse_input_date(&value()?)?),
                "--end" => end = Some(parse_input_date(&value()?)?),
                "--last-days" => {
                    let raw = value()?;
                    let days = raw.parse::<u64>().map_err(|_| QueryError::InvalidDays(raw))?;
                    range = DateRange::trailing(days, today);
                }
                _ => return Err(QueryError::UnknownArgument(flag.clone())),
            }
        }

        if start.is_some() {
            range.start = start;
        }
        if end.is_some() {
            range.end = end;
        }

        Ok(Command::Query { sensor, range })
    }
}
