//! Interactive filter commands.

use thiserror::Error;

/// A single edit of the filter form, or a session control command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterCommand {
    /// Sets the search term; an empty term clears it.
    Search(String),
    Years {
        from: Option<i32>,
        to: Option<i32>,
    },
    YearFrom(Option<i32>),
    YearTo(Option<i32>),
    Format(Option<String>),
    Reset,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Unknown command: :{0}")]
    UnknownCommand(String),

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

pub const COMMANDS_HELP: &str = "\
Type text to search artist and title, or one of:
  :year FROM TO   inclusive year range, '-' leaves a side open
  :from YEAR      lower year bound ('-' clears it)
  :to YEAR        upper year bound ('-' clears it)
  :format [NAME]  exact format match, no name clears it
  :reset          clear every filter
  :quit           leave";

fn parse_year(arg: &str) -> Result<Option<i32>, CommandParseError> {
    if arg == "-" {
        return Ok(None);
    }
    arg.parse::<i32>()
        .map(Some)
        .map_err(|_| CommandParseError::InvalidYear(arg.to_string()))
}

impl FilterCommand {
    pub fn parse(line: &str) -> Result<FilterCommand, CommandParseError> {
        let line = line.trim();
        let Some(command_line) = line.strip_prefix(':') else {
            return Ok(FilterCommand::Search(line.to_string()));
        };

        let (name, rest) = match command_line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command_line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match name {
            "year" | "years" => match args.as_slice() {
                [from, to] => Ok(FilterCommand::Years {
                    from: parse_year(from)?,
                    to: parse_year(to)?,
                }),
                _ => Err(CommandParseError::Usage(":year FROM TO")),
            },
            "from" => match args.as_slice() {
                [year] => Ok(FilterCommand::YearFrom(parse_year(year)?)),
                _ => Err(CommandParseError::Usage(":from YEAR")),
            },
            "to" => match args.as_slice() {
                [year] => Ok(FilterCommand::YearTo(parse_year(year)?)),
                _ => Err(CommandParseError::Usage(":to YEAR")),
            },
            "format" => Ok(FilterCommand::Format(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "reset" => Ok(FilterCommand::Reset),
            "quit" | "q" => Ok(FilterCommand::Quit),
            other => Err(CommandParseError::UnknownCommand(other.to_string())),
        }
    }
}
