//! Terminal commands understood by the dashboard host.

use skycast_weather::TemperatureUnit;

pub const HELP: &str = "\
Commands:
  search <city>    load the forecast for a city
  type <partial>   show autocomplete suggestions
  pick <n>         load suggestion number n
  here             use the device position
  unit c|f         set the display unit
  toggle           switch between °C and °F
  dismiss          close the alert
  show             redraw the dashboard
  help             show this help
  quit             exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Type(String),
    Pick(usize),
    Here,
    Unit(TemperatureUnit),
    Toggle,
    Dismiss,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `Err` carries a message for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "type" | "t" => Ok(Command::Type(rest.to_string())),
            "pick" | "p" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .map(|n| Command::Pick(n - 1))
                .ok_or_else(|| format!("pick needs a suggestion number, got {:?}", rest)),
            "here" => Ok(Command::Here),
            "unit" => TemperatureUnit::parse(rest)
                .map(Command::Unit)
                .ok_or_else(|| format!("unknown unit {:?}, use c or f", rest)),
            "toggle" => Ok(Command::Toggle),
            "dismiss" => Ok(Command::Dismiss),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command {:?}, try help", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            Command::parse("search  New York "),
            Ok(Command::Search("New York".to_string()))
        );
        assert_eq!(Command::parse("type Mad"), Ok(Command::Type("Mad".to_string())));
        assert_eq!(Command::parse("pick 2"), Ok(Command::Pick(1)));
        assert_eq!(Command::parse("unit F"), Ok(Command::Unit(TemperatureUnit::Fahrenheit)));
    }

    #[test]
    fn search_without_city_is_passed_through() {
        assert_eq!(Command::parse("search"), Ok(Command::Search(String::new())));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("pick 0").is_err());
        assert!(Command::parse("pick x").is_err());
        assert!(Command::parse("unit kelvin").is_err());
        assert!(Command::parse("launch").is_err());
    }

    #[test]
    fn bare_words() {
        assert_eq!(Command::parse("here"), Ok(Command::Here));
        assert_eq!(Command::parse("QUIT"), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Ok(Command::Show));
    }
}
