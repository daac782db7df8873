use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Board endpoint URL. Overrides SIMPLECHAT_BOARD_URL and the built-in default.
    #[clap(short = 'u', long = "url", help = "board endpoint URL")]
    board_url: Option<String>,

    /// Name attached to posted messages. Overrides SIMPLECHAT_USERNAME.
    #[clap(short = 'n', long = "name", help = "name shown next to your messages")]
    username: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CommandLineArgs {
    board_url: Option<String>,
    username: Option<String>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from(ClapArgs::parse_from(itr))
    }

    pub fn board_url(&self) -> Option<&String> {
        self.board_url.as_ref()
    }

    pub fn username(&self) -> Option<&String> {
        self.username.as_ref()
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            board_url: args.board_url,
            username: args.username,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args_long_flags() {
        let args = CommandLineArgs::parse_from([
            "program",
            "--url",
            "http://localhost:8080/board",
            "--name",
            "alice",
        ]);
        assert_eq!(
            args.board_url().map(String::as_str),
            Some("http://localhost:8080/board")
        );
        assert_eq!(args.username().map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_parse_args_short_flags() {
        let args = CommandLineArgs::parse_from(["program", "-u", "http://x/board", "-n", "bob"]);
        assert_eq!(args.board_url().map(String::as_str), Some("http://x/board"));
        assert_eq!(args.username().map(String::as_str), Some("bob"));
    }

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["program"]);
        assert!(args.board_url().is_none());
        assert!(args.username().is_none());
    }
}
