//! Command-line argument parsing for gitter-stream.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// List joined rooms
    Rooms,
    /// Print a room's messages as they arrive
    Tail { room_id: String },
    /// Arguments that could not be parsed
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: gitter-stream <command>

Commands:
  rooms            List the rooms you have joined
  tail <roomId>    Print messages posted to a room until Ctrl-C

Options:
  -h, --help       Show this help
  -V, --version    Show version

Environment:
  GITTER_TOKEN       Personal access token
  GITTER_API_URL     REST base URL (default https://api.gitter.im/v1/)
  GITTER_STREAM_URL  Streaming base URL (default https://stream.gitter.im/v1/)
  RUST_LOG           Log filter for stderr (default info)";

/// Parse command-line arguments and return the appropriate command.
///
/// Flags win over subcommands wherever they appear. No arguments means help.
///
/// # Examples
///
/// ```
/// use gitter_stream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["gitter-stream".to_string(), "tail".to_string(), "abc".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     CliCommand::Tail { room_id: "abc".to_string() }
/// );
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let mut positional = args.iter().filter(|a| !a.starts_with('-'));
    match positional.next().map(String::as_str) {
        None => CliCommand::Help,
        Some("rooms") => CliCommand::Rooms,
        Some("tail") => match positional.next() {
            Some(room_id) if !room_id.trim().is_empty() => CliCommand::Tail {
                room_id: room_id.clone(),
            },
            _ => CliCommand::Invalid("tail requires a room id".to_string()),
        },
        Some(other) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}
