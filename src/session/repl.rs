//! Line-driven front end for a [`Session`].
//!
//! One command per line:
//!
//! | command | effect |
//! |---|---|
//! | `login <user> <password>` | open the session |
//! | `load <url or symbol>` | fetch a company (reused when unchanged) |
//! | `window <name>` / `windows` | pick / list analysis windows |
//! | `report` / `json` | print the report under the current window |
//! | `new` | forget the company, keep the login |
//! | `logout`, `whoami`, `help`, `quit` | |

use super::{Session, SessionError};
use crate::report::render_text;
use crate::reshape::period::AnalysisWindow;
use crate::scraper::FinancialDataSource;
use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "commands: login <user> <password> | load <url> | window <name> | windows | \
report | json | new | logout | whoami | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { user: String, password: String },
    Load(String),
    Window(AnalysisWindow),
    Windows,
    Report,
    Json,
    New,
    Logout,
    Whoami,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let cmd = match (verb.as_str(), args.as_slice()) {
            ("login", [user, password]) => Command::Login {
                user: user.to_string(),
                password: password.to_string(),
            },
            ("login", _) => return Err("usage: login <user> <password>".into()),
            ("load", [input]) => Command::Load(input.to_string()),
            ("load", _) => return Err("usage: load <url or symbol>".into()),
            ("window", [name]) => {
                let window = AnalysisWindow::from_str(name, true)
                    .map_err(|_| format!("unknown window '{}' (try `windows`)", name))?;
                Command::Window(window)
            }
            ("window", _) => return Err("usage: window <name>".into()),
            ("windows", []) => Command::Windows,
            ("report", []) => Command::Report,
            ("json", []) => Command::Json,
            ("new", []) => Command::New,
            ("logout", []) => Command::Logout,
            ("whoami", []) => Command::Whoami,
            ("help", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(format!("unknown command '{}' (try `help`)", line)),
        };
        Ok(Some(cmd))
    }
}

/// Drive `session` from `input` until end of input or `quit`.
///
/// Command and session errors are printed and the loop goes on; only I/O
/// and serialization failures end it.
pub async fn run<S, R, W>(session: &mut Session<S>, input: R, out: &mut W) -> Result<()>
where
    S: FinancialDataSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "error: {}", msg)?;
                continue;
            }
        };
        debug!("Command {:?}", cmd);
        if cmd == Command::Quit {
            break;
        }
        if let Err(e) = execute(session, cmd, out).await? {
            writeln!(out, "error: {:#}", anyhow::Error::from(e))?;
        }
    }
    Ok(())
}

async fn execute<S, W>(
    session: &mut Session<S>,
    cmd: Command,
    out: &mut W,
) -> Result<Result<(), SessionError>>
where
    S: FinancialDataSource,
    W: Write,
{
    match cmd {
        Command::Login { user, password } => {
            if let Err(e) = session.login(&user, &password) {
                return Ok(Err(e));
            }
            writeln!(out, "Logged in as {}", session.user().unwrap_or_default())?;
        }
        Command::Load(input) => match session.load(&input).await {
            Ok(data) => writeln!(out, "Loaded {} ({})", data.company, data.url)?,
            Err(e) => return Ok(Err(e)),
        },
        Command::Window(window) => {
            session.select_window(window);
            writeln!(out, "Window: {}", session.window())?;
        }
        Command::Windows => {
            for w in AnalysisWindow::ALL {
                let mark = if w == session.window() { '*' } else { ' ' };
                let name = w.to_possible_value().map(|v| v.get_name().to_string());
                writeln!(out, "{} {:<14} {}", mark, name.unwrap_or_default(), w)?;
            }
        }
        Command::Report => match session.report() {
            Ok(report) => write!(out, "{}", render_text(&report))?,
            Err(e) => return Ok(Err(e)),
        },
        Command::Json => match session.report() {
            Ok(report) => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
            Err(e) => return Ok(Err(e)),
        },
        Command::New => {
            session.reset();
            writeln!(out, "Ready for a new company (window: {})", session.window())?;
        }
        Command::Logout => {
            session.logout();
            writeln!(out, "Logged out")?;
        }
        Command::Whoami => match session.user() {
            Some(user) => writeln!(out, "{}", user)?,
            None => writeln!(out, "not logged in")?,
        },
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(Ok(()))
}
