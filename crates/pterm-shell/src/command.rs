#![forbid(unsafe_code)]

//! The built-in command table.

use crate::error::ShellError;

/// Commands understood by the interpreter, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Help,
    Ls,
    Pwd,
    Cd,
    Uname,
    Echo,
    Clear,
    Whoami,
    Reboot,
    Github,
    Blog,
    Theme,
    Su,
    Sudo,
    Logout,
    Exit,
}

impl Builtin {
    pub const ALL: [Self; 16] = [
        Self::Help,
        Self::Ls,
        Self::Pwd,
        Self::Cd,
        Self::Uname,
        Self::Echo,
        Self::Clear,
        Self::Whoami,
        Self::Reboot,
        Self::Github,
        Self::Blog,
        Self::Theme,
        Self::Su,
        Self::Sudo,
        Self::Logout,
        Self::Exit,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Ls => "ls",
            Self::Pwd => "pwd",
            Self::Cd => "cd",
            Self::Uname => "uname",
            Self::Echo => "echo",
            Self::Clear => "clear",
            Self::Whoami => "whoami",
            Self::Reboot => "reboot",
            Self::Github => "github",
            Self::Blog => "blog",
            Self::Theme => "theme",
            Self::Su => "su",
            Self::Sudo => "sudo",
            Self::Logout => "logout",
            Self::Exit => "exit",
        }
    }

    /// One-line description shown by `help`.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Help => "list available commands",
            Self::Ls => "list pages",
            Self::Pwd => "print the current page",
            Self::Cd => "go to a page",
            Self::Uname => "print browser information",
            Self::Echo => "print the arguments",
            Self::Clear => "clear the screen",
            Self::Whoami => "print user and public IP",
            Self::Reboot => "reload the page, keeping this session",
            Self::Github => "open the GitHub profile",
            Self::Blog => "go to the blog",
            Self::Theme => "toggle light/dark theme",
            Self::Su => "become root",
            Self::Sudo => "sudo su: become root",
            Self::Logout => "leave root",
            Self::Exit => "close the terminal",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// A resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub builtin: Builtin,
    pub args: Vec<String>,
    /// Argument text as typed, inner whitespace kept.
    pub raw_args: String,
}

/// Split `line` on whitespace and look up the command.
///
/// `sudo su` resolves to [`Builtin::Su`]; other `sudo` forms are rejected.
/// Returns `Ok(None)` for a blank line.
pub fn resolve(line: &str) -> Result<Option<Invocation>, ShellError> {
    let line = line.trim();
    let Some(name) = line.split_whitespace().next() else {
        return Ok(None);
    };
    let raw_args = line[name.len()..].trim_start().to_owned();
    let args: Vec<String> = raw_args.split_whitespace().map(str::to_owned).collect();

    let builtin = Builtin::from_name(name).ok_or_else(|| ShellError::UnknownCommand {
        command: name.to_owned(),
    })?;

    if builtin == Builtin::Sudo {
        return match args.as_slice() {
            [] => Err(ShellError::MissingArgument {
                command: "sudo".into(),
            }),
            [target] if target == "su" => Ok(Some(Invocation {
                builtin: Builtin::Su,
                args: Vec::new(),
                raw_args: String::new(),
            })),
            _ => Err(ShellError::UnknownCommand {
                command: format!("sudo {}", args.join(" ")),
            }),
        };
    }

    Ok(Some(Invocation {
        builtin,
        args,
        raw_args,
    }))
}
