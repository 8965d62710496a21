#![forbid(unsafe_code)]

//! Harness input lines.
//!
//! Plain lines are typed into the terminal and submitted. Lines starting
//! with `:` drive the chrome and the clock instead.

use pterm::{ResizeDirection, Size};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Type and submit a line.
    Line(String),
    Drag { dx: i32, dy: i32 },
    Resize { direction: ResizeDirection, dx: i32, dy: i32 },
    Minimize,
    Open,
    Close,
    ToggleMaximize,
    Viewport(Size),
    /// Press Tab, optionally replacing the input first.
    Tab(Option<String>),
    Up,
    Down,
    Interrupt,
    Wait(u64),
    Geometry,
    Screen,
    Quit,
}

fn int(word: Option<&str>, what: &str) -> Result<i32, String> {
    word.ok_or_else(|| format!("missing {what}"))?
        .parse()
        .map_err(|_| format!("{what} must be an integer"))
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Directive, String> {
    let Some(meta) = line.strip_prefix(':') else {
        return Ok(Directive::Line(line.to_owned()));
    };
    let mut words = meta.split_whitespace();
    let name = words.next().unwrap_or_default();
    let directive = match name {
        "drag" => Directive::Drag {
            dx: int(words.next(), "dx")?,
            dy: int(words.next(), "dy")?,
        },
        "resize" => {
            let handle = words.next().ok_or("missing handle (n, se, ...)")?;
            let direction = ResizeDirection::parse(handle)
                .ok_or_else(|| format!("unknown handle {handle:?}"))?;
            Directive::Resize {
                direction,
                dx: int(words.next(), "dx")?,
                dy: int(words.next(), "dy")?,
            }
        }
        "minimize" => Directive::Minimize,
        "open" | "show" => Directive::Open,
        "close" => Directive::Close,
        "maximize" | "restore" => Directive::ToggleMaximize,
        "viewport" => Directive::Viewport(Size::new(
            int(words.next(), "width")?,
            int(words.next(), "height")?,
        )),
        "tab" => {
            let rest = meta.trim_start()["tab".len()..].trim_start();
            Directive::Tab((!rest.is_empty()).then(|| rest.to_owned()))
        }
        "up" => Directive::Up,
        "down" => Directive::Down,
        "ctrl-c" => Directive::Interrupt,
        "wait" => {
            let ms = int(words.next(), "milliseconds")?;
            Directive::Wait(u64::try_from(ms).map_err(|_| "milliseconds must be >= 0")?)
        }
        "geometry" => Directive::Geometry,
        "screen" => Directive::Screen,
        "quit" | "q" => Directive::Quit,
        other => return Err(format!("unknown directive :{other}")),
    };
    Ok(directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_typed() {
        assert_eq!(parse("echo hi"), Ok(Directive::Line("echo hi".into())));
    }

    #[test]
    fn chrome_directives() {
        assert_eq!(parse(":drag -10 20"), Ok(Directive::Drag { dx: -10, dy: 20 }));
        assert_eq!(
            parse(":resize SE 5 6"),
            Ok(Directive::Resize {
                direction: ResizeDirection::SouthEast,
                dx: 5,
                dy: 6
            })
        );
        assert_eq!(parse(":viewport 800 600"), Ok(Directive::Viewport(Size::new(800, 600))));
    }

    #[test]
    fn tab_keeps_spacing_in_text() {
        assert_eq!(parse(":tab cd ab"), Ok(Directive::Tab(Some("cd ab".into()))));
        assert_eq!(parse(":tab"), Ok(Directive::Tab(None)));
    }

    #[test]
    fn bad_directives_explain_themselves() {
        assert_eq!(parse(":wait soon"), Err("milliseconds must be an integer".into()));
        assert_eq!(parse(":resize x 1 1"), Err("unknown handle \"x\"".into()));
        assert_eq!(parse(":nope"), Err("unknown directive :nope".into()));
        assert_eq!(parse(":wait -5"), Err("milliseconds must be >= 0".into()));
    }
}
