//! Line parser for the interactive shell.
//!
//! Every input line maps to one [`Input`]; parse failures carry a short
//! usage hint for the user.

use notepad_core::drawing::surface::check_surface_size;
use notepad_core::{Color, Command, EditorMode, InlineFormat, NoteId, Point};
use std::ops::Range;

pub const HELP: &str = "\
commands:
  list [query]                 show notes, optionally filtered
  new                          create a note
  open <id>                    switch to a note
  title <text>                 set the title
  write <html>                 replace the body
  bold|italic|underline <s> <e> toggle formatting on a char range
  mode <text|draw|erase>       pick the editing mode
  pen <#rrggbb> <width>        set pen color and width
  stroke x1 y1 x2 y2 ...       draw through the given points
  clear                        clear the drawing
  resize <w> <h>               resize the drawing surface
  save | delete | status | help | quit";

#[derive(Debug)]
pub enum Input {
    Session(Command),
    Format(Range<usize>, InlineFormat),
    Pen(Color, u32),
    Stroke(Vec<Point>),
    List(String),
    Status,
    Help,
    Quit,
    Blank,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word {
        "" => Input::Blank,
        "list" => Input::List(rest.to_string()),
        "new" => Input::Session(Command::NewNote),
        "open" if !rest.is_empty() => Input::Session(Command::OpenNote(NoteId::from(rest))),
        "open" => return Err("usage: open <id>".to_string()),
        "title" => Input::Session(Command::SetTitle(rest.to_string())),
        "write" => Input::Session(Command::SetContent(rest.to_string())),
        "bold" => Input::Format(parse_range(rest)?, InlineFormat::Bold),
        "italic" => Input::Format(parse_range(rest)?, InlineFormat::Italic),
        "underline" => Input::Format(parse_range(rest)?, InlineFormat::Underline),
        "mode" => Input::Session(Command::SetMode(parse_mode(rest)?)),
        "pen" => {
            let (color, width) = parse_pen(rest)?;
            Input::Pen(color, width)
        }
        "stroke" => Input::Stroke(parse_points(rest)?),
        "clear" => Input::Session(Command::ClearDrawing),
        "resize" => {
            let [width, height] = parse_numbers::<u32, 2>(rest, "usage: resize <w> <h>")?;
            check_surface_size(width, height).map_err(|err| err.to_string())?;
            Input::Session(Command::Resize { width, height })
        }
        "save" => Input::Session(Command::Save),
        "delete" => Input::Session(Command::Delete),
        "status" => Input::Status,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(input)
}

fn parse_mode(raw: &str) -> Result<EditorMode, String> {
    match raw {
        "text" => Ok(EditorMode::Text),
        "draw" => Ok(EditorMode::Draw),
        "erase" | "eraser" => Ok(EditorMode::Erase),
        _ => Err("usage: mode <text|draw|erase>".to_string()),
    }
}

fn parse_range(raw: &str) -> Result<Range<usize>, String> {
    let [start, end] = parse_numbers::<usize, 2>(raw, "usage: <format> <start> <end>")?;
    if start > end {
        return Err(format!("start {start} is past end {end}"));
    }
    Ok(start..end)
}

fn parse_pen(raw: &str) -> Result<(Color, u32), String> {
    let usage = "usage: pen <#rrggbb> <width>";
    let mut parts = raw.split_whitespace();
    let color = parts
        .next()
        .ok_or_else(|| usage.to_string())?
        .parse::<Color>()
        .map_err(|err| err.to_string())?;
    let width = parts
        .next()
        .ok_or_else(|| usage.to_string())?
        .parse::<u32>()
        .map_err(|_| usage.to_string())?;
    if parts.next().is_some() {
        return Err(usage.to_string());
    }
    Ok((color, width))
}

fn parse_points(raw: &str) -> Result<Vec<Point>, String> {
    let usage = "usage: stroke x1 y1 x2 y2 ...";
    let values = raw
        .split_whitespace()
        .map(|value| {
            value
                .parse::<f32>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| usage.to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() || values.len() % 2 != 0 {
        return Err(usage.to_string());
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

fn parse_numbers<N: std::str::FromStr, const COUNT: usize>(
    raw: &str,
    usage: &str,
) -> Result<[N; COUNT], String> {
    let values = raw
        .split_whitespace()
        .map(|value| value.parse::<N>().map_err(|_| usage.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    values.try_into().map_err(|_| usage.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_line, Input};
    use notepad_core::{Color, Command, EditorMode, InlineFormat};

    #[test]
    fn parses_session_commands() {
        assert!(matches!(
            parse_line("open note_1").unwrap(),
            Input::Session(Command::OpenNote(id)) if id.as_str() == "note_1"
        ));
        assert!(matches!(
            parse_line("  title  Weekly plan ").unwrap(),
            Input::Session(Command::SetTitle(title)) if title == "Weekly plan"
        ));
        assert!(matches!(
            parse_line("mode erase").unwrap(),
            Input::Session(Command::SetMode(EditorMode::Erase))
        ));
        assert!(matches!(
            parse_line("resize 640 480").unwrap(),
            Input::Session(Command::Resize {
                width: 640,
                height: 480
            })
        ));
        assert!(matches!(parse_line("").unwrap(), Input::Blank));
    }

    #[test]
    fn parses_drawing_input() {
        match parse_line("pen #ff0000 6").unwrap() {
            Input::Pen(color, width) => {
                assert_eq!(color, Color::rgb(255, 0, 0));
                assert_eq!(width, 6);
            }
            other => panic!("unexpected input: {other:?}"),
        }
        match parse_line("stroke 1 2 3.5 4").unwrap() {
            Input::Stroke(points) => assert_eq!(points.len(), 2),
            other => panic!("unexpected input: {other:?}"),
        }
        match parse_line("bold 2 5").unwrap() {
            Input::Format(range, format) => {
                assert_eq!(range, 2..5);
                assert_eq!(format, InlineFormat::Bold);
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("open").is_err());
        assert!(parse_line("stroke 1 2 3").is_err());
        assert!(parse_line("pen red 2").is_err());
        assert!(parse_line("bold 5 2").is_err());
        assert!(parse_line("resize 10").is_err());
        assert!(parse_line("resize 100000 100000")
            .unwrap_err()
            .contains("exceeds"));
        assert!(parse_line("resize 4294967295 4294967295").is_err());
        assert!(parse_line("stroke inf 0 5 5").is_err());
        assert!(parse_line("stroke 1 NaN 5 5").is_err());
        assert!(parse_line("mode paint").is_err());
        assert!(parse_line("fly").unwrap_err().contains("unknown command"));
    }
}
