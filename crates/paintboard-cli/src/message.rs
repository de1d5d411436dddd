use std::path::PathBuf;
use std::str::FromStr;

use paintboard_core::filters::TileGrid;
use paintboard_core::pixel::Rgb;
use paintboard_core::stroke::Point;

/// One host command. Mirrors the menu and button actions of the drawing UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // File menu
    NewCanvas,
    Load(PathBuf),
    Save(PathBuf),

    // Drawing
    AddStroke {
        from: Point,
        to: Point,
        width: u32,
        color: Rgb,
    },
    CommitStrokes,

    // Edit menu
    Undo,

    // Enhancement buttons
    Grayscale,
    Negative,
    GlobalEqualize,
    /// `None` falls back to the editor's configured defaults.
    AdaptiveEqualize {
        grid: Option<TileGrid>,
        clip_limit: Option<f64>,
    },
    ContrastBrightness {
        alpha: f64,
        beta: f64,
    },
}

impl FromStr for Message {
    type Err = String;

    /// Parse the textual form used on the command line:
    ///
    /// `new`, `load:PATH`, `save:PATH`, `stroke:X1,Y1,X2,Y2,WIDTH,RRGGBB`,
    /// `commit`, `undo`, `grayscale`, `negative`, `equalize`,
    /// `clahe[:ROWSxCOLS[:CLIP]]`, `contrast:ALPHA:BETA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, args) = match s.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (s, None),
        };

        match (name, args) {
            ("new", None) => Ok(Message::NewCanvas),
            ("load", Some(path)) if !path.is_empty() => Ok(Message::Load(path.into())),
            ("save", Some(path)) if !path.is_empty() => Ok(Message::Save(path.into())),
            ("stroke", Some(args)) => parse_stroke(args),
            ("commit", None) => Ok(Message::CommitStrokes),
            ("undo", None) => Ok(Message::Undo),
            ("grayscale", None) => Ok(Message::Grayscale),
            ("negative", None) => Ok(Message::Negative),
            ("equalize", None) => Ok(Message::GlobalEqualize),
            ("clahe", args) => parse_clahe(args),
            ("contrast", Some(args)) => {
                let (alpha, beta) = args
                    .split_once(':')
                    .ok_or_else(|| format!("expected contrast:ALPHA:BETA, got {s:?}"))?;
                Ok(Message::ContrastBrightness {
                    alpha: parse_number(alpha, "alpha")?,
                    beta: parse_number(beta, "beta")?,
                })
            }
            _ => Err(format!("unknown operation {s:?}")),
        }
    }
}

fn parse_number<T: FromStr>(s: &str, what: &str) -> Result<T, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid {what}: {s:?}"))
}

fn parse_stroke(args: &str) -> Result<Message, String> {
    let parts: Vec<&str> = args.split(',').collect();
    let [x1, y1, x2, y2, width, color] = parts.as_slice() else {
        return Err(format!(
            "expected stroke:X1,Y1,X2,Y2,WIDTH,RRGGBB, got {args:?}"
        ));
    };
    Ok(Message::AddStroke {
        from: Point::new(parse_number(x1, "x1")?, parse_number(y1, "y1")?),
        to: Point::new(parse_number(x2, "x2")?, parse_number(y2, "y2")?),
        width: parse_number(width, "width")?,
        color: Rgb::from_hex(color.trim()).map_err(|e| e.to_string())?,
    })
}

fn parse_clahe(args: Option<&str>) -> Result<Message, String> {
    let Some(args) = args else {
        return Ok(Message::AdaptiveEqualize {
            grid: None,
            clip_limit: None,
        });
    };
    let (grid, clip) = match args.split_once(':') {
        Some((grid, clip)) => (grid, Some(clip)),
        None => (args, None),
    };
    let (rows, cols) = grid
        .split_once('x')
        .ok_or_else(|| format!("expected ROWSxCOLS, got {grid:?}"))?;
    Ok(Message::AdaptiveEqualize {
        grid: Some(TileGrid::new(
            parse_number(rows, "rows")?,
            parse_number(cols, "cols")?,
        )),
        clip_limit: clip.map(|c| parse_number(c, "clip limit")).transpose()?,
    })
}
