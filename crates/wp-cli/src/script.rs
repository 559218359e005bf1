//! Line-oriented intent parser.
//!
//! One intent per line, whitespace separated. A word starting with `#`
//! begins a comment, unless it is an element id such as `#12`.

use wp_core::catalog::WindowStyle;
use wp_core::id::ElementId;
use wp_core::model::{ElementPatch, ImageRef};

/// A user intent, as the toolbar or canvas would issue it.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Add(ImageRef),
    Update(ElementId, ElementPatch),
    Remove(ElementId),
    Duplicate(ElementId),
    Forward(ElementId),
    Rotate(ElementId),
    Undo,
    Redo,
    Background(ImageRef),
    ClearBackground,
    BeginGesture,
    EndGesture,
    Show,
    Help,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{0}` is not an element id")]
    BadId(String),

    #[error("`{0}` is not a number")]
    BadNumber(String),

    #[error("unknown field `{0}` (x, y, width, height, rotation)")]
    BadField(String),
}

pub const HELP: &str = "\
add <white|black|brown|clay|image-ref>   place a window
move <id> <x> <y>                        move an element
resize <id> <width> <height>             resize an element
set <id> <field>=<value>...              patch x, y, width, height, rotation
remove <id>                              delete an element
duplicate <id>                           copy an element (+20, +20)
forward <id>                             bring an element forward
rotate <id>                              rotate an element by 15 degrees
undo | redo                              walk the history
background <image-ref>                   set the background image
background-clear                         remove the background image
begin | end                              group edits into one undo step
show                                     print the scene as JSON
help                                     this text";

/// Parse one line. Blank lines and comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Intent>, ParseError> {
    let mut words = line.split_whitespace().take_while(|w| !starts_comment(w));
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let intent = match command.to_ascii_lowercase().as_str() {
        "add" => {
            let [asset] = exact::<1>(&args, "add", "one style or image reference")?;
            Intent::Add(
                WindowStyle::from_label(asset)
                    .map_or_else(|| ImageRef::new(*asset), WindowStyle::image_ref),
            )
        }
        "move" => {
            let [id, x, y] = exact::<3>(&args, "move", "<id> <x> <y>")?;
            Intent::Update(parse_id(id)?, ElementPatch::position(number(x)?, number(y)?))
        }
        "resize" => {
            let [id, w, h] = exact::<3>(&args, "resize", "<id> <width> <height>")?;
            Intent::Update(parse_id(id)?, ElementPatch::size(number(w)?, number(h)?))
        }
        "set" => {
            let Some((id, fields)) = args.split_first() else {
                return Err(ParseError::Arguments {
                    command: "set",
                    expected: "<id> <field>=<value>...",
                });
            };
            if fields.is_empty() {
                return Err(ParseError::Arguments {
                    command: "set",
                    expected: "at least one <field>=<value>",
                });
            }
            let mut patch = ElementPatch::default();
            for field in fields {
                set_field(&mut patch, field)?;
            }
            Intent::Update(parse_id(id)?, patch)
        }
        "remove" | "delete" => Intent::Remove(single_id(&args, "remove")?),
        "duplicate" | "clone" => Intent::Duplicate(single_id(&args, "duplicate")?),
        "forward" => Intent::Forward(single_id(&args, "forward")?),
        "rotate" => Intent::Rotate(single_id(&args, "rotate")?),
        "undo" => no_args(&args, "undo", Intent::Undo)?,
        "redo" => no_args(&args, "redo", Intent::Redo)?,
        "background" => {
            let [asset] = exact::<1>(&args, "background", "one image reference")?;
            Intent::Background(ImageRef::new(*asset))
        }
        "background-clear" => no_args(&args, "background-clear", Intent::ClearBackground)?,
        "begin" => no_args(&args, "begin", Intent::BeginGesture)?,
        "end" => no_args(&args, "end", Intent::EndGesture)?,
        "show" => no_args(&args, "show", Intent::Show)?,
        "help" | "?" => Intent::Help,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(intent))
}

fn starts_comment(word: &str) -> bool {
    match word.strip_prefix('#') {
        Some(rest) => rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

fn exact<'a, const N: usize>(
    args: &'a [&'a str],
    command: &'static str,
    expected: &'static str,
) -> Result<&'a [&'a str; N], ParseError> {
    args.try_into()
        .map_err(|_| ParseError::Arguments { command, expected })
}

fn no_args(args: &[&str], command: &'static str, intent: Intent) -> Result<Intent, ParseError> {
    let [] = exact::<0>(args, command, "no arguments")?;
    Ok(intent)
}

fn single_id(args: &[&str], command: &'static str) -> Result<ElementId, ParseError> {
    let [id] = exact::<1>(args, command, "one element id")?;
    parse_id(id)
}

fn parse_id(s: &str) -> Result<ElementId, ParseError> {
    s.parse().map_err(|_| ParseError::BadId(s.to_string()))
}

fn number(s: &str) -> Result<f32, ParseError> {
    match s.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::BadNumber(s.to_string())),
    }
}

fn set_field(patch: &mut ElementPatch, field: &str) -> Result<(), ParseError> {
    let Some((name, value)) = field.split_once('=') else {
        return Err(ParseError::BadField(field.to_string()));
    };
    let value = number(value)?;
    let slot = match name {
        "x" => &mut patch.x,
        "y" => &mut patch.y,
        "width" | "w" => &mut patch.width,
        "height" | "h" => &mut patch.height,
        "rotation" | "rot" => &mut patch.rotation,
        _ => return Err(ParseError::BadField(name.to_string())),
    };
    *slot = Some(value);
    Ok(())
}
