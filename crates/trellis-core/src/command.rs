//! The command-string protocol.
//!
//! Commands are space-delimited ASCII strings of the shape
//! `name key1:value1 key2:value2 ...`. A widget that posts a command has its
//! id inserted as a `ptr:` argument directly after the name, so handlers can
//! tell which widget (or which subtree) a command came from. A command whose
//! text starts with `!` is global: the `!` is stripped and no `ptr:` is added.
//!
//! The helpers here never fail. A missing or malformed argument reads as the
//! type's zero value (or `None`), and a handler that does not recognize a
//! command simply declines it.
//!
//! ```
//! use trellis_core::command;
//! use trellis_core::Int2;
//!
//! let cmd = "mouse.clicked arg:1 button:1 coord:40 12";
//! assert!(command::equal(cmd, "mouse.clicked"));
//! assert_eq!(command::arg(cmd), 1);
//! assert_eq!(command::coord(cmd), Int2::new(40, 12));
//! ```

use crate::geometry::Int2;
use crate::id::WidgetId;

/// Label of the implicit source-widget argument.
pub const PTR_LABEL: &str = "ptr";

/// Whether `cmd` is the command `name`.
///
/// A command with arguments matches when it starts with `name` followed by a
/// space. A command without arguments must equal `name` exactly.
pub fn equal(cmd: &str, name: &str) -> bool {
    if cmd.contains(':') {
        cmd.strip_prefix(name)
            .is_some_and(|rest| rest.starts_with(' '))
    } else {
        cmd == name
    }
}

/// The command name: everything before the first space.
pub fn name(cmd: &str) -> &str {
    cmd.split(' ').next().unwrap_or(cmd)
}

/// Text following ` label:`, up to the end of the command.
pub fn suffix<'a>(cmd: &'a str, label: &str) -> Option<&'a str> {
    let token = format!(" {label}:");
    cmd.find(&token).map(|pos| &cmd[pos + token.len()..])
}

/// The whitespace-delimited value following ` label:`.
pub fn string_arg<'a>(cmd: &'a str, label: &str) -> Option<&'a str> {
    suffix(cmd, label).map(|rest| {
        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        &rest[..end]
    })
}

/// Integer value of ` label:`, or 0.
pub fn arg_label(cmd: &str, label: &str) -> i32 {
    suffix(cmd, label)
        .and_then(|rest| leading_int(rest).map(|(value, _)| value))
        .unwrap_or(0)
}

/// Integer value of ` arg:`, or 0.
pub fn arg(cmd: &str) -> i32 {
    arg_label(cmd, "arg")
}

/// Unsigned value of ` label:`, or 0.
pub fn argu_label(cmd: &str, label: &str) -> u32 {
    u32::try_from(arg_label(cmd, label)).unwrap_or(0)
}

/// Floating point value of ` label:`, or 0.0.
pub fn argf_label(cmd: &str, label: &str) -> f32 {
    suffix(cmd, label)
        .and_then(|rest| {
            let end = rest
                .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
                .unwrap_or(rest.len());
            rest[..end].parse::<f32>().ok()
        })
        .unwrap_or(0.0)
}

/// Floating point value of ` arg:`, or 0.0.
pub fn argf(cmd: &str) -> f32 {
    argf_label(cmd, "arg")
}

/// Widget id stored under ` label:`.
pub fn pointer_label(cmd: &str, label: &str) -> Option<WidgetId> {
    string_arg(cmd, label).and_then(|text| text.parse().ok())
}

/// Source widget of a targeted command.
pub fn pointer(cmd: &str) -> Option<WidgetId> {
    pointer_label(cmd, PTR_LABEL)
}

/// Pair of integers following ` coord:`, or zero.
pub fn coord(cmd: &str) -> Int2 {
    int_pair(cmd, "coord")
}

/// Pair of integers following ` dir:`, or zero.
pub fn dir(cmd: &str) -> Int2 {
    int_pair(cmd, "dir")
}

fn int_pair(cmd: &str, label: &str) -> Int2 {
    let Some(rest) = suffix(cmd, label) else {
        return Int2::ZERO;
    };
    let Some((x, consumed)) = leading_int(rest) else {
        return Int2::ZERO;
    };
    let y = leading_int(&rest[consumed..]).map_or(0, |(y, _)| y);
    Int2::new(x, y)
}

/// Parses an optionally signed integer after optional leading whitespace.
/// Returns the value and the number of bytes consumed.
fn leading_int(text: &str) -> Option<(i32, usize)> {
    let trimmed = text.trim_start();
    let skipped = text.len() - trimmed.len();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    trimmed[..end].parse().ok().map(|v| (v, skipped + end))
}

/// Insert the ` ptr:` argument for `source` after the command name.
///
/// Placing it first keeps trailing suffix arguments intact.
pub fn targeted(cmd: &str, source: WidgetId) -> String {
    let ptr = format!(" {PTR_LABEL}:{}", source.to_ptr_string());
    match cmd.find(' ') {
        Some(pos) => {
            let mut text = String::with_capacity(cmd.len() + ptr.len());
            text.push_str(&cmd[..pos]);
            text.push_str(&ptr);
            text.push_str(&cmd[pos..]);
            text
        }
        None => format!("{cmd}{ptr}"),
    }
}

/// A command ready to be queued for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedCommand {
    /// Final command text, including any `ptr:` argument.
    pub text: String,
    /// Whether the command was posted with the `!` prefix.
    pub global: bool,
}

impl PostedCommand {
    /// Prepare `text` for posting on behalf of `source`.
    ///
    /// Returns `None` for a targeted command that has no source widget.
    pub fn parse(text: &str, source: Option<WidgetId>) -> Option<Self> {
        if let Some(global) = text.strip_prefix('!') {
            return Some(Self {
                text: global.to_string(),
                global: true,
            });
        }
        let source = source?;
        Some(Self {
            text: targeted(text, source),
            global: false,
        })
    }
}
