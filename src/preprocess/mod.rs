//! Comment and string-literal neutralization.
//!
//! The matchers downstream work on plain text, so anything inside a comment
//! or a string literal must not be able to trigger them. [`neutralize`]
//! blanks those regions out while keeping every line break, which keeps
//! line/column numbers aligned with the original source.

/// Lexer state for the neutralization scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    DoubleQuoted,
    SingleQuoted,
}

/// Replace every character inside `//` comments, `/* */` comments, string
/// literals, and char literals with a space.
///
/// Line breaks are always preserved, including inside block comments and
/// multi-line strings, so the output has exactly as many lines as the input.
/// Escape sequences (`\x`) inside literals consume the following character
/// without terminating the literal. Block comments do not nest.
pub fn neutralize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '"' => {
                    out.push(' ');
                    state = State::DoubleQuoted;
                }
                '\'' => {
                    out.push(' ');
                    state = State::SingleQuoted;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::DoubleQuoted | State::SingleQuoted => {
                let quote = if state == State::DoubleQuoted { '"' } else { '\'' };
                if c == '\\' {
                    out.push(' ');
                    if let Some(escaped) = chars.next() {
                        out.push(if escaped == '\n' { '\n' } else { ' ' });
                    }
                } else if c == quote {
                    out.push(' ');
                    state = State::Code;
                } else if c == '\n' {
                    // Unterminated literal at end of line still keeps the
                    // line structure intact.
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}
