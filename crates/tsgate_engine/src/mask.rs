//! Blanks out string literals and comments so rules only match code.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Literal(char),
    Regex { in_class: bool },
}

/// True when a `/` after `prev` starts a regular expression literal rather
/// than a division. Only the previous code character is considered, so a
/// regex directly after a keyword such as `return` is read as division.
fn starts_regex(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => matches!(
            c,
            '(' | ',' | '=' | ':' | '[' | '!' | '&' | '|' | '?' | '{' | '}' | ';' | '+' | '-'
                | '*' | '%' | '<' | '>' | '~' | '^'
        ),
    }
}

/// Returns a copy of `source` in which the contents of string literals and
/// comments are replaced by spaces.
///
/// Line breaks are kept and every other character maps to exactly one
/// character, so line/character positions are identical in both texts.
pub(crate) fn mask_non_code(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    // Last non-whitespace character seen in code.
    let mut prev: Option<char> = None;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            out.push(c);
            if state == State::LineComment
                || matches!(state, State::Regex { .. })
                || matches!(state, State::Literal(q) if q != '`')
            {
                state = State::Code;
            }
            continue;
        }

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
                '/' if starts_regex(prev) => {
                    out.push(c);
                    state = State::Regex { in_class: false };
                }
                '\'' | '"' | '`' => {
                    out.push(c);
                    state = State::Literal(c);
                }
                _ => {
                    out.push(c);
                    if !c.is_whitespace() {
                        prev = Some(c);
                    }
                }
            },
            State::LineComment => out.push(' '),
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::Regex { in_class } => match c {
                '/' if !in_class => {
                    out.push(c);
                    prev = Some(')');
                    state = State::Code;
                }
                '\\' => {
                    out.push(' ');
                    if chars.peek().is_some_and(|next| *next != '\n' && *next != '\r') {
                        chars.next();
                        out.push(' ');
                    }
                }
                '[' => {
                    out.push(' ');
                    state = State::Regex { in_class: true };
                }
                ']' => {
                    out.push(' ');
                    state = State::Regex { in_class: false };
                }
                _ => out.push(' '),
            },
            State::Literal(quote) => {
                if c == quote {
                    out.push(c);
                    prev = Some(c);
                    state = State::Code;
                } else if c == '\\' {
                    out.push(' ');
                    match chars.peek() {
                        Some('\n') | Some('\r') | None => {}
                        Some(_) => {
                            chars.next();
                            out.push(' ');
                        }
                    }
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}
