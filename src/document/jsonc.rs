//! Comment stripping for JSON-with-comments settings files.

/// Lexical state of the stripping scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    String { escaped: bool },
    LineComment,
    BlockComment,
}

/// Remove `//` and `/* */` comments outside string literals.
///
/// Newlines are kept everywhere (including inside block comments) so line
/// numbers in parse diagnostics still match the file on disk.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = Scan::Code;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        state = match state {
            Scan::Code => match c {
                '"' => {
                    out.push(c);
                    Scan::String { escaped: false }
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    Scan::LineComment
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    Scan::BlockComment
                }
                _ => {
                    out.push(c);
                    Scan::Code
                }
            },
            Scan::String { escaped } => {
                out.push(c);
                match c {
                    _ if escaped => Scan::String { escaped: false },
                    '\\' => Scan::String { escaped: true },
                    '"' => Scan::Code,
                    _ => Scan::String { escaped: false },
                }
            }
            Scan::LineComment => {
                if c == '\n' {
                    out.push(c);
                    Scan::Code
                } else {
                    Scan::LineComment
                }
            }
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    Scan::Code
                } else {
                    if c == '\n' {
                        out.push(c);
                    }
                    Scan::BlockComment
                }
            }
        };
    }

    out
}

/// Drop commas that directly precede `}` or `]`, which editors accept in
/// settings files but strict JSON parsers reject.
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
