use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unbalanced braces at line {line}")]
    Unbalanced { line: usize },
}

/// Turns unformatted declaration text into its final layout.
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Layout for emitted declaration files.
///
/// Lines are re-indented by brace depth, two spaces per level, ignoring braces
/// inside quotes and comments. JSDoc continuation lines sit one space in from
/// their opening `/**`. Blank-line runs collapse to one, and blank lines after
/// `{`, before `}` and at either end are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationFormatter;

const INDENT: &str = "  ";

impl Formatter for DeclarationFormatter {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut scanner = BraceScanner::default();
        let mut out: Vec<String> = Vec::new();
        let mut depth = 0usize;
        let mut pending_blank = false;
        let mut line_no = 0;

        for (i, line) in source.lines().enumerate() {
            line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                pending_blank = true;
                continue;
            }

            let in_comment = scanner.in_comment;
            let closes_block = !in_comment && trimmed.starts_with('}');
            let (opens, closes) = scanner.scan(trimmed);

            let level = if closes_block {
                depth.checked_sub(1)
            } else {
                Some(depth)
            };
            let level = level.ok_or(FormatError::Unbalanced { line: line_no })?;
            depth = (depth + opens)
                .checked_sub(closes)
                .ok_or(FormatError::Unbalanced { line: line_no })?;

            if pending_blank
                && !closes_block
                && out.last().is_some_and(|prev| !prev.ends_with('{'))
            {
                out.push(String::new());
            }
            pending_blank = false;

            let indent = INDENT.repeat(level);
            if in_comment && trimmed.starts_with('*') {
                out.push(format!("{indent} {trimmed}"));
            } else {
                out.push(format!("{indent}{trimmed}"));
            }
        }

        if depth != 0 {
            return Err(FormatError::Unbalanced { line: line_no });
        }
        if out.is_empty() {
            return Ok(String::new());
        }
        let mut formatted = out.join("\n");
        formatted.push('\n');
        Ok(formatted)
    }
}

/// Counts code braces line by line, carrying block-comment state across lines.
#[derive(Debug, Default)]
struct BraceScanner {
    in_comment: bool,
}

impl BraceScanner {
    /// Returns the number of opening and closing braces outside of quotes
    /// and comments.
    fn scan(&mut self, line: &str) -> (usize, usize) {
        let (mut opens, mut closes) = (0, 0);
        let mut quote: Option<char> = None;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if self.in_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_comment = false;
                }
                continue;
            }
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_comment = true;
                }
                '{' => opens += 1,
                '}' => closes += 1,
                _ => {}
            }
        }
        (opens, closes)
    }
}
