//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};

/// One tokenized content line: `name *(";" param "=" value) ":" value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name, uppercased.
    pub name: String,
    pub params: Vec<Parameter>,
    pub raw_value: String,
}

impl ContentLine {
    /// Value of the first parameter with the given (uppercase) name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Lines starting with SP/HTAB
/// are continuations of the previous line; per RFC 5545 §3.1 unfolding
/// removes the line break and the single whitespace character.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            let continuation = &line[1..];
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
            } else {
                lines.push((i + 1, continuation.to_string()));
            }
        } else if !line.contains(':') {
            // Lenient: a line without a colon can only be a folded
            // continuation that lost its leading whitespace.
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(line);
            } else {
                lines.push((i + 1, line.to_string()));
            }
        } else {
            lines.push((i + 1, line.to_string()));
        }
    }

    lines
}

/// Parses a single content line.
///
/// ## Errors
/// Returns an error if the line is malformed or contains invalid characters.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let mut chars = line.char_indices().peekable();
    let mut name_end = 0;
    let mut colon_pos = None;

    // Property name ends at ';' or ':'
    while let Some(&(i, c)) = chars.peek() {
        if c == ';' || c == ':' {
            name_end = i;
            if c == ':' {
                colon_pos = Some(i);
            }
            break;
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
                .with_context(format!("invalid character {c:?} in property name")));
        }
        chars.next();
    }

    if name_end == 0 {
        return Err(
            ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
                .with_context("missing property name"),
        );
    }

    let name = line[..name_end].to_ascii_uppercase();

    let mut params = Vec::new();
    if colon_pos.is_none() {
        chars.next(); // consume the ';'
        loop {
            let (param, colon) = parse_parameter(&mut chars, line, line_num)?;
            params.push(param);
            if let Some(i) = colon {
                colon_pos = Some(i);
                break;
            }
        }
    }

    let colon_pos = colon_pos.ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidContentLine, line_num).with_context("missing colon")
    })?;

    let value = &line[colon_pos + 1..];

    Ok(ContentLine {
        name,
        params,
        raw_value: value.to_string(),
    })
}

/// Parses one `name=value` parameter from the character stream.
///
/// Returns the parameter and, if the trailing delimiter was ':', its index
/// in the line.
fn parse_parameter(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<(Parameter, Option<usize>)> {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);

    let mut name_end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c == '=' {
            name_end = i;
            chars.next(); // consume '='
            break;
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
                .with_context(format!("invalid character {c:?} in parameter name")));
        }
        chars.next();
    }

    if name_end == start {
        return Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
            .with_context("empty parameter name"));
    }

    let name = line[start..name_end].to_ascii_uppercase();
    let value = parse_param_value(chars, line, line_num)?;

    match chars.next() {
        Some((_, ';')) => Ok((Parameter { name, value }, None)),
        Some((i, ':')) => Ok((Parameter { name, value }, Some(i))),
        Some((_, c)) => Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
            .with_context(format!("unexpected character {c:?} after parameter"))),
        None => Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
            .with_context("missing colon")),
    }
}

/// Parses a parameter value (possibly quoted). Leaves the trailing
/// delimiter (',' ';' or ':') unconsumed.
fn parse_param_value(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<String> {
    let Some(&(start, first)) = chars.peek() else {
        return Err(ParseError::new(ParseErrorKind::InvalidContentLine, line_num)
            .with_context("missing parameter value"));
    };

    if first == '"' {
        chars.next(); // consume opening quote
        let mut value = String::new();
        for (_i, c) in chars.by_ref() {
            if c == '"' {
                return Ok(value);
            }
            value.push(c);
        }
        Err(ParseError::new(ParseErrorKind::UnclosedQuote, line_num))
    } else {
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c == ';' || c == ':' {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        Ok(line[start..end].to_string())
    }
}
