//! SCIM 2.0 Filter Evaluation
//!
//! This module implements the filter subset the mock evaluates, per RFC 7644
//! Section 3.4.2.2: a single equality comparison against a quoted value.
//!
//! ## Grammar
//!
//! ```text
//! filter    = WS* attrName WS+ "eq" WS+ STRING WS*
//! attrName  = ALPHA { ALPHA | DIGIT | "_" | "-" }
//! STRING    = '"' { char | '\' escape } '"'
//! ```
//!
//! Anything outside this grammar (other operators, logical conjunctions,
//! grouping, unquoted values) fails to parse, and an unparsed filter is a
//! no-op: list endpoints return the full result set rather than an error.
//! Provisioning clients only send lookup-by-name equality filters, so the
//! subset is deliberately small.

use super::types::{ScimGroup, ScimUser};

/// A parsed equality comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    pub attr: String,
    pub value: String,
}

/// Parse a filter expression into an equality comparison.
///
/// Returns None when the expression does not match the supported grammar,
/// including trailing content after the quoted value.
pub fn parse_equality(input: &str) -> Option<EqualityFilter> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();
    let attr = parser.attr_name()?;
    parser.require_whitespace()?;
    parser.keyword("eq")?;
    parser.require_whitespace()?;
    let value = parser.quoted_string()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return None;
    }
    Some(EqualityFilter { attr, value })
}

/// Filter users by an optional expression.
///
/// Only `userName eq "..."` narrows the result; the attribute name is matched
/// case-sensitively. Every other filter passes the input through unchanged.
pub fn apply_user_filter(users: Vec<ScimUser>, filter: Option<&str>) -> Vec<ScimUser> {
    retain_matching(users, filter, "userName", |user| &user.user_name)
}

/// Filter groups by an optional expression.
///
/// Only `displayName eq "..."` narrows the result.
pub fn apply_group_filter(groups: Vec<ScimGroup>, filter: Option<&str>) -> Vec<ScimGroup> {
    retain_matching(groups, filter, "displayName", |group| &group.display_name)
}

fn retain_matching<T>(
    resources: Vec<T>,
    filter: Option<&str>,
    attr: &str,
    value_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    let Some(parsed) = filter.and_then(parse_equality) else {
        return resources;
    };
    if parsed.attr != attr {
        return resources;
    }
    resources
        .into_iter()
        .filter(|resource| value_of(resource) == parsed.value)
        .collect()
}

/// Character-level scanner over a filter expression
struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Consume at least one whitespace character
    fn require_whitespace(&mut self) -> Option<()> {
        if !matches!(self.peek(), Some(c) if c.is_whitespace()) {
            return None;
        }
        self.skip_whitespace();
        Some(())
    }

    /// Consume an attribute name: alpha followed by alphanumerics, `_` or `-`
    fn attr_name(&mut self) -> Option<String> {
        let start = self.position;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                self.advance();
            }
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            self.advance();
        }
        Some(self.input[start..self.position].to_string())
    }

    /// Consume a keyword, matched case-insensitively
    fn keyword(&mut self, word: &str) -> Option<()> {
        let remaining = &self.input[self.position..];
        let candidate = remaining.get(..word.len())?;
        if !candidate.eq_ignore_ascii_case(word) {
            return None;
        }
        self.position += word.len();
        Some(())
    }

    /// Consume a double-quoted string with `\"` and `\\` escapes
    fn quoted_string(&mut self) -> Option<String> {
        if self.peek() != Some('"') {
            return None;
        }
        self.advance();

        let mut value = String::new();
        loop {
            match self.advance()? {
                '"' => return Some(value),
                '\\' => match self.advance()? {
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    _ => return None,
                },
                c => value.push(c),
            }
        }
    }
}
