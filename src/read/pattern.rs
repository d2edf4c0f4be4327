//! Shell-style patterns for matching measurement set strings, e.g. the
//! `OBS_MODE` of a STATE row.
//!
//! The syntax is that of casacore's `pattern()`:
//! - `*` matches any run of characters (including none)
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]` match one character from a class, `[!abc]` negates it
//! - `{a,b,c}` matches any one of the alternatives (alternatives may nest)
//! - `\` makes the next character literal
//!
//! Everything else is literal. Patterns are compiled to anchored regular
//! expressions; user text is never spliced into regex syntax unescaped.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Pattern '{0}' has a '[' without a closing ']'")]
    UnclosedClass(String),

    #[error("Pattern '{0}' has a '{{' without a closing '}}'")]
    UnclosedAlternation(String),

    #[error("Pattern '{0}' ends with an unescaped '\\'")]
    TrailingEscape(String),

    #[error("Pattern '{pattern}' could not be compiled: {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern that must match a whole string.
    pub fn new(pattern: &str) -> Result<Pattern, PatternError> {
        let regex_src = glob_to_regex(pattern)?;
        let regex = Regex::new(&regex_src).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Pattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Compile a pattern that may match anywhere within a string, i.e.
    /// `*pattern*`.
    pub fn contains(pattern: &str) -> Result<Pattern, PatternError> {
        Pattern::new(&format!("*{pattern}*"))
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn glob_to_regex(glob: &str) -> Result<String, PatternError> {
    let mut regex = String::with_capacity(glob.len() * 2 + 8);
    regex.push_str("^(?s:");

    let mut chars = glob.chars().peekable();
    let mut alternation_depth = 0_usize;
    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut regex, escaped),
                None => return Err(PatternError::TrailingEscape(glob.to_string())),
            },
            '[' => {
                regex.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    regex.push('^');
                }
                // A ']' straight after the opening bracket is a member of the
                // class, not its end.
                let mut first = true;
                loop {
                    match chars.next() {
                        None => return Err(PatternError::UnclosedClass(glob.to_string())),
                        Some(']') if !first => break,
                        // These are special inside regex classes (nesting, set
                        // operations, negation).
                        Some(c @ ('\\' | '[' | ']' | '&' | '~' | '^')) => {
                            regex.push('\\');
                            regex.push(c);
                        }
                        Some(c) => regex.push(c),
                    }
                    first = false;
                }
                regex.push(']');
            }
            '{' => {
                alternation_depth += 1;
                regex.push_str("(?:");
            }
            '}' if alternation_depth > 0 => {
                alternation_depth -= 1;
                regex.push(')');
            }
            ',' if alternation_depth > 0 => regex.push('|'),
            c => push_literal(&mut regex, c),
        }
    }

    if alternation_depth > 0 {
        return Err(PatternError::UnclosedAlternation(glob.to_string()));
    }
    regex.push_str(")$");
    Ok(regex)
}

fn push_literal(regex: &mut String, c: char) {
    let mut buf = [0; 4];
    regex.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}
