//! Text field codec
//!
//! Helpers shared by the entity encoders for the pipe-delimited record format.
//!
//! Free-form text (property keys, string values, edge types) is escaped with a
//! backslash before `\`, `|`, `:` and `,` so that delimiters stay unambiguous.

use std::str::FromStr;

use crate::error::{GraphError, Result};

/// Field separator inside an entity record
pub(crate) const FIELD_SEP: char = '|';

/// Separator between key, type tag and value of a property record
pub(crate) const PROP_SEP: char = ':';

/// Terminator after every id of an adjacency list
pub(crate) const LIST_SEP: char = ',';

const ESCAPE: char = '\\';

/// Escape every delimiter character in `raw`
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, ESCAPE | FIELD_SEP | PROP_SEP | LIST_SEP) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Reverse of [`escape`]
pub(crate) fn unescape(escaped: &str) -> Result<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(next) => out.push(next),
                None => {
                    return Err(GraphError::InvalidFormat(format!(
                        "dangling escape at end of '{}'",
                        escaped
                    )))
                }
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Split on every unescaped `delim`, keeping escapes in the pieces
pub(crate) fn split_unescaped(data: &str, delim: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (pos, c) in data.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == delim {
            pieces.push(&data[start..pos]);
            start = pos + c.len_utf8();
        }
    }
    pieces.push(&data[start..]);
    pieces
}

/// Split at the first unescaped `delim`
pub(crate) fn split_once_unescaped(data: &str, delim: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (pos, c) in data.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == delim {
            return Some((&data[..pos], &data[pos + c.len_utf8()..]));
        }
    }
    None
}

/// Parse a numeric field, naming it in the error
pub(crate) fn parse_field<T: FromStr>(field: &str, what: &str) -> Result<T> {
    field.parse().map_err(|_| {
        GraphError::InvalidFormat(format!("invalid {}: '{}'", what, field))
    })
}

/// Sequential reader over the fields of one record
pub(crate) struct Fields<'a> {
    fields: std::vec::IntoIter<&'a str>,
    record: &'static str,
}

impl<'a> Fields<'a> {
    /// Split a `|`-terminated record into its fields
    ///
    /// A well-formed record ends with a separator, so the last piece must be empty.
    pub(crate) fn new(data: &'a str, record: &'static str) -> Result<Self> {
        let mut pieces = split_unescaped(data, FIELD_SEP);
        match pieces.pop() {
            Some("") => {}
            _ => {
                return Err(GraphError::InvalidFormat(format!(
                    "{} record is not terminated by '{}'",
                    record, FIELD_SEP
                )))
            }
        }
        Ok(Self {
            fields: pieces.into_iter(),
            record,
        })
    }

    /// Next raw field, or an error naming what was expected
    pub(crate) fn next(&mut self, what: &str) -> Result<&'a str> {
        self.fields.next().ok_or_else(|| {
            GraphError::InvalidFormat(format!("{} record is missing {}", self.record, what))
        })
    }

    /// Next field parsed as a number
    pub(crate) fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let field = self.next(what)?;
        parse_field(field, what)
    }

    /// Next field, which must be empty (a section separator)
    pub(crate) fn separator(&mut self, what: &str) -> Result<()> {
        match self.next(what)? {
            "" => Ok(()),
            other => Err(GraphError::InvalidFormat(format!(
                "{} record expected empty {} but found '{}'",
                self.record, what, other
            ))),
        }
    }

    /// Fail if any field remains unread
    pub(crate) fn finish(mut self) -> Result<()> {
        match self.fields.next() {
            None => Ok(()),
            Some(extra) => Err(GraphError::InvalidFormat(format!(
                "{} record has trailing field '{}'",
                self.record, extra
            ))),
        }
    }
}
