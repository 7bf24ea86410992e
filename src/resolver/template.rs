//! RFC 6570 URI Template expansion.
//!
//! Levels 1 through 3 are supported, plus the level 4 prefix modifier (`{var:3}`).
//! Values are strings, so the explode modifier (`{var*}`) parses but changes nothing.
//!
//! | Operator | Expansion | Example (`x=1024`, `y=768`) |
//! |----------|-----------|------------------------------|
//! | none | simple string | `{x,y}` → `1024,768` |
//! | `+` | reserved string | `{+path}` → `/foo/bar` |
//! | `#` | fragment | `{#x}` → `#1024` |
//! | `.` | label | `{.x}` → `.1024` |
//! | `/` | path segment | `{/x,y}` → `/1024/768` |
//! | `;` | path-style parameter | `{;x}` → `;x=1024` |
//! | `?` | form-style query | `{?x,y}` → `?x=1024&y=768` |
//! | `&` | query continuation | `{&x}` → `&x=1024` |

use crate::error::{HalError, Result};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::collections::BTreeMap;

/// Everything except ALPHA / DIGIT / `-` / `.` / `_` / `~`.
pub(crate) const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// [`UNRESERVED`] minus the reserved characters and `%`, for `+` and `#` expansion.
const UNRESERVED_OR_RESERVED: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b'%');

static VARSPEC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_.%]+)(?::(\d{1,4})|(\*))?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    Path,
    PathParam,
    Query,
    QueryContinuation,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::Path),
            ';' => Some(Operator::PathParam),
            '?' => Some(Operator::Query),
            '&' => Some(Operator::QueryContinuation),
            _ => None,
        }
    }

    fn first(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved => "",
            Operator::Fragment => "#",
            Operator::Label => ".",
            Operator::Path => "/",
            Operator::PathParam => ";",
            Operator::Query => "?",
            Operator::QueryContinuation => "&",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => ",",
            Operator::Label => ".",
            Operator::Path => "/",
            Operator::PathParam => ";",
            Operator::Query | Operator::QueryContinuation => "&",
        }
    }

    fn named(self) -> bool {
        matches!(
            self,
            Operator::PathParam | Operator::Query | Operator::QueryContinuation
        )
    }

    /// Appended after the name when a named value is empty.
    fn if_empty(self) -> &'static str {
        match self {
            Operator::Query | Operator::QueryContinuation => "=",
            _ => "",
        }
    }

    fn allowed(self) -> &'static AsciiSet {
        match self {
            Operator::Reserved | Operator::Fragment => UNRESERVED_OR_RESERVED,
            _ => UNRESERVED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VarSpec {
    name: String,
    prefix: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression {
        operator: Operator,
        variables: Vec<VarSpec>,
    },
}

/// A parsed URI template.
///
/// # Examples
///
/// ```
/// use hal_http::UriTemplate;
/// use std::collections::BTreeMap;
///
/// let template = UriTemplate::parse("http://host.com/orders{?page,size}").unwrap();
///
/// let mut vars = BTreeMap::new();
/// vars.insert("page".to_string(), "2".to_string());
///
/// assert_eq!(template.expand(&vars), "http://host.com/orders?page=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    parts: Vec<Part>,
}

impl UriTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidUri`] for unbalanced braces, an unsupported
    /// operator, or a malformed variable specification.
    pub fn parse(template: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut rest = template;

        while !rest.is_empty() {
            match rest.find(|c: char| c == '{' || c == '}') {
                None => {
                    parts.push(Part::Literal(rest.to_string()));
                    break;
                }
                Some(pos) if rest[pos..].starts_with('}') => {
                    return Err(HalError::InvalidUri(format!(
                        "unmatched '}}' at offset {} in template '{}'",
                        template.len() - rest.len() + pos,
                        template
                    )));
                }
                Some(pos) => {
                    if pos > 0 {
                        parts.push(Part::Literal(rest[..pos].to_string()));
                    }
                    let body = &rest[pos + 1..];
                    let end = body.find('}').ok_or_else(|| {
                        HalError::InvalidUri(format!("unclosed expression in template '{}'", template))
                    })?;
                    parts.push(parse_expression(&body[..end], template)?);
                    rest = &body[end + 1..];
                }
            }
        }

        Ok(UriTemplate {
            source: template.to_string(),
            parts,
        })
    }

    /// Expand the template. Variables missing from `variables` are omitted; an empty
    /// string is a defined value.
    pub fn expand(&self, variables: &BTreeMap<String, String>) -> String {
        let mut out = String::with_capacity(self.source.len());

        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Expression { operator, variables: specs } => {
                    expand_expression(&mut out, *operator, specs, variables)
                }
            }
        }

        out
    }

    /// Names of all variables, in template order, duplicates included.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts
            .iter()
            .flat_map(|part| match part {
                Part::Literal(_) => &[][..],
                Part::Expression { variables, .. } => variables.as_slice(),
            })
            .map(|spec| spec.name.as_str())
    }

    /// The template text as parsed.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn parse_expression(body: &str, template: &str) -> Result<Part> {
    let (operator, list) = match body.chars().next().and_then(Operator::from_char) {
        Some(operator) => (operator, &body[1..]),
        None => (Operator::Simple, body),
    };

    let variables = list
        .split(',')
        .map(|spec| {
            let caps = VARSPEC.captures(spec).ok_or_else(|| {
                HalError::InvalidUri(format!(
                    "invalid expression '{{{}}}' in template '{}'",
                    body, template
                ))
            })?;
            Ok(VarSpec {
                name: caps[1].to_string(),
                prefix: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Part::Expression { operator, variables })
}

fn expand_expression(
    out: &mut String,
    operator: Operator,
    specs: &[VarSpec],
    variables: &BTreeMap<String, String>,
) {
    let mut first = true;

    for spec in specs {
        let Some(value) = variables.get(&spec.name) else {
            continue;
        };

        out.push_str(if first { operator.first() } else { operator.separator() });
        first = false;

        if operator.named() {
            out.push_str(&spec.name);
            if value.is_empty() {
                out.push_str(operator.if_empty());
                continue;
            }
            out.push('=');
        }

        let value = match spec.prefix {
            Some(length) => value.chars().take(length).collect::<String>(),
            None => value.clone(),
        };
        out.extend(utf8_percent_encode(&value, operator.allowed()));
    }
}
