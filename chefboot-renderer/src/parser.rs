//! Parser for the installer-snippet template dialect.
//!
//! ```text
//! log_level        :info
//! #if $chef_url
//! chef_server_url  '$chef_url'
//! #elif $compass_server
//! chef_server_url  'https://${compass_server}'
//! #end if
//! #if $os_version == "rhel7"
//! verify_api_cert false
//! #end if
//! ```
//!
//! Directives (`#if`, `#elif`, `#else`, `#end if`) must sit on their own line;
//! leading whitespace is ignored. Every other line, including `# comment`
//! lines, is output text. `$$` escapes a dollar sign.

use crate::ast::{Branch, Node, Predicate, Segment, Template};
use crate::error::RenderError;

enum Pending {
    Branch(Predicate, Vec<Node>),
    Else(Vec<Node>),
}

struct Frame {
    opened_at: usize,
    branches: Vec<Branch>,
    pending: Pending,
}

impl Frame {
    fn body_mut(&mut self) -> &mut Vec<Node> {
        match &mut self.pending {
            Pending::Branch(_, body) | Pending::Else(body) => body,
        }
    }

    fn into_node(self) -> Node {
        let mut branches = self.branches;
        let otherwise = match self.pending {
            Pending::Branch(predicate, body) => {
                branches.push(Branch { predicate, body });
                Vec::new()
            }
            Pending::Else(body) => body,
        };
        Node::Conditional { branches, otherwise }
    }
}

enum Directive<'a> {
    If(&'a str),
    Elif(&'a str),
    Else,
    EndIf,
}

/// Parse template `source`; `name` is carried into the result and errors.
pub fn parse(name: &str, source: &str) -> Result<Template, RenderError> {
    let err = |line: usize, message: String| RenderError::Parse {
        template: name.to_string(),
        line,
        message,
    };

    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let lineno = idx + 1;
        match directive(raw) {
            Some(Directive::If(rest)) => {
                let predicate = parse_predicate(rest).map_err(|m| err(lineno, m))?;
                stack.push(Frame {
                    opened_at: lineno,
                    branches: Vec::new(),
                    pending: Pending::Branch(predicate, Vec::new()),
                });
            }
            Some(Directive::Elif(rest)) => {
                let predicate = parse_predicate(rest).map_err(|m| err(lineno, m))?;
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| err(lineno, "#elif without a matching #if".into()))?;
                let new_pending = Pending::Branch(predicate, Vec::new());
                match std::mem::replace(&mut frame.pending, new_pending) {
                    Pending::Branch(predicate, body) => {
                        frame.branches.push(Branch { predicate, body })
                    }
                    Pending::Else(_) => return Err(err(lineno, "#elif after #else".into())),
                }
            }
            Some(Directive::Else) => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| err(lineno, "#else without a matching #if".into()))?;
                match std::mem::replace(&mut frame.pending, Pending::Else(Vec::new())) {
                    Pending::Branch(predicate, body) => {
                        frame.branches.push(Branch { predicate, body })
                    }
                    Pending::Else(_) => return Err(err(lineno, "duplicate #else".into())),
                }
            }
            Some(Directive::EndIf) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| err(lineno, "#end if without a matching #if".into()))?;
                let node = frame.into_node();
                match stack.last_mut() {
                    Some(parent) => parent.body_mut().push(node),
                    None => root.push(node),
                }
            }
            None => {
                let segments = parse_line(raw).map_err(|m| err(lineno, m))?;
                let node = Node::Line(segments);
                match stack.last_mut() {
                    Some(parent) => parent.body_mut().push(node),
                    None => root.push(node),
                }
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(err(frame.opened_at, "#if is never closed with #end if".into()));
    }

    Ok(Template {
        name: name.to_string(),
        nodes: root,
    })
}

fn directive(raw: &str) -> Option<Directive<'_>> {
    let line = raw.trim();
    if let Some(rest) = keyword(line, "#if") {
        return Some(Directive::If(rest));
    }
    if let Some(rest) = keyword(line, "#elif") {
        return Some(Directive::Elif(rest));
    }
    if line == "#else" {
        return Some(Directive::Else);
    }
    let mut words = line.split_whitespace();
    if words.next() == Some("#end") && words.next() == Some("if") && words.next().is_none() {
        return Some(Directive::EndIf);
    }
    None
}

/// `Some(rest)` when `line` is `kw` followed by whitespace (or nothing).
fn keyword<'a>(line: &'a str, kw: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(kw)?;
    if rest.is_empty() {
        return Some(rest);
    }
    if rest.starts_with(char::is_whitespace) {
        return Some(rest.trim());
    }
    None
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a `$name` / `${name}` reference at the start of `s`.
/// Returns the name and the unconsumed remainder.
fn var_ref(s: &str) -> Result<(String, &str), String> {
    let s = s
        .strip_prefix('$')
        .ok_or_else(|| format!("expected a variable reference, found '{s}'"))?;
    if let Some(inner) = s.strip_prefix('{') {
        let close = inner
            .find('}')
            .ok_or_else(|| "unterminated '${'".to_string())?;
        let name = &inner[..close];
        if !valid_ident(name) {
            return Err(format!("invalid variable name '{name}'"));
        }
        return Ok((name.to_string(), &inner[close + 1..]));
    }
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    let name = &s[..end];
    if !valid_ident(name) {
        return Err("expected a variable name after '$'".to_string());
    }
    Ok((name.to_string(), &s[end..]))
}

fn valid_ident(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c)) && chars.all(is_ident_char)
}

fn parse_predicate(s: &str) -> Result<Predicate, String> {
    if s.is_empty() {
        return Err("missing condition".to_string());
    }
    let (name, rest) = var_ref(s.trim())?;
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(Predicate::IsSet(name));
    }

    let (negate, operand) = if let Some(op) = rest.strip_prefix("==") {
        (false, op)
    } else if let Some(op) = rest.strip_prefix("!=") {
        (true, op)
    } else {
        return Err(format!("expected '==' or '!=' after ${name}, found '{rest}'"));
    };
    let value = quoted(operand.trim())?;

    Ok(match (negate, value.is_empty()) {
        (true, true) => Predicate::IsSet(name),
        (true, false) => Predicate::NotEquals(name, value),
        (false, _) => Predicate::Equals(name, value),
    })
}

fn quoted(s: &str) -> Result<String, String> {
    let quote = match s.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(format!("expected a quoted value, found '{s}'")),
    };
    let body = &s[1..];
    let close = body
        .find(quote)
        .ok_or_else(|| format!("unterminated string {s}"))?;
    if !body[close + 1..].trim().is_empty() {
        return Err(format!("unexpected text after {s}"));
    }
    Ok(body[..close].to_string())
}

fn parse_line(raw: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let next = tail[1..].chars().next();
        match next {
            Some('$') => {
                literal.push('$');
                rest = &tail[2..];
            }
            Some(c) if c == '{' || is_ident_start(c) => {
                let (name, remainder) = var_ref(tail)?;
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Var(name));
                rest = remainder;
            }
            _ => {
                literal.push('$');
                rest = &tail[1..];
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
