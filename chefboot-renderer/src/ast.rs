//! Template syntax tree.

/// A parsed template: a name (for error messages) and its top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub nodes: Vec<Node>,
}

/// One template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single output line.
    Line(Vec<Segment>),
    /// An `#if` / `#elif` / `#else` chain. At most one body is emitted.
    Conditional {
        branches: Vec<Branch>,
        otherwise: Vec<Node>,
    },
}

/// Part of an output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Var(String),
}

/// A guarded body inside a [`Node::Conditional`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub predicate: Predicate,
    pub body: Vec<Node>,
}

/// Condition on a context variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Variable is present and non-empty.
    IsSet(String),
    /// Variable (absent reads as empty) equals the literal exactly.
    Equals(String, String),
    NotEquals(String, String),
}

impl Predicate {
    /// Name of the variable this predicate inspects.
    pub fn variable(&self) -> &str {
        match self {
            Predicate::IsSet(v) | Predicate::Equals(v, _) | Predicate::NotEquals(v, _) => v,
        }
    }
}

impl Template {
    /// Every variable name referenced anywhere in the template, sorted and
    /// deduplicated.
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_vars(&self.nodes, &mut out);
        out.sort();
        out.dedup();
        out
    }
}

fn collect_vars(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Line(segments) => {
                for seg in segments {
                    if let Segment::Var(name) = seg {
                        out.push(name.clone());
                    }
                }
            }
            Node::Conditional { branches, otherwise } => {
                for b in branches {
                    out.push(b.predicate.variable().to_string());
                    collect_vars(&b.body, out);
                }
                collect_vars(otherwise, out);
            }
        }
    }
}
