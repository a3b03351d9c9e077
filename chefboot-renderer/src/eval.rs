//! Template evaluation.

use chefboot_core::Context;

use crate::ast::{Node, Predicate, Segment, Template};
use crate::error::RenderError;

/// Render `template` against `ctx`.
///
/// Each emitted line ends with `\n`. A placeholder in an emitted line whose
/// variable is not set is a [`RenderError::MissingVariable`]; bodies that are
/// not emitted are never inspected.
pub fn render(template: &Template, ctx: &Context) -> Result<String, RenderError> {
    let mut out = String::new();
    render_nodes(&template.name, &template.nodes, ctx, &mut out)?;
    Ok(out)
}

fn render_nodes(
    name: &str,
    nodes: &[Node],
    ctx: &Context,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Line(segments) => {
                for seg in segments {
                    match seg {
                        Segment::Literal(text) => out.push_str(text),
                        Segment::Var(var) => {
                            let value =
                                ctx.get(var).ok_or_else(|| RenderError::MissingVariable {
                                    template: name.to_string(),
                                    name: var.clone(),
                                })?;
                            out.push_str(value);
                        }
                    }
                }
                out.push('\n');
            }
            Node::Conditional { branches, otherwise } => {
                let body = branches
                    .iter()
                    .find(|b| holds(&b.predicate, ctx))
                    .map(|b| b.body.as_slice())
                    .unwrap_or(otherwise.as_slice());
                render_nodes(name, body, ctx, out)?;
            }
        }
    }
    Ok(())
}

fn holds(predicate: &Predicate, ctx: &Context) -> bool {
    match predicate {
        Predicate::IsSet(var) => ctx.is_set(var),
        Predicate::Equals(var, value) => ctx.raw(var).unwrap_or("") == value,
        Predicate::NotEquals(var, value) => ctx.raw(var).unwrap_or("") != value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render_src(src: &str, pairs: &[(&str, &str)]) -> Result<String, RenderError> {
        let t = parse("test", src).expect("parse");
        render(&t, &Context::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn literal_lines_pass_through() {
        assert_eq!(render_src("a\n\nb", &[]).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn first_satisfied_branch_wins() {
        let src = "#if $a\nA $a\n#elif $b\nB $b\n#else\nC $c\n#end if\n";
        assert_eq!(render_src(src, &[("a", "1"), ("b", "2")]).unwrap(), "A 1\n");
        assert_eq!(render_src(src, &[("a", ""), ("b", "2")]).unwrap(), "B 2\n");
        assert_eq!(render_src(src, &[("c", "3")]).unwrap(), "C 3\n");
    }

    #[test]
    fn no_branch_and_no_else_emits_nothing() {
        assert_eq!(render_src("x\n#if $a\nA\n#end if\ny\n", &[]).unwrap(), "x\ny\n");
    }

    #[test]
    fn equality_treats_absent_as_empty() {
        let src = "#if $v == \"rhel7\"\nyes\n#end if\n#if $v != \"rhel7\"\nno\n#end if\n";
        assert_eq!(render_src(src, &[("v", "rhel7")]).unwrap(), "yes\n");
        assert_eq!(render_src(src, &[("v", "rhel6")]).unwrap(), "no\n");
        assert_eq!(render_src(src, &[]).unwrap(), "no\n");
        assert_eq!(render_src(src, &[("v", "RHEL7")]).unwrap(), "no\n");
    }

    #[test]
    fn missing_variable_in_emitted_line_is_an_error() {
        let err = render_src("#if $a\nok\n#else\nhttps://$server\n#end if\n", &[]).unwrap_err();
        assert!(
            matches!(err, RenderError::MissingVariable { ref name, .. } if name == "server"),
            "got {err:?}"
        );
        assert!(err.to_string().contains("'test'"));
    }

    #[test]
    fn placeholders_in_skipped_bodies_are_ignored() {
        assert_eq!(render_src("#if $a\n$missing\n#end if\n", &[]).unwrap(), "");
    }

    #[test]
    fn empty_value_counts_as_missing_in_placeholders() {
        assert!(render_src("x=$a\n", &[("a", "")]).is_err());
    }
}
