//! Lowers the template AST into a [`Matcher`] tree.
//!
//! One matcher per tag pattern, hung under a synthetic root. The `class`
//! attribute is special-cased in both directions: as a filter it is a
//! set-membership test over whitespace-split tokens, as a capture it fetches
//! the full literal attribute string. Validation that the tokenizer cannot
//! express ends here, reported through the same [`PatternSyntaxError`]
//! taxonomy as every other compile failure.

use crate::ast::{Attribute, OpenTag};
use crate::diagnostics::PatternSyntaxError;
use crate::engine::{Extractor, Fetch, Filter, Matcher};
use crate::syntax;
use crate::trace::SyntaxTracer;

/// Compiles a template into a reusable matcher tree.
pub fn compile(template: &str) -> Result<Matcher, PatternSyntaxError> {
    syntax::parse(template)
        .and_then(|tags| lower(&tags))
        .map_err(|e| e.with_source("template", template.to_string()))
}

/// Same as [`compile`], with an observer on the tokenizer.
pub fn compile_with_tracer(
    template: &str,
    tracer: &dyn SyntaxTracer,
) -> Result<Matcher, PatternSyntaxError> {
    syntax::parser::parse_with_tracer(template, tracer)
        .and_then(|tags| lower(&tags))
        .map_err(|e| e.with_source("template", template.to_string()))
}

fn lower(tags: &[OpenTag]) -> Result<Matcher, PatternSyntaxError> {
    let mut root = Matcher::new();
    for tag in tags {
        let matcher = lower_tag(tag)?;
        // a pattern contributing neither filters nor extractors matches
        // nothing and extracts nothing; drop it
        if !matcher.is_empty() {
            root.children.push(matcher);
        }
    }
    Ok(root)
}

fn lower_tag(tag: &OpenTag) -> Result<Matcher, PatternSyntaxError> {
    let mut matcher = Matcher::new();

    if let Some(name) = &tag.name {
        matcher.filters.push(Filter::TagName(name.to_string()));
    }

    for attr in &tag.attributes {
        if let Some(capture) = &attr.capture {
            if !capture.is_valid() {
                return Err(PatternSyntaxError::new(
                    format!("invalid capture identifier \"{}\"", capture),
                    attr.pos,
                    attr.span,
                ));
            }
            let fetch = if attr.name.as_str() == "class" {
                Fetch::ClassAttribute
            } else {
                Fetch::Attribute(attr.name.to_string())
            };
            matcher.extractors.push(Extractor {
                key: capture.to_string(),
                fetch,
            });
        }

        if let Some(value) = &attr.value {
            matcher.filters.push(lower_value_filter(attr, value)?);
        }
    }

    Ok(matcher)
}

fn lower_value_filter(attr: &Attribute, value: &str) -> Result<Filter, PatternSyntaxError> {
    if attr.name.as_str() == "class" {
        let tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(nothing_to_match(attr));
        }
        Ok(Filter::HasClasses(tokens))
    } else {
        if value.trim().is_empty() {
            return Err(nothing_to_match(attr));
        }
        Ok(Filter::AttributeEquals {
            name: attr.name.to_string(),
            value: value.to_string(),
        })
    }
}

fn nothing_to_match(attr: &Attribute) -> PatternSyntaxError {
    PatternSyntaxError::new(
        format!("nothing to match for \"{}\" attribute", attr.name),
        attr.pos,
        attr.span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_template_compiles_to_a_bare_root() {
        let root = compile("").unwrap();
        assert!(root.is_empty());
        assert!(!root.has_children());
    }

    #[test]
    fn unconstrained_wildcards_are_compiled_out() {
        let root = compile("<# alt />").unwrap();
        assert!(!root.has_children());
    }

    #[test]
    fn tag_name_and_value_become_filters() {
        let root = compile("<img id='1' class='a b' />").unwrap();
        let matcher = &root.children[0];
        assert_eq!(
            matcher.filters,
            vec![
                Filter::TagName("img".into()),
                Filter::AttributeEquals {
                    name: "id".into(),
                    value: "1".into(),
                },
                Filter::HasClasses(vec!["a".into(), "b".into()]),
            ]
        );
        assert!(matcher.extractors.is_empty());
    }

    #[test]
    fn captures_become_extractors_with_dotted_keys() {
        let root = compile("<a href:{link.target} class:{css} />").unwrap();
        let matcher = &root.children[0];
        assert_eq!(
            matcher.extractors,
            vec![
                Extractor {
                    key: "link.target".into(),
                    fetch: Fetch::Attribute("href".into()),
                },
                Extractor {
                    key: "css".into(),
                    fetch: Fetch::ClassAttribute,
                },
            ]
        );
    }

    #[test]
    fn trailing_dot_capture_is_rejected_not_truncated() {
        let err = compile("<a href:{root.name.} />").unwrap_err();
        assert_eq!(err.message, r#"invalid capture identifier "root.name.""#);
    }

    #[test]
    fn empty_filter_values_are_rejected() {
        let err = compile("<img class='   ' />").unwrap_err();
        assert_eq!(err.message, r#"nothing to match for "class" attribute"#);

        let err = compile("<img id='' />").unwrap_err();
        assert_eq!(err.message, r#"nothing to match for "id" attribute"#);
    }

    #[test]
    fn compiling_twice_yields_identical_matchers() {
        let template = "<# id='1' class:{classes} />";
        assert_eq!(compile(template).unwrap(), compile(template).unwrap());
    }

    #[test]
    fn each_tag_becomes_a_sibling_matcher() {
        let root = compile("<img src:{s} /> <a href:{h} />").unwrap();
        assert_eq!(root.children.len(), 2);
    }
}
