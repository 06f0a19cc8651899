// tests/capture_tests.rs
//
// End-to-end scenarios: compile a template, match it against a hand-built
// document tree, check the captures.

use tmst::document::TreeElement;
use tmst::engine::TraversalPolicy;
use tmst::{compile, CaptureMap};

fn img_page() -> TreeElement {
    TreeElement::new("html").child(
        TreeElement::new("body")
            .child(TreeElement::new("img").attr("id", "1").attr("class", "target")),
    )
}

#[test]
fn empty_template_captures_nothing_from_any_document() {
    let root = compile("").unwrap();
    assert!(root.capture_from(&img_page()).is_empty());
    assert!(root.capture_from(&TreeElement::new("html")).is_empty());
    assert!(root.records_from(&img_page()).is_empty());
}

#[test]
fn filters_without_captures_return_an_empty_mapping() {
    let root = compile("<img id='1' class='target' />").unwrap();
    assert_eq!(root.capture_from(&img_page()), CaptureMap::new());
}

#[test]
fn captures_attribute_on_any_tag() {
    let root = compile("<# id='1' class:{classes} />").unwrap();
    let result = root.capture_from(&img_page());
    assert_eq!(result.get("classes"), Some(&[Some("target".into())][..]));
    assert_eq!(result.len(), 1);
}

#[test]
fn no_match_in_an_empty_page() {
    let root = compile("<# id='1' class:{classes} />").unwrap();
    let result = root.capture_from(&TreeElement::new("html"));
    assert!(result.is_empty());
    assert!(root.records_from(&TreeElement::new("html")).is_empty());
}

#[test]
fn multiple_matches_append_in_document_order() {
    let doc = TreeElement::new("html").child(
        TreeElement::new("body")
            .child(TreeElement::new("img").attr("class", "a"))
            .child(TreeElement::new("img").attr("class", "b")),
    );
    let root = compile("<img class:{c} />").unwrap();
    let result = root.capture_from(&doc);
    assert_eq!(
        result.get("c"),
        Some(&[Some("a".into()), Some("b".into())][..])
    );
}

#[test]
fn missing_attribute_on_a_match_yields_null_not_a_skip() {
    let doc = TreeElement::new("html")
        .child(TreeElement::new("img").attr("alt", "x"))
        .child(TreeElement::new("img"));
    let root = compile("<img alt:{alt} />").unwrap();
    let json = serde_json::to_string(&root.capture_from(&doc)).unwrap();
    assert_eq!(json, r#"{"alt":["x",null]}"#);
}

#[test]
fn class_capture_takes_the_whole_attribute_string() {
    let doc = TreeElement::new("html")
        .child(TreeElement::new("div").attr("class", "alpha beta  gamma"));
    let root = compile("<div class:{css}='alpha' />").unwrap();
    let result = root.capture_from(&doc);
    assert_eq!(
        result.get("css"),
        Some(&[Some("alpha beta  gamma".into())][..])
    );
}

#[test]
fn class_filter_matches_on_token_membership() {
    let doc = TreeElement::new("html")
        .child(TreeElement::new("a").attr("class", "nav active").attr("href", "/a"))
        .child(TreeElement::new("a").attr("class", "nav").attr("href", "/b"));
    let root = compile("<a class='active nav' href:{h} />").unwrap();
    let result = root.capture_from(&doc);
    assert_eq!(result.get("h"), Some(&[Some("/a".into())][..]));
}

#[test]
fn same_template_compiled_twice_behaves_identically() {
    let template = "<# id='1' class:{classes} />";
    let first = compile(template).unwrap();
    let second = compile(template).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.capture_from(&img_page()),
        second.capture_from(&img_page())
    );
}

#[test]
fn non_self_closing_template_never_reaches_matching() {
    let err = compile("<# id='1' class:{classes}></>").unwrap_err();
    assert_eq!(err.message, "only self-closing tag patterns are supported");
}

#[test]
fn sibling_patterns_fill_separate_keys() {
    let doc = TreeElement::new("html").child(
        TreeElement::new("body")
            .child(TreeElement::new("img").attr("src", "pic.png"))
            .child(TreeElement::new("a").attr("href", "/home")),
    );
    let root = compile("<img src:{src} />\n<a href:{href} />").unwrap();
    let result = root.capture_from(&doc);
    assert_eq!(result.get("src"), Some(&[Some("pic.png".into())][..]));
    assert_eq!(result.get("href"), Some(&[Some("/home".into())][..]));
}

#[test]
fn dotted_capture_paths_render_as_dotted_keys() {
    let doc = TreeElement::new("html")
        .child(TreeElement::new("img").attr("src", "x.png"));
    let root = compile("<img src:{page.image} />").unwrap();
    let result = root.capture_from(&doc);
    assert_eq!(result.get("page.image"), Some(&[Some("x.png".into())][..]));
}

#[test]
fn prune_policy_stops_at_the_first_match_per_branch() {
    let doc = TreeElement::new("html").child(
        TreeElement::new("div")
            .attr("class", "card")
            .attr("id", "outer")
            .child(
                TreeElement::new("div")
                    .attr("class", "card")
                    .attr("id", "inner"),
            ),
    );
    let root = compile("<div class='card' id:{id} />").unwrap();

    let everywhere = root.capture_with_policy(&doc, TraversalPolicy::MatchEverywhere);
    assert_eq!(
        everywhere.get("id"),
        Some(&[Some("outer".into()), Some("inner".into())][..])
    );

    let pruned = root.capture_with_policy(&doc, TraversalPolicy::FirstMatchPrunes);
    assert_eq!(pruned.get("id"), Some(&[Some("outer".into())][..]));
}

#[test]
fn records_shape_one_entry_per_matched_element() {
    let root = compile("<# id='1' class:{classes} />").unwrap();
    let records = root.records_from(&img_page());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].field("classes"), Some(&Some("target".into())));
    assert!(records[0].children.is_empty());

    let json = serde_json::to_string(&records).unwrap();
    assert_eq!(json, r#"[{"classes":"target"}]"#);
}

#[test]
fn matcher_is_shareable_across_documents() {
    let root = compile("<img src:{s} />").unwrap();
    let one = TreeElement::new("html").child(TreeElement::new("img").attr("src", "1"));
    let two = TreeElement::new("html").child(TreeElement::new("img").attr("src", "2"));
    assert_eq!(root.capture_from(&one).get("s"), Some(&[Some("1".into())][..]));
    assert_eq!(root.capture_from(&two).get("s"), Some(&[Some("2".into())][..]));
}
