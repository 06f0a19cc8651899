// tests/syntax_tests.rs

use std::cell::Cell;

use tmst::ast::Identifier;
use tmst::diagnostics::Position;
use tmst::syntax::parse;
use tmst::syntax::tokenizer::Token;
use tmst::trace::SyntaxTracer;

#[test]
fn valid_templates_parse() {
    let cases = vec![
        "",
        "   \n\t  ",
        "<img />",
        "<# />",
        "<# id='1' class:{classes} />",
        "<a href:{link} class=\"nav active\" />",
        "<img src:{pics.thumb}='cdn' />",
        "<img src:{s} />\n<a href:{h} />",
        "<input name:{.field} />",
    ];
    for template in cases {
        let result = parse(template);
        assert!(result.is_ok(), "should parse: {template:?}: {result:?}");
    }
}

#[test]
fn malformed_templates_are_rejected() {
    let cases = vec![
        "plain text",
        "<",
        "<1tag />",
        "<img",
        "<img/>",
        "<img src='x'",
        "<img src='unterminated />",
        "<img :{x} />",
        "<img id:name />",
        "<img id:{} />",
        "<img id:{a}{b} />",
        "<img / >",
        "<tag></tag>",
    ];
    for template in cases {
        assert!(parse(template).is_err(), "should reject: {template:?}");
    }
}

#[test]
fn wildcard_and_named_tags() {
    let tags = parse("<# alt:{a} />\n<img src:{s} />").unwrap();
    assert_eq!(tags[0].name, None);
    assert_eq!(tags[1].name, Some(Identifier::new("img")));
    assert!(tags.iter().all(|t| t.auto_close));
}

#[test]
fn whitespace_before_capture_is_cited_at_the_space() {
    let err = parse("<img id :{name} />").unwrap_err();
    assert_eq!(
        err.message,
        "unexpected whitespace between attribute identifier and capture identifier"
    );
    assert_eq!(err.pos, Position::new(0, 7));
}

#[test]
fn non_self_closing_pattern_is_a_syntax_error() {
    let err = parse("<# id='1' class:{classes}></>").unwrap_err();
    assert_eq!(err.message, "only self-closing tag patterns are supported");
}

#[test]
fn error_positions_land_on_the_offending_character() {
    let err = parse("<img\n  1bad />").unwrap_err();
    assert_eq!(err.message, "expected attribute id, not '1'");
    // the newline itself occupies column 0 of the new line
    assert_eq!(err.pos, Position::new(1, 3));
}

#[test]
fn multiline_templates_track_lines() {
    let err = parse("<img src:{s} />\n<a href='x'\n<b />").unwrap_err();
    assert_eq!(err.pos.line, 2);
}

#[derive(Default)]
struct CountingTracer {
    reads: Cell<usize>,
    tokens: Cell<usize>,
}

impl SyntaxTracer for CountingTracer {
    fn read(&self, _pos: Position, _c: Option<char>, _was_frozen: bool) {
        self.reads.set(self.reads.get() + 1);
    }

    fn token(&self, _token: &Token) {
        self.tokens.set(self.tokens.get() + 1);
    }
}

#[test]
fn tracer_observes_reads_and_tokens() {
    let tracer = CountingTracer::default();
    let tags = tmst::syntax::parser::parse_with_tracer("<img src:{s} />", &tracer).unwrap();
    assert_eq!(tags.len(), 1);
    // one OpenTagStart, one AttributeName, one AttributeCapture, one close
    assert_eq!(tracer.tokens.get(), 4);
    assert!(tracer.reads.get() >= "<img src:{s} />".len());
}
