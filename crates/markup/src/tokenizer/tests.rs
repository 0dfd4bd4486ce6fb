use super::tokenize;
use crate::context::{ParseContext, TokenizerConfig};
use crate::error::SyntaxErrorCode;
use crate::token_fmt::format_tokens;

fn tokens_fmt(text: &str) -> Vec<String> {
    let mut ctx = ParseContext::new();
    let tokens = tokenize(&mut ctx, text)
        .unwrap_or_else(|err| panic!("tokenize({text:?}) failed: {err}"));
    format_tokens(tokens)
}

fn error_of(text: &str) -> (SyntaxErrorCode, usize) {
    let mut ctx = ParseContext::new();
    match tokenize(&mut ctx, text) {
        Ok(tokens) => panic!("expected error for {text:?}, got: {tokens:?}"),
        Err(err) => (err.code, err.position),
    }
}

#[test]
fn plain_text_is_one_token() {
    assert_eq!(tokens_fmt("Hello\nworld"), vec![r#"Text("Hello\nworld")"#]);
    assert!(tokens_fmt("").is_empty(), "empty input has no tokens");
}

#[test]
fn begin_and_end_tags_carry_positions() {
    assert_eq!(
        tokens_fmt("Hello <b>World</b>!"),
        vec![
            r#"Text("Hello ")"#,
            "BeginTag(b @6 children=1 attrs=0)",
            r#"Text("World")"#,
            "EndTag(b @14)",
            r#"Text("!")"#,
        ]
    );
}

#[test]
fn positions_are_byte_offsets() {
    assert_eq!(
        tokens_fmt("日本<b>語</b>"),
        vec![
            r#"Text("日本")"#,
            "BeginTag(b @6 children=1 attrs=0)",
            r#"Text("語")"#,
            "EndTag(b @12)",
        ]
    );
}

#[test]
fn attributes_keep_order_and_quotes() {
    assert_eq!(
        tokens_fmt(r#"<font size='20' color = "red">x</font>"#),
        vec![
            "BeginTag(font @0 children=1 attrs=2)",
            "Key(size)",
            r#"Value("20")"#,
            "Key(color)",
            r#"Value("red")"#,
            r#"Text("x")"#,
            "EndTag(font @31)",
        ]
    );
}

#[test]
fn shorthand_value_synthesizes_value_key() {
    assert_eq!(
        tokens_fmt("<color = '#ff0000'>x</color>"),
        vec![
            "BeginTag(color @0 children=1 attrs=1)",
            "Key(Value)",
            r##"Value("#ff0000")"##,
            r#"Text("x")"#,
            "EndTag(color @20)",
        ]
    );
}

#[test]
fn shorthand_is_rejected_after_an_attribute() {
    assert_eq!(
        error_of("<a b='1'='2'>"),
        (SyntaxErrorCode::UnexpectedCharacter, 8)
    );
}

#[test]
fn self_closing_tag_emits_synthetic_end_tag() {
    assert_eq!(
        tokens_fmt("<img src='a.png' />"),
        vec![
            "BeginTag(img @0 children=0 attrs=1)",
            "Key(src)",
            r#"Value("a.png")"#,
            "EndTag(img @0 empty)",
        ]
    );
    assert_eq!(
        tokens_fmt("<br/>"),
        vec!["BeginTag(br @0 children=0 attrs=0)", "EndTag(br @0 empty)"]
    );
}

#[test]
fn quote_escapes_are_unescaped() {
    assert_eq!(
        tokens_fmt(r#"<ruby rt='it\'s' color="\"q\"">x</ruby>"#)[2],
        r#"Value("it's")"#
    );
    assert_eq!(
        tokens_fmt(r#"<ruby rt='it\'s' color="\"q\"">x</ruby>"#)[4],
        r#"Value("\"q\"")"#
    );
}

#[test]
fn other_escapes_are_errors_at_backslash() {
    assert_eq!(
        error_of(r"<a v='x\n'>"),
        (SyntaxErrorCode::InvalidEscape, 7)
    );
}

#[test]
fn character_references_become_separate_text_tokens() {
    assert_eq!(
        tokens_fmt("a&lt;b&#x41;&#66;"),
        vec![
            r#"Text("a")"#,
            r#"Text("<")"#,
            r#"Text("b")"#,
            r#"Text("A")"#,
            r#"Text("B")"#,
        ]
    );
}

#[test]
fn soft_hyphen_and_bad_numeric_references_emit_nothing() {
    assert_eq!(
        tokens_fmt("a&shy;b&#xD800;c"),
        vec![r#"Text("a")"#, r#"Text("b")"#, r#"Text("c")"#]
    );
}

#[test]
fn reference_errors_point_at_ampersand() {
    assert_eq!(
        error_of("x&amp"),
        (SyntaxErrorCode::UnterminatedCharacterReference, 1)
    );
    assert_eq!(
        error_of("a & b;"),
        (SyntaxErrorCode::UnterminatedCharacterReference, 2)
    );
    assert_eq!(error_of("&;"), (SyntaxErrorCode::EmptyCharacterReference, 0));
    assert_eq!(
        error_of("ab&nbsp;"),
        (SyntaxErrorCode::UnknownCharacterReference, 2)
    );
}

#[test]
fn reference_length_limit_follows_config() {
    let long_body = "a".repeat(33);
    assert_eq!(
        error_of(&format!("&{long_body};")),
        (SyntaxErrorCode::UnterminatedCharacterReference, 0)
    );

    let mut ctx = ParseContext::with_config(TokenizerConfig {
        max_character_reference_len: 3,
        ..TokenizerConfig::default()
    });
    let err = tokenize(&mut ctx, "&quot;").expect_err("body longer than limit");
    assert_eq!(err.code, SyntaxErrorCode::UnterminatedCharacterReference);
    assert!(tokenize(&mut ctx, "&amp;").is_ok());
}

#[test]
fn unterminated_constructs_point_at_their_opening_byte() {
    assert_eq!(error_of("<b"), (SyntaxErrorCode::UnterminatedTag, 0));
    assert_eq!(error_of("ab<b x='1'"), (SyntaxErrorCode::UnterminatedTag, 2));
    assert_eq!(error_of("<b x"), (SyntaxErrorCode::UnterminatedAttribute, 0));
    assert_eq!(
        error_of("<b x='1"),
        (SyntaxErrorCode::UnterminatedAttributeValue, 0)
    );
    assert_eq!(error_of("a</b"), (SyntaxErrorCode::UnterminatedEndTag, 1));
}

#[test]
fn malformed_tags_are_errors() {
    assert_eq!(error_of("<>"), (SyntaxErrorCode::MissingTagName, 1));
    assert_eq!(error_of("<1>"), (SyntaxErrorCode::MissingTagName, 1));
    assert_eq!(
        error_of("<a v>"),
        (SyntaxErrorCode::MissingAttributeAssignment, 4)
    );
    assert_eq!(error_of("<a v=x>"), (SyntaxErrorCode::MissingQuote, 5));
    assert_eq!(error_of("<a !>"), (SyntaxErrorCode::UnexpectedCharacter, 3));
    assert_eq!(error_of("<a/ >"), (SyntaxErrorCode::UnexpectedCharacter, 2));
}

#[test]
fn annotation_counts_direct_children_and_attributes() {
    let mut ctx = ParseContext::new();
    let tokens = tokenize(&mut ctx, "<r a='1' b='2'>x<i>y</i>z</r>w").expect("tokenize");
    assert_eq!(
        format_tokens(tokens)[0],
        "BeginTag(r @0 children=3 attrs=2)"
    );
    assert_eq!(ctx.root_children(), 2);
}

#[test]
fn context_is_reusable_across_parses() {
    let mut ctx = ParseContext::new();
    tokenize(&mut ctx, "<b>one</b>").expect("first");
    let second = format_tokens(tokenize(&mut ctx, "two").expect("second"));
    assert_eq!(second, vec![r#"Text("two")"#]);
    assert!(tokenize(&mut ctx, "<b").is_err());

    let stats = ctx.stats();
    assert_eq!(stats.parses, 3);
    assert_eq!(stats.failures, 1);
    assert!(stats.mode_transitions > 0, "got: {stats:?}");
}
