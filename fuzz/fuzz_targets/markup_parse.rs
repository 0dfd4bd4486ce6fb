#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Node, ParseContext, parse};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut ctx = ParseContext::new();
    match parse(&mut ctx, text) {
        Ok(tree) => {
            assert!(matches!(tree, Node::Document { .. }));
            // Text without markup characters must survive unchanged.
            if !text.contains(['<', '&', '>']) {
                assert_eq!(tree.text_content(), text);
            }
        }
        Err(err) => assert!(err.position <= text.len(), "{err}"),
    }
    // The context is reusable after any outcome.
    let _ = parse(&mut ctx, "a<b>b</b>");
    assert_eq!(ctx.stats().parses, 2);
});
