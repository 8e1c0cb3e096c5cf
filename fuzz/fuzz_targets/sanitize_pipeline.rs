#![no_main]

use libfuzzer_sys::fuzz_target;
use sanitize::HtmlSanitizer;

const MAX_INPUT_BYTES: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_BYTES {
        return;
    }
    let input = String::from_utf8_lossy(data);
    let sanitizer = HtmlSanitizer::default();

    let tree = html::parse(&input);
    let clean = match sanitizer.clean_tree(tree) {
        Ok(Some(tree)) => html::to_html(&tree),
        Ok(None) => panic!("document root was dropped"),
        Err(err) => panic!("document root rejected: {err}"),
    };
    assert!(
        !clean.to_ascii_lowercase().contains("<script"),
        "script tag survived sanitizing: {clean:?}"
    );
});
