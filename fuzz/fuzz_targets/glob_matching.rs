#![no_main]
use bllvm_module_loader::module::registry::{matches, translate, GlobPattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First line is the pattern, the rest is the path
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (pattern, path) = text.split_once('\n').unwrap_or((text, ""));

    let expression = translate(pattern);
    assert!(expression.starts_with('^') && expression.ends_with('$'));

    // Compiled and one-shot matching must agree
    if let Ok(glob) = GlobPattern::new(pattern) {
        assert_eq!(glob.is_match(path), matches(path, pattern));
    }

    // A pattern without metacharacters matches exactly itself
    if !pattern.contains(|c| matches!(c, '*' | '?' | '{' | '}' | ','))
        && GlobPattern::new(pattern).is_ok()
    {
        assert!(matches(pattern, pattern));
    }
});
