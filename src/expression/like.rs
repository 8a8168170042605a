// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ExpressionError;
use crate::record::Value;
use regex::RegexBuilder;

/// SQL `LIKE`: `%` is any run, `_` any single char, `\%`/`\_` are literal.
/// A backslash at the end of the pattern matches itself.
/// Case-insensitive full match. A null on either side never matches.
pub(crate) fn like(value: &Value, pattern: &Value) -> Result<bool, ExpressionError> {
    let (Some(text), Some(pattern)) = (value.to_text(), pattern.to_text()) else {
        return Ok(false);
    };

    let regex = RegexBuilder::new(&like_to_regex(&pattern))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| ExpressionError::malformed(&pattern, e.to_string()))?;

    Ok(regex.is_match(&text))
}

fn like_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            escaped = false;
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            continue;
        }
        match c {
            '\\' => escaped = true,
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    // A trailing lone backslash is a literal.
    if escaped {
        out.push_str(r"\\");
    }

    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: &str, pattern: &str) -> bool {
        like(&Value::from(value), &Value::from(pattern)).unwrap()
    }

    #[test]
    fn test_like_table() {
        struct TestCase {
            value: &'static str,
            pattern: &'static str,
            expected: bool,
        }

        let cases = vec![
            TestCase { value: "John", pattern: "%oh%", expected: true },
            TestCase { value: "JOHN", pattern: "%oh%", expected: true },
            TestCase { value: "John", pattern: "oh", expected: false },
            TestCase { value: "John", pattern: "J_hn", expected: true },
            TestCase { value: "John", pattern: "J_n", expected: false },
            TestCase { value: "50%", pattern: "50\\%", expected: true },
            TestCase { value: "500", pattern: "50\\%", expected: false },
            TestCase { value: "a_b", pattern: "a\\_b", expected: true },
            TestCase { value: "axb", pattern: "a\\_b", expected: false },
            TestCase { value: "a.b", pattern: "a.b", expected: true },
            TestCase { value: "axb", pattern: "a.b", expected: false },
            TestCase { value: "(x)+[y]", pattern: "(x)+[y]", expected: true },
            TestCase { value: "line1\nline2", pattern: "line1%", expected: true },
            TestCase { value: "", pattern: "%", expected: true },
            TestCase { value: "C:\\", pattern: "C:\\", expected: true },
            TestCase { value: "C:", pattern: "C:\\", expected: false },
            TestCase { value: "a\\b", pattern: "a\\\\b", expected: true },
        ];

        for case in cases {
            assert_eq!(
                check(case.value, case.pattern),
                case.expected,
                "{:?} LIKE {:?}",
                case.value,
                case.pattern
            );
        }
    }

    #[test]
    fn test_like_null_never_matches() {
        assert!(!like(&Value::Null, &Value::from("%")).unwrap());
        assert!(!like(&Value::from("x"), &Value::Null).unwrap());
    }

    #[test]
    fn test_like_non_string_value_uses_text() {
        assert!(like(&Value::Integer(12345), &Value::from("123%")).unwrap());
    }
}
