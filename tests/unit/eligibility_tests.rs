/*!
 * Tests for the Markdown cell eligibility filter
 */

use ipynb_translator::translation::eligibility::{MIN_TRANSLATABLE_CHARS, is_translatable};

const SAMPLES: &[&str] = &[
    "",
    "   ",
    "# Title",
    "Short one",
    "This paragraph explains the experiment.",
    "```python\nx = 1\n```",
    "```\nunterminated fence with enough text",
    "$$E = mc^2$$",
    "$x$",
    "Let $x = 1$ ok",
    "Here is code:\n```bash\nls -la\n```\nand a long explanation after it.",
    "这是一个很长的中文句子用于测试过滤器",
];

/// Same input, same answer, for every flag combination
#[test]
fn test_is_translatable_withRepeatedCalls_shouldBeStable() {
    for text in SAMPLES {
        for (code, math) in [(true, true), (true, false), (false, true), (false, false)] {
            let first = is_translatable(text, code, math);
            for _ in 0..3 {
                assert_eq!(is_translatable(text, code, math), first, "unstable for {:?}", text);
            }
        }
    }
}

/// A lone fence is skipped, a fence plus a real sentence is not
#[test]
fn test_is_translatable_withFenceAndSentence_shouldKeepCell() {
    let fence = "```python\nprint('hi')\n```";
    assert!(!is_translatable(fence, true, true));

    let with_sentence = format!("{}\nThis is a test.", fence);
    assert_eq!("This is a test.".chars().count(), 15);
    assert!(is_translatable(&with_sentence, true, true));
}

/// The length threshold is strict and counts characters
#[test]
fn test_is_translatable_withThresholdLengths_shouldUseStrictCharCount() {
    let exactly = "a".repeat(MIN_TRANSLATABLE_CHARS);
    let one_more = "a".repeat(MIN_TRANSLATABLE_CHARS + 1);
    assert!(!is_translatable(&exactly, true, true));
    assert!(is_translatable(&one_more, true, true));

    // 11 CJK characters, far more than 10 bytes either way
    assert!(is_translatable("机器学习是人工智能的分支", true, true));
    assert!(!is_translatable("机器学习", true, true));
}

/// Inline math does not count toward the prose length
#[test]
fn test_is_translatable_withMostlyMath_shouldSkip() {
    assert!(!is_translatable("Let $x = 1$ ok", true, true));
    assert!(is_translatable("Let $x = 1$ ok", true, false));
    assert!(!is_translatable("$$\n\\int_0^1 x^2 dx\n$$", true, true));
    assert!(is_translatable("$$\n\\int_0^1 x^2 dx\n$$", true, false));
}

/// An unterminated fence is treated as ordinary text
#[test]
fn test_is_translatable_withUnterminatedFence_shouldKeepCell() {
    assert!(is_translatable("```\nunterminated fence with enough text", true, true));
}
