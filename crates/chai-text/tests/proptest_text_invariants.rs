//! Property-based invariant tests for the ANSI-aware string operations.
//!
//! These hold for any input, including strings with embedded CSI/OSC
//! sequences and East-Asian wide characters:
//!
//! 1. Width stability: stripping escapes never changes the visible width.
//! 2. Truncation soundness: `truncate(s, n)` fits in `n` columns, and
//!    truncating to a string's own width is the identity.
//! 3. Pad idempotence: padding twice equals padding once.
//! 4. Wrap soundness: every wrapped line fits in the target width.
//! 5. Stripping is idempotent.

use chai_text::{pad_right, strip_ansi, truncate, visible_width, word_wrap};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Fragments mixing plain text, wide characters, long unbroken tokens
/// (to force hard-breaking), and escape sequences.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,12}",
        "[a-z]{12,30}",
        "[你好世界한글ｗ]{0,4}",
        Just("\x1b[1m".to_string()),
        Just("\x1b[0m".to_string()),
        Just("\x1b[38;2;125;80;200m".to_string()),
        Just("\x1b]2;title\x07".to_string()),
        Just("\x1b[2K".to_string()),
    ]
}

fn ansi_string() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..8).prop_map(|parts| parts.concat())
}

// ── 1. Width stability ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn width_stable_under_strip(s in ansi_string()) {
        prop_assert_eq!(visible_width(&s), visible_width(&strip_ansi(&s)));
    }
}

// ── 2. Truncation soundness ─────────────────────────────────────────────

proptest! {
    #[test]
    fn truncate_fits(s in ansi_string(), n in 0usize..40) {
        prop_assert!(visible_width(&truncate(&s, n)) <= n);
    }

    #[test]
    fn truncate_to_own_width_is_identity(s in ansi_string()) {
        let w = visible_width(&s);
        prop_assert_eq!(truncate(&s, w), s);
    }

    #[test]
    fn truncate_strips_no_visible_content_when_wide_enough(
        s in ansi_string(),
        extra in 1usize..10,
    ) {
        let w = visible_width(&s);
        let out = truncate(&s, w + extra);
        prop_assert_eq!(visible_width(&out), w);
    }
}

// ── 3. Pad idempotence ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn pad_right_idempotent(s in ansi_string(), n in 0usize..60) {
        let once = pad_right(&s, n);
        prop_assert_eq!(pad_right(&once, n), once);
    }

    #[test]
    fn pad_right_reaches_width(s in ansi_string(), n in 0usize..60) {
        let padded = pad_right(&s, n);
        prop_assert_eq!(visible_width(&padded), visible_width(&s).max(n));
    }
}

// ── 4. Wrap soundness ───────────────────────────────────────────────────

proptest! {
    // Width 2 lower bound: a single double-width character cannot be
    // broken below two columns, which is the one sanctioned exception.
    #[test]
    fn wrapped_lines_fit(s in ansi_string(), w in 2usize..30) {
        for line in word_wrap(&s, w).split('\n') {
            prop_assert!(
                visible_width(line) <= w,
                "line {:?} exceeds width {}",
                line,
                w
            );
        }
    }

    #[test]
    fn wrap_preserves_visible_text(s in "[a-z ]{0,40}", w in 1usize..30) {
        // Modulo whitespace dropped at break points, wrapped output keeps
        // the same non-space characters in order.
        let wrapped = word_wrap(&s, w);
        let squash = |t: &str| t.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(squash(&wrapped), squash(&s));
    }
}

// ── 5. Strip idempotence ────────────────────────────────────────────────

proptest! {
    #[test]
    fn strip_idempotent(s in ansi_string()) {
        let once = strip_ansi(&s).into_owned();
        prop_assert_eq!(strip_ansi(&once).into_owned(), once.clone());
    }
}
