//! Keystroke Injector
//!
//! Computes the field snapshot that results from pressing one on-screen key.

use serde::Deserialize;

use super::focus::{FocusRegistry, FocusTarget};

pub const DELETE_LABEL: &str = "⌫";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySymbol {
    Char(char),
    DeleteBackward,
}

impl KeySymbol {
    pub fn label(&self) -> String {
        match self {
            Self::Char(' ') => "space".to_string(),
            Self::Char(c) => c.to_string(),
            Self::DeleteBackward => DELETE_LABEL.to_string(),
        }
    }
}

/// What a literal key does to an active range selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPolicy {
    /// The character replaces the selected range
    #[default]
    ReplaceSelection,
    /// The character lands after the selection end and the range survives
    AfterSelection,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeystrokeInjector {
    policy: InsertPolicy,
}

impl KeystrokeInjector {
    pub fn new(policy: InsertPolicy) -> Self {
        Self { policy }
    }

    /// New snapshot for `target` after `key`, or `None` when nothing is focused
    pub fn apply(&self, target: Option<&FocusTarget>, key: KeySymbol) -> Option<FocusTarget> {
        let target = target?;
        let (start, end) = target.selection();
        let value = target.value.as_str();

        let (new_value, caret) = match key {
            KeySymbol::DeleteBackward if !target.is_collapsed() => (splice(value, start, end, ""), start),
            KeySymbol::DeleteBackward if start > 0 => (splice(value, start - 1, end, ""), start - 1),
            KeySymbol::DeleteBackward => (value.to_string(), start),
            KeySymbol::Char(c) => {
                let mut buf = [0u8; 4];
                let text = c.encode_utf8(&mut buf);
                match self.policy {
                    InsertPolicy::ReplaceSelection => (splice(value, start, end, text), start + 1),
                    InsertPolicy::AfterSelection => (splice(value, end, end, text), end + 1),
                }
            }
        };

        Some(FocusTarget::caret(target.field, new_value, caret))
    }

    /// Applies `key` to the registry's current target and publishes the result.
    /// Returns false when nothing was engaged.
    pub fn inject(&self, registry: &FocusRegistry, key: KeySymbol) -> bool {
        let current = registry.get();
        let Some(next) = self.apply(current.as_ref(), key) else {
            return false;
        };
        tracing::debug!(field = ?next.field, key = %key.label(), caret = next.selection_start, "key injected");
        registry.set(Some(next));
        true
    }
}

/// Byte index of the `char_idx`-th character, clamped to the end
pub fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}

/// `s[..from] + insert + s[to..]` over character offsets
pub fn splice(s: &str, from: usize, to: usize, insert: &str) -> String {
    let a = byte_offset(s, from);
    let b = byte_offset(s, to.max(from));
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..a]);
    out.push_str(insert);
    out.push_str(&s[b..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::FieldId;
    use proptest::prelude::*;

    fn field(value: &str, start: usize, end: usize) -> FocusTarget {
        FocusTarget::new(FieldId::NewTodo, value, start, end)
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn join(parts: &[&[char]]) -> String {
        parts.iter().flat_map(|p| p.iter()).collect()
    }

    #[test]
    fn test_no_target_is_noop() {
        let injector = KeystrokeInjector::default();
        assert!(injector.apply(None, KeySymbol::Char('a')).is_none());

        let registry = FocusRegistry::new();
        assert!(!injector.inject(&registry, KeySymbol::DeleteBackward));
        assert!(registry.get().is_none());
    }

    #[test]
    fn test_type_hi_then_delete() {
        let injector = KeystrokeInjector::default();
        let registry = FocusRegistry::new();
        registry.set(Some(field("", 0, 0)));

        injector.inject(&registry, KeySymbol::Char('h'));
        injector.inject(&registry, KeySymbol::Char('i'));
        let target = registry.get().unwrap();
        assert_eq!(target.value, "hi");
        assert_eq!(target.selection(), (2, 2));

        injector.inject(&registry, KeySymbol::DeleteBackward);
        let target = registry.get().unwrap();
        assert_eq!(target.value, "h");
        assert_eq!(target.selection(), (1, 1));
    }

    #[test]
    fn test_delete_range_selection() {
        let injector = KeystrokeInjector::default();
        let out = injector.apply(Some(&field("hi there", 0, 2)), KeySymbol::DeleteBackward).unwrap();
        assert_eq!(out.value, " there");
        assert_eq!(out.selection(), (0, 0));
    }

    #[test]
    fn test_delete_at_start_is_noop() {
        let injector = KeystrokeInjector::default();
        let out = injector.apply(Some(&field("abc", 0, 0)), KeySymbol::DeleteBackward).unwrap();
        assert_eq!(out.value, "abc");
        assert_eq!(out.selection(), (0, 0));
    }

    #[test]
    fn test_insert_replaces_selection_by_default() {
        let injector = KeystrokeInjector::default();
        let out = injector.apply(Some(&field("hello", 1, 4)), KeySymbol::Char('X')).unwrap();
        assert_eq!(out.value, "hXo");
        assert_eq!(out.selection(), (2, 2));
    }

    #[test]
    fn test_insert_after_selection_policy() {
        let injector = KeystrokeInjector::new(InsertPolicy::AfterSelection);
        let out = injector.apply(Some(&field("hello", 1, 4)), KeySymbol::Char('X')).unwrap();
        assert_eq!(out.value, "hellXo");
        assert_eq!(out.selection(), (5, 5));
    }

    #[test]
    fn test_offsets_are_clamped() {
        let injector = KeystrokeInjector::default();
        let out = injector.apply(Some(&field("ab", 10, 10)), KeySymbol::Char('c')).unwrap();
        assert_eq!(out.value, "abc");
        assert_eq!(out.selection(), (3, 3));
    }

    #[test]
    fn test_multibyte_characters() {
        let injector = KeystrokeInjector::default();
        let out = injector.apply(Some(&field("café", 4, 4)), KeySymbol::DeleteBackward).unwrap();
        assert_eq!(out.value, "caf");
        let out = injector.apply(Some(&field("naïve", 2, 2)), KeySymbol::Char('ß')).unwrap();
        assert_eq!(out.value, "naßïve");
        assert_eq!(out.selection(), (3, 3));
    }

    #[test]
    fn test_result_keeps_field_identity() {
        let injector = KeystrokeInjector::default();
        let target = FocusTarget::caret(FieldId::EditTodo, "x", 1);
        let out = injector.apply(Some(&target), KeySymbol::Char('y')).unwrap();
        assert_eq!(out.field, FieldId::EditTodo);
    }

    proptest! {
        #[test]
        fn prop_collapsed_insert(value in "[a-z ]{0,16}", idx in 0usize..32, k in proptest::char::range('a', 'z')) {
            let v = chars(&value);
            let c = idx % (v.len() + 1);
            let out = KeystrokeInjector::default()
                .apply(Some(&field(&value, c, c)), KeySymbol::Char(k))
                .unwrap();
            prop_assert_eq!(out.value.clone(), join(&[&v[..c], &[k], &v[c..]]));
            prop_assert_eq!(out.selection(), (c + 1, c + 1));
        }

        #[test]
        fn prop_collapsed_backspace(value in "[a-zé]{1,16}", idx in 0usize..32) {
            let v = chars(&value);
            let c = 1 + idx % v.len();
            let out = KeystrokeInjector::default()
                .apply(Some(&field(&value, c, c)), KeySymbol::DeleteBackward)
                .unwrap();
            prop_assert_eq!(out.value.clone(), join(&[&v[..c - 1], &v[c..]]));
            prop_assert_eq!(out.selection(), (c - 1, c - 1));
        }

        #[test]
        fn prop_range_delete(value in "[a-z]{2,16}", a in 0usize..32, b in 0usize..32) {
            let v = chars(&value);
            let s = a % v.len();
            let e = s + 1 + b % (v.len() - s);
            let out = KeystrokeInjector::default()
                .apply(Some(&field(&value, s, e)), KeySymbol::DeleteBackward)
                .unwrap();
            prop_assert_eq!(out.value.clone(), join(&[&v[..s], &v[e..]]));
            prop_assert_eq!(out.selection(), (s, s));
        }

        #[test]
        fn prop_backspace_at_zero_is_noop(value in "[a-z]{0,16}") {
            let out = KeystrokeInjector::default()
                .apply(Some(&field(&value, 0, 0)), KeySymbol::DeleteBackward)
                .unwrap();
            prop_assert_eq!(out.value.clone(), value);
            prop_assert_eq!(out.selection(), (0, 0));
        }
    }
}
