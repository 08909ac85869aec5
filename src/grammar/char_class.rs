//! Character classes, the atomic leaf of the grammar algebra.
//!
//! A [`CharClass`] holds a regex class expression that accepts exactly one
//! character. Every literal is broken down into one class per character, so
//! the compilers only ever emit text that came through this module.
//!
//! ## Accepted forms
//!
//! - a bracket expression spanning the whole text: `[a-z]`, `[^"]`, `[[:alpha:]]`
//! - a perl class escape: `\s`, `\S`, `\d`, `\D`, `\w`, `\W`
//! - a unicode class escape: `\pL`, `\p{Greek}`, `\P{Greek}`
//! - an escaped punctuation character: `\.`, `\*`
//! - the dot: `.`
//!
//! Anything else is rejected at construction time, and so is a trailing
//! quantifier (`[a-z]*`), since the compilers add their own quantifiers.

use super::error::ConstructionError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Classes that grammar documents and callers can refer to by name.
static NAMED_CLASSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("whitespace", r"[\s]"),
        ("non-whitespace", r"[^\s]"),
        ("digit", "[0-9]"),
        ("alpha", "[[:alpha:]]"),
        ("alnum", "[[:alnum:]]"),
        ("word", r"[\w]"),
        ("any", r"[\s\S]"),
    ])
});

const QUANTIFIERS: [char; 4] = ['*', '?', '+', '{'];

/// A validated single-character class expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharClass {
    expr: String,
}

impl CharClass {
    /// Validate `expr` and wrap it.
    pub fn new(expr: &str) -> Result<Self, ConstructionError> {
        let atom_len = atom_len(expr)?;
        let rest = &expr[atom_len..];
        if let Some(c) = rest.chars().next() {
            if QUANTIFIERS.contains(&c) {
                return Err(ConstructionError::Quantifier {
                    expr: expr.to_string(),
                    quantifier: c,
                });
            }
            return Err(ConstructionError::NotAClass {
                expr: expr.to_string(),
            });
        }

        Regex::new(expr).map_err(|e| ConstructionError::Syntax {
            expr: expr.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            expr: expr.to_string(),
        })
    }

    /// The class accepting exactly `c`.
    pub fn literal(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self {
            expr: format!("[{}]", regex::escape(c.encode_utf8(&mut buf))),
        }
    }

    /// A class accepting any of the given characters.
    pub fn any_of(chars: &str) -> Result<Self, ConstructionError> {
        if chars.is_empty() {
            return Err(ConstructionError::EmptyClass);
        }
        Ok(Self {
            expr: format!("[{}]", escape_members(chars)),
        })
    }

    /// A class accepting any character except the given ones.
    pub fn none_of(chars: &str) -> Result<Self, ConstructionError> {
        if chars.is_empty() {
            return Err(ConstructionError::EmptyClass);
        }
        Ok(Self {
            expr: format!("[^{}]", escape_members(chars)),
        })
    }

    /// Look up a class by name (`whitespace`, `digit`, ...).
    pub fn named(name: &str) -> Result<Self, ConstructionError> {
        NAMED_CLASSES
            .get(name)
            .map(|expr| Self {
                expr: (*expr).to_string(),
            })
            .ok_or_else(|| ConstructionError::UnknownClassName(name.to_string()))
    }

    /// Any whitespace character.
    pub fn whitespace() -> Self {
        Self {
            expr: r"[\s]".to_string(),
        }
    }

    /// The class expression as it is emitted into derived patterns.
    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// Names accepted by [`CharClass::named`], sorted.
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = NAMED_CLASSES.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

fn escape_members(chars: &str) -> String {
    let mut buf = [0u8; 4];
    chars
        .chars()
        .map(|c| regex::escape(c.encode_utf8(&mut buf)))
        .collect()
}

/// Byte length of the leading atomic class in `expr`.
fn atom_len(expr: &str) -> Result<usize, ConstructionError> {
    let not_a_class = || ConstructionError::NotAClass {
        expr: expr.to_string(),
    };

    let mut chars = expr.chars();
    match chars.next() {
        None => Err(ConstructionError::EmptyClass),
        Some('.') => Ok(1),
        Some('[') => closing_bracket(expr).map(|i| i + 1).ok_or_else(not_a_class),
        Some('\\') => match chars.next() {
            Some('s' | 'S' | 'd' | 'D' | 'w' | 'W') => Ok(2),
            Some('p' | 'P') => match chars.next() {
                Some('{') => expr.find('}').map(|i| i + 1).ok_or_else(not_a_class),
                Some(c) if c.is_alphabetic() => Ok(2 + c.len_utf8()),
                _ => Err(not_a_class()),
            },
            Some(c) if c.is_ascii_punctuation() => Ok(2),
            _ => Err(not_a_class()),
        },
        Some(_) => Err(not_a_class()),
    }
}

/// Byte offset of the `]` closing the bracket expression that opens `expr`.
///
/// Nested classes (`[a[bc]]`, `[[:alpha:]]`) are tracked by depth. A `]`
/// directly after the opening bracket (or after `[^`) is a literal member.
fn closing_bracket(expr: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut at_start = false;
    let mut chars = expr.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => {
                depth += 1;
                at_start = true;
                continue;
            }
            '^' if at_start => continue,
            ']' if at_start => {}
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        at_start = false;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(class: &CharClass, c: char) -> bool {
        let re = Regex::new(&format!("^{}$", class.as_str())).unwrap();
        re.is_match(&c.to_string())
    }

    #[test]
    fn test_bracket_expressions_are_accepted() {
        for expr in ["[a-z]", r#"[^"]"#, "[[:alpha:]]", "[]a]", "[^]a]", r"[\]]", "[a[bc]]"] {
            assert!(CharClass::new(expr).is_ok(), "rejected {expr}");
        }
    }

    #[test]
    fn test_escapes_and_dot_are_accepted() {
        for expr in [r"\s", r"\D", r"\pL", r"\p{Greek}", r"\P{Greek}", r"\.", "."] {
            assert!(CharClass::new(expr).is_ok(), "rejected {expr}");
        }
    }

    #[test]
    fn test_trailing_quantifier_is_rejected() {
        let err = CharClass::new("[a-z]*").unwrap_err();
        assert_eq!(
            err,
            ConstructionError::Quantifier {
                expr: "[a-z]*".to_string(),
                quantifier: '*'
            }
        );
        assert!(matches!(
            CharClass::new(r"\s?"),
            Err(ConstructionError::Quantifier { quantifier: '?', .. })
        ));
    }

    #[test]
    fn test_quantifier_characters_inside_brackets_are_members() {
        let class = CharClass::new("[*?]").unwrap();
        assert!(accepts(&class, '*'));
        assert!(accepts(&class, '?'));
        assert!(!accepts(&class, 'a'));
    }

    #[test]
    fn test_non_class_text_is_rejected() {
        assert_eq!(CharClass::new(""), Err(ConstructionError::EmptyClass));
        for expr in ["abc", "[a][b]", "[a-z", r"\b", "(a)"] {
            assert!(
                matches!(CharClass::new(expr), Err(ConstructionError::NotAClass { .. })),
                "accepted {expr}"
            );
        }
    }

    #[test]
    fn test_malformed_class_reports_syntax_error() {
        assert!(matches!(
            CharClass::new("[z-a]"),
            Err(ConstructionError::Syntax { .. })
        ));
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        for c in ['a', ']', '^', '-', '\\', '[', '&', '~', '"', ' ', 'é'] {
            let class = CharClass::literal(c);
            assert!(accepts(&class, c), "{} does not accept {c:?}", class);
            assert!(!accepts(&class, 'z'));
        }
    }

    #[test]
    fn test_any_of_and_none_of() {
        let any = CharClass::any_of("]-^").unwrap();
        assert!(accepts(&any, ']'));
        assert!(accepts(&any, '-'));
        assert!(accepts(&any, '^'));
        assert!(!accepts(&any, 'a'));

        let none = CharClass::none_of("\"").unwrap();
        assert_eq!(none.as_str(), r#"[^"]"#);
        assert!(accepts(&none, 'a'));
        assert!(!accepts(&none, '"'));

        assert_eq!(CharClass::any_of(""), Err(ConstructionError::EmptyClass));
    }

    #[test]
    fn test_named_classes() {
        assert_eq!(CharClass::named("whitespace").unwrap(), CharClass::whitespace());
        assert!(accepts(&CharClass::named("digit").unwrap(), '7'));
        assert!(accepts(&CharClass::named("any").unwrap(), '\n'));
        assert_eq!(
            CharClass::named("vowel"),
            Err(ConstructionError::UnknownClassName("vowel".to_string()))
        );
        for name in CharClass::names() {
            let class = CharClass::named(name).unwrap();
            assert!(CharClass::new(class.as_str()).is_ok(), "{name} is invalid");
        }
    }
}
