//! The delimited text form shared by every map and set.
//!
//! Maps render as `{k1=v1, k2=v2}` and sets as `{a, b, c}` with the default
//! [`Separators`]. Both separators and the enclosing brackets are
//! configurable. The format is only meant to round-trip within this crate.
//! Two cases cannot be read back: keys or values whose text contains a
//! separator, and a collection whose only item renders as empty text, which
//! prints the same as an empty collection.

use alloc::vec::Vec;
use core::fmt;

use crate::error::ParseError;

const OPEN: char = '{';
const CLOSE: char = '}';

/// Delimiters used by `append_to` and `parse_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators<'a> {
    /// Placed between entries.
    pub entry: &'a str,
    /// Placed between a key and its value. Unused by sets.
    pub key_value: &'a str,
    /// Whether the whole text is wrapped in `{` and `}`.
    pub brackets: bool,
}

impl Separators<'static> {
    /// `", "` between entries, `"="` between key and value, with brackets.
    pub const DEFAULT: Self = Self {
        entry: ", ",
        key_value: "=",
        brackets: true,
    };
}

impl Default for Separators<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'a> Separators<'a> {
    /// Separators with the given entry and key/value delimiters.
    pub const fn new(entry: &'a str, key_value: &'a str, brackets: bool) -> Self {
        Self {
            entry,
            key_value,
            brackets,
        }
    }
}

/// Writes map entries, formatting each key and value with its own closure.
pub fn append_entries<'e, W, K, V, I>(
    out: &mut W,
    entries: I,
    separators: &Separators<'_>,
    mut append_key: impl FnMut(&mut W, &K) -> fmt::Result,
    mut append_value: impl FnMut(&mut W, &V) -> fmt::Result,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    K: 'e + ?Sized,
    V: 'e + ?Sized,
    I: IntoIterator<Item = (&'e K, &'e V)>,
{
    if separators.brackets {
        out.write_char(OPEN)?;
    }
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.write_str(separators.entry)?;
        }
        append_key(out, key)?;
        out.write_str(separators.key_value)?;
        append_value(out, value)?;
    }
    if separators.brackets {
        out.write_char(CLOSE)?;
    }
    Ok(())
}

/// Writes set items, formatting each with `append_item`.
pub fn append_items<'e, W, T, I>(
    out: &mut W,
    items: I,
    separators: &Separators<'_>,
    mut append_item: impl FnMut(&mut W, &T) -> fmt::Result,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    T: 'e + ?Sized,
    I: IntoIterator<Item = &'e T>,
{
    if separators.brackets {
        out.write_char(OPEN)?;
    }
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.write_str(separators.entry)?;
        }
        append_item(out, item)?;
    }
    if separators.brackets {
        out.write_char(CLOSE)?;
    }
    Ok(())
}

/// Strips the brackets (if configured) and splits the text into entries.
///
/// Empty text between the brackets yields no entries, so a lone item that
/// renders as `""` parses back as nothing.
pub fn split_entries<'t>(
    text: &'t str,
    separators: &Separators<'_>,
) -> Result<Vec<&'t str>, ParseError> {
    let inner = if separators.brackets {
        let rest = text
            .strip_prefix(OPEN)
            .ok_or(ParseError::MissingOpenBracket)?;
        rest.strip_suffix(CLOSE)
            .ok_or(ParseError::MissingCloseBracket)?
    } else {
        text
    };

    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(separators.entry).collect())
}

/// Splits one map entry at its first key/value separator.
pub fn split_key_value<'t>(
    entry: &'t str,
    separators: &Separators<'_>,
) -> Result<(&'t str, &'t str), ParseError> {
    entry
        .split_once(separators.key_value)
        .ok_or_else(|| ParseError::MissingKeyValueSeparator {
            entry: entry.into(),
        })
}

/// Parses every map entry with the given converters.
pub(crate) fn parse_entries<K, V>(
    text: &str,
    separators: &Separators<'_>,
    mut parse_key: impl FnMut(&str) -> Option<K>,
    mut parse_value: impl FnMut(&str) -> Option<V>,
    mut accept: impl FnMut(K, V),
) -> Result<(), ParseError> {
    for entry in split_entries(text, separators)? {
        let (key, value) = split_key_value(entry, separators)?;
        let key = parse_key(key).ok_or_else(|| ParseError::InvalidKey { text: key.into() })?;
        let value = parse_value(value).ok_or_else(|| ParseError::InvalidValue {
            text: value.into(),
        })?;
        accept(key, value);
    }
    Ok(())
}

/// Parses every set item with the given converter.
pub(crate) fn parse_items<T>(
    text: &str,
    separators: &Separators<'_>,
    mut parse_item: impl FnMut(&str) -> Option<T>,
    mut accept: impl FnMut(T),
) -> Result<(), ParseError> {
    for item in split_entries(text, separators)? {
        let parsed = parse_item(item).ok_or_else(|| ParseError::InvalidKey { text: item.into() })?;
        accept(parsed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use core::fmt::Write;

    use super::*;

    #[test]
    fn appends_with_default_separators() {
        let mut out = String::new();
        let entries = [("a", 1), ("b", 2)];
        append_entries(
            &mut out,
            entries.iter().map(|(k, v)| (k, v)),
            &Separators::DEFAULT,
            |w, k| w.write_str(k),
            |w, v| write!(w, "{v}"),
        )
        .unwrap();
        assert_eq!(out, "{a=1, b=2}");
    }

    #[test]
    fn appends_items_without_brackets() {
        let mut out = String::new();
        append_items(
            &mut out,
            [1, 2, 3].iter(),
            &Separators::new(";", ":", false),
            |w, i| write!(w, "{i}"),
        )
        .unwrap();
        assert_eq!(out, "1;2;3");
    }

    #[test]
    fn empty_collections() {
        let mut out = String::new();
        append_items::<_, i32, _>(&mut out, [].iter(), &Separators::DEFAULT, |w, i| {
            write!(w, "{i}")
        })
        .unwrap();
        assert_eq!(out, "{}");
        assert_eq!(split_entries("{}", &Separators::DEFAULT), Ok(vec![]));
        assert_eq!(
            split_entries("", &Separators::new(", ", "=", false)),
            Ok(vec![])
        );
    }

    #[test]
    fn lone_empty_item_reads_back_as_empty() {
        let mut out = String::new();
        append_items(&mut out, [""].iter(), &Separators::DEFAULT, |w, i| {
            w.write_str(i)
        })
        .unwrap();
        assert_eq!(out, "{}");

        let mut items = vec![];
        parse_items(&out, &Separators::DEFAULT, |i| Some(String::from(i)), |i| {
            items.push(i)
        })
        .unwrap();
        assert!(items.is_empty());

        // With a second item the empty one survives.
        assert_eq!(split_entries("{, a}", &Separators::DEFAULT), Ok(vec!["", "a"]));
    }

    #[test]
    fn split_reports_missing_brackets() {
        assert_eq!(
            split_entries("a=1}", &Separators::DEFAULT),
            Err(ParseError::MissingOpenBracket)
        );
        assert_eq!(
            split_entries("{a=1", &Separators::DEFAULT),
            Err(ParseError::MissingCloseBracket)
        );
    }

    #[test]
    fn split_key_value_uses_first_separator() {
        assert_eq!(split_key_value("a=b=c", &Separators::DEFAULT), Ok(("a", "b=c")));
        assert!(matches!(
            split_key_value("abc", &Separators::DEFAULT),
            Err(ParseError::MissingKeyValueSeparator { .. })
        ));
    }

    #[test]
    fn parse_entries_reports_bad_values() {
        let mut seen = vec![];
        let result = parse_entries(
            "{a=1, b=x}",
            &Separators::DEFAULT,
            |k| Some(String::from(k)),
            |v| v.parse::<i32>().ok(),
            |k, v| seen.push((k, v)),
        );
        assert_eq!(
            result,
            Err(ParseError::InvalidValue {
                text: String::from("x")
            })
        );
        assert_eq!(seen, vec![(String::from("a"), 1)]);
    }
}
