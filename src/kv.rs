//! Ordered key/value store built from delimited text.
//!
//! A [`KvStore`] holds name/optional-value entries and can be built by
//! parsing a delimited buffer such as `name=value;name2=value2;flag;`, or
//! incrementally through the `add_*` methods. Serializing with
//! [`KvStore::to_text`] produces the same textual form.
//!
//! Two behaviors are load-bearing and easy to trip over:
//!
//! - **Front insertion.** Every insertion (programmatic or during parse)
//!   puts the new entry first, so parsing `"a=1;b=2;c=3"` iterates as
//!   `c, b, a` - reversed relative to the input. Duplicate names are kept,
//!   and lookups always return the first match in current order.
//! - **Serialization asymmetry.** Entries with a value are terminated by
//!   the caller-chosen delimiter; name-only entries are always terminated
//!   by a literal `';'`, whatever delimiter was requested.
//!
//! Example format:
//!
//! ```plaintext
//! host=example.org;port=8080;verbose;
//! ```

use tracing::trace;

use crate::error::Error;
use crate::strutil;

/// One name/optional-value record owned by a [`KvStore`].
///
/// An entry without a value represents a bare flag token such as `verbose`
/// in `host=a;verbose;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    value: Option<String>,
}

impl Entry {
    /// The entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry value, or `None` for a name-only entry.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// An ordered collection of key/value entries.
#[derive(Debug, Clone, Default)]
pub struct KvStore {
    entries: Vec<Entry>,
}

impl KvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parses a delimited buffer into a store.
    ///
    /// Each run of text up to a `split` occurrence is one raw token. A
    /// token containing `'='` becomes a name/value entry, split at the
    /// first `'='` with both sides trimmed; any other token is trimmed and
    /// becomes a name-only entry. Empty tokens between adjacent delimiters
    /// are kept (yielding entries with empty names); only an empty
    /// remainder after the final delimiter is dropped.
    ///
    /// Entries are inserted at the front as they are scanned, so iteration
    /// order is the reverse of input order.
    pub fn parse(buffer: &str, split: char) -> Result<Self, Error> {
        if buffer.is_empty() {
            return Err(Error::InvalidArgument("empty buffer".to_string()));
        }
        if split == '\0' || split == '=' {
            return Err(Error::InvalidArgument(format!(
                "invalid delimiter {split:?}"
            )));
        }

        let mut store = Self::new();
        let mut rest = buffer;
        while let Some(pos) = rest.find(split) {
            store.push_token(&rest[..pos]);
            rest = &rest[pos + split.len_utf8()..];
        }
        if !rest.is_empty() {
            store.push_token(rest);
        }

        trace!(entries = store.len(), "parsed key/value buffer");
        Ok(store)
    }

    /// Splits one raw token into name/value and inserts it at the front.
    fn push_token(&mut self, token: &str) {
        let entry = match token.find('=') {
            Some(pos) => Entry {
                name: strutil::trim(&token[..pos]),
                value: Some(strutil::trim(&token[pos + 1..])),
            },
            None => Entry {
                name: strutil::trim(token),
                value: None,
            },
        };
        trace!(name = %entry.name, has_value = entry.value.is_some(), "token");
        self.entries.insert(0, entry);
    }

    /// Inserts a name-only entry at the front.
    pub fn add(&mut self, name: &str) {
        self.entries.insert(0, Entry {
            name: name.to_string(),
            value: None,
        });
    }

    /// Inserts a name/value entry at the front.
    pub fn add_string(&mut self, name: &str, value: &str) {
        self.entries.insert(0, Entry {
            name: name.to_string(),
            value: Some(value.to_string()),
        });
    }

    /// Inserts an integer value, formatted in its canonical decimal form.
    pub fn add_int(&mut self, name: &str, value: i32) {
        self.add_string(name, &value.to_string());
    }

    /// Inserts a float value, formatted with six fractional digits
    /// (`1.5` becomes `"1.500000"`).
    pub fn add_float(&mut self, name: &str, value: f32) {
        self.add_string(name, &format!("{value:.6}"));
    }

    /// Inserts a boolean value as `"true"` or `"false"`.
    pub fn add_bool(&mut self, name: &str, value: bool) {
        self.add_string(name, if value { "true" } else { "false" });
    }

    /// Removes the first entry whose name matches exactly.
    ///
    /// Removal is idempotent: a missing name is a successful no-op.
    pub fn remove(&mut self, name: &str) {
        if let Some(pos) = self.entries.iter().position(|e| e.name == name) {
            self.entries.remove(pos);
        }
    }

    /// Serializes all entries in current order.
    ///
    /// Entries with a value emit `name=value` followed by `split`; name-only
    /// entries emit `name;` with a literal semicolon regardless of `split`.
    /// There is no wrapping or trailing cleanup beyond the per-entry
    /// terminator.
    pub fn to_text(&self, split: char) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match &entry.value {
                Some(value) => {
                    out.push_str(&entry.name);
                    out.push('=');
                    out.push_str(value);
                    out.push(split);
                }
                None => {
                    out.push_str(&entry.name);
                    out.push(';');
                }
            }
        }
        out
    }

    /// Number of entries currently in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry, resetting the store to its empty state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Looks up the first entry matching `name` and returns a copy of its
    /// value, or `None` for a name-only entry.
    pub fn get_string(&self, name: &str) -> Result<Option<String>, Error> {
        let entry = self.find(name)?;
        Ok(entry.value.clone())
    }

    /// Looks up `name` and coerces its value to an integer.
    pub fn get_int(&self, name: &str) -> Result<i32, Error> {
        let value = self.find_value(name)?;
        Ok(strutil::parse_int(value))
    }

    /// Looks up `name` and coerces its value to a float.
    pub fn get_float(&self, name: &str) -> Result<f32, Error> {
        let value = self.find_value(name)?;
        Ok(strutil::parse_float(value))
    }

    /// Looks up `name` and coerces its value to a boolean.
    pub fn get_bool(&self, name: &str) -> Result<bool, Error> {
        let value = self.find_value(name)?;
        Ok(strutil::parse_bool(value))
    }

    /// Resumes external iteration from a cursor.
    ///
    /// With no cursor this returns the first entry. With a reference to a
    /// previously returned entry it returns the entry immediately after it
    /// in current order, or `None` when the cursor was last or no longer
    /// belongs to this store.
    pub fn next(&self, cursor: Option<&Entry>) -> Option<&Entry> {
        match cursor {
            None => self.entries.first(),
            Some(current) => {
                let pos = self
                    .entries
                    .iter()
                    .position(|e| std::ptr::eq(e, current))?;
                self.entries.get(pos + 1)
            }
        }
    }

    /// Forward iterator over entries in current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    fn find(&self, name: &str) -> Result<&Entry, Error> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn find_value(&self, name: &str) -> Result<&str, Error> {
        let entry = self.find(name)?;
        entry
            .value
            .as_deref()
            .ok_or_else(|| Error::NoValue(name.to_string()))
    }
}

impl<'a> IntoIterator for &'a KvStore {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn names(store: &KvStore) -> Vec<&str> {
        store.iter().map(|e| e.name()).collect()
    }

    #[test]
    #[traced_test]
    fn parse_reverses_input_order() {
        let store = KvStore::parse("a=1;b=2;c=3", ';').unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(names(&store), vec!["c", "b", "a"]);
        assert_eq!(store.get_string("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get_string("c").unwrap(), Some("3".to_string()));
    }

    #[test]
    fn parse_trims_names_and_values() {
        let store = KvStore::parse(" host = example.org ; verbose ", ';').unwrap();

        assert_eq!(
            store.get_string("host").unwrap(),
            Some("example.org".to_string())
        );
        assert_eq!(store.get_string("verbose").unwrap(), None);
    }

    #[test]
    fn parse_splits_at_first_equals_only() {
        let store = KvStore::parse("expr=a=b", ';').unwrap();
        assert_eq!(store.get_string("expr").unwrap(), Some("a=b".to_string()));
    }

    #[test]
    fn parse_keeps_empty_tokens_between_delimiters() {
        // Adjacent delimiters produce an empty-name entry; only an empty
        // remainder after the final delimiter is dropped.
        let store = KvStore::parse("a=1;;b=2;", ';').unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(names(&store), vec!["b", "", "a"]);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            KvStore::parse("", ';'),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            KvStore::parse("a=1", '='),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            KvStore::parse("a=1", '\0'),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn add_then_get_round_trips() {
        let mut store = KvStore::new();
        store.add_string("name", "value");

        assert_eq!(store.get_string("name").unwrap(), Some("value".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_names_shadow_front_first() {
        let mut store = KvStore::new();
        store.add_string("k", "1");
        store.add_string("k", "2");

        // Front insertion: the most recent add wins lookups.
        assert_eq!(store.get_string("k").unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 2);

        // Removal only deletes the first match.
        store.remove("k");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_string("k").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn remove_missing_is_a_no_op() {
        let mut store = KvStore::parse("a=1;b=2", ';').unwrap();
        store.remove("missing");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn typed_adds_format_canonically() {
        let mut store = KvStore::new();
        store.add_int("int", -7);
        store.add_float("float", 1.5);
        store.add_bool("yes", true);
        store.add_bool("no", false);

        assert_eq!(store.get_string("int").unwrap(), Some("-7".to_string()));
        assert_eq!(
            store.get_string("float").unwrap(),
            Some("1.500000".to_string())
        );
        assert_eq!(store.get_string("yes").unwrap(), Some("true".to_string()));
        assert_eq!(store.get_string("no").unwrap(), Some("false".to_string()));
    }

    #[test]
    fn typed_gets_coerce_values() {
        let store = KvStore::parse("port=8080x;ratio=0.25;on=true;off=no", ';').unwrap();

        assert_eq!(store.get_int("port").unwrap(), 8080);
        assert_eq!(store.get_float("ratio").unwrap(), 0.25);
        assert!(store.get_bool("on").unwrap());
        assert!(!store.get_bool("off").unwrap());
    }

    #[test]
    fn typed_get_on_flag_is_no_value() {
        let store = KvStore::parse("flag;", ';').unwrap();

        assert!(matches!(store.get_int("flag"), Err(Error::NoValue(_))));
        assert!(matches!(store.get_float("flag"), Err(Error::NoValue(_))));
        assert!(matches!(store.get_bool("flag"), Err(Error::NoValue(_))));
        // The string getter reports the missing value as None instead.
        assert_eq!(store.get_string("flag").unwrap(), None);
    }

    #[test]
    fn lookups_fail_with_not_found() {
        let store = KvStore::parse("a=1", ';').unwrap();
        assert!(matches!(store.get_string("z"), Err(Error::NotFound(_))));
        assert!(matches!(store.get_int("z"), Err(Error::NotFound(_))));
    }

    #[test]
    fn to_text_serializes_in_current_order() {
        let mut store = KvStore::new();
        store.add_string("a", "1");
        store.add("flag");
        store.add_string("b", "2");

        // Front insertion: b was added last, so it serializes first.
        assert_eq!(store.to_text(';'), "b=2;flag;a=1;");
    }

    #[test]
    fn name_only_entries_always_end_with_semicolon() {
        let store = KvStore::parse("flag;", ';').unwrap();
        assert_eq!(store.to_text(';'), "flag;");

        // Even under a different delimiter the flag terminator stays ';'.
        let store = KvStore::parse("a=1,flag", ',').unwrap();
        assert_eq!(store.to_text(','), "flag;a=1,");
    }

    #[test]
    fn cursor_walks_every_entry_once() {
        let store = KvStore::parse("a=1;b=2;c=3", ';').unwrap();

        let mut seen = Vec::new();
        let mut cursor = None;
        while let Some(entry) = store.next(cursor) {
            seen.push(entry.name());
            cursor = Some(entry);
        }

        assert_eq!(seen, vec!["c", "b", "a"]);
    }

    #[test]
    fn cursor_on_empty_store_is_none() {
        let store = KvStore::new();
        assert!(store.next(None).is_none());
    }

    #[test]
    fn foreign_cursor_yields_none() {
        let store = KvStore::parse("a=1;b=2", ';').unwrap();
        let other = KvStore::parse("a=1;b=2", ';').unwrap();

        let first = other.next(None).unwrap();
        assert!(store.next(Some(first)).is_none());
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut store = KvStore::parse("a=1;b=2", ';').unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.next(None).is_none());
    }
}
