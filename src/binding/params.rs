use std::sync::LazyLock;

use regex::Regex;

use super::inspector::Bindable;
use crate::types::{PropertyType, RowValues, is_datetime_sentinel};

/// Characters that end a placeholder. End of input also counts.
pub const PLACEHOLDER_TERMINATORS: [char; 6] = ['\t', '\n', '\r', ' ', ')', ','];

static PLACEHOLDER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}_]+").expect("placeholder name pattern is valid")
});

/// Ordered `(name, value)` pairs to bind to a statement.
///
/// Names are unique ignoring case; the first value pushed for a name is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    params: Vec<(String, RowValues)>,
}

impl ParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Returns `false` if the name was already present.
    pub fn push(&mut self, name: impl Into<String>, value: RowValues) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.params.push((name, value));
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Value bound to `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        let wanted = name.to_lowercase();
        self.params
            .iter()
            .find(|(n, _)| n.to_lowercase() == wanted)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a (String, RowValues);
    type IntoIter = std::slice::Iter<'a, (String, RowValues)>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Work out which parameters `sql` uses and read their values from `source`.
///
/// A bare text or integer source binds to the first placeholder in the statement.
/// Any other source contributes each supported property whose `@name` placeholder
/// appears in the statement (ignoring case) followed by a terminator or end of input.
/// Absent values and date-time sentinels bind as [`RowValues::Null`].
/// ```rust
/// use sql_binder::prelude::*;
///
/// let params = bind_parameters("select * from users where id = @id", &5_i64);
/// assert_eq!(params.get("id"), Some(&RowValues::Int(5)));
/// ```
#[must_use]
pub fn bind_parameters<S: Bindable + ?Sized>(sql: &str, source: &S) -> ParameterSet {
    let mut set = ParameterSet::new();

    if let Some(value) = source.scalar_value()
        && let Some(name) = first_placeholder_name(sql)
    {
        set.push(name, value);
    }

    let lowered = sql.to_lowercase();
    for prop in S::properties() {
        if !references_placeholder(&lowered, &prop.name.to_lowercase()) {
            continue;
        }
        let value = match source.get_property(prop.name) {
            Some(RowValues::Timestamp(dt))
                if prop.declared_type == PropertyType::DateTime && is_datetime_sentinel(&dt) =>
            {
                RowValues::Null
            }
            Some(value) => value,
            None => RowValues::Null,
        };
        if !set.push(prop.name, value) {
            tracing::debug!(parameter = prop.name, "duplicate parameter name ignored");
        }
    }

    set
}

/// Name following the first `@` in `sql`, if that `@` starts a non-empty name.
#[must_use]
pub fn first_placeholder_name(sql: &str) -> Option<&str> {
    let start = sql.find('@')?;
    PLACEHOLDER_NAME
        .find(&sql[start + 1..])
        .map(|m| m.as_str())
}

/// True when `lowered_sql` contains `@name` followed by a terminator or end of input.
///
/// Both arguments are expected in lower case.
#[must_use]
pub fn references_placeholder(lowered_sql: &str, lowered_name: &str) -> bool {
    if lowered_name.is_empty() {
        return false;
    }
    let needle = format!("@{lowered_name}");
    lowered_sql.match_indices(&needle).any(|(idx, _)| {
        lowered_sql[idx + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| PLACEHOLDER_TERMINATORS.contains(&c))
    })
}
