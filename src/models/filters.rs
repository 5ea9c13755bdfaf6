use serde::{ser::SerializeMap, Serialize, Serializer};
use std::fmt::Display;

/// A single discovery filter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Integer(n) => write!(f, "{}", n),
            // Whole decimals keep their fractional digit ("7.0", not "7")
            FilterValue::Decimal(n) if n.fract() == 0.0 => write!(f, "{:.1}", n),
            FilterValue::Decimal(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::Text(text) => serializer.serialize_str(text),
            FilterValue::Integer(n) => serializer.serialize_i64(*n),
            FilterValue::Decimal(n) => serializer.serialize_f64(*n),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Decimal(value)
    }
}

/// Ordered set of discovery filters, forwarded verbatim as upstream query parameters.
///
/// Keys keep their first insertion position; inserting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: Vec<(String, FilterValue)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Inserts only when `value` is present and non-blank
    pub fn insert_present(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Renders the filters as query-string pairs in insertion order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }
}

impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut filters = FilterSet::new();
        filters.insert("sort_by", "popularity.desc");
        filters.insert("page", 1i64);
        filters.insert("with_genres", "14,878");

        let keys: Vec<&str> = filters.keys().collect();
        assert_eq!(keys, vec!["sort_by", "page", "with_genres"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut filters = FilterSet::new();
        filters.insert("page", 1i64);
        filters.insert("sort_by", "popularity.desc");
        filters.insert("page", "3");

        assert_eq!(filters.len(), 2);
        assert_eq!(filters.keys().next(), Some("page"));
        assert_eq!(filters.get("page"), Some(&FilterValue::Text("3".to_string())));
    }

    #[test]
    fn test_insert_present_skips_blank_values() {
        let mut filters = FilterSet::new();
        filters.insert_present("with_genres", None);
        filters.insert_present("sort_by", Some("   "));
        filters.insert_present("vote_average.gte", Some("6.5"));

        assert_eq!(filters.len(), 1);
        assert!(filters.contains_key("vote_average.gte"));
    }

    #[test]
    fn test_query_pairs_formatting() {
        let mut filters = FilterSet::new();
        filters.insert("vote_average.gte", 7.0);
        filters.insert("vote_average.lte", 8.5);
        filters.insert("vote_count.gte", 10000i64);

        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("vote_average.gte".to_string(), "7.0".to_string()),
                ("vote_average.lte".to_string(), "8.5".to_string()),
                ("vote_count.gte".to_string(), "10000".to_string()),
            ]
        );
    }

    #[test]
    fn test_serializes_as_ordered_json_object() {
        let mut filters = FilterSet::new();
        filters.insert("sort_by", "popularity.desc");
        filters.insert("page", 1i64);

        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"sort_by":"popularity.desc","page":1}"#);
    }
}
