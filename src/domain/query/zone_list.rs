/// Ordered zone identifiers taken from the free-form zone field of a query.
///
/// Duplicates are kept and order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneList(Vec<String>);

impl ZoneList {
    /// Removes all whitespace, splits on commas and drops empty segments.
    pub fn parse(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        let zones = compact
            .split(',')
            .filter(|zone| !zone.is_empty())
            .map(str::to_string)
            .collect();

        Self(zones)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
