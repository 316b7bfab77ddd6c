use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default categorical palette. Ten distinct colors, cycled for longer legends.
pub const CATEGORY10: [&str; 10] = [
    "#8884d8", "#82ca9d", "#ffc658", "#ff8042", "#0088fe",
    "#00c49f", "#ffbb28", "#8dd1e1", "#a4de6c", "#d0ed57",
];

/// Color for the `index`-th series using the default palette.
pub fn color_for(index: usize) -> &'static str {
    CATEGORY10[index % CATEGORY10.len()]
}

/// Fewest colors a palette may hold.
pub const MIN_PALETTE_COLORS: usize = 10;

/// An ordered list of at least ten distinct colors, assigned to series by
/// position.
///
/// More series than colors means colors repeat; two legend entries can then
/// share a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    pub fn new(colors: Vec<String>) -> Result<Self, String> {
        if colors.len() < MIN_PALETTE_COLORS {
            return Err(format!(
                "color palette needs at least {} colors, got {}",
                MIN_PALETTE_COLORS,
                colors.len()
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = colors.iter().find(|c| !seen.insert(c.to_ascii_lowercase())) {
            return Err(format!("color palette repeats '{}'", dup));
        }
        Ok(Self { colors })
    }

    pub fn category10() -> Self {
        Self {
            colors: CATEGORY10.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    /// Pair each key with its color, in key order.
    pub fn assign_colors<'a>(
        &'a self,
        keys: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        keys.iter()
            .enumerate()
            .map(move |(i, key)| (key.as_str(), self.color_for(i)))
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::category10()
    }
}

impl TryFrom<Vec<String>> for ColorPalette {
    type Error = String;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<ColorPalette> for Vec<String> {
    fn from(palette: ColorPalette) -> Self {
        palette.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("#0000{:02x}", i)).collect()
    }

    #[test]
    fn test_default_palette_is_distinct() {
        let unique: HashSet<&str> = CATEGORY10.iter().copied().collect();
        assert_eq!(unique.len(), CATEGORY10.len());
    }

    #[test]
    fn test_color_for_cycles() {
        assert_eq!(color_for(0), "#8884d8");
        assert_eq!(color_for(10), color_for(0));
        assert_eq!(color_for(23), color_for(3));
    }

    #[test]
    fn test_custom_palette() {
        let palette = ColorPalette::new(numbered(12)).unwrap();
        assert_eq!(palette.color_for(0), "#000000");
        assert_eq!(palette.color_for(13), "#000001");

        let keys: Vec<String> = (0..13).map(|i| format!("k{}", i)).collect();
        let assigned: Vec<_> = palette.assign_colors(&keys).collect();
        assert_eq!(assigned[11], ("k11", "#00000b"));
        assert_eq!(assigned[12], ("k12", "#000000"));
    }

    #[test]
    fn test_short_palette_rejected() {
        assert!(ColorPalette::new(Vec::new()).is_err());
        assert!(ColorPalette::new(numbered(9)).is_err());
        let parsed: Result<ColorPalette, _> =
            serde_json::from_str(r##"["#111111", "#222222"]"##);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_repeated_colors_rejected() {
        let mut colors = numbered(10);
        colors[7] = colors[3].to_uppercase();
        let err = ColorPalette::new(colors).unwrap_err();
        assert!(err.contains("repeats"));
    }
}
