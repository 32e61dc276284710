use indexmap::IndexMap;

use crate::core::{FieldValue, Scale};
use crate::render::Color;

/// Category-10 hues, the default cycle for series without an override.
const DEFAULT_CYCLE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// Stable series-to-color assignment shared by every layer of a chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesPalette {
    assignments: IndexMap<String, Color>,
}

impl SeriesPalette {
    /// Assigns colors in series order; overrides win over the default cycle.
    #[must_use]
    pub fn new<'a>(
        series: impl IntoIterator<Item = &'a str>,
        overrides: &IndexMap<String, Color>,
    ) -> Self {
        let mut assignments = IndexMap::new();
        let mut cycle = DEFAULT_CYCLE.iter().cycle();
        for name in series {
            if assignments.contains_key(name) {
                continue;
            }
            let color = match overrides.get(name) {
                Some(color) => *color,
                None => {
                    let &(r, g, b) = cycle.next().unwrap_or(&DEFAULT_CYCLE[0]);
                    Color::from_rgb8(r, g, b)
                }
            };
            assignments.insert(name.to_owned(), color);
        }
        Self { assignments }
    }

    #[must_use]
    pub fn color_of(&self, series: &str) -> Option<Color> {
        self.assignments.get(series).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Color scale with matching domain and hex range.
    #[must_use]
    pub fn scale(&self) -> Scale {
        Scale {
            domain: Some(
                self.assignments
                    .keys()
                    .map(|name| FieldValue::Text(name.clone()))
                    .collect(),
            ),
            range: Some(self.assignments.values().map(|c| c.to_hex()).collect()),
            zero: None,
        }
    }
}
