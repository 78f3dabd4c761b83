//! Roman and arabic page counters.

use serde::{Deserialize, Serialize};

use crate::model::{NumberStyle, SectionKind};

/// Subtractive-pair table, largest value first.
const ROMAN_TABLE: [(u32, &str); 13] = [
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

/// Convert a number to lower-case roman numerals. Zero yields an empty string.
pub fn romanize(mut num: u32) -> String {
    let mut result = String::new();
    for (value, numeral) in ROMAN_TABLE {
        while num >= value {
            result.push_str(numeral);
            num -= value;
        }
    }
    result
}

/// The two independent page counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberSystem {
    /// Title page, table of contents and front matter
    Roman,
    /// Chapters and back matter
    Arabic,
}

impl NumberSystem {
    /// System used by pages of a section kind.
    pub fn for_kind(kind: SectionKind) -> Self {
        if kind.is_front_matter() {
            NumberSystem::Roman
        } else {
            NumberSystem::Arabic
        }
    }

    /// Format a counter value for display.
    ///
    /// Roman pages always use roman numerals; arabic pages follow the main
    /// matter `style` (a `None` style still yields digits for labels).
    pub fn format(self, value: u32, style: NumberStyle) -> String {
        match (self, style) {
            (NumberSystem::Roman, _) | (NumberSystem::Arabic, NumberStyle::Roman) => {
                romanize(value)
            }
            (NumberSystem::Arabic, _) => value.to_string(),
        }
    }
}

/// Display label stamped on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabel {
    /// Counter the number came from
    pub system: NumberSystem,
    /// Counter value
    pub value: u32,
    /// Formatted text
    pub text: String,
}

/// Running counters threaded through one estimate or layout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    roman: u32,
    arabic: u32,
}

impl Counters {
    /// Both counters start at `start_from`.
    pub fn new(start_from: u32) -> Self {
        Self {
            roman: start_from,
            arabic: start_from,
        }
    }

    /// Current value of a counter.
    pub fn current(&self, system: NumberSystem) -> u32 {
        match system {
            NumberSystem::Roman => self.roman,
            NumberSystem::Arabic => self.arabic,
        }
    }

    /// Advance a counter by `pages`.
    pub fn advance(&mut self, system: NumberSystem, pages: u32) {
        match system {
            NumberSystem::Roman => self.roman = self.roman.saturating_add(pages),
            NumberSystem::Arabic => self.arabic = self.arabic.saturating_add(pages),
        }
    }

    /// Return the current value and advance the counter by one.
    pub fn take(&mut self, system: NumberSystem) -> u32 {
        let value = self.current(system);
        self.advance(system, 1);
        value
    }
}
