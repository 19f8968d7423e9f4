//! Line weight and line pattern attributes

use std::fmt;

/// Stroke width in drawing units.
///
/// Zero means the thinnest line the output device can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LineWeight(pub i32);

impl LineWeight {
    /// Create a line weight from a raw value
    pub fn from_value(value: i32) -> Self {
        LineWeight(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i32 {
        self.0
    }

    /// True for the device-minimum stroke
    pub fn is_hairline(&self) -> bool {
        self.0 <= 0
    }
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineWeight({})", self.0)
    }
}

/// Enumerated dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinePattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    ShortDash,
    MediumDash,
    LongDash,
    DashDotDot,
    /// Pattern id without a name in this table
    Other(u8),
}

impl LinePattern {
    /// Map a wire id to a pattern
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => LinePattern::Solid,
            2 => LinePattern::Dashed,
            3 => LinePattern::Dotted,
            4 => LinePattern::DashDot,
            5 => LinePattern::ShortDash,
            6 => LinePattern::MediumDash,
            7 => LinePattern::LongDash,
            8 => LinePattern::DashDotDot,
            other => LinePattern::Other(other),
        }
    }

    /// Wire id of this pattern
    pub fn id(&self) -> u8 {
        match self {
            LinePattern::Solid => 1,
            LinePattern::Dashed => 2,
            LinePattern::Dotted => 3,
            LinePattern::DashDot => 4,
            LinePattern::ShortDash => 5,
            LinePattern::MediumDash => 6,
            LinePattern::LongDash => 7,
            LinePattern::DashDotDot => 8,
            LinePattern::Other(id) => *id,
        }
    }

    /// Parse the name used by the extended ASCII `(LinePattern ...)` form
    pub fn from_name(name: &str) -> Option<Self> {
        let pattern = match name.to_ascii_lowercase().as_str() {
            "solid" => LinePattern::Solid,
            "dashed" => LinePattern::Dashed,
            "dotted" => LinePattern::Dotted,
            "dash_dot" => LinePattern::DashDot,
            "short_dash" => LinePattern::ShortDash,
            "medium_dash" => LinePattern::MediumDash,
            "long_dash" => LinePattern::LongDash,
            "dash_dot_dot" => LinePattern::DashDotDot,
            other => LinePattern::from_id(other.parse().ok()?),
        };
        Some(pattern)
    }
}

impl fmt::Display for LinePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinePattern::Other(id) => write!(f, "Pattern({})", id),
            named => write!(f, "{:?}", named),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_weight() {
        assert!(LineWeight::default().is_hairline());
        assert_eq!(LineWeight::from_value(250).value(), 250);
    }

    #[test]
    fn test_pattern_ids() {
        assert_eq!(LinePattern::from_id(2), LinePattern::Dashed);
        assert_eq!(LinePattern::from_id(40), LinePattern::Other(40));
        assert_eq!(LinePattern::Other(40).id(), 40);
        assert_eq!(LinePattern::DashDot.id(), 4);
    }

    #[test]
    fn test_pattern_names() {
        assert_eq!(LinePattern::from_name("Dash_Dot"), Some(LinePattern::DashDot));
        assert_eq!(LinePattern::from_name("12"), Some(LinePattern::Other(12)));
        assert_eq!(LinePattern::from_name("3"), Some(LinePattern::Dotted));
        assert_eq!(LinePattern::from_name("wavy"), None);
    }
}
