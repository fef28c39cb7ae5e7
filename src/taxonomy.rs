//! # Test Taxonomy
//!
//! The closed vocabularies that test metadata is validated against:
//!
//! - [`Priority`]: `Unknown`, `High`, `Normal`, `Low`
//! - [`TestLevel`], [`TestType`], [`TestArea`]: the three independent
//!   categorization axes
//!
//! Ordinal 0 of every vocabulary means "not specified". Every member renders
//! to a stable label (its `Display`, `as_str` and serde form), never to its
//! ordinal.
//!
//! Parsing never fails. Anything outside a vocabulary collapses to the
//! "not specified" member so that one bad literal cannot abort metadata
//! collection for an otherwise valid test.

use serde::{Deserialize, Serialize};

use crate::store::PropertyValue;

/// Declares a closed vocabulary: the enum, its labels, ordinals and lookups.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, [$($variant:ident = $label:literal),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            const MEMBERS: &'static [$name] = &[$($name::$variant),+];

            /// Every member, in ordinal order.
            pub fn all() -> impl Iterator<Item = $name> {
                Self::MEMBERS.iter().copied()
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn ordinal(&self) -> i64 {
                *self as i64
            }

            /// Returns the member with the given ordinal, if one is declared.
            pub fn from_ordinal(ordinal: i64) -> Option<$name> {
                Self::MEMBERS.iter().copied().find(|m| m.ordinal() == ordinal)
            }

            /// Case-insensitive label lookup.
            pub fn from_label(label: &str) -> Option<$name> {
                let label = label.trim();
                Self::MEMBERS
                    .iter()
                    .copied()
                    .find(|m| m.as_str().eq_ignore_ascii_case(label))
            }

            /// True for the "not specified" member.
            pub fn is_unspecified(&self) -> bool {
                *self == $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary!(
    /// Test priority, ordered by declared severity.
    Priority, default = Unknown, [Unknown = "Unknown", High = "High", Normal = "Normal", Low = "Low"]
);

vocabulary!(
    /// Categorization axis: how much of the system a test exercises.
    TestLevel, default = None, [
        None = "None",
        UnitTest = "UnitTest",
        Component = "Component",
        Integration = "Integration",
        System = "System",
    ]
);

vocabulary!(
    /// Categorization axis: what kind of check a test performs.
    TestType, default = None, [
        None = "None",
        Smoke = "Smoke",
        Functional = "Functional",
        Accessibility = "Accessibility",
        Security = "Security",
        AdHoc = "AdHoc",
        Mock = "Mock",
        Negative = "Negative",
    ]
);

vocabulary!(
    /// Categorization axis: which part of the product a test targets.
    TestArea, default = None, [
        None = "None",
        Api = "Api",
        Database = "Database",
        Web = "Web",
        Reports = "Reports",
    ]
);

/// Parses a raw priority value. Returns `Unknown` unless `raw` names a
/// declared member, either by ordinal or by label.
///
/// Labels are matched ASCII case-insensitively after trimming, so `"HIGH"`
/// and `" high "` both give `High`. Numeric strings are read as ordinals.
pub fn parse_priority(raw: &PropertyValue) -> Priority {
    let parsed = match raw {
        PropertyValue::Int(n) => Priority::from_ordinal(*n),
        PropertyValue::Float(f) if f.fract() == 0.0 && f.is_finite() => {
            Priority::from_ordinal(*f as i64)
        }
        PropertyValue::Str(s) => Priority::from_label(s).or_else(|| {
            s.trim()
                .parse::<i64>()
                .ok()
                .and_then(Priority::from_ordinal)
        }),
        PropertyValue::Float(_) | PropertyValue::Bool(_) => None,
    };
    parsed.unwrap_or_default()
}

/// A single value from any of the three categorization axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Level(TestLevel),
    Type(TestType),
    Area(TestArea),
}

impl Category {
    /// Looks up a category label on every axis. `None` labels are rejected, and
    /// the historical attribute name `Reporting` is accepted for `Reports`.
    pub fn parse(label: &str) -> Option<Category> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("Reporting") {
            return Some(Category::Area(TestArea::Reports));
        }
        let found = TestLevel::from_label(label)
            .map(Category::Level)
            .or_else(|| TestType::from_label(label).map(Category::Type))
            .or_else(|| TestArea::from_label(label).map(Category::Area))?;
        (!found.is_unspecified()).then_some(found)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Level(l) => l.as_str(),
            Category::Type(t) => t.as_str(),
            Category::Area(a) => a.as_str(),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        match self {
            Category::Level(l) => l.is_unspecified(),
            Category::Type(t) => t.is_unspecified(),
            Category::Area(a) => a.is_unspecified(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One categorization declaration: at most one value per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryDeclaration {
    pub level: TestLevel,
    pub test_type: TestType,
    pub area: TestArea,
}

impl CategoryDeclaration {
    pub fn new(level: TestLevel, test_type: TestType, area: TestArea) -> Self {
        Self {
            level,
            test_type,
            area,
        }
    }

    /// The declared (non-`None`) values, level first, then type, then area.
    pub fn categories(&self) -> impl Iterator<Item = Category> {
        [
            Category::Level(self.level),
            Category::Type(self.test_type),
            Category::Area(self.area),
        ]
        .into_iter()
        .filter(|c| !c.is_unspecified())
    }

    pub fn is_empty(&self) -> bool {
        self.categories().next().is_none()
    }
}

/// Merges declarations into an ordered, duplicate-free list of labels.
///
/// Declarations are visited in registration order and each one contributes
/// level, type, area in that order. Empty input yields an empty list.
pub fn merge_categories(declarations: &[CategoryDeclaration]) -> Vec<String> {
    let mut merged = Vec::new();
    merge_labels(
        &mut merged,
        declarations
            .iter()
            .flat_map(CategoryDeclaration::categories)
            .map(|c| c.as_str().to_string()),
    );
    merged
}

/// Appends each label not already present in `acc`, keeping the first occurrence.
pub(crate) fn merge_labels<I>(acc: &mut Vec<String>, labels: I)
where
    I: IntoIterator<Item = String>,
{
    for label in labels {
        if !acc.contains(&label) {
            acc.push(label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_ordinal_and_label() {
        assert_eq!(parse_priority(&PropertyValue::Int(1)), Priority::High);
        assert_eq!(parse_priority(&PropertyValue::Int(3)), Priority::Low);
        assert_eq!(parse_priority(&PropertyValue::Str("normal".into())), Priority::Normal);
        assert_eq!(parse_priority(&PropertyValue::Str(" 2 ".into())), Priority::Normal);
        assert_eq!(parse_priority(&PropertyValue::Str(" HIGH ".into())), Priority::High);
        assert_eq!(parse_priority(&PropertyValue::Float(1.0)), Priority::High);
    }

    #[test]
    fn test_priority_out_of_range_is_unknown() {
        for raw in [
            PropertyValue::Int(4),
            PropertyValue::Int(-1),
            PropertyValue::Int(i64::MAX),
            PropertyValue::Float(1.5),
            PropertyValue::Float(f64::NAN),
            PropertyValue::Bool(true),
            PropertyValue::Str("Critical".into()),
            PropertyValue::Str(String::new()),
        ] {
            assert_eq!(parse_priority(&raw), Priority::Unknown, "raw = {:?}", raw);
        }
    }

    #[test]
    fn test_labels_are_not_ordinals() {
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Priority::High.ordinal(), 1);
        assert_eq!(TestType::AdHoc.to_string(), "AdHoc");
        assert_eq!(TestArea::Reports.ordinal(), 4);
        assert!(Priority::default().is_unspecified());
        assert!(TestLevel::default().is_unspecified());
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(Priority::all().count(), 4);
        assert_eq!(TestLevel::all().count(), 5);
        assert_eq!(TestType::all().count(), 8);
        assert_eq!(TestArea::all().count(), 5);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("smoke"), Some(Category::Type(TestType::Smoke)));
        assert_eq!(Category::parse(" Web "), Some(Category::Area(TestArea::Web)));
        assert_eq!(Category::parse("Reporting"), Some(Category::Area(TestArea::Reports)));
        assert_eq!(Category::parse("None"), None);
        assert_eq!(Category::parse("Flaky"), None);
    }

    #[test]
    fn test_merge_categories_orders_and_dedups() {
        let decls = [
            CategoryDeclaration::new(TestLevel::Integration, TestType::Smoke, TestArea::None),
            CategoryDeclaration::default(),
            CategoryDeclaration::new(TestLevel::None, TestType::Smoke, TestArea::Web),
        ];
        assert_eq!(merge_categories(&decls), vec!["Integration", "Smoke", "Web"]);
    }

    #[test]
    fn test_merge_categories_empty() {
        assert!(merge_categories(&[]).is_empty());
        assert!(merge_categories(&[CategoryDeclaration::default()]).is_empty());
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Priority::Normal).unwrap();
        assert_eq!(json, "\"Normal\"");
    }
}
