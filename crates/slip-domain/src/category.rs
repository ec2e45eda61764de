//! Domain types representing spending categories.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

/// Closed set of spending classifications used for grouping and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Utilities,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// Every category in canonical display order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    /// Returns the persisted key for the category.
    pub fn key(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }

    /// Parses a known key, returning `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.key() == needle)
    }

    /// Resolves any key to a category, falling back to [`Category::Other`].
    pub fn from_key(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn style(self) -> &'static CategoryStyle {
        match self {
            Category::Food => &FOOD_STYLE,
            Category::Transport => &TRANSPORT_STYLE,
            Category::Shopping => &SHOPPING_STYLE,
            Category::Utilities => &UTILITIES_STYLE,
            Category::Entertainment => &ENTERTAINMENT_STYLE,
            Category::Other => &OTHER_STYLE,
        }
    }

    pub fn label(self) -> &'static str {
        self.style().label
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|key| Category::from_key(&key))
            .unwrap_or_default())
    }
}

/// Display metadata attached to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub background: &'static str,
    pub icon: &'static str,
}

const FOOD_STYLE: CategoryStyle = CategoryStyle {
    label: "Makanan & Barangan",
    color: "red.400",
    background: "red.50",
    icon: "shopping-bag",
};

const TRANSPORT_STYLE: CategoryStyle = CategoryStyle {
    label: "Pengangkutan",
    color: "teal.400",
    background: "teal.50",
    icon: "truck",
};

const SHOPPING_STYLE: CategoryStyle = CategoryStyle {
    label: "Beli-belah",
    color: "blue.400",
    background: "blue.50",
    icon: "shopping-cart",
};

const UTILITIES_STYLE: CategoryStyle = CategoryStyle {
    label: "Utiliti",
    color: "green.400",
    background: "green.50",
    icon: "zap",
};

const ENTERTAINMENT_STYLE: CategoryStyle = CategoryStyle {
    label: "Hiburan",
    color: "yellow.500",
    background: "yellow.50",
    icon: "film",
};

const OTHER_STYLE: CategoryStyle = CategoryStyle {
    label: "Lain-lain",
    color: "gray.400",
    background: "gray.50",
    icon: "more-horizontal",
};
