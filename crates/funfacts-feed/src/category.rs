//! Compiled-in category registry.

/// A topic tag with its display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    pub name: &'static str,
    /// CSS-style hex color, e.g. `#3b82f6`.
    pub color: &'static str,
}

/// Every known category, in display order.
pub static CATEGORIES: [Category; 8] = [
    Category {
        name: "technology",
        color: "#3b82f6",
    },
    Category {
        name: "science",
        color: "#16a34a",
    },
    Category {
        name: "finance",
        color: "#ef4444",
    },
    Category {
        name: "society",
        color: "#eab308",
    },
    Category {
        name: "entertainment",
        color: "#db2777",
    },
    Category {
        name: "health",
        color: "#14b8a6",
    },
    Category {
        name: "history",
        color: "#f97316",
    },
    Category {
        name: "news",
        color: "#8b5cf6",
    },
];

impl Category {
    /// Look up a category by exact name.
    pub fn find(name: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.name == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        CATEGORIES.iter().map(|c| c.name)
    }

    /// Color as an `(r, g, b)` triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.color.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

/// Registry entry of a fact's category.
///
/// # Panics
///
/// Panics if `category` is not in the registry. Every fact in the store is
/// expected to carry a registered category; an unknown one is a broken
/// contract, not a recoverable condition.
pub fn lookup(category: &str) -> &'static Category {
    match Category::find(category) {
        Some(c) => c,
        None => panic!("fact category '{}' is not in the category registry", category),
    }
}

/// Display color of a category. Panics like [`lookup`].
pub fn color_of(category: &str) -> &'static str {
    lookup(category).color
}
