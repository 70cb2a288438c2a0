//! Static category catalog.
//!
//! Pure lookup data; presentation metadata stays out of the session core.

/// One entry in the category catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

const CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        name: "sports",
        display_name: "Sports Arena",
        description: "Sports, athletes, and competitions",
    },
    CategoryInfo {
        name: "science",
        display_name: "Science Lab",
        description: "Physics, chemistry, and biology",
    },
    CategoryInfo {
        name: "technology",
        display_name: "Tech Innovation",
        description: "The latest in technology and computing",
    },
    CategoryInfo {
        name: "history",
        display_name: "Time Machine",
        description: "Historical events and civilizations",
    },
    CategoryInfo {
        name: "literature",
        display_name: "Book Club",
        description: "Books, authors, and poetry",
    },
    CategoryInfo {
        name: "world",
        display_name: "World Explorer",
        description: "Countries, cultures, and geography",
    },
    CategoryInfo {
        name: "entertainment",
        display_name: "Show Time",
        description: "Movies, music, and pop culture",
    },
    CategoryInfo {
        name: "mathematics",
        display_name: "Math Masters",
        description: "Numbers, equations, and mathematical concepts",
    },
    CategoryInfo {
        name: "general_knowledge",
        display_name: "Brain Boost",
        description: "General knowledge across various topics",
    },
    CategoryInfo {
        name: "political",
        display_name: "Political Arena",
        description: "Politics, government, and current affairs",
    },
];

/// Every known category, in catalog order.
#[must_use]
pub fn categories() -> &'static [CategoryInfo] {
    CATEGORIES
}

/// Look up a category by its wire name.
#[must_use]
pub fn find_category(name: &str) -> Option<&'static CategoryInfo> {
    CATEGORIES.iter().find(|c| c.name == name)
}
