//! Default catalog content for a fresh store

use crate::error::Result;
use crate::models::{NewSpace, NewTrendingTopic};
use crate::trait_client::PersistenceClient;

struct TopicSeed {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    read_time: &'static str,
    icon: &'static str,
    view_count: i64,
}

struct SpaceSeed {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    template_count: i32,
    icon: &'static str,
    gradient: &'static str,
    tags: &'static [&'static str],
}

const TOPICS: &[TopicSeed] = &[
    TopicSeed {
        title: "Latest AI Breakthroughs in 2024",
        description: "Discover the most significant AI developments this year",
        category: "Technology",
        read_time: "2 min read",
        icon: "fas fa-fire",
        view_count: 1250,
    },
    TopicSeed {
        title: "Sustainable Investment Strategies",
        description: "How to build an eco-friendly investment portfolio",
        category: "Finance",
        read_time: "4 min read",
        icon: "fas fa-leaf",
        view_count: 890,
    },
    TopicSeed {
        title: "Hidden Gems in Southeast Asia",
        description: "Off-the-beaten-path destinations for adventurous travelers",
        category: "Travel",
        read_time: "6 min read",
        icon: "fas fa-map-marked-alt",
        view_count: 567,
    },
    TopicSeed {
        title: "Quantum Computing Fundamentals",
        description: "Understanding the basics of quantum computation",
        category: "Academic",
        read_time: "8 min read",
        icon: "fas fa-graduation-cap",
        view_count: 432,
    },
    TopicSeed {
        title: "Best Tech Deals This Week",
        description: "Top technology products with significant discounts",
        category: "Shopping",
        read_time: "3 min read",
        icon: "fas fa-shopping-cart",
        view_count: 1120,
    },
    TopicSeed {
        title: "Mental Health in Remote Work",
        description: "Strategies for maintaining wellbeing while working from home",
        category: "Health",
        read_time: "5 min read",
        icon: "fas fa-heartbeat",
        view_count: 678,
    },
];

const SPACES: &[SpaceSeed] = &[
    SpaceSeed {
        title: "Business Strategy",
        description: "Market analysis, competitive research, and business planning",
        category: "Business",
        template_count: 12,
        icon: "fas fa-briefcase",
        gradient: "from-blue-500 to-purple-600",
        tags: &["SWOT Analysis", "Market Research"],
    },
    SpaceSeed {
        title: "Developer Tools",
        description: "Code review, debugging, and technical documentation",
        category: "Technology",
        template_count: 8,
        icon: "fas fa-code",
        gradient: "from-green-500 to-teal-600",
        tags: &["Code Review", "Documentation"],
    },
    SpaceSeed {
        title: "Creative Writing",
        description: "Content creation, storytelling, and copywriting assistance",
        category: "Creative",
        template_count: 15,
        icon: "fas fa-pen-fancy",
        gradient: "from-orange-500 to-red-600",
        tags: &["Blog Posts", "Marketing Copy"],
    },
];

impl From<&TopicSeed> for NewTrendingTopic {
    fn from(seed: &TopicSeed) -> Self {
        Self {
            description: Some(seed.description.to_string()),
            read_time: Some(seed.read_time.to_string()),
            icon: Some(seed.icon.to_string()),
            view_count: seed.view_count,
            ..NewTrendingTopic::new(seed.title, seed.category)
        }
    }
}

impl From<&SpaceSeed> for NewSpace {
    fn from(seed: &SpaceSeed) -> Self {
        Self {
            description: Some(seed.description.to_string()),
            template_count: seed.template_count,
            icon: Some(seed.icon.to_string()),
            gradient: Some(seed.gradient.to_string()),
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
            ..NewSpace::new(seed.title, seed.category)
        }
    }
}

/// Populate trending topics and spaces when the store has none
///
/// Each collection is checked on its own, so a store that already has
/// topics but no spaces only gets spaces.
pub async fn seed_defaults(store: &dyn PersistenceClient) -> Result<()> {
    if store.list_trending_topics(1).await?.is_empty() {
        for seed in TOPICS {
            store.create_trending_topic(seed.into()).await?;
        }
        tracing::info!(count = TOPICS.len(), "Seeded trending topics");
    }

    if store.list_spaces(1).await?.is_empty() {
        for seed in SPACES {
            store.create_space(seed.into()).await?;
        }
        tracing::info!(count = SPACES.len(), "Seeded spaces");
    }

    Ok(())
}
