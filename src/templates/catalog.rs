//! The curated gallery and the prompts each template should answer.

pub(super) struct CuratedTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    pub tags: &'static [&'static str],
    pub is_pro: bool,
    pub price: f64,
    pub prompts: &'static [&'static str],
}

pub(super) const CURATED: &[CuratedTemplate] = &[
    // Productivity
    CuratedTemplate {
        id: "habit-tracker",
        name: "✅ Habit Tracker",
        description: "Build lasting habits with daily check-ins and streaks.",
        category: "Productivity",
        icon: "✅",
        tags: &["habits", "daily", "routine", "streak"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "habit tracker",
            "track my daily habits",
            "habit tracking system",
            "build habits",
            "routine tracker",
        ],
    },
    CuratedTemplate {
        id: "project-tracker",
        name: "📋 Project Tracker",
        description: "Plan projects, assign tasks and follow progress on a board.",
        category: "Productivity",
        icon: "📋",
        tags: &["projects", "tasks", "kanban", "work"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "project tracker",
            "project management",
            "manage my projects",
            "task and project tracker",
            "project management system",
        ],
    },
    CuratedTemplate {
        id: "goal-tracker",
        name: "🎯 Goal Tracker",
        description: "Set goals, break them into milestones and review progress.",
        category: "Productivity",
        icon: "🎯",
        tags: &["goals", "milestones", "okr"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "goal tracker",
            "track my goals",
            "goal setting system",
            "goals and milestones",
            "okr tracker",
        ],
    },
    CuratedTemplate {
        id: "daily-planner",
        name: "🗓️ Daily Planner",
        description: "Time-block your day and keep priorities in view.",
        category: "Productivity",
        icon: "🗓️",
        tags: &["planner", "schedule", "daily"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "daily planner",
            "plan my day",
            "daily schedule",
            "time blocking",
            "day planner",
        ],
    },
    CuratedTemplate {
        id: "meeting-notes",
        name: "📝 Meeting Notes",
        description: "Agendas, notes and action items for every meeting.",
        category: "Productivity",
        icon: "📝",
        tags: &["meetings", "agenda", "notes"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "meeting notes",
            "meeting tracker",
            "track meetings",
            "meeting agenda",
            "meeting management",
        ],
    },
    // Finance
    CuratedTemplate {
        id: "budget-tracker",
        name: "💰 Budget Tracker",
        description: "Monthly budgets by category with income and spending.",
        category: "Finance",
        icon: "💰",
        tags: &["budget", "money", "finance"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "budget tracker",
            "track my budget",
            "expense tracker",
            "money management",
            "personal finance",
        ],
    },
    CuratedTemplate {
        id: "expense-tracker",
        name: "💸 Expense Tracker",
        description: "Log every expense and see where the money goes.",
        category: "Finance",
        icon: "💸",
        tags: &["expenses", "spending", "money"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "expense tracker",
            "track expenses",
            "spending tracker",
            "expense management",
        ],
    },
    CuratedTemplate {
        id: "investment-tracker",
        name: "📈 Investment Tracker",
        description: "Follow holdings, allocation and returns across accounts.",
        category: "Finance",
        icon: "📈",
        tags: &["investments", "portfolio", "stocks"],
        is_pro: true,
        price: 9.0,
        prompts: &[
            "investment tracker",
            "track investments",
            "portfolio tracker",
            "stock tracker",
        ],
    },
    // Health & Fitness
    CuratedTemplate {
        id: "workout-tracker",
        name: "💪 Workout Tracker",
        description: "Plan sessions and log sets, reps and personal records.",
        category: "Health & Fitness",
        icon: "💪",
        tags: &["workout", "fitness", "gym", "exercise"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "workout tracker",
            "gym tracker",
            "exercise log",
            "fitness tracker",
            "workout planner",
        ],
    },
    CuratedTemplate {
        id: "meal-planner",
        name: "🥗 Meal Planner",
        description: "Weekly meal plans, recipes and a shopping list.",
        category: "Health & Fitness",
        icon: "🥗",
        tags: &["meals", "recipes", "nutrition", "food"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "meal planner",
            "meal prep",
            "recipe tracker",
            "food planner",
            "nutrition tracker",
        ],
    },
    CuratedTemplate {
        id: "weight-tracker",
        name: "⚖️ Weight Tracker",
        description: "Track weight and body measurements against your goals.",
        category: "Health & Fitness",
        icon: "⚖️",
        tags: &["weight", "health", "measurements"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "weight tracker",
            "weight loss tracker",
            "fitness goals",
            "body measurements",
        ],
    },
    // Content Creation
    CuratedTemplate {
        id: "content-calendar",
        name: "📅 Content Calendar",
        description: "Plan, schedule and publish content across channels.",
        category: "Content Creation",
        icon: "📅",
        tags: &["content", "calendar", "social", "editorial"],
        is_pro: true,
        price: 12.0,
        prompts: &[
            "content calendar",
            "content planner",
            "social media calendar",
            "editorial calendar",
            "content schedule",
        ],
    },
    CuratedTemplate {
        id: "blog-manager",
        name: "✍️ Blog Manager",
        description: "Move posts from idea to draft to published.",
        category: "Content Creation",
        icon: "✍️",
        tags: &["blog", "writing", "posts"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "blog manager",
            "blog tracker",
            "article tracker",
            "blog post planner",
        ],
    },
    // Business
    CuratedTemplate {
        id: "crm",
        name: "🤝 Simple CRM",
        description: "Contacts, deals and follow-ups in one pipeline.",
        category: "Business",
        icon: "🤝",
        tags: &["crm", "clients", "sales", "leads"],
        is_pro: true,
        price: 15.0,
        prompts: &[
            "crm",
            "customer tracker",
            "client management",
            "sales tracker",
            "lead tracker",
        ],
    },
    CuratedTemplate {
        id: "inventory-tracker",
        name: "📦 Inventory Tracker",
        description: "Stock levels, suppliers and reorder points.",
        category: "Business",
        icon: "📦",
        tags: &["inventory", "stock", "products"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "inventory tracker",
            "stock management",
            "product inventory",
            "warehouse tracker",
        ],
    },
    // Education
    CuratedTemplate {
        id: "study-planner",
        name: "📚 Study Planner",
        description: "Courses, assignments and exam dates in one place.",
        category: "Education",
        icon: "📚",
        tags: &["study", "courses", "learning"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "study planner",
            "study tracker",
            "course tracker",
            "learning tracker",
            "class schedule",
        ],
    },
    CuratedTemplate {
        id: "book-tracker",
        name: "📖 Book Tracker",
        description: "A reading list with ratings, quotes and notes.",
        category: "Education",
        icon: "📖",
        tags: &["books", "reading", "library"],
        is_pro: false,
        price: 0.0,
        prompts: &["book tracker", "reading list", "book log", "reading tracker"],
    },
    // Travel
    CuratedTemplate {
        id: "travel-planner",
        name: "✈️ Travel Planner",
        description: "Itineraries, bookings and packing lists for every trip.",
        category: "Travel",
        icon: "✈️",
        tags: &["travel", "trips", "itinerary"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "travel planner",
            "trip planner",
            "vacation planner",
            "itinerary tracker",
        ],
    },
    // Personal
    CuratedTemplate {
        id: "journal",
        name: "📓 Daily Journal",
        description: "Daily entries with mood and gratitude prompts.",
        category: "Personal",
        icon: "📓",
        tags: &["journal", "gratitude", "mood", "reflection"],
        is_pro: false,
        price: 0.0,
        prompts: &[
            "journal",
            "daily journal",
            "gratitude journal",
            "diary",
            "reflection journal",
        ],
    },
];
