//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the tracker database.
pub const SCHEMA: &str = r#"
-- Flashcards under spaced repetition. `seq` preserves insertion order.
-- Dates are day numbers counted from 0001-01-01 (day 1).
CREATE TABLE IF NOT EXISTS cards (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    question TEXT NOT NULL,
    answer TEXT,
    tags TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    stage INTEGER NOT NULL DEFAULT 0,
    next_due INTEGER NOT NULL,
    last_result TEXT NOT NULL DEFAULT 'none'
);

-- Logged study sessions
CREATE TABLE IF NOT EXISTS study_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date INTEGER NOT NULL,
    period TEXT NOT NULL,
    topic TEXT NOT NULL,
    recall INTEGER NOT NULL DEFAULT 0,
    new_material INTEGER NOT NULL DEFAULT 0,
    practice INTEGER NOT NULL DEFAULT 0,
    review INTEGER NOT NULL DEFAULT 0,
    feynman INTEGER NOT NULL DEFAULT 0,
    minutes INTEGER NOT NULL DEFAULT 0,
    notes TEXT NOT NULL DEFAULT ''
);

-- Feynman technique notes
CREATE TABLE IF NOT EXISTS feynman_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date INTEGER NOT NULL,
    concept TEXT NOT NULL,
    explanation TEXT NOT NULL,
    analogy TEXT NOT NULL DEFAULT '',
    clarity INTEGER NOT NULL
);

-- Weekly reflections
CREATE TABLE IF NOT EXISTS reflections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    week_start INTEGER NOT NULL,
    understood TEXT NOT NULL DEFAULT '',
    confused TEXT NOT NULL DEFAULT '',
    next_plan TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_cards_due ON cards(next_due, id);
CREATE INDEX IF NOT EXISTS idx_sessions_date ON study_sessions(date);
"#;

/// Record the schema version if not yet recorded.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
