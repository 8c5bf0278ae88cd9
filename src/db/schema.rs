pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS install (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    installed_at TEXT NOT NULL
);
";
