pub const SCHEMA: &str = r#"
-- saved articles; ids are kept dense from 1 by compaction after deletes
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY,
    date TIMESTAMP,
    title TEXT,
    url TEXT
);
"#;
