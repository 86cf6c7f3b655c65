// read-only enforcement for model-proposed sql
// a coarse lexical filter, not a parser - a forbidden word inside a quoted
// literal still denies, which over-blocks but never under-blocks

const FORBIDDEN: [&str; 10] = [
    "INSERT", "UPDATE", "DELETE", "ALTER", "DROP", "CREATE", "REPLACE", "TRUNCATE", "GRANT",
    "REVOKE",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied { keyword: &'static str },
}

pub struct Guard;

impl Guard {
    /// Decide whether a statement may reach the database. Matching happens
    /// on an uppercased copy; the original statement is never touched.
    pub fn check(sql: &str) -> Verdict {
        let upper = sql.trim().to_uppercase();

        for keyword in FORBIDDEN {
            if upper.contains(keyword) {
                return Verdict::Denied { keyword };
            }
        }

        Verdict::Allowed
    }
}
