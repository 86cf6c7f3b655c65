// per-turn record of which sql statements the model asked to run
// display only - a fresh ledger per turn is what separates "new this turn"
// from the thread's full history

use std::collections::HashSet;

use super::ai::ToolCall;
use super::tool::TOOL_NAME;

#[derive(Default)]
pub struct Ledger {
    seen: HashSet<String>,
    queries: Vec<String>,
}

impl Ledger {
    /// Record the sql queries from a batch of tool calls. Calls for other
    /// tools or without a query argument are ignored; duplicate query text
    /// keeps only the first occurrence.
    pub fn record(&mut self, calls: &[ToolCall]) {
        for call in calls {
            if call.name != TOOL_NAME {
                continue;
            }
            if let Some(query) = call.query() {
                if self.seen.insert(query.to_string()) {
                    self.queries.push(query.to_string());
                }
            }
        }
    }

    pub fn into_queries(self) -> Vec<String> {
        self.queries
    }
}
