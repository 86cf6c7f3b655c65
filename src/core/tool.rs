// the execute_sql tool - guard first, then the database
// never returns an error: denials and faults travel back to the model
// as "Error: ..." text so it can revise the sql and try again

use async_trait::async_trait;

use super::guard::{Guard, Verdict};
use crate::Error;

/// The single registered tool name, as the model sees it.
pub const TOOL_NAME: &str = "execute_sql";

/// Whatever actually runs an allowed statement. Production uses `Db`;
/// tests swap in a scripted fake.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run(&self, sql: &str) -> Result<String, Error>;
}

pub struct SqlTool {
    runner: Box<dyn QueryRunner>,
}

impl SqlTool {
    pub fn new(runner: Box<dyn QueryRunner>) -> Self {
        Self { runner }
    }

    /// Run one statement. The guard sees it first; only allowed statements
    /// reach the runner, unmodified.
    pub async fn execute(&self, sql: &str) -> String {
        match Guard::check(sql) {
            Verdict::Denied { keyword } => {
                format!("Error: {keyword} operations are not allowed. This tool is read-only.")
            }
            Verdict::Allowed => match self.runner.run(sql).await {
                Ok(text) => text,
                Err(e) => format!("Error: {e}"),
            },
        }
    }
}
