// core logic - the turn engine and its collaborators

mod ai;
mod db;
mod engine;
mod guard;
mod ledger;
mod store;
mod tool;

pub use ai::{Claude, Message, Model, OpenAi, Provider, Role, ToolCall};
pub use db::{Db, QueryResult};
pub use engine::{Engine, TurnOutput};
pub use guard::{Guard, Verdict};
pub use ledger::Ledger;
pub use store::ConversationStore;
pub use tool::{QueryRunner, SqlTool, TOOL_NAME};
