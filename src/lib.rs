// dbchat library - multi-turn chat with your sql database

pub mod cli;
mod core;
mod error;
mod output;
mod server;
mod spinner;

pub use self::core::{
    Claude, ConversationStore, Db, Engine, Guard, Ledger, Message, Model, OpenAi, Provider,
    QueryResult, QueryRunner, Role, SqlTool, ToolCall, TurnOutput, Verdict, TOOL_NAME,
};
pub use error::Error;
pub use server::Server;
