// the turn engine - drives one user input through model and tool exchanges
//
// one turn: append the user message, then loop. the model either answers
// (done) or asks for tool calls; every tool call is answered in emission
// order before the model is consulted again. history is append-only, so a
// failed turn keeps any tool results that already ran.

use super::ai::{Message, Model, ToolCall};
use super::ledger::Ledger;
use super::store::ConversationStore;
use super::tool::{SqlTool, TOOL_NAME};
use crate::Error;

const DEFAULT_MAX_CYCLES: usize = 10;

const SYSTEM_PROMPT: &str = r#"You are a careful SQL analyst.

Rules:
- Think step-by-step.
- When you need data, call the tool `execute_sql` with ONE SELECT query.
- Read-only only; no INSERT/UPDATE/DELETE/ALTER/DROP/CREATE/REPLACE/TRUNCATE.
- Limit to 5 rows unless the user explicitly asks otherwise.
- If the tool returns 'Error:', revise the SQL and try again.
- Prefer explicit column lists; avoid SELECT *.
- Use proper syntax for the database dialect (e.g. LIMIT, not TOP)."#;

/// What one completed turn produced: the final reply plus the distinct
/// queries executed during this turn (and only this turn).
#[derive(Debug)]
pub struct TurnOutput {
    pub reply: String,
    pub queries: Vec<String>,
}

enum TurnState {
    AwaitingModel,
    AwaitingTool(Vec<ToolCall>),
    Done(String),
}

pub struct Engine {
    model: Box<dyn Model>,
    tool: SqlTool,
    store: ConversationStore,
    system: String,
    max_cycles: usize,
}

impl Engine {
    pub fn new(model: Box<dyn Model>, tool: SqlTool, schema: &str) -> Self {
        let system = if schema.is_empty() {
            SYSTEM_PROMPT.to_string()
        } else {
            format!("{SYSTEM_PROMPT}\n\nDatabase schema:\n{schema}")
        };

        Self {
            model,
            tool,
            store: ConversationStore::new(),
            system,
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }

    /// Bound on model invocations per turn, in case the model keeps asking
    /// for tools without converging.
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Run one full turn on a thread. A returned error means the turn
    /// failed (model fault or cycle limit); everything appended so far
    /// stays in history.
    pub async fn run_turn(&mut self, thread_id: &str, input: &str) -> Result<TurnOutput, Error> {
        self.store.append(thread_id, Message::user(input));

        let mut ledger = Ledger::default();
        let mut cycles = 0;
        let mut state = TurnState::AwaitingModel;

        loop {
            state = match state {
                TurnState::AwaitingModel => {
                    cycles += 1;
                    if cycles > self.max_cycles {
                        return Err(Error::TooManyCycles(self.max_cycles));
                    }

                    // a fault here appends nothing; the turn just fails
                    let reply = self
                        .model
                        .complete(&self.system, self.store.history(thread_id))
                        .await?;

                    if reply.tool_calls.is_empty() {
                        let content = reply.content.clone();
                        self.store.append(thread_id, reply);
                        TurnState::Done(content)
                    } else {
                        let calls = reply.tool_calls.clone();
                        self.store.append(thread_id, reply);
                        TurnState::AwaitingTool(calls)
                    }
                }

                TurnState::AwaitingTool(calls) => {
                    ledger.record(&calls);

                    // strictly sequential, in the order the model emitted
                    // them - each result lands in history before the next
                    // model invocation
                    for call in calls {
                        let result = self.answer_call(&call).await;
                        self.store
                            .append(thread_id, Message::tool_result(call.id, result));
                    }

                    TurnState::AwaitingModel
                }

                TurnState::Done(reply) => {
                    return Ok(TurnOutput {
                        reply,
                        queries: ledger.into_queries(),
                    });
                }
            };
        }
    }

    // protocol violations become in-band errors so the model can
    // self-correct on the next cycle
    async fn answer_call(&self, call: &ToolCall) -> String {
        if call.name != TOOL_NAME {
            return format!("Error: unknown tool '{}'. Only '{TOOL_NAME}' is available.", call.name);
        }

        match call.query() {
            Some(query) => self.tool.execute(query).await,
            None => "Error: missing required string argument 'query'.".to_string(),
        }
    }
}
