//! Natural-language tabular agent.
//!
//! Each uploaded dataset gets its own agent. The agent seeds the model's
//! system instruction with the ENTIRE rendered table, then answers each
//! prompt with a single completion call. Embedding the full table means
//! every prompt resends the whole upload to the remote model; this is
//! kept for compatibility with the original contract and documented as a
//! known scalability limitation (see DESIGN.md).

use std::sync::Arc;

use tracing::debug;

use crate::dataframe::DataFrame;
use crate::llm::LLM;
use crate::types::{AppResult, LLMMessage, LLMRequest};

const NO_RESPONSE_FALLBACK: &str = "No response from agent.";

pub struct TabularAgent {
    llm: Arc<LLM>,
    model: String,
    system_instruction: String,
}

impl TabularAgent {
    pub fn new(frame: &DataFrame, llm: Arc<LLM>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            system_instruction: build_system_instruction(frame),
        }
    }

    /// Answer a free-text question about the dataset. One prompt in, one
    /// textual answer out; the model call is pinned to temperature 0.
    pub async fn answer(&self, prompt: &str) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: None,
            temperature: Some(0.0),
            system_instruction: Some(self.system_instruction.clone()),
        };

        let response = self.llm.create_chat_completion(&request).await?;
        debug!(
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "agent completion finished"
        );

        if response.content.trim().is_empty() {
            Ok(NO_RESPONSE_FALLBACK.to_string())
        } else {
            Ok(response.content)
        }
    }
}

fn build_system_instruction(frame: &DataFrame) -> String {
    format!(
        "You are a data analyst working with a tabular dataset of {} rows and {} columns.\n\
         Answer the user's questions using only the data below. Be concise and, when a \
         question has a numeric answer, reply with the number.\n\
         This is the entire dataset:\n{}",
        frame.row_count(),
        frame.column_count(),
        frame.to_display_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMAdapter, LLM};
    use crate::types::{AppResult, LLMRequest, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedAdapter {
        reply: String,
        last_request: Mutex<Option<LLMRequest>>,
    }

    impl CannedAdapter {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LLMAdapter for CannedAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(LLMResponse {
                content: self.reply.clone(),
                finish_reason: "STOP".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    fn sample_frame() -> DataFrame {
        DataFrame::from_reader("name,age\nalice,30\nbob,25\ncarol,41\n".as_bytes()).unwrap()
    }

    #[test]
    fn test_system_instruction_embeds_full_table() {
        let instruction = build_system_instruction(&sample_frame());
        assert!(instruction.contains("3 rows and 2 columns"));
        for needle in ["name", "age", "alice", "bob", "carol", "30", "25", "41"] {
            assert!(instruction.contains(needle), "missing {needle}");
        }
    }

    #[tokio::test]
    async fn test_answer_forwards_prompt_and_table() {
        let adapter = Arc::new(CannedAdapter::new("3"));
        let llm = Arc::new(LLM::from_adapter(
            Box::new(ArcAdapter(adapter.clone())),
            "canned",
        ));
        let agent = TabularAgent::new(&sample_frame(), llm, "gemini-1.5-flash");

        let answer = agent.answer("how many rows?").await.unwrap();
        assert_eq!(answer, "3");

        let request = adapter.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "how many rows?");
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.system_instruction.unwrap().contains("alice"));
    }

    #[tokio::test]
    async fn test_blank_completion_falls_back_to_placeholder() {
        let adapter = Arc::new(CannedAdapter::new("  "));
        let llm = Arc::new(LLM::from_adapter(
            Box::new(ArcAdapter(adapter)),
            "canned",
        ));
        let agent = TabularAgent::new(&sample_frame(), llm, "gemini-1.5-flash");

        let answer = agent.answer("anything there?").await.unwrap();
        assert_eq!(answer, NO_RESPONSE_FALLBACK);
    }

    // LLM::from_adapter takes a Box; this shim lets tests keep a handle
    // on the adapter to inspect captured requests.
    struct ArcAdapter(Arc<CannedAdapter>);

    #[async_trait]
    impl LLMAdapter for ArcAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.0.create_chat_completion(request).await
        }
    }
}
