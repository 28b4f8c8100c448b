//! Follow-up Q&A
//!
//! Answers questions about a completed research report. Deliberately
//! separate from the research pipeline: no tools, no streaming, just the
//! report as context plus the conversation so far.

use crate::llm::LLMClient;
use crate::types::Result;

const FALLBACK_RESPONSE: &str = "I couldn't generate a response.";

fn system_prompt(report: &str) -> String {
    format!(
        r#"You are a knowledgeable research assistant. The user has received a research report and is now asking follow-up questions about it.

Use the report below as your primary context to answer accurately and concisely. YOUR RESPONSE MUST NOT EXCEED 5 SENTENCES. If the user's question goes beyond the report content, you may provide general knowledge, but clearly indicate when you are doing so.

--- RESEARCH REPORT ---
{report}
--- END REPORT ---"#
    )
}

/// Answers a follow-up question grounded in a completed report.
///
/// `history` carries stored `(role, content)` rows in conversation order;
/// the stored `agent` role maps to the API's `assistant` role and
/// anything else maps to `user`.
pub async fn ask_follow_up(
    llm: &dyn LLMClient,
    report: &str,
    history: &[(String, String)],
    question: &str,
) -> Result<String> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(("system".to_string(), system_prompt(report)));

    for (role, content) in history {
        let role = if role == "agent" { "assistant" } else { "user" };
        messages.push((role.to_string(), content.clone()));
    }

    messages.push(("user".to_string(), question.to_string()));

    let answer = llm.generate_with_history(&messages).await?;
    if answer.is_empty() {
        return Ok(FALLBACK_RESPONSE.to_string());
    }
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: Result<String>,
        captured: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                captured: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(AppError::LLM(message.to_string())),
                captured: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            unimplemented!("follow-up only uses history generation")
        }

        async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
            *self.captured.lock().unwrap() = messages.to_vec();
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(AppError::LLM(msg)) => Err(AppError::LLM(msg.clone())),
                Err(_) => unreachable!(),
            }
        }

        async fn stream_with_system(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<crate::llm::TextStream> {
            unimplemented!("follow-up does not stream")
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn builds_system_history_question_message_order() {
        let client = ScriptedClient::replying("The report says X.");
        let history = vec![
            ("user".to_string(), "first question".to_string()),
            ("agent".to_string(), "first answer".to_string()),
        ];

        let answer = ask_follow_up(&client, "REPORT BODY", &history, "second question")
            .await
            .unwrap();
        assert_eq!(answer, "The report says X.");

        let messages = client.captured.lock().unwrap().clone();
        assert_eq!(messages.len(), 4);

        assert_eq!(messages[0].0, "system");
        assert!(messages[0].1.contains("--- RESEARCH REPORT ---\nREPORT BODY\n--- END REPORT ---"));

        assert_eq!(messages[1], ("user".to_string(), "first question".to_string()));
        // Stored "agent" role becomes the API "assistant" role
        assert_eq!(
            messages[2],
            ("assistant".to_string(), "first answer".to_string())
        );
        assert_eq!(
            messages[3],
            ("user".to_string(), "second question".to_string())
        );
    }

    #[tokio::test]
    async fn empty_reply_becomes_fallback_text() {
        let client = ScriptedClient::replying("");
        let answer = ask_follow_up(&client, "report", &[], "question")
            .await
            .unwrap();
        assert_eq!(answer, "I couldn't generate a response.");
    }

    #[tokio::test]
    async fn llm_errors_propagate() {
        let client = ScriptedClient::failing("rate limited");
        let result = ask_follow_up(&client, "report", &[], "question").await;
        assert!(matches!(result, Err(AppError::LLM(_))));
    }
}
