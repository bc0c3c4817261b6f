//! Interactive terminal loop
//!
//! Reads one question per line, sends the running transcript through the
//! agent and prints the answer. A failed turn is rolled back so the next
//! question is not built on an unanswered one.

use crate::agent::ChatAgent;
use crate::chat::{ChatMessage, Transcript};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const BANNER: &str = "💬 Mastra 中文聊天助手，输入 exit 结束对话。\n";
pub const PROMPT: &str = "你：";
pub const FAREWELL: &str = "会话结束，再见！👋";
pub const MISSING_KEY_MESSAGE: &str = "❌ 缺少 DEEPSEEK_API_KEY，请在 .env 中配置后再试。";

const EXIT_COMMANDS: &[&str] = &["exit", "quit", "q"];

fn is_exit_command(line: &str) -> bool {
    let lowered = line.to_lowercase();
    EXIT_COMMANDS.contains(&lowered.as_str())
}

/// Run the conversation until an exit command or end of input.
///
/// The conversation goes to `output`, failed turns are reported on `errors`.
/// Returns the final transcript.
pub async fn run<R, W, E>(
    agent: &ChatAgent,
    input: R,
    output: &mut W,
    errors: &mut E,
) -> std::io::Result<Transcript>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    let mut lines = input.lines();
    let mut transcript = Transcript::new();

    writeln!(output, "{BANNER}")?;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        transcript.push(ChatMessage::user(question));

        let result = agent.generate(transcript.messages()).await;
        match result {
            Ok(answer) => {
                writeln!(output, "代理：{answer}\n")?;
                transcript.push(ChatMessage::assistant(answer));
            }
            Err(e) => {
                tracing::error!(error = %e.message, kind = e.kind.as_str(), "Failed to generate answer");
                writeln!(errors, "生成回答失败：{e}\n")?;
                transcript.pop();
            }
        }
    }

    writeln!(output, "{FAREWELL}")?;
    Ok(transcript)
}
