//! `gepa apply`

use crate::config::CliConfig;
use crate::dataset::load_sentences;
use crate::error::CliResult;
use clap::Args;
use gepa_llm::{TaskRunner, TextGenerator};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// File holding the instruction to run
    #[arg(long, default_value = "best_prompt.txt")]
    pub prompt: PathBuf,

    /// Sentences to sanitise (JSON array of strings)
    #[arg(long)]
    pub validation: PathBuf,

    /// Use only the first N sentences
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

pub async fn execute(args: ApplyArgs, config: &CliConfig) -> CliResult<()> {
    let backend = super::backend(config)?;
    let instruction = std::fs::read_to_string(&args.prompt)?;
    println!("Instruction:\n{}\n", instruction);
    println!("{}", "=".repeat(80));

    for (i, (original, sanitized)) in sanitize_all(&args, &instruction, backend)
        .await?
        .into_iter()
        .enumerate()
    {
        println!("\nSentence {}:", i + 1);
        println!("  Original: {}", original);
        println!("  Sanitized: {}", sanitized);
    }
    Ok(())
}

/// `(original, sanitized)` for every selected sentence.
pub async fn sanitize_all(
    args: &ApplyArgs,
    instruction: &str,
    backend: Arc<dyn TextGenerator>,
) -> CliResult<Vec<(String, String)>> {
    let runner = TaskRunner::new(backend);
    let sentences = load_sentences(&args.validation, Some(args.limit))?;
    let mut results = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let sanitized = runner.run(instruction, &sentence).await?;
        results.push((sentence, sanitized));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gepa_llm::ScriptedGenerator;
    use std::io::Write;

    #[tokio::test]
    async fn sanitizes_limited_sentences() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["Ann lives in Oslo", "Bob", "Eve"]"#).unwrap();
        let args = ApplyArgs {
            prompt: PathBuf::from("unused.txt"),
            validation: file.path().to_path_buf(),
            limit: 2,
        };
        let backend = Arc::new(ScriptedGenerator::new([
            r#"{"text": "[NAME] lives in [CITY]"}"#,
            "[NAME]",
        ]));

        let results = sanitize_all(&args, "Strip PII.", backend).await.unwrap();
        assert_eq!(
            results,
            vec![
                ("Ann lives in Oslo".to_string(), "[NAME] lives in [CITY]".to_string()),
                ("Bob".to_string(), "[NAME]".to_string()),
            ]
        );
    }
}
