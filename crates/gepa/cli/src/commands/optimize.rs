//! `gepa optimize`

use crate::config::CliConfig;
use crate::dataset::load_sentences;
use crate::error::CliResult;
use clap::Args;
use gepa_engine::{optimize_with_report, Collaborators, OptimizationReport, OptimizerConfig};
use gepa_llm::{JudgeEvaluator, PromptMerger, ReflectiveMutator, TextGenerator, BASE_INSTRUCTION};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Training sentences (JSON array of strings)
    #[arg(long)]
    pub train: PathBuf,

    /// Validation sentences (JSON array of strings)
    #[arg(long)]
    pub validation: PathBuf,

    /// Use only the first N validation sentences
    #[arg(long)]
    pub validation_limit: Option<usize>,

    /// File holding the starting instruction (built-in PII instruction if absent)
    #[arg(long)]
    pub base_prompt: Option<PathBuf>,

    /// Rollout budget
    #[arg(long)]
    pub rollouts: Option<usize>,

    /// Maximum number of merges
    #[arg(long)]
    pub max_merges: Option<usize>,

    /// Training sentences per minibatch
    #[arg(long)]
    pub minibatch_size: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the best instruction
    #[arg(long, default_value = "best_prompt.txt")]
    pub output: PathBuf,

    /// Where to write the JSON run report
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl OptimizeArgs {
    /// File configuration with command-line overrides applied.
    pub fn optimizer_config(&self, base: &OptimizerConfig) -> OptimizerConfig {
        let mut config = base.clone();
        if let Some(n) = self.rollouts {
            config = config.with_rollout_budget(n);
        }
        if let Some(n) = self.max_merges {
            config = config.with_max_merges(n);
        }
        if let Some(n) = self.minibatch_size {
            config = config.with_minibatch_size(n);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

pub async fn execute(args: OptimizeArgs, config: &CliConfig) -> CliResult<()> {
    let backend = super::backend(config)?;
    let report = run(&args, config, backend).await?;

    println!("Best instruction (aggregate {:.3}):", report.best_aggregate);
    println!("{}", "-".repeat(80));
    println!("{}", report.best_candidate);
    println!("{}", "-".repeat(80));
    println!("Saved to {}", args.output.display());
    Ok(())
}

/// Load the datasets, run the optimizer, and persist its results.
pub async fn run(
    args: &OptimizeArgs,
    config: &CliConfig,
    backend: Arc<dyn TextGenerator>,
) -> CliResult<OptimizationReport> {
    let train = load_sentences(&args.train, None)?;
    let validation = load_sentences(&args.validation, args.validation_limit)?;
    let base = match &args.base_prompt {
        Some(path) => std::fs::read_to_string(path)?,
        None => BASE_INSTRUCTION.to_string(),
    };
    let optimizer = args.optimizer_config(&config.optimizer);
    optimizer.validate()?;

    info!(
        train = train.len(),
        validation = validation.len(),
        rollouts = optimizer.rollout_budget,
        "Starting optimization"
    );

    let evaluator = JudgeEvaluator::shared(backend.clone());
    let mutator = ReflectiveMutator::new(backend.clone());
    let merger = PromptMerger::new(backend);
    let report = optimize_with_report(
        base,
        &train,
        &validation,
        Collaborators::new(&evaluator, &mutator, &merger),
        optimizer,
    )
    .await?;

    std::fs::write(&args.output, &report.best_candidate)?;
    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!(path = %path.display(), "Run report written");
    }
    info!(
        best = %report.best_id,
        aggregate = report.best_aggregate,
        improvement = report.improvement(),
        "Optimization complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gepa_llm::ScriptedGenerator;
    use std::io::Write;

    fn json_file(sentences: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(sentences).unwrap()).unwrap();
        file
    }

    fn args(train: &tempfile::NamedTempFile, val: &tempfile::NamedTempFile, dir: &tempfile::TempDir) -> OptimizeArgs {
        OptimizeArgs {
            train: train.path().to_path_buf(),
            validation: val.path().to_path_buf(),
            validation_limit: Some(2),
            base_prompt: None,
            rollouts: Some(2),
            max_merges: None,
            minibatch_size: None,
            seed: Some(1),
            output: dir.path().join("best_prompt.txt"),
            report: Some(dir.path().join("report.json")),
        }
    }

    #[test]
    fn flags_override_file_config() {
        let dir = tempfile::tempdir().unwrap();
        let t = json_file(&["a"]);
        let a = args(&t, &t, &dir);
        let base = OptimizerConfig::default().with_max_merges(9);
        let merged = a.optimizer_config(&base);
        assert_eq!(merged.rollout_budget, 2);
        assert_eq!(merged.seed, 1);
        assert_eq!(merged.max_merges, 9);
        assert_eq!(merged.minibatch_size, 5);
    }

    #[tokio::test]
    async fn run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let train = json_file(&["Ann lives in Oslo", "Bob lives in Rome"]);
        let val = json_file(&["Eve lives in Bern", "Max lives in Graz", "Kim lives in Nice"]);
        let backend = Arc::new(
            ScriptedGenerator::new(Vec::<String>::new())
                .with_rule("Sanitized sentence: ", r#"{"score": 0.5, "feedback": "ok"}"#)
                .with_rule("I provided an assistant", "```\nNew rule\n```")
                .with_fallback(r#"{"text": "[NAME] lives in [CITY]"}"#),
        );
        let a = args(&train, &val, &dir);

        let report = run(&a, &CliConfig::default(), backend).await.unwrap();
        assert_eq!(report.instance_best.len(), 2);
        assert_eq!(report.metrics.rollouts, 2);

        let saved = std::fs::read_to_string(&a.output).unwrap();
        assert_eq!(saved, report.best_candidate);
        assert_eq!(saved, BASE_INSTRUCTION);
        let json = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
        let restored: OptimizationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.best_id, report.best_id);
    }

    #[tokio::test]
    async fn invalid_flags_fail_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let t = json_file(&["a"]);
        let mut a = args(&t, &t, &dir);
        a.minibatch_size = Some(0);
        let backend = Arc::new(ScriptedGenerator::new(Vec::<String>::new()));
        let result = run(&a, &CliConfig::default(), backend.clone()).await;
        assert!(result.is_err());
        assert!(backend.prompts().is_empty());
    }
}
