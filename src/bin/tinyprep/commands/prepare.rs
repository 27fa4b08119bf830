use anyhow::{Context, Result};
use tinyprep::io::{read_table, stats_path_for, write_stats, write_table};
use tinyprep::pipeline::FilterConfig;
use tinyprep::{PipelineBuilder, PipelineConfig, TableStats};

use crate::cli::{AnnotatorKind, PrepareArgs};

const DEFAULT_MAX_GRADE: f64 = 8.0;

/// Start from `--config` (or defaults) and apply flag overrides.
fn resolve_config(args: &PrepareArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(column) = &args.text_column {
        config.text_field = column.clone();
    }
    if let Some(path) = &args.synonyms {
        config.synonyms = Some(path.clone());
    }
    config.normalize &= !args.no_normalize;
    config.dedup &= !args.no_dedup;
    config.preserve_case &= !args.no_preserve_case;

    let keywords: Vec<String> = args
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        config.filters.push(FilterConfig::Keyword { keywords });
    }

    if args.no_max_grade {
        config
            .filters
            .retain(|f| !matches!(f, FilterConfig::Readability { .. }));
    } else if let Some(max_grade) = args.max_grade {
        config.filters.push(FilterConfig::Readability { max_grade });
    } else if args.config.is_none() {
        config.filters.push(FilterConfig::Readability {
            max_grade: DEFAULT_MAX_GRADE,
        });
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "gemini")]
fn gemini_annotator(args: &PrepareArgs) -> Result<Box<dyn tinyprep::Annotator>> {
    use std::sync::Arc;
    use tinyprep::TopicClassifier;
    use tinyprep::annotate::GeminiBackend;

    if args.api_key.is_none() {
        log::warn!("--api-key not provided; reading GOOGLE_API_KEY from the environment");
    }
    let backend = GeminiBackend::from_env_or(args.api_key.clone())
        .context("failed to initialize Gemini annotator")?
        .model(args.gemini_model.clone());
    log::info!("added Gemini annotator with model {}", args.gemini_model);
    Ok(Box::new(TopicClassifier::new(Arc::new(backend))))
}

#[cfg(not(feature = "gemini"))]
fn gemini_annotator(_args: &PrepareArgs) -> Result<Box<dyn tinyprep::Annotator>> {
    anyhow::bail!("this build of tinyprep has no Gemini support; rebuild with `--features gemini`")
}

pub fn run(args: PrepareArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let mut builder = PipelineBuilder::from_config(config.clone());
    if let Some(AnnotatorKind::Gemini) = args.annotate {
        builder = builder.annotator(gemini_annotator(&args)?);
    }
    let pipeline = builder.build().context("failed to set up pipeline")?;

    let table = read_table(&args.input, &config.text_field)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let output = pipeline.process(table)?;

    write_table(&output.table, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("{}", output.report);
    if !args.no_stats {
        let stats_path = stats_path_for(&args.output);
        let stats = TableStats::compute(&output.table, &config.text_field);
        write_stats(&stats, &stats_path)
            .with_context(|| format!("failed to write {}", stats_path.display()))?;
        println!("Stats: {}", stats_path.display());
    }
    println!("Output: {}", args.output.display());
    Ok(())
}
