use anyhow::{Context, Result};
use log::info;
use tinyprep::lexicon::level::parse_levels;
use tinyprep::lexicon::{BuildConfig, DifficultyIndex, SynonymMapBuilder, Thesaurus};

use crate::cli::BuildSynmapArgs;

pub fn run(args: BuildSynmapArgs) -> Result<()> {
    let config = BuildConfig {
        easy_levels: parse_levels(&args.easy_levels).context("invalid --easy-levels")?,
        difficult_levels: parse_levels(&args.difficult_levels)
            .context("invalid --difficult-levels")?,
        include_b1: args.include_b1,
        allow_multiword: args.allow_multiword,
        alpha_only: args.alpha_only,
    };

    let index = DifficultyIndex::from_csv_path(&args.wordlist)
        .with_context(|| format!("failed to load wordlist {}", args.wordlist.display()))?;

    let thesaurus = match &args.thesaurus {
        Some(path) => Some(
            Thesaurus::from_json_path(path)
                .with_context(|| format!("failed to load thesaurus {}", path.display()))?,
        ),
        None => {
            info!("no thesaurus given; using manual overrides and heuristic fallback only");
            None
        }
    };

    let mut builder = SynonymMapBuilder::new(&index).config(config);
    if let Some(thesaurus) = &thesaurus {
        builder = builder.synonym_source(thesaurus);
    }
    let output = builder.build()?;
    output
        .write_to_dir(&args.out_dir)
        .with_context(|| format!("failed to write {}", args.out_dir.display()))?;

    println!("{}", output.stats.to_report());
    println!("Artifacts written to {}", args.out_dir.display());
    Ok(())
}
