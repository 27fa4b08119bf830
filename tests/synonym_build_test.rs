use std::fs;

use tempfile::TempDir;

use tinyprep::lexicon::{BuildConfig, DifficultyIndex, Provenance, SynonymMapBuilder, Thesaurus};
use tinyprep::{MapFormat, SynonymMap, SynonymMapper};

const WORDLIST: &str = "\
headword,CEFR
utilize,C1
use,A1
purchase,B2
buy,A1
acquire,C1
get,A1
obtain,B2
gain,A2
running,B2
run,A1
notional,C2
a,A1
";

const THESAURUS: &str = r#"{
    "acquire": [[{"name": "get", "count": 20}, {"name": "gain", "count": 5}]],
    "purchase": [[{"name": "get", "count": 100}]],
    "notional": [[{"name": "theoretical", "count": 2}]]
}"#;

fn index() -> DifficultyIndex {
    DifficultyIndex::from_csv_reader(WORDLIST.as_bytes()).unwrap()
}

#[test]
fn test_build_resolves_each_strategy() -> tinyprep::Result<()> {
    let index = index();
    let thesaurus = Thesaurus::from_json_reader(THESAURUS.as_bytes())?;
    let output = SynonymMapBuilder::new(&index)
        .synonym_source(&thesaurus)
        .build()?;

    let pairs: Vec<(&str, &str)> = output.map.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("acquire", "get"),
            ("obtain", "get"),
            ("purchase", "buy"),
            ("running", "run"),
            ("utilize", "use"),
        ]
    );

    // Manual table beats the thesaurus' higher-frequency "get".
    assert_eq!(output.provenance["purchase"], Provenance::Manual);
    assert_eq!(output.provenance["acquire"], Provenance::LexicalDatabase);
    assert_eq!(output.provenance["running"], Provenance::HeuristicFallback);
    assert_eq!(output.unmapped, vec!["notional".to_string()]);

    assert_eq!(output.stats.total_targets, 6);
    assert_eq!(output.stats.mapped, 5);
    assert_eq!(output.stats.non_target_manual, 0);
    assert!(output.stats.to_report().contains("Mapped: 5 (83.33%)\n"));
    assert_eq!(output.stats.count(Provenance::Manual), 3);
    assert!(output.stats.lexical_database_used);
    Ok(())
}

#[test]
fn test_build_is_deterministic() -> tinyprep::Result<()> {
    let index = index();
    let thesaurus = Thesaurus::from_json_reader(THESAURUS.as_bytes())?;
    let first = SynonymMapBuilder::new(&index)
        .synonym_source(&thesaurus)
        .build()?;
    let second = SynonymMapBuilder::new(&index)
        .synonym_source(&thesaurus)
        .build()?;
    assert_eq!(first.map, second.map);
    assert_eq!(first.unmapped, second.unmapped);
    Ok(())
}

#[test]
fn test_without_thesaurus_falls_back() -> tinyprep::Result<()> {
    let index = index();
    let output = SynonymMapBuilder::new(&index).build()?;
    assert!(!output.map.contains("acquire"));
    assert_eq!(output.map.get("running"), Some("run"));
    assert!(!output.stats.lexical_database_used);
    Ok(())
}

#[test]
fn test_include_b1_widens_targets() -> tinyprep::Result<()> {
    let wordlist = format!("{WORDLIST}jumped,B1\njump,A1\n");
    let index = DifficultyIndex::from_csv_reader(wordlist.as_bytes())?;

    let default = SynonymMapBuilder::new(&index).build()?;
    assert!(!default.map.contains("jumped"));

    let config = BuildConfig {
        include_b1: true,
        ..Default::default()
    };
    let widened = SynonymMapBuilder::new(&index).config(config).build()?;
    assert_eq!(widened.map.get("jumped"), Some("jump"));
    Ok(())
}

#[test]
fn test_artifacts_round_trip() -> tinyprep::Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("synmap");

    let index = index();
    let thesaurus = Thesaurus::from_json_reader(THESAURUS.as_bytes())?;
    let output = SynonymMapBuilder::new(&index)
        .synonym_source(&thesaurus)
        .build()?;
    output.write_to_dir(&out_dir)?;

    let from_json = SynonymMap::load(out_dir.join("synonyms.json"))?;
    let from_csv = SynonymMap::load(out_dir.join("synonyms.csv"))?;
    assert_eq!(from_json, output.map);
    assert_eq!(from_csv, output.map);

    let csv = fs::read_to_string(out_dir.join("synonyms.csv"))?;
    assert!(csv.starts_with("from,to,source,from_cefr,to_cefr\n"));
    assert!(csv.contains("acquire,get,lexical-database,C1,A1"));

    let unmapped = fs::read_to_string(out_dir.join("unmapped.txt"))?;
    assert_eq!(unmapped, "notional\n");

    let report = fs::read_to_string(out_dir.join("build_stats.txt"))?;
    assert!(report.contains("Unmapped: 1"));

    // The persisted map drives the mapper like the in-memory one.
    let mapper = SynonymMapper::new(&from_json);
    assert_eq!(mapper.simplify("We ACQUIRE and Purchase."), "We GET and Buy.");
    Ok(())
}

#[test]
fn test_saved_csv_map_loads_positionally_without_headers_named_from_to() -> tinyprep::Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.csv");
    fs::write(&path, "word,simple\nUtilize,use\n")?;
    let map = SynonymMap::load(&path)?;
    assert_eq!(map.get("utilize"), Some("use"));

    let saved = temp_dir.path().join("nested/dir/map.json");
    map.save(&saved, MapFormat::KeyedDocument)?;
    assert_eq!(SynonymMap::load(&saved)?, map);
    Ok(())
}
