//! Command handlers wiring config, candidate sources, and the comparison loop.
use crate::candidates::{read_identifier_file, CandidateSource, DEMO_INPUTS};
use crate::cli::{CompareArgs, ConfigArgs, ConfigSelection, NormalizeArgs};
use crate::compare::compare_schemas;
use crate::normalize::{Classification, SchemaNormalizer};
use crate::output::{
    build_report, render_classifications, render_summary, to_json_text, write_json,
    ReportSources,
};
use crate::synonyms::{self, ResolvedConfig, SynonymTable};
use anyhow::Result;
use std::collections::BTreeMap;

fn load_normalizer(selection: &ConfigSelection) -> Result<(SchemaNormalizer, ResolvedConfig)> {
    let resolved = synonyms::resolve_config(selection.config.as_deref())?;
    let normalizer = SchemaNormalizer::new(SynonymTable::from_config(&resolved.config))?;
    Ok((normalizer, resolved))
}

pub fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let (normalizer, _) = load_normalizer(&args.selection)?;
    let classified: Vec<Classification> = args
        .ids
        .iter()
        .map(|id| normalizer.classify(id))
        .collect();
    if !args.json {
        print!("{}", render_classifications(&classified, args.explain));
        return Ok(());
    }
    let text = if args.explain {
        to_json_text(&classified)?
    } else {
        let canonical: BTreeMap<&str, &str> = classified
            .iter()
            .map(|entry| (entry.identifier.as_str(), entry.canonical.as_str()))
            .collect();
        to_json_text(&canonical)?
    };
    print!("{text}");
    Ok(())
}

pub fn run_compare(args: CompareArgs) -> Result<()> {
    let (normalizer, resolved) = load_normalizer(&args.selection)?;
    let inputs = compare_inputs(&args)?;
    let source = candidate_source(&args);
    let candidates = source.fetch()?;

    let outcome = compare_schemas(&normalizer, inputs, candidates);
    let config_origin = resolved.origin.describe();
    let candidate_source = source.describe();
    let report = build_report(
        outcome,
        &ReportSources {
            config_origin: &config_origin,
            candidate_source: &candidate_source,
        },
    )?;

    if let Some(out) = &args.out {
        write_json(out, &report)?;
        if !args.json {
            println!("wrote {}", out.display());
        }
    }
    if args.json {
        print!("{}", to_json_text(&report)?);
    } else {
        print!("{}", render_summary(&report));
    }
    Ok(())
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    if args.stub {
        println!("{}", synonyms::config_stub()?);
        return Ok(());
    }
    let resolved = synonyms::resolve_config(args.selection.config.as_deref())?;
    let config = &resolved.config;
    println!("config: {}", resolved.origin.describe());
    println!("schema_version: {}", config.schema_version);
    for (label, table) in [
        ("core", &config.core_synonyms),
        ("env", &config.env_synonyms),
    ] {
        for (canonical, variations) in table.iter() {
            let shown: Vec<String> = variations.iter().map(|v| format!("{v:?}")).collect();
            println!("{label} {canonical}: {}", shown.join(", "));
        }
    }
    Ok(())
}

fn compare_inputs(args: &CompareArgs) -> Result<Vec<String>> {
    if let Some(path) = &args.inputs_file {
        return read_identifier_file(path);
    }
    if !args.inputs.is_empty() {
        return Ok(args.inputs.clone());
    }
    tracing::info!("no inputs given; using demo inputs");
    Ok(DEMO_INPUTS.iter().map(|id| id.to_string()).collect())
}

fn candidate_source(args: &CompareArgs) -> CandidateSource {
    if let Some(path) = &args.candidates_file {
        CandidateSource::File(path.clone())
    } else if let Some(command) = &args.candidates_command {
        CandidateSource::Command(command.clone())
    } else {
        CandidateSource::Mock
    }
}
