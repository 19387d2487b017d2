//! End-to-end mapping of an annotated abstract.
//!
//! Run with:
//! ```bash
//! cargo test --package genemap-core --test test_mapping_e2e -- --nocapture
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use genemap_core::{
    GeneDocument, GeneMapper, GeneMention, GeneTagger, MapperConfig, ScoringModel, SynonymDictionary,
};
use genemap_test_utils::{
    sample_contexts_tsv, sample_dictionary_tsv, sample_mentions, sample_model_json, SAMPLE_ABSTRACT,
};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample_document() -> GeneDocument {
    let mentions = sample_mentions()
        .into_iter()
        .map(|(begin, end, text, tagger)| GeneMention::new(begin, end, text, tagger))
        .collect();
    GeneDocument::new(SAMPLE_ABSTRACT).with_mentions(mentions).unwrap()
}

fn sample_mapper() -> GeneMapper {
    let mut dictionary = SynonymDictionary::from_tsv(sample_dictionary_tsv()).unwrap();
    dictionary.load_contexts_tsv(sample_contexts_tsv()).unwrap();
    let model = ScoringModel::from_json(&sample_model_json()).unwrap();
    GeneMapper::new(MapperConfig::default(), Arc::new(dictionary), Arc::new(model)).unwrap()
}

fn resolved(doc: &GeneDocument) -> Vec<(&str, Option<&str>, Option<&str>)> {
    doc.mentions()
        .iter()
        .map(|m| {
            let r = m.resolution.as_ref();
            (
                m.text.as_str(),
                r.map(|r| r.entry_id.as_str()),
                r.and_then(|r| r.tax_id.as_deref()),
            )
        })
        .collect()
}

#[test]
fn test_map_sample_abstract() {
    init_tracing();
    let mapper = sample_mapper();
    let mut doc = sample_document();

    let stats = mapper.map_document(&mut doc);

    println!("\n=== Mapping Result ===");
    println!("{}", serde_json::to_string_pretty(&stats).unwrap());

    assert_eq!(stats.mentions_in, 6);
    assert_eq!(stats.species_trimmed, 2);
    assert_eq!(stats.unified_away, 1);
    assert_eq!(stats.resolved, 5);
    assert_eq!(stats.unresolved, 0);

    assert_eq!(
        resolved(&doc),
        vec![
            ("IL-2", Some("3558"), Some("9606")),
            ("IL-2 receptor alpha", Some("3559"), Some("9606")),
            ("CD25", Some("3559"), Some("9606")),
            ("DnaK protein", Some("944750"), Some("562")),
            ("SCH9 protein kinase", Some("854418"), Some("4932")),
        ]
    );

    let dnak = &doc.mentions()[3];
    assert_eq!(&SAMPLE_ABSTRACT[dnak.begin..dnak.end], "DnaK protein");
    assert_eq!(dnak.tax_id_hint.as_deref(), Some("562"));

    let receptor = &doc.mentions()[1];
    assert_eq!(receptor.tagger, GeneTagger::StatisticalTagger);
}

#[test]
fn test_mapping_is_input_order_independent() {
    let mapper = sample_mapper();
    let mut forward = sample_document();

    let mut reversed_mentions = sample_document().into_mentions();
    reversed_mentions.reverse();
    let mut reversed = GeneDocument::new(SAMPLE_ABSTRACT)
        .with_mentions(reversed_mentions)
        .unwrap();

    mapper.map_document(&mut forward);
    mapper.map_document(&mut reversed);
    assert_eq!(resolved(&forward), resolved(&reversed));
}

#[test]
fn test_batch_matches_single() {
    let mapper = sample_mapper();
    let mut single = sample_document();
    mapper.map_document(&mut single);

    let mut batch: Vec<GeneDocument> = (0..16).map(|_| sample_document()).collect();
    let stats = mapper.map_documents(&mut batch);

    assert_eq!(stats.len(), 16);
    for doc in &batch {
        assert_eq!(resolved(doc), resolved(&single));
    }
}

#[test]
fn test_from_config_files() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    };

    let dictionary = write("synonyms.tsv", sample_dictionary_tsv());
    let contexts = write("contexts.tsv", sample_contexts_tsv());
    let model = write("model.json", &sample_model_json());
    let config = write(
        "genemap.yaml",
        &format!(
            "dictionary:\n  path: {}\n  contexts_path: {}\nmodel:\n  path: {}\nunification:\n  policy:\n    type: prioritize_tagger\n    priority_tagger: STATISTICAL_TAGGER\n",
            dictionary.display(),
            contexts.display(),
            model.display()
        ),
    );

    let config = MapperConfig::from_yaml(config.to_str().unwrap()).unwrap();
    let mapper = GeneMapper::from_config(&config).unwrap();
    assert_eq!(mapper.dictionary().len(), 13);

    let mut doc = sample_document();
    let stats = mapper.map_document(&mut doc);
    assert_eq!(stats.resolved, 5);
}
