//! Shared fixtures for genemap tests: a small synonym dictionary with
//! ambiguous entries, entry contexts, a hand-weighted scoring model and an
//! annotated abstract.

use genemap_common::GeneTagger;
use serde_json::json;

/// Synonym TSV covering exact, fuzzy, ambiguous and species-prefixed cases.
pub fn sample_dictionary_tsv() -> &'static str {
    "# synonym\tentry_id\ttax_id\n\
     interleukin 2\t3558\t9606\n\
     IL-2\t3558\t9606\n\
     T cell growth factor\t3558\t9606\n\
     IL-3\t3562\t9606\n\
     IL-2 receptor alpha\t3559\t9606\n\
     CD25\t3559\t9606\n\
     CD25\t1111\n\
     TNF alpha\t7124\t9606\n\
     tumor necrosis factor\t7124\t9606\n\
     Hsp70\t944750\t562\n\
     DnaK\t944750\t562\n\
     SCH9\t854418\t4932\n\
     SCH9 protein kinase\t854418\t4932\n"
}

/// `entry_id<TAB>text` descriptions used to break ties.
pub fn sample_contexts_tsv() -> &'static str {
    "3559\tinterleukin 2 receptor alpha chain expressed on activated T cells and regulatory T cells\n\
     1111\tcell wall glycoprotein of flowering plants\n\
     7124\tproinflammatory cytokine secreted by macrophages\n"
}

/// Scoring model JSON with a weight for every feature.
pub fn sample_model_json() -> String {
    json!({
        "bias": -3.0,
        "weights": {
            "same_num": 0.5,
            "same_greek": 0.5,
            "same_alpha": 0.5,
            "same_modifier": 0.2,
            "num_sames": 0.3,
            "num_diffs": -1.5,
            "only_same_number": -2.0,
            "only_same_greek": -2.0,
            "only_same_char": -2.0,
            "only_same_alpha": 0.0,
            "diff_num": -1.0,
            "diff_greek": -1.0,
            "diff_char": -0.5,
            "diff_alpha": -0.5,
            "diff_modifier": -1.0,
            "only_diff_one": 1.0,
            "only_diff_number": -2.0,
            "only_diff_greek_alpha": 1.0,
            "only_diff_greek": -2.0,
            "only_diff_alpha": -0.5,
            "only_diff_modifier": -1.0,
            "only_diff_non_descriptive": 1.5,
            "token_overlap": 6.0,
            "substring": 0.5,
            "transpositions": -0.2,
            "length_diff": -0.3,
            "relative_length": 0.5,
            "char_length_ratio": 0.5,
            "same_mol_weight": 1.0,
            "diff_mol_weight": -2.0,
            "common_bigrams": 0.2
        }
    })
    .to_string()
}

pub const SAMPLE_ABSTRACT: &str = "Human IL-2 binds the IL-2 receptor alpha on activated T cells. \
CD25 is expressed on regulatory T cells. The E. coli DnaK protein and Saccharomyces cerevisiae SCH9 \
protein kinase were purified.";

/// Mentions of [`SAMPLE_ABSTRACT`] as `(begin, end, text, tagger)`.
pub fn sample_mentions() -> Vec<(usize, usize, &'static str, GeneTagger)> {
    let find = |needle: &str, from: usize| -> (usize, usize) {
        let begin = SAMPLE_ABSTRACT[from..]
            .find(needle)
            .map(|i| i + from)
            .unwrap_or_else(|| panic!("{needle:?} not in sample abstract"));
        (begin, begin + needle.len())
    };

    let il2 = find("IL-2", 0);
    let receptor = find("IL-2 receptor alpha", il2.1);
    let receptor_short = find("IL-2", il2.1);
    let cd25 = find("CD25", 0);
    let dnak = find("E. coli DnaK protein", 0);
    let sch9 = find("Saccharomyces cerevisiae SCH9 protein kinase", 0);

    vec![
        (il2.0, il2.1, "IL-2", GeneTagger::Gazetteer),
        (receptor.0, receptor.1, "IL-2 receptor alpha", GeneTagger::StatisticalTagger),
        (receptor_short.0, receptor_short.1, "IL-2", GeneTagger::Gazetteer),
        (cd25.0, cd25.1, "CD25", GeneTagger::Dictionary),
        (dnak.0, dnak.1, "E. coli DnaK protein", GeneTagger::Gazetteer),
        (sch9.0, sch9.1, "Saccharomyces cerevisiae SCH9 protein kinase", GeneTagger::StatisticalTagger),
    ]
}
