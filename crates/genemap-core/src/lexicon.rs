//! Fixed word classes shared by the normalizer, the pair features and the
//! candidate filter. All entries are lower-case, matching normalized text.

/// Greek letter names.
pub const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi",
    "chi", "psi", "omega",
];

/// Greek names long enough to be split off a glued letter run ("TNFalpha").
/// Longest first so "theta" wins over a shorter tail.
pub const GREEK_SUFFIXES: &[&str] = &[
    "omicron", "epsilon", "upsilon", "lambda", "alpha", "gamma", "delta", "theta", "kappa",
    "sigma", "omega", "beta", "zeta", "iota",
];

/// Unicode greek small and capital letters and their spelled-out names.
pub const GREEK_CHARS: &[(char, &str)] = &[
    ('α', "alpha"), ('β', "beta"), ('γ', "gamma"), ('δ', "delta"), ('ε', "epsilon"),
    ('ζ', "zeta"), ('η', "eta"), ('θ', "theta"), ('ι', "iota"), ('κ', "kappa"),
    ('λ', "lambda"), ('μ', "mu"), ('ν', "nu"), ('ξ', "xi"), ('ο', "omicron"), ('π', "pi"),
    ('ρ', "rho"), ('σ', "sigma"), ('ς', "sigma"), ('τ', "tau"), ('υ', "upsilon"),
    ('φ', "phi"), ('χ', "chi"), ('ψ', "psi"), ('ω', "omega"),
    ('Α', "alpha"), ('Β', "beta"), ('Γ', "gamma"), ('Δ', "delta"), ('Ε', "epsilon"),
    ('Ζ', "zeta"), ('Η', "eta"), ('Θ', "theta"), ('Ι', "iota"), ('Κ', "kappa"),
    ('Λ', "lambda"), ('Μ', "mu"), ('Ν', "nu"), ('Ξ', "xi"), ('Ο', "omicron"), ('Π', "pi"),
    ('Ρ', "rho"), ('Σ', "sigma"), ('Τ', "tau"), ('Υ', "upsilon"), ('Φ', "phi"),
    ('Χ', "chi"), ('Ψ', "psi"), ('Ω', "omega"),
];

/// Descriptor words split off only when glued after an upper-case letter.
pub const DESCRIPTOR_SUFFIXES: &[&str] = &["chaperone", "related", "high", "low"];

/// Words dropped from a normalized term.
pub const TERM_STOPWORDS: &[&str] = &["of", "the", "for", "and", "or", "isoform", "isoforms"];

/// Functional role words ("IL-2 receptor", "TNF inhibitor").
pub const MODIFIERS: &[&str] = &[
    "receptor", "transporter", "regulator", "inhibitor", "activator", "suppressor", "enhancer",
    "repressor", "adaptor", "adapter", "interactor", "modulator", "mediator", "inducer",
    "effector", "coactivator", "integrator", "facilitator", "binder", "terminator", "acceptor",
    "proactivator", "exchanger", "responder", "modifier", "ligand", "cofactor", "transporting",
    "regulating", "inhibiting", "activating", "suppressing", "enhancing", "repressing",
    "adapting", "interacting", "modulating", "mediating", "inducing", "effecting",
    "coactivating", "integrating", "facilitating", "binding", "terminating", "accepting",
    "responding", "proactivating", "exchanging", "modifying", "coreceptor", "cotransporter",
    "coregulator", "coinhibitor", "cosuppressor", "coenhancer", "corepressor", "coadaptor",
    "cointeractor", "comodulator", "comediator", "coinducer", "coeffector", "cointegrator",
    "cofacilitator", "cobinder", "coterminator", "coacceptor", "coexchanger", "coadapter",
    "coresponder", "comodifier", "coligand",
];

/// Words that say what kind of thing a name denotes, not which one.
pub const NON_DESCRIPTIVE: &[&str] = &[
    "fragment", "antigen", "precursor", "precursors", "protein", "proteins", "chain", "domain",
    "gene", "homolog", "homologue", "isoform", "isolog", "isotype", "motif", "ortholog",
    "product", "sequence", "subtype", "subunit",
];

/// English stopwords removed from context queries.
pub const CONTEXT_STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "be", "became", "because", "become", "becomes", "been", "before",
    "beforehand", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down", "due", "during",
    "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "for", "from", "further", "had",
    "has", "have", "he", "hence", "her", "here", "hereby", "herein", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it",
    "its", "itself", "last", "latter", "least", "less", "many", "may", "me", "meanwhile",
    "might", "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely",
    "neither", "never", "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing",
    "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "rather", "same", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since",
    "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
    "this", "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

pub fn is_greek(token: &str) -> bool {
    GREEK.contains(&token)
}

pub fn is_modifier(token: &str) -> bool {
    MODIFIERS.contains(&token)
}

pub fn is_non_descriptive(token: &str) -> bool {
    NON_DESCRIPTIVE.contains(&token)
}

pub fn is_number(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && token.bytes().any(|b| b.is_ascii_digit())
}

pub fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Single character or digit ("a", "7").
pub fn is_single_char(token: &str) -> bool {
    token.chars().count() == 1
}

/// Greek, modifier or non-descriptive word.
pub fn is_special_word(token: &str) -> bool {
    is_greek(token) || is_modifier(token) || is_non_descriptive(token)
}

pub fn is_context_stopword(token: &str) -> bool {
    CONTEXT_STOPWORDS.contains(&token)
}
