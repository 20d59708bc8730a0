//! End-to-end tests over the bundled cipher table.
//!
//! Drives the public API the way the surrounding batch pipeline does:
//! tokens in, classified vector, reconstructed sentence, fingerprint and
//! a consistency verdict out.

use std::path::PathBuf;

use sdic_core::persistence::{load_registry, save_registry};
use sdic_core::{
    contains, CipherTable, ClassifiedToken, EngineConfig, EntityKind, Fingerprint, FingerprintHasher, PrimeRegistry, SdicEngine,
    Sense, SharedPrimeRegistry, SyntacticReconstructor,
};

fn fixture_config() -> EngineConfig {
    EngineConfig {
        cipher_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/master_cipher.json"),
        ..EngineConfig::default()
    }
}

fn engine() -> SdicEngine {
    SdicEngine::from_config(&fixture_config())
}

#[test]
fn bundled_cipher_loads() {
    let table = CipherTable::load(&fixture_config().cipher_path).unwrap();
    assert!(table.contains("UD"));
    assert!(table.contains("É.GAL"));
    assert_eq!(table.prime_for("KÙ.BABBAR"), Some(2));
}

#[test]
fn sample_batch_translates() {
    let engine = engine();

    let first = engine.translate(&["DAM.GÀR", "KÙ", "UD", "ANA", "Enlil"]);
    assert_eq!(first.text, "Merchant precious metal white to Enlil");

    let second = engine.translate(&["5", "UD", "DUB", "É.GAL"]);
    assert_eq!(second.text, "5 day tablet palace");

    let third = engine.translate(&["DAM.GÀR", "[BROKEN]", "UNK_SIGN"]);
    assert_eq!(third.text, "Merchant [...] UNK_2");
    assert_eq!(third.classified[1], ClassifiedToken::corrupt());
}

#[test]
fn first_listed_reading_is_the_default() {
    // No left context: the first candidate wins even though it carries a rule.
    let out = engine().translate(&["UD"]);
    assert_eq!(out.text, "Day");
    let out = engine().translate(&["DUB", "UD"]);
    assert_eq!(out.text, "Tablet day");
}

#[test]
fn verb_final_source_becomes_verb_medial() {
    // DUMU KÙ.BABBAR ANA DAM.GÀR IDDIN: "the son gave silver to the merchant"
    let out = engine().translate(&["DUMU", "KÙ.BABBAR", "ANA", "DAM.GÀR", "IDDIN"]);
    assert_eq!(out.text, "Son gave silver to merchant");
}

#[test]
fn reconstruction_example_from_classified_input() {
    let input: Vec<ClassifiedToken> = [("ROLE", "merchant"), ("PREP", "to"), ("PERSON", "Enlil"), ("VERB_ROOT", "gave")]
        .iter()
        .map(|&(kind, english)| ClassifiedToken::Resolved {
            sense: Sense::new(kind, english),
        })
        .collect();
    assert_eq!(SyntacticReconstructor::new().reassemble(&input), "Merchant gave to Enlil");
}

#[test]
fn fingerprints_detect_shared_content_between_tablets() {
    let engine = engine();
    let letter = engine.fingerprint(&["KÙ.BABBAR", "AN.NA", "TÚG", "TÚG", "DUMU"]);
    let receipt = engine.fingerprint(&["túg", "kù.babbar", "TÚG"]);
    assert!(contains(&letter, &receipt));

    let other = engine.fingerprint(&["KÙ.GI", "TÚG"]);
    assert!(!contains(&letter, &other));
}

#[test]
fn validator_scores_neural_output() {
    let engine = engine();
    let result = engine.judge("ana 5 manā kù-babbar", "he gave silver");
    assert!((result.score - 0.7).abs() < 1e-9);
    assert_eq!(result.flag_codes(), vec!["MISSING_NUMBER_5"]);

    let clean = engine.judge("5 TÚG a-na DUMU", "five textiles for the son");
    assert_eq!(clean.score, 1.0);
    assert!(clean.flags.is_empty());
}

#[test]
fn entity_mentions_feed_graph_building() {
    let mentions = engine().entities("um-ma Puzur-Aššur-ma a-na Enlil-bani Puzur-[x]");
    let kinds: Vec<EntityKind> = mentions.iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![EntityKind::Person, EntityKind::Deity, EntityKind::BrokenEntity]);
}

#[test]
fn registry_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.bin");

    let shared = SharedPrimeRegistry::new(PrimeRegistry::seeded());
    let silver = shared.register("KÙ.BABBAR");
    save_registry(&shared.snapshot(), &path).unwrap();

    let mut restored = load_registry(&path).unwrap();
    assert_eq!(restored.register("KÙ.BABBAR"), silver);
    assert_eq!(restored.value_of("É"), 2);
    assert!(restored.register("AN.NA") > silver);

    // Registry-weighted fingerprints agree before and after the restart.
    let tokens = ["É", "GAL", "KÙ.BABBAR"];
    let before = FingerprintHasher::new(&shared.snapshot()).fingerprint(&tokens);
    let after = FingerprintHasher::new(&restored).fingerprint(&tokens);
    assert_eq!(before, after);
}

#[test]
fn lowercase_signs_keep_their_weight_across_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.bin");

    let mut registry = PrimeRegistry::seeded();
    registry.register("Puzur");
    registry.register("NI");
    save_registry(&registry, &path).unwrap();
    let restored = load_registry(&path).unwrap();

    let letter = ["É", "be", "lí", "ni", "puzur"];
    for source in [&registry, &restored] {
        let hasher = FingerprintHasher::new(source);
        let whole = hasher.fingerprint(&letter);
        // be = 11, lí = 13, ni = 17; "NI" hashes with ni's weight.
        assert_eq!(hasher.fingerprint(&["be", "NI"]), Fingerprint::from(187u32));
        assert!(contains(&whole, &hasher.fingerprint(&["BE", "Ni", "PUZUR"])));
        assert!(!contains(&hasher.fingerprint(&["É"]), &hasher.fingerprint(&["be", "ni"])));
        assert!(!contains(&whole, &hasher.fingerprint(&["GAL"])));
    }
}

#[test]
fn lexicon_seeds_a_registry() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon = dir.path().join("lexicon.csv");
    std::fs::write(&lexicon, "sign,reading,interpretation\nKÙ.BABBAR,kaspum,silver\nAN.NA,annakum,tin\n").unwrap();

    let registry = PrimeRegistry::from_lexicon(&lexicon);
    assert_eq!(registry.value_of("kaspum"), 2);
    let hasher = FingerprintHasher::new(&registry);
    assert_eq!(hasher.fingerprint(&["KASPUM", "Annakum"]), Fingerprint::from(6u32));

    let fallback = PrimeRegistry::from_lexicon(&dir.path().join("missing.csv"));
    assert_eq!(fallback.len(), 7);
    assert_eq!(fallback.value_of("ni"), 17);
}
