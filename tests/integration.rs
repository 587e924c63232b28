//! End-to-end integration tests for the kotoami pipeline.
//!
//! These tests exercise the full path from validated record files through
//! extraction, aggregation, clustering, enrichment, and serialization,
//! validating the structural guarantees the artifacts promise downstream
//! consumers.

use std::path::{Path, PathBuf};

use kotoami::artifact::{EDGES_FILE, EdgeRecord, NODES_FILE, NodeRecord};
use kotoami::builder::NetworkBuilder;
use kotoami::config::NetworkConfig;
use kotoami::edge::RelationKind;

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// A small mixed corpus touching every extractor.
fn corpus_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let grammar = serde_json::json!([
        {
            "id": "grammar_tai",
            "title": "たい",
            "description": "want to do something",
            "jlpt_level": "N5",
            "examples": [
                {"ja": "水を飲みたい", "en": "I want to drink water"},
                {"ja": "もっと飲みたいです", "en": "I want to drink more"},
                {"ja": "早く寝たい", "en": "I want to sleep early"}
            ],
            "sources": [{"name": "jlpt"}]
        },
        {
            "id": "grammar_temiru",
            "title": "てみる",
            "description": "try doing something",
            "jlpt_level": "N4",
            "examples": [
                {"ja": "寿司を食べてみる", "en": "try eating sushi"}
            ],
            "sources": [{"name": "jlpt"}]
        },
        {
            "id": "grammar_tte",
            "title": "って",
            "description": "casual quotation",
            "jlpt_level": "",
            "examples": []
        }
    ]);
    let vocab = serde_json::json!([
        {
            "id": "vocab_nomu",
            "lemma": "飲み",
            "reading": "のみ",
            "pos": "Verb",
            "meanings": ["to drink"],
            "tags": ["anki", "jlpt_n5"]
        },
        {
            "id": "vocab_taberu",
            "lemma": "食べ",
            "reading": "たべ",
            "pos": "Verb",
            "meanings": ["to eat"],
            "tags": ["anki", "jlpt_n5"]
        },
        {
            "id": "vocab_inu",
            "lemma": "犬",
            "reading": "いぬ",
            "pos": "Noun",
            "meanings": ["dog"],
            "tags": ["anki", "jlpt_n4"]
        },
        {
            "id": "vocab_sasuga",
            "lemma": "さすが",
            "reading": "さすが",
            "pos": "Expression",
            "meanings": ["as expected"],
            "tags": ["anki"]
        }
    ]);
    (
        write_json(dir, "grammar_pattern.json", &grammar),
        write_json(dir, "vocabulary_entry.json", &vocab),
    )
}

fn read_artifacts(dir: &Path) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let nodes = std::fs::read_to_string(dir.join(NODES_FILE)).unwrap();
    let edges = std::fs::read_to_string(dir.join(EDGES_FILE)).unwrap();
    (
        serde_json::from_str(&nodes).unwrap(),
        serde_json::from_str(&edges).unwrap(),
    )
}

fn build_default(dir: &Path, out: &Path) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let (grammar, vocab) = corpus_inputs(dir);
    let builder = NetworkBuilder::new(NetworkConfig::default()).unwrap();
    builder.build(&grammar, &vocab, None, out).unwrap();
    read_artifacts(out)
}

#[test]
fn end_to_end_build_writes_both_artifacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (nodes, edges) = build_default(dir.path(), &out);

    assert_eq!(nodes.len(), 7);
    assert!(!edges.is_empty());
    // Node order is id order.
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn structural_invariants_hold() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (nodes, edges) = build_default(dir.path(), &out);

    // Weight bounds: sub-threshold candidates never appear.
    for edge in &edges {
        assert!(
            edge.weight > 0.0 && edge.weight <= 1.0,
            "weight {}",
            edge.weight
        );
    }

    // No self-loops.
    assert!(edges.iter().all(|e| e.source != e.target));

    // No duplicate (source, target, relation).
    let mut keys: Vec<_> = edges
        .iter()
        .map(|e| (e.source.clone(), e.target.clone(), e.relation))
        .collect();
    let before = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), before);

    // Cluster totality: every node has exactly one label, unknown → unclustered.
    for node in &nodes {
        assert!(!node.cluster.as_str().is_empty());
    }
    let tte = nodes.iter().find(|n| n.id.as_str() == "grammar_tte").unwrap();
    assert_eq!(tte.cluster.as_str(), "unclustered");
    let inu = nodes.iter().find(|n| n.id.as_str() == "vocab_inu").unwrap();
    assert_eq!(inu.cluster.as_str(), "n4-noun");
}

#[test]
fn cross_reference_edges_point_vocabulary_to_pattern() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (nodes, edges) = build_default(dir.path(), &out);

    let kind_of = |id: &str| {
        nodes
            .iter()
            .find(|n| n.id.as_str() == id)
            .map(|n| n.kind.as_str())
            .unwrap()
    };

    let crossrefs: Vec<&EdgeRecord> = edges
        .iter()
        .filter(|e| e.relation == RelationKind::CrossReference)
        .collect();
    assert!(!crossrefs.is_empty());
    for edge in crossrefs {
        assert!(edge.directed);
        assert_eq!(kind_of(edge.source.as_str()), "vocabulary");
        assert_eq!(kind_of(edge.target.as_str()), "pattern");
    }
}

#[test]
fn level_adjacency_edges_only_between_known_neighboring_levels() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (nodes, edges) = build_default(dir.path(), &out);

    let level_of = |id: &str| nodes.iter().find(|n| n.id.as_str() == id).unwrap().level;

    for edge in edges
        .iter()
        .filter(|e| e.relation == RelationKind::LevelAdjacency)
    {
        let a = level_of(edge.source.as_str());
        let b = level_of(edge.target.as_str());
        assert!(a.is_adjacent(b), "{a} vs {b}");
    }
    // The unlevelled pattern holds no level-adjacency edges.
    assert!(
        edges
            .iter()
            .filter(|e| e.relation == RelationKind::LevelAdjacency)
            .all(|e| e.source.as_str() != "grammar_tte" && e.target.as_str() != "grammar_tte")
    );
}

#[test]
fn scenario_same_level_particle_patterns() {
    // Two grammar patterns at the same level sharing the particle tag, with
    // disjoint glosses and no examples: exactly one level-adjacency edge at
    // full confidence and one POS edge at 1.0, nothing else.
    let dir = tempfile::TempDir::new().unwrap();
    let grammar = serde_json::json!([
        {
            "id": "grammar_wa",
            "title": "は",
            "description": "topic particle",
            "jlpt_level": "N3",
            "pos": "Particle",
            "examples": []
        },
        {
            "id": "grammar_koso",
            "title": "こそ",
            "description": "emphasis focus",
            "jlpt_level": "N3",
            "pos": "Particle",
            "examples": []
        }
    ]);
    let grammar_path = write_json(dir.path(), "grammar_pattern.json", &grammar);
    let vocab_path = write_json(dir.path(), "vocabulary_entry.json", &serde_json::json!([]));

    let out = dir.path().join("out");
    let builder = NetworkBuilder::new(NetworkConfig::default()).unwrap();
    builder
        .build(&grammar_path, &vocab_path, None, &out)
        .unwrap();
    let (_, edges) = read_artifacts(&out);

    assert_eq!(edges.len(), 2);
    let level = edges
        .iter()
        .find(|e| e.relation == RelationKind::LevelAdjacency)
        .unwrap();
    assert_eq!(level.weight, 1.0);
    let pos = edges
        .iter()
        .find(|e| e.relation == RelationKind::PosSimilarity)
        .unwrap();
    assert_eq!(pos.weight, 1.0);
    assert!(!edges.iter().any(|e| e.relation == RelationKind::Semantic));
    assert!(
        !edges
            .iter()
            .any(|e| e.relation == RelationKind::CrossReference)
    );
}

#[test]
fn scenario_double_occurrence_cross_reference() {
    // 飲み appears in two of grammar_tai's three examples: one directed
    // edge, confidence reflecting both occurrences, below the cap.
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (_, edges) = build_default(dir.path(), &out);

    let matches: Vec<&EdgeRecord> = edges
        .iter()
        .filter(|e| {
            e.relation == RelationKind::CrossReference
                && e.source.as_str() == "vocab_nomu"
                && e.target.as_str() == "grammar_tai"
        })
        .collect();
    assert_eq!(matches.len(), 1);
    assert!((matches[0].weight - 0.9).abs() < 1e-9);
    assert!(matches[0].directed);
}

#[test]
fn custom_threshold_config_is_respected() {
    let dir = tempfile::TempDir::new().unwrap();
    let (grammar, vocab) = corpus_inputs(dir.path());

    // A minimum weight above most heuristic scores thins the graph.
    let config = NetworkConfig {
        min_edge_weight: 0.95,
        ..Default::default()
    };
    let out = dir.path().join("out");
    let builder = NetworkBuilder::new(config).unwrap();
    builder.build(&grammar, &vocab, None, &out).unwrap();
    let (_, edges) = read_artifacts(&out);

    assert!(edges.iter().all(|e| e.weight >= 0.95));
}

#[test]
fn evaluator_scores_built_artifacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out");
    build_default(dir.path(), &out);

    // Against its own edges the reproducibility score is exactly 1.0.
    let report = kotoami::eval::evaluate(&out, Some(&out.join(EDGES_FILE))).unwrap();
    assert_eq!(report.edge_jaccard, 1.0);
    assert_eq!(report.direction_accuracy, 1.0);
    assert!(report.precision > 0.0);
    assert!(report.main_component_share > 0.0);
}
