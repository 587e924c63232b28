//! Baseline network evaluation over the serialized artifacts.
//!
//! Works purely from `nodes.json`/`edges.json` — no dependency on the
//! builder's internals, so it scores any artifact pair with the right
//! shape. All judgments are heuristic (no human annotations): a strict and
//! a lenient judge score every edge, and Cohen's kappa between them reports
//! how much the verdict depends on judge strictness.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::artifact::{EDGES_FILE, EdgeRecord, NODES_FILE, NodeRecord};
use crate::edge::{Evidence, RelationKind};
use crate::entity::normalize;
use crate::error::EvalError;

/// Core forms a beginner network is expected to cover.
const CORE_FORMS: [&str; 13] = [
    "は", "を", "に", "で", "の", "が", "です", "ます", "いる", "ある", "食べる", "行く", "来る",
];

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Baseline metrics for one artifact pair. All ratios in [0, 1] except
/// `core_coverage`, which is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Share of edges the strict judge accepts.
    pub precision: f64,
    /// Share of cross-reference edges pointing vocabulary → pattern.
    pub direction_accuracy: f64,
    /// Cohen's kappa between the strict and lenient judges.
    pub kappa_valid: f64,
    /// Percentage of core forms appearing in some node label.
    pub core_coverage: f64,
    /// Share of nodes with no edges at all.
    pub orphans_share: f64,
    /// Share of nodes in the largest connected component.
    pub main_component_share: f64,
    /// Edge-set Jaccard against the prior run (1.0 when no prior given).
    pub edge_jaccard: f64,
}

impl std::fmt::Display for EvalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "kotoami network evaluation (baseline, heuristic)")?;
        writeln!(f, "  -- connection correctness --")?;
        writeln!(f, "  precision:          {:.3}", self.precision)?;
        writeln!(f, "  direction_accuracy: {:.3}", self.direction_accuracy)?;
        writeln!(f, "  kappa_valid:        {:.3}", self.kappa_valid)?;
        writeln!(f, "  -- coverage & connectivity --")?;
        writeln!(f, "  core_coverage (%):  {:.3}", self.core_coverage)?;
        writeln!(f, "  orphans_share:      {:.3}", self.orphans_share)?;
        writeln!(f, "  main_component:     {:.3}", self.main_component_share)?;
        writeln!(f, "  -- reproducibility --")?;
        writeln!(f, "  edge_jaccard:       {:.3}", self.edge_jaccard)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Edge judges
// ---------------------------------------------------------------------------

/// (strict, lenient) verdicts for one edge, given its endpoint records.
fn judge_edge(
    edge: &EdgeRecord,
    source: Option<&NodeRecord>,
    target: Option<&NodeRecord>,
) -> (bool, bool) {
    let (Some(source), Some(target)) = (source, target) else {
        // Dangling endpoint: nothing to validate against.
        return (false, false);
    };

    match edge.relation {
        RelationKind::CrossReference => {
            let typed_ok = source.kind == "vocabulary" && target.kind == "pattern";
            let surface_ok = matches!(
                &edge.evidence,
                Evidence::SurfaceMatch { surface, .. } if *surface == normalize(&source.label)
            );
            (typed_ok && surface_ok, typed_ok)
        }
        RelationKind::LevelAdjacency => {
            let both_known =
                source.level.ordinal().is_some() && target.level.ordinal().is_some();
            (both_known && source.level.is_adjacent(target.level), both_known)
        }
        RelationKind::PosSimilarity => {
            let shared = source.pos.iter().any(|t| target.pos.contains(t));
            let both_tagged = !source.pos.is_empty() && !target.pos.is_empty();
            (shared, both_tagged)
        }
        RelationKind::Semantic => {
            // The gloss text isn't in the artifact; judge from the recorded
            // overlap score instead.
            let score = match &edge.evidence {
                Evidence::GlossOverlap { score } => *score,
                _ => 0.0,
            };
            (score >= 0.5, score > 0.0)
        }
        RelationKind::Guidebook => {
            let both_patterns = source.kind == "pattern" && target.kind == "pattern";
            (both_patterns, true)
        }
    }
}

/// Cohen's kappa between two boolean judgment sequences.
fn cohen_kappa(a: &[bool], b: &[bool]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let n = a.len() as f64;
    let agree = a.iter().zip(b).filter(|(x, y)| x == y).count() as f64 / n;
    let yes_a = a.iter().filter(|x| **x).count() as f64 / n;
    let yes_b = b.iter().filter(|x| **x).count() as f64 / n;
    let p_yes = (yes_a + yes_b) / 2.0;
    let p_chance = p_yes.powi(2) + (1.0 - p_yes).powi(2);
    if (p_chance - 1.0).abs() < f64::EPSILON {
        1.0
    } else {
        (agree - p_chance) / (1.0 - p_chance)
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Edge-set Jaccard similarity over (source, target, relation) triples.
///
/// Two identical sets score 1.0 (including two empty ones); a non-empty set
/// against an empty one scores 0.0.
pub fn edge_jaccard(a: &[EdgeRecord], b: &[EdgeRecord]) -> f64 {
    let key = |e: &EdgeRecord| (e.source.clone(), e.target.clone(), e.relation);
    let set_a: BTreeSet<_> = a.iter().map(key).collect();
    let set_b: BTreeSet<_> = b.iter().map(key).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 1.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Compute all baseline metrics from in-memory artifacts.
pub fn compute_metrics(
    nodes: &[NodeRecord],
    edges: &[EdgeRecord],
    prev_edges: Option<&[EdgeRecord]>,
) -> EvalReport {
    let by_id: BTreeMap<&str, &NodeRecord> =
        nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    // Judge every edge.
    let mut strict = Vec::with_capacity(edges.len());
    let mut lenient = Vec::with_capacity(edges.len());
    let mut direction_ok = Vec::new();
    for edge in edges {
        let source = by_id.get(edge.source.as_str()).copied();
        let target = by_id.get(edge.target.as_str()).copied();
        let (s, l) = judge_edge(edge, source, target);
        strict.push(s);
        lenient.push(l);
        if edge.relation == RelationKind::CrossReference {
            let ok = matches!((source, target), (Some(s), Some(t))
                if s.kind == "vocabulary" && t.kind == "pattern");
            direction_ok.push(ok);
        }
    }

    let precision = if strict.is_empty() {
        0.0
    } else {
        strict.iter().filter(|x| **x).count() as f64 / strict.len() as f64
    };
    let direction_accuracy = if direction_ok.is_empty() {
        1.0
    } else {
        direction_ok.iter().filter(|x| **x).count() as f64 / direction_ok.len() as f64
    };

    // Structure: undirected view of the emitted graph.
    let mut graph: UnGraph<(), ()> = UnGraph::default();
    let mut index = BTreeMap::new();
    for node in nodes {
        index.insert(node.id.as_str(), graph.add_node(()));
    }
    for edge in edges {
        if let (Some(&a), Some(&b)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            graph.add_edge(a, b, ());
        }
    }

    let node_count = graph.node_count();
    let (orphans_share, main_component_share) = if node_count == 0 {
        (0.0, 0.0)
    } else {
        let orphans = graph
            .node_indices()
            .filter(|n| graph.neighbors(*n).next().is_none())
            .count();

        let mut uf = UnionFind::new(node_count);
        for edge in graph.edge_references() {
            uf.union(edge.source().index(), edge.target().index());
        }
        let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
        for n in graph.node_indices() {
            *sizes.entry(uf.find(n.index())).or_default() += 1;
        }
        let largest = sizes.values().copied().max().unwrap_or(0);
        (
            orphans as f64 / node_count as f64,
            largest as f64 / node_count as f64,
        )
    };

    // Coverage over the core-form list.
    let covered = CORE_FORMS
        .iter()
        .filter(|form| nodes.iter().any(|n| n.label.contains(**form)))
        .count();
    let core_coverage = covered as f64 / CORE_FORMS.len() as f64 * 100.0;

    let jaccard = match prev_edges {
        Some(prev) => edge_jaccard(edges, prev),
        None => 1.0,
    };

    EvalReport {
        precision,
        direction_accuracy,
        kappa_valid: cohen_kappa(&strict, &lenient),
        core_coverage,
        orphans_share,
        main_component_share,
        edge_jaccard: jaccard,
    }
}

// ---------------------------------------------------------------------------
// Artifact loading
// ---------------------------------------------------------------------------

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, EvalError> {
    let text = std::fs::read_to_string(path).map_err(|source| EvalError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| EvalError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Evaluate the artifacts in `dir`, optionally against a prior edge list.
pub fn evaluate(dir: &Path, prev_edges: Option<&Path>) -> Result<EvalReport, EvalError> {
    let nodes: Vec<NodeRecord> = read_json(&dir.join(NODES_FILE))?;
    let edges: Vec<EdgeRecord> = read_json(&dir.join(EDGES_FILE))?;
    let prev: Option<Vec<EdgeRecord>> = match prev_edges {
        Some(path) => Some(read_json(path)?),
        None => None,
    };
    Ok(compute_metrics(&nodes, &edges, prev.as_deref()))
}
