//! Graph serializer: the two ordered artifacts the viewer and evaluator eat.
//!
//! `nodes.json` and `edges.json` are a pure function of (entities, clusters,
//! enrichment, aggregated edges): identical inputs yield byte-identical
//! files, which is what the edge-Jaccard reproducibility metric rests on.
//! Writes are staged through temp files and renamed only after every write
//! has succeeded, so a failed run never leaves a partial artifact for the
//! viewer to render or the evaluator to score.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterLabel;
use crate::edge::{Edge, Evidence, RelationKind};
use crate::enrich::LessonAttachment;
use crate::entity::{Entity, EntityId, JlptLevel, PosTag};
use crate::error::SerializeError;

/// File name of the node artifact.
pub const NODES_FILE: &str = "nodes.json";
/// File name of the edge artifact.
pub const EDGES_FILE: &str = "edges.json";

// ---------------------------------------------------------------------------
// Artifact records
// ---------------------------------------------------------------------------

/// One node as emitted into `nodes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: EntityId,
    /// `pattern` or `vocabulary`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Surface pattern or lemma.
    pub label: String,
    pub level: JlptLevel,
    pub pos: Vec<PosTag>,
    pub cluster: ClusterLabel,
    /// Guidebook metadata, present only on enriched patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<LessonAttachment>,
}

/// One edge as emitted into `edges.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: EntityId,
    pub target: EntityId,
    pub relation: RelationKind,
    pub weight: f64,
    pub directed: bool,
    pub evidence: Evidence,
    /// Human-readable evidence summary for viewers.
    pub summary: String,
}

/// Assemble node records in loader order (entities arrive sorted by id).
pub fn build_node_records(
    entities: &[Entity],
    clusters: &BTreeMap<EntityId, ClusterLabel>,
    attachments: &BTreeMap<EntityId, LessonAttachment>,
) -> Vec<NodeRecord> {
    entities
        .iter()
        .map(|entity| NodeRecord {
            id: entity.id().clone(),
            kind: entity.kind_str().to_string(),
            label: entity.label().to_string(),
            level: entity.level(),
            pos: entity.pos_tags().to_vec(),
            cluster: clusters
                .get(entity.id())
                .cloned()
                .unwrap_or_else(|| crate::cluster::assign(entity)),
            lesson: attachments.get(entity.id()).cloned(),
        })
        .collect()
}

/// Assemble edge records in aggregator order (already sorted by key).
pub fn build_edge_records(edges: &[Edge]) -> Vec<EdgeRecord> {
    edges
        .iter()
        .map(|edge| EdgeRecord {
            source: edge.source.clone(),
            target: edge.target.clone(),
            relation: edge.kind,
            weight: edge.weight,
            directed: edge.directed,
            evidence: edge.evidence.clone(),
            summary: edge.evidence.summary(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Atomic write
// ---------------------------------------------------------------------------

fn encode<T: Serialize>(artifact: &'static str, value: &T) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(value).map_err(|e| SerializeError::Encode {
        artifact,
        message: e.to_string(),
    })
}

fn stage(path: &Path, content: &str) -> Result<PathBuf, SerializeError> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).map_err(|source| SerializeError::Write {
        path: tmp.clone(),
        source,
    })?;
    Ok(tmp)
}

/// Write both artifacts to `out_dir`, atomically.
///
/// Both files are encoded first, then staged as temp files, and only once
/// every stage has succeeded are they renamed into place. Any failure
/// removes the staged files and leaves the directory as it was.
pub fn write_artifacts(
    out_dir: &Path,
    nodes: &[NodeRecord],
    edges: &[EdgeRecord],
) -> Result<(), SerializeError> {
    std::fs::create_dir_all(out_dir).map_err(|source| SerializeError::OutDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let nodes_json = encode("nodes", &nodes)?;
    let edges_json = encode("edges", &edges)?;

    let nodes_path = out_dir.join(NODES_FILE);
    let edges_path = out_dir.join(EDGES_FILE);

    let nodes_tmp = stage(&nodes_path, &nodes_json)?;
    let edges_tmp = match stage(&edges_path, &edges_json) {
        Ok(tmp) => tmp,
        Err(err) => {
            let _ = std::fs::remove_file(&nodes_tmp);
            return Err(err);
        }
    };

    for (tmp, dest) in [(&nodes_tmp, &nodes_path), (&edges_tmp, &edges_path)] {
        if let Err(source) = std::fs::rename(tmp, dest) {
            let _ = std::fs::remove_file(&nodes_tmp);
            let _ = std::fs::remove_file(&edges_tmp);
            return Err(SerializeError::Write {
                path: dest.clone(),
                source,
            });
        }
    }

    tracing::info!(
        nodes = nodes.len(),
        edges = edges.len(),
        dir = %out_dir.display(),
        "wrote graph artifacts"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Provenance, VocabularyEntry};

    fn sample_entities() -> Vec<Entity> {
        vec![
            Entity::VocabularyEntry(VocabularyEntry {
                id: EntityId::new("vocab_inu"),
                level: JlptLevel::N5,
                lemma: "犬".into(),
                reading: "いぬ".into(),
                pos: vec![PosTag::Noun],
                glosses: vec!["dog".into()],
                examples: vec![],
                provenance: Provenance::Anki,
            }),
            Entity::VocabularyEntry(VocabularyEntry {
                id: EntityId::new("vocab_neko"),
                level: JlptLevel::Unknown,
                lemma: "猫".into(),
                reading: "ねこ".into(),
                pos: vec![PosTag::Noun],
                glosses: vec!["cat".into()],
                examples: vec![],
                provenance: Provenance::Anki,
            }),
        ]
    }

    fn clusters_for(entities: &[Entity]) -> BTreeMap<EntityId, ClusterLabel> {
        entities
            .iter()
            .map(|e| (e.id().clone(), crate::cluster::assign(e)))
            .collect()
    }

    #[test]
    fn node_records_carry_cluster_labels() {
        let entities = sample_entities();
        let clusters = clusters_for(&entities);
        let nodes = build_node_records(&entities, &clusters, &BTreeMap::new());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].cluster.as_str(), "n5-noun");
        assert_eq!(nodes[1].cluster.as_str(), "unclustered");
    }

    #[test]
    fn write_is_byte_identical_across_runs() {
        let entities = sample_entities();
        let clusters = clusters_for(&entities);
        let nodes = build_node_records(&entities, &clusters, &BTreeMap::new());

        let dir_a = tempfile::TempDir::new().unwrap();
        let dir_b = tempfile::TempDir::new().unwrap();
        write_artifacts(dir_a.path(), &nodes, &[]).unwrap();
        write_artifacts(dir_b.path(), &nodes, &[]).unwrap();

        let a = std::fs::read(dir_a.path().join(NODES_FILE)).unwrap();
        let b = std::fs::read(dir_b.path().join(NODES_FILE)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_temp_files_remain_after_success() {
        let dir = tempfile::TempDir::new().unwrap();
        write_artifacts(dir.path(), &[], &[]).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn unwritable_out_dir_fails_before_any_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        // A file where the output directory should be.
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, "not a dir").unwrap();

        let err = write_artifacts(&blocker, &[], &[]).unwrap_err();
        assert!(matches!(err, SerializeError::OutDir { .. }));
    }

    #[test]
    fn artifacts_round_trip_through_serde() {
        let entities = sample_entities();
        let clusters = clusters_for(&entities);
        let nodes = build_node_records(&entities, &clusters, &BTreeMap::new());

        let json = serde_json::to_string(&nodes).unwrap();
        let back: Vec<NodeRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(nodes, back);
    }

    #[test]
    fn japanese_text_is_not_escaped() {
        let entities = sample_entities();
        let clusters = clusters_for(&entities);
        let nodes = build_node_records(&entities, &clusters, &BTreeMap::new());

        let dir = tempfile::TempDir::new().unwrap();
        write_artifacts(dir.path(), &nodes, &[]).unwrap();
        let text = std::fs::read_to_string(dir.path().join(NODES_FILE)).unwrap();
        assert!(text.contains("犬"));
    }
}
