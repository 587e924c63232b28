//! Network builder facade: one type that owns the whole pipeline.
//!
//! Loader → extractors → aggregator → cluster assignment → enrichment →
//! serializer, in that order, with the config threaded explicitly through
//! every stage. A run either writes both artifacts atomically or returns a
//! diagnostic before anything is visible on disk.

use std::collections::BTreeMap;
use std::path::Path;

use crate::aggregate::{self, AggregateReport};
use crate::artifact::{self, EdgeRecord, NodeRecord};
use crate::cluster::{self, ClusterLabel};
use crate::config::NetworkConfig;
use crate::enrich;
use crate::entity::EntityId;
use crate::error::{AggregateError, KotoamiResult};
use crate::extract::{self, CorpusView, RelationExtractor};
use crate::loader::{self, LoadReport, LoadedCorpus};

/// Runs the full network construction pipeline.
pub struct NetworkBuilder {
    config: NetworkConfig,
    extractors: Vec<Box<dyn RelationExtractor>>,
    strict_edges: bool,
}

impl NetworkBuilder {
    /// Create a builder with the default extractor battery.
    ///
    /// Rejects configs with out-of-range thresholds up front, before any
    /// input is read.
    pub fn new(config: NetworkConfig) -> KotoamiResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            extractors: extract::default_extractors(),
            strict_edges: false,
        })
    }

    /// Replace the extractor battery (e.g. to swap in an embedding scorer).
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn RelationExtractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    /// Fail the run instead of emitting an edgeless graph.
    pub fn strict_edges(mut self, strict: bool) -> Self {
        self.strict_edges = strict;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Run extraction through enrichment over an already-loaded corpus.
    ///
    /// Pure apart from logging: no file I/O happens here, which is what the
    /// structural test suites build on.
    pub fn assemble(&self, corpus: &LoadedCorpus) -> KotoamiResult<AssembledNetwork> {
        let view = CorpusView {
            entities: &corpus.entities,
            lessons: &corpus.lessons,
        };

        let outcome = extract::extract_all(&self.extractors, &view, &self.config);
        let per_extractor = outcome.per_extractor.clone();
        let (edges, aggregate_report) = aggregate::aggregate(outcome.candidates, &self.config);

        if self.strict_edges && edges.is_empty() {
            return Err(AggregateError::NoEdgesRetained.into());
        }

        let clusters: BTreeMap<EntityId, ClusterLabel> = corpus
            .entities
            .iter()
            .map(|e| (e.id().clone(), cluster::assign(e)))
            .collect();

        let attachments = enrich::enrich(&corpus.entities, &corpus.lessons);
        let enriched = attachments.len();

        let nodes = artifact::build_node_records(&corpus.entities, &clusters, &attachments);
        let edge_records = artifact::build_edge_records(&edges);

        Ok(AssembledNetwork {
            nodes,
            edges: edge_records,
            per_extractor,
            aggregate: aggregate_report,
            enriched,
        })
    }

    /// Full run: load inputs, assemble, and write both artifacts atomically.
    pub fn build(
        &self,
        grammar_path: &Path,
        vocab_path: &Path,
        lessons_path: Option<&Path>,
        out_dir: &Path,
    ) -> KotoamiResult<BuildReport> {
        let corpus = loader::load_corpus(grammar_path, vocab_path, lessons_path)?;
        let network = self.assemble(&corpus)?;
        artifact::write_artifacts(out_dir, &network.nodes, &network.edges)
            .map_err(crate::error::KotoamiError::from)?;

        Ok(BuildReport {
            load: corpus.report,
            per_extractor: network.per_extractor,
            aggregate: network.aggregate,
            enriched: network.enriched,
            nodes: network.nodes.len(),
        })
    }
}

/// The assembled (but not yet written) network.
#[derive(Debug)]
pub struct AssembledNetwork {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub per_extractor: Vec<(&'static str, usize)>,
    pub aggregate: AggregateReport,
    pub enriched: usize,
}

/// Run summary printed at the end of a build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub load: LoadReport,
    pub per_extractor: Vec<(&'static str, usize)>,
    pub aggregate: AggregateReport,
    pub enriched: usize,
    pub nodes: usize,
}

impl std::fmt::Display for BuildReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "kotoami build summary")?;
        writeln!(f, "  grammar patterns:    {}", self.load.grammar)?;
        writeln!(f, "  vocabulary entries:  {}", self.load.vocabulary)?;
        writeln!(f, "  guidebook lessons:   {}", self.load.lessons)?;
        if self.load.duplicates > 0 || self.load.skipped > 0 {
            writeln!(
                f,
                "  dropped at load:     {} duplicate(s), {} skipped",
                self.load.duplicates, self.load.skipped
            )?;
        }
        writeln!(f, "  candidates proposed:")?;
        for (name, count) in &self.per_extractor {
            writeln!(f, "    {name:<18} {count}")?;
        }
        writeln!(f, "  edges retained:      {}", self.aggregate.retained)?;
        writeln!(
            f,
            "  dropped at merge:    {} invalid, {} below threshold",
            self.aggregate.dropped_invalid, self.aggregate.dropped_below_threshold
        )?;
        writeln!(f, "  enriched patterns:   {}", self.enriched)?;
        writeln!(f, "  nodes written:       {}", self.nodes)?;
        Ok(())
    }
}
