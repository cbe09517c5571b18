//! Attribute-sharing networks.
//!
//! Two profiles are linked when they carry the same value for the grouping
//! column. Every profile becomes a node, linked or not, and each node is
//! annotated with centrality scores measured on that one network.

use crate::centrality::{betweenness_centrality, degree_centrality, BetweennessOutcome};
use crate::profile::{Profile, ProfileTable};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Stand-in for a missing grouping value.
pub const NOT_FOUND: &str = "not found";

/// Anomalies absorbed while building a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The grouping column is not in the table; every profile was grouped
    /// under [`NOT_FOUND`].
    MissingColumn(String),
    DegenerateBetweenness,
}

/// Identity and descriptive fields shared by every network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseNode {
    pub id: usize,
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub degree_text: Option<String>,
    pub university: Option<String>,
    #[serde(rename = "universityCountry")]
    pub university_country: Option<String>,
    #[serde(rename = "researchPapers")]
    pub research_papers: u64,
}

impl From<&Profile> for BaseNode {
    fn from(profile: &Profile) -> Self {
        BaseNode {
            id: profile.id,
            name: profile.name.clone(),
            image_url: profile.url_image.clone(),
            degree_text: profile.degree.clone(),
            university: profile.university.clone(),
            university_country: profile.university_country.clone(),
            research_papers: parse_paper_count(profile.research_papers.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    #[serde(flatten)]
    pub base: BaseNode,
    #[serde(rename = "degreeCentrality")]
    pub degree_centrality: f64,
    #[serde(rename = "betweennessCentrality")]
    pub betweenness_centrality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// A fully annotated network for one grouping column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Network {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<Link>,
    #[serde(skip)]
    pub betweenness: BetweennessOutcome,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the network linking profiles that share `column`.
///
/// Never fails: a column the table lacks is grouped under [`NOT_FOUND`] and
/// reported in [`Network::diagnostics`], and an edgeless graph gets zero
/// betweenness.
#[instrument(skip(table), fields(profiles = table.len()))]
pub fn build_network(table: &ProfileTable, column: &str) -> Network {
    let mut diagnostics = Vec::new();
    let column_present = table.has_column(column);
    if !column_present {
        warn!(column, "grouping column not found in profile table");
        diagnostics.push(Diagnostic::MissingColumn(column.to_string()));
    }

    let profiles = table.profiles();
    let values: Vec<&str> = profiles
        .iter()
        .map(|p| {
            if column_present {
                p.column(column).unwrap_or(NOT_FOUND)
            } else {
                NOT_FOUND
            }
        })
        .collect();

    let base_nodes: Vec<BaseNode> = profiles.iter().map(BaseNode::from).collect();
    let links = shared_value_links(&values);

    let mut graph = UnGraph::<usize, ()>::with_capacity(base_nodes.len(), links.len());
    for node in &base_nodes {
        graph.add_node(node.id);
    }
    for link in &links {
        graph.add_edge(NodeIndex::new(link.source), NodeIndex::new(link.target), ());
    }

    let degree = degree_centrality(&graph);
    let betweenness = betweenness_centrality(&graph);
    if betweenness.is_degenerate() {
        warn!(column, "betweenness is undefined for this network; defaulting to 0");
        diagnostics.push(Diagnostic::DegenerateBetweenness);
    }

    let nodes = base_nodes
        .iter()
        .enumerate()
        .map(|(i, base)| NetworkNode {
            base: base.clone(),
            degree_centrality: degree[i],
            betweenness_centrality: betweenness.score(i),
        })
        .collect::<Vec<_>>();

    info!(
        column,
        nodes = nodes.len(),
        links = links.len(),
        "built attribute network"
    );

    Network {
        nodes,
        links,
        betweenness,
        diagnostics,
    }
}

/// Clique links within each group of equal values, deduplicated on the
/// unordered pair. `values[i]` is the grouping value of profile `i`.
fn shared_value_links(values: &[&str]) -> Vec<Link> {
    let mut group_of: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (id, &value) in values.iter().enumerate() {
        let slot = *group_of.entry(value).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(id);
    }

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for members in groups.iter().filter(|m| m.len() > 1) {
        debug!(members = members.len(), "linking attribute group");
        for (i, &source) in members.iter().enumerate() {
            for &target in &members[i + 1..] {
                if source == target {
                    continue;
                }
                let pair = (source.min(target), source.max(target));
                if seen.insert(pair) {
                    links.push(Link { source, target });
                }
            }
        }
    }
    links
}

/// Non-negative integer literal or 0.
fn parse_paper_count(raw: Option<&str>) -> u64 {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        _ => 0,
    }
}
