//! Concrete-input sweeps over the fixtures
//!
//! A sweep runs a fixture over a fixed, deterministic input domain and
//! tallies the outcomes it observed, keeping the first input that reached
//! each one as a witness. Finite domains (flags, bytes) are enumerated
//! exhaustively; integer parameters use small windows plus wraparound
//! boundary values. Documented outcomes that no input reached are listed
//! as missing.
//!
//! Divergent fixtures are never swept. For the node-graph fixture only
//! acyclic graphs are generated, since cyclic chains may not terminate.

use crate::catalog::{self, CatalogError, Fixture};
use crate::node::{Node, NodeGraph, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One input of a sweep domain
#[derive(Debug, Clone)]
pub struct Case {
    pub args: Vec<String>,
    pub graph: Option<NodeGraph>,
}

impl Case {
    fn scalar<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Case {
            args: values.into_iter().map(|v| v.to_string()).collect(),
            graph: None,
        }
    }
}

/// Hits for one outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeStats {
    pub count: usize,
    /// Arguments of the first input that reached this outcome
    pub witness: Vec<String>,
    /// Graph of the witness, before the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_graph: Option<NodeGraph>,
}

/// Outcome distribution of one fixture over its domain
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeTable {
    pub fixture: Fixture,
    pub inputs: usize,
    pub outcomes: BTreeMap<String, OutcomeStats>,
    /// Documented outcomes no input in the domain reached
    pub missing: Vec<String>,
}

impl OutcomeTable {
    pub fn count(&self, label: &str) -> usize {
        self.outcomes.get(label).map_or(0, |s| s.count)
    }

    pub fn witness(&self, label: &str) -> Option<&[String]> {
        self.outcomes.get(label).map(|s| s.witness.as_slice())
    }
}

/// Tables for every swept fixture
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub tables: Vec<OutcomeTable>,
}

/// Fixtures that have a sweep domain
pub fn sweepable() -> Vec<Fixture> {
    Fixture::ALL
        .into_iter()
        .filter(|&f| domain(f).is_some())
        .collect()
}

const WRAP_BOUNDARIES: [i32; 5] = [i32::MIN, i32::MIN + 1, i32::MAX - 4, i32::MAX - 1, i32::MAX];

fn window(lo: i32, hi: i32) -> impl Iterator<Item = i32> {
    (lo..=hi).chain(WRAP_BOUNDARIES)
}

/// Input domain of `fixture`, or `None` if it is not swept
pub fn domain(fixture: Fixture) -> Option<Vec<Case>> {
    let cases = match fixture {
        Fixture::ByteSaturationCheck => (i8::MIN..=i8::MAX)
            .flat_map(|a| (i8::MIN..=i8::MAX).map(move |b| Case::scalar([a, b])))
            .collect(),
        Fixture::CompositeFlags => (0u8..32)
            .map(|mask| Case::scalar((0..5).map(|i| mask & (1 << i) != 0)))
            .collect(),
        Fixture::SwitchDispatch => window(-8, 8)
            .flat_map(|a| window(-8, 16).map(move |b| Case::scalar([a, b])))
            .collect(),
        Fixture::NullableChoice => window(-4, 4).map(|a| Case::scalar([a])).collect(),
        Fixture::ChainA => window(-64, 64)
            // 11 * x == 10 and 9 * x == 10 modulo 2^32
            .chain([1_171_354_718, 954_437_178])
            .map(|x| Case::scalar([x]))
            .collect(),
        Fixture::AliasMutation => alias_mutation_domain(),
        _ => return None,
    };
    Some(cases)
}

/// Every acyclic two-node graph with `x, y` in `{0, 1}`, paired with every
/// choice of `a` and `b` among the nodes and `null`
fn alias_mutation_domain() -> Vec<Case> {
    let links = [None, Some(NodeId::new(0)), Some(NodeId::new(1))];
    let refs = ["null", "0", "1"];

    let mut shapes = Vec::new();
    for v0 in 0..4 {
        for v1 in 0..4 {
            for l0 in links {
                for l1 in links {
                    let mut graph = NodeGraph::new();
                    graph.alloc(Node::new(v0 & 1, v0 >> 1, l0));
                    graph.alloc(Node::new(v1 & 1, v1 >> 1, l1));
                    if !graph.has_cycle().unwrap_or(true) {
                        shapes.push(graph);
                    }
                }
            }
        }
    }

    let mut cases = Vec::new();
    for graph in shapes {
        for a in refs {
            for b in refs {
                cases.push(Case {
                    args: vec![a.to_string(), b.to_string()],
                    graph: Some(graph.clone()),
                });
            }
        }
    }
    cases
}

/// Run `fixture` over `cases` and tabulate the outcomes
pub fn sweep_cases(fixture: Fixture, cases: Vec<Case>) -> Result<OutcomeTable, CatalogError> {
    let mut outcomes: BTreeMap<String, OutcomeStats> = BTreeMap::new();
    let inputs = cases.len();

    for case in cases {
        let before = case.graph.clone();
        let invocation = catalog::invoke(fixture, &case.args, case.graph)?;
        outcomes
            .entry(invocation.outcome.label())
            .and_modify(|s| s.count += 1)
            .or_insert_with(|| OutcomeStats {
                count: 1,
                witness: case.args,
                witness_graph: before,
            });
    }

    let missing = fixture
        .info()
        .outcomes
        .iter()
        .filter(|label| !outcomes.contains_key(**label))
        .map(|label| label.to_string())
        .collect::<Vec<_>>();

    debug!(%fixture, inputs, distinct = outcomes.len(), ?missing, "sweep finished");
    Ok(OutcomeTable {
        fixture,
        inputs,
        outcomes,
        missing,
    })
}

/// Sweep one fixture over its built-in domain
pub fn sweep(fixture: Fixture) -> Result<Option<OutcomeTable>, CatalogError> {
    match domain(fixture) {
        Some(cases) => sweep_cases(fixture, cases).map(Some),
        None => Ok(None),
    }
}

/// Sweep every fixture that has a domain
pub fn sweep_all() -> Result<SweepReport, CatalogError> {
    let mut tables = Vec::new();
    for fixture in sweepable() {
        if let Some(table) = sweep(fixture)? {
            tables.push(table);
        }
    }
    info!(fixtures = tables.len(), "sweep complete");
    Ok(SweepReport { tables })
}
