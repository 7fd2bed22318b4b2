//! Named registry of fixtures and a uniform way to invoke them
//!
//! A harness addresses fixtures by kebab-case name and passes arguments
//! as text. [`invoke`] decodes the arguments against the fixture's
//! parameter list, runs it, and reports the [`Outcome`] together with the
//! node graph as it stands after the call.

use crate::error::FixtureError;
use crate::fixtures;
use crate::node::{NodeGraph, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Every fixture in the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fixture {
    ConditionalCall,
    HashOf,
    ByteSaturationCheck,
    SwitchDispatch,
    Take,
    NullableChoice,
    CompositeFlags,
    AliasMutation,
    MutateChain,
    FinalizeChain,
    UnboundedRecursion,
    Foo,
    ChainA,
    ChainB,
    ChainC,
    Identity,
}

/// Declared type of a fixture parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Bool,
    I8,
    I32,
    I64,
    /// Node index into the supplied graph, or `null`
    Node,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Bool => "bool",
            ParamKind::I8 => "i8",
            ParamKind::I32 => "i32",
            ParamKind::I64 => "i64",
            ParamKind::Node => "node",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ParamKind::Bool => "true or false",
            ParamKind::I8 => "an integer in -128..=127",
            ParamKind::I32 => "a 32-bit integer",
            ParamKind::I64 => "a 64-bit integer",
            ParamKind::Node => "a node index or null",
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Descriptor exposed by `fixtures list`
#[derive(Debug, Clone, Serialize)]
pub struct FixtureInfo {
    pub fixture: Fixture,
    pub name: &'static str,
    pub params: &'static [Param],
    pub returns: &'static str,
    /// Outcome labels the fixture documents, empty when open-ended
    pub outcomes: &'static [&'static str],
    /// Never returns; only runs when divergence is explicitly allowed
    pub divergent: bool,
    /// Reads or writes a node graph
    pub uses_graph: bool,
}

impl Fixture {
    pub const ALL: [Fixture; 16] = [
        Fixture::ConditionalCall,
        Fixture::HashOf,
        Fixture::ByteSaturationCheck,
        Fixture::SwitchDispatch,
        Fixture::Take,
        Fixture::NullableChoice,
        Fixture::CompositeFlags,
        Fixture::AliasMutation,
        Fixture::MutateChain,
        Fixture::FinalizeChain,
        Fixture::UnboundedRecursion,
        Fixture::Foo,
        Fixture::ChainA,
        Fixture::ChainB,
        Fixture::ChainC,
        Fixture::Identity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Fixture::ConditionalCall => "conditional-call",
            Fixture::HashOf => "hash-of",
            Fixture::ByteSaturationCheck => "byte-saturation-check",
            Fixture::SwitchDispatch => "switch-dispatch",
            Fixture::Take => "take",
            Fixture::NullableChoice => "nullable-choice",
            Fixture::CompositeFlags => "composite-flags",
            Fixture::AliasMutation => "alias-mutation",
            Fixture::MutateChain => "mutate-chain",
            Fixture::FinalizeChain => "finalize-chain",
            Fixture::UnboundedRecursion => "unbounded-recursion",
            Fixture::Foo => "foo",
            Fixture::ChainA => "chain-a",
            Fixture::ChainB => "chain-b",
            Fixture::ChainC => "chain-c",
            Fixture::Identity => "identity",
        }
    }

    pub fn from_name(name: &str) -> Option<Fixture> {
        Fixture::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Like [`Fixture::from_name`], with an error for unknown names
    pub fn parse(name: &str) -> Result<Fixture, CatalogError> {
        Fixture::from_name(name).ok_or_else(|| CatalogError::UnknownFixture(name.to_string()))
    }

    pub fn params(self) -> &'static [Param] {
        use ParamKind::*;
        match self {
            Fixture::ConditionalCall => &[Param { name: "a", kind: Bool }],
            Fixture::HashOf => &[Param { name: "obj", kind: Node }],
            Fixture::ByteSaturationCheck => &[
                Param { name: "a", kind: I8 },
                Param { name: "b", kind: I8 },
            ],
            Fixture::SwitchDispatch => &[
                Param { name: "a", kind: I32 },
                Param { name: "b", kind: I32 },
            ],
            Fixture::Take => &[],
            Fixture::NullableChoice => &[Param { name: "a", kind: I32 }],
            Fixture::CompositeFlags => &[
                Param { name: "b1", kind: Bool },
                Param { name: "b2", kind: Bool },
                Param { name: "b3", kind: Bool },
                Param { name: "b4", kind: Bool },
                Param { name: "b5", kind: Bool },
            ],
            Fixture::AliasMutation => &[
                Param { name: "a", kind: Node },
                Param { name: "b", kind: Node },
            ],
            Fixture::MutateChain | Fixture::FinalizeChain => &[Param { name: "a", kind: Node }],
            Fixture::UnboundedRecursion => &[Param { name: "x", kind: I32 }],
            Fixture::Foo => &[Param { name: "x", kind: I64 }],
            Fixture::ChainA | Fixture::ChainB | Fixture::Identity => {
                &[Param { name: "x", kind: I32 }]
            }
            Fixture::ChainC => &[Param { name: "x", kind: I32 }, Param { name: "y", kind: I32 }],
        }
    }

    pub fn info(self) -> FixtureInfo {
        let (returns, outcomes): (&'static str, &'static [&'static str]) = match self {
            Fixture::ConditionalCall | Fixture::HashOf => ("i32", &[]),
            Fixture::ByteSaturationCheck => ("i32", &["1", "2", "3"]),
            Fixture::SwitchDispatch => ("i32", &["-1", "0", "1", "2", "3", "4", "5", "6"]),
            Fixture::Take => ("string", &["\"Hello\""]),
            Fixture::NullableChoice => ("string?", &["null", "\"b\""]),
            Fixture::CompositeFlags => ("i32", &["0", "1", "2", "3"]),
            Fixture::AliasMutation => ("i32", &["0", "2", "1337", "fault:NullReference"]),
            Fixture::MutateChain | Fixture::FinalizeChain => {
                ("unit", &["unit", "fault:NullReference"])
            }
            Fixture::UnboundedRecursion => ("i32", &[]),
            Fixture::Foo => ("i8", &["1"]),
            Fixture::ChainA => ("i32", &["0", "1"]),
            Fixture::ChainB | Fixture::ChainC | Fixture::Identity => ("i32", &[]),
        };

        FixtureInfo {
            fixture: self,
            name: self.name(),
            params: self.params(),
            returns,
            outcomes,
            divergent: matches!(self, Fixture::UnboundedRecursion),
            uses_graph: self.params().iter().any(|p| p.kind == ParamKind::Node)
                || matches!(self, Fixture::ConditionalCall),
        }
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value a fixture returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Str(String),
    Null,
    Unit,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Null => f.write_str("null"),
            Value::Unit => f.write_str("unit"),
        }
    }
}

/// What a single fixture call observably did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Returned(Value),
    Fault(FixtureError),
}

impl Outcome {
    fn from_result<T: Into<Value>>(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(v) => Outcome::Returned(v.into()),
            Err(e) => Outcome::Fault(e),
        }
    }

    /// Short label used to group outcomes, e.g. `3`, `null` or
    /// `fault:NullReference`
    pub fn label(&self) -> String {
        match self {
            Outcome::Returned(value) => value.to_string(),
            Outcome::Fault(err) => format!("fault:{}", err.category()),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::Fault(_))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        match v {
            Some(s) => Value::Str(s.to_string()),
            None => Value::Null,
        }
    }
}

/// Result of [`invoke`]
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    pub fixture: Fixture,
    pub args: Vec<String>,
    pub outcome: Outcome,
    /// Node graph after the call, for fixtures that use one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<NodeGraph>,
}

/// Problems with a request, as opposed to faults raised by the fixture
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown fixture '{0}'")]
    UnknownFixture(String),

    #[error("{fixture} takes {expected} argument(s), got {got}")]
    Arity {
        fixture: Fixture,
        expected: usize,
        got: usize,
    },

    #[error("argument '{param}' of {fixture}: expected {expected}, got '{value}'")]
    InvalidArgument {
        fixture: Fixture,
        param: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("node {id} is not in the supplied graph ({len} node(s))")]
    UnknownNode { id: NodeId, len: usize },

    #[error("invalid node graph: {0}")]
    InvalidGraph(FixtureError),

    #[error("{0} never returns; divergence must be explicitly allowed")]
    Divergent(Fixture),
}

/// A decoded, type-checked call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    ConditionalCall(bool),
    HashOf(Option<NodeId>),
    ByteSaturationCheck(i8, i8),
    SwitchDispatch(i32, i32),
    Take,
    NullableChoice(i32),
    CompositeFlags(bool, bool, bool, bool, bool),
    AliasMutation(Option<NodeId>, Option<NodeId>),
    MutateChain(Option<NodeId>),
    FinalizeChain(Option<NodeId>),
    UnboundedRecursion(i32),
    Foo(i64),
    ChainA(i32),
    ChainB(i32),
    ChainC(i32, i32),
    Identity(i32),
}

/// Cursor over the textual arguments of one call
struct ArgReader<'a> {
    fixture: Fixture,
    params: &'static [Param],
    raw: &'a [String],
    pos: usize,
}

impl<'a> ArgReader<'a> {
    fn new(fixture: Fixture, raw: &'a [String]) -> Result<Self, CatalogError> {
        let params = fixture.params();
        if params.len() != raw.len() {
            return Err(CatalogError::Arity {
                fixture,
                expected: params.len(),
                got: raw.len(),
            });
        }
        Ok(ArgReader { fixture, params, raw, pos: 0 })
    }

    fn next_raw(&mut self) -> (Param, &'a str) {
        let p = self.params[self.pos];
        let all: &'a [String] = self.raw;
        let raw = all[self.pos].as_str();
        self.pos += 1;
        (p, raw)
    }

    fn invalid(&self, p: Param, raw: &str) -> CatalogError {
        CatalogError::InvalidArgument {
            fixture: self.fixture,
            param: p.name,
            expected: p.kind.describe(),
            value: raw.to_string(),
        }
    }

    fn bool(&mut self) -> Result<bool, CatalogError> {
        let (p, raw) = self.next_raw();
        match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.invalid(p, raw)),
        }
    }

    fn int<T: std::str::FromStr>(&mut self) -> Result<T, CatalogError> {
        let (p, raw) = self.next_raw();
        raw.trim().parse().map_err(|_| self.invalid(p, raw))
    }

    fn node(&mut self, graph: &NodeGraph) -> Result<Option<NodeId>, CatalogError> {
        let (p, raw) = self.next_raw();
        if raw.trim() == "null" {
            return Ok(None);
        }
        let index: usize = raw.trim().parse().map_err(|_| self.invalid(p, raw))?;
        if index >= graph.len() {
            return Err(CatalogError::UnknownNode {
                id: NodeId::new(index),
                len: graph.len(),
            });
        }
        Ok(Some(NodeId::new(index)))
    }
}

impl Call {
    fn decode(fixture: Fixture, raw: &[String], graph: &NodeGraph) -> Result<Call, CatalogError> {
        let mut r = ArgReader::new(fixture, raw)?;
        let call = match fixture {
            Fixture::ConditionalCall => Call::ConditionalCall(r.bool()?),
            Fixture::HashOf => Call::HashOf(r.node(graph)?),
            Fixture::ByteSaturationCheck => Call::ByteSaturationCheck(r.int()?, r.int()?),
            Fixture::SwitchDispatch => Call::SwitchDispatch(r.int()?, r.int()?),
            Fixture::Take => Call::Take,
            Fixture::NullableChoice => Call::NullableChoice(r.int()?),
            Fixture::CompositeFlags => {
                Call::CompositeFlags(r.bool()?, r.bool()?, r.bool()?, r.bool()?, r.bool()?)
            }
            Fixture::AliasMutation => Call::AliasMutation(r.node(graph)?, r.node(graph)?),
            Fixture::MutateChain => Call::MutateChain(r.node(graph)?),
            Fixture::FinalizeChain => Call::FinalizeChain(r.node(graph)?),
            Fixture::UnboundedRecursion => Call::UnboundedRecursion(r.int()?),
            Fixture::Foo => Call::Foo(r.int()?),
            Fixture::ChainA => Call::ChainA(r.int()?),
            Fixture::ChainB => Call::ChainB(r.int()?),
            Fixture::ChainC => Call::ChainC(r.int()?, r.int()?),
            Fixture::Identity => Call::Identity(r.int()?),
        };
        Ok(call)
    }

    fn run(self, graph: &mut NodeGraph) -> Outcome {
        match self {
            Call::ConditionalCall(a) => Outcome::from_result(fixtures::conditional_call(graph, a)),
            Call::HashOf(obj) => Outcome::from_result(fixtures::hash_of(graph, obj)),
            Call::ByteSaturationCheck(a, b) => {
                Outcome::Returned(fixtures::byte_saturation_check(a, b).into())
            }
            Call::SwitchDispatch(a, b) => Outcome::Returned(fixtures::switch_dispatch(a, b).into()),
            Call::Take => Outcome::Returned(Some(fixtures::take()).into()),
            Call::NullableChoice(a) => Outcome::Returned(fixtures::nullable_choice(a).into()),
            Call::CompositeFlags(b1, b2, b3, b4, b5) => {
                Outcome::Returned(fixtures::composite_flags(b1, b2, b3, b4, b5).into())
            }
            Call::AliasMutation(a, b) => {
                Outcome::from_result(fixtures::alias_mutation(graph, a, b))
            }
            Call::MutateChain(a) => Outcome::from_result(fixtures::mutate_chain(graph, a)),
            Call::FinalizeChain(a) => Outcome::from_result(fixtures::finalize_chain(graph, a)),
            Call::UnboundedRecursion(x) => {
                Outcome::Returned(fixtures::unbounded_recursion(x).into())
            }
            Call::Foo(x) => Outcome::Returned(fixtures::foo(x).into()),
            Call::ChainA(x) => Outcome::Returned(fixtures::chain_a(x).into()),
            Call::ChainB(x) => Outcome::Returned(fixtures::chain_b(x).into()),
            Call::ChainC(x, y) => Outcome::Returned(fixtures::chain_c(x, y).into()),
            Call::Identity(x) => Outcome::Returned(fixtures::identity(x).into()),
        }
    }
}

/// Decode `args` and run `fixture`
///
/// `graph` defaults to an empty graph. Divergent fixtures are refused with
/// [`CatalogError::Divergent`]; see [`invoke_allowing_divergence`].
pub fn invoke(
    fixture: Fixture,
    args: &[String],
    graph: Option<NodeGraph>,
) -> Result<Invocation, CatalogError> {
    if fixture.info().divergent {
        return Err(CatalogError::Divergent(fixture));
    }
    invoke_allowing_divergence(fixture, args, graph)
}

/// Like [`invoke`], but also runs fixtures that never return
///
/// For [`Fixture::UnboundedRecursion`] this does not come back: the thread
/// exhausts its stack and the process aborts.
pub fn invoke_allowing_divergence(
    fixture: Fixture,
    args: &[String],
    graph: Option<NodeGraph>,
) -> Result<Invocation, CatalogError> {
    let mut graph = graph.unwrap_or_default();
    graph.validate().map_err(CatalogError::InvalidGraph)?;

    let call = Call::decode(fixture, args, &graph)?;
    debug!(%fixture, ?call, "invoking fixture");
    let outcome = call.run(&mut graph);
    debug!(%fixture, outcome = %outcome.label(), "fixture finished");

    let info = fixture.info();
    Ok(Invocation {
        fixture,
        args: args.to_vec(),
        outcome,
        graph: info.uses_graph.then_some(graph),
    })
}
