//! The node arena and its read-only queries.

use std::fmt::Write as _;

use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexSet;

use crate::error::LookupError;
use crate::node::{CallableKind, Node, NodeId, NodeKind};

/// The semantic model of one parse: an arena of nodes rooted at the
/// translation unit, plus the USR and builtin memo tables.
///
/// Mutation happens only through a [`BuildSession`](crate::BuildSession);
/// everything public here is a read-only query.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    pub(crate) elements: FxHashMap<String, NodeId>,
    pub(crate) builtins: FxHashMap<String, NodeId>,
    root: NodeId,
}

impl Dom {
    pub(crate) fn new(root: Node) -> Self {
        let mut elements = FxHashMap::default();
        if let Some(usr) = &root.usr {
            elements.insert(usr.clone(), NodeId(0));
        }
        Self { nodes: vec![root], elements, builtins: FxHashMap::default(), root: NodeId(0) }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Registers `item` as a child of `owner`. Anonymous items are only
    /// reachable through `members`.
    pub(crate) fn attach(&mut self, owner: NodeId, item: NodeId) {
        let name = self.nodes[item.index()].name.clone();
        let owner_node = &mut self.nodes[owner.index()];
        if !name.is_empty() {
            owner_node.content.entry(name).or_default().insert(item);
        }
        owner_node.members.insert(item);
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(index, node)| (NodeId(index as u32), node))
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// The memoized node for a USR.
    pub fn by_usr(&self, usr: &str) -> Option<NodeId> {
        self.elements.get(usr).copied()
    }

    pub fn builtin(&self, spelling: &str) -> Option<NodeId> {
        self.builtins.get(spelling).copied()
    }

    /// `a::b::C`, built by walking owner links. The walk stops at the
    /// translation unit and at the first anonymous owner.
    pub fn full_name(&self, id: NodeId) -> String {
        let mut segments = vec![self.node(id).name.as_str()];
        let mut seen = FxHashSet::default();
        seen.insert(id);
        let mut current = self.node(id).owner;
        while let Some(owner) = current {
            let node = self.node(owner);
            if node.kind == NodeKind::TranslationUnit || node.name.is_empty() || !seen.insert(owner) {
                break;
            }
            segments.push(node.name.as_str());
            current = node.owner;
        }
        segments.reverse();
        segments.join("::")
    }

    /// Looks up a `::`-separated path relative to `scope`. A leading `::`
    /// anchors the lookup at the root. Returns the whole name-keyed set,
    /// so overloads come back together.
    pub fn lookup(&self, scope: NodeId, path: &str) -> Result<&IndexSet<NodeId>, LookupError> {
        let mut segments: Vec<&str> = path.split("::").collect();
        let mut current = scope;
        if segments.first() == Some(&"") {
            current = self.root;
            segments.remove(0);
        }
        let (last, intermediate) = match segments.split_last() {
            Some((last, intermediate)) if !last.is_empty() => (*last, intermediate),
            _ => return Err(LookupError::EmptyPath),
        };

        for segment in intermediate {
            let set = self.content_entry(current, path, segment)?;
            if set.len() != 1 {
                return Err(LookupError::Ambiguous {
                    path: path.to_string(),
                    segment: segment.to_string(),
                    count: set.len(),
                });
            }
            current = set[0];
        }
        self.content_entry(current, path, last)
    }

    /// Like [`Dom::lookup`], but the path must name exactly one node.
    pub fn lookup_one(&self, scope: NodeId, path: &str) -> Result<NodeId, LookupError> {
        let set = self.lookup(scope, path)?;
        match set.len() {
            1 => Ok(set[0]),
            count => Err(LookupError::Ambiguous {
                path: path.to_string(),
                segment: path.rsplit("::").next().unwrap_or(path).to_string(),
                count,
            }),
        }
    }

    /// Looks a path up from the root.
    pub fn resolve_path(&self, path: &str) -> Result<NodeId, LookupError> {
        self.lookup_one(self.root, path)
    }

    fn content_entry(&self, scope: NodeId, path: &str, segment: &str) -> Result<&IndexSet<NodeId>, LookupError> {
        self.node(scope)
            .content
            .get(segment)
            .filter(|set| !set.is_empty())
            .ok_or_else(|| LookupError::NotFound { path: path.to_string(), segment: segment.to_string() })
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).members.iter().copied()
    }

    fn children_where(&self, id: NodeId, pred: impl Fn(NodeKind) -> bool + 'static) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |child| pred(self.kind(*child)))
    }

    pub fn fields(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Field)
    }

    pub fn methods(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Callable(CallableKind::Method))
    }

    pub fn constructors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Callable(CallableKind::Constructor))
    }

    pub fn destructors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Callable(CallableKind::Destructor))
    }

    pub fn records(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, NodeKind::is_record)
    }

    pub fn enums(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Enum)
    }

    pub fn enum_constants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::EnumConstant)
    }

    pub fn parameters(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Param)
    }

    pub fn base_specifiers(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::BaseSpecifier)
    }

    pub fn namespaces(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_where(id, |kind| kind == NodeKind::Namespace)
    }

    /// Parameter list of a callable as written between the parentheses of
    /// its display name (`int, const Foo &`).
    ///
    /// The last parenthesized group is taken, so `operator()(int)` yields
    /// `int` and nested parentheses inside parameter types are kept.
    pub fn cpp_signature(&self, id: NodeId) -> &str {
        let display = self.node(id).display_name.as_str();
        let Some(close) = display.rfind(')') else {
            return "";
        };
        let mut depth = 0usize;
        for (index, ch) in display[..close].char_indices().rev() {
            match ch {
                ')' => depth += 1,
                '(' if depth == 0 => return &display[index + 1..close],
                '(' => depth -= 1,
                _ => {}
            }
        }
        ""
    }

    /// `full_name(signature)`, the key used for per-overload policies.
    pub fn signature_key(&self, id: NodeId) -> String {
        format!("{}({})", self.full_name(id), self.cpp_signature(id))
    }

    /// Other callables stored under the same name in the same owner.
    pub fn overloads(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        let Some(owner) = node.owner else {
            return Vec::new();
        };
        self.node(owner)
            .content
            .get(&node.name)
            .map(|set| {
                set.iter()
                    .copied()
                    .filter(|other| *other != id && self.kind(*other).is_callable())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_overloaded(&self, id: NodeId) -> bool {
        !self.overloads(id).is_empty()
    }

    pub fn is_bindable(&self, id: NodeId) -> bool {
        self.kind(id).is_bindable()
    }

    pub fn is_builtin(&self, id: NodeId) -> bool {
        self.kind(id) == NodeKind::Builtin
    }

    /// Indented tree of the whole DOM, one node per line.
    pub fn dump(&self) -> String {
        self.dump_from(self.root)
    }

    pub fn dump_from(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut path = FxHashSet::default();
        self.dump_node(id, 0, &mut path, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, path: &mut FxHashSet<NodeId>, out: &mut String) {
        let node = self.node(id);
        let label = if node.kind.is_callable() {
            node.display_name.as_str()
        } else if node.name.is_empty() {
            "<anonymous>"
        } else {
            node.name.as_str()
        };
        let _ = write!(out, "{:indent$}{} {}", "", node.kind, label, indent = depth * 2);
        if node.kind.is_record() && !node.is_public() {
            let _ = write!(out, " [{:?}]", node.access);
        }
        out.push('\n');

        if !path.insert(id) {
            return;
        }
        for child in &node.members {
            self.dump_node(*child, depth + 1, path, out);
        }
        path.remove(&id);
    }
}
