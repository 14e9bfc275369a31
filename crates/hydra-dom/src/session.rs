use hydra_source::{Cursor, TranslationUnit};

use crate::dom::Dom;
use crate::error::DomDiagnostic;
use crate::factory::Factory;
use crate::node::{Node, NodeId, NodeKind};

/// Owns everything one run needs: the parsed unit, the factory, the DOM
/// with its memo tables, the diagnostics and the walk stack.
///
/// A session is built once ([`BuildSession::build`]); afterwards the type
/// resolver fills per-node caches lazily through `&mut self`.
pub struct BuildSession<'tu> {
    pub(crate) unit: &'tu TranslationUnit,
    pub(crate) factory: Factory,
    pub(crate) dom: Dom,
    pub(crate) diagnostics: Vec<DomDiagnostic>,
    pub(crate) stack: Vec<NodeId>,
    built: bool,
}

impl<'tu> BuildSession<'tu> {
    pub fn new(unit: &'tu TranslationUnit) -> Self {
        Self::with_factory(unit, Factory::default())
    }

    pub fn with_factory(unit: &'tu TranslationUnit, factory: Factory) -> Self {
        let root = Node::from_cursor(NodeKind::TranslationUnit, unit.root());
        Self {
            unit,
            factory,
            dom: Dom::new(root),
            diagnostics: Vec::new(),
            stack: Vec::new(),
            built: false,
        }
    }

    /// Creates a session and runs the builder pass.
    pub fn build_from(unit: &'tu TranslationUnit) -> Self {
        let mut session = Self::new(unit);
        session.build();
        session
    }

    /// Walks the whole translation unit once. Later calls are no-ops.
    pub fn build(&mut self) {
        if self.built {
            return;
        }
        self.built = true;

        let unit = self.unit;
        for diagnostic in &unit.diagnostics {
            self.diagnostics.push(DomDiagnostic::ParseDiagnostic {
                severity: diagnostic.severity,
                message: diagnostic.message.clone(),
                location: diagnostic.location.clone(),
            });
        }

        let root = self.dom.root();
        self.walk(root, unit.root());
        log::debug!(
            "built DOM for {}: {} nodes, {} USRs, {} diagnostics",
            self.unit.path,
            self.dom.len(),
            self.dom.elements.len(),
            self.diagnostics.len()
        );
    }

    pub fn unit(&self) -> &'tu TranslationUnit {
        self.unit
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn diagnostics(&self) -> &[DomDiagnostic] {
        &self.diagnostics
    }

    /// Nesting depth of the walk, for trace indentation.
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_parts(self) -> (Dom, Vec<DomDiagnostic>) {
        (self.dom, self.diagnostics)
    }

    /// Records a diagnostic and logs it.
    pub(crate) fn report(&mut self, diagnostic: DomDiagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn cursor_of(&self, id: NodeId) -> Option<Cursor<'tu>> {
        self.dom.node(id).cursor.map(|cursor| self.unit.cursor(cursor))
    }
}
