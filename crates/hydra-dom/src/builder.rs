//! The builder pass: a depth-first walk over the cursor tree that creates or
//! finds a node for every modeled cursor and hands it to its container.

use hydra_source::Cursor;

use crate::node::{Node, NodeId};
use crate::session::BuildSession;

impl<'tu> BuildSession<'tu> {
    pub(crate) fn walk(&mut self, container: NodeId, cursor: Cursor<'tu>) {
        self.stack.push(container);
        for child in cursor.children() {
            let Some(item) = self.make(child) else {
                continue;
            };
            if !self.accept(container, item, child) {
                log::debug!("{:indent$}reject {:?} in {}", "", child, self.dom.name(container), indent = self.depth());
            }
            if self.stack.contains(&item) {
                log::debug!("{:?} re-enters its own ancestor, not descending", child);
                continue;
            }
            // Rejected items are orphaned, their subtree is still walked.
            self.walk(item, child);
        }
        self.stack.pop();
    }

    /// Finds the node memoized under the cursor's USR or creates one.
    ///
    /// Returns `None` when the cursor kind is not modeled or the factory
    /// declines it; the caller then skips the whole subtree.
    pub(crate) fn make(&mut self, cursor: Cursor<'tu>) -> Option<NodeId> {
        let constructor = self.factory.get(cursor.kind())?;
        let usr = cursor.usr();

        if let Some(usr) = usr {
            if let Some(existing) = self.dom.by_usr(usr) {
                self.merge_occurrence(existing, cursor);
                return Some(existing);
            }
        }

        let Some(kind) = constructor(cursor) else {
            log::debug!("skip: {:?}", cursor);
            return None;
        };
        let id = self.dom.alloc(Node::from_cursor(kind, cursor));
        if let Some(usr) = usr {
            self.dom.elements.insert(usr.to_string(), id);
        }
        Some(id)
    }

    /// Folds another occurrence of an already-known declaration into its
    /// node. Identity never changes.
    ///
    /// Callables rebuild from the new occurrence: their parameters and
    /// cached signature and return type are dropped and the subsequent walk
    /// repopulates them. Every other node switches to the new cursor only
    /// while it is still empty, which is how a forward declaration gets
    /// upgraded to its definition.
    pub(crate) fn merge_occurrence(&mut self, id: NodeId, cursor: Cursor<'tu>) {
        let node = self.dom.node_mut(id);
        if node.kind.is_callable() {
            log::debug!("new occurrence of {}: {:?} at {}", node.name, cursor, cursor.location());
            node.reset();
            node.adopt(cursor);
            node.inline = true;
        } else if node.members.is_empty() {
            node.adopt(cursor);
        }
    }
}
