//! DOM node model: handles, the closed set of entity kinds and per-node state.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use hydra_source::{AccessSpecifier, Cursor, CursorFlags, CursorId, SourceLocation};

/// Handle of a node in the [`Dom`](crate::Dom) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Class,
    Struct,
    ClassTemplate,
    PartialSpecialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    Function,
    FunctionTemplate,
    Method,
    Constructor,
    Destructor,
}

/// Every kind of entity the DOM models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    Record(RecordKind),
    Callable(CallableKind),
    Param,
    Field,
    Variable,
    Enum,
    EnumConstant,
    TypeDef,
    TypeAlias,
    TypeAliasTemplate,
    BaseSpecifier,
    TypeRef,
    TemplateRef,
    TemplateTypeParam,
    TemplateNonTypeParam,
    /// Synthetic leaf for a type with no declaration (`int`, opaque types).
    Builtin,
}

impl NodeKind {
    pub fn is_record(self) -> bool {
        matches!(self, NodeKind::Record(_))
    }

    pub fn is_callable(self) -> bool {
        matches!(self, NodeKind::Callable(_))
    }

    /// Namespaces and the translation unit root.
    pub fn is_scope(self) -> bool {
        matches!(self, NodeKind::TranslationUnit | NodeKind::Namespace)
    }

    pub fn is_alias(self) -> bool {
        matches!(self, NodeKind::TypeDef | NodeKind::TypeAlias)
    }

    pub fn is_reference(self) -> bool {
        matches!(self, NodeKind::TypeRef | NodeKind::TemplateRef)
    }

    /// Kinds whose type is resolved by the type resolver.
    pub fn holds_type(self) -> bool {
        matches!(
            self,
            NodeKind::Callable(_)
                | NodeKind::Param
                | NodeKind::Field
                | NodeKind::Variable
                | NodeKind::TypeDef
                | NodeKind::TypeAlias
                | NodeKind::BaseSpecifier
                | NodeKind::TypeRef
                | NodeKind::TemplateRef
        )
    }

    /// Entities that can be exposed on their own: plain classes and
    /// structs, enums and free functions.
    pub fn is_bindable(self) -> bool {
        matches!(
            self,
            NodeKind::Record(RecordKind::Class | RecordKind::Struct)
                | NodeKind::Enum
                | NodeKind::Callable(CallableKind::Function)
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::TranslationUnit => "translation unit",
            NodeKind::Namespace => "namespace",
            NodeKind::Record(RecordKind::Class) => "class",
            NodeKind::Record(RecordKind::Struct) => "struct",
            NodeKind::Record(RecordKind::ClassTemplate) => "class template",
            NodeKind::Record(RecordKind::PartialSpecialization) => "partial specialization",
            NodeKind::Callable(CallableKind::Function) => "function",
            NodeKind::Callable(CallableKind::FunctionTemplate) => "function template",
            NodeKind::Callable(CallableKind::Method) => "method",
            NodeKind::Callable(CallableKind::Constructor) => "constructor",
            NodeKind::Callable(CallableKind::Destructor) => "destructor",
            NodeKind::Param => "param",
            NodeKind::Field => "field",
            NodeKind::Variable => "variable",
            NodeKind::Enum => "enum",
            NodeKind::EnumConstant => "enum constant",
            NodeKind::TypeDef => "typedef",
            NodeKind::TypeAlias => "type alias",
            NodeKind::TypeAliasTemplate => "alias template",
            NodeKind::BaseSpecifier => "base",
            NodeKind::TypeRef => "type ref",
            NodeKind::TemplateRef => "template ref",
            NodeKind::TemplateTypeParam => "template type param",
            NodeKind::TemplateNonTypeParam => "template param",
            NodeKind::Builtin => "builtin",
        };
        f.write_str(label)
    }
}

/// Memoized outcome of type resolution for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Resolution {
    #[default]
    Pending,
    /// Resolution of this node is on the stack; re-entry yields nothing.
    InProgress,
    Done(Option<NodeId>),
}

/// Resolved bases of a record, computed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BaseList {
    pub resolved: Vec<NodeId>,
    /// Base specifiers that yielded no record.
    pub unresolved: usize,
}

/// One entity of the DOM.
///
/// Cursor-derived facts (display name, location, access, flags) are copied
/// in when the node adopts a cursor so that the DOM stays readable without
/// the translation unit.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Local name, empty for anonymous entities.
    pub name: String,
    pub display_name: String,
    pub usr: Option<String>,
    /// The occurrence the node currently reflects. `None` for builtins.
    pub cursor: Option<CursorId>,
    pub owner: Option<NodeId>,
    /// Named children, each name mapping to an ordered set (overloads share
    /// a key). Anonymous children are never keyed.
    pub content: IndexMap<String, IndexSet<NodeId>>,
    /// All children in acceptance order, anonymous ones included.
    pub members: IndexSet<NodeId>,
    pub location: SourceLocation,
    pub access: AccessSpecifier,
    pub flags: CursorFlags,
    pub brief_comment: Option<String>,
    /// Set once a callable has been seen a second time (out-of-line or
    /// inline definition after a declaration).
    pub inline: bool,
    /// First type reference of a template non-type parameter.
    pub ref_type: Option<NodeId>,
    pub(crate) resolution: Resolution,
    pub(crate) bases: Option<BaseList>,
}

impl Node {
    pub(crate) fn from_cursor(kind: NodeKind, cursor: Cursor<'_>) -> Self {
        Self {
            kind,
            name: cursor.spelling().to_string(),
            display_name: cursor.display_name().to_string(),
            usr: cursor.usr().map(str::to_string),
            cursor: Some(cursor.id()),
            owner: None,
            content: IndexMap::new(),
            members: IndexSet::new(),
            location: cursor.location().clone(),
            access: cursor.access(),
            flags: cursor.flags(),
            brief_comment: cursor.brief_comment().map(str::to_string),
            inline: false,
            ref_type: None,
            resolution: Resolution::Pending,
            bases: None,
        }
    }

    pub(crate) fn builtin(spelling: &str) -> Self {
        Self {
            kind: NodeKind::Builtin,
            name: spelling.to_string(),
            display_name: spelling.to_string(),
            usr: None,
            cursor: None,
            owner: None,
            content: IndexMap::new(),
            members: IndexSet::new(),
            location: SourceLocation::default(),
            access: AccessSpecifier::None,
            flags: CursorFlags::default(),
            brief_comment: None,
            inline: false,
            ref_type: None,
            resolution: Resolution::Done(None),
            bases: None,
        }
    }

    /// Points the node at another occurrence of its declaration.
    pub(crate) fn adopt(&mut self, cursor: Cursor<'_>) {
        self.cursor = Some(cursor.id());
        self.display_name = cursor.display_name().to_string();
        self.location = cursor.location().clone();
        self.access = cursor.access();
        self.flags = cursor.flags();
        // A declaration's comment survives a definition without one
        if let Some(comment) = cursor.brief_comment() {
            self.brief_comment = Some(comment.to_string());
        }
    }

    /// Drops everything derived from the previous occurrence.
    pub(crate) fn reset(&mut self) {
        self.content.clear();
        self.members.clear();
        self.ref_type = None;
        self.resolution = Resolution::Pending;
        self.bases = None;
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_public(&self) -> bool {
        self.access.is_accessible()
    }

    pub fn is_static(&self) -> bool {
        self.flags.is_static
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.is_virtual
    }

    pub fn is_pure_virtual(&self) -> bool {
        self.flags.is_pure_virtual
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.is_abstract
    }
}
