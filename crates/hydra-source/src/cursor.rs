use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Type;
use crate::unit::{CursorId, TranslationUnit, TypeId};

/// The closed set of cursor kinds the front end can report.
///
/// Names follow libclang's `CXCursorKind` spelling in serialized form
/// (`CLASS_DECL`, `CXX_METHOD`, ...). Anything the adapter cannot map lands in
/// [`CursorKind::Other`] and is never modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CursorKind {
    TranslationUnit,
    Namespace,
    ClassDecl,
    StructDecl,
    UnionDecl,
    ClassTemplate,
    ClassTemplatePartialSpecialization,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    VarDecl,
    FunctionDecl,
    FunctionTemplate,
    CxxMethod,
    Constructor,
    Destructor,
    ConversionFunction,
    ParmDecl,
    TypedefDecl,
    TypeAliasDecl,
    TypeAliasTemplateDecl,
    CxxBaseSpecifier,
    CxxAccessSpecDecl,
    TypeRef,
    TemplateRef,
    NamespaceRef,
    TemplateTypeParameter,
    TemplateNonTypeParameter,
    TemplateTemplateParameter,
    UsingDirective,
    UsingDeclaration,
    UnexposedDecl,
    LinkageSpec,
    FriendDecl,
    StaticAssert,
    CompoundStmt,
    UnexposedExpr,
    UnexposedAttr,
    NoDeclFound,
    #[serde(other)]
    Other,
}

impl CursorKind {
    /// Whether the kind is a reference to another declaration rather than a
    /// declaration itself.
    pub fn is_reference(self) -> bool {
        matches!(self, CursorKind::TypeRef | CursorKind::TemplateRef | CursorKind::NamespaceRef)
    }

    pub fn is_template_parameter(self) -> bool {
        matches!(
            self,
            CursorKind::TemplateTypeParameter
                | CursorKind::TemplateNonTypeParameter
                | CursorKind::TemplateTemplateParameter
        )
    }
}

/// C++ member access as reported by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
    /// Not a class member (namespace scope, parameters, ...).
    #[default]
    #[serde(alias = "invalid")]
    None,
}

impl AccessSpecifier {
    /// Visible from outside: public members and anything at namespace scope.
    pub fn is_accessible(self) -> bool {
        matches!(self, AccessSpecifier::Public | AccessSpecifier::None)
    }
}

/// A position in a source file. Front ends may omit the file for builtins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self { file: Some(file.into()), line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "<unknown location>"),
        }
    }
}

/// Per-declaration boolean facts the front end computes for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorFlags {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_pure_virtual: bool,
    pub is_abstract: bool,
    /// The cursor is the definition of its entity (not a forward declaration).
    pub is_definition: bool,
}

/// Serialized form of a single cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorData {
    pub kind: CursorKind,
    #[serde(default)]
    pub spelling: String,
    /// Spelling plus the parameter list for callables (`f(int, Foo &)`).
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub usr: Option<String>,
    #[serde(default)]
    pub semantic_parent: Option<CursorId>,
    #[serde(default)]
    pub lexical_parent: Option<CursorId>,
    #[serde(default)]
    pub location: SourceLocation,
    #[serde(default)]
    pub access: AccessSpecifier,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeId>,
    #[serde(default)]
    pub result_type: Option<TypeId>,
    #[serde(default)]
    pub definition: Option<CursorId>,
    #[serde(default)]
    pub children: Vec<CursorId>,
    #[serde(default)]
    pub flags: CursorFlags,
    /// First paragraph of the documentation comment, if any.
    #[serde(default)]
    pub brief_comment: Option<String>,
}

impl CursorData {
    pub fn new(kind: CursorKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            display_name: None,
            usr: None,
            semantic_parent: None,
            lexical_parent: None,
            location: SourceLocation::default(),
            access: AccessSpecifier::None,
            ty: None,
            result_type: None,
            definition: None,
            children: Vec::new(),
            flags: CursorFlags::default(),
            brief_comment: None,
        }
    }
}

/// A borrowed view of one cursor of a [`TranslationUnit`].
#[derive(Clone, Copy)]
pub struct Cursor<'tu> {
    unit: &'tu TranslationUnit,
    id: CursorId,
}

impl<'tu> Cursor<'tu> {
    pub(crate) fn new(unit: &'tu TranslationUnit, id: CursorId) -> Self {
        Self { unit, id }
    }

    fn data(&self) -> &'tu CursorData {
        &self.unit.cursors[self.id.index()]
    }

    pub fn id(&self) -> CursorId {
        self.id
    }

    pub fn unit(&self) -> &'tu TranslationUnit {
        self.unit
    }

    pub fn kind(&self) -> CursorKind {
        self.data().kind
    }

    pub fn spelling(&self) -> &'tu str {
        &self.data().spelling
    }

    /// The display name, falling back to the spelling when the front end
    /// did not provide one.
    pub fn display_name(&self) -> &'tu str {
        self.data().display_name.as_deref().unwrap_or(&self.data().spelling)
    }

    /// The stable symbol reference. Empty strings count as absent.
    pub fn usr(&self) -> Option<&'tu str> {
        self.data().usr.as_deref().filter(|usr| !usr.is_empty())
    }

    pub fn semantic_parent(&self) -> Option<Cursor<'tu>> {
        self.data().semantic_parent.map(|id| Cursor::new(self.unit, id))
    }

    pub fn lexical_parent(&self) -> Option<Cursor<'tu>> {
        self.data().lexical_parent.map(|id| Cursor::new(self.unit, id))
    }

    pub fn location(&self) -> &'tu SourceLocation {
        &self.data().location
    }

    pub fn access(&self) -> AccessSpecifier {
        self.data().access
    }

    pub fn flags(&self) -> CursorFlags {
        self.data().flags
    }

    /// Empty comments count as absent.
    pub fn brief_comment(&self) -> Option<&'tu str> {
        self.data().brief_comment.as_deref().filter(|comment| !comment.trim().is_empty())
    }

    /// The declared type. A missing descriptor reads as `None`, an explicit
    /// invalid descriptor is returned as-is so callers can tell them apart.
    pub fn ty(&self) -> Option<Type<'tu>> {
        self.data().ty.map(|id| Type::new(self.unit, id))
    }

    pub fn result_type(&self) -> Option<Type<'tu>> {
        self.data().result_type.map(|id| Type::new(self.unit, id))
    }

    /// The definition of the entity this cursor declares or references.
    ///
    /// A cursor flagged as a definition is its own definition.
    pub fn definition(&self) -> Option<Cursor<'tu>> {
        match self.data().definition {
            Some(id) => Some(Cursor::new(self.unit, id)),
            None if self.data().flags.is_definition => Some(*self),
            None => None,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = Cursor<'tu>> + 'tu {
        let unit = self.unit;
        self.data().children.iter().map(move |id| Cursor::new(unit, *id))
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.unit, other.unit) && self.id == other.id
    }
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{:?}", self.kind(), self.spelling())
    }
}
