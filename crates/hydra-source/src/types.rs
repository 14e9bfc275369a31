use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::unit::{CursorId, TranslationUnit, TypeId};

/// Type kinds, following libclang's `CXTypeKind` naming in serialized form.
///
/// Fundamental types are collapsed into [`TypeKind::Builtin`]; the spelling
/// carries the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Invalid,
    Unexposed,
    Void,
    Builtin,
    Pointer,
    LValueReference,
    RValueReference,
    Record,
    Enum,
    Typedef,
    Elaborated,
    ConstantArray,
    IncompleteArray,
    FunctionProto,
    Auto,
    #[serde(other)]
    Other,
}

impl TypeKind {
    pub fn is_indirection(self) -> bool {
        matches!(self, TypeKind::Pointer | TypeKind::LValueReference | TypeKind::RValueReference)
    }
}

/// Serialized form of a type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeData {
    pub kind: TypeKind,
    #[serde(default)]
    pub spelling: String,
    /// Target of a pointer or reference.
    #[serde(default)]
    pub pointee: Option<TypeId>,
    /// Declaring cursor; absent means "no declaration found".
    #[serde(default)]
    pub declaration: Option<CursorId>,
    /// Fully unwrapped form; absent means the type is already canonical.
    #[serde(default)]
    pub canonical: Option<TypeId>,
}

impl TypeData {
    pub fn new(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self { kind, spelling: spelling.into(), pointee: None, declaration: None, canonical: None }
    }
}

/// A borrowed view of one type descriptor.
#[derive(Clone, Copy)]
pub struct Type<'tu> {
    unit: &'tu TranslationUnit,
    id: TypeId,
}

impl<'tu> Type<'tu> {
    pub(crate) fn new(unit: &'tu TranslationUnit, id: TypeId) -> Self {
        Self { unit, id }
    }

    fn data(&self) -> &'tu TypeData {
        &self.unit.types[self.id.index()]
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn kind(&self) -> TypeKind {
        self.data().kind
    }

    pub fn spelling(&self) -> &'tu str {
        &self.data().spelling
    }

    pub fn is_valid(&self) -> bool {
        self.kind() != TypeKind::Invalid
    }

    /// One level of pointer or reference stripped, `None` for anything that
    /// is not an indirection.
    pub fn pointee(&self) -> Option<Type<'tu>> {
        if !self.kind().is_indirection() {
            return None;
        }
        self.data()
            .pointee
            .map(|id| Type::new(self.unit, id))
            .filter(|pointee| pointee.is_valid())
    }

    /// Every level of *pointer* indirection stripped. References are kept.
    pub fn strip_pointers(&self) -> Type<'tu> {
        let mut current = *self;
        while current.kind() == TypeKind::Pointer {
            match current.pointee() {
                Some(pointee) => current = pointee,
                None => break,
            }
        }
        current
    }

    /// The declaring cursor, or `None` when the front end found no
    /// declaration (fundamental types, opaque library types).
    pub fn declaration(&self) -> Option<Cursor<'tu>> {
        self.data().declaration.map(|id| Cursor::new(self.unit, id))
    }

    pub fn definition(&self) -> Option<Cursor<'tu>> {
        self.declaration().and_then(|decl| decl.definition())
    }

    pub fn canonical(&self) -> Type<'tu> {
        match self.data().canonical {
            Some(id) => Type::new(self.unit, id),
            None => *self,
        }
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{:?}", self.kind(), self.spelling())
    }
}
