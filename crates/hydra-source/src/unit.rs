use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, CursorData, CursorKind};
use crate::diagnostic::{FrontEndDiagnostic, Include};
use crate::error::SourceError;
use crate::types::{Type, TypeData};

/// Index of a cursor inside its [`TranslationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorId(pub u32);

impl CursorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a type descriptor inside its [`TranslationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// One parse of the umbrella header, as delivered by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Path of the parsed (umbrella) header.
    #[serde(default)]
    pub path: String,
    pub root: CursorId,
    pub cursors: Vec<CursorData>,
    #[serde(default)]
    pub types: Vec<TypeData>,
    #[serde(default)]
    pub diagnostics: Vec<FrontEndDiagnostic>,
    #[serde(default)]
    pub includes: Vec<Include>,
}

impl TranslationUnit {
    pub fn root(&self) -> Cursor<'_> {
        Cursor::new(self, self.root)
    }

    /// Views a cursor. Ids come from this unit, so an out-of-range id is a
    /// programming error; [`TranslationUnit::validate`] guards loaded input.
    pub fn cursor(&self, id: CursorId) -> Cursor<'_> {
        Cursor::new(self, id)
    }

    pub fn get_cursor(&self, id: CursorId) -> Option<Cursor<'_>> {
        (id.index() < self.cursors.len()).then(|| Cursor::new(self, id))
    }

    pub fn ty(&self, id: TypeId) -> Type<'_> {
        Type::new(self, id)
    }

    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    /// Checks every cursor and type reference, the root's kind, and that
    /// no cursor is reachable twice through child lists.
    pub fn validate(&self) -> Result<(), SourceError> {
        let cursor_count = self.cursors.len();
        let type_count = self.types.len();

        let check_cursor = |id: CursorId, context: &dyn Fn() -> String| {
            if id.index() < cursor_count {
                Ok(())
            } else {
                Err(SourceError::DanglingCursor { id: id.0, context: context() })
            }
        };
        let check_type = |id: TypeId, context: &dyn Fn() -> String| {
            if id.index() < type_count {
                Ok(())
            } else {
                Err(SourceError::DanglingType { id: id.0, context: context() })
            }
        };

        check_cursor(self.root, &|| "root".to_string())?;
        let root_kind = self.cursors[self.root.index()].kind;
        if root_kind != CursorKind::TranslationUnit {
            return Err(SourceError::BadRoot { id: self.root.0, kind: root_kind });
        }

        for (index, cursor) in self.cursors.iter().enumerate() {
            let context = || format!("cursor #{} ({:?} {:?})", index, cursor.kind, cursor.spelling);
            for id in [cursor.semantic_parent, cursor.lexical_parent, cursor.definition]
                .into_iter()
                .flatten()
                .chain(cursor.children.iter().copied())
            {
                check_cursor(id, &context)?;
            }
            for id in [cursor.ty, cursor.result_type].into_iter().flatten() {
                check_type(id, &context)?;
            }
        }

        for (index, ty) in self.types.iter().enumerate() {
            let context = || format!("type t{} ({:?})", index, ty.spelling);
            for id in [ty.pointee, ty.canonical].into_iter().flatten() {
                check_type(id, &context)?;
            }
            if let Some(decl) = ty.declaration {
                check_cursor(decl, &context)?;
            }
        }

        // Child lists must form a tree below the root
        let mut seen = vec![false; cursor_count];
        let mut pending = vec![(self.root, self.root)];
        while let Some((id, parent)) = pending.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(SourceError::CyclicCursor { id: id.0, parent: parent.0 });
            }
            pending.extend(self.cursors[id.index()].children.iter().map(|child| (*child, id)));
        }

        Ok(())
    }

    /// Parses and validates a JSON AST dump.
    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        let unit: TranslationUnit = serde_json::from_str(text)
            .map_err(|source| SourceError::Decode { message: source.to_string(), source })?;
        unit.validate()?;
        Ok(unit)
    }

    pub fn to_json(&self) -> Result<String, SourceError> {
        serde_json::to_string_pretty(self)
            .map_err(|source| SourceError::Decode { message: source.to_string(), source })
    }
}
