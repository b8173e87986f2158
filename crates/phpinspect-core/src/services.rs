//! Host-supplied semantic services
//!
//! Inspections run on a single file, but some decisions need project-level
//! knowledge: what type an expression has, what classes exist and how they
//! extend each other. The host supplies that knowledge through the traits
//! here. The `Null*` implementations know nothing, which makes every
//! dependent inspection fail safe (toward silence).

use std::collections::HashMap;

use mago_span::HasSpan;
use mago_syntax::ast::Expression;

/// A resolved PHP value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhpType {
    String,
    Int,
    Float,
    Bool,
    Null,
    Array,
    /// An object, optionally of a known class.
    Object(Option<String>),
    Callable,
    Resource,
    Mixed,
}

/// The set of types an expression may hold at runtime
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    types: Vec<PhpType>,
    has_unknown: bool,
}

impl TypeSet {
    pub fn new(types: Vec<PhpType>) -> Self {
        Self {
            types,
            has_unknown: false,
        }
    }

    /// A set that resolved, but to nothing usable.
    pub fn unknown() -> Self {
        Self {
            types: Vec::new(),
            has_unknown: true,
        }
    }

    /// Mark the set as incomplete: the listed types are possible but other,
    /// unresolved types may occur too.
    pub fn with_unknown(mut self) -> Self {
        self.has_unknown = true;
        self
    }

    pub fn has_unknown(&self) -> bool {
        self.has_unknown
    }

    pub fn contains_string(&self) -> bool {
        self.types.contains(&PhpType::String)
    }

    pub fn types(&self) -> &[PhpType] {
        &self.types
    }
}

/// Expression type lookup
pub trait TypeResolver: Send + Sync {
    /// Resolve the possible runtime types of `expr`, or `None` when the
    /// resolver has no information about it.
    fn resolve_type(&self, expr: &Expression<'_>, source: &str) -> Option<TypeSet>;
}

/// Resolver that knows nothing
pub struct NullTypeResolver;

impl TypeResolver for NullTypeResolver {
    fn resolve_type(&self, _expr: &Expression<'_>, _source: &str) -> Option<TypeSet> {
        None
    }
}

/// Resolver backed by a map from expression text to type set; used by hosts
/// with precomputed type information and by tests
#[derive(Default)]
pub struct MapTypeResolver {
    by_text: HashMap<String, TypeSet>,
}

impl MapTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: impl Into<String>, types: TypeSet) {
        self.by_text.insert(text.into(), types);
    }

    pub fn with_type(mut self, text: impl Into<String>, types: TypeSet) -> Self {
        self.insert(text, types);
        self
    }
}

impl TypeResolver for MapTypeResolver {
    fn resolve_type(&self, expr: &Expression<'_>, source: &str) -> Option<TypeSet> {
        let span = expr.span();
        let text = source.get(span.start.offset as usize..span.end.offset as usize)?;
        self.by_text.get(text).cloned()
    }
}

/// Summary of a project class known to the index
#[derive(Debug, Clone)]
pub struct ClassStub {
    pub fqn: String,
    pub parent: Option<String>,
}

impl ClassStub {
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            parent: None,
        }
    }

    pub fn extending(fqn: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            parent: Some(parent.into()),
        }
    }
}

/// Project class hierarchy lookup
pub trait ClassIndex: Send + Sync {
    /// All classes with the given fully qualified name. PHP projects can
    /// declare the same name in multiple files, so this is a list.
    fn classes_by_fqn(&self, fqn: &str) -> Vec<ClassStub>;

    /// Classes directly extending the one named.
    fn direct_subclasses(&self, fqn: &str) -> Vec<ClassStub>;
}

/// Index that knows nothing
pub struct NullClassIndex;

impl ClassIndex for NullClassIndex {
    fn classes_by_fqn(&self, _fqn: &str) -> Vec<ClassStub> {
        Vec::new()
    }

    fn direct_subclasses(&self, _fqn: &str) -> Vec<ClassStub> {
        Vec::new()
    }
}

/// In-memory index over a fixed class list
#[derive(Default)]
pub struct MapClassIndex {
    classes: Vec<ClassStub>,
}

impl MapClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stub: ClassStub) {
        self.classes.push(stub);
    }

    pub fn with_class(mut self, stub: ClassStub) -> Self {
        self.insert(stub);
        self
    }
}

impl ClassIndex for MapClassIndex {
    fn classes_by_fqn(&self, fqn: &str) -> Vec<ClassStub> {
        self.classes
            .iter()
            .filter(|stub| fqn_eq(&stub.fqn, fqn))
            .cloned()
            .collect()
    }

    fn direct_subclasses(&self, fqn: &str) -> Vec<ClassStub> {
        self.classes
            .iter()
            .filter(|stub| {
                stub.parent
                    .as_deref()
                    .is_some_and(|parent| fqn_eq(parent, fqn))
            })
            .cloned()
            .collect()
    }
}

/// PHP class names are case-insensitive and a leading separator is optional.
fn fqn_eq(a: &str, b: &str) -> bool {
    a.trim_start_matches('\\')
        .eq_ignore_ascii_case(b.trim_start_matches('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typeset_string_detection() {
        let set = TypeSet::new(vec![PhpType::String, PhpType::Null]);
        assert!(set.contains_string());
        assert!(!set.has_unknown());
    }

    #[test]
    fn test_typeset_unknown_flag() {
        let set = TypeSet::new(vec![PhpType::Int]).with_unknown();
        assert!(set.has_unknown());
        assert!(!set.contains_string());
    }

    #[test]
    fn test_map_class_index_lookup_is_case_insensitive() {
        let index = MapClassIndex::new().with_class(ClassStub::new("\\Acme\\Widget"));
        assert_eq!(index.classes_by_fqn("\\acme\\widget").len(), 1);
        assert_eq!(index.classes_by_fqn("Acme\\Widget").len(), 1);
        assert!(index.classes_by_fqn("\\Other").is_empty());
    }

    #[test]
    fn test_map_class_index_direct_subclasses() {
        let index = MapClassIndex::new()
            .with_class(ClassStub::new("\\Base"))
            .with_class(ClassStub::extending("\\Child", "\\Base"))
            .with_class(ClassStub::extending("\\Grandchild", "\\Child"));

        let subs = index.direct_subclasses("\\Base");
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].fqn, "\\Child");
    }
}
