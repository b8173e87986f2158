//! Singleton and factory shape violations
//!
//! A class with a `getInstance` accessor is a singleton; its constructor
//! must not be public or the accessor can be bypassed. A class that hides
//! its constructor behind `protected` without offering `getInstance` or a
//! `create*`/`from*` factory method cannot be instantiated sensibly at all.

use mago_span::HasSpan;
use mago_syntax::ast::{Class, ClassLikeMember, Method, Modifier};

use phpinspect_core::engine::{InspectionContext, Inspector, NodeKind};
use phpinspect_core::walk::Frame;
use phpinspect_core::{Diagnostic, Severity};

pub const RULE_NAME: &str = "singleton_factory_pattern";

#[derive(PartialEq, Eq, Clone, Copy)]
enum Visibility {
    Public,
    Protected,
    Private,
}

pub struct SingletonFactoryPattern;

impl Inspector for SingletonFactoryPattern {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Reports singleton and factory classes with a broken constructor contract"
    }

    fn targets(&self) -> &'static [NodeKind] {
        &[NodeKind::ClassDeclaration]
    }

    fn check_class<'a>(
        &self,
        class: &'a Class<'a>,
        _ancestors: &[Frame<'a>],
        _ctx: &InspectionContext<'_>,
    ) -> Option<Diagnostic> {
        let constructor = own_method(class, |name| name.eq_ignore_ascii_case("__construct"))?;

        // Only a public getInstance is an accessor; a hidden one cannot
        // serve callers and does not make the class a singleton.
        let accessor = own_method(class, |name| name.eq_ignore_ascii_case("getInstance"))
            .filter(|method| visibility_of(method) == Visibility::Public);
        if accessor.is_some() {
            if visibility_of(constructor) == Visibility::Public {
                return Some(Diagnostic::new(
                    RULE_NAME,
                    class.name.span(),
                    "Singleton constructor should be protected",
                    Severity::Warning,
                ));
            }
            return None;
        }

        // No accessor. A protected constructor is only usable through a
        // factory method; private constructors are a deliberate choice and
        // stay unreported.
        if visibility_of(constructor) != Visibility::Protected {
            return None;
        }
        let has_factory = own_method(class, |name| {
            let lower = name.to_ascii_lowercase();
            lower.starts_with("create") || lower.starts_with("from")
        });
        if has_factory.is_some() {
            return None;
        }

        Some(Diagnostic::new(
            RULE_NAME,
            class.name.span(),
            "Ensure that one of public getInstance/create* methods are defined",
            Severity::Warning,
        ))
    }
}

fn own_method<'a>(
    class: &'a Class<'a>,
    predicate: impl Fn(&str) -> bool,
) -> Option<&'a Method<'a>> {
    class.members.iter().find_map(|member| match member {
        ClassLikeMember::Method(method)
            if std::str::from_utf8(method.name.value).is_ok_and(|name| predicate(name)) =>
        {
            Some(method)
        }
        _ => None,
    })
}

fn visibility_of(method: &Method<'_>) -> Visibility {
    for modifier in method.modifiers.iter() {
        match modifier {
            Modifier::Private(_) => return Visibility::Private,
            Modifier::Protected(_) => return Visibility::Protected,
            Modifier::Public(_) => return Visibility::Public,
            _ => {}
        }
    }
    // PHP methods without a visibility modifier are public.
    Visibility::Public
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;

    #[test]
    fn test_singleton_with_public_constructor() {
        let diagnostics = check(
            r#"<?php
class Config {
    public function __construct() {}
    public static function getInstance() { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Singleton constructor should be protected"
        );
    }

    #[test]
    fn test_implicit_visibility_counts_as_public() {
        let diagnostics = check(
            r#"<?php
class Config {
    function __construct() {}
    public static function getInstance() { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_singleton_with_protected_constructor_is_clean() {
        let diagnostics = check(
            r#"<?php
class Config {
    protected function __construct() {}
    public static function getInstance() { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_protected_constructor_without_accessor() {
        let diagnostics = check(
            r#"<?php
class Config {
    protected function __construct() {}
}
"#,
            &SingletonFactoryPattern,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Ensure that one of public getInstance/create* methods are defined"
        );
    }

    #[test]
    fn test_factory_method_satisfies_the_contract() {
        let diagnostics = check(
            r#"<?php
class Config {
    protected function __construct() {}
    public static function createFromArray(array $data) { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_from_method_satisfies_the_contract() {
        let diagnostics = check(
            r#"<?php
class Config {
    protected function __construct() {}
    public static function fromString(string $raw) { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_private_get_instance_is_not_an_accessor() {
        let diagnostics = check(
            r#"<?php
class Config {
    protected function __construct() {}
    private static function getInstance() { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Ensure that one of public getInstance/create* methods are defined"
        );
    }

    #[test]
    fn test_public_constructor_with_private_get_instance_is_clean() {
        let diagnostics = check(
            r#"<?php
class Config {
    public function __construct() {}
    private static function getInstance() { return new self(); }
}
"#,
            &SingletonFactoryPattern,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_private_constructor_without_accessor_is_clean() {
        let diagnostics = check(
            r#"<?php
class Value {
    private function __construct() {}
}
"#,
            &SingletonFactoryPattern,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_class_without_constructor_is_clean() {
        let diagnostics = check("<?php class Plain { public function run() {} }", &SingletonFactoryPattern);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostic_anchored_on_class_name() {
        let source = r#"<?php
class Config {
    protected function __construct() {}
}
"#;
        let diagnostics = check(source, &SingletonFactoryPattern);
        let span = diagnostics[0].span;
        assert_eq!(
            &source[span.start.offset as usize..span.end.offset as usize],
            "Config"
        );
    }
}
