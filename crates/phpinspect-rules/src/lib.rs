//! phpinspect-rules: Built-in PHP code inspections
//!
//! Four rules ship with this crate:
//! - `nested_not_operators`: `!!$x` / `!!!$x` chains
//! - `str_ncmp_used_as_str_pos`: `strncmp`/`strncasecmp` spelled as a
//!   prefix check
//! - `instanceof_can_be_used`: class name comparisons that should be
//!   `instanceof`
//! - `singleton_factory_pattern`: singleton and factory classes with a
//!   public constructor or no accessor
//!
//! `InspectorRegistry` wires them into an engine, honoring the run
//! configuration loaded from YAML.

mod config;
mod instanceof_can_be_used;
mod nested_not_operators;
mod registry;
mod singleton_factory_pattern;
mod str_ncmp_used_as_str_pos;

pub use config::{ConfigError, InspectionConfig, SeverityLevel};
pub use instanceof_can_be_used::InstanceofCanBeUsed;
pub use nested_not_operators::NestedNotOperators;
pub use registry::InspectorRegistry;
pub use singleton_factory_pattern::SingletonFactoryPattern;
pub use str_ncmp_used_as_str_pos::StrNcmpUsedAsStrPos;

#[cfg(test)]
pub(crate) mod testing {
    use bumpalo::Bump;
    use mago_database::file::FileId;
    use phpinspect_core::{
        Diagnostic, Engine, InspectionContext, InspectionReport, Inspector, NullClassIndex,
        NullTypeResolver,
    };
    use phpinspect_core::{ClassIndex, TypeResolver};

    /// Run one inspector over a source snippet with null services.
    pub fn check(source: &str, inspector: &dyn Inspector) -> Vec<Diagnostic> {
        check_with_services(source, inspector, &NullTypeResolver, &NullClassIndex)
    }

    /// Run one inspector over a source snippet with explicit services.
    pub fn check_with_services(
        source: &str,
        inspector: &dyn Inspector,
        types: &dyn TypeResolver,
        classes: &dyn ClassIndex,
    ) -> Vec<Diagnostic> {
        let report = report_with_services(source, inspector, types, classes);
        assert!(report.faults.is_empty(), "inspector panicked during test");
        report.diagnostics
    }

    pub fn report_with_services(
        source: &str,
        inspector: &dyn Inspector,
        types: &dyn TypeResolver,
        classes: &dyn ClassIndex,
    ) -> InspectionReport {
        let arena = Bump::new();
        let file_id = FileId::new(b"test.php");
        let program = mago_syntax::parser::parse_file_content(&arena, file_id, source.as_bytes());

        let mut engine = Engine::new();
        engine.register(inspector);
        let ctx = InspectionContext {
            source,
            types,
            classes,
        };
        engine.run(program, &ctx)
    }

    /// Apply the fix of the single expected diagnostic and return the
    /// rewritten source.
    pub fn apply_single_fix(source: &str, inspector: &dyn Inspector) -> String {
        let diagnostics = check(source, inspector);
        assert_eq!(diagnostics.len(), 1, "expected exactly one diagnostic");
        let fix = diagnostics[0]
            .fix
            .as_ref()
            .expect("diagnostic should carry a fix");
        fix.apply(source).expect("fix should apply cleanly")
    }
}
