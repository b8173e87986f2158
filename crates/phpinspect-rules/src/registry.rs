//! Inspector registry
//!
//! Owns the built-in inspectors and builds engines from them, honoring the
//! run configuration. Registration order is fixed, so diagnostic order is
//! stable across runs.

use mago_syntax::ast::Program;

use phpinspect_core::engine::{Engine, InspectionContext, InspectionReport, Inspector};

use crate::config::InspectionConfig;
use crate::instanceof_can_be_used::InstanceofCanBeUsed;
use crate::nested_not_operators::NestedNotOperators;
use crate::singleton_factory_pattern::SingletonFactoryPattern;
use crate::str_ncmp_used_as_str_pos::StrNcmpUsedAsStrPos;

pub struct InspectorRegistry {
    inspectors: Vec<Box<dyn Inspector>>,
}

impl InspectorRegistry {
    /// Registry holding every built-in inspector.
    pub fn with_builtin_rules() -> Self {
        Self {
            inspectors: vec![
                Box::new(NestedNotOperators),
                Box::new(StrNcmpUsedAsStrPos),
                Box::new(InstanceofCanBeUsed),
                Box::new(SingletonFactoryPattern),
            ],
        }
    }

    pub fn inspectors(&self) -> impl Iterator<Item = &dyn Inspector> {
        self.inspectors.iter().map(|boxed| boxed.as_ref())
    }

    /// Inspectors the configuration leaves enabled, in registration order.
    pub fn enabled(&self, config: &InspectionConfig) -> Vec<&dyn Inspector> {
        self.inspectors()
            .filter(|inspector| config.is_enabled(inspector.name()))
            .collect()
    }

    /// Build an engine over the enabled inspectors.
    pub fn engine(&self, config: &InspectionConfig) -> Engine<'_> {
        let mut engine = Engine::new();
        for inspector in self.enabled(config) {
            engine.register(inspector);
        }
        engine
    }

    /// Run all enabled inspectors over a parsed program, applying the
    /// configured severity overrides to the result.
    pub fn check_all(
        &self,
        program: &Program<'_>,
        ctx: &InspectionContext<'_>,
        config: &InspectionConfig,
    ) -> InspectionReport {
        let engine = self.engine(config);
        let mut report = engine.run(program, ctx);
        for diagnostic in &mut report.diagnostics {
            if let Some(severity) = config.severity_override(diagnostic.rule) {
                diagnostic.severity = severity;
            }
        }
        report
    }
}

impl Default for InspectorRegistry {
    fn default() -> Self {
        Self::with_builtin_rules()
    }
}
