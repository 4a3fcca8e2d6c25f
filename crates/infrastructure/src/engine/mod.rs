mod rule_set_engine;

pub use rule_set_engine::{CompiledFilter, CompiledRuleSet, RuleSetEngine};
