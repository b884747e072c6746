//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use lapse_core::{LapseError, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Central plugin registry
pub struct PluginRegistry {
    functions: BTreeMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Metadata of every registered function, ordered by name
    pub fn function_metas(&self) -> Vec<FunctionMeta> {
        self.functions.values().map(|f| f.meta()).collect()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, args = args.len(), "calling function");
                let result = f.call(args, ctx);
                if let Value::Error(ref e) = result {
                    debug!(function = name, code = %e.code, "function returned error");
                }
                result
            }
            None => {
                warn!(function = name, "unknown function");
                let similar = self.find_similar_functions(name);
                let mut err = LapseError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, ties by name
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Similarity between a query and a registered name (0 = unrelated)
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Only worth ranking further when there is a substring relation
        if score > 0 {
            let query_chars: HashSet<char> = query.chars().collect();
            let candidate_chars: HashSet<char> = candidate.chars().collect();
            score += query_chars.intersection(&candidate_chars).count() * 2;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Value::Object(Self::function_to_help(f.meta())),
            None => Value::Error(LapseError::not_found(name)),
        }
    }

    fn general_help(&self) -> Value {
        let mut help = HashMap::new();

        let mut funcs_by_cat: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, f) in &self.functions {
            let cat = f.meta().category.to_string();
            funcs_by_cat.entry(cat).or_default().push(name.clone());
        }
        help.insert("functions".to_string(),
            Value::Object(funcs_by_cat.into_iter()
                .map(|(k, v)| (k, Value::List(v.into_iter().map(Value::Text).collect())))
                .collect()));

        help.insert("usage".to_string(),
            Value::Text("Call help('function_name') for detailed help.".to_string()));

        Value::Object(help)
    }

    fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
        let mut help = HashMap::new();
        help.insert("name".to_string(), Value::Text(meta.name.to_string()));
        help.insert("description".to_string(), Value::Text(meta.description.to_string()));
        help.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
        help.insert("returns".to_string(), Value::Text(meta.returns.to_string()));
        help.insert("category".to_string(), Value::Text(meta.category.to_string()));
        help.insert("args".to_string(), Value::List(
            meta.args.iter().map(|a| {
                let mut arg = HashMap::new();
                arg.insert("name".to_string(), Value::Text(a.name.to_string()));
                arg.insert("type".to_string(), Value::Text(a.typ.to_string()));
                arg.insert("description".to_string(), Value::Text(a.description.to_string()));
                arg.insert("optional".to_string(), Value::Bool(a.optional));
                Value::Object(arg)
            }).collect()
        ));
        help.insert("examples".to_string(), Value::List(
            meta.examples.iter().map(|e| Value::Text(e.to_string())).collect()
        ));
        help.insert("related".to_string(), Value::List(
            meta.related.iter().map(|r| Value::Text(r.to_string())).collect()
        ));
        help
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let funcs: Vec<Value> = self.functions.values()
            .filter(|f| category.map_or(true, |c| f.meta().category == c))
            .map(|f| {
                let meta = f.meta();
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::Text(meta.name.to_string()));
                obj.insert("description".to_string(), Value::Text(meta.description.to_string()));
                obj.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
                obj.insert("category".to_string(), Value::Text(meta.category.to_string()));
                Value::Object(obj)
            })
            .collect();
        Value::List(funcs)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Echo;

    static ECHO_ARGS: [ArgMeta; 1] = [ArgMeta::required("value", "Duration", "Value to echo")];

    impl FunctionPlugin for Echo {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "interval_echo",
                description: "Return the first argument",
                usage: "interval_echo(value)",
                args: &ECHO_ARGS,
                returns: "Duration",
                examples: &["interval_echo(\"PT1H\")"],
                category: "interval",
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            args.first().cloned().unwrap_or(Value::Null)
        }
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new().with_function(Echo)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let reg = registry();
        assert!(reg.get_function("INTERVAL_ECHO").is_some());
        assert!(reg.get_function("missing").is_none());
    }

    #[test]
    fn test_call_function() {
        let reg = registry();
        let result = reg.call_function("interval_echo", &[Value::Number(7)], &EvalContext::new());
        assert_eq!(result.as_number(), Some(7));
    }

    #[test]
    fn test_unknown_function_suggests() {
        let reg = registry();
        let result = reg.call_function("echo", &[], &EvalContext::new());
        match result {
            Value::Error(e) => {
                assert_eq!(e.code, lapse_core::codes::UNDEFINED_FUNC);
                assert!(e.suggestion.unwrap().contains("interval_echo"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_help_for_function() {
        let reg = registry();
        let help = reg.help(Some("interval_echo"));
        assert_eq!(help.get("usage").as_text(), Some("interval_echo(value)"));
        assert!(reg.help(Some("nope")).is_error());
    }

    #[test]
    fn test_general_help_groups_by_category() {
        let reg = registry();
        let help = reg.help(None);
        let names = help.get("functions").get("interval");
        assert_eq!(names.as_list().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_list_functions_by_category() {
        let reg = registry();
        assert_eq!(reg.list_functions(Some("interval")).as_list().map(|l| l.len()), Some(1));
        assert_eq!(reg.list_functions(Some("other")).as_list().map(|l| l.len()), Some(0));
    }

    #[test]
    fn test_function_metas() {
        let metas = registry().function_metas();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].name, "interval_echo");
    }
}
