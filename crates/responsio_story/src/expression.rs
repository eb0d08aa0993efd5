//! Expression evaluation seam for expression-based intent matchers.
//!
//! The expression language itself lives outside this crate. A story library
//! is handed an [`ExpressionEvaluator`] at construction time, which compiles
//! each matcher expression once; the compiled form is then evaluated against
//! an [`ExpressionContext`] describing the intent under test.

use responsio_core::IntentRecord;
use responsio_error::ExpressionError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of the built-in slot lookup function.
pub const SLOT_FUNCTION: &str = "slot";

/// Variables visible to an intent matcher expression.
///
/// Built from an intent record as follows, later entries overriding earlier
/// ones:
///
/// 1. the intent name bound to `true`
/// 2. `intent` bound to the intent name
/// 3. `slots` bound to the entity map
/// 4. every entity bound to its value
///
/// # Examples
///
/// ```
/// use responsio_core::IntentRecord;
/// use responsio_story::ExpressionContext;
/// use serde_json::json;
///
/// let intent = IntentRecord::named("greeting").with_entity("name", "Ada");
/// let context = ExpressionContext::for_intent(&intent);
///
/// assert_eq!(context.get("greeting"), Some(&json!(true)));
/// assert_eq!(context.get("intent"), Some(&json!("greeting")));
/// assert_eq!(context.get("name"), Some(&json!("Ada")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionContext {
    values: BTreeMap<String, Value>,
}

impl ExpressionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the evaluation context for an intent record.
    pub fn for_intent(intent: &IntentRecord) -> Self {
        let mut context = Self::new();
        context.set(intent.name().clone(), Value::Bool(true));
        context.set("intent", Value::String(intent.name().clone()));

        let entities = intent
            .entities()
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect::<serde_json::Map<_, _>>();
        context.set("slots", Value::Object(entities));

        for (key, value) in intent.entities() {
            context.set(key.clone(), Value::String(value.clone()));
        }
        context
    }

    /// Binds a variable.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Looks up a variable.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// Function callable from matcher expressions.
pub type ExpressionFunction =
    Arc<dyn Fn(&ExpressionContext, &[Value]) -> Result<Value, ExpressionError> + Send + Sync>;

/// Extension functions made available to the expression evaluator.
///
/// Registered explicitly on the story library builder; there is no global
/// registry.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, ExpressionFunction>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in `slot(name)` function.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(SLOT_FUNCTION, Arc::new(slot_lookup));
        registry
    }

    /// Registers (or replaces) a function.
    pub fn register(&mut self, name: impl Into<String>, function: ExpressionFunction) {
        self.functions.insert(name.into(), function);
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&ExpressionFunction> {
        self.functions.get(name)
    }

    /// Returns the registered function names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `slot(name)`: reads `name` from the `slots` map, or null.
fn slot_lookup(context: &ExpressionContext, args: &[Value]) -> Result<Value, ExpressionError> {
    let name = match args {
        [Value::String(name)] => name,
        _ => {
            return Err(ExpressionError::new(
                "slot() expects a single string argument",
            ));
        }
    };

    Ok(context
        .get("slots")
        .and_then(|slots| slots.get(name))
        .cloned()
        .unwrap_or(Value::Null))
}

/// Compiles matcher expressions.
pub trait ExpressionEvaluator: Send + Sync + fmt::Debug {
    /// Compiles an expression, resolving function references against
    /// `functions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be parsed.
    fn compile(
        &self,
        source: &str,
        functions: &FunctionRegistry,
    ) -> Result<Arc<dyn CompiledExpression>, ExpressionError>;
}

/// A compiled matcher expression.
pub trait CompiledExpression: Send + Sync + fmt::Debug {
    /// Evaluates the expression.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails (type mismatch, failing function).
    fn evaluate(&self, context: &ExpressionContext) -> Result<Value, ExpressionError>;
}

/// Converts an expression result to a boolean.
///
/// Null is false, booleans are themselves, numbers are true when non-zero,
/// strings when non-empty. Arrays and objects are always true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
