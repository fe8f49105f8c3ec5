use anyhow::Result;
use chrono::{Local, NaiveTime};
use gemini_client::FunctionDeclaration;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A local function the model can ask us to run.
///
/// `args` carries whatever the model supplied in its function call.
/// Functions declared without parameters ignore it.
pub trait LocalFunction: Send + Sync {
    fn declaration(&self) -> FunctionDeclaration;

    fn call(&self, args: &Map<String, Value>) -> Result<String>;
}

pub struct CurrentTime;

impl CurrentTime {
    pub const NAME: &'static str = "get_current_time";

    pub fn message(time: NaiveTime) -> String {
        format!(
            "The current time is {} in your local timezone.",
            time.format("%H:%M:%S")
        )
    }
}

impl LocalFunction for CurrentTime {
    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration::new(Self::NAME, "Get the current time in the local timezone.")
    }

    fn call(&self, _args: &Map<String, Value>) -> Result<String> {
        Ok(Self::message(Local::now().time()))
    }
}

/// Functions offered to the model, keyed by declared name. Built once at
/// startup and only read afterwards.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Box<dyn LocalFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CurrentTime);
        registry
    }

    pub fn register(&mut self, function: impl LocalFunction + 'static) {
        let name = function.declaration().name;
        if self.functions.insert(name.clone(), Box::new(function)).is_some() {
            tracing::warn!("Replaced previously registered function {name}");
        }
    }

    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.functions.values().map(|f| f.declaration()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn LocalFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
