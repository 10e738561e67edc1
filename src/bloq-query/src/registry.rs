//! Registry of named functions and methods.
//!
//! Built-ins register themselves at compile time with `inventory::submit!`.
//! A [`FunctionRegistry`] collects those registrations into a name-keyed map
//! of constructors; a process-wide default registry backs [`init_function`]
//! and [`init_method`]. Every registration declares its parameters once and
//! arguments are checked against them at construction, never per call.

use std::collections::HashMap;
use std::sync::Arc;

use bloq_shared::{Error, Result, Value};
use once_cell::sync::Lazy;

use crate::function::{Arg, FunctionRef};

/// Kind of literal a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// String literal
    String,
    /// Integer literal
    Int,
    /// Any literal
    Any,
}

impl ParamKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::String => matches!(value, Value::String(_)),
            ParamKind::Int => matches!(value, Value::Int(_)),
            ParamKind::Any => true,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Int => "integer",
            ParamKind::Any => "any",
        }
    }
}

/// A declared constructor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, used in error messages
    pub name: &'static str,
    /// Accepted literal kind
    pub kind: ParamKind,
    /// May be omitted (only trailing parameters)
    pub optional: bool,
    /// May be given as a function evaluated per call
    pub dynamic: bool,
}

impl Param {
    const fn with_kind(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
            dynamic: false,
        }
    }

    /// A string parameter
    pub const fn string(name: &'static str) -> Self {
        Self::with_kind(name, ParamKind::String)
    }

    /// An integer parameter
    pub const fn int(name: &'static str) -> Self {
        Self::with_kind(name, ParamKind::Int)
    }

    /// A parameter accepting any literal
    pub const fn any(name: &'static str) -> Self {
        Self::with_kind(name, ParamKind::Any)
    }

    /// Mark as optional
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Allow a dynamic (function) argument
    #[must_use]
    pub const fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}

/// Check constructor arguments against declared parameters
pub fn check_args(name: &str, params: &[Param], args: &[Arg]) -> Result<()> {
    let required = params.iter().filter(|p| !p.optional).count();
    if args.len() < required || args.len() > params.len() {
        let expected = if required == params.len() {
            format!("expected {} argument{}", required, plural(required))
        } else {
            format!("expected {} to {} arguments", required, params.len())
        };
        return Err(Error::invalid_arguments(
            name,
            format!("{}, received {}", expected, args.len()),
        ));
    }

    for (param, arg) in params.iter().zip(args) {
        match arg {
            Arg::Function(_) if !param.dynamic => {
                return Err(Error::invalid_arguments(
                    name,
                    format!("argument '{}' must be a literal", param.name),
                ));
            }
            Arg::Value(v) if !param.kind.accepts(v) => {
                return Err(Error::invalid_arguments(
                    name,
                    format!(
                        "expected {} value for argument '{}', found {}",
                        param.kind.name(),
                        param.name,
                        v.type_name()
                    ),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Constructor signature of registered functions
pub type FunctionCtor = Arc<dyn Fn(Vec<Arg>) -> Result<FunctionRef> + Send + Sync>;

/// Constructor signature of registered methods
pub type MethodCtor = Arc<dyn Fn(FunctionRef, Vec<Arg>) -> Result<FunctionRef> + Send + Sync>;

inventory::collect!(FunctionRegistration);
inventory::collect!(MethodRegistration);

/// Compile-time registration of a function
pub struct FunctionRegistration {
    pub name: &'static str,
    pub params: &'static [Param],
    pub ctor: fn(Vec<Arg>) -> Result<FunctionRef>,
}

/// Compile-time registration of a method
pub struct MethodRegistration {
    pub name: &'static str,
    pub params: &'static [Param],
    pub ctor: fn(FunctionRef, Vec<Arg>) -> Result<FunctionRef>,
}

struct FunctionEntry {
    params: Vec<Param>,
    ctor: FunctionCtor,
}

struct MethodEntry {
    params: Vec<Param>,
    ctor: MethodCtor,
}

/// Registry of functions and methods
///
/// This struct owns every constructor the runtime can resolve by name and
/// validates constructor arguments before handing them over.
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionEntry>,
    methods: HashMap<String, MethodEntry>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FunctionRegistry {{ functions: {}, methods: {} }}",
            self.functions.len(),
            self.methods.len()
        )
    }
}

impl FunctionRegistry {
    /// Create a registry with every built-in function and method
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_standard_functions();
        registry
    }

    /// Create a registry with nothing registered
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    fn register_standard_functions(&mut self) {
        for reg in inventory::iter::<FunctionRegistration> {
            self.register_function(reg.name, reg.params.to_vec(), Arc::new(reg.ctor));
        }
        for reg in inventory::iter::<MethodRegistration> {
            self.register_method(reg.name, reg.params.to_vec(), Arc::new(reg.ctor));
        }
        log::debug!(
            "registered {} functions and {} methods",
            self.functions.len(),
            self.methods.len()
        );
    }

    /// Register a function, replacing any previous one of the same name
    pub fn register_function(&mut self, name: impl Into<String>, params: Vec<Param>, ctor: FunctionCtor) {
        self.functions
            .insert(name.into(), FunctionEntry { params, ctor });
    }

    /// Register a method, replacing any previous one of the same name
    pub fn register_method(&mut self, name: impl Into<String>, params: Vec<Param>, ctor: MethodCtor) {
        self.methods.insert(name.into(), MethodEntry { params, ctor });
    }

    /// Check if a function exists
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Check if a method exists
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Construct a function by name
    pub fn init_function(&self, name: &str, args: Vec<Arg>) -> Result<FunctionRef> {
        let entry = self
            .functions
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        check_args(name, &entry.params, &args)?;
        log::debug!("constructing function '{}' with {} args", name, args.len());
        (entry.ctor)(args)
    }

    /// Construct a method bound to `receiver` by name
    pub fn init_method(&self, name: &str, receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
        let entry = self
            .methods
            .get(name)
            .ok_or_else(|| Error::UnknownMethod(name.to_string()))?;
        check_args(name, &entry.params, &args)?;
        log::debug!("binding method '{}' with {} args", name, args.len());
        (entry.ctor)(receiver, args)
    }

    /// Get the number of registered functions
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Get all function names, sorted
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all method names, sorted
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::new);

/// Construct a built-in function by name
pub fn init_function(name: &str, args: Vec<Arg>) -> Result<FunctionRef> {
    DEFAULT_REGISTRY.init_function(name, args)
}

/// Bind a built-in method to a receiver by name
pub fn init_method(name: &str, receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
    DEFAULT_REGISTRY.init_method(name, receiver, args)
}
