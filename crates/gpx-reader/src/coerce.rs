//! Scalar coercion registry.
//!
//! Maps a scalar type name (`decimal`, `fix`, `email`, ...) to a coercion that
//! turns raw document input into a validated [`Value`].
//!
//! # Architecture
//!
//! Each coercion implements [`ScalarCoercion`] and is registered in a
//! [`CoercionRegistry`] under its type name. The built-in set is exposed
//! through [`default_registry`], built once and shared. Callers that need a
//! different behavior (for instance, a counting stub in tests) start from
//! [`CoercionRegistry::standard`] and [`register`](CoercionRegistry::register)
//! their own coercion over the built-in one.
//!
//! # Built-in coercions
//!
//! | Type name | Result | Validation |
//! |-----------|--------|------------|
//! | `string`, `uri` | text | none |
//! | `decimal` | decimal | optional sign, at least one digit, optional fraction |
//! | `degrees` | decimal | `decimal`, then [0, 360] |
//! | `latitude` | decimal | `decimal`, then [-90, 90] |
//! | `longitude` | decimal | `decimal`, then [-180, 180] |
//! | `dgpsid` | integer | [0, 1023] |
//! | `unsigned` | integer | >= 0 |
//! | `year` | integer | none |
//! | `fix` | fix type | one of `none`, `2d`, `3d`, `dgps`, `pps` |
//! | `email` | text or null | rebuilt from `id`/`domain` when text is empty |
//! | `datetime` | timestamp | see [`crate::timestamp`] |
//! | `extensions` | extensions | none, children kept verbatim |

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};

use regex::Regex;

use gpx_model::{Element, FixType, Value};

use crate::error::{GpxError, Result};
use crate::timestamp::parse_timestamp;

pub const STRING: &str = "string";
pub const URI: &str = "uri";
pub const DECIMAL: &str = "decimal";
pub const DEGREES: &str = "degrees";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const DGPS_STATION: &str = "dgpsid";
pub const UNSIGNED: &str = "unsigned";
pub const YEAR: &str = "year";
pub const FIX: &str = "fix";
pub const EMAIL: &str = "email";
pub const DATETIME: &str = "datetime";
pub const EXTENSIONS: &str = "extensions";

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").expect("valid regex"));

/// Raw input handed to a coercion.
#[derive(Debug, Clone, Copy)]
pub enum RawInput<'a> {
    /// Attribute value; `None` when the attribute is absent.
    Text(Option<&'a str>),
    /// Child element.
    Node(&'a Element),
}

impl<'a> RawInput<'a> {
    /// Text content: the attribute value, or the element's text.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Self::Text(text) => *text,
            Self::Node(element) => element.text(),
        }
    }

    /// The element, when the input is a node.
    pub fn node(&self) -> Option<&'a Element> {
        match self {
            Self::Text(_) => None,
            Self::Node(element) => Some(element),
        }
    }
}

/// A named conversion from raw input to a validated scalar.
pub trait ScalarCoercion: Send + Sync {
    /// The type name this coercion is registered under.
    fn type_name(&self) -> &'static str;

    /// Convert and validate the input.
    ///
    /// # Errors
    ///
    /// Returns a value error (`InvalidValue`, `MissingValue`, `OutOfRange`,
    /// `InvalidEnum`, `InvalidTimestamp`) when the input is rejected.
    fn coerce(&self, input: RawInput<'_>) -> Result<Value>;
}

/// Registry of scalar coercions indexed by type name.
///
/// The registry is thread-safe and can be shared across threads.
pub struct CoercionRegistry {
    coercions: HashMap<&'static str, Box<dyn ScalarCoercion>>,
}

impl CoercionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            coercions: HashMap::new(),
        }
    }

    /// Creates a registry holding every built-in coercion.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FunctionCoercion::new(STRING, coerce_text)));
        registry.register(Box::new(FunctionCoercion::new(URI, coerce_text)));
        registry.register(Box::new(FunctionCoercion::new(DECIMAL, coerce_decimal)));
        registry.register(Box::new(FunctionCoercion::new(DEGREES, coerce_degrees)));
        registry.register(Box::new(FunctionCoercion::new(LATITUDE, coerce_latitude)));
        registry.register(Box::new(FunctionCoercion::new(LONGITUDE, coerce_longitude)));
        registry.register(Box::new(FunctionCoercion::new(
            DGPS_STATION,
            coerce_dgps_station,
        )));
        registry.register(Box::new(FunctionCoercion::new(UNSIGNED, coerce_unsigned)));
        registry.register(Box::new(FunctionCoercion::new(YEAR, coerce_year)));
        registry.register(Box::new(FunctionCoercion::new(FIX, coerce_fix)));
        registry.register(Box::new(FunctionCoercion::new(EMAIL, coerce_email)));
        registry.register(Box::new(FunctionCoercion::new(DATETIME, coerce_datetime)));
        registry.register(Box::new(FunctionCoercion::new(
            EXTENSIONS,
            coerce_extensions,
        )));
        registry
    }

    /// Registers a coercion under its type name.
    ///
    /// If a coercion for this name is already registered, it is replaced.
    pub fn register(&mut self, coercion: Box<dyn ScalarCoercion>) {
        self.coercions.insert(coercion.type_name(), coercion);
    }

    /// Gets the coercion for a type name.
    pub fn get(&self, type_name: &str) -> Option<&dyn ScalarCoercion> {
        self.coercions.get(type_name).map(|c| c.as_ref())
    }

    /// Returns true if a coercion is registered under `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.coercions.contains_key(type_name)
    }

    /// Coerce `input` with the coercion registered for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`GpxError::UnknownType`] if nothing is registered under the
    /// name, otherwise whatever the coercion returns.
    pub fn coerce(&self, type_name: &str, input: RawInput<'_>) -> Result<Value> {
        let coercion = self.get(type_name).ok_or_else(|| GpxError::UnknownType {
            type_name: type_name.to_string(),
            expected: "scalar",
        })?;
        coercion.coerce(input)
    }

    /// Returns the number of registered coercions.
    pub fn len(&self) -> usize {
        self.coercions.len()
    }

    /// Returns true if no coercions are registered.
    pub fn is_empty(&self) -> bool {
        self.coercions.is_empty()
    }

    /// Returns an iterator over all registered type names.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.coercions.keys().copied()
    }
}

impl fmt::Debug for CoercionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut type_names: Vec<_> = self.type_names().collect();
        type_names.sort_unstable();
        f.debug_struct("CoercionRegistry")
            .field("type_names", &type_names)
            .finish()
    }
}

impl Default for CoercionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Cached registry of built-in coercions.
static DEFAULT_REGISTRY: OnceLock<Arc<CoercionRegistry>> = OnceLock::new();

/// Returns the shared registry of built-in coercions.
pub fn default_registry() -> Arc<CoercionRegistry> {
    Arc::clone(DEFAULT_REGISTRY.get_or_init(|| Arc::new(CoercionRegistry::standard())))
}

/// Adapts a plain function to the [`ScalarCoercion`] trait.
struct FunctionCoercion {
    name: &'static str,
    coerce_fn: fn(RawInput<'_>) -> Result<Value>,
}

impl FunctionCoercion {
    fn new(name: &'static str, coerce_fn: fn(RawInput<'_>) -> Result<Value>) -> Self {
        Self { name, coerce_fn }
    }
}

impl ScalarCoercion for FunctionCoercion {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn coerce(&self, input: RawInput<'_>) -> Result<Value> {
        (self.coerce_fn)(input)
    }
}

// =============================================================================
// Numeric parsing
// =============================================================================

/// Parse decimal text: optional sign, then digits with an optional fraction,
/// or a bare fraction (`.5`). The whole text must match.
///
/// # Errors
///
/// Returns [`GpxError::InvalidValue`] naming `type_name` when the text does not
/// match.
pub fn parse_decimal(type_name: &'static str, text: &str) -> Result<f64> {
    if !DECIMAL_RE.is_match(text) {
        return Err(GpxError::invalid_value(type_name, text));
    }
    text.parse::<f64>()
        .map_err(|_| GpxError::invalid_value(type_name, text))
}

/// Parse integer text, ignoring surrounding whitespace.
pub fn parse_integer(type_name: &'static str, text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| GpxError::invalid_value(type_name, text))
}

fn required<'a>(type_name: &'static str, input: &RawInput<'a>) -> Result<&'a str> {
    input.text().ok_or(GpxError::MissingValue { type_name })
}

fn decimal_in(type_name: &'static str, input: RawInput<'_>, min: f64, max: f64) -> Result<Value> {
    let value = parse_decimal(type_name, required(type_name, &input)?)?;
    if (min..=max).contains(&value) {
        Ok(Value::Decimal(value))
    } else {
        Err(GpxError::out_of_range(type_name, value, min, max))
    }
}

// =============================================================================
// Built-in coercions
// =============================================================================

fn coerce_text(input: RawInput<'_>) -> Result<Value> {
    Ok(input
        .text()
        .map_or(Value::Null, |text| Value::Text(text.to_string())))
}

fn coerce_decimal(input: RawInput<'_>) -> Result<Value> {
    let text = required(DECIMAL, &input)?;
    parse_decimal(DECIMAL, text).map(Value::Decimal)
}

fn coerce_degrees(input: RawInput<'_>) -> Result<Value> {
    decimal_in(DEGREES, input, 0.0, 360.0)
}

fn coerce_latitude(input: RawInput<'_>) -> Result<Value> {
    decimal_in(LATITUDE, input, -90.0, 90.0)
}

fn coerce_longitude(input: RawInput<'_>) -> Result<Value> {
    decimal_in(LONGITUDE, input, -180.0, 180.0)
}

fn coerce_dgps_station(input: RawInput<'_>) -> Result<Value> {
    let value = parse_integer(DGPS_STATION, required(DGPS_STATION, &input)?)?;
    if (0..=1023).contains(&value) {
        Ok(Value::Integer(value))
    } else {
        Err(GpxError::out_of_range(
            DGPS_STATION,
            value as f64,
            0.0,
            1023.0,
        ))
    }
}

fn coerce_unsigned(input: RawInput<'_>) -> Result<Value> {
    let text = required(UNSIGNED, &input)?;
    let value = parse_integer(UNSIGNED, text)?;
    if value < 0 {
        return Err(GpxError::invalid_value(UNSIGNED, text));
    }
    Ok(Value::Integer(value))
}

fn coerce_year(input: RawInput<'_>) -> Result<Value> {
    parse_integer(YEAR, required(YEAR, &input)?).map(Value::Integer)
}

fn coerce_fix(input: RawInput<'_>) -> Result<Value> {
    let text = required(FIX, &input)?;
    text.parse::<FixType>()
        .map(Value::Fix)
        .map_err(|_| GpxError::InvalidEnum {
            type_name: FIX,
            value: text.to_string(),
        })
}

fn coerce_email(input: RawInput<'_>) -> Result<Value> {
    if let Some(text) = input.text().filter(|text| !text.is_empty()) {
        return Ok(Value::Text(text.to_string()));
    }
    let rebuilt = input.node().and_then(|element| {
        let id = element.attribute("id").filter(|id| !id.is_empty())?;
        let domain = element.attribute("domain").filter(|d| !d.is_empty())?;
        Some(format!("{id}@{domain}"))
    });
    Ok(rebuilt.map_or(Value::Null, Value::Text))
}

fn coerce_datetime(input: RawInput<'_>) -> Result<Value> {
    parse_timestamp(required(DATETIME, &input)?).map(Value::Timestamp)
}

fn coerce_extensions(input: RawInput<'_>) -> Result<Value> {
    Ok(input
        .node()
        .map_or(Value::Null, |element| {
            Value::Extensions(element.children.clone())
        }))
}
