//! Self-describing parameter schemas for effects
//!
//! Each registered effect declares its parameters once. The same
//! declaration validates incoming definitions, fills in defaults, produces
//! a self-valid example definition and renders a draft-07 JSON Schema for
//! external tooling.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{ConstructionError, DefinitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Integer,
    IntegerArray,
}

impl ParamKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::IntegerArray => "an array of integers",
        }
    }
}

/// One named effect parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSchema {
    pub name: &'static str,
    pub kind: ParamKind,
    pub minimum: Option<i64>,
    pub default: Option<Value>,
    pub example: Option<Value>,
    pub title: &'static str,
    pub description: &'static str,
}

impl ParamSchema {
    pub fn integer(name: &'static str, title: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Integer,
            minimum: None,
            default: None,
            example: None,
            title,
            description,
        }
    }

    pub fn integer_array(name: &'static str, title: &'static str, description: &'static str) -> Self {
        Self { kind: ParamKind::IntegerArray, ..Self::integer(name, title, description) }
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn example_value(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Required parameters have no default. Optional ones without a default
    /// must be marked with an example of `null`.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && self.example != Some(Value::Null)
    }

    /// Checks a raw JSON value and returns it in canonical form (integral
    /// floats become integers).
    fn validate(&self, effect: &str, value: &Value) -> Result<Value, DefinitionError> {
        let wrong_type = || DefinitionError::WrongType {
            effect: effect.to_string(),
            param: self.name.to_string(),
            expected: self.kind.expected(),
        };

        match self.kind {
            ParamKind::Integer => {
                let n = as_integer(value).ok_or_else(wrong_type)?;
                self.check_minimum(effect, n)?;
                Ok(Value::from(n))
            }
            ParamKind::IntegerArray => {
                let items = value.as_array().ok_or_else(wrong_type)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let n = as_integer(item).ok_or_else(wrong_type)?;
                    self.check_minimum(effect, n)?;
                    out.push(Value::from(n));
                }
                Ok(Value::Array(out))
            }
        }
    }

    fn check_minimum(&self, effect: &str, value: i64) -> Result<(), DefinitionError> {
        match self.minimum {
            Some(minimum) if value < minimum => Err(DefinitionError::BelowMinimum {
                effect: effect.to_string(),
                param: self.name.to_string(),
                minimum,
                value,
            }),
            _ => Ok(()),
        }
    }

    pub fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        match self.kind {
            ParamKind::Integer => {
                schema.insert("type".into(), json!("integer"));
                if let Some(minimum) = self.minimum {
                    schema.insert("minimum".into(), json!(minimum));
                }
            }
            ParamKind::IntegerArray => {
                schema.insert("type".into(), json!("array"));
                let mut items = json!({ "type": "integer" });
                if let Some(minimum) = self.minimum {
                    items["minimum"] = json!(minimum);
                }
                schema.insert("items".into(), items);
            }
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        schema.insert("title".into(), json!(self.title));
        schema.insert("description".into(), json!(self.description));
        Value::Object(schema)
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// Everything the registry knows about one effect type
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSchema {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSchema>,
}

impl EffectSchema {
    pub fn new(name: &'static str, title: &'static str, description: &'static str) -> Self {
        Self { name, title, description, params: Vec::new() }
    }

    pub fn param(mut self, param: ParamSchema) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ParamSchema>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamSchema> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Validates a definition object (including its `type` key) and returns
    /// the parameters with defaults filled in.
    pub fn validate(&self, definition: &Map<String, Value>) -> Result<Params, DefinitionError> {
        for key in definition.keys() {
            if key != "type" && self.get(key).is_none() {
                return Err(DefinitionError::UnknownParameter {
                    effect: self.name.to_string(),
                    param: key.clone(),
                });
            }
        }

        let mut values = Map::new();
        for param in &self.params {
            let value = match (definition.get(param.name), &param.default) {
                (Some(raw), _) => param.validate(self.name, raw)?,
                (None, Some(default)) => default.clone(),
                (None, None) if param.is_required() => {
                    return Err(DefinitionError::MissingParameter {
                        effect: self.name.to_string(),
                        param: param.name.to_string(),
                    });
                }
                (None, None) => continue,
            };
            values.insert(param.name.to_string(), value);
        }

        Ok(Params { values })
    }

    /// A definition built from defaults and examples. Always loads.
    pub fn example(&self) -> Value {
        let mut definition = Map::new();
        definition.insert("type".into(), json!(self.name));
        for param in &self.params {
            match param.example.as_ref().or(param.default.as_ref()) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    definition.insert(param.name.to_string(), value.clone());
                }
            }
        }
        Value::Object(definition)
    }

    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            "type".into(),
            json!({ "const": self.name, "default": self.name, "format": "hidden" }),
        );
        let mut required = vec![json!("type")];
        for param in &self.params {
            properties.insert(param.name.to_string(), param.to_json_schema());
            if param.is_required() {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "title": self.title,
            "description": self.description,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// Validated parameters handed to an effect constructor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    pub fn int(&self, name: &str) -> Result<i64, ConstructionError> {
        self.opt_int(name).ok_or_else(|| ConstructionError::MissingValue(name.to_string()))
    }

    pub fn opt_int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    pub fn int_list(&self, name: &str) -> Result<Vec<i64>, ConstructionError> {
        self.values
            .get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_i64).collect())
            .ok_or_else(|| ConstructionError::MissingValue(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> EffectSchema {
        EffectSchema::new("demo", "Demo", "A demo effect.")
            .param(ParamSchema::integer("period", "Period", "How often.").minimum(1).default_value(1))
            .param(ParamSchema::integer_array("mapping", "Mapping", "Order.").example_value(json!([1, 0])))
            .param(ParamSchema::integer("seed", "Seed", "Random seed.").minimum(0).example_value(Value::Null))
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults_filled() {
        let params = schema().validate(&object(json!({"type": "demo", "mapping": [0]}))).unwrap();
        assert_eq!(params.int("period"), Ok(1));
        assert_eq!(params.int_list("mapping"), Ok(vec![0]));
        assert_eq!(params.opt_int("seed"), None);
    }

    #[test]
    fn test_integral_float_accepted() {
        let params = schema().validate(&object(json!({"type": "demo", "period": 3.0, "mapping": [1.0]}))).unwrap();
        assert_eq!(params.int("period"), Ok(3));
        assert_eq!(params.int_list("mapping"), Ok(vec![1]));
    }

    #[test]
    fn test_rejections() {
        let s = schema();
        assert!(matches!(
            s.validate(&object(json!({"type": "demo"}))),
            Err(DefinitionError::MissingParameter { .. })
        ));
        assert!(matches!(
            s.validate(&object(json!({"type": "demo", "mapping": [], "bogus": 1}))),
            Err(DefinitionError::UnknownParameter { .. })
        ));
        assert!(matches!(
            s.validate(&object(json!({"type": "demo", "mapping": [], "period": "two"}))),
            Err(DefinitionError::WrongType { .. })
        ));
        assert!(matches!(
            s.validate(&object(json!({"type": "demo", "mapping": [], "period": 1.5}))),
            Err(DefinitionError::WrongType { .. })
        ));
        assert_eq!(
            s.validate(&object(json!({"type": "demo", "mapping": [], "period": 0}))),
            Err(DefinitionError::BelowMinimum {
                effect: "demo".into(),
                param: "period".into(),
                minimum: 1,
                value: 0,
            })
        );
    }

    #[test]
    fn test_example_skips_null() {
        assert_eq!(schema().example(), json!({"type": "demo", "period": 1, "mapping": [1, 0]}));
    }

    #[test]
    fn test_json_schema_shape() {
        let rendered = schema().to_json_schema();
        assert_eq!(rendered["additionalProperties"], json!(false));
        assert_eq!(rendered["required"], json!(["type", "mapping"]));
        assert_eq!(rendered["properties"]["type"]["const"], json!("demo"));
        assert_eq!(rendered["properties"]["period"]["minimum"], json!(1));
        assert_eq!(rendered["properties"]["mapping"]["items"]["type"], json!("integer"));
    }
}
