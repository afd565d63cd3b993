//! Name-indexed effect construction and validation

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::{Value, json};

use crate::effects::{Cut, Effect, Randomize, Remap, Remove, Repeat, Reverse, ReverseAll, Silence, Swap};
use crate::error::{ConstructionError, DefinitionError, Error, Result};
use crate::schema::{EffectSchema, Params};

const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Builds an effect from parameters that already passed schema validation.
pub type Constructor = fn(&Params) -> std::result::Result<Effect, ConstructionError>;

#[derive(Debug, Clone)]
struct Registration {
    constructor: Constructor,
    schema: EffectSchema,
}

/// Table of loadable effects, keyed by the `type` of a definition
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    effects: BTreeMap<&'static str, Registration>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in effect.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [(Constructor, EffectSchema); 9] = [
            (Silence::construct, Silence::schema()),
            (Remove::construct, Remove::schema()),
            (Cut::construct, Cut::schema()),
            (Reverse::construct, Reverse::schema()),
            (Repeat::construct, Repeat::schema()),
            (Swap::construct, Swap::schema()),
            (Remap::construct, Remap::schema()),
            (Randomize::construct, Randomize::schema()),
            (ReverseAll::construct, ReverseAll::schema()),
        ];
        for (constructor, schema) in builtins {
            // Built-in names are distinct, so this cannot conflict.
            let _ = registry.register(constructor, schema);
        }
        registry
    }

    /// Process-wide registry holding the built-in effects.
    pub fn global() -> &'static EffectRegistry {
        static GLOBAL: OnceLock<EffectRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Registers an effect under `schema.name`. Registering the same
    /// constructor and schema twice is a no-op; anything else under a taken
    /// name is an error.
    pub fn register(&mut self, constructor: Constructor, schema: EffectSchema) -> Result<()> {
        if let Some(existing) = self.effects.get(schema.name) {
            if std::ptr::fn_addr_eq(existing.constructor, constructor) && existing.schema == schema {
                return Ok(());
            }
            return Err(Error::DuplicateEffect(schema.name.to_string()));
        }
        tracing::trace!(effect = schema.name, "registered effect");
        self.effects.insert(schema.name, Registration { constructor, schema });
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.effects.keys().copied()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &EffectSchema> {
        self.effects.values().map(|r| &r.schema)
    }

    pub fn schema_for(&self, name: &str) -> Option<&EffectSchema> {
        self.effects.get(name).map(|r| &r.schema)
    }

    /// Validates a `{ "type": ..., ...params }` definition and constructs
    /// the effect it describes.
    pub fn load(&self, definition: &Value) -> Result<Effect> {
        let object = definition.as_object().ok_or(DefinitionError::NotAnObject)?;
        let name = match object.get("type") {
            Some(Value::String(name)) => name.as_str(),
            Some(_) => return Err(DefinitionError::InvalidTypeKey.into()),
            None => return Err(DefinitionError::MissingType.into()),
        };
        let registration = self
            .effects
            .get(name)
            .ok_or_else(|| DefinitionError::UnknownEffect(name.to_string()))?;

        let params = registration.schema.validate(object)?;
        let effect = (registration.constructor)(&params)
            .map_err(|source| Error::Construction { effect: name.to_string(), source })?;
        tracing::debug!(effect = name, "loaded effect");
        Ok(effect)
    }

    /// Loads an array of definitions in order. The first failure aborts the
    /// whole chain and reports its position.
    pub fn load_chain(&self, definitions: &Value) -> Result<Vec<Effect>> {
        let items = definitions.as_array().ok_or(DefinitionError::NotAnArray)?;
        items
            .iter()
            .enumerate()
            .map(|(index, definition)| {
                self.load(definition).map_err(|source| Error::Chain {
                    index,
                    effect: definition
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("<untyped>")
                        .to_string(),
                    source: Box::new(source),
                })
            })
            .collect()
    }

    /// Parses a JSON document holding either one definition or an array of
    /// them.
    pub fn load_chain_str(&self, json: &str) -> Result<Vec<Effect>> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(_) => self.load_chain(&value),
            single => self.load_chain(&Value::Array(vec![single])),
        }
    }

    /// JSON Schema matching any single registered effect.
    pub fn dump_schema(&self) -> Value {
        let any_of: Vec<Value> = self.schemas().map(EffectSchema::to_json_schema).collect();
        json!({ "$schema": JSON_SCHEMA_DRAFT, "title": "Effect", "anyOf": any_of })
    }

    pub fn dump_single_effect_schema(&self, name: &str) -> Option<Value> {
        let mut schema = self.schema_for(name)?.to_json_schema();
        schema["$schema"] = json!(JSON_SCHEMA_DRAFT);
        Some(schema)
    }

    /// JSON Schema for an effect chain.
    pub fn dump_list_schema(&self) -> Value {
        let any_of: Vec<Value> = self.schemas().map(EffectSchema::to_json_schema).collect();
        json!({
            "$schema": JSON_SCHEMA_DRAFT,
            "title": "Effect Chain",
            "type": "array",
            "items": { "title": "Effect", "anyOf": any_of },
        })
    }
}
