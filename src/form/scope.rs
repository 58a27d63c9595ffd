use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use super::validation::ValidationSchema;
use crate::error::FieldError;
use crate::field::FieldRegistration;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a form scope; fields re-register when it changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form#{}", self.0)
    }
}

/// What a field learns from its scope when it mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContext {
    pub field_name: String,
    pub default_value: String,
    pub error: Option<String>,
}

/// Field errors keyed by field name
pub type FieldErrors = BTreeMap<String, String>;

/// Registry of the fields in one form: their values (through each field's
/// binding), initial data, and validation errors.
///
/// Field names may be dotted (`address.street`); `data()` nests them into
/// objects and initial data is looked up the same way. Registering a name
/// twice replaces the earlier registration.
pub struct FormScope {
    id: ScopeId,
    initial_data: Map<String, Value>,
    fields: Vec<FieldRegistration>,
    errors: FieldErrors,
}

impl Default for FormScope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormScope")
            .field("id", &self.id)
            .field("fields", &self.field_names())
            .field("errors", &self.errors)
            .finish()
    }
}

impl FormScope {
    pub fn new() -> Self {
        Self {
            id: ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed)),
            initial_data: Map::new(),
            fields: Vec::new(),
            errors: FieldErrors::new(),
        }
    }

    /// Create a scope whose fields take their default values from `data`
    /// (a JSON object; anything else is ignored)
    pub fn with_initial_data(data: Value) -> Self {
        let mut scope = Self::new();
        match data {
            Value::Object(map) => scope.initial_data = map,
            other => warn!("ignoring non-object initial form data: {}", other),
        }
        scope
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn use_field(&self, name: &str) -> FieldContext {
        FieldContext {
            field_name: name.to_string(),
            default_value: get_path(&self.initial_data, name)
                .map(value_to_text)
                .unwrap_or_default(),
            error: self.errors.get(name).cloned(),
        }
    }

    /// Register a field, replacing any earlier registration of the same name.
    ///
    /// Fails with `PathConflict` when the name is a dotted prefix of another
    /// registered name (or the reverse), since `data()` could not hold both.
    pub fn register_field(&mut self, registration: FieldRegistration) -> Result<(), FieldError> {
        if let Some(existing) = self
            .fields
            .iter()
            .find(|f| paths_overlap(&f.name, &registration.name))
        {
            warn!(field = %registration.name, existing = %existing.name, "field path conflict");
            return Err(FieldError::PathConflict {
                field: registration.name,
                existing: existing.name.clone(),
            });
        }
        match self.fields.iter_mut().find(|f| f.name == registration.name) {
            Some(existing) => *existing = registration,
            None => self.fields.push(registration),
        }
        Ok(())
    }

    /// Returns true if a field with that name was registered
    pub fn unregister_field(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.name != name);
        before != self.fields.len()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn registration_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn registration(&self, name: &str) -> Result<&FieldRegistration, FieldError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }

    /// Current text of one field
    pub fn field_value(&self, name: &str) -> Result<String, FieldError> {
        Ok(self.registration(name)?.binding.read())
    }

    /// Current values of all registered fields, nested by dotted name
    pub fn data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        for field in &self.fields {
            insert_path(&mut data, &field.name, Value::String(field.binding.read()));
        }
        data
    }

    /// Push values into every registered field present in `data`
    pub fn set_data(&mut self, data: &Value) -> Result<(), FieldError> {
        let Value::Object(map) = data else {
            return Ok(());
        };
        for field in &self.fields {
            if let Some(value) = get_path(map, &field.name) {
                field.binding.write(&value_to_text(value))?;
            }
        }
        Ok(())
    }

    pub fn set_field_value(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        self.registration(name)?.binding.write(value)
    }

    pub fn clear_field(&mut self, name: &str) -> Result<(), FieldError> {
        self.registration(name)?.binding.clear()
    }

    /// Clear every field and every error
    pub fn reset(&mut self) -> Result<(), FieldError> {
        for field in &self.fields {
            field.binding.clear()?;
        }
        self.errors.clear();
        debug!(scope = %self.id, "form reset");
        Ok(())
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Replace all errors
    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub fn set_field_error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.insert(name.to_string(), message.into());
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Run `schema` against the current values.
    ///
    /// Each field keeps only its first failing rule's message. On success the
    /// errors are cleared and the form data returned; on failure the scope's
    /// errors are replaced with the new set, which is also returned.
    pub async fn validate(&mut self, schema: &ValidationSchema) -> Result<Map<String, Value>, FieldErrors> {
        let mut errors = FieldErrors::new();
        for (name, rules) in schema.rules() {
            let value = self
                .registration(name)
                .map(|f| f.binding.read())
                .unwrap_or_default();
            for rule in rules {
                if let Err(message) = rule.validate(&value).await {
                    errors.insert(name.clone(), message);
                    break;
                }
            }
        }

        if errors.is_empty() {
            self.errors.clear();
            Ok(self.data())
        } else {
            debug!(scope = %self.id, failures = errors.len(), "form validation failed");
            self.errors = errors.clone();
            Err(errors)
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn get_path<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// True when one dotted name is a strict prefix of the other (`a` and `a.b`)
fn paths_overlap(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    long.len() > short.len() && long.starts_with(short) && long[short.len()..].starts_with('.')
}

fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldController;
    use crate::form::validation::{EmailFormatValidator, MinLengthValidator, NonEmptyValidator};
    use serde_json::json;

    fn mount(scope: &mut FormScope, name: &str) -> FieldController {
        let mut field = FieldController::new(name, "user");
        field.mount(scope).unwrap();
        field
    }

    #[test]
    fn test_scope_ids_are_unique() {
        assert_ne!(FormScope::new().id(), FormScope::new().id());
    }

    #[test]
    fn test_use_field_reads_initial_data() {
        let scope = FormScope::with_initial_data(json!({
            "name": "Ana",
            "age": 31,
            "address": { "city": "Recife" }
        }));
        assert_eq!(scope.use_field("name").default_value, "Ana");
        assert_eq!(scope.use_field("age").default_value, "31");
        assert_eq!(scope.use_field("address.city").default_value, "Recife");
        assert_eq!(scope.use_field("missing").default_value, "");
        assert_eq!(scope.use_field("name").field_name, "name");
    }

    #[test]
    fn test_non_object_initial_data_is_ignored() {
        let scope = FormScope::with_initial_data(json!(["not", "an", "object"]));
        assert_eq!(scope.use_field("0").default_value, "");
    }

    #[test]
    fn test_use_field_reports_error() {
        let mut scope = FormScope::new();
        scope.set_field_error("email", "required");
        assert_eq!(scope.use_field("email").error.as_deref(), Some("required"));
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let mut scope = FormScope::new();
        let _first = mount(&mut scope, "email");
        let _second = mount(&mut scope, "email");
        assert_eq!(scope.registration_count(), 1);
    }

    #[test]
    fn test_data_nests_dotted_names() {
        let mut scope = FormScope::with_initial_data(json!({
            "name": "Ana",
            "address": { "city": "Recife", "street": "Rua A" }
        }));
        let _name = mount(&mut scope, "name");
        let _city = mount(&mut scope, "address.city");
        let _street = mount(&mut scope, "address.street");
        assert_eq!(
            Value::Object(scope.data()),
            json!({ "name": "Ana", "address": { "city": "Recife", "street": "Rua A" } })
        );
    }

    #[test]
    fn test_nested_name_conflicts_with_its_parent() {
        let mut scope = FormScope::new();
        let _address = mount(&mut scope, "address");

        let mut street = FieldController::new("address.street", "user");
        assert_eq!(
            street.mount(&mut scope),
            Err(FieldError::PathConflict {
                field: "address.street".to_string(),
                existing: "address".to_string(),
            })
        );
        assert!(!scope.is_registered("address.street"));
        assert!(!street.is_mounted());
        assert_eq!(scope.registration_count(), 1);

        // A shared prefix without a dot boundary is a different field
        let _addressee = mount(&mut scope, "addressee");
        assert_eq!(scope.registration_count(), 2);
    }

    #[test]
    fn test_parent_name_conflicts_with_nested_field() {
        let mut scope = FormScope::new();
        let _city = mount(&mut scope, "address.city");
        let mut address = FieldController::new("address", "user");
        assert!(matches!(
            address.mount(&mut scope),
            Err(FieldError::PathConflict { .. })
        ));
        assert_eq!(Value::Object(scope.data()), json!({ "address": { "city": "" } }));
    }

    #[test]
    fn test_set_field_value_is_limited_by_the_field() {
        let mut scope = FormScope::new();
        let mut code = FieldController::new("code", "lock").with_max_length(3);
        code.mount(&mut scope).unwrap();

        scope.set_field_value("code", "123456").unwrap();
        assert_eq!(scope.field_value("code").unwrap(), "123");
        assert_eq!(code.value(), "123");
    }

    #[test]
    fn test_set_data_writes_matching_fields() {
        let mut scope = FormScope::new();
        let name = mount(&mut scope, "name");
        let email = mount(&mut scope, "email");
        scope
            .set_data(&json!({ "name": "Bia", "unrelated": true }))
            .unwrap();
        assert_eq!(name.value(), "Bia");
        assert_eq!(email.value(), "");
    }

    #[test]
    fn test_unknown_field_operations_fail() {
        let mut scope = FormScope::new();
        assert_eq!(
            scope.set_field_value("ghost", "x"),
            Err(FieldError::UnknownField("ghost".to_string()))
        );
        assert!(scope.clear_field("ghost").is_err());
        assert!(scope.field_value("ghost").is_err());
    }

    #[test]
    fn test_reset_clears_values_and_errors() {
        let mut scope = FormScope::with_initial_data(json!({ "name": "Ana" }));
        let name = mount(&mut scope, "name");
        scope.set_field_error("name", "too short");
        scope.reset().unwrap();
        assert_eq!(name.value(), "");
        assert!(scope.errors().is_empty());
    }

    #[test]
    fn test_unregister() {
        let mut scope = FormScope::new();
        let _name = mount(&mut scope, "name");
        assert!(scope.unregister_field("name"));
        assert!(!scope.unregister_field("name"));
        assert!(scope.data().is_empty());
    }

    fn signup_schema() -> ValidationSchema {
        ValidationSchema::new()
            .field("name", vec![Box::new(NonEmptyValidator::new("Name is required"))])
            .field(
                "email",
                vec![
                    Box::new(NonEmptyValidator::new("E-mail is required")),
                    Box::new(EmailFormatValidator),
                ],
            )
            .field("password", vec![Box::new(MinLengthValidator::new(6))])
    }

    #[tokio::test]
    async fn test_validate_collects_first_error_per_field() {
        let mut scope = FormScope::new();
        let _name = mount(&mut scope, "name");
        let _email = mount(&mut scope, "email");
        let _password = mount(&mut scope, "password");

        let errors = scope.validate(&signup_schema()).await.unwrap_err();
        assert_eq!(errors.get("name").map(String::as_str), Some("Name is required"));
        assert_eq!(errors.get("email").map(String::as_str), Some("E-mail is required"));
        assert!(errors.contains_key("password"));
        assert_eq!(scope.error("email"), Some("E-mail is required"));
    }

    #[tokio::test]
    async fn test_validate_success_returns_data_and_clears_errors() {
        let mut scope = FormScope::with_initial_data(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "hunter22"
        }));
        let _name = mount(&mut scope, "name");
        let _email = mount(&mut scope, "email");
        let _password = mount(&mut scope, "password");
        scope.set_field_error("name", "stale");

        let data = scope.validate(&signup_schema()).await.unwrap();
        assert_eq!(data["email"], json!("ana@example.com"));
        assert!(scope.errors().is_empty());
    }

    #[tokio::test]
    async fn test_validate_replaces_previous_errors() {
        let mut scope = FormScope::with_initial_data(json!({ "name": "Ana", "email": "bad" }));
        let _name = mount(&mut scope, "name");
        let _email = mount(&mut scope, "email");
        let _password = mount(&mut scope, "password");
        scope.set_field_error("name", "stale");

        let errors = scope.validate(&signup_schema()).await.unwrap_err();
        assert!(!errors.contains_key("name"));
        assert!(scope.error("name").is_none());
        assert!(scope.error("email").is_some());
    }
}
