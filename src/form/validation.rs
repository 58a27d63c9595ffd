use async_trait::async_trait;

/// Result of validating one value
///
/// Ok(Some(msg)) = Valid with a note
/// Ok(None) = Valid
/// Err(msg) = Invalid, with the message shown under the field
pub type ValidationResult = Result<Option<String>, String>;

/// A single validation rule for a field value.
///
/// Async so rules can consult a collaborator (e.g. "is this e-mail taken?").
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    async fn validate(&self, value: &str) -> ValidationResult;
}

/// Rejects empty or whitespace-only values
pub struct NonEmptyValidator {
    message: String,
}

impl NonEmptyValidator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for NonEmptyValidator {
    fn default() -> Self {
        Self::new("Field cannot be empty")
    }
}

#[async_trait]
impl AsyncValidator for NonEmptyValidator {
    async fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            Err(self.message.clone())
        } else {
            Ok(None)
        }
    }
}

/// Checks the shape `local@domain.tld`. Empty values pass so the rule can be
/// combined with [`NonEmptyValidator`] for required fields.
pub struct EmailFormatValidator;

#[async_trait]
impl AsyncValidator for EmailFormatValidator {
    async fn validate(&self, value: &str) -> ValidationResult {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        let Some((local, domain)) = value.split_once('@') else {
            return Err("Enter a valid e-mail".to_string());
        };
        let domain_ok = domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
        if local.is_empty() || domain.contains('@') || !domain_ok || value.contains(char::is_whitespace) {
            Err("Enter a valid e-mail".to_string())
        } else {
            Ok(None)
        }
    }
}

/// Requires at least `min` characters
pub struct MinLengthValidator {
    min: usize,
}

impl MinLengthValidator {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

#[async_trait]
impl AsyncValidator for MinLengthValidator {
    async fn validate(&self, value: &str) -> ValidationResult {
        if value.chars().count() < self.min {
            Err(format!("At least {} characters", self.min))
        } else {
            Ok(None)
        }
    }
}

/// Ordered list of rules per field name
#[derive(Default)]
pub struct ValidationSchema {
    rules: Vec<(String, Vec<Box<dyn AsyncValidator>>)>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: Vec<Box<dyn AsyncValidator>>) -> Self {
        self.rules.push((name.into(), rules));
        self
    }

    pub fn rules(&self) -> &[(String, Vec<Box<dyn AsyncValidator>>)] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_empty_validator_empty() {
        let validator = NonEmptyValidator::default();
        let result = validator.validate("").await;
        assert_eq!(result.unwrap_err(), "Field cannot be empty");
    }

    #[tokio::test]
    async fn test_non_empty_validator_whitespace() {
        let validator = NonEmptyValidator::new("Name is required");
        let result = validator.validate("   ").await;
        assert_eq!(result.unwrap_err(), "Name is required");
    }

    #[tokio::test]
    async fn test_non_empty_validator_valid() {
        let validator = NonEmptyValidator::default();
        assert_eq!(validator.validate("test").await, Ok(None));
    }

    #[tokio::test]
    async fn test_email_accepts_common_addresses() {
        for ok in ["a@b.com", "first.last+tag@mail.example.org", ""] {
            assert!(EmailFormatValidator.validate(ok).await.is_ok(), "{ok}");
        }
    }

    #[tokio::test]
    async fn test_email_rejects_malformed() {
        for bad in ["plain", "@b.com", "a@", "a@b", "a@.com", "a@b.", "a@@b.com", "a b@c.com"] {
            assert!(EmailFormatValidator.validate(bad).await.is_err(), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_min_length_counts_chars() {
        let validator = MinLengthValidator::new(3);
        assert!(validator.validate("ab").await.is_err());
        assert!(validator.validate("ção").await.is_ok());
        assert_eq!(validator.validate("").await.unwrap_err(), "At least 3 characters");
    }

    #[test]
    fn test_schema_keeps_order() {
        let schema = ValidationSchema::new()
            .field("b", vec![])
            .field("a", vec![Box::new(EmailFormatValidator)]);
        let names: Vec<&str> = schema.rules().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(!schema.is_empty());
    }
}
