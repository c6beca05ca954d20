//! Attaching breach counts to a form submission.
//!
//! A [`Form`] is an ordered list of fields. [`augment`] walks its password
//! fields one at a time, looks each one up, and appends hidden fields carrying
//! the breach count and optionally the password length.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use zeroize::Zeroize;

use crate::checker::BreachChecker;
use crate::error::Error;
use crate::source::RangeSource;

/// Name of the hidden field carrying the breach count.
pub const BREACH_COUNT_FIELD: &str = "Password Breach Count";

/// Name of the hidden field carrying the password length.
pub const PASSWORD_LENGTH_FIELD: &str = "Password Length";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Password,
    Hidden,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub kind: FieldKind,
    pub value: String,
}

impl FormField {
    pub fn new(kind: FieldKind, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), id: String::new(), kind, value: value.into() }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::Text, name, value)
    }

    pub fn password(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::Password, name, value)
    }

    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(FieldKind::Hidden, name, value)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Parses a `NAME=VALUE` argument. The value may itself contain `=`.
    pub fn from_assignment(kind: FieldKind, arg: &str) -> Result<Self, Error> {
        let (name, value) =
            arg.split_once('=').ok_or_else(|| Error::InvalidField { arg: arg.to_string() })?;
        if name.is_empty() {
            return Err(Error::InvalidField { arg: arg.to_string() });
        }
        Ok(Self::new(kind, name, value))
    }

    /// The label used in hidden field names: `name`, or `id` when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn push(&mut self, field: FormField) {
        self.fields.push(field);
    }

    pub fn password_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Password)
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Encodes the form as `application/x-www-form-urlencoded`.
    ///
    /// Unnamed fields are not submitted.
    pub fn to_urlencoded(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in self.fields.iter().filter(|f| !f.name.is_empty()) {
            serializer.append_pair(&field.name, &field.value);
        }
        serializer.finish()
    }
}

/// Submission-side switches, passed explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    /// Blank each password field before the form is submitted.
    pub clear_password_fields: bool,
    /// Append a `Password Length` field next to each breach count. The length
    /// is counted in UTF-16 code units, as browsers report it.
    pub include_password_length: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self { clear_password_fields: true, include_password_length: true }
    }
}

/// Hidden field names for one password field. The label is only appended
/// when the form has more than one password field.
pub fn hidden_field_names(label: &str, multiple: bool) -> (String, String) {
    if multiple && !label.is_empty() {
        (format!("{BREACH_COUNT_FIELD} ({label})"), format!("{PASSWORD_LENGTH_FIELD} ({label})"))
    } else {
        (BREACH_COUNT_FIELD.to_string(), PASSWORD_LENGTH_FIELD.to_string())
    }
}

/// Looks up every password field of `form` and appends the results.
///
/// Fields are processed in order and each lookup completes before the next
/// starts. A failed lookup is reported as `-1`.
pub async fn augment<S: RangeSource>(
    checker: &BreachChecker<S>,
    mut form: Form,
    options: &FormOptions,
) -> Form {
    let password_indices: Vec<usize> = form
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.kind == FieldKind::Password)
        .map(|(i, _)| i)
        .collect();
    let multiple = password_indices.len() > 1;

    for index in password_indices {
        let field = &mut form.fields[index];
        let label = field.label().to_string();
        let mut secret = if options.clear_password_fields {
            std::mem::take(&mut field.value)
        } else {
            field.value.clone()
        };

        let result = checker.lookup(&secret).await;
        let length = secret.encode_utf16().count();
        secret.zeroize();

        let (count_name, length_name) = hidden_field_names(&label, multiple);
        form.fields.push(FormField::hidden(count_name, result.to_string()));
        if options.include_password_length {
            form.fields.push(FormField::hidden(length_name, length.to_string()));
        }
    }

    form
}
