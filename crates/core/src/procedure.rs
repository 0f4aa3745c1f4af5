//! Stored procedure call model and its SQL rendering.
//!
//! Arguments are rendered as quoted string literals rather than bound
//! parameters. A literal has no declared type, so PostgreSQL resolves it
//! against the function signature: `'true'` reaches a `boolean` parameter
//! as `true`.

use crate::error::CoreError;

/// Name of the procedure the job invokes.
pub const CONCAT_LOWER_OR_UPPER: &str = "concat_lower_or_upper";

/// Fixed arguments for [`CONCAT_LOWER_OR_UPPER`]: two words and the
/// uppercase flag.
pub const CONCAT_LOWER_OR_UPPER_ARGS: [&str; 3] = ["hello", "world", "true"];

/// PostgreSQL truncates identifiers longer than `NAMEDATALEN - 1` bytes.
const MAX_IDENTIFIER_LEN: usize = 63;

/// A validated stored procedure invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureCall {
    name: String,
    args: Vec<String>,
}

impl ProcedureCall {
    /// Build a call, validating the procedure name and the arguments.
    ///
    /// The name may be schema-qualified (`reporting.concat_lower_or_upper`).
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        validate_procedure_name(&name)?;

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if let Some(pos) = args.iter().position(|a| a.contains('\0')) {
            return Err(CoreError::Validation(format!(
                "Argument {pos} of '{name}' contains a NUL byte"
            )));
        }

        Ok(Self { name, args })
    }

    /// The call this job makes: `concat_lower_or_upper('hello', 'world', 'true')`.
    pub fn concat_lower_or_upper() -> Result<Self, CoreError> {
        Self::new(CONCAT_LOWER_OR_UPPER, CONCAT_LOWER_OR_UPPER_ARGS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Render the set-returning select that invokes the procedure.
    pub fn to_sql(&self) -> String {
        let args = self
            .args
            .iter()
            .map(|a| quote_literal(a))
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT * FROM {}({args})", self.name)
    }
}

/// Quote `value` as a standard-conforming SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn validate_procedure_name(name: &str) -> Result<(), CoreError> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return Err(CoreError::Validation(format!(
            "Procedure name '{name}' has too many qualifiers"
        )));
    }
    for part in parts {
        validate_identifier(part).map_err(|reason| {
            CoreError::Validation(format!("Invalid procedure name '{name}': {reason}"))
        })?;
    }
    Ok(())
}

fn validate_identifier(ident: &str) -> Result<(), &'static str> {
    let mut chars = ident.chars();
    match chars.next() {
        None => return Err("empty identifier"),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Err("must start with a letter or underscore"),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err("only letters, digits, '_' and '$' are allowed");
    }
    if ident.len() > MAX_IDENTIFIER_LEN {
        return Err("longer than 63 bytes");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
