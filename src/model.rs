//! Model name resolution.

/// Short name aliases for Gemini image models.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
    ("nano-banana", "gemini-3.1-flash-image-preview"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or_else(|| name.to_string(), |(_, full)| (*full).to_string())
}

/// Check that a resolved model belongs to the Gemini family.
///
/// # Errors
///
/// Returns an error for any model without the `gemini` prefix.
pub fn validate_model(model: &str) -> Result<(), String> {
    if model.starts_with("gemini") {
        Ok(())
    } else {
        Err(format!("Unsupported model '{model}'. Expected a 'gemini-*' image model."))
    }
}
