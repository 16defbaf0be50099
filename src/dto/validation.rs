//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted game name, in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// Validates that a game name is not blank once trimmed and stays within [`MAX_NAME_CHARS`].
///
/// # Examples
///
/// ```ignore
/// validate_game_name("Celeste") // Ok
/// validate_game_name("   ")     // Err - blank
/// ```
pub fn validate_game_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("game_name_blank");
        err.message = Some("Game name must not be empty".into());
        return Err(err);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_NAME_CHARS {
        let mut err = ValidationError::new("game_name_length");
        err.message = Some(
            format!("Game name must be at most {MAX_NAME_CHARS} characters (got {chars})").into(),
        );
        return Err(err);
    }

    Ok(())
}
