use crate::error::{Error, Result};
use crate::model::EntityKind;

/// Validation half of a rename. `other_names` are the short names of every
/// other row of the same kind; the caller issues the update afterwards in a
/// separate statement, so two concurrent renames can both pass.
pub fn check_rename<'a, I>(kind: EntityKind, other_names: I, new_short_name: &str) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    if other_names.into_iter().any(|name| name == new_short_name) {
        return Err(Error::DuplicateName {
            kind,
            name: new_short_name.to_string(),
        });
    }
    if new_short_name.is_empty() {
        return Err(Error::EmptyName { kind });
    }
    Ok(())
}
