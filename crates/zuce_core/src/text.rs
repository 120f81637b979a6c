//! String helpers shared by attribute and style formatting

/// Convert a camelCase name to kebab-case
///
/// Every ASCII uppercase letter becomes `-` followed by its lowercase form,
/// except a leading one which is only lowercased. Names that are already
/// kebab-case pass through unchanged.
///
/// ```rust
/// use zuce_core::text::kebab_case;
///
/// assert_eq!(kebab_case("backgroundColor"), "background-color");
/// assert_eq!(kebab_case("ariaLabel"), "aria-label");
/// assert_eq!(kebab_case("data-id"), "data-id");
/// ```
pub fn kebab_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (index, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if index > 0 {
                result.push('-');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
