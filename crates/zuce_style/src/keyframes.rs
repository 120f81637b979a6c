//! `@keyframes` rules

use zuce_platform::{Host, Result};

use crate::registry;
use crate::style::StyleSet;

/// Insert an `@keyframes` rule animating from `from` to `to`
///
/// Keyframe values are written without units. The rule is inserted once per
/// animation name; the name is returned for use in an `animation` property.
///
/// ```ignore
/// let fade = keyframes(
///     &*host,
///     "fade-in",
///     &StyleSet::from([("opacity", "0")]),
///     &StyleSet::from([("opacity", "1")]),
/// )?;
/// div(()).styles(StyleSet::new().set("animation", format!("{fade} 0.2s")));
/// ```
pub fn keyframes(host: &dyn Host, name: &str, from: &StyleSet, to: &StyleSet) -> Result<String> {
    let body = format!(
        "from{{{}}}to{{{}}}",
        from.to_plain_declarations(),
        to.to_plain_declarations()
    );
    registry::insert_rule(host, &format!("@keyframes {name}"), &body)?;
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zuce_platform::memory::MemoryHost;

    #[test]
    fn test_keyframes_rule_inserted_once() {
        registry::reset();
        let host = MemoryHost::new();
        let from = StyleSet::new().set("opacity", 0).set("transform", "scaleX(0)");
        let to = StyleSet::new().set("opacity", 1).set("transform", "scaleX(1)");

        let name = keyframes(&host, "fade-in", &from, &to).unwrap();
        keyframes(&host, "fade-in", &to, &from).unwrap();

        assert_eq!(name, "fade-in");
        assert_eq!(
            host.rules(),
            vec![
                "@keyframes fade-in{from{opacity:0;transform:scaleX(0);}to{opacity:1;transform:scaleX(1);}}"
            ]
        );
        registry::reset();
    }
}
