/// Expand `${ENV_VAR}` placeholders in raw config text.
///
/// Unknown variables and unterminated placeholders are kept verbatim.
/// `$${NAME}` is an escape and produces the literal text `${NAME}`.
pub fn substitute_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let escaped = rest[..start].ends_with('$');
        let (before, after) = rest.split_at(start);
        let after = &after[2..];

        let Some(end) = after.find('}') else {
            out.push_str(rest);
            return out;
        };
        let name = &after[..end];

        if escaped {
            out.push_str(&before[..before.len() - 1]);
            out.push_str("${");
            out.push_str(name);
            out.push('}');
        } else {
            out.push_str(before);
            match (name.is_empty(), lookup(name)) {
                (false, Some(value)) => out.push_str(&value),
                _ => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                },
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "MODHOST_MODS" => Some("/srv/mods".to_string()),
            "EXT" => Some("py".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_known_vars() {
        assert_eq!(
            expand_with("dir = \"${MODHOST_MODS}\"\next = \"${EXT}\"", lookup),
            "dir = \"/srv/mods\"\next = \"py\""
        );
    }

    #[test]
    fn keeps_unknown_and_empty_placeholders() {
        assert_eq!(expand_with("${NOPE} ${}", lookup), "${NOPE} ${}");
    }

    #[test]
    fn keeps_unterminated_placeholder() {
        assert_eq!(expand_with("a ${EXT", lookup), "a ${EXT");
    }

    #[test]
    fn double_dollar_escapes() {
        assert_eq!(expand_with("$${EXT} ${EXT}", lookup), "${EXT} py");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(substitute_env("mods/fireball"), "mods/fireball");
    }
}
