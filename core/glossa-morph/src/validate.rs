use glossa_protocol::Rule;
use regex::Regex;

use crate::error::MorphError;

/// Compiles a stored pattern, naming the owning rule on failure.
pub(crate) fn compile(rule_name: &str, pattern: &str) -> Result<Regex, MorphError> {
    Regex::new(pattern).map_err(|source| MorphError::InvalidPattern {
        rule: rule_name.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Gate applied before a rule enters any store: the match pattern and every
/// transform pattern must compile, and no replacement may reference the
/// entire match. Generation relies on this having run.
pub fn validate_rule(rule: &Rule) -> Result<(), MorphError> {
    compile(&rule.name, &rule.pattern)?;

    for transform in &rule.transforms {
        compile(&rule.name, &transform.pattern)?;

        if references_whole_match(&transform.replacement) {
            return Err(MorphError::WholeMatchReference {
                rule: rule.name.clone(),
                replacement: transform.replacement.clone(),
            });
        }
    }

    Ok(())
}

/// Detects `$0` / `${0}` (any all-zero digit group) in a replacement.
/// `$$` is the literal-dollar escape and never starts a reference. Unbraced
/// references consume the longest run of word characters, mirroring how the
/// regex dialect itself reads them, so `$0abc` names the group "0abc" and
/// passes.
pub(crate) fn references_whole_match(replacement: &str) -> bool {
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                while let Some(&inner) = chars.peek() {
                    if inner == '}' {
                        break;
                    }
                    name.push(inner);
                    chars.next();
                }
                if is_zero_group(&name) {
                    return true;
                }
            }
            _ => {
                let mut name = String::new();
                while let Some(&inner) = chars.peek() {
                    if inner.is_ascii_alphanumeric() || inner == '_' {
                        name.push(inner);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if is_zero_group(&name) {
                    return true;
                }
            }
        }
    }

    false
}

fn is_zero_group(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_digit())
        && name.parse::<u32>() == Ok(0)
}
