//! Which switch and variable ids are self-scoped

use ahash::AHashSet;

/// Ids whose database names carry the self-scope prefix
#[derive(Debug, Clone, Default)]
pub struct SelfScopeRegistry {
    switches: AHashSet<i32>,
    variables: AHashSet<i32>,
}

impl SelfScopeRegistry {
    /// Build from the database name tables, indexed by id
    ///
    /// Index 0 of each table is the unused placeholder slot.
    pub fn from_names<S: AsRef<str>>(switch_names: &[S], variable_names: &[S], prefix: &str) -> Self {
        Self {
            switches: scoped_ids(switch_names, prefix),
            variables: scoped_ids(variable_names, prefix),
        }
    }

    pub fn is_self_switch(&self, switch_id: i32) -> bool {
        self.switches.contains(&switch_id)
    }

    pub fn is_self_variable(&self, variable_id: i32) -> bool {
        self.variables.contains(&variable_id)
    }

    pub fn self_switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn self_variable_count(&self) -> usize {
        self.variables.len()
    }
}

fn scoped_ids<S: AsRef<str>>(names: &[S], prefix: &str) -> AHashSet<i32> {
    names
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, name)| has_prefix(name.as_ref(), prefix))
        .map(|(id, _)| id as i32)
        .collect()
}

/// Case-insensitive prefix test, ignoring leading whitespace
pub fn has_prefix(name: &str, prefix: &str) -> bool {
    let name = name.trim_start();
    !prefix.is_empty()
        && name
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_case_insensitive() {
        assert!(has_prefix("s:Opened", "s:"));
        assert!(has_prefix("S:Opened", "s:"));
        assert!(has_prefix("  s:Opened", "s:"));
        assert!(!has_prefix("Opened s:", "s:"));
        assert!(!has_prefix("s", "s:"));
    }

    #[test]
    fn test_registry_skips_placeholder_slot() {
        let switches = vec!["s:zero", "Door", "s:Chest"];
        let variables = vec!["", "S:Steps", "Gold"];
        let registry = SelfScopeRegistry::from_names(&switches, &variables, "s:");
        assert!(!registry.is_self_switch(0));
        assert!(!registry.is_self_switch(1));
        assert!(registry.is_self_switch(2));
        assert!(registry.is_self_variable(1));
        assert!(!registry.is_self_variable(2));
        assert_eq!(registry.self_switch_count(), 1);
    }
}
