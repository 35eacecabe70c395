use std::collections::BTreeMap;

/// Template processor for resolving $VARIABLE format variables
pub struct Tpl {
    variables: BTreeMap<String, String>,
}

impl Tpl {
    pub fn new() -> Self {
        Self {
            variables: BTreeMap::new(),
        }
    }

    /// Register a variable with its value
    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.variables.insert(key.into(), value.into());
    }

    /// Parse a string and resolve all $VARIABLE references.
    ///
    /// Longer names are substituted first so that `$GAME_VERSION` is never
    /// split by a shorter `$GAME` registration.
    pub fn parse(&self, input: &str) -> String {
        let mut keys: Vec<&String> = self.variables.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut result = input.to_string();
        for key in keys {
            let pattern = format!("${}", key);
            result = result.replace(&pattern, &self.variables[key]);
        }

        result
    }
}

impl Default for Tpl {
    fn default() -> Self {
        Self::new()
    }
}
