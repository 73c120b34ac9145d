use std::collections::BTreeMap;

/// Key to display string lookup.
pub trait Translator {
    fn translate(&self, key: &str) -> Option<String>;

    /// Translation of `key`, or the key itself when none exists.
    fn t(&self, key: &str) -> String {
        self.translate(key).unwrap_or_else(|| key.to_string())
    }
}

impl<F> Translator for F
where
    F: Fn(&str) -> Option<String>,
{
    fn translate(&self, key: &str) -> Option<String> {
        self(key)
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("item", "Item"),
    ("description", "Description"),
    ("unit_cost", "Unit Cost"),
    ("quantity", "Quantity"),
    ("discount", "Discount"),
    ("tax", "Tax"),
    ("tax_rate2", "Tax 2"),
    ("tax_rate3", "Tax 3"),
    ("line_total", "Line Total"),
    ("add_item", "Add Item"),
    ("no_client_selected", "No client selected"),
    ("subtotal", "Subtotal"),
    ("total", "Total"),
];

#[derive(Debug, Clone, Default)]
pub struct Translations {
    strings: BTreeMap<String, String>,
}

impl Translations {
    pub fn english() -> Self {
        Self {
            strings: ENGLISH
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Layers `overrides` on top of the current strings.
    pub fn merge(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.strings.insert(key.clone(), value.clone());
        }
        self
    }
}

impl Translator for Translations {
    fn translate(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_english_strings() {
        let mut overrides = BTreeMap::new();
        overrides.insert("unit_cost".to_string(), "Rate".to_string());
        let t = Translations::english().merge(&overrides);

        assert_eq!(t.t("unit_cost"), "Rate");
        assert_eq!(t.t("quantity"), "Quantity");
        assert_eq!(t.t("missing_key"), "missing_key");
    }

    #[test]
    fn closures_translate() {
        let upper = |key: &str| Some(key.to_uppercase());
        assert_eq!(upper.t("add_item"), "ADD_ITEM");
    }
}
