// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;

// Idioma usado quando o pedido chega com um idioma que não temos
pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário: não dependemos do diretório de trabalho
const CATALOGS: [(&str, &str); 3] = [
    ("en", include_str!("../../locales/en.json")),
    ("es", include_str!("../../locales/es.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

type Catalog = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<String, Catalog>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let catalog: Catalog = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de traduções inválido: {lang}.json"))?;
            catalogs.insert(lang.to_string(), catalog);
        }

        tracing::debug!("🌐 {} catálogos de idioma carregados", catalogs.len());
        Ok(Self { catalogs: Arc::new(catalogs) })
    }

    /// Busca a chave no idioma pedido, depois no idioma padrão.
    /// Se nenhum dos dois conhece a chave, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key)
            .to_string()
    }

    /// Igual a `translate`, substituindo cada `{nome}` pelo valor correspondente.
    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.translate(lang, key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let reference = &store.catalogs[DEFAULT_LANG];
        for (lang, catalog) in store.catalogs.iter() {
            for key in reference.keys() {
                assert!(catalog.contains_key(key), "{lang} sem a chave {key}");
            }
            assert_eq!(catalog.len(), reference.len(), "{lang} tem chaves extras");
        }
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::load().unwrap();
        assert!(!store.catalogs.contains_key("de"));
        assert_eq!(
            store.translate("de", "error.user_not_found"),
            store.translate("en", "error.user_not_found")
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("es", "nao.existe"), "nao.existe");
    }

    #[test]
    fn placeholders_are_interpolated() {
        let store = I18nStore::load().unwrap();
        let text = store.translate_with(
            "es",
            "message.snack_added",
            &[
                ("qty", "2".to_string()),
                ("name", "Palomitas".to_string()),
                ("order", "7".to_string()),
            ],
        );
        assert_eq!(text, "Añadiste 2 × Palomitas a tu orden #7.");
    }
}
