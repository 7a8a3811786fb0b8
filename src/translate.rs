use tracing::{debug, info};

use crate::detect::Direction;
use crate::engine::{Language, TranslationEngine};
use crate::error::{Result, RuenError};

/// Resolve a language code against the installed languages
pub fn find_language<'a>(installed: &'a [Language], code: &str) -> Result<&'a Language> {
    installed
        .iter()
        .find(|language| language.code == code)
        .ok_or_else(|| RuenError::LanguageNotInstalled {
            code: code.to_string(),
            installed: installed
                .iter()
                .map(|language| language.code.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Translate `text` in the given direction.
///
/// Both languages must be installed; nothing is sent to the engine otherwise.
pub async fn translate_text(
    engine: &dyn TranslationEngine,
    direction: Direction,
    text: &str,
) -> Result<String> {
    let (from_code, to_code) = direction.codes();
    let installed = engine.installed_languages().await?;

    let from = find_language(&installed, from_code)?;
    let to = find_language(&installed, to_code)?;

    info!("Translating {} -> {}", from, to);
    let translation = engine.translate(from, to, text).await?;
    debug!("Translation produced {} characters", translation.chars().count());

    Ok(translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockTranslationEngine;

    fn installed_pair() -> Vec<Language> {
        vec![Language::new("en", "English"), Language::new("ru", "Russian")]
    }

    #[test]
    fn test_find_language_reports_installed_set() {
        let installed = vec![Language::new("en", "English"), Language::new("de", "German")];
        let err = find_language(&installed, "ru").unwrap_err();

        match err {
            RuenError::LanguageNotInstalled { code, installed } => {
                assert_eq!(code, "ru");
                assert_eq!(installed, "en, de");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translate_uses_direction_codes() {
        let mut engine = MockTranslationEngine::new();
        engine.expect_installed_languages().returning(|| Ok(installed_pair()));
        engine
            .expect_translate()
            .withf(|from, to, text| from.code == "ru" && to.code == "en" && text.to_string() == "привет")
            .times(1)
            .returning(|_, _, text| Ok(text.chars().rev().collect()));

        let result = translate_text(&engine, Direction::RuEn, "привет").await.unwrap();
        assert_eq!(result, "тевирп");
    }

    #[tokio::test]
    async fn test_missing_language_never_reaches_engine() {
        let mut engine = MockTranslationEngine::new();
        engine
            .expect_installed_languages()
            .returning(|| Ok(vec![Language::new("en", "English")]));
        engine.expect_translate().times(0);

        let err = translate_text(&engine, Direction::EnRu, "hello").await.unwrap_err();
        assert!(matches!(err, RuenError::LanguageNotInstalled { ref code, .. } if code == "ru"));
    }
}
