/**
 * Message Tests
 *
 * Reading messages out of decoded catalog documents, in every layout a
 * catalog file can use.
 */

#[cfg(test)]
mod tests {
    use i18n_catalog::{
        parse_messages, parse_path, Catalog, LanguageTag, Message, ParseError, PluralCategory,
        RawCatalog,
    };
    use serde_json::json;

    fn en() -> LanguageTag {
        LanguageTag::english()
    }

    #[test]
    fn reads_mixed_flat_document() {
        let messages = parse_messages(&json!({
            "Hello": "Hello!",
            "Cats": {
                "description": "number of cats",
                "one": "{{.Count}} cat",
                "other": "{{.Count}} cats"
            }
        }))
        .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::new("Hello").with_other("Hello!"));
        assert_eq!(
            messages[1],
            Message::new("Cats")
                .with_description("number of cats")
                .with_one("{{.Count}} cat")
                .with_other("{{.Count}} cats")
        );
    }

    #[test]
    fn nested_groups_build_dotted_ids() {
        let messages = parse_messages(&json!({
            "errors": {
                "network": {"timeout": "Timed out", "offline": {"other": "Offline"}},
                "unknown": "Something went wrong"
            }
        }))
        .unwrap();
        let ids: Vec<_> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "errors.network.timeout",
                "errors.network.offline",
                "errors.unknown"
            ]
        );
    }

    #[test]
    fn legacy_list_layout() {
        let messages = parse_messages(&json!([
            {"id": "Hello", "translation": "Hola"},
            {"id": "Cats", "translation": {"one": "un gato", "other": "gatos"}}
        ]))
        .unwrap();
        assert_eq!(messages[0].other.as_deref(), Some("Hola"));
        assert_eq!(messages[1].form(PluralCategory::One), Some("un gato"));
        assert_eq!(messages[1].form(PluralCategory::Other), Some("gatos"));
    }

    #[test]
    fn hash_and_delimiters_are_read() {
        let messages = parse_messages(&json!({
            "Hello": {
                "hash": "sha1-abc",
                "leftDelim": "<<",
                "rightDelim": ">>",
                "other": "Hi <<.Name>>"
            }
        }))
        .unwrap();
        assert_eq!(messages[0].hash, "sha1-abc");
        assert_eq!(messages[0].left_delim, "<<");
        assert_eq!(messages[0].right_delim, ">>");
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(parse_messages(&json!("just text")), Err(ParseError::InvalidFile));
        assert!(matches!(
            parse_messages(&json!({"Hello": 42})),
            Err(ParseError::UnsupportedValue(_))
        ));
        assert!(matches!(
            parse_messages(&json!({"Hello": {"other": "x", "one": ["a"]}})),
            Err(ParseError::ExpectedString { .. })
        ));
    }

    #[test]
    fn empty_document_has_no_messages() {
        assert!(parse_messages(&json!({})).unwrap().is_empty());
        assert!(parse_messages(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn path_gives_language_and_format() {
        assert_eq!(parse_path("locales/active.pt-BR.json"), ("pt-BR", "json"));
        assert_eq!(parse_path("zh-Hant.yaml"), ("zh-Hant", "yaml"));
        assert_eq!(parse_path("README"), ("", ""));
    }

    #[test]
    fn raw_catalog_from_document() {
        let raw = RawCatalog::from_value(
            "locales/translate.ES.toml",
            &json!({"Hello": {"hash": "sha1-1", "other": "Hola"}}),
            &en(),
        )
        .unwrap();
        assert_eq!(raw.tag.to_string(), "es");
        assert_eq!(raw.path, "locales/translate.ES.toml");
        assert_eq!(raw.messages[0].hash, "sha1-1");
    }

    #[test]
    fn raw_catalog_rejects_bad_language() {
        let err = RawCatalog::from_value("active.not_a_language!.json", &json!({}), &en());
        assert!(matches!(err, Err(ParseError::Language(_))));
    }

    #[test]
    fn catalog_keeps_document_order() {
        let messages = parse_messages(&json!({"b": "B", "a": "A", "c": "C"})).unwrap();
        let catalog = Catalog::from_messages(en(), messages);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(catalog.tag(), &en());
    }
}
