/**
 * Template Tests
 *
 * The template language as used by message catalogs: actions, pipelines,
 * conditionals, custom delimiters and caller functions.
 */

#[cfg(test)]
mod tests {
    use i18n_catalog::{
        Delimiters, FunctionTable, Message, MessageTemplate, PluralCategory, Template,
        TemplateError,
    };
    use serde::Serialize;
    use serde_json::{json, Value};

    fn render(src: &str, data: Value) -> String {
        Template::new(src, Delimiters::default())
            .execute(&data, &FunctionTable::new())
            .unwrap()
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Cats {
        name: String,
        count: u32,
    }

    #[test]
    fn renders_struct_fields() {
        let template = MessageTemplate::new(
            Message::new("Cats")
                .with_one("{{.Name}} has {{.Count}} cat.")
                .with_other("{{.Name}} has {{.Count}} cats."),
        )
        .unwrap();
        let data = Cats {
            name: "Nick".into(),
            count: 2,
        };
        let funcs = FunctionTable::new();
        assert_eq!(
            template.execute(PluralCategory::Other, &data, &funcs).unwrap(),
            "Nick has 2 cats."
        );
        assert_eq!(
            template.execute(PluralCategory::One, &data, &funcs).unwrap(),
            "Nick has 2 cat."
        );
    }

    #[test]
    fn missing_plural_form_is_an_error() {
        let template = MessageTemplate::new(Message::new("Hello").with_other("Hi")).unwrap();
        let err = template
            .execute(PluralCategory::Few, &json!({}), &FunctionTable::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::PluralFormNotFound { .. }));
    }

    #[test]
    fn if_else_chains() {
        let src = "{{if eq .N 0}}none{{else if eq .N 1}}one{{else}}{{.N}}{{end}}";
        assert_eq!(render(src, json!({"N": 0})), "none");
        assert_eq!(render(src, json!({"N": 1})), "one");
        assert_eq!(render(src, json!({"N": 7})), "7");
    }

    #[test]
    fn with_and_range() {
        assert_eq!(
            render("{{with .User}}Hi {{.Name}}{{else}}Hi stranger{{end}}", json!({})),
            "Hi stranger"
        );
        assert_eq!(
            render(
                "{{range .Items}}<{{.}}>{{end}}",
                json!({"Items": ["a", "b", "c"]})
            ),
            "<a><b><c>"
        );
    }

    #[test]
    fn trim_markers_and_comments() {
        assert_eq!(render("a  {{- /* note */ -}}  b", json!({})), "ab");
        assert_eq!(render("{{.A}} {{- .B}}", json!({"A": 1, "B": 2})), "12");
    }

    #[test]
    fn pipelines_feed_the_last_argument() {
        let funcs = FunctionTable::new().with("upper", |args: &[Value]| match args {
            [Value::String(s)] => Ok(Value::String(s.to_uppercase())),
            _ => Err("upper expects one string".to_string()),
        });
        let template = Template::new("{{.Name | upper}}!", Delimiters::default());
        assert_eq!(
            template.execute(&json!({"Name": "ana"}), &funcs).unwrap(),
            "ANA!"
        );
    }

    #[test]
    fn function_errors_are_reported() {
        let funcs = FunctionTable::new().with("fail", |_: &[Value]| Err("boom".to_string()));
        let err = Template::new("{{fail}}", Delimiters::default())
            .execute(&json!({}), &funcs)
            .unwrap_err();
        assert_eq!(err, TemplateError::Exec("error calling fail: boom".into()));
    }

    #[test]
    fn missing_keys_print_no_value() {
        assert_eq!(render("[{{.Missing}}]", json!({})), "[<no value>]");
    }

    #[test]
    fn literals_and_builtins() {
        assert_eq!(render(r#"{{print "n=" 3}}"#, json!({})), "n=3");
        assert_eq!(render("{{len .}}", json!([1, 2, 3])), "3");
        assert_eq!(render(r#"{{index . "k"}}"#, json!({"k": "v"})), "v");
        assert_eq!(render("{{if and .A (not .B)}}yes{{end}}", json!({"A": true, "B": false})), "yes");
    }

    #[test]
    fn custom_delimiters_leave_braces_alone() {
        let template = MessageTemplate::new(
            Message::new("Json")
                .with_other(r#"{"name": "<<.Name>>"}"#)
                .with_delimiters("<<", ">>"),
        )
        .unwrap();
        let out = template
            .execute(PluralCategory::Other, &json!({"Name": "Ana"}), &FunctionTable::new())
            .unwrap();
        assert_eq!(out, r#"{"name": "Ana"}"#);
    }

    #[test]
    fn unusable_delimiters_are_rejected() {
        let err = Template::new("x {{.A}}", Delimiters::new("{ {", "}}"))
            .compile()
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidDelimiters { .. }));
    }

    #[test]
    fn parse_errors() {
        for src in ["{{if .A}}", "{{end}}", "{{.A", "{{else}}", "{{ | .A }}"] {
            let template = Template::new(src, Delimiters::default());
            let result = template.compile();
            assert!(result.is_err(), "{:?} should not parse", src);
        }
    }

    #[test]
    fn templates_render_across_threads() {
        let template = std::sync::Arc::new(
            MessageTemplate::new(Message::new("Hello").with_other("Hello {{.}}")).unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let template = template.clone();
                std::thread::spawn(move || {
                    template
                        .execute(PluralCategory::Other, &i, &FunctionTable::new())
                        .unwrap()
                })
            })
            .collect();
        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outputs, vec!["Hello 0", "Hello 1", "Hello 2", "Hello 3"]);
    }

    #[test]
    fn deeply_nested_source_fails_to_compile() {
        let depth = 20_000;
        let src = format!("{{{{ {}1{} }}}}", "print (".repeat(depth), ")".repeat(depth));
        let err = Template::new(src, Delimiters::default()).compile().unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }
}
