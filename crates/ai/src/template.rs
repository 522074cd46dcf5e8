use casecheck_core::TestCaseRecord;

/// Render the user message for one test case.
///
/// `{Feature}`, `{Scenario}`, `{Steps}` and `{ExpectedResult}` are replaced
/// by the record's fields in a single left-to-right pass, so placeholder
/// text inside a field value is never expanded a second time. Anything else
/// in braces is copied through verbatim.
pub fn render_user_message(template: &str, record: &TestCaseRecord) -> String {
    let fields: [(&str, &str); 4] = [
        ("{Feature}", &record.feature),
        ("{Scenario}", &record.scenario),
        ("{Steps}", &record.steps),
        ("{ExpectedResult}", &record.expected_result),
    ];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match fields.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, value)) => {
                out.push_str(value);
                rest = &rest[token.len()..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TestCaseRecord {
        TestCaseRecord {
            id: "TC-7".into(),
            feature: "Login".into(),
            scenario: "Locked account".into(),
            priority: "High".into(),
            steps: "1. Enter bad password 5x".into(),
            expected_result: "Account locked".into(),
            status: "Not Run".into(),
        }
    }

    #[test]
    fn all_placeholders_replaced() {
        let template = "F={Feature} S={Scenario} T={Steps} E={ExpectedResult}";
        let out = render_user_message(template, &record());
        assert_eq!(
            out,
            "F=Login S=Locked account T=1. Enter bad password 5x E=Account locked"
        );
        assert!(!out.contains("{Feature}"));
        assert!(!out.contains("{ExpectedResult}"));
    }

    #[test]
    fn order_of_placeholders_does_not_matter() {
        let out = render_user_message("{ExpectedResult}|{Steps}|{Scenario}|{Feature}", &record());
        assert_eq!(out, "Account locked|1. Enter bad password 5x|Locked account|Login");
        for value in ["Login", "Locked account", "Account locked"] {
            assert_eq!(out.matches(value).count(), 1);
        }
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let out = render_user_message("{Priority} {Scenario} {", &record());
        assert_eq!(out, "{Priority} Locked account {");
    }

    #[test]
    fn field_values_are_not_expanded() {
        let mut rec = record();
        rec.feature = "{Scenario}".into();
        let out = render_user_message("{Feature} / {Scenario}", &rec);
        assert_eq!(out, "{Scenario} / Locked account");
    }

    #[test]
    fn repeated_placeholder() {
        let out = render_user_message("{Feature}-{Feature}", &record());
        assert_eq!(out, "Login-Login");
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        let out = render_user_message("é{Feature}ü{", &record());
        assert_eq!(out, "éLoginü{");
    }
}
