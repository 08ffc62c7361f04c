mod common;

use common::utilities::{schema, ScriptedCompletion};
use dealerbot_core::agents::intent::{build_instruction, classify, parse_completion, MalformedOutput, ParseOutcome};
use dealerbot_core::query::descriptor::{Action, QueryDescriptor};

#[test]
fn parses_plain_json_object() {
    let out = parse_completion(r#"{"table": "vehicles", "field": "brand", "keyword": "BMW", "action": "count"}"#);
    assert_eq!(
        out,
        ParseOutcome::Parsed(QueryDescriptor::new("vehicles", "brand", "BMW", Action::Count))
    );
}

#[test]
fn strips_markdown_code_fence() {
    let raw = "```json\n{\"table\": \"company\", \"field\": \"phone\", \"keyword\": \"0\", \"action\": \"lookup\"}\n```";
    assert_eq!(
        parse_completion(raw).into_descriptor(),
        QueryDescriptor::new("company", "phone", "0", Action::Lookup)
    );

    let bare = "```\n{\"table\": \"company\"}\n```";
    assert_eq!(
        parse_completion(bare).into_descriptor().table.as_deref(),
        Some("company")
    );
}

#[test]
fn malformed_output_is_reported_not_raised() {
    assert_eq!(parse_completion(""), ParseOutcome::Malformed(MalformedOutput::Empty));
    assert_eq!(parse_completion("```json\n```"), ParseOutcome::Malformed(MalformedOutput::Empty));
    assert_eq!(
        parse_completion(r#"["vehicles", "brand"]"#),
        ParseOutcome::Malformed(MalformedOutput::NotObject)
    );
    assert!(matches!(
        parse_completion("當然！以下是結果：{\"table\": \"vehicles\"}"),
        ParseOutcome::Malformed(MalformedOutput::NotJson(_))
    ));
    assert_eq!(
        parse_completion("not json at all").into_descriptor(),
        QueryDescriptor::default()
    );
}

#[test]
fn values_are_type_checked_one_by_one() {
    let out = parse_completion(
        r#"{"table": "vehicles", "field": ["year"], "keyword": 2020, "action": 1}"#,
    )
    .into_descriptor();
    assert_eq!(out.table.as_deref(), Some("vehicles"));
    assert_eq!(out.field, None);
    assert_eq!(out.keyword.as_deref(), Some("2020"));
    assert_eq!(out.action, Action::Lookup);
}

#[test]
fn nulls_and_blanks_read_as_absent() {
    let out = parse_completion(r#"{"table": null, "field": "  ", "keyword": null, "action": "lookup"}"#)
        .into_descriptor();
    assert_eq!(out, QueryDescriptor::default());
}

#[test]
fn instruction_lists_schema_and_count_rule() {
    let reg = schema();
    let text = build_instruction(&reg);
    for t in reg.tables() {
        assert!(text.contains(&t.name), "missing table {}", t.name);
        for f in t.field_names() {
            assert!(text.contains(f), "missing field {}", f);
        }
    }
    assert!(text.contains("\"count\""));
    assert!(text.contains("有幾台"));
    assert!(text.contains("company.phone → \"0\""));
    assert!(text.contains("JSON"));
}

#[tokio::test]
async fn classify_sends_schema_instruction_and_reads_reply() {
    let reg = schema();
    let llm = ScriptedCompletion::new().on(
        "BMW 有幾台",
        r#"{"table": "vehicles", "field": "brand", "keyword": "BMW", "action": "count"}"#,
    );

    let d = classify("BMW 有幾台", &reg, &llm).await;
    assert_eq!(d, QueryDescriptor::new("vehicles", "brand", "BMW", Action::Count));
    assert_eq!(llm.calls(), 1);
    assert_eq!(llm.last_system(), Some(build_instruction(&reg)));
}

#[tokio::test]
async fn classify_degrades_on_transport_failure() {
    let reg = schema();
    let llm = ScriptedCompletion::new().failing_on("BMW 有幾台", "timed out");
    let d = classify("BMW 有幾台", &reg, &llm).await;
    assert_eq!(d, QueryDescriptor::default());
    assert_eq!(llm.calls(), 1);
}

#[test]
fn malformed_outcomes_can_be_kept_and_replayed() {
    let out = parse_completion("```json\n```");
    let kept = out.clone();
    assert_eq!(kept, ParseOutcome::Malformed(MalformedOutput::Empty));
    assert_eq!(out.into_descriptor(), QueryDescriptor::default());
}

#[tokio::test]
async fn classify_discards_malformed_output() {
    let reg = schema();
    let llm = ScriptedCompletion::new()
        .on("你好", "當然！這是結果：table=vehicles")
        .on("BMW", r#"["vehicles", "brand", "BMW"]"#);
    assert_eq!(classify("你好", &reg, &llm).await, QueryDescriptor::default());
    assert_eq!(classify("BMW", &reg, &llm).await, QueryDescriptor::default());
    assert_eq!(llm.calls(), 2);
}
