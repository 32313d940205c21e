//! Tests for condensing history across agent handoffs.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use baton::prelude::*;

fn summary_text(payload: &HandoffPayload) -> String {
    assert_eq!(payload.prior_history.len(), 1);
    let message = payload.prior_history[0]
        .as_message()
        .expect("summary is a message");
    assert_eq!(message.role, Role::System);
    match &message.content {
        Some(MessageContent::Text(text)) => text.clone(),
        other => panic!("expected text content, got {other:?}"),
    }
}

/// History as produced by two earlier runs of the example agents.
fn sdk_history() -> Vec<HistoryEntry> {
    serde_json::from_value(json!([
        {"content": "Hi, my name is Sora.", "role": "user"},
        {
            "id": "msg_1",
            "content": [{"annotations": [], "text": "Hi Sora!", "type": "output_text"}],
            "role": "assistant",
            "status": "completed",
            "type": "message"
        },
        {"content": "Can you generate a random number between 0 and 100?", "role": "user"},
        {"type": "function_call", "call_id": "call_1", "name": "random_number_tool", "arguments": "{\"max\":100}"},
        {"type": "function_call_output", "call_id": "call_1", "output": "42"},
        {
            "id": "msg_2",
            "content": [{"annotations": [], "text": "Here is a random number: 42.", "type": "output_text"}],
            "role": "assistant",
            "status": "completed",
            "type": "message"
        },
        {"content": "Por favor habla en español. ¿Cuál es mi nombre y dónde vivo?", "role": "user"}
    ]))
    .unwrap()
}

fn handoff_items() -> Vec<RunItem> {
    vec![
        RunItem::HandoffCall {
            agent: "Assistant".into(),
            call_id: "call_2".into(),
            target: "Spanish Assistant".into(),
        },
        RunItem::HandoffOutput {
            agent: "Assistant".into(),
            call_id: "call_2".into(),
            source_agent: "Assistant".into(),
            target_agent: "Spanish Assistant".into(),
        },
    ]
}

#[test]
fn sdk_shaped_history_condenses_to_user_and_assistant_turns() {
    let payload = HandoffPayload::new(sdk_history(), Vec::new(), handoff_items());

    let condensed = condense(&payload);

    assert_eq!(
        summary_text(&condensed),
        "Summary: User: Hi, my name is Sora. | Assistant: Hi Sora! | \
         User: Can you generate a random number between 0 and 100? | \
         Assistant: Here is a random number: 42. | \
         User: Por favor habla en español. ¿Cuál es mi nombre y dónde vivo?"
    );
    assert!(Arc::ptr_eq(&condensed.new_items, &payload.new_items));
    assert_eq!(payload.prior_history.len(), 7);
}

#[test]
fn summary_always_has_system_role_and_prefix() {
    let histories = [
        vec![Message::user("only user").into()],
        vec![Message::assistant("only assistant").into()],
        vec![
            Message::assistant_output("a").into(),
            Message::user("b").into(),
        ],
    ];
    for history in histories {
        let text = summary_text(&condense(&HandoffPayload::new(history, Vec::new(), Vec::new())));
        assert!(text.starts_with("Summary: "), "{text}");
    }
}

#[test]
fn empty_history_is_sentinel() {
    let condensed = condense(&HandoffPayload::default());
    assert_eq!(summary_text(&condensed), "Summary: No relevant history.");
}

#[test]
fn multi_block_assistant_keeps_first_block_only() {
    let payload = HandoffPayload::new(
        vec![Message::new(
            Role::Assistant,
            vec![
                ContentBlock::output_text("Hi"),
                ContentBlock::output_text("and more"),
            ],
        )
        .into()],
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(summary_text(&condense(&payload)), "Summary: Assistant: Hi");
}

#[test]
fn payload_json_wire_shape_round_trips_through_condense() {
    let raw = json!({
        "input_history": [
            {"role": "user", "content": "A"},
            {"role": "tool", "content": "ignored"},
            {"role": "assistant", "content": "B"}
        ],
        "pre_handoff_items": [
            {"type": "tool_call", "agent": "Assistant", "call_id": "c1", "name": "random_number_tool", "arguments": {"max": 10}}
        ],
        "new_items": []
    });
    let payload: HandoffPayload = serde_json::from_value(raw).unwrap();
    let out = serde_json::to_value(condense(&payload)).unwrap();
    assert_eq!(
        out,
        json!({
            "input_history": [{"role": "system", "content": "Summary: User: A | Assistant: B"}],
            "pre_handoff_items": [
                {"type": "tool_call", "agent": "Assistant", "call_id": "c1", "name": "random_number_tool", "arguments": {"max": 10}}
            ],
            "new_items": []
        })
    );
}

#[test]
fn condenser_is_shareable_across_threads() {
    let filter: Arc<dyn HandoffInputFilter> = Arc::new(ContextCondenser::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let filter = Arc::clone(&filter);
            std::thread::spawn(move || {
                let payload =
                    HandoffPayload::new(vec![Message::user(format!("m{i}")).into()], Vec::new(), Vec::new());
                summary_text(&filter.filter(&payload))
            })
        })
        .collect();
    let mut summaries: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    summaries.sort();
    assert_eq!(
        summaries,
        vec![
            "Summary: User: m0",
            "Summary: User: m1",
            "Summary: User: m2",
            "Summary: User: m3"
        ]
    );
}

#[test]
fn handoff_through_agent_definition() {
    let spanish = Agent::builder()
        .name("Spanish Assistant")
        .instructions("You only speak Spanish and are extremely concise.")
        .handoff_description("A Spanish-speaking assistant.")
        .build();
    let second = Agent::builder()
        .name("Assistant")
        .instructions("Be a helpful assistant. If the user speaks Spanish, handoff to the Spanish assistant.")
        .handoffs(vec![Handoff::to(spanish).with_input_filter(ContextCondenser::new())])
        .build();

    let mut session = Session::new(second.name.clone());
    for entry in sdk_history() {
        session.push_entry(entry);
    }
    session.record_response(handoff_items(), &Usage::single(12, 4));

    let handoff = second
        .find_handoff("transfer_to_spanish_assistant")
        .expect("handoff registered");
    let next = session.hand_off(handoff, Vec::new());

    assert_eq!(next.agent(), "Spanish Assistant");
    let input = next.to_input_list();
    assert_eq!(input.len(), 3);
    assert_eq!(input[0].role(), Some(Role::System));
    // The tool plumbing from earlier turns is gone; only the handoff items follow the summary.
    assert!(input[1..].iter().all(|entry| entry.as_message().is_none()));
    assert_eq!(
        handoff.target().resolve_instructions(&RunContext::new()),
        "You only speak Spanish and are extremely concise."
    );
}

#[test]
fn remove_tools_then_condense_hides_tool_plumbing() {
    let chain = FilterChain::new()
        .with(RemoveToolItems)
        .with(ContextCondenser::new());
    let pre = vec![RunItem::ToolCall {
        agent: "Assistant".into(),
        call_id: "call_1".into(),
        name: "random_number_tool".into(),
        arguments: json!({"max": 100}),
    }];
    let payload = HandoffPayload::new(sdk_history(), pre, handoff_items());

    let out = chain.filter(&payload);

    assert!(out.pre_handoff_items.is_empty());
    assert!(out.new_items.is_empty());
    assert!(summary_text(&out).contains("Assistant: Here is a random number: 42."));
}
