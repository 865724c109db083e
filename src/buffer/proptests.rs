//! Property-based tests for the conversation buffer
//!
//! Random command sequences are replayed against a buffer and the window,
//! undo and atomicity guarantees are checked after every step.

use std::num::NonZeroUsize;

use proptest::prelude::*;

use super::*;

#[derive(Debug, Clone)]
enum Op {
    AddPrompt(String),
    AddResponse(String),
    Undo,
    Finalize,
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z ]{1,20}".prop_filter("non-blank", |s| !s.trim().is_empty()),
        1 => "[ \t]{0,3}",
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => arb_text().prop_map(Op::AddPrompt),
        3 => arb_text().prop_map(Op::AddResponse),
        1 => Just(Op::Undo),
        2 => Just(Op::Finalize),
    ]
}

fn apply(buf: &mut ConversationBuffer, op: Op) -> Result<(), BufferError> {
    match op {
        Op::AddPrompt(text) => buf.add_prompt(text).map(|_| ()),
        Op::AddResponse(text) => buf.add_response(text),
        Op::Undo => buf.undo().map(|_| ()),
        Op::Finalize => buf.finalize().map(|_| ()),
    }
}

fn new_buffer(k: usize) -> ConversationBuffer {
    ConversationBuffer::new(NonZeroUsize::new(k).unwrap())
}

fn sequence_indices(buf: &ConversationBuffer) -> Vec<u64> {
    buf.history().map(FinalizedPair::sequence_index).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_window_never_exceeds_capacity(
        k in 1usize..6,
        ops in proptest::collection::vec(arb_op(), 0..60),
    ) {
        let mut buf = new_buffer(k);
        for op in ops {
            let _ = apply(&mut buf, op);
            prop_assert!(buf.history().len() <= k);
            prop_assert_eq!(buf.get_status().window_capacity, k);
        }
    }

    #[test]
    fn prop_failed_operations_change_nothing(
        k in 1usize..4,
        ops in proptest::collection::vec(arb_op(), 0..40),
    ) {
        let mut buf = new_buffer(k);
        for op in ops {
            let status_before = buf.get_status();
            let indices_before = sequence_indices(&buf);
            let top_before = buf.top_response().cloned();

            if apply(&mut buf, op).is_err() {
                prop_assert_eq!(buf.get_status(), status_before);
                prop_assert_eq!(sequence_indices(&buf), indices_before);
                prop_assert_eq!(buf.top_response().cloned(), top_before);
            }
        }
    }

    #[test]
    fn prop_undo_reverts_add_response(
        ops in proptest::collection::vec(arb_op(), 0..30),
        text in "[a-z]{1,10}",
    ) {
        let mut buf = new_buffer(3);
        for op in ops {
            let _ = apply(&mut buf, op);
        }
        if buf.current_prompt().is_none() {
            buf.add_prompt("anchor").unwrap();
        }

        let depth_before = buf.response_stack_depth();
        let top_before = buf.top_response().cloned();

        buf.add_response(text.clone()).unwrap();
        let undone = buf.undo().unwrap();

        prop_assert_eq!(undone.text(), text.as_str());
        prop_assert_eq!(buf.response_stack_depth(), depth_before);
        prop_assert_eq!(buf.top_response().cloned(), top_before);
    }

    #[test]
    fn prop_sequence_indices_strictly_increase(
        k in 1usize..5,
        ops in proptest::collection::vec(arb_op(), 0..60),
    ) {
        let mut buf = new_buffer(k);
        let mut last_total = 0;
        for op in ops {
            let _ = apply(&mut buf, op);

            let indices = sequence_indices(&buf);
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));

            let total = buf.get_status().total_finalized;
            prop_assert!(total >= last_total);
            if let Some(newest) = indices.last() {
                prop_assert_eq!(*newest, total);
            }
            last_total = total;
        }
    }

    #[test]
    fn prop_status_query_is_idempotent(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut buf = new_buffer(2);
        for op in ops {
            let _ = apply(&mut buf, op);
            prop_assert_eq!(buf.get_status(), buf.get_status());
        }
    }

    #[test]
    fn prop_stack_only_exists_with_prompt(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut buf = new_buffer(2);
        for op in ops {
            let _ = apply(&mut buf, op);
            let status = buf.get_status();
            if status.response_stack_depth > 0 {
                prop_assert!(status.current_prompt.is_some());
                prop_assert_eq!(status.state, BufferState::HasResponse);
            }
        }
    }
}
