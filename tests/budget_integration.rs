//! Integration tests for token budget enforcement
//!
//! These tests exercise the trimming pipeline end to end with the real
//! tiktoken tokenizer and with the public crate surface.

use std::sync::Arc;
use transcript_manager::{
    transcript_tokens, trim_to_budget, BudgetEnforcer, Message, TiktokenCounter, TokenCounter,
    Transcript,
};

#[test]
fn test_tiktoken_trim_end_to_end() {
    let counter = TiktokenCounter::for_model("gpt-3.5-turbo").unwrap();

    let mut transcript: Transcript = [
        Message::system("You are a helpful assistant. Answer briefly."),
        Message::user("Tell me about the history of the Rust programming language."),
        Message::assistant(
            "Rust began as a personal project at Mozilla in 2006 and reached 1.0 in 2015. \
             It focuses on memory safety without garbage collection.",
        ),
        Message::user("What about its package manager?"),
        Message::assistant("Cargo is Rust's build tool and package manager."),
    ]
    .into_iter()
    .collect();

    let total = transcript_tokens(&transcript, &counter);
    assert!(total > 0);

    // Force eviction of at least the first exchange
    let budget = total - 1;
    let report = trim_to_budget(&mut transcript, budget, &counter);

    assert!(report.evicted >= 1);
    assert!(report.tokens <= budget);
    assert!(!report.over_budget);
    assert_eq!(report.tokens, transcript_tokens(&transcript, &counter));

    // The system message survives and stays first
    assert_eq!(
        transcript.messages()[0],
        Message::system("You are a helpful assistant. Answer briefly.")
    );
}

#[test]
fn test_generous_budget_leaves_transcript_unchanged() {
    let counter = TiktokenCounter::for_model("gpt-3.5-turbo").unwrap();

    let mut transcript: Transcript = [
        Message::system("Be brief."),
        Message::user("Hello!"),
        Message::assistant("Hi! How can I help?"),
    ]
    .into_iter()
    .collect();
    let before = transcript.clone();

    let report = trim_to_budget(&mut transcript, 100_000, &counter);

    assert_eq!(report.evicted, 0);
    assert_eq!(transcript, before);
}

#[test]
fn test_enforcer_with_real_tokenizer() {
    let counter: Arc<dyn TokenCounter> =
        Arc::new(TiktokenCounter::for_model("gpt-4").unwrap());
    let enforcer = BudgetEnforcer::new(20, Arc::clone(&counter));

    let mut transcript = Transcript::with_system("Short rules.");
    for i in 0..6 {
        transcript.push(Message::user(format!("user turn number {}", i)));
        transcript.push(Message::assistant(format!("assistant reply number {}", i)));
    }

    let report = enforcer.enforce(&mut transcript, None);

    assert!(report.tokens <= 20);
    assert!(!report.over_budget);
    assert!(transcript.len() < 13);
    assert_eq!(transcript.count_role(transcript_manager::Role::System), 1);
}

#[test]
fn test_oversized_system_prompt_is_left_in_place() {
    let counter = TiktokenCounter::for_model("gpt-3.5-turbo").unwrap();

    let long_prompt = "These are very detailed standing instructions. ".repeat(20);
    let mut transcript = Transcript::with_system(long_prompt.clone());

    let report = trim_to_budget(&mut transcript, 10, &counter);

    assert!(report.over_budget);
    assert_eq!(report.evicted, 0);
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages()[0], Message::system(long_prompt));
}

#[test]
fn test_unsupported_tokenizer_model_is_fatal() {
    let result = TiktokenCounter::for_model("imaginary-model-9000");
    assert!(result.is_err());
}
