use std::sync::Arc;
use std::thread;

use iam_assist_core::{Context, ResponseGenerator, RuleId};

#[test]
fn generator_is_shared_across_threads() {
    let generator = Arc::new(ResponseGenerator::new());
    let context = Arc::new(
        Context::builder()
            .account_id("svc-usr123")
            .violations(["Inactive > 90 days", "Stale approval"])
            .last_activity_days(125)
            .build(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            let context = Arc::clone(&context);
            thread::spawn(move || {
                (0..100)
                    .map(|_| generator.respond_detailed("why are there violations", Some(&context)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let expected = generator.respond_detailed("why are there violations", Some(&context));
    assert_eq!(expected.rule, RuleId::ViolationExplanation);

    for handle in handles {
        for reply in handle.join().unwrap() {
            assert_eq!(reply, expected);
        }
    }
}
