use companion_backend::rules::{FallbackSet, ResponseRule, default_fallback, default_rules};
use companion_backend::services::conversation::ChatSession;
use companion_backend::services::responder::{Responder, Selection};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn responder() -> Responder {
    Responder::with_default_rules().unwrap()
}

fn all_replies() -> Vec<String> {
    let mut replies: Vec<String> = default_rules()
        .unwrap()
        .iter()
        .flat_map(|r| r.candidates().to_vec())
        .collect();
    replies.extend(default_fallback().unwrap().candidates().iter().cloned());
    replies
}

#[test]
fn test_reply_comes_from_the_matched_rule() {
    let r = responder();
    let mut rng = StdRng::seed_from_u64(11);
    for rule in r.rules() {
        for keyword in rule.keywords() {
            let utterance = format!("lately it's {} all the time", keyword.to_uppercase());
            let expected = r.classify(&utterance);
            assert_eq!(expected.topic(), Some(rule.topic()));
            let reply = r.select_response(&utterance, &mut rng);
            assert!(
                expected.candidates().iter().any(|c| c == reply),
                "reply for {:?} not in its pool",
                utterance
            );
        }
    }
}

#[test]
fn test_scenarios() {
    let r = responder();
    let mut rng = StdRng::seed_from_u64(5);

    let anxious = &r.rules()[1];
    let reply = r.select_response("I feel so anxious about exams", &mut rng);
    assert_eq!(anxious.candidates().len(), 3);
    assert!(anxious.candidates().iter().any(|c| c == reply));

    let reply = r.select_response("purple elephants", &mut rng);
    assert_eq!(r.fallback().candidates().len(), 5);
    assert!(r.fallback().candidates().iter().any(|c| c == reply));

    let reply = r.select_response("I feel good about winding down", &mut rng);
    assert!(r.rules()[0].candidates().iter().any(|c| c == reply));
}

#[test]
fn test_never_invents_replies() {
    let r = responder();
    let known = all_replies();
    let mut rng = StdRng::seed_from_u64(2024);
    let inputs = [
        "",
        "   ",
        "HELP!!!",
        "sleepless and stressed",
        "low-key happy",
        "¿qué tal?",
        "nothing to see here",
    ];
    for _ in 0..20 {
        for input in inputs {
            let reply = r.select_response(input, &mut rng);
            assert!(known.iter().any(|k| k == reply), "unknown reply {:?}", reply);
        }
    }
}

#[test]
fn test_custom_table_first_match_wins() {
    let rules = vec![
        ResponseRule::new("first", ["cat", "dog"], ["from first"]).unwrap(),
        ResponseRule::new("second", ["dog"], ["from second"]).unwrap(),
    ];
    let r = Responder::new(rules, FallbackSet::new(["fallback"]).unwrap());
    let mut rng = StdRng::seed_from_u64(0);

    assert_eq!(r.select_response("my DOG", &mut rng), "from first");
    assert_eq!(r.select_response("bird", &mut rng), "fallback");
    match r.classify("dog and cat") {
        Selection::Rule { rule, keyword } => {
            assert_eq!(rule.topic(), "first");
            assert_eq!(keyword, "cat");
        }
        Selection::Fallback(_) => panic!("expected rule match"),
    }
}

#[test]
fn test_selection_does_not_touch_session() {
    let r = responder();
    let session = ChatSession::new("Kai");
    let before = session.messages().len();
    let mut rng = StdRng::seed_from_u64(9);
    let _ = r.select_response("I'm sad", &mut rng);
    assert_eq!(session.messages().len(), before);
}
