use platform_detector::{BuiltinModel, Classifier, ClassifierError, CountVector, TextVectorizer};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn spam_ham() -> Classifier {
    let bundle = json!({
        "vocab": {"free": 0, "win": 1, "meeting": 2},
        "classes": ["spam", "ham"],
        "class_log_prior": [-0.4, -1.2],
        "feature_log_prob": [[-0.5, -0.6, -3.0], [-2.0, -2.5, -0.3]]
    });
    Classifier::builder()
        .with_model_json(&bundle.to_string())
        .unwrap()
        .build()
        .expect("Failed to create classifier")
}

fn social_media() -> Classifier {
    Classifier::builder()
        .with_model(BuiltinModel::SocialMedia)
        .unwrap()
        .build()
        .expect("Failed to create classifier")
}

#[test]
fn test_spam_ham_scenario() {
    let classifier = spam_ham();
    let counts = classifier.tokenize("free win free");
    assert_eq!(counts.to_vec(), vec![2, 1, 0]);
    assert_eq!(classifier.classify(&counts).unwrap(), "spam");
    assert_eq!(classifier.predict("free win free").unwrap(), "spam");
}

#[test]
fn test_tie_goes_to_first_class() {
    let bundle = json!({
        "vocab": {"alpha": 0, "beta": 1},
        "classes": ["first", "second"],
        "class_log_prior": [-0.693, -0.693],
        "feature_log_prob": [[-0.7, -0.7], [-0.7, -0.7]]
    });
    let classifier = Classifier::builder()
        .with_model_json(&bundle.to_string())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(classifier.classify(&CountVector::zeros(2)).unwrap(), "first");
    // Unknown words only: still an all-zero vector.
    assert_eq!(classifier.predict("gamma delta").unwrap(), "first");
    // Symmetric evidence keeps the tie.
    assert_eq!(classifier.predict("alpha beta").unwrap(), "first");
}

#[test]
fn test_negative_infinity_excludes_class() {
    let bundle = json!({
        "vocab": {"free": 0, "meeting": 1},
        "classes": ["spam", "ham"],
        "class_log_prior": [-0.1, -5.0],
        "feature_log_prob": [[-0.5, -1.0], [-2.0, -0.3]]
    });
    // serde_json cannot encode infinities, so build from the typed bundle instead.
    let mut bundle: platform_detector::ModelBundle = serde_json::from_value(bundle).unwrap();
    bundle.feature_log_prob[0][1] = f64::NEG_INFINITY;
    let classifier = Classifier::builder().with_bundle(bundle).unwrap().build().unwrap();

    assert_eq!(classifier.predict("free free free").unwrap(), "spam");
    assert_eq!(classifier.predict("free meeting").unwrap(), "ham");
}

#[test]
fn test_out_of_vocabulary_does_not_change_label() {
    let classifier = social_media();
    let text = "Retweet this thread, it's trending!";
    let noisy = "Retweet this thread, it's trending! xyzzy plugh";
    assert_eq!(classifier.tokenize(text), classifier.tokenize(noisy));
    assert_eq!(classifier.predict(text).unwrap(), classifier.predict(noisy).unwrap());
}

#[test]
fn test_case_and_punctuation_insensitive() {
    let classifier = social_media();
    assert_eq!(classifier.tokenize("Hello, WORLD!!"), classifier.tokenize("hello world"));
    assert_eq!(
        classifier.predict("RETWEET this THREAD -- it's TRENDING!!!").unwrap(),
        "Twitter"
    );
}

#[test]
fn test_social_media_predictions() {
    let classifier = social_media();
    let cases = [
        ("Happy birthday! Share with friends and family", "Facebook"),
        ("New selfie, no filter #goldenhour", "Instagram"),
        ("Excited to announce I'm hiring engineers", "LinkedIn"),
        ("Thanks for the gold, kind stranger! Upvote", "Reddit"),
        ("Retweet this thread, it's trending!", "Twitter"),
    ];
    for (text, expected) in cases {
        assert_eq!(classifier.predict(text).unwrap(), expected, "text: {}", text);
    }
}

#[test]
fn test_unknown_text_falls_back_to_first_class() {
    // Equal priors and no known tokens: every class ties.
    let classifier = social_media();
    assert_eq!(classifier.predict("qwerty asdf zxcv").unwrap(), "Facebook");
}

#[test]
fn test_determinism() {
    let classifier = social_media();
    let first = classifier.predict("upvote if you agree").unwrap();
    for _ in 0..50 {
        assert_eq!(classifier.predict("upvote if you agree").unwrap(), first);
    }
}

#[test]
fn test_prediction_validation() {
    let classifier = social_media();
    assert!(matches!(classifier.predict(""), Err(ClassifierError::ValidationError(_))));
    assert!(matches!(classifier.predict("   "), Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_thread_safety() {
    let classifier = Arc::new(social_media());
    let mut handles = vec![];

    for _ in 0..3 {
        let classifier = Arc::clone(&classifier);
        let handle = thread::spawn(move || {
            let result = classifier.predict("Swipe up on my story for the new reel");
            assert_eq!(result.unwrap(), "Instagram");
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
