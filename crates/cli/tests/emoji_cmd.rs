//! CLI tests for the `chatmark emoji` subcommands.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::cargo;

fn chatmark_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("chatmark"));
    cmd.env_remove("CHATMARK_LOG");
    cmd
}

fn add(store: &Path, shortcode: &str, image: &Path) -> std::process::Output {
    chatmark_cmd()
        .args([
            "emoji",
            "add",
            shortcode,
            image.to_str().expect("utf-8 path"),
            "--store",
            store.to_str().expect("utf-8 path"),
            "--output",
            "json",
        ])
        .output()
        .expect("run emoji add")
}

fn list(store: &Path, output: &str) -> std::process::Output {
    chatmark_cmd()
        .args([
            "emoji",
            "list",
            "--store",
            store.to_str().expect("utf-8 path"),
            "--output",
            output,
        ])
        .output()
        .expect("run emoji list")
}

#[test]
fn add_reports_registration_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("emoji.json");
    let image = dir.path().join("blob.png");
    fs::write(&image, b"PNGDATA").expect("write image");

    let output = add(&store, "blob", &image);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["status"], "registered");
    assert_eq!(json["shortcode"], "blob");
    assert_eq!(json["bytes"], 7);
    assert!(store.exists(), "store file should be created");
}

#[test]
fn list_returns_sorted_shortcodes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("nested").join("emoji.json");
    let image = dir.path().join("img.png");
    fs::write(&image, [0u8; 4]).expect("write image");

    for code in ["zebra", "apple", "mango"] {
        assert!(add(&store, code, &image).status.success());
    }

    let output = list(&store, "json");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(
        json["shortcodes"],
        serde_json::json!(["apple", "mango", "zebra"])
    );

    let pretty = list(&store, "pretty");
    assert_eq!(
        String::from_utf8_lossy(&pretty.stdout),
        ":apple:\n:mango:\n:zebra:\n"
    );
}

#[test]
fn re_adding_a_shortcode_replaces_the_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("emoji.json");
    let first = dir.path().join("a.png");
    let second = dir.path().join("b.png");
    fs::write(&first, [1u8]).expect("write image");
    fs::write(&second, [2u8, 2]).expect("write image");

    assert!(add(&store, "cat", &first).status.success());
    assert!(add(&store, "cat", &second).status.success());

    let json: serde_json::Value = serde_json::from_slice(&list(&store, "json").stdout).expect("json");
    assert_eq!(json["shortcodes"], serde_json::json!(["cat"]));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store).expect("read store")).expect("json");
    assert_eq!(doc["emojis"]["cat"], "AgI=");
}

#[test]
fn add_rejects_invalid_shortcode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("emoji.json");
    let image = dir.path().join("img.png");
    fs::write(&image, [0u8]).expect("write image");

    let output = add(&store, "two words", &image);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid shortcode"), "stderr={stderr}");
    assert!(!store.exists(), "rejected shortcode must not create a store");
}

#[test]
fn add_fails_for_missing_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("emoji.json");
    let output = add(&store, "ghost", &dir.path().join("missing.png"));
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read image"), "stderr={stderr}");
}

#[test]
fn list_of_missing_store_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = list(&dir.path().join("none.json"), "json");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["shortcodes"], serde_json::json!([]));
}

#[test]
fn native_lists_bundled_table() {
    let output = chatmark_cmd()
        .args(["emoji", "native", "--output", "json"])
        .output()
        .expect("run emoji native");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["smile"], "&#x1f604;");
    assert!(json.as_object().expect("object").len() > 50);
}

#[test]
fn native_with_malformed_table_reports_and_lists_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let table = dir.path().join("emojis.json");
    fs::write(&table, "{\"emojis\": [oops]}").expect("write table");

    let output = chatmark_cmd()
        .args([
            "emoji",
            "native",
            "--emoji-table",
            table.to_str().expect("utf-8 path"),
            "--output",
            "json",
        ])
        .output()
        .expect("run emoji native");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json, serde_json::json!({}));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("emojis.json"), "stderr={stderr}");
    assert!(stderr.contains("native emoji table unavailable"), "stderr={stderr}");
}

#[test]
fn add_checks_shortcode_against_vocabulary_delimiter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("emoji.json");
    let image = dir.path().join("img.png");
    let vocab = dir.path().join("vocab.json");
    fs::write(&image, [0u8]).expect("write image");
    fs::write(
        &vocab,
        r#"{
            "flags": { "*": { "open": "<em>", "close": "</em>" } },
            "link_prefixes": [],
            "link": { "open": "", "href_close": "", "close": "" },
            "emoji_delimiter": ";",
            "sentinel": "|"
        }"#,
    )
    .expect("write vocabulary");

    let run = |shortcode: &str| {
        chatmark_cmd()
            .args([
                "emoji",
                "add",
                shortcode,
                image.to_str().expect("utf-8 path"),
                "--store",
                store.to_str().expect("utf-8 path"),
                "--vocabulary",
                vocab.to_str().expect("utf-8 path"),
                "--output",
                "json",
            ])
            .output()
            .expect("run emoji add")
    };

    let rejected = run("a;b");
    assert!(!rejected.status.success());
    let stderr = String::from_utf8_lossy(&rejected.stderr);
    assert!(stderr.contains("invalid shortcode"), "stderr={stderr}");

    let accepted = run("a:b");
    assert!(
        accepted.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&accepted.stderr)
    );
}
