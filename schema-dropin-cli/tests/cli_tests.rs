use std::path::Path;
use std::process::{Command, Output};
use std::sync::Once;
use tracing::{error, info};

static INIT: Once = Once::new();

/// Initialize logging exactly once for all tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    });
}

fn run(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_schema-dropin"))
        .args(args)
        .output()
        .expect("failed to run schema-dropin");

    if !output.status.success() {
        error!("Command failed with status: {}", output.status);
        error!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    output
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_validate_command() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;

    info!("Validating a well-formed FAQ page");
    let valid = write(
        dir.path(),
        "faq.json",
        r#"{"@context": "https://schema.org", "@type": "FAQPage", "mainEntity": []}"#,
    );
    assert!(run(&["validate", &valid]).status.success());

    info!("Validating an Article without a headline");
    let invalid = write(
        dir.path(),
        "article.json",
        r#"{"@context": "https://schema.org", "@type": "Article"}"#,
    );
    let output = run(&["validate", &invalid]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("headline"));
    Ok(())
}

#[test]
fn test_merge_command() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;

    let graph = write(
        dir.path(),
        "graph.json",
        r#"{"@context": "https://schema.org", "@graph": [
            {"@type": "WebPage", "name": "Generated", "publisher": {"name": "Acme"}},
            {"@type": "Organization", "name": "Acme"}
        ]}"#,
    );
    let manual = write(
        dir.path(),
        "manual.json",
        r#"{"@type": "WebPage", "dateModified": "{{fm_schema_last_updated_date}}", "publisher": {"logo": "logo.png"}}"#,
    );
    let merged_path = dir.path().join("out").join("merged.json");

    let output = run(&[
        "merge",
        "--graph",
        &graph,
        "--manual",
        &manual,
        "--created",
        "2024-03-05",
        "--modified",
        "2024-06-17",
        "--output",
        &merged_path.to_string_lossy(),
    ]);
    assert!(output.status.success());

    let merged: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&merged_path)?)?;
    assert_eq!(
        merged,
        serde_json::json!([
            {
                "@type": "WebPage",
                "name": "Generated",
                "publisher": {"name": "Acme", "logo": "logo.png"},
                "dateModified": "2024-06-17"
            },
            {"@type": "Organization", "name": "Acme"}
        ])
    );
    Ok(())
}

#[test]
fn test_merge_command_with_unusable_manual_schema() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;

    let graph = write(dir.path(), "graph.json", r#"[{"@type": "WebPage", "name": "Generated"}]"#);
    let manual = write(dir.path(), "manual.json", r#"{"@type": "WebPage", "#);

    let output = run(&["merge", "--graph", &graph, "--manual", &manual]);
    assert!(!output.status.success());

    let output = run(&["merge", "--graph", &graph, "--manual", &manual, "--lenient"]);
    assert!(output.status.success());
    let passed_through: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        passed_through,
        serde_json::json!([{"@type": "WebPage", "name": "Generated"}])
    );
    Ok(())
}

#[test]
fn test_item_set_and_render() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;

    let config = write(
        dir.path(),
        "schema.jsonc",
        r#"{
            // test site
            "siteName": "Acme",
            "siteUrl": "https://acme.test/",
            "storePath": "store.json"
        }"#,
    );
    let invalid = write(dir.path(), "invalid.json", r#"{"@type": "HowTo"}"#);
    let manual = write(
        dir.path(),
        "manual.json",
        r#"{"@context": "https://schema.org", "@type": "Article", "headline": "Launch", "datePublished": "{{fm_schema_created_date}}"}"#,
    );

    info!("Rejecting invalid manual schema");
    let output = run(&["item", "--config", &config, "set", "--id", "7", "--schema", &invalid]);
    assert!(!output.status.success());
    assert!(!dir.path().join("store.json").exists());

    info!("Storing valid manual schema");
    let output = run(&[
        "item", "--config", &config, "set", "--id", "7", "--post-type", "post", "--schema", &manual,
    ]);
    assert!(output.status.success());
    assert!(dir.path().join("store.json").exists());

    let item = write(
        dir.path(),
        "item.json",
        r#"{"id": 7, "postType": "post", "slug": "launch", "created": "2024-03-05", "modified": "2024-06-17"}"#,
    );
    let graph = write(
        dir.path(),
        "graph.json",
        r#"[{"@type": "Article", "headline": "Generated", "wordCount": 300}]"#,
    );

    let output = run(&["render", "--config", &config, "--item", &item, "--graph", &graph]);
    assert!(output.status.success());
    let rendered: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        rendered,
        serde_json::json!([{
            "@type": "Article",
            "headline": "Launch",
            "wordCount": 300,
            "@context": "https://schema.org",
            "datePublished": "2024-03-05"
        }])
    );
    Ok(())
}

#[test]
fn test_generate_config_command() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;

    let output = run(&["generate-config", "--output", &dir.path().to_string_lossy()]);
    assert!(output.status.success());

    let generated = std::fs::read_to_string(dir.path().join("schema.jsonc"))?;
    assert!(generated.contains("siteName"));
    Ok(())
}
