use anyhow::Result;
use json_extractor::core::{DuplicateOutcome, ViewStage};
use json_extractor::{ExtractPipeline, ExtractorEngine, LocalStorage, TomlConfig};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const CUSTOMERS: &str = r#"{
    "meta": {"page": 1},
    "data": [
        {"id": 1, "email": "ann@example.com", "name": "Ann", "address": {"city": "Oslo"}},
        {"id": 2, "email": "bob@example.com", "name": "Bob", "tags": ["vip"]},
        {"id": 3, "email": "ann@example.com", "name": "Ann B."},
        {"id": 4, "email": "cid@example.com", "name": "Cid"},
        "corrupted row",
        {"id": 5, "email": "ann@example.com", "name": "Ann"}
    ]
}"#;

fn write_input(dir: &TempDir, name: &str, content: &str) -> Result<String> {
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok(path.to_str().unwrap().replace('\\', "/"))
}

fn toml_config(input: &str, output: &str, selection: &str) -> Result<TomlConfig> {
    let content = format!(
        r#"
[input]
path = "{}"

[selection]
{}

[export]
output_path = "{}"
"#,
        input, selection, output
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

fn files_in(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
}

#[test]
fn test_end_to_end_extraction_with_duplicates() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "customers.json", CUSTOMERS)?;
    let output_dir = temp_dir.path().join("exports");
    let output = output_dir.to_str().unwrap().replace('\\', "/");

    let config = toml_config(
        &input,
        &output,
        r#"fields = ["id", "email", "address"]
duplicate_keys = ["email"]"#,
    )?;

    let storage = LocalStorage::new(output.clone());
    let engine = ExtractorEngine::new(ExtractPipeline::new(storage, config));
    let outcome = engine.run()?;

    let extraction = outcome.view.extraction().unwrap();
    assert_eq!(extraction.table.len(), 5);
    assert_eq!(extraction.table.columns(), &["id", "email", "address"]);

    let DuplicateOutcome::Performed(report) = &extraction.duplicates else {
        panic!("duplicate check should have run");
    };
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].key, "ann@example.com");
    assert_eq!(report.groups[0].members, vec![0, 2, 4]);
    assert_eq!(report.duplicate_row_count(), 3);
    assert_eq!(report.samples.len(), 1);

    assert_eq!(outcome.written.len(), 4);
    let names = files_in(&output_dir)?;
    assert_eq!(names.len(), 4);
    assert_eq!(names.iter().filter(|n| n.starts_with("extracted_data_")).count(), 2);
    assert_eq!(names.iter().filter(|n| n.starts_with("duplicates_")).count(), 2);

    // Full CSV re-parses to the projected values.
    let full_csv = names
        .iter()
        .find(|n| n.starts_with("extracted_data_") && n.ends_with(".csv"))
        .unwrap();
    let mut reader = csv::Reader::from_path(output_dir.join(full_csv))?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    assert_eq!(headers, vec!["id", "email", "address"]);
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[0][2], r#"{"city":"Oslo"}"#);
    assert_eq!(&rows[1][2], "");

    // Duplicates CSV holds only the three colliding rows.
    let dup_csv = names
        .iter()
        .find(|n| n.starts_with("duplicates_") && n.ends_with(".csv"))
        .unwrap();
    let content = std::fs::read_to_string(output_dir.join(dup_csv))?;
    assert_eq!(content.lines().count(), 4);
    assert!(content.lines().skip(1).all(|l| l.contains("ann@example.com")));

    // Workbook has the two sheets.
    let xlsx = names
        .iter()
        .find(|n| n.starts_with("extracted_data_") && n.ends_with(".xlsx"))
        .unwrap();
    let file = std::fs::File::open(output_dir.join(xlsx))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut workbook = String::new();
    archive.by_name("xl/workbook.xml")?.read_to_string(&mut workbook)?;
    assert!(workbook.contains(r#"name="Data""#));
    assert!(workbook.contains(r#"name="Summary""#));

    Ok(())
}

#[test]
fn test_root_array_document() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "points.json", r#"[{"x": 1}, {"x": 2}]"#)?;
    let output = temp_dir.path().join("out");

    let mut config = toml_config(&input, output.to_str().unwrap(), "select_all = true")?;
    config.export.enabled = false;

    let engine = ExtractorEngine::new(ExtractPipeline::new(
        LocalStorage::new(output.to_str().unwrap().to_string()),
        config,
    ));
    let outcome = engine.run()?;

    assert!(outcome
        .view
        .source
        .structure_notice()
        .unwrap()
        .contains("root array"));
    assert_eq!(outcome.view.extraction().unwrap().table.len(), 2);
    assert!(outcome.written.is_empty());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_invalid_json_produces_no_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "broken.txt", r#"{"data": [1, 2"#)?;
    let output = temp_dir.path().join("out");

    let config = toml_config(&input, output.to_str().unwrap(), "select_all = true")?;
    let engine = ExtractorEngine::new(ExtractPipeline::new(
        LocalStorage::new(output.to_str().unwrap().to_string()),
        config,
    ));

    let err = engine.run().unwrap_err();
    assert!(err.user_friendly_message().contains("text file"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_document_without_records_reports_keys() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "wrapped.json", r#"{"results": [{"a": 1}], "count": 1}"#)?;
    let output = temp_dir.path().join("out");

    let config = toml_config(&input, output.to_str().unwrap(), "select_all = true")?;
    let engine = ExtractorEngine::new(ExtractPipeline::new(
        LocalStorage::new(output.to_str().unwrap().to_string()),
        config,
    ));
    let outcome = engine.run()?;

    assert_eq!(outcome.view.stage, ViewStage::NoRecords);
    assert!(outcome
        .view
        .source
        .structure_notice()
        .unwrap()
        .contains("count, results"));
    assert!(outcome.written.is_empty());
    Ok(())
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_config_runs_without_duplicate_check() -> Result<()> {
    use clap::Parser;
    use json_extractor::CliConfig;

    let temp_dir = TempDir::new()?;
    let input = write_input(&temp_dir, "customers.json", CUSTOMERS)?;
    let output = temp_dir.path().join("cli-out");
    let output = output.to_str().unwrap().to_string();

    let config = CliConfig::parse_from([
        "json-extractor",
        "--input",
        input.as_str(),
        "--fields",
        "name,id",
        "--output-path",
        output.as_str(),
        "--formats",
        "csv",
    ]);

    let engine = ExtractorEngine::new(ExtractPipeline::new(LocalStorage::new(output.clone()), config));
    let outcome = engine.run()?;

    let extraction = outcome.view.extraction().unwrap();
    assert_eq!(extraction.duplicates, DuplicateOutcome::NotPerformed);
    assert_eq!(outcome.written.len(), 1);

    let content = std::fs::read_to_string(&outcome.written[0])?;
    assert!(content.starts_with("name,id\nAnn,1\n"));
    Ok(())
}
