use cloudhunt::handlers::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_bundled_affixes_are_used_by_default() {
    let affixes = load_affixes_or_default(None).unwrap();
    assert!(!affixes.is_empty());
    assert!(affixes.contains(&"dev".to_string()));
    assert!(affixes.iter().all(|a| !a.trim().is_empty()));
}

#[test]
fn test_bundled_resolvers_are_used_by_default() {
    let resolvers = load_resolvers_or_default(None).unwrap();
    assert!(resolvers.len() >= 2);
    assert!(resolvers.iter().all(|r| r.port() == 53));
}

#[test]
fn test_load_affixes_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "internal")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "legacy")?;

    let path = temp_file.path().to_str().unwrap().to_string();
    let affixes = load_affixes_or_default(Some(&path))?;

    assert_eq!(affixes, vec!["internal", "legacy"]);
    Ok(())
}

#[test]
fn test_load_resolvers_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "10.0.0.1")?;
    writeln!(temp_file, "10.0.0.2:5353")?;

    let path = temp_file.path().to_str().unwrap().to_string();
    let resolvers = load_resolvers_or_default(Some(&path))?;

    assert_eq!(resolvers.len(), 2);
    assert_eq!(resolvers[1].to_string(), "10.0.0.2:5353");
    Ok(())
}

#[test]
fn test_missing_resolver_file_is_an_error() {
    let result = load_resolvers_or_default(Some("/nonexistent/resolvers.txt"));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to read resolvers file"));
}

#[test]
fn test_empty_affix_file_is_an_error() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_str().unwrap().to_string();

    let result = load_affixes_or_default(Some(&path));
    assert!(result.is_err());
}

#[test]
fn test_report_path_default() {
    assert_eq!(report_path(None, "acme"), PathBuf::from("acme-output.json"));
}

#[test]
fn test_report_path_explicit() {
    assert_eq!(
        report_path(Some("/tmp/hunt.json"), "acme"),
        PathBuf::from("/tmp/hunt.json")
    );
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/lists/resolvers.txt");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with("lists/resolvers.txt"));
}
