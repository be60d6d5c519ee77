//! Version inheritance and write-back behaviour of `PomFile`

use pomedit::{Error, ErrorKind, PomFile, Result};

const CHILD_EXPLICIT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0.0</version>
  </parent>
  <artifactId>child</artifactId>
  <version>1.0.0</version>
  <packaging>eclipse-plugin</packaging>
</project>
"#;

const CHILD_INHERITING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0.0</version>
  </parent>
  <artifactId>child</artifactId>
  <name>Child</name>
</project>
"#;

fn write(pom: &mut PomFile) -> Result<String> {
    let mut out = Vec::new();
    pom.write(&mut out)?;
    String::from_utf8(out).map_err(|_| Error::at(ErrorKind::InvalidUtf8, Default::default()))
}

#[test]
fn round_trip_without_edits_is_identical() -> Result<()> {
    for xml in [CHILD_EXPLICIT, CHILD_INHERITING] {
        let mut pom = PomFile::parse(xml.as_bytes())?;
        assert_eq!(write(&mut pom)?, xml);
    }
    Ok(())
}

#[test]
fn write_back_is_idempotent() -> Result<()> {
    let mut pom = PomFile::parse(CHILD_INHERITING.as_bytes())?;
    pom.set_version("2.0.0");
    let first = write(&mut pom)?;
    let second = write(&mut pom)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn explicit_version_survives_when_equal_to_parent() -> Result<()> {
    let mut pom = PomFile::parse(CHILD_EXPLICIT.as_bytes())?;
    assert!(pom.prefers_explicit_version());
    pom.set_version("1.0.0");
    let out = write(&mut pom)?;
    assert_eq!(out, CHILD_EXPLICIT);
    assert!(out.contains("<artifactId>child</artifactId>\n  <version>1.0.0</version>"));
    Ok(())
}

#[test]
fn explicit_version_is_rewritten_in_place() -> Result<()> {
    let mut pom = PomFile::parse(CHILD_EXPLICIT.as_bytes())?;
    pom.set_version("1.1.0-SNAPSHOT");
    let expected = CHILD_EXPLICIT.replace(
        "<artifactId>child</artifactId>\n  <version>1.0.0</version>",
        "<artifactId>child</artifactId>\n  <version>1.1.0-SNAPSHOT</version>",
    );
    assert_eq!(write(&mut pom)?, expected);
    Ok(())
}

#[test]
fn inherited_version_is_materialized_when_it_differs() -> Result<()> {
    let mut pom = PomFile::parse(CHILD_INHERITING.as_bytes())?;
    assert_eq!(pom.version(), Some("1.0.0"));
    pom.set_version("2.0.0");

    let expected = CHILD_INHERITING.replace(
        "<artifactId>child</artifactId>\n",
        "<artifactId>child</artifactId>\n  <version>2.0.0</version>\n",
    );
    assert_eq!(write(&mut pom)?, expected);
    Ok(())
}

#[test]
fn materialized_version_is_elided_again_without_blank_line() -> Result<()> {
    let mut pom = PomFile::parse(CHILD_INHERITING.as_bytes())?;
    pom.set_version("2.0.0");
    let materialized = write(&mut pom)?;

    let mut reread = PomFile::parse(materialized.as_bytes())?;
    assert!(reread.prefers_explicit_version());
    assert_eq!(write(&mut reread)?, materialized);

    pom.set_version("1.0.0");
    let out = write(&mut pom)?;
    assert!(!out.contains("<version>2.0.0</version>"));
    assert!(!out.contains("\n\n"));
    assert_eq!(out, CHILD_INHERITING);
    Ok(())
}

#[test]
fn elision_removes_only_one_trailing_text_node() -> Result<()> {
    // unformatted document: <version> lands directly before <packaging>
    let xml = "<project><parent><version>1</version></parent><artifactId>a</artifactId><packaging>pom</packaging></project>";
    let mut pom = PomFile::parse(xml.as_bytes())?;
    pom.set_version("2");
    let materialized = write(&mut pom)?;
    assert_eq!(
        materialized,
        "<project><parent><version>1</version></parent><artifactId>a</artifactId><version>2</version>\n<packaging>pom</packaging></project>"
    );

    pom.set_version("1");
    assert_eq!(write(&mut pom)?, xml);
    Ok(())
}

#[test]
fn parent_version_edit_requires_parent() -> Result<()> {
    let mut pom = PomFile::parse(b"<project><artifactId>a</artifactId><version>1</version></project>")?;
    let err = pom.set_parent_version("2").err();
    assert!(matches!(
        err.as_ref().map(Error::kind),
        Some(ErrorKind::MissingElement { .. })
    ));
    Ok(())
}

#[test]
fn parent_version_edit_keeps_project_version() -> Result<()> {
    let mut pom = PomFile::parse(CHILD_EXPLICIT.as_bytes())?;
    pom.set_parent_version("1.2.0")?;
    assert_eq!(pom.version(), Some("1.0.0"));
    assert_eq!(pom.parent_version().as_deref(), Some("1.2.0"));

    let out = write(&mut pom)?;
    assert!(out.contains("    <version>1.2.0</version>\n  </parent>"));
    assert!(out.contains("  <version>1.0.0</version>\n  <packaging>"));
    Ok(())
}

#[test]
fn default_and_explicit_packaging() -> Result<()> {
    let inheriting = PomFile::parse(CHILD_INHERITING.as_bytes())?;
    assert_eq!(inheriting.packaging(), pomedit::DEFAULT_PACKAGING);
    let explicit = PomFile::parse(CHILD_EXPLICIT.as_bytes())?;
    assert_eq!(explicit.packaging(), "eclipse-plugin");
    Ok(())
}

#[test]
fn modules_are_deduplicated_across_blocks() -> Result<()> {
    let pom = PomFile::parse(
        b"<project>\n  <modules>\n    <module>a</module>\n    <module>b</module>\n  </modules>\n  <modules>\n    <module>a</module>\n  </modules>\n</project>",
    )?;
    assert_eq!(pom.modules(), vec!["a", "b"]);
    Ok(())
}

#[test]
fn missing_artifact_id_is_reported() -> Result<()> {
    let pom = PomFile::parse(b"<project><groupId>g</groupId></project>")?;
    let err = pom.artifact_id().err();
    assert_eq!(
        err.map(|e| e.kind().clone()),
        Some(ErrorKind::MissingValue {
            field: "artifactId".to_string()
        })
    );
    assert!(pom.coordinates().is_err());
    Ok(())
}

#[test]
fn malformed_input_is_a_parse_error() {
    let err = PomFile::parse(b"<project><artifactId>a</project>").err();
    assert!(err.is_some_and(|e| e.is_parse()));
}

#[test]
fn file_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(PomFile::POM_XML);
    std::fs::write(&path, CHILD_INHERITING)?;

    let mut pom = PomFile::read_file(&path)?;
    pom.set_version("3.0.0");
    pom.write_file(&path)?;

    let reread = PomFile::read_file(&path)?;
    assert_eq!(reread.version(), Some("3.0.0"));
    assert!(reread.prefers_explicit_version());
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = PomFile::read_file("/nonexistent/pom.xml").err();
    assert_eq!(
        err.map(|e| e.kind().clone()),
        Some(ErrorKind::Io(std::io::ErrorKind::NotFound))
    );
}
