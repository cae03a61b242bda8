//! Batch import semantics: ordering, failure handling and skipping.

mod common;
use common::*;

use oxide_dump::prelude::*;

#[tokio::test]
async fn batch_stops_after_failing_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_dump(dir.path(), "a.sql", "CREATE TABLE a (x INT);\nINSERT INTO a VALUES (1);\n");
    let b = write_dump(
        dir.path(),
        "b.sql",
        "CREATE TABLE b (x INT);\nINSERT INTO b VALUES ('bad');\nINSERT INTO b VALUES (3);\n",
    );
    let c = write_dump(dir.path(), "c.sql", "CREATE TABLE c (x INT);\n");

    let connection = RecordingConnection::rejecting(&["INSERT INTO b VALUES ('bad')"]);
    let mut importer = Importer::new(connection);

    let err = importer
        .import_all(&[a.clone(), b.clone(), c.clone()])
        .await
        .unwrap_err();

    match &err {
        ImportError::Statement {
            path, statement, ..
        } => {
            assert_eq!(path, &b);
            assert_eq!(statement, "INSERT INTO b VALUES ('bad')");
        }
        other => panic!("Expected statement error, got {other:?}"),
    }

    assert_eq!(importer.imported(), [a.clone()]);

    let statuses: Vec<FileStatus> = importer.outcomes().iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        [FileStatus::Imported, FileStatus::Failed, FileStatus::Skipped]
    );
    assert_eq!(importer.outcomes()[1].statements, 3);
    assert!(importer.outcomes()[2].finished_at.is_none());

    // The rest of b.sql still ran; c.sql never did.
    assert_eq!(
        importer.connection().executed,
        [
            "CREATE TABLE a (x INT)",
            "INSERT INTO a VALUES (1)",
            "CREATE TABLE b (x INT)",
            "INSERT INTO b VALUES ('bad')",
            "INSERT INTO b VALUES (3)",
        ]
    );
}

#[tokio::test]
async fn first_error_of_a_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_dump(dir.path(), "x.sql", "SELECT 1;\nSELECT 2;\nSELECT 3;\n");

    let mut importer = Importer::new(RecordingConnection::rejecting(&["SELECT 2", "SELECT 3"]));
    let err = importer.import_file(&file).await.unwrap_err();

    assert!(matches!(
        err,
        ImportError::Statement { ref statement, .. } if statement == "SELECT 2"
    ));
    assert_eq!(importer.connection().executed.len(), 3);
}

#[tokio::test]
async fn missing_file_fails_without_success_entry() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_dump(dir.path(), "a.sql", "SELECT 1;");
    let missing = dir.path().join("missing.sql");

    let mut importer = Importer::new(RecordingConnection::default());
    let err = importer.import_all(&[missing.clone(), a]).await.unwrap_err();

    assert!(matches!(err, ImportError::FileAccess { ref path, .. } if path == &missing));
    assert!(importer.imported().is_empty());
    assert_eq!(importer.outcomes()[0].status, FileStatus::Failed);
    assert_eq!(importer.outcomes()[1].status, FileStatus::Skipped);
    assert!(importer.connection().executed.is_empty());
}

#[tokio::test]
async fn rerunning_a_batch_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_dump(dir.path(), "a.sql", "DELIMITER //\nSELECT 1//\nDELIMITER ;\nSELECT 2;\n");
    let b = write_dump(dir.path(), "b.sql", "SELECT 'x;y';\n");
    let files = [a, b];

    let mut importer = Importer::new(RecordingConnection::default()).chunk_size(5);
    importer.import_all(&files).await.unwrap();
    let first_run = importer.connection().executed.clone();
    let first_imported = importer.imported().to_vec();

    importer.connection_mut().executed.clear();
    importer.import_all(&files).await.unwrap();

    assert_eq!(importer.connection().executed, first_run);
    assert_eq!(importer.imported(), first_imported.as_slice());
    assert_eq!(first_run, ["SELECT 1", "SELECT 2", "SELECT 'x;y'"]);
}

#[tokio::test]
async fn chunk_size_does_not_change_statements() {
    let dir = tempfile::tempdir().unwrap();
    let dump = "INSERT INTO t VALUES ('it\\'s; ok', \"a;b\");\nDELIMITER $$\nCREATE PROCEDURE p() BEGIN SELECT 1; END$$\nDELIMITER ;\nSELECT 'ü';\n";
    let file = write_dump(dir.path(), "t.sql", dump);

    let mut expected = None;
    for chunk_size in [1, 2, 3, 7, 64, 65536] {
        let mut importer = Importer::new(RecordingConnection::default()).chunk_size(chunk_size);
        importer.import_file(&file).await.unwrap();
        let executed = importer.connection().executed.clone();
        match &expected {
            None => expected = Some(executed),
            Some(first) => assert_eq!(&executed, first, "chunk size {chunk_size}"),
        }
    }
    assert_eq!(
        expected.unwrap(),
        [
            "INSERT INTO t VALUES ('it\\'s; ok', \"a;b\")",
            "CREATE PROCEDURE p() BEGIN SELECT 1; END",
            "SELECT 'ü'",
        ]
    );
}

#[tokio::test]
async fn discovered_files_import_in_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("02_data")).unwrap();
    write_dump(dir.path(), "01_schema.sql", "CREATE TABLE t (x INT);");
    write_dump(&dir.path().join("02_data"), "rows.SQL", "INSERT INTO t VALUES (1);");
    write_dump(dir.path(), "notes.txt", "not sql;");

    let files = discover_sql_files(&[dir.path()]).await.unwrap();
    let mut importer = Importer::new(RecordingConnection::default());
    importer.import_all(&files).await.unwrap();

    assert_eq!(importer.imported(), files.as_slice());
    assert_eq!(
        importer.connection().executed,
        ["CREATE TABLE t (x INT)", "INSERT INTO t VALUES (1)"]
    );
}

#[tokio::test]
async fn use_database_and_close() {
    let mut importer = Importer::new(RecordingConnection::default());
    importer.use_database("shop").await.unwrap();
    assert_eq!(importer.connection().database.as_deref(), Some("shop"));
    importer.close(true).await.unwrap();
}
