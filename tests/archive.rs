// ABOUTME: Tests for the streaming zip entry decoder.
// ABOUTME: Covers order, directory records, clean end, truncation, garbage.

mod support;

use pagelift::archive::{ArchiveError, decode_entries};
use support::zip_archive;

fn cursor(bytes: Vec<u8>) -> std::io::Cursor<Vec<u8>> {
    std::io::Cursor::new(bytes)
}

#[tokio::test]
async fn emits_entries_in_archive_order() {
    let bytes = zip_archive(&[
        ("index.html", "<html></html>"),
        ("assets/site.css", "body {}"),
        ("assets/app.js", "console.log(1)"),
    ]);

    let mut entries = decode_entries(cursor(bytes));
    let mut paths = Vec::new();

    while let Some(entry) = entries.next().await {
        let entry = entry.expect("valid entry");
        paths.push(entry.path);
    }

    assert_eq!(paths, vec!["index.html", "assets/site.css", "assets/app.js"]);
}

#[tokio::test]
async fn entry_bodies_are_decompressed() {
    let bytes = zip_archive(&[("hello.txt", "hello streaming world")]);

    let mut entries = decode_entries(cursor(bytes));
    let entry = entries.next().await.unwrap().unwrap();

    assert_eq!(entry.body.as_ref(), b"hello streaming world");
    assert!(entries.next().await.is_none(), "stream ends cleanly");
}

#[tokio::test]
async fn directory_records_are_emitted_as_declared() {
    let bytes = zip_archive(&[("assets/", ""), ("assets/site.css", "body {}")]);

    let mut entries = decode_entries(cursor(bytes));

    let first = entries.next().await.unwrap().unwrap();
    assert_eq!(first.path, "assets/");
    assert!(first.body.is_empty());

    let second = entries.next().await.unwrap().unwrap();
    assert_eq!(second.path, "assets/site.css");
}

#[tokio::test]
async fn truncated_input_is_distinguished_from_clean_end() {
    let bytes = zip_archive(&[("index.html", "<html>truncate me</html>")]);
    let cut = bytes.len() / 2;

    let mut entries = decode_entries(cursor(bytes[..cut].to_vec()));

    let mut saw_error = false;
    while let Some(item) = entries.next().await {
        match item {
            Ok(_) => {}
            Err(error) => {
                saw_error = true;
                assert!(
                    matches!(
                        error,
                        ArchiveError::Truncated(_) | ArchiveError::Malformed(_)
                    ),
                    "unexpected error: {error}"
                );
            }
        }
    }
    assert!(saw_error, "truncated archive must not end cleanly");
}

#[tokio::test]
async fn garbage_input_is_malformed() {
    let mut entries = decode_entries(cursor(b"this is not a zip archive at all".to_vec()));

    match entries.next().await {
        Some(Err(ArchiveError::Malformed(_))) => {}
        other => panic!("expected malformed error, got {other:?}"),
    }
}

#[tokio::test]
async fn entries_arrive_before_decoder_finishes() {
    // Large trailing entry: the first entry must already be consumable.
    let filler = "x".repeat(256 * 1024);
    let bytes = zip_archive(&[("first.html", "<html></html>"), ("big.txt", &filler)]);

    let mut entries = decode_entries(cursor(bytes));
    let first = entries.next().await.unwrap().unwrap();
    assert_eq!(first.path, "first.html");

    let second = entries.next().await.unwrap().unwrap();
    assert_eq!(second.body.len(), filler.len());
}
