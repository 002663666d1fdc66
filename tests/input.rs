//! Input-descriptor parsing.

use std::path::PathBuf;

use unspool::InputDescriptor;

#[test]
fn http_and_https_are_remote() {
    assert_eq!(
        InputDescriptor::parse("http://example.com/a.gif").unwrap(),
        InputDescriptor::Remote("http://example.com/a.gif".to_owned())
    );
    assert_eq!(
        InputDescriptor::parse("https://example.com/a.webp").unwrap(),
        InputDescriptor::Remote("https://example.com/a.webp".to_owned())
    );
}

#[test]
fn file_uri_prefix_is_stripped() {
    assert_eq!(
        InputDescriptor::parse("file:///data/anim.webp").unwrap(),
        InputDescriptor::Local(PathBuf::from("/data/anim.webp"))
    );
}

#[test]
fn bare_paths_are_local() {
    assert_eq!(
        InputDescriptor::parse("/data/anim.webp").unwrap(),
        InputDescriptor::Local(PathBuf::from("/data/anim.webp"))
    );
    assert_eq!(
        InputDescriptor::parse("relative/anim.gif").unwrap(),
        InputDescriptor::Local(PathBuf::from("relative/anim.gif"))
    );
}

#[test]
fn unknown_schemes_are_rejected() {
    let error = InputDescriptor::parse("ftp://example.com/a.webp").unwrap_err();
    assert_eq!(error.code(), "unsupported-input");

    let error = InputDescriptor::parse("s3://bucket/a.gif").unwrap_err();
    assert_eq!(error.code(), "unsupported-input");
}
