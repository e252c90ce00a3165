use blog_builder_core::{Asset, DraftInfo, ThemeName, ThemeOverride};
use blog_builder_generator::markdown::parse_markdown;
use blog_builder_generator::{GeneratedSite, generate_html_by_template, resolve_template};
use std::io::{Cursor, Read};
use zip::ZipArchive;

fn ann() -> DraftInfo {
    DraftInfo {
        title: Some("Ann's Log".to_string()),
        author: Some("Ann".to_string()),
        tagline: Some("notes".to_string()),
        about: Some("hi\nthere".to_string()),
    }
}

fn read(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    buf
}

#[test]
fn about_text_survives_render_and_packaging() {
    let resolved = resolve_template(&ann(), "clean");
    assert_eq!(resolved.tokens, ThemeName::Clean.palette());

    let html = generate_html_by_template(&ann(), "clean", Vec::new(), &ThemeOverride::default());
    let bytes = GeneratedSite::new(html.clone())
        .into_archive()
        .unwrap()
        .to_bytes()
        .unwrap();

    let unpacked = String::from_utf8(read(&bytes, "index.html")).unwrap();
    assert_eq!(unpacked, html);

    let open = r#"<p style="white-space:pre-wrap; line-height:1.8;">"#;
    let start = unpacked.find(open).unwrap() + open.len();
    let end = start + unpacked[start..].find("</p>").unwrap();
    assert_eq!(&unpacked[start..end], "hi\nthere");
}

#[test]
fn archive_holds_exactly_index_and_assets() {
    let article = parse_markdown("# Hello, World! 2024\n\nBody.", "hello.md");
    assert_eq!(article.slug, "hello-world-2024");

    let html = generate_html_by_template(&ann(), "magazine", vec![article], &ThemeOverride::default());
    let site = GeneratedSite {
        html: html.clone(),
        assets: vec![
            Asset::new("css/extra.css", "p{}"),
            Asset::new("bin/blob", vec![0u8, 159, 146, 150]),
        ],
    };
    let bytes = site.into_archive().unwrap().to_bytes().unwrap();

    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["assets/bin/blob", "assets/css/extra.css", "index.html"]);

    assert_eq!(read(&bytes, "index.html"), html.as_bytes());
    assert_eq!(read(&bytes, "assets/bin/blob"), vec![0u8, 159, 146, 150]);
    assert_eq!(read(&bytes, "assets/css/extra.css"), b"p{}");
}

#[tokio::test]
async fn async_serialization_produces_a_readable_archive() {
    let html = generate_html_by_template(&ann(), "dark", Vec::new(), &ThemeOverride::default());
    let bytes = GeneratedSite::new(html.clone())
        .into_archive()
        .unwrap()
        .into_bytes()
        .await
        .unwrap();
    assert_eq!(read(&bytes, "index.html"), html.as_bytes());
}
