use ailabel::{Catalog, CatalogError, CatalogRow, SLOT_COUNT};
use tempfile::tempdir;

const BENCHMARK_CSV: &str = "\
title,title_0a,title_0b,title_1a,title_1b,title_2a,title_2b,images
Blue Mug 12oz,Blue Ceramic Mug,12oz Blue Mug,Mug - Blue,Ceramic Coffee Mug,Blue Mug,Classic Mug,\"['https://img/1.jpg', 'https://img/2.jpg']\"
Steel Pan,Steel Frying Pan,\"Pan, Steel, 28cm\",,Frying Pan,Pan 28cm,Nonstick Pan,[]
Oak Table,Oak Table,Solid Oak Table,Table,Dining Table,Oak Dining Table,Wood Table,not-a-list
";

fn write(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn load_csv_with_benchmark_column_names() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "benchmark.csv", BENCHMARK_CSV);

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.item_count(), 3);

    for id in 0..catalog.item_count() {
        let item = catalog.get_item(id).unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.variants.len(), SLOT_COUNT);
    }

    let mug = catalog.get_item(0).unwrap();
    assert_eq!(mug.title.as_deref(), Some("Blue Mug 12oz"));
    assert_eq!(mug.variant(1), Some("12oz Blue Mug"));
    assert_eq!(mug.images, vec!["https://img/1.jpg", "https://img/2.jpg"]);
    assert_eq!(
        mug.display_images(4),
        vec!["https://img/1.jpg", "https://img/2.jpg", "", ""]
    );
    assert_eq!(mug.display_images(1), vec!["https://img/1.jpg"]);

    let pan = catalog.get_item(1).unwrap();
    assert_eq!(pan.variant(1), Some("Pan, Steel, 28cm"));
    assert_eq!(pan.variant(2), Some(""));
    assert!(pan.images.is_empty());
}

#[test]
fn malformed_image_lists_default_to_empty() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "benchmark.csv", BENCHMARK_CSV);

    let catalog = Catalog::load(&path).unwrap();
    let table = catalog.get_item(2).unwrap();
    assert!(table.images.is_empty());
    assert_eq!(table.display_images(2), vec!["", ""]);
}

#[test]
fn load_json_rows_with_short_column_names() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "catalog.json",
        r#"[
            {"v0": "A", "v1": "B", "v2": "C", "v3": "D", "v4": "E", "v5": "F"},
            {"title": "Lamp", "v0": "a", "v1": "b", "v2": "c", "v3": "d", "v4": "e", "v5": null,
             "image_urls": "['x.png']"}
        ]"#,
    );

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.item_count(), 2);
    assert_eq!(catalog.get_item(0).unwrap().title, None);
    let lamp = catalog.get_item(1).unwrap();
    assert_eq!(lamp.variant(5), Some(""));
    assert_eq!(lamp.images, vec!["x.png"]);
}

#[test]
fn missing_variant_column_is_malformed() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "title,v0,v1,v2,v3,v4\nx,a,b,c,d,e\n");

    let err = Catalog::load(&path).unwrap_err();
    match err {
        CatalogError::MalformedSource(msg) => assert!(msg.contains("slot 5"), "{msg}"),
        other => panic!("expected MalformedSource, got {other:?}"),
    }
}

#[test]
fn ragged_csv_row_is_malformed() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "v0,v1,v2,v3,v4,v5\na,b,c,d,e\n");
    assert!(matches!(
        Catalog::load(&path),
        Err(CatalogError::MalformedSource(_))
    ));
}

#[test]
fn json_row_missing_a_variant_is_malformed() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "bad.json",
        r#"[
            {"v0": "A", "v1": "B", "v2": "C", "v3": "D", "v4": "E", "v5": "F"},
            {"v0": "A", "v1": "B", "v2": "C", "v3": "D", "v4": "E"}
        ]"#,
    );
    assert!(matches!(
        Catalog::load(&path),
        Err(CatalogError::MalformedSource(_))
    ));
}

#[test]
fn from_rows_requires_exactly_six_variants() {
    let row = |n: usize| CatalogRow {
        variants: (0..n).map(|i| format!("v{i}")).collect(),
        ..CatalogRow::default()
    };
    assert!(Catalog::from_rows([row(6)]).is_ok());
    assert!(matches!(
        Catalog::from_rows([row(6), row(5)]),
        Err(CatalogError::MalformedSource(_))
    ));
    assert!(matches!(
        Catalog::from_rows([row(7)]),
        Err(CatalogError::MalformedSource(_))
    ));
}

#[test]
fn get_item_out_of_range() {
    let catalog = Catalog::from_rows([CatalogRow {
        variants: ["A", "B", "C", "D", "E", "F"].map(String::from).to_vec(),
        ..CatalogRow::default()
    }])
    .unwrap();

    assert!(catalog.get_item(0).is_ok());
    assert!(matches!(
        catalog.get_item(1),
        Err(CatalogError::OutOfRange { id: 1, count: 1 })
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Catalog::load(dir.path().join("nope.csv")),
        Err(CatalogError::Io(_))
    ));
}
