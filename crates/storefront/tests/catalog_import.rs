use storefront::catalog::{CatalogError, CatalogProvider, CsvCatalog, ProductId, SyntheticCatalog};

#[test]
fn imports_rows_in_file_order() {
    let csv = "id,name,brand,sport,category,price,rating\n\
prod-a, Apex Running Shoe ,Apex,Running,Shoes,119.00,5\n\
prod-b,Nova Golf Bag,Nova,Golf,Accessories,89.95,4\n";

    let catalog = CsvCatalog::from_reader(csv.as_bytes()).expect("import succeeds");

    assert_eq!(catalog.len(), 2);
    let shoe = catalog
        .get(&ProductId::from("prod-a"))
        .expect("shoe imported");
    assert_eq!(shoe.name, "Apex Running Shoe");
    assert_eq!(shoe.rating, 5);
    assert_eq!(catalog.products()[1].id.as_str(), "prod-b");
    assert!(catalog.products().iter().all(|product| product.reviews == 0));
}

#[test]
fn imports_bundled_sample_catalog() {
    let data = include_bytes!("../sample_catalog.csv");

    let catalog = CsvCatalog::from_reader(&data[..]).expect("sample catalog imports");
    let facets = catalog.facets();

    assert_eq!(catalog.len(), 8);
    assert_eq!(
        facets.sports,
        vec!["Basketball", "Golf", "Running", "Soccer", "Tennis", "Training"]
    );
    assert!(facets.brands.contains(&"Titan Gear".to_string()));
}

#[test]
fn rejects_rating_outside_star_range() {
    let csv = "id,name,brand,sport,category,price,rating\n\
prod-a,Apex Running Shoe,Apex,Running,Shoes,119.00,7\n";

    let err = CsvCatalog::from_reader(csv.as_bytes()).expect_err("rating rejected");

    assert!(matches!(err, CatalogError::InvalidRating { rating: 7, .. }));
}

#[test]
fn rejects_duplicate_ids() {
    let csv = "id,name,brand,sport,category,price,rating\n\
prod-a,Apex Running Shoe,Apex,Running,Shoes,119.00,5\n\
prod-a,Apex Trail Shoe,Apex,Running,Shoes,99.00,4\n";

    let err = CsvCatalog::from_reader(csv.as_bytes()).expect_err("duplicate rejected");

    assert!(matches!(err, CatalogError::DuplicateId(id) if id.as_str() == "prod-a"));
}

#[test]
fn malformed_rows_surface_csv_errors() {
    let csv = "id,name,brand,sport,category,price,rating\n\
prod-a,Apex Running Shoe,Apex,Running,Shoes,cheap,5\n";

    let err = CsvCatalog::from_reader(csv.as_bytes()).expect_err("price rejected");

    assert!(matches!(err, CatalogError::Csv(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = CsvCatalog::from_path("does/not/exist.csv").expect_err("missing file");

    assert!(matches!(err, CatalogError::Io(_)));
}

#[test]
fn synthetic_catalog_is_reproducible_per_seed() {
    let first = SyntheticCatalog::new(50, 7).catalog().expect("catalog");
    let second = SyntheticCatalog::new(50, 7).catalog().expect("catalog");
    let other = SyntheticCatalog::new(50, 8).catalog().expect("catalog");

    assert_eq!(first.products(), second.products());
    assert_ne!(first.products(), other.products());
    assert!(first
        .products()
        .iter()
        .all(|product| (3..=5).contains(&product.rating) && product.price > 0.0));
}
