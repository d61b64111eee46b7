use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use rr_types::{Price, Product};

use crate::error::{CatalogError, CatalogResult};

/// The three coffees the storefront ships with.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new(
            "espresso",
            "Espresso Kiss — Dark Roast",
            Price::new(16.0).unwrap_or_default(),
            "Notes of dark chocolate, caramel, and toasted hazelnut.",
            "https://images.pexels.com/photos/4109743/pexels-photo-4109743.jpeg?auto=compress&cs=tinysrgb&h=650&w=940",
        ),
        Product::new(
            "sunshine",
            "Sunshine Pour — Light Roast",
            Price::new(18.0).unwrap_or_default(),
            "Lively citrus, honeysuckle, and crisp finish.",
            "https://images.pexels.com/photos/4098899/pexels-photo-4098899.jpeg?auto=compress&cs=tinysrgb&h=650&w=940",
        ),
        Product::new(
            "decaf",
            "Quiet Decaf — Swiss Water",
            Price::new(15.0).unwrap_or_default(),
            "Smooth cocoa notes with low acidity.",
            concat!(
                "https://images.unsplash.com/photo-1640613303900-97956b839853",
                "?crop=entropy&cs=tinysrgb&fit=max&fm=jpg",
                "&ixid=M3w3ODkyNDZ8MHwxfHNlYXJjaHw4fHxBJTIwYmFnJTIwb2YlMjBkZWNhZiUyMGJlYW5zJTIwd2l0aCUyMHNvZnQlMjBzbW9reSUyMGJhY2tncm91bmQlMkMlMjBjdXAlMjBvZiUyMGJyZXdlZCUyMGNvZmZlZXxlbnwwfDB8fHwxNzU1MjczMDU5fDA",
                "&ixlib=rb-4.1.0&q=80&w=1080",
            ),
        ),
    ]
}

/// Look up a product by id (quick view, add-to-cart).
pub fn find<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

/// Parse a JSON array of products, rejecting empty and duplicate ids.
pub fn parse_catalog(json: &str) -> CatalogResult<Vec<Product>> {
    let products: Vec<Product> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(products.len());
    for product in &products {
        if product.id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if !seen.insert(product.id.as_str()) {
            return Err(CatalogError::DuplicateId(product.id.clone()));
        }
    }
    Ok(products)
}

/// Load a catalog file (JSON array of products).
pub fn load_catalog(path: &Path) -> CatalogResult<Vec<Product>> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let products = parse_catalog(&json)?;
    debug!(path = %path.display(), count = products.len(), "catalog loaded");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_ids_are_unique() {
        let products = demo_catalog();
        assert_eq!(products.len(), 3);
        let ids: HashSet<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn demo_prices() {
        let products = demo_catalog();
        assert_eq!(find(&products, "espresso").unwrap().price.amount(), 16.0);
        assert_eq!(find(&products, "sunshine").unwrap().price.amount(), 18.0);
        assert_eq!(find(&products, "decaf").unwrap().price.amount(), 15.0);
        assert!(find(&products, "matcha").is_none());
    }

    #[test]
    fn demo_images_keep_their_query_strings() {
        let products = demo_catalog();
        for p in &products {
            assert!(p.image_ref.starts_with("https://"), "{}", p.id);
            assert!(p.image_ref.contains('?'), "{}", p.id);
        }
        let decaf = find(&products, "decaf").unwrap();
        assert!(decaf.image_ref.contains("?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid="));
        assert!(decaf.image_ref.ends_with("&ixlib=rb-4.1.0&q=80&w=1080"));
    }

    #[test]
    fn parse_accepts_storefront_shape() {
        let json = r#"[{"id":"espresso","name":"Espresso Kiss","price":16,"desc":"Dark","img":"e.jpg"}]"#;
        let products = parse_catalog(json).unwrap();
        assert_eq!(products[0].image_ref, "e.jpg");
    }

    #[test]
    fn parse_rejects_duplicates_and_empty_ids() {
        let dup = r#"[{"id":"a","name":"A","price":1,"description":""},{"id":"a","name":"B","price":2,"description":""}]"#;
        assert!(matches!(parse_catalog(dup), Err(CatalogError::DuplicateId(id)) if id == "a"));

        let empty = r#"[{"id":"","name":"A","price":1,"description":""}]"#;
        assert!(matches!(parse_catalog(empty), Err(CatalogError::EmptyId)));
    }

    #[test]
    fn parse_rejects_negative_price() {
        let json = r#"[{"id":"a","name":"A","price":-1,"description":""}]"#;
        assert!(matches!(parse_catalog(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, serde_json::to_string(&demo_catalog()).unwrap()).unwrap();
        assert_eq!(load_catalog(&path).unwrap(), demo_catalog());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
